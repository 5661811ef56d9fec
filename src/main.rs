//! Mini Cache demo
//!
//! Walks one key through its lifetime in a registry-managed store: set,
//! read, expire, delete.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mini_cache::{spawn_sweeper, CacheStore, Config, Registry};

/// Entry point for the demo.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the store and register it as the default cache
/// 4. Start the expiry sweeper if an interval is configured
/// 5. Run the scenario, then tear the registry down
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: initial_capacity={}, sweep_interval={}s, default_name={}, fallback_to_default={}",
        config.initial_capacity,
        config.sweep_interval,
        config.default_name,
        config.fallback_to_default
    );

    let store: Arc<CacheStore<String>> = Arc::new(CacheStore::from_config(&config));
    let registry = Registry::with_config(config.registry_config());
    registry.register(config.default_name.as_str(), Arc::clone(&store));
    registry.set_default(&config.default_name)?;

    let sweeper = config
        .sweep_interval()
        .map(|interval| spawn_sweeper(Arc::clone(&store), interval));

    let name = config.default_name.as_str();
    let key = "name";

    registry.set(name, key, "cache value".to_string(), Duration::from_secs(2))?;
    println!("{}", registry.has(name, key)?);
    println!("{}", display(registry.get(name, key)?));

    tokio::time::sleep(Duration::from_secs(2)).await;
    println!("{}", display(registry.get(name, key)?));

    registry.del(name, key)?;
    println!("{}", registry.has(name, key)?);

    info!(stats = ?store.stats(), "Scenario complete");

    if let Some(handle) = sweeper {
        handle.abort();
    }
    registry.unregister_all();

    Ok(())
}

fn display(value: Option<Arc<String>>) -> String {
    value
        .map(|v| v.as_str().to_string())
        .unwrap_or_else(|| "<none>".to_string())
}
