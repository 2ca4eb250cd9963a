//! Example demonstrating layered lookups against an in-memory store.
//!
//! Shows how global, environment and path layers override each other, how a
//! key filter reports absent keys, and how the provider is closed.
//!
//! Debug-level provider logs are printed alongside the results:
//!
//! ```text
//! cargo run --example layered_lookup
//! ```

use ssm_config_provider::prelude::*;
use ssm_config_provider::sources::InMemoryParameterStore;
use std::collections::{HashMap, HashSet};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    println!("=== Layered Lookup Example ===\n");

    let store = InMemoryParameterStore::new()
        .with_parameter("/global/", "log_level", "info")
        .with_parameter("/global/", "region", "us-east-1")
        .with_parameter("/prod/", "log_level", "warn")
        .with_parameter("/prod/kafka_connect/", "bootstrap.servers", "broker-1:9092")
        .with_parameter("/prod/kafka_connect/", "log_level", "error");

    let mut provider = SsmConfigProvider::builder().with_store(store).build();

    // Hosts pass options as a loosely typed map.
    let mut options = HashMap::new();
    options.insert("environment".to_string(), config::Value::from("prod"));
    options.insert("ttl".to_string(), config::Value::from("30000"));
    provider.configure(&options)?;

    println!("Example 1: all parameters for 'kafka_connect'");
    println!("---------------------------------------------");
    let bundle = provider.get("kafka_connect")?;
    let mut entries: Vec<_> = bundle.data().iter().collect();
    entries.sort();
    for (key, value) in entries {
        println!("  {} = {}", key, value.as_deref().unwrap_or("<missing>"));
    }
    println!("  ttl: {:?}\n", bundle.ttl());

    println!("Example 2: filtered to two keys");
    println!("-------------------------------");
    let keys: HashSet<String> = ["region", "password"].iter().map(|k| k.to_string()).collect();
    let bundle = provider.get_filtered("kafka_connect", &keys)?;
    println!("  region   = {:?}", bundle.get("region"));
    println!("  password missing: {}\n", bundle.is_missing("password"));

    provider.close();
    println!("Provider state after close: {:?}", provider.state());

    Ok(())
}
