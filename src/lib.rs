//! # ssm-config-provider
//!
//! Layered configuration provider backed by AWS Systems Manager Parameter Store.
//!
//! ## Overview
//!
//! A lookup for `path` reads up to three layers from the parameter store and
//! merges them, most specific last:
//!
//! 1. `/global/` - shared by every environment
//! 2. `/{environment}/` - shared by everything in one environment
//! 3. `/{environment}/{path}/` - specific to the requested path
//!
//! With the environment prefix disabled the layers are `/global/` and
//! `/{path}/`. A parameter in a later layer overrides the same name from an
//! earlier one. The result can be narrowed to a set of keys and is returned
//! as a [`ConfigBundle`](core::ConfigBundle) carrying an advisory TTL.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ssm_config_provider::prelude::*;
//! use std::collections::HashMap;
//!
//! # fn example() -> ssm_config_provider::error::Result<()> {
//! let mut options = HashMap::new();
//! options.insert("environment".to_string(), config::Value::from("prod"));
//! options.insert("region".to_string(), config::Value::from("us-east-1"));
//!
//! let mut provider = SsmConfigProvider::new();
//! provider.configure(&options)?;
//!
//! let bundle = provider.get("kafka_connect")?;
//! println!("bootstrap servers: {:?}", bundle.get("bootstrap.servers"));
//!
//! provider.close();
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `aws-ssm` (default): build an AWS Systems Manager client on first
//!   configure. Without it, inject a store with
//!   [`SsmConfigProviderBuilder::with_store`](core::SsmConfigProviderBuilder::with_store).

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod sources;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{
        ConfigBundle, ConfigProvider, MissingKeyPolicy, ProviderOptions, ProviderState,
        SsmConfigProvider, SsmConfigProviderBuilder,
    };
    pub use crate::error::{ConfigError, Result};
    pub use crate::sources::{Parameter, ParameterStore, StoreError};
}
