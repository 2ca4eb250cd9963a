//! The provider handed to the host: configure once, get many times, close.

use crate::core::{
    ConfigBundle, KeyFilter, LayerMerger, MissingKeyPolicy, PathBuilder, ProviderOptions,
    ProviderSettings,
};
use crate::error::{ConfigError, Result};
use crate::sources::{DefaultStoreFactory, ParameterStore, StoreFactory};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, trace};

/// Contract a host configuration framework drives.
///
/// `configure` is called once before use (and may be called again to
/// re-apply options), `get`/`get_filtered` any number of times, and `close`
/// once at shutdown.
pub trait ConfigProvider {
    /// Apply a loosely typed option map.
    ///
    /// # Errors
    ///
    /// Returns an error if the options are malformed, the settings are
    /// invalid, the store client cannot be built, or the provider is closed.
    fn configure(&mut self, options: &HashMap<String, config::Value>) -> Result<()>;

    /// Resolve every parameter visible at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is not configured, or any layer fetch
    /// fails.
    fn get(&self, path: &str) -> Result<ConfigBundle>;

    /// Resolve `path` and keep only `keys`. An empty set means no filtering.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    fn get_filtered(&self, path: &str, keys: &HashSet<String>) -> Result<ConfigBundle>;

    /// Release the provider. Calling it again has no effect.
    ///
    /// Closing drops the store client. The AWS store owns a tokio runtime,
    /// and dropping it from inside an async context panics, so call `close`
    /// from synchronous code or from within `tokio::task::spawn_blocking`.
    fn close(&mut self);
}

/// Lifecycle state of a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderState {
    /// Constructed, `configure` not yet successful.
    Unconfigured,
    /// Ready to serve `get`.
    Configured,
    /// Closed; the store client has been released.
    Closed,
}

/// Layered configuration provider backed by a parameter store.
///
/// Each `get` fetches the global layer, the environment layer (when
/// prefixing is on) and the path layer, in that order, and merges them so the
/// most specific layer wins. Nothing is cached between calls.
///
/// # Examples
///
/// ```rust
/// use ssm_config_provider::prelude::*;
/// use ssm_config_provider::sources::InMemoryParameterStore;
///
/// # fn example() -> Result<()> {
/// let store = InMemoryParameterStore::new()
///     .with_parameter("/global/", "log_level", "info")
///     .with_parameter("/prod/billing/", "log_level", "warn");
///
/// let mut provider = SsmConfigProvider::builder().with_store(store).build();
/// provider.configure_with(&ProviderOptions::new().with_environment("prod"))?;
///
/// let bundle = provider.get("billing")?;
/// assert_eq!(bundle.get("log_level"), Some("warn"));
///
/// provider.close();
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct SsmConfigProvider {
    state: ProviderState,
    settings: ProviderSettings,
    store: Option<Box<dyn ParameterStore>>,
    factory: Box<dyn StoreFactory>,
    filter: KeyFilter,
}

impl SsmConfigProvider {
    /// Create a provider that builds an AWS Systems Manager client on first
    /// configure.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new builder for constructing a provider.
    pub fn builder() -> SsmConfigProviderBuilder {
        SsmConfigProviderBuilder::new()
    }

    /// Apply typed options.
    ///
    /// The options are checked and the new settings validated before anything
    /// changes; on error the provider keeps its previous state and settings.
    /// A store client is built only if none is present yet, so an injected
    /// client survives any number of re-configures.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The provider is closed
    /// - Prefixing is enabled without an environment
    /// - The resulting settings fail validation
    /// - The store client cannot be built
    pub fn configure_with(&mut self, options: &ProviderOptions) -> Result<()> {
        if self.state == ProviderState::Closed {
            return Err(ConfigError::Closed);
        }

        let settings = self.settings.apply(options)?;

        if self.store.is_none() {
            debug!("creating parameter store client");
            self.store = Some(self.factory.create(options)?);
        }

        self.settings = settings;
        self.state = ProviderState::Configured;
        Ok(())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ProviderState {
        self.state
    }

    /// Settings in effect for `get`.
    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    /// Whether a store client is currently held.
    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Policy applied to requested keys no layer defines.
    pub fn missing_key_policy(&self) -> MissingKeyPolicy {
        self.filter.policy()
    }

    fn ready_store(&self) -> Result<&dyn ParameterStore> {
        match self.state {
            ProviderState::Unconfigured => Err(ConfigError::NotConfigured),
            ProviderState::Closed => Err(ConfigError::Closed),
            ProviderState::Configured => self.store.as_deref().ok_or(ConfigError::NotConfigured),
        }
    }

    fn resolve(&self, path: &str, keys: &HashSet<String>) -> Result<ConfigBundle> {
        let store = self.ready_store()?;

        let paths = PathBuilder::from_settings(&self.settings).layer_paths(path)?;
        let merged = LayerMerger::new(store).merge(&paths)?;
        let data = self.filter.apply(merged, keys);

        debug!(path, count = data.len(), "returning parameters");
        Ok(ConfigBundle::new(data, self.settings.ttl_millis()))
    }
}

impl ConfigProvider for SsmConfigProvider {
    fn configure(&mut self, options: &HashMap<String, config::Value>) -> Result<()> {
        trace!(?options, "configuring provider");
        let options = ProviderOptions::from_map(options)?;
        self.configure_with(&options)
    }

    fn get(&self, path: &str) -> Result<ConfigBundle> {
        debug!(path, "getting all parameters for path");
        self.resolve(path, &HashSet::new())
    }

    fn get_filtered(&self, path: &str, keys: &HashSet<String>) -> Result<ConfigBundle> {
        debug!(path, keys = keys.len(), "getting filtered parameters for path");
        self.resolve(path, keys)
    }

    fn close(&mut self) {
        if self.state == ProviderState::Closed {
            return;
        }

        info!(
            environment = self.settings.environment().unwrap_or_default(),
            "closing parameter store provider"
        );
        self.store = None;
        self.state = ProviderState::Closed;
    }
}

impl Default for SsmConfigProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing an `SsmConfigProvider`.
///
/// # Examples
///
/// ```rust
/// use ssm_config_provider::prelude::*;
/// use ssm_config_provider::sources::InMemoryParameterStore;
///
/// let provider = SsmConfigProvider::builder()
///     .with_store(InMemoryParameterStore::new())
///     .with_missing_key_policy(MissingKeyPolicy::Omit)
///     .build();
///
/// assert!(provider.has_store());
/// assert_eq!(provider.state(), ProviderState::Unconfigured);
/// ```
pub struct SsmConfigProviderBuilder {
    store: Option<Box<dyn ParameterStore>>,
    factory: Option<Box<dyn StoreFactory>>,
    missing_key_policy: MissingKeyPolicy,
}

impl SsmConfigProviderBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            store: None,
            factory: None,
            missing_key_policy: MissingKeyPolicy::default(),
        }
    }

    /// Inject the store client; the factory is then never called.
    pub fn with_store<S: ParameterStore + 'static>(mut self, store: S) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Replace the factory used to build a store client on first configure.
    pub fn with_store_factory<F: StoreFactory + 'static>(mut self, factory: F) -> Self {
        self.factory = Some(Box::new(factory));
        self
    }

    /// Set how requested-but-absent keys are reported.
    ///
    /// Default is [`MissingKeyPolicy::Marker`].
    pub fn with_missing_key_policy(mut self, policy: MissingKeyPolicy) -> Self {
        self.missing_key_policy = policy;
        self
    }

    /// Build the provider in the [`ProviderState::Unconfigured`] state.
    pub fn build(self) -> SsmConfigProvider {
        SsmConfigProvider {
            state: ProviderState::Unconfigured,
            settings: ProviderSettings::default(),
            store: self.store,
            factory: self
                .factory
                .unwrap_or_else(|| Box::new(DefaultStoreFactory)),
            filter: KeyFilter::new(self.missing_key_policy),
        }
    }
}

impl Default for SsmConfigProviderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
