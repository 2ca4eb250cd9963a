//! Provider settings applied by `configure`.

use crate::core::{ProviderOptions, Validate};
use crate::error::{ConfigError, Result, ValidationError};
use std::time::Duration;
use tracing::info;

/// Default bundle TTL: one hour.
pub const DEFAULT_TTL_MILLIS: u64 = 60 * 60 * 1000;

/// Settings consulted by every `get`.
///
/// Fresh settings use the default TTL, enable the environment prefix and
/// carry no environment; they only become usable once
/// [`apply`](Self::apply) supplies an environment (or disables prefixing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    ttl_millis: u64,
    environment: Option<String>,
    add_environment_prefix: bool,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            ttl_millis: DEFAULT_TTL_MILLIS,
            environment: None,
            add_environment_prefix: true,
        }
    }
}

impl ProviderSettings {
    /// Compute the settings that result from applying `options` on top of
    /// these ones.
    ///
    /// - `ttl` and `addEnvironmentPrefix` replace the current values only
    ///   when supplied.
    /// - When the resulting prefix flag is on, `environment` is read from
    ///   `options` on every call; a missing or blank environment fails.
    /// - When the prefix flag is off, the previous environment is kept but
    ///   unused.
    ///
    /// `self` is left untouched, so a failed apply never leaves partial
    /// settings behind.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvironment`] if prefixing is on without
    /// an environment, or a validation error if the result is invalid.
    pub fn apply(&self, options: &ProviderOptions) -> Result<Self> {
        let mut next = self.clone();

        if let Some(ttl_millis) = options.ttl_millis() {
            info!(ttl_millis, "using ttl from configuration");
            next.ttl_millis = ttl_millis;
        }

        if let Some(enabled) = options.add_environment_prefix() {
            info!(enabled, "using addEnvironmentPrefix from configuration");
            next.add_environment_prefix = enabled;
        }

        if next.add_environment_prefix {
            let environment = options
                .environment()
                .filter(|env| !env.trim().is_empty())
                .ok_or(ConfigError::MissingEnvironment)?;
            info!(environment, "configuring provider for environment");
            next.environment = Some(environment.to_string());
        }

        next.validate()?;
        Ok(next)
    }

    /// TTL attached to every bundle, in milliseconds.
    pub fn ttl_millis(&self) -> u64 {
        self.ttl_millis
    }

    /// TTL attached to every bundle.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_millis)
    }

    /// The environment segment, if one has been configured.
    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    /// Whether lookups are scoped under the environment segment.
    pub fn add_environment_prefix(&self) -> bool {
        self.add_environment_prefix
    }
}

impl Validate for ProviderSettings {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        let mut errors = Vec::new();

        if self.ttl_millis == 0 {
            errors.push(ValidationError::invalid_field(
                "ttl",
                "must be a positive number of milliseconds",
            ));
        }

        if self.add_environment_prefix && self.environment.is_none() {
            errors.push(ValidationError::invalid_field(
                "environment",
                "required when addEnvironmentPrefix is enabled",
            ));
        }

        ValidationError::check(errors)
    }
}
