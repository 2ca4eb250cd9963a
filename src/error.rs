//! Error types for ssm-config-provider.

use crate::sources::StoreError;

/// Result type alias for ssm-config-provider operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while configuring the provider or resolving a path.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An option was supplied with a value that cannot be coerced to its type.
    #[error("Invalid value for option '{option}': {reason}")]
    InvalidOption {
        /// The option name as recognized by the provider
        option: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Environment prefixing is enabled but no environment was supplied.
    #[error("Option 'environment' is required when 'addEnvironmentPrefix' is enabled")]
    MissingEnvironment,

    /// Settings validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// The parameter store failed while fetching one layer.
    #[error("Failed to fetch parameters for path '{path}': {source}")]
    RemoteFetch {
        /// The normalized layer path that was being fetched
        path: String,
        /// The fault reported by the store
        #[source]
        source: StoreError,
    },

    /// Caller input had the wrong shape.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// `get` was called before `configure`.
    #[error("Provider has not been configured")]
    NotConfigured,

    /// The provider was used after `close`.
    #[error("Provider has been closed")]
    Closed,

    /// The parameter store client could not be constructed.
    #[error("Failed to build parameter store client: {0}")]
    ClientBuild(String),

    /// Attempted to use a feature that is not enabled.
    #[error("Feature not enabled: {0}")]
    FeatureNotEnabled(&'static str),

    /// Failed to load provider options from a file or the environment.
    #[error("Failed to load options: {0}")]
    LoadError(String),
}

impl ConfigError {
    pub(crate) fn invalid_option(option: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option,
            reason: reason.into(),
        }
    }
}

/// A settings value that failed validation.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// A specific field has an invalid value.
    #[error("Field '{field}' is invalid: {reason}")]
    InvalidField {
        /// The setting name
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// More than one field failed.
    #[error("Multiple validation errors:\n{}", numbered(.0))]
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Create an invalid field error.
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Fold collected failures into a single result.
    ///
    /// No failures is `Ok`, one is returned as is, and several are wrapped in
    /// [`Multiple`](Self::Multiple).
    pub fn check(mut errors: Vec<ValidationError>) -> std::result::Result<(), Self> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(Self::Multiple(errors)),
        }
    }
}

fn numbered(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {}", i + 1, err))
        .collect::<Vec<_>>()
        .join("\n")
}

impl From<ValidationError> for ConfigError {
    fn from(err: ValidationError) -> Self {
        ConfigError::ValidationError(err.to_string())
    }
}
