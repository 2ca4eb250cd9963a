//! Settings validation support.

use crate::error::ValidationError;

/// Trait for settings validation.
///
/// Provider settings implement this trait; `configure` refuses to commit
/// settings that fail validation and keeps the previous ones.
///
/// # Examples
///
/// ```rust
/// use ssm_config_provider::core::{ProviderSettings, Validate};
///
/// let settings = ProviderSettings::default();
/// assert!(settings.validate().is_err()); // prefixing is on, no environment yet
/// ```
pub trait Validate {
    /// Validate the settings.
    ///
    /// # Errors
    ///
    /// Should return a `ValidationError` describing what validation failed.
    fn validate(&self) -> Result<(), ValidationError>;
}
