//! Construction of parameter store clients.

use super::ParameterStore;
use crate::core::ProviderOptions;
use crate::error::Result;

/// Builds the parameter store client when none was injected.
///
/// The provider calls the factory at most once, during the first successful
/// `configure`. Any closure with the matching signature is a factory.
///
/// # Examples
///
/// ```rust
/// use ssm_config_provider::core::ProviderOptions;
/// use ssm_config_provider::error::Result;
/// use ssm_config_provider::sources::{InMemoryParameterStore, ParameterStore, StoreFactory};
///
/// let factory = |_options: &ProviderOptions| -> Result<Box<dyn ParameterStore>> {
///     Ok(Box::new(InMemoryParameterStore::new()))
/// };
/// let store = factory.create(&ProviderOptions::new()).unwrap();
/// assert_eq!(store.name(), "memory");
/// ```
pub trait StoreFactory: Send + Sync {
    /// Create a store client for the given options.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be constructed.
    fn create(&self, options: &ProviderOptions) -> Result<Box<dyn ParameterStore>>;
}

impl<F> StoreFactory for F
where
    F: Fn(&ProviderOptions) -> Result<Box<dyn ParameterStore>> + Send + Sync,
{
    fn create(&self, options: &ProviderOptions) -> Result<Box<dyn ParameterStore>> {
        self(options)
    }
}

/// Factory producing an AWS Systems Manager client.
///
/// Uses the default AWS credential and region chain, with the `region` option
/// taking precedence when supplied. Without the `aws-ssm` feature this
/// factory always fails, so a store must be injected instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultStoreFactory;

impl StoreFactory for DefaultStoreFactory {
    #[cfg(feature = "aws-ssm")]
    fn create(&self, options: &ProviderOptions) -> Result<Box<dyn ParameterStore>> {
        let mut builder = super::SsmParameterStore::builder();
        if let Some(region) = options.region() {
            tracing::debug!(region, "using region from configuration");
            builder = builder.with_region(region);
        }
        Ok(Box::new(builder.build()?))
    }

    #[cfg(not(feature = "aws-ssm"))]
    fn create(&self, _options: &ProviderOptions) -> Result<Box<dyn ParameterStore>> {
        Err(crate::error::ConfigError::FeatureNotEnabled("aws-ssm"))
    }
}
