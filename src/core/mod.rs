//! Core resolution pipeline and provider lifecycle.

mod bundle;
mod filter;
mod merger;
pub mod options;
mod paths;
mod provider;
mod settings;
mod validation;

pub use bundle::ConfigBundle;
pub use filter::{BundleData, KeyFilter, MissingKeyPolicy};
pub use merger::{LayerMerger, MergedConfig};
pub use options::ProviderOptions;
pub use paths::{GLOBAL_SEGMENT, PathBuilder, normalize};
pub use provider::{ConfigProvider, ProviderState, SsmConfigProvider, SsmConfigProviderBuilder};
pub use settings::{DEFAULT_TTL_MILLIS, ProviderSettings};
pub use validation::Validate;
