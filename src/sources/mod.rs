//! Parameter store clients and their construction.

mod factory;
mod memory;
mod parameter_store;

#[cfg(feature = "aws-ssm")]
mod ssm;

pub use factory::{DefaultStoreFactory, StoreFactory};
pub use memory::InMemoryParameterStore;
pub use parameter_store::{Parameter, ParameterStore, StoreError};

#[cfg(feature = "aws-ssm")]
pub use ssm::{SsmParameterStore, SsmParameterStoreBuilder};
