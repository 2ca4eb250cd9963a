//! Parameter store client trait.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A single name/value pair stored directly under a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name, relative to the path it was fetched from.
    pub name: String,
    /// Decrypted parameter value.
    pub value: String,
}

impl Parameter {
    /// Create a new parameter.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Faults surfaced by a parameter store while fetching a path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The caller is not authorized to read the path.
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// The store rejected the request because of rate limiting.
    #[error("Request throttled: {0}")]
    Throttled(String),

    /// The request never produced a service response.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The store answered with an error not covered above.
    #[error("Service error {code}: {message}")]
    Service {
        /// Error code reported by the store
        code: String,
        /// Human-readable message reported by the store
        message: String,
    },

    /// Generic error for other cases.
    #[error("Parameter store error: {0}")]
    Other(String),
}

/// Client for a hierarchical parameter store.
///
/// Implement this trait to back the provider with a store other than AWS
/// Systems Manager, or to substitute a fake in tests.
///
/// # Contract
///
/// - `fetch` is non-recursive: only parameters stored directly under `path`
///   are returned.
/// - Values are returned decrypted.
/// - If the store paginates, `fetch` must follow continuation tokens until the
///   last page; a truncated result is indistinguishable from a complete one.
/// - An empty `Vec` means "nothing stored here", never "something failed".
pub trait ParameterStore: Send + Sync {
    /// Fetch every parameter stored directly under the normalized `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] for any access, throttling or transport fault.
    fn fetch(&self, path: &str) -> Result<Vec<Parameter>, StoreError>;

    /// Get a human-readable name for this store (for logging/debugging).
    fn name(&self) -> String;
}

impl<S: ParameterStore + ?Sized> ParameterStore for Arc<S> {
    fn fetch(&self, path: &str) -> Result<Vec<Parameter>, StoreError> {
        (**self).fetch(path)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

impl<S: ParameterStore + ?Sized> ParameterStore for Box<S> {
    fn fetch(&self, path: &str) -> Result<Vec<Parameter>, StoreError> {
        (**self).fetch(path)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}
