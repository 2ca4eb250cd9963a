//! In-memory parameter store.

use super::{Parameter, ParameterStore, StoreError};
use std::collections::HashMap;
use std::sync::Mutex;

/// Parameter store backed by an in-process map.
///
/// Every call to [`fetch`](ParameterStore::fetch) is recorded, so tests can
/// assert on the exact layer paths the provider queried and their order.
/// Paths that were never populated return an empty set, matching how a real
/// store answers for an empty prefix.
///
/// # Examples
///
/// ```rust
/// use ssm_config_provider::sources::{InMemoryParameterStore, ParameterStore};
///
/// let store = InMemoryParameterStore::new()
///     .with_parameter("/global/", "region", "us-east-1")
///     .with_parameter("/prod/", "region", "eu-west-1");
///
/// let params = store.fetch("/prod/").unwrap();
/// assert_eq!(params[0].value, "eu-west-1");
/// assert_eq!(store.fetched_paths(), vec!["/prod/"]);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryParameterStore {
    layers: HashMap<String, Vec<Parameter>>,
    failures: HashMap<String, StoreError>,
    calls: Mutex<Vec<String>>,
}

impl InMemoryParameterStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a parameter under `path`.
    ///
    /// Parameters under the same path are returned in insertion order.
    pub fn with_parameter(
        mut self,
        path: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.layers
            .entry(path.into())
            .or_default()
            .push(Parameter::new(name, value));
        self
    }

    /// Make every fetch of `path` fail with `error`.
    pub fn with_failure(mut self, path: impl Into<String>, error: StoreError) -> Self {
        self.failures.insert(path.into(), error);
        self
    }

    /// Paths fetched so far, in call order.
    pub fn fetched_paths(&self) -> Vec<String> {
        match self.calls.lock() {
            Ok(calls) => calls.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn record(&self, path: &str) {
        let mut calls = match self.calls.lock() {
            Ok(calls) => calls,
            Err(poisoned) => poisoned.into_inner(),
        };
        calls.push(path.to_string());
    }
}

impl ParameterStore for InMemoryParameterStore {
    fn fetch(&self, path: &str) -> Result<Vec<Parameter>, StoreError> {
        self.record(path);

        if let Some(error) = self.failures.get(path) {
            return Err(error.clone());
        }

        Ok(self.layers.get(path).cloned().unwrap_or_default())
    }

    fn name(&self) -> String {
        "memory".to_string()
    }
}
