//! Layer merging across parameter store paths.

use crate::error::{ConfigError, Result};
use crate::sources::{Parameter, ParameterStore};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Parameters accumulated across every queried layer, keyed by name.
pub type MergedConfig = HashMap<String, String>;

/// Fetches layer paths in order and folds them into one map.
///
/// Layers are merged in the order given, so a parameter in a later layer
/// overrides the same name from any earlier layer. Names that appear in a
/// single layer pass through unchanged.
pub struct LayerMerger<'a> {
    store: &'a dyn ParameterStore,
}

impl<'a> LayerMerger<'a> {
    /// Create a merger that reads from `store`.
    pub fn new(store: &'a dyn ParameterStore) -> Self {
        Self { store }
    }

    /// Fetch and merge every path, least specific first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RemoteFetch`] for the first layer the store
    /// fails to return. Layers after it are not fetched and no partial map
    /// is returned.
    pub fn merge<P: AsRef<str>>(&self, paths: &[P]) -> Result<MergedConfig> {
        let mut merged = MergedConfig::new();

        for path in paths {
            let path = path.as_ref();
            debug!(path, store = %self.store.name(), "getting parameters for path");

            let parameters = self
                .store
                .fetch(path)
                .map_err(|source| ConfigError::RemoteFetch {
                    path: path.to_string(),
                    source,
                })?;
            debug!(path, count = parameters.len(), "found parameters for path");

            for Parameter { name, value } in parameters {
                if merged.contains_key(&name) {
                    trace!(path, key = %name, "layer overrides earlier value");
                }
                merged.insert(name, value);
            }
        }

        debug!(layers = paths.len(), keys = merged.len(), "merged all parameters");
        Ok(merged)
    }
}
