//! Key filtering of merged parameters.

use crate::core::MergedConfig;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Bundle data: `None` marks a requested key the store did not have.
pub type BundleData = HashMap<String, Option<String>>;

/// What to do with a requested key that no layer defined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingKeyPolicy {
    /// Keep the key with a `None` value.
    #[default]
    Marker,
    /// Leave the key out of the result.
    Omit,
}

/// Narrows merged parameters to a requested key set.
///
/// An empty key set means "no filtering": every merged parameter is kept.
///
/// # Examples
///
/// ```rust
/// use ssm_config_provider::core::{KeyFilter, MergedConfig, MissingKeyPolicy};
/// use std::collections::HashSet;
///
/// let mut merged = MergedConfig::new();
/// merged.insert("user".to_string(), "admin".to_string());
/// merged.insert("host".to_string(), "db".to_string());
///
/// let keys: HashSet<String> = ["user", "password"].iter().map(|k| k.to_string()).collect();
/// let data = KeyFilter::new(MissingKeyPolicy::Marker).apply(merged, &keys);
///
/// assert_eq!(data.len(), 2);
/// assert_eq!(data["user"].as_deref(), Some("admin"));
/// assert_eq!(data["password"], None);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyFilter {
    policy: MissingKeyPolicy,
}

impl KeyFilter {
    /// Create a filter with the given missing-key policy.
    pub fn new(policy: MissingKeyPolicy) -> Self {
        Self { policy }
    }

    /// The policy applied to absent keys.
    pub fn policy(&self) -> MissingKeyPolicy {
        self.policy
    }

    /// Filter `merged` down to `keys`.
    pub fn apply(&self, mut merged: MergedConfig, keys: &HashSet<String>) -> BundleData {
        if keys.is_empty() {
            return merged.into_iter().map(|(k, v)| (k, Some(v))).collect();
        }

        let mut data = BundleData::with_capacity(keys.len());
        let mut missing = 0usize;

        for key in keys {
            match merged.remove(key) {
                Some(value) => {
                    data.insert(key.clone(), Some(value));
                }
                None => {
                    missing += 1;
                    if self.policy == MissingKeyPolicy::Marker {
                        data.insert(key.clone(), None);
                    }
                }
            }
        }

        debug!(
            requested = keys.len(),
            returned = data.len(),
            missing,
            policy = ?self.policy,
            "filtered parameters"
        );
        data
    }
}
