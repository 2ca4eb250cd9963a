//! Resolved configuration returned to the host.

use crate::core::BundleData;
use serde::Serialize;
use std::time::Duration;

/// Resolved parameters paired with an advisory TTL.
///
/// The provider does not cache; the TTL only tells the host how long it may
/// reuse the bundle before asking again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigBundle {
    data: BundleData,
    ttl_millis: u64,
}

impl ConfigBundle {
    /// Create a bundle from resolved data and a TTL in milliseconds.
    pub fn new(data: BundleData, ttl_millis: u64) -> Self {
        Self { data, ttl_millis }
    }

    /// All entries, including missing-key markers.
    pub fn data(&self) -> &BundleData {
        &self.data
    }

    /// Value for `key`, or `None` if the key is absent or marked missing.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|value| value.as_deref())
    }

    /// Whether `key` was requested but not found in any layer.
    pub fn is_missing(&self, key: &str) -> bool {
        matches!(self.data.get(key), Some(None))
    }

    /// Number of entries, including missing-key markers.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the bundle has no entries.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Advisory TTL in milliseconds.
    pub fn ttl_millis(&self) -> u64 {
        self.ttl_millis
    }

    /// Advisory TTL.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_millis)
    }

    /// Take ownership of the entries.
    pub fn into_data(self) -> BundleData {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle() -> ConfigBundle {
        let mut data = BundleData::new();
        data.insert("key".to_string(), Some("snapped the frame".to_string()));
        data.insert("absent".to_string(), None);
        ConfigBundle::new(data, 500)
    }

    #[test]
    fn test_accessors() {
        let bundle = bundle();
        assert_eq!(bundle.get("key"), Some("snapped the frame"));
        assert_eq!(bundle.get("absent"), None);
        assert_eq!(bundle.get("never-requested"), None);
        assert_eq!(bundle.len(), 2);
        assert!(!bundle.is_empty());
    }

    #[test]
    fn test_missing_marker() {
        let bundle = bundle();
        assert!(bundle.is_missing("absent"));
        assert!(!bundle.is_missing("key"));
        assert!(!bundle.is_missing("never-requested"));
    }

    #[test]
    fn test_ttl() {
        let bundle = bundle();
        assert_eq!(bundle.ttl_millis(), 500);
        assert_eq!(bundle.ttl(), Duration::from_millis(500));
    }

    #[test]
    fn test_into_data() {
        let data = bundle().into_data();
        assert_eq!(data.len(), 2);
    }
}
