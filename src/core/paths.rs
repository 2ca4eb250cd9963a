//! Layer path construction.

use crate::core::ProviderSettings;
use crate::error::{ConfigError, Result};
use tracing::debug;

/// Segment naming the layer shared by every environment.
pub const GLOBAL_SEGMENT: &str = "global";

/// Join segments into a normalized store path: `/seg1/seg2/`.
///
/// Segments are used verbatim; an empty segment produces an empty path
/// component (`normalize(&["prod", ""])` is `/prod//`).
pub fn normalize(segments: &[&str]) -> String {
    format!("/{}/", segments.join("/"))
}

/// Turns a requested lookup path into the ordered list of layer paths.
///
/// The global layer always comes first and the most specific layer last:
///
/// | prefix | layers |
/// |--------|--------|
/// | on     | `/global/`, `/{env}/`, `/{env}/{path}/` |
/// | off    | `/global/`, `/{path}/` |
///
/// # Examples
///
/// ```rust
/// use ssm_config_provider::core::PathBuilder;
///
/// let builder = PathBuilder::new(Some("prod"), true);
/// assert_eq!(
///     builder.layer_paths("billing").unwrap(),
///     vec!["/global/", "/prod/", "/prod/billing/"]
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PathBuilder<'a> {
    environment: Option<&'a str>,
    add_environment_prefix: bool,
}

impl<'a> PathBuilder<'a> {
    /// Create a builder for the given environment and prefix flag.
    pub fn new(environment: Option<&'a str>, add_environment_prefix: bool) -> Self {
        Self {
            environment,
            add_environment_prefix,
        }
    }

    /// Create a builder from provider settings.
    pub fn from_settings(settings: &'a ProviderSettings) -> Self {
        Self::new(settings.environment(), settings.add_environment_prefix())
    }

    /// Build the layer paths for `path`, least specific first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvironment`] if prefixing is enabled but
    /// no environment is set.
    pub fn layer_paths(&self, path: &str) -> Result<Vec<String>> {
        let paths = if self.add_environment_prefix {
            let environment = self.environment.ok_or(ConfigError::MissingEnvironment)?;
            debug!(path, environment, "adding environment prefix to path");
            vec![
                normalize(&[GLOBAL_SEGMENT]),
                normalize(&[environment]),
                normalize(&[environment, path]),
            ]
        } else {
            vec![normalize(&[GLOBAL_SEGMENT]), normalize(&[path])]
        };

        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(&["global"]), "/global/");
        assert_eq!(normalize(&["unit-test", "path"]), "/unit-test/path/");
        assert_eq!(normalize(&["a/b"]), "/a/b/");
    }

    #[test]
    fn test_prefixed_layers() {
        let paths = PathBuilder::new(Some("unit-test"), true)
            .layer_paths("path")
            .unwrap();
        assert_eq!(paths, vec!["/global/", "/unit-test/", "/unit-test/path/"]);
    }

    #[test]
    fn test_unprefixed_layers() {
        let paths = PathBuilder::new(None, false).layer_paths("path").unwrap();
        assert_eq!(paths, vec!["/global/", "/path/"]);
    }

    #[test]
    fn test_unprefixed_ignores_environment() {
        let paths = PathBuilder::new(Some("prod"), false)
            .layer_paths("path")
            .unwrap();
        assert_eq!(paths, vec!["/global/", "/path/"]);
    }

    #[test]
    fn test_empty_path_is_verbatim() {
        let paths = PathBuilder::new(Some("prod"), true).layer_paths("").unwrap();
        assert_eq!(paths, vec!["/global/", "/prod/", "/prod//"]);

        let paths = PathBuilder::new(None, false).layer_paths("").unwrap();
        assert_eq!(paths, vec!["/global/", "//"]);
    }

    #[test]
    fn test_prefix_without_environment() {
        let result = PathBuilder::new(None, true).layer_paths("path");
        assert!(matches!(result, Err(ConfigError::MissingEnvironment)));
    }
}
