//! Typed provider options parsed from a host option map.

use crate::error::{ConfigError, Result};
use config::{Environment, File, Value, ValueKind};
use std::collections::HashMap;
use std::path::Path;
use tracing::trace;

/// Option name for the AWS region forwarded to client construction.
pub const REGION: &str = "region";
/// Option name for the bundle TTL, in milliseconds.
pub const TTL: &str = "ttl";
/// Option name for the environment prefix toggle.
pub const ADD_ENVIRONMENT_PREFIX: &str = "addEnvironmentPrefix";
/// Option name for the environment path segment.
pub const ENVIRONMENT: &str = "environment";

/// Options recognized by the provider.
///
/// Hosts hand the provider a loosely typed map; [`from_map`](Self::from_map)
/// coerces it once, up front, so the rest of the provider only sees typed
/// values. Option names are matched ignoring ASCII case, `_` and `-`, so
/// `addEnvironmentPrefix`, `add_environment_prefix` and
/// `ADD-ENVIRONMENT-PREFIX` are the same option.
///
/// # Examples
///
/// ```rust
/// use ssm_config_provider::core::ProviderOptions;
/// use std::collections::HashMap;
///
/// let mut map = HashMap::new();
/// map.insert("environment".to_string(), config::Value::from("prod"));
/// map.insert("ttl".to_string(), config::Value::from("500"));
///
/// let options = ProviderOptions::from_map(&map).unwrap();
/// assert_eq!(options.ttl_millis(), Some(500));
/// assert_eq!(options.environment(), Some("prod"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderOptions {
    region: Option<String>,
    ttl_millis: Option<u64>,
    add_environment_prefix: Option<bool>,
    environment: Option<String>,
}

impl ProviderOptions {
    /// Create an empty set of options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a host-supplied map.
    ///
    /// Entries whose value is nil count as absent. Unrecognized names are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `ttl` is not a non-negative integer (or a string holding one)
    /// - `addEnvironmentPrefix` is not a boolean or `"true"`/`"false"`
    /// - a recognized option holds a table or array
    /// - the same option is supplied twice under different spellings
    pub fn from_map(map: &HashMap<String, Value>) -> Result<Self> {
        let mut options = Self::new();
        let mut seen: HashMap<&'static str, &str> = HashMap::new();

        for (key, value) in map {
            let Some(option) = OptionName::parse(key) else {
                trace!(option = %key, "ignoring unrecognized option");
                continue;
            };
            let name = option.as_str();

            if let Some(previous) = seen.insert(name, key) {
                return Err(ConfigError::InvalidArgument(format!(
                    "option '{}' supplied more than once (as '{}' and '{}')",
                    name, previous, key
                )));
            }

            if matches!(value.kind, ValueKind::Nil) {
                continue;
            }
            ensure_scalar(name, value)?;

            match option {
                OptionName::Region => options.region = Some(string_value(name, value)?),
                OptionName::Ttl => options.ttl_millis = Some(ttl_value(value)?),
                OptionName::AddEnvironmentPrefix => {
                    options.add_environment_prefix = Some(bool_value(value)?)
                }
                OptionName::Environment => options.environment = Some(string_value(name, value)?),
            }
        }

        Ok(options)
    }

    /// Load options from a YAML, TOML or JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, has an unsupported extension,
    /// cannot be parsed, or holds invalid option values.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use ssm_config_provider::core::ProviderOptions;
    ///
    /// let options = ProviderOptions::from_file("config/provider.yaml").unwrap();
    /// ```
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        validate_extension(path)?;

        if !path.exists() {
            return Err(ConfigError::LoadError(format!(
                "Options file not found: {}",
                path.display()
            )));
        }

        let loaded = config::Config::builder()
            .add_source(File::from(path).required(true))
            .build()
            .map_err(|e| ConfigError::LoadError(format!("Failed to load file: {}", e)))?;

        let map = loaded
            .try_deserialize::<HashMap<String, Value>>()
            .map_err(|e| ConfigError::LoadError(format!("Failed to parse file: {}", e)))?;

        Self::from_map(&map)
    }

    /// Load options from environment variables sharing a prefix.
    ///
    /// `SSM_TTL=500` and `SSM_ADD_ENVIRONMENT_PREFIX=false` are read as `ttl`
    /// and `addEnvironmentPrefix` with the prefix `"SSM"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the variables cannot be read or hold invalid values.
    pub fn from_env(prefix: &str) -> Result<Self> {
        let loaded = config::Config::builder()
            .add_source(Environment::with_prefix(prefix))
            .build()
            .map_err(|e| {
                ConfigError::LoadError(format!("Failed to load environment variables: {}", e))
            })?;

        let map = loaded
            .try_deserialize::<HashMap<String, Value>>()
            .map_err(|e| {
                ConfigError::LoadError(format!("Failed to parse environment variables: {}", e))
            })?;

        Self::from_map(&map)
    }

    /// Set the AWS region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the bundle TTL in milliseconds.
    pub fn with_ttl_millis(mut self, ttl_millis: u64) -> Self {
        self.ttl_millis = Some(ttl_millis);
        self
    }

    /// Enable or disable the environment prefix.
    pub fn with_add_environment_prefix(mut self, enabled: bool) -> Self {
        self.add_environment_prefix = Some(enabled);
        self
    }

    /// Set the environment path segment.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// The AWS region, if supplied.
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// The TTL in milliseconds, if supplied.
    pub fn ttl_millis(&self) -> Option<u64> {
        self.ttl_millis
    }

    /// The environment prefix toggle, if supplied.
    pub fn add_environment_prefix(&self) -> Option<bool> {
        self.add_environment_prefix
    }

    /// The environment segment, if supplied.
    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    /// Convert back into a host option map using the canonical option names.
    pub fn into_map(self) -> HashMap<String, Value> {
        let mut map = HashMap::new();
        if let Some(region) = self.region {
            map.insert(REGION.to_string(), Value::new(None, ValueKind::String(region)));
        }
        if let Some(ttl) = self.ttl_millis {
            map.insert(TTL.to_string(), Value::new(None, ValueKind::U64(ttl)));
        }
        if let Some(enabled) = self.add_environment_prefix {
            map.insert(
                ADD_ENVIRONMENT_PREFIX.to_string(),
                Value::new(None, ValueKind::Boolean(enabled)),
            );
        }
        if let Some(environment) = self.environment {
            map.insert(
                ENVIRONMENT.to_string(),
                Value::new(None, ValueKind::String(environment)),
            );
        }
        map
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OptionName {
    Region,
    Ttl,
    AddEnvironmentPrefix,
    Environment,
}

impl OptionName {
    /// Match a supplied option name, ignoring ASCII case, `_` and `-`.
    fn parse(key: &str) -> Option<Self> {
        let folded: String = key
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match folded.as_str() {
            "region" => Some(Self::Region),
            "ttl" => Some(Self::Ttl),
            "addenvironmentprefix" => Some(Self::AddEnvironmentPrefix),
            "environment" => Some(Self::Environment),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Region => REGION,
            Self::Ttl => TTL,
            Self::AddEnvironmentPrefix => ADD_ENVIRONMENT_PREFIX,
            Self::Environment => ENVIRONMENT,
        }
    }
}

fn ensure_scalar(option: &'static str, value: &Value) -> Result<()> {
    match value.kind {
        ValueKind::Table(_) | ValueKind::Array(_) => Err(ConfigError::InvalidArgument(format!(
            "option '{}' must be a scalar value",
            option
        ))),
        _ => Ok(()),
    }
}

fn string_value(option: &'static str, value: &Value) -> Result<String> {
    value
        .clone()
        .into_string()
        .map_err(|e| ConfigError::invalid_option(option, e.to_string()))
}

fn ttl_value(value: &Value) -> Result<u64> {
    match &value.kind {
        ValueKind::U64(n) => Ok(*n),
        ValueKind::I64(n) => u64::try_from(*n)
            .map_err(|_| ConfigError::invalid_option(TTL, format!("{} is negative", n))),
        ValueKind::U128(n) => u64::try_from(*n)
            .map_err(|_| ConfigError::invalid_option(TTL, format!("{} is too large", n))),
        ValueKind::I128(n) => u64::try_from(*n)
            .map_err(|_| ConfigError::invalid_option(TTL, format!("{} is out of range", n))),
        ValueKind::String(s) => s.trim().parse::<u64>().map_err(|e| {
            ConfigError::invalid_option(
                TTL,
                format!("'{}' is not a number of milliseconds: {}", s, e),
            )
        }),
        other => Err(ConfigError::invalid_option(
            TTL,
            format!("expected an integer, got {:?}", other),
        )),
    }
}

fn bool_value(value: &Value) -> Result<bool> {
    match &value.kind {
        ValueKind::Boolean(b) => Ok(*b),
        ValueKind::String(s) => {
            let trimmed = s.trim();
            if trimmed.eq_ignore_ascii_case("true") {
                Ok(true)
            } else if trimmed.eq_ignore_ascii_case("false") {
                Ok(false)
            } else {
                Err(ConfigError::invalid_option(
                    ADD_ENVIRONMENT_PREFIX,
                    format!("'{}' is not 'true' or 'false'", s),
                ))
            }
        }
        other => Err(ConfigError::invalid_option(
            ADD_ENVIRONMENT_PREFIX,
            format!("expected a boolean, got {:?}", other),
        )),
    }
}

fn validate_extension(path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| {
            ConfigError::LoadError(format!(
                "Unable to determine file format for: {}",
                path.display()
            ))
        })?;

    match extension {
        "yaml" | "yml" | "toml" | "json" => Ok(()),
        _ => Err(ConfigError::LoadError(format!(
            "Unsupported file extension: {}. Supported: .yaml, .yml, .toml, .json",
            extension
        ))),
    }
}
