//! Client configuration: return format, construction options and defaults.
//!
//! # Design
//! `ClientConfig` is fixed once the client is built. Options arrive as a
//! loose JSON mapping so callers can forward configuration they did not
//! validate themselves; only `"verbose"` with a boolean value is honoured and
//! everything else is dropped without error.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::RestError;

/// User agent sent when the caller supplies none.
pub const DEFAULT_USER_AGENT: &str =
    concat!("rest-client/", env!("CARGO_PKG_VERSION"), " (ureq)");

/// Option key toggling verbose mode.
pub const OPTION_VERBOSE: &str = "verbose";

/// Format the caller wants responses returned in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReturnFormat {
    #[default]
    Json,
}

impl ReturnFormat {
    /// Name of a format that is recognised by name but never accepted.
    pub const ARRAY: &'static str = "array";

    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnFormat::Json => "json",
        }
    }

    /// Resolve an optional, possibly blank value. Blank means the default.
    pub fn resolve(value: Option<&str>) -> Result<Self, RestError> {
        match value {
            Some(v) if !v.trim().is_empty() => v.parse(),
            _ => Ok(ReturnFormat::default()),
        }
    }
}

impl FromStr for ReturnFormat {
    type Err = RestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(ReturnFormat::Json),
            other => Err(RestError::unsupported_format(other)),
        }
    }
}

impl fmt::Display for ReturnFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recognised construction options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientOptions {
    pub verbose: bool,
}

impl ClientOptions {
    /// Pick recognised keys out of `options`. Unknown keys and values of the
    /// wrong type are skipped.
    pub fn from_map(options: &Map<String, Value>) -> Self {
        let mut parsed = ClientOptions::default();
        for (key, value) in options {
            match (key.as_str(), value) {
                (OPTION_VERBOSE, Value::Bool(verbose)) => parsed.verbose = *verbose,
                _ => tracing::debug!(key = %key, value = %value, "ignoring client option"),
            }
        }
        parsed
    }
}

/// Validated client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
    pub return_format: ReturnFormat,
    pub verbose: bool,
}

impl ClientConfig {
    /// Validate raw construction inputs.
    pub fn new(
        base_url: &str,
        return_format: Option<&str>,
        user_agent: Option<&str>,
        options: &Map<String, Value>,
    ) -> Result<Self, RestError> {
        if base_url.trim().is_empty() {
            return Err(RestError::missing_url());
        }
        let return_format = ReturnFormat::resolve(return_format)?;
        let user_agent = match user_agent {
            Some(ua) if !ua.trim().is_empty() => ua.to_string(),
            _ => DEFAULT_USER_AGENT.to_string(),
        };
        let options = ClientOptions::from_map(options);

        Ok(Self {
            base_url: base_url.to_string(),
            user_agent,
            return_format,
            verbose: options.verbose,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn options(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn return_format_defaults_when_absent_or_blank() {
        assert_eq!(ReturnFormat::resolve(None).unwrap(), ReturnFormat::Json);
        assert_eq!(ReturnFormat::resolve(Some("  ")).unwrap(), ReturnFormat::Json);
        assert_eq!(ReturnFormat::resolve(Some("json")).unwrap(), ReturnFormat::Json);
    }

    #[test]
    fn return_format_rejects_everything_else() {
        for value in ["xml", "JSON", ReturnFormat::ARRAY] {
            let err = ReturnFormat::resolve(Some(value)).unwrap_err();
            assert!(matches!(err, RestError::Configuration(_)), "{value}");
        }
    }

    #[test]
    fn verbose_option_accepts_booleans_only() {
        assert!(ClientOptions::from_map(&options(json!({"verbose": true}))).verbose);
        assert!(!ClientOptions::from_map(&options(json!({"verbose": false}))).verbose);
        assert!(!ClientOptions::from_map(&options(json!({"verbose": "yes"}))).verbose);
        assert!(!ClientOptions::from_map(&options(json!({"verbose": 1}))).verbose);
    }

    #[test]
    fn unknown_options_are_ignored() {
        let parsed = ClientOptions::from_map(&options(json!({"timeout": 5, "verbose": true})));
        assert_eq!(parsed, ClientOptions { verbose: true });
    }

    #[test]
    fn config_requires_url() {
        for url in ["", "   "] {
            let err = ClientConfig::new(url, None, None, &Map::new()).unwrap_err();
            assert!(matches!(err, RestError::Configuration(_)));
        }
    }

    #[test]
    fn config_defaults_user_agent() {
        let config = ClientConfig::new("http://example.com", None, Some(" "), &Map::new()).unwrap();
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert!(config.user_agent.contains(env!("CARGO_PKG_VERSION")));
        assert!(!config.verbose);
    }

    #[test]
    fn config_keeps_custom_user_agent() {
        let config =
            ClientConfig::new("http://example.com", Some("json"), Some("agent/1.0"), &Map::new())
                .unwrap();
        assert_eq!(config.user_agent, "agent/1.0");
        assert_eq!(config.return_format, ReturnFormat::Json);
    }
}
