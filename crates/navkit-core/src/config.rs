#![forbid(unsafe_code)]

//! Configuration lookups.
//!
//! The coordinator reads two boolean switches:
//!
//! | key                   | default | effect |
//! |-----------------------|---------|--------|
//! | `disableScrollAssist` | `false` | forward scroll disabling to the app root |
//! | `navExitApp`          | `true`  | exit the app when back has nothing to pop |
//!
//! plus `disableGraceMs` (default 700), the fallback window a transition
//! keeps the gate disabled.
//!
//! Values come from any [`ConfigSource`]: the typed [`NavConfig`] or a loose
//! string-keyed [`ConfigMap`]. With the `policy-config` feature `NavConfig`
//! can also be parsed from TOML or JSON.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

pub const DISABLE_SCROLL_ASSIST: &str = "disableScrollAssist";
pub const NAV_EXIT_APP: &str = "navExitApp";
pub const DISABLE_GRACE_MS: &str = "disableGraceMs";

/// Read-only key/value configuration.
pub trait ConfigSource {
    /// Boolean lookup; `default` when the key is missing or not a boolean.
    fn get_bool(&self, key: &str, default: bool) -> bool;

    /// Numeric lookup; `default` when the key is missing or not a number.
    fn get_number(&self, _key: &str, default: f64) -> f64 {
        default
    }
}

/// Typed coordinator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavConfig {
    /// Forward `set_disable_scroll` to the app root.
    pub disable_scroll_assist: bool,
    /// Exit the application when a back signal finds nothing to pop.
    pub nav_exit_app: bool,
    /// Gate grace window for transitions that do not specify a duration.
    pub disable_grace_ms: u64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            disable_scroll_assist: false,
            nav_exit_app: true,
            disable_grace_ms: 700,
        }
    }
}

impl NavConfig {
    /// Build a typed config from any source, falling back to defaults.
    pub fn from_source(source: &dyn ConfigSource) -> Self {
        let defaults = Self::default();
        let grace = source.get_number(DISABLE_GRACE_MS, defaults.disable_grace_ms as f64);
        Self {
            disable_scroll_assist: source
                .get_bool(DISABLE_SCROLL_ASSIST, defaults.disable_scroll_assist),
            nav_exit_app: source.get_bool(NAV_EXIT_APP, defaults.nav_exit_app),
            disable_grace_ms: crate::gate::clamp_millis(grace).as_millis() as u64,
        }
    }

    /// Parse from a TOML document.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(doc: &str) -> Result<Self, crate::NavError> {
        toml::from_str(doc).map_err(|e| crate::NavError::Config(e.to_string()))
    }

    /// Parse from a JSON document.
    #[cfg(feature = "policy-config")]
    pub fn from_json_str(doc: &str) -> Result<Self, crate::NavError> {
        serde_json::from_str(doc).map_err(|e| crate::NavError::Config(e.to_string()))
    }

    /// The grace window as a [`Duration`](std::time::Duration).
    #[must_use]
    pub fn disable_grace(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.disable_grace_ms)
    }
}

impl ConfigSource for NavConfig {
    fn get_bool(&self, key: &str, default: bool) -> bool {
        match key {
            DISABLE_SCROLL_ASSIST => self.disable_scroll_assist,
            NAV_EXIT_APP => self.nav_exit_app,
            _ => default,
        }
    }

    fn get_number(&self, key: &str, default: f64) -> f64 {
        match key {
            DISABLE_GRACE_MS => self.disable_grace_ms as f64,
            _ => default,
        }
    }
}

/// A loosely typed configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Number(f64),
    Str(String),
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

/// String-keyed configuration, e.g. values collected from markup attributes
/// or query parameters.
///
/// Booleans accept `true`/`false` values as well as the strings `"true"` and
/// `"false"`; numbers accept numeric values and numeric strings.
#[derive(Debug, Clone, Default)]
pub struct ConfigMap {
    values: AHashMap<String, ConfigValue>,
}

impl ConfigMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Raw lookup.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }
}

impl ConfigSource for ConfigMap {
    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.values.get(key) {
            Some(ConfigValue::Bool(v)) => *v,
            Some(ConfigValue::Str(s)) => match s.trim() {
                "true" => true,
                "false" => false,
                _ => default,
            },
            Some(ConfigValue::Number(n)) if n.is_nan() => default,
            Some(ConfigValue::Number(n)) => *n != 0.0,
            None => default,
        }
    }

    fn get_number(&self, key: &str, default: f64) -> f64 {
        match self.values.get(key) {
            Some(ConfigValue::Number(n)) if n.is_finite() => *n,
            Some(ConfigValue::Str(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .unwrap_or(default),
            _ => default,
        }
    }
}
