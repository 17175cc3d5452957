//! Loader for workspace configuration with YAML + environment overlays.
//!
//! The schema for `factlens.yaml` is small: a `backend` section pointing at
//! the verification service, a `logging` section, and a `ui` section. Every
//! field has a default, so a missing file or an empty one still yields a
//! usable configuration. `FACTLENS_`-prefixed environment variables override
//! file values, and `${VAR}` placeholders inside string values are expanded
//! recursively with a depth cap.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Deserialize, Default)]
pub struct FactlensConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Where the verification service lives.
#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    /// Origin of the `/verify` endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct LoggingConfig {
    /// Explicit log directory; `None` falls back to `FACTLENS_LOG_DIR` and
    /// then the per-user data dir.
    #[serde(default)]
    pub dir: Option<String>,
    /// "text" or "json".
    #[serde(default)]
    pub format: Option<String>,
    /// Mirror log events to stderr (corrupts the TUI; debugging only).
    #[serde(default)]
    pub stderr: bool,
}

#[derive(Debug, Deserialize)]
pub struct UiConfig {
    /// Redraw / spinner tick interval in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".into()
}

fn default_tick_ms() -> u64 {
    80
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct FactlensConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for FactlensConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FactlensConfigLoader {
    /// Start with sensible defaults: YAML file + `FACTLENS_` env overrides.
    ///
    /// ```
    /// use factlens_config::FactlensConfigLoader;
    ///
    /// let config = FactlensConfigLoader::new().load().expect("defaults load");
    /// assert_eq!(config.backend.base_url, "http://localhost:5000");
    /// assert_eq!(config.ui.tick_ms, 80);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Like [`with_file`](Self::with_file) but tolerates a missing file, so
    /// headless deployments can rely purely on environment variables.
    pub fn with_file_if_exists<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use factlens_config::FactlensConfigLoader;
    ///
    /// let cfg = FactlensConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// backend:
    ///   base_url: "http://checker.internal:5000"
    /// ui:
    ///   tick_ms: 40
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.backend.base_url, "http://checker.internal:5000");
    /// assert_eq!(cfg.ui.tick_ms, 40);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// The loader combines YAML snippets with `FACTLENS_`-prefixed environment
    /// variables and expands `${VAR}` placeholders before materialising
    /// strongly typed structs.
    pub fn load(self) -> Result<FactlensConfig, ConfigError> {
        // Environment goes last so `FACTLENS_` variables win over file values.
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("FACTLENS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        // Convert to serde_json::Value first so placeholders inside nested
        // values are expanded uniformly.
        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: FactlensConfig =
            serde_json::from_value(v).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}
