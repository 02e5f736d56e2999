//! Shared configuration loader for the smartscript tools.
//!
//! `defaults/smartscript.default.toml` is embedded into every binary so that docs and runtime
//! behavior stay in sync. Applications layer user-specific files on top of those defaults via
//! [`Loader`] before deserializing into [`SmartScriptConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use smartscript_core::boolean::OperatorStyle;
use smartscript_core::script::EngineOptions;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/smartscript.default.toml");

/// Top-level configuration consumed by smartscript applications.
#[derive(Debug, Clone, Deserialize)]
pub struct SmartScriptConfig {
    pub script: ScriptConfig,
    pub minimizer: MinimizerConfig,
    pub inspect: InspectConfig,
}

/// Knobs of the template engine.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptConfig {
    pub max_loop_iterations: u64,
    pub mime_type: String,
}

impl ScriptConfig {
    pub fn engine_options(&self) -> EngineOptions {
        match self.max_loop_iterations {
            0 => EngineOptions::default(),
            limit => EngineOptions::with_max_loop_iterations(limit),
        }
    }
}

/// Controls how minimizer results are printed.
#[derive(Debug, Clone, Deserialize)]
pub struct MinimizerConfig {
    pub operator_style: OperatorStyle,
    pub max_forms: usize,
    pub show_primes: bool,
}

impl MinimizerConfig {
    /// Applies `max_forms` to a list of forms
    pub fn limit_forms<T>(&self, mut forms: Vec<T>) -> Vec<T> {
        if self.max_forms > 0 {
            forms.truncate(self.max_forms);
        }
        forms
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InspectConfig {
    pub format: String,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<SmartScriptConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<SmartScriptConfig, ConfigError> {
    Loader::new().build()
}
