//! Startup configuration.
//!
//! Read once from the JSON file named by `BBOX_STUDIO_CONFIG`, defaults
//! otherwise. Nothing is written back.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::canvas::{DEFAULT_HANDLE_SIZE, MAX_SCALE, MIN_SCALE};
use crate::error::ConfigError;

pub const CONFIG_ENV: &str = "BBOX_STUDIO_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Resize handle hit zone in screen pixels.
    pub handle_size: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Initial confidence threshold for auto labelling.
    pub default_confidence: f32,
    /// Largest texture uploaded for display, `[width, height]`.
    pub max_texture_size: [u32; 2],
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            handle_size: DEFAULT_HANDLE_SIZE,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            default_confidence: 0.25,
            max_texture_size: [1920, 1080],
            log_level: LogLevel::default(),
        }
    }
}

impl AppConfig {
    pub fn from_json(path: &Path, text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &text)
    }

    /// Loads from `BBOX_STUDIO_CONFIG` when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.handle_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "handle_size must be positive, got {}",
                self.handle_size
            )));
        }
        let bounds = MIN_SCALE..=MAX_SCALE;
        if !(bounds.contains(&self.min_scale)
            && bounds.contains(&self.max_scale)
            && self.min_scale <= self.max_scale)
        {
            return Err(ConfigError::Invalid(format!(
                "scale limits must satisfy {MIN_SCALE} <= min_scale <= max_scale <= {MAX_SCALE}, got {}..{}",
                self.min_scale, self.max_scale
            )));
        }
        if !(0.0..=1.0).contains(&self.default_confidence) {
            return Err(ConfigError::Invalid(format!(
                "default_confidence must be within 0..=1, got {}",
                self.default_confidence
            )));
        }
        if self.max_texture_size.contains(&0) {
            return Err(ConfigError::Invalid("max_texture_size must be non-zero".into()));
        }
        Ok(())
    }
}
