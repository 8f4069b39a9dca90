//! Configuration for model loading and preprocessing

use serde::Deserialize;
use std::path::PathBuf;

use crate::error::Result;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub preprocess: PreprocessConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    /// OpenVINO device name, e.g. "CPU" or "GPU"
    pub device: String,
}

/// Model files; a missing entry disables that model.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelsConfig {
    pub age: Option<PathBuf>,
    pub gender: Option<PathBuf>,
    pub emotion: Option<PathBuf>,
    pub race: Option<PathBuf>,
    pub recognition: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreprocessConfig {
    /// Side length face crops are resized to before attribute analysis
    pub target_size: u32,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn default_path() -> &'static str {
        "config.toml"
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            device: "CPU".to_string(),
        }
    }
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self { target_size: 224 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inference: InferenceConfig::default(),
            models: ModelsConfig {
                age: Some(PathBuf::from("models/age_model.onnx")),
                gender: Some(PathBuf::from("models/gender_model.onnx")),
                emotion: Some(PathBuf::from("models/facial_expression_model.onnx")),
                race: Some(PathBuf::from("models/race_model.onnx")),
                recognition: None,
            },
            preprocess: PreprocessConfig::default(),
        }
    }
}
