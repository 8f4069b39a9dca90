//! Model set loading
//!
//! Builds every configured model once at startup. A model without a
//! configured path is skipped; a configured path that does not exist is
//! an error.

use std::path::Path;

use tracing::info;

use crate::config::Config;
use crate::engine::{OpenVinoModel, OpenVinoRuntime};
use crate::error::Result;

use super::{
    ApparentAgeClient, AttributeAnalyzer, BuffaloL, EmotionClient, GenderClient, RaceClient,
};

/// All models loaded from a [`Config`]
pub struct ModelSet {
    pub analyzer: AttributeAnalyzer<OpenVinoModel>,
    pub recognition: Option<BuffaloL<OpenVinoModel>>,
}

impl ModelSet {
    pub fn load(config: &Config) -> Result<Self> {
        let mut runtime = OpenVinoRuntime::new(&config.inference.device)?;
        let models = &config.models;

        let analyzer = AttributeAnalyzer {
            age: load_with(&mut runtime, models.age.as_deref(), ApparentAgeClient::new)?,
            gender: load_with(&mut runtime, models.gender.as_deref(), GenderClient::new)?,
            emotion: load_with(&mut runtime, models.emotion.as_deref(), EmotionClient::new)?,
            race: load_with(&mut runtime, models.race.as_deref(), RaceClient::new)?,
        };
        let recognition = load_with(&mut runtime, models.recognition.as_deref(), BuffaloL::new)?;

        let set = Self {
            analyzer,
            recognition,
        };
        info!("Models ready: {}", set.loaded_names().join(", "));
        Ok(set)
    }

    /// Names of the loaded models.
    pub fn loaded_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.analyzer.age.is_some() {
            names.push(super::age::MODEL_NAME);
        }
        if self.analyzer.gender.is_some() {
            names.push(super::gender::MODEL_NAME);
        }
        if self.analyzer.emotion.is_some() {
            names.push(super::emotion::MODEL_NAME);
        }
        if self.analyzer.race.is_some() {
            names.push(super::race::MODEL_NAME);
        }
        if self.recognition.is_some() {
            names.push(super::buffalo_l::MODEL_NAME);
        }
        names
    }
}

fn load_with<T>(
    runtime: &mut OpenVinoRuntime,
    path: Option<&Path>,
    build: impl FnOnce(OpenVinoModel) -> Result<T>,
) -> Result<Option<T>> {
    match path {
        Some(path) => Ok(Some(build(runtime.load(path)?)?)),
        None => Ok(None),
    }
}
