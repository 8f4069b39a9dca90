//! Demography contract
//!
//! Every facial attribute estimator implements [`Demography`]. The shared
//! plumbing lives in [`DemographyModel`], which pairs a model name with its
//! inference capability and runs normalize + dispatch.

use super::dispatch::{predict_internal, InferenceCapability, ModelName, Prediction};
use super::normalize::{normalize, ImageInput};
use crate::error::Result;

/// A facial attribute model.
pub trait Demography {
    /// Postprocessed result of one `predict` call
    type Output;

    fn model_name(&self) -> &str;

    /// Predict for one image, a list of images or a batch.
    fn predict(&self, input: ImageInput) -> Result<Self::Output>;
}

/// Named inference capability, built once at load time.
#[derive(Debug)]
pub struct DemographyModel<C> {
    name: ModelName,
    capability: C,
}

impl<C: InferenceCapability> DemographyModel<C> {
    /// Fails with `Unconfigured` when `name` is empty.
    pub fn new(name: &str, capability: C) -> Result<Self> {
        Ok(Self {
            name: ModelName::new(name)?,
            capability,
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn capability(&self) -> &C {
        &self.capability
    }

    /// Normalize `input` and dispatch it.
    pub fn predict_raw(&self, input: impl Into<ImageInput>) -> Result<Prediction> {
        let batch = normalize(input)?;
        self.predict_batch(batch.view())
    }

    /// Dispatch an already normalized batch.
    pub fn predict_batch(&self, batch: ndarray::ArrayViewD<'_, f32>) -> Result<Prediction> {
        predict_internal(&self.name, &self.capability, batch)
    }
}
