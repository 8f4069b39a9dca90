//! Apparent age estimator
//!
//! The network scores 101 age buckets (0..=100); the apparent age is the
//! expectation over those buckets.

use ndarray::{ArrayView1, ArrayViewD};

use crate::engine::{normalize, Demography, DemographyModel, ImageInput, InferenceCapability, Predicted};
use crate::error::{DemographyError, Result};

pub const MODEL_NAME: &str = "Age";

/// Number of age buckets produced by the network
pub const AGE_BUCKETS: usize = 101;

pub struct ApparentAgeClient<C> {
    model: DemographyModel<C>,
}

impl<C: InferenceCapability> ApparentAgeClient<C> {
    pub fn new(capability: C) -> Result<Self> {
        Ok(Self {
            model: DemographyModel::new(MODEL_NAME, capability)?,
        })
    }

    /// Predict on an already normalized batch.
    pub fn predict_batch(&self, batch: ArrayViewD<'_, f32>) -> Result<Predicted<f32>> {
        let prediction = self.model.predict_batch(batch)?;
        if prediction.width() != AGE_BUCKETS {
            return Err(DemographyError::InvalidInput {
                model: MODEL_NAME.to_string(),
                reason: format!(
                    "expected {} age buckets, got {}",
                    AGE_BUCKETS,
                    prediction.width()
                ),
            });
        }
        Ok(prediction.map(apparent_age))
    }
}

impl<C: InferenceCapability> Demography for ApparentAgeClient<C> {
    type Output = Predicted<f32>;

    fn model_name(&self) -> &str {
        self.model.name()
    }

    fn predict(&self, input: ImageInput) -> Result<Predicted<f32>> {
        let batch = normalize(input)?;
        self.predict_batch(batch.view())
    }
}

/// Expected age under the bucket distribution.
pub fn apparent_age(probabilities: ArrayView1<'_, f32>) -> f32 {
    probabilities
        .iter()
        .enumerate()
        .map(|(age, p)| age as f32 * p)
        .sum()
}
