//! Gender classifier

use ndarray::ArrayViewD;

use crate::engine::{normalize, Demography, DemographyModel, ImageInput, InferenceCapability, Prediction};
use crate::error::Result;

use super::AttributeLabel;

pub const MODEL_NAME: &str = "Gender";

/// Gender classes in network output order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Woman,
    Man,
}

impl AttributeLabel for Gender {
    const ALL: &'static [Self] = &[Gender::Woman, Gender::Man];

    fn as_str(&self) -> &'static str {
        match self {
            Gender::Woman => "Woman",
            Gender::Man => "Man",
        }
    }
}

pub struct GenderClient<C> {
    model: DemographyModel<C>,
}

impl<C: InferenceCapability> GenderClient<C> {
    pub fn new(capability: C) -> Result<Self> {
        Ok(Self {
            model: DemographyModel::new(MODEL_NAME, capability)?,
        })
    }

    /// Predict on an already normalized batch.
    pub fn predict_batch(&self, batch: ArrayViewD<'_, f32>) -> Result<Prediction> {
        self.model.predict_batch(batch)
    }
}

impl<C: InferenceCapability> Demography for GenderClient<C> {
    type Output = Prediction;

    fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Class probabilities, `[woman, man]` per face.
    fn predict(&self, input: ImageInput) -> Result<Prediction> {
        let batch = normalize(input)?;
        self.predict_batch(batch.view())
    }
}
