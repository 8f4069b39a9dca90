//! Race classifier

use ndarray::ArrayViewD;

use crate::engine::{normalize, Demography, DemographyModel, ImageInput, InferenceCapability, Prediction};
use crate::error::Result;

use super::AttributeLabel;

pub const MODEL_NAME: &str = "Race";

/// Race classes in network output order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Race {
    Asian,
    Indian,
    Black,
    White,
    MiddleEastern,
    LatinoHispanic,
}

impl AttributeLabel for Race {
    const ALL: &'static [Self] = &[
        Race::Asian,
        Race::Indian,
        Race::Black,
        Race::White,
        Race::MiddleEastern,
        Race::LatinoHispanic,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Race::Asian => "asian",
            Race::Indian => "indian",
            Race::Black => "black",
            Race::White => "white",
            Race::MiddleEastern => "middle eastern",
            Race::LatinoHispanic => "latino hispanic",
        }
    }
}

pub struct RaceClient<C> {
    model: DemographyModel<C>,
}

impl<C: InferenceCapability> RaceClient<C> {
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

impl<C: InferenceCapability> Demography for RaceClient<C> {
    type Output = Prediction;

    fn model_name(&self) -> &str {
        self.model.name()
    }

    fn predict(&self, input: ImageInput) -> Result<Prediction> {
        let batch = normalize(input)?;
        self.predict_batch(batch.view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::ConstantCapability;
    use ndarray::Array3;

    #[test]
    fn test_race_from_index() {
        assert_eq!(Race::from_index(0), Some(Race::Asian));
        assert_eq!(Race::from_index(4), Some(Race::MiddleEastern));
        assert_eq!(Race::from_index(6), None);
        assert_eq!(Race::LatinoHispanic.as_str(), "latino hispanic");
    }

    #[test]
    fn test_batch_prediction_shape() {
        let client = RaceClient::new(ConstantCapability::new(vec![0.5, 0.1, 0.1, 0.1, 0.1, 0.1])).unwrap();
        let faces = vec![Array3::<f32>::zeros((8, 8, 3)); 2];
        let rows = client.predict(faces.into()).unwrap().into_rows();
        assert_eq!(rows.shape(), &[2, 6]);
    }
}
