//! Buffalo_L face recognition
//!
//! InsightFace ResNet-50 backbone producing 512-dimensional embeddings
//! from 112x112 face crops.

use ndarray::{s, ArrayView3, ArrayViewD, Axis, Ix3};

use crate::engine::{InferenceCapability, ModelName};
use crate::error::{DemographyError, Result};

pub const MODEL_NAME: &str = "Buffalo_L";

/// Expected `(height, width)` of a face crop
pub const BUFFALO_INPUT_SIZE: (usize, usize) = (112, 112);

/// Embedding length
pub const BUFFALO_EMBEDDING_DIM: usize = 512;

/// A face recognition model producing identity embeddings.
pub trait FacialRecognition {
    fn model_name(&self) -> &str;

    fn input_shape(&self) -> (usize, usize);

    fn output_shape(&self) -> usize;

    /// Embed one pre-cropped face.
    fn forward(&self, img: ArrayViewD<'_, f32>) -> Result<Vec<f32>>;
}

pub struct BuffaloL<C> {
    name: ModelName,
    capability: C,
}

impl<C: InferenceCapability> BuffaloL<C> {
    pub fn new(capability: C) -> Result<Self> {
        Ok(Self {
            name: ModelName::new(MODEL_NAME)?,
            capability,
        })
    }

    /// Validate a single RGB face and flip it to BGR.
    ///
    /// A `(1, H, W, C)` batch is unwrapped without further shape checks;
    /// any other input must be exactly `(112, 112, 3)`.
    pub fn preprocess<'a>(&self, img: ArrayViewD<'a, f32>) -> Result<ArrayView3<'a, f32>> {
        let face = if img.ndim() == 4 {
            if img.shape()[0] != 1 {
                return Err(self.invalid("expects a single image, not a batch"));
            }
            img.index_axis_move(Axis(0), 0)
        } else {
            let (h, w) = BUFFALO_INPUT_SIZE;
            if img.shape() != [h, w, 3] {
                return Err(self.invalid(&format!(
                    "input image must have shape ({}, {}, 3), got {:?}",
                    h,
                    w,
                    img.shape()
                )));
            }
            img
        };

        let face = face
            .into_dimensionality::<Ix3>()
            .map_err(|_| self.invalid("input image must have 3 dimensions"))?;
        Ok(face.slice_move(s![.., .., ..;-1]))
    }

    fn invalid(&self, reason: &str) -> DemographyError {
        DemographyError::InvalidInput {
            model: self.name.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl<C: InferenceCapability> FacialRecognition for BuffaloL<C> {
    fn model_name(&self) -> &str {
        self.name.as_str()
    }

    fn input_shape(&self) -> (usize, usize) {
        BUFFALO_INPUT_SIZE
    }

    fn output_shape(&self) -> usize {
        BUFFALO_EMBEDDING_DIM
    }

    fn forward(&self, img: ArrayViewD<'_, f32>) -> Result<Vec<f32>> {
        let face = self.preprocess(img)?;
        let embedding = self.capability.infer_single(face)?;
        Ok(embedding.iter().copied().collect())
    }
}
