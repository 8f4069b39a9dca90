//! Facial expression classifier
//!
//! The network takes 48x48 grayscale faces. Normalizing a single-channel
//! face leaves a bare `(H, W)` plane, so color faces are normalized first,
//! converted to grayscale and resized, and the channel axis is appended
//! afterwards.
//! Pixel values are expected in `[0, 1]`.

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma};
use ndarray::{stack, Array2, ArrayD, ArrayView3, ArrayViewD, Axis, Ix4};

use crate::engine::{normalize, Demography, DemographyModel, ImageInput, InferenceCapability, Prediction};
use crate::error::{DemographyError, Result};

use super::AttributeLabel;

pub const MODEL_NAME: &str = "Emotion";

/// Side length of the network input
pub const EMOTION_INPUT_SIZE: u32 = 48;

/// Expression classes in network output order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emotion {
    Angry,
    Disgust,
    Fear,
    Happy,
    Sad,
    Surprise,
    Neutral,
}

impl AttributeLabel for Emotion {
    const ALL: &'static [Self] = &[
        Emotion::Angry,
        Emotion::Disgust,
        Emotion::Fear,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Surprise,
        Emotion::Neutral,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Emotion::Angry => "angry",
            Emotion::Disgust => "disgust",
            Emotion::Fear => "fear",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Surprise => "surprise",
            Emotion::Neutral => "neutral",
        }
    }
}

pub struct EmotionClient<C> {
    model: DemographyModel<C>,
}

impl<C: InferenceCapability> EmotionClient<C> {
    pub fn new(capability: C) -> Result<Self> {
        Ok(Self {
            model: DemographyModel::new(MODEL_NAME, capability)?,
        })
    }

    /// Predict on an already normalized color batch.
    pub fn predict_batch(&self, batch: ArrayViewD<'_, f32>) -> Result<Prediction> {
        let gray = to_grayscale_batch(batch)?;
        self.model.predict_batch(gray.view())
    }
}

impl<C: InferenceCapability> Demography for EmotionClient<C> {
    type Output = Prediction;

    fn model_name(&self) -> &str {
        self.model.name()
    }

    fn predict(&self, input: ImageInput) -> Result<Prediction> {
        let batch = normalize(input)?;
        self.predict_batch(batch.view())
    }
}

/// `(N, H, W, 3)` BGR batch to `(N, 48, 48, 1)` grayscale batch.
fn to_grayscale_batch(batch: ArrayViewD<'_, f32>) -> Result<ArrayD<f32>> {
    let actual = batch.ndim();
    let batch = batch
        .into_dimensionality::<Ix4>()
        .map_err(|_| DemographyError::InvalidRank { actual })?;

    let faces: Vec<Array2<f32>> = batch
        .axis_iter(Axis(0))
        .map(preprocess_face)
        .collect::<Result<_>>()?;
    let views: Vec<_> = faces.iter().map(|f| f.view()).collect();
    let gray = stack(Axis(0), &views)?;

    Ok(gray.insert_axis(Axis(3)).into_dyn())
}

/// One BGR face to a 48x48 grayscale plane.
fn preprocess_face(face: ArrayView3<'_, f32>) -> Result<Array2<f32>> {
    let (height, width, channels) = face.dim();
    if channels != 3 {
        return Err(DemographyError::InvalidInput {
            model: MODEL_NAME.to_string(),
            reason: format!("expected 3 color channels, got {}", channels),
        });
    }

    let plane: Vec<f32> = face
        .outer_iter()
        .flat_map(|row| {
            row.outer_iter()
                .map(|px| 0.114 * px[0] + 0.587 * px[1] + 0.299 * px[2])
                .collect::<Vec<_>>()
        })
        .collect();

    let gray: ImageBuffer<Luma<f32>, Vec<f32>> =
        ImageBuffer::from_raw(width as u32, height as u32, plane).ok_or_else(|| {
            DemographyError::InvalidInput {
                model: MODEL_NAME.to_string(),
                reason: "face buffer does not match its dimensions".to_string(),
            }
        })?;

    let side = EMOTION_INPUT_SIZE;
    let resized = imageops::resize(&gray, side, side, FilterType::Triangle);
    Ok(Array2::from_shape_vec(
        (side as usize, side as usize),
        resized.into_raw(),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{CallPath, ConstantCapability, RecordingCapability};
    use ndarray::Array3;

    fn uniform_face(b: f32, g: f32, r: f32) -> Array3<f32> {
        Array3::from_shape_fn((96, 96, 3), |(_, _, c)| [b, g, r][c])
    }

    #[test]
    fn test_emotion_labels() {
        assert_eq!(Emotion::ALL.len(), 7);
        assert_eq!(Emotion::from_index(3), Some(Emotion::Happy));
        assert_eq!(Emotion::Neutral.as_str(), "neutral");
    }

    #[test]
    fn test_single_face_reaches_legacy_path_as_grayscale() {
        let client = EmotionClient::new(ConstantCapability::new(vec![0.0; 7])).unwrap();
        let prediction = client.predict(uniform_face(1.0, 1.0, 1.0).into()).unwrap();
        assert!(matches!(prediction, Prediction::Single(_)));
        assert_eq!(client.model.capability().shapes(), vec![vec![48, 48, 1]]);
    }

    #[test]
    fn test_batch_keeps_channel_axis() {
        let client = EmotionClient::new(RecordingCapability::new(7)).unwrap();
        let faces = vec![uniform_face(0.0, 0.0, 0.0), uniform_face(1.0, 1.0, 1.0)];
        let rows = client.predict(faces.into()).unwrap().into_rows();
        assert_eq!(client.model.capability().calls(), vec![CallPath::Batch]);
        assert_eq!(client.model.capability().last_shape(), Some(vec![2, 48, 48, 1]));
        assert_eq!(rows.nrows(), 2);
    }

    #[test]
    fn test_grayscale_weights() {
        let gray = preprocess_face(uniform_face(1.0, 0.0, 0.0).view()).unwrap();
        assert_eq!(gray.dim(), (48, 48));
        assert!(gray.iter().all(|&v| (v - 0.114).abs() < 1e-4));
    }

    #[test]
    fn test_rejects_non_color_faces() {
        let client = EmotionClient::new(RecordingCapability::new(7)).unwrap();
        let faces = vec![Array3::<f32>::zeros((10, 10, 2)); 2];
        let err = client.predict(faces.into()).unwrap_err();
        assert!(matches!(err, DemographyError::InvalidInput { .. }));
    }
}
