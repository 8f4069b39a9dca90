//! Face Attribute Analyzer
//!
//! Runs every loaded estimator over a list of face crops and collects
//! per-face results:
//! - Apparent age
//! - Gender
//! - Emotion
//! - Race

use std::collections::BTreeMap;

use ndarray::{Array2, Array3, ArrayView1};
use serde::Serialize;
use tracing::debug;

use crate::engine::{normalize, Demography, InferenceCapability};
use crate::error::{DemographyError, Result};
use crate::utils::math::argmax;

use super::{
    ApparentAgeClient, AttributeLabel, Emotion, EmotionClient, Gender, GenderClient, Race,
    RaceClient,
};

/// Scores for one classifier, in percent
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LabelScores {
    pub dominant: String,
    pub scores: BTreeMap<String, f32>,
}

impl LabelScores {
    pub fn from_probabilities<L: AttributeLabel>(probs: ArrayView1<'_, f32>) -> Self {
        let values: Vec<f32> = probs.iter().map(|p| p * 100.0).collect();
        let scores = L::ALL
            .iter()
            .zip(values.iter())
            .map(|(label, &score)| (label.as_str().to_string(), score))
            .collect();
        let dominant = L::from_index(argmax(&values))
            .map(|label| label.as_str().to_string())
            .unwrap_or_default();
        Self { dominant, scores }
    }
}

/// Attributes of one face
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct FaceAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<LabelScores>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<LabelScores>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub race: Option<LabelScores>,
}

/// Face Attribute Analyzer
pub struct AttributeAnalyzer<C> {
    pub age: Option<ApparentAgeClient<C>>,
    pub gender: Option<GenderClient<C>>,
    pub emotion: Option<EmotionClient<C>>,
    pub race: Option<RaceClient<C>>,
}

impl<C> Default for AttributeAnalyzer<C> {
    fn default() -> Self {
        Self {
            age: None,
            gender: None,
            emotion: None,
            race: None,
        }
    }
}

impl<C: InferenceCapability> AttributeAnalyzer<C> {
    /// Analyze attributes for every face crop, in input order.
    ///
    /// Faces are stacked into one batch that every estimator reads from.
    pub fn analyze(&self, faces: Vec<Array3<f32>>) -> Result<Vec<FaceAttributes>> {
        let count = faces.len();
        let mut results = vec![FaceAttributes::default(); count];
        if count == 0 {
            return Ok(results);
        }

        debug!("Analyzing {} face(s)", count);
        let batch = normalize(faces)?;

        if let Some(model) = &self.age {
            let ages = model.predict_batch(batch.view())?.into_vec();
            check_shape(model.model_name(), ages.len(), count, None)?;
            for (result, age) in results.iter_mut().zip(ages) {
                result.age = Some(age);
            }
        }

        if let Some(model) = &self.gender {
            let rows = model.predict_batch(batch.view())?.into_rows();
            assign_scores::<Gender>(model.model_name(), &mut results, &rows, |r, s| {
                r.gender = Some(s)
            })?;
        }

        if let Some(model) = &self.emotion {
            let rows = model.predict_batch(batch.view())?.into_rows();
            assign_scores::<Emotion>(model.model_name(), &mut results, &rows, |r, s| {
                r.emotion = Some(s)
            })?;
        }

        if let Some(model) = &self.race {
            let rows = model.predict_batch(batch.view())?.into_rows();
            assign_scores::<Race>(model.model_name(), &mut results, &rows, |r, s| {
                r.race = Some(s)
            })?;
        }

        Ok(results)
    }
}

/// Reject outputs whose row or class count does not match.
fn check_shape(
    model: &str,
    rows: usize,
    faces: usize,
    classes: Option<(usize, usize)>,
) -> Result<()> {
    if rows != faces {
        return Err(DemographyError::InvalidInput {
            model: model.to_string(),
            reason: format!("expected {} prediction rows, got {}", faces, rows),
        });
    }
    if let Some((expected, actual)) = classes {
        if expected != actual {
            return Err(DemographyError::InvalidInput {
                model: model.to_string(),
                reason: format!("expected {} classes, got {}", expected, actual),
            });
        }
    }
    Ok(())
}

fn assign_scores<L: AttributeLabel>(
    model: &str,
    results: &mut [FaceAttributes],
    rows: &Array2<f32>,
    set: impl Fn(&mut FaceAttributes, LabelScores),
) -> Result<()> {
    check_shape(model, rows.nrows(), results.len(), Some((L::ALL.len(), rows.ncols())))?;
    for (result, row) in results.iter_mut().zip(rows.rows()) {
        set(result, LabelScores::from_probabilities::<L>(row));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{CallPath, ConstantCapability, RecordingCapability};

    fn face() -> Array3<f32> {
        Array3::from_elem((16, 16, 3), 0.5)
    }

    #[test]
    fn test_label_scores() {
        let probs = ndarray::arr1(&[0.1, 0.9]);
        let scores = LabelScores::from_probabilities::<Gender>(probs.view());
        assert_eq!(scores.dominant, "Man");
        assert!((scores.scores["Woman"] - 10.0).abs() < 1e-4);
        assert!((scores.scores["Man"] - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_single_and_many_faces_look_alike() {
        let analyzer = AttributeAnalyzer {
            gender: Some(GenderClient::new(ConstantCapability::new(vec![0.7, 0.3])).unwrap()),
            race: Some(
                RaceClient::new(ConstantCapability::new(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0]))
                    .unwrap(),
            ),
            ..Default::default()
        };

        let one = analyzer.analyze(vec![face()]).unwrap();
        let three = analyzer.analyze(vec![face(); 3]).unwrap();

        assert_eq!(one.len(), 1);
        assert_eq!(three.len(), 3);
        for result in one.iter().chain(three.iter()) {
            assert_eq!(result.age, None);
            assert_eq!(result.gender.as_ref().unwrap().dominant, "Woman");
            assert_eq!(result.race.as_ref().unwrap().dominant, "white");
            assert!(result.emotion.is_none());
        }
    }

    #[test]
    fn test_age_and_emotion() {
        let mut age_probs = vec![0.0; crate::models::age::AGE_BUCKETS];
        age_probs[42] = 1.0;
        let mut emotion_probs = vec![0.0; 7];
        emotion_probs[3] = 1.0;

        let analyzer = AttributeAnalyzer {
            age: Some(ApparentAgeClient::new(ConstantCapability::new(age_probs)).unwrap()),
            emotion: Some(EmotionClient::new(ConstantCapability::new(emotion_probs)).unwrap()),
            ..Default::default()
        };

        let results = analyzer.analyze(vec![face(); 2]).unwrap();
        assert_eq!(results[1].age, Some(42.0));
        assert_eq!(results[1].emotion.as_ref().unwrap().dominant, "happy");
    }

    #[test]
    fn test_no_faces() {
        let analyzer: AttributeAnalyzer<ConstantCapability> = AttributeAnalyzer::default();
        assert!(analyzer.analyze(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_serializes_only_present_attributes() {
        let attrs = FaceAttributes {
            age: Some(30.0),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&attrs).unwrap(), r#"{"age":30.0}"#);
    }

    #[test]
    fn test_rejects_wrong_class_count() {
        let analyzer = AttributeAnalyzer {
            gender: Some(GenderClient::new(ConstantCapability::new(vec![0.1, 0.1, 0.8])).unwrap()),
            ..Default::default()
        };

        let err = analyzer.analyze(vec![face(); 2]).unwrap_err();
        assert!(matches!(err, DemographyError::InvalidInput { .. }));
        assert_eq!(err.to_string(), "Gender: expected 2 classes, got 3");
    }

    #[test]
    fn test_rejects_wrong_age_bucket_count() {
        let analyzer = AttributeAnalyzer {
            age: Some(ApparentAgeClient::new(ConstantCapability::new(vec![1.0; 10])).unwrap()),
            ..Default::default()
        };

        let err = analyzer.analyze(vec![face(); 2]).unwrap_err();
        assert!(matches!(err, DemographyError::InvalidInput { .. }));
    }

    #[test]
    fn test_row_count_mismatch() {
        let rows = Array2::<f32>::zeros((1, 6));
        let mut results = vec![FaceAttributes::default(); 3];
        let err = assign_scores::<Race>("Race", &mut results, &rows, |r, s| r.race = Some(s))
            .unwrap_err();
        assert_eq!(err.to_string(), "Race: expected 3 prediction rows, got 1");
        assert!(results.iter().all(|r| r.race.is_none()));
    }

    #[test]
    fn test_all_estimators_read_one_batch() {
        let capability = RecordingCapability::new(6);
        let analyzer = AttributeAnalyzer {
            race: Some(RaceClient::new(&capability).unwrap()),
            ..Default::default()
        };

        let results = analyzer.analyze(vec![face(); 4]).unwrap();
        assert_eq!(results.len(), 4);
        assert_eq!(capability.calls(), vec![CallPath::Batch]);
        assert_eq!(capability.last_shape(), Some(vec![4, 16, 16, 3]));
    }
}
