//! Batch dispatcher
//!
//! A batch of one goes through the legacy single-sample path, larger
//! batches through the native batch path. The two paths return results of
//! different rank; see [`Prediction`].

use std::fmt;

use ndarray::{Array1, Array2, ArrayView1, ArrayView3, ArrayView4, ArrayViewD, Axis, Ix4};

use crate::error::{DemographyError, Result};

/// Non-empty model identifier.
///
/// A name can only be built from a non-empty string, so a model that
/// reaches the dispatcher is always a configured one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelName(String);

impl ModelName {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(DemographyError::Unconfigured);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two calling conventions a loaded network must offer.
pub trait InferenceCapability {
    /// Legacy path: infer one `(H, W, C)` sample, returning a `(1, K)` output.
    fn infer_single(&self, sample: ArrayView3<'_, f32>) -> anyhow::Result<Array2<f32>>;

    /// Native path: infer a whole `(N, H, W, C)` batch, returning `(N, K)`.
    fn infer_batch(&self, batch: ArrayView4<'_, f32>) -> anyhow::Result<Array2<f32>>;
}

impl<T: InferenceCapability + ?Sized> InferenceCapability for &T {
    fn infer_single(&self, sample: ArrayView3<'_, f32>) -> anyhow::Result<Array2<f32>> {
        (**self).infer_single(sample)
    }

    fn infer_batch(&self, batch: ArrayView4<'_, f32>) -> anyhow::Result<Array2<f32>> {
        (**self).infer_batch(batch)
    }
}

impl<T: InferenceCapability + ?Sized> InferenceCapability for Box<T> {
    fn infer_single(&self, sample: ArrayView3<'_, f32>) -> anyhow::Result<Array2<f32>> {
        (**self).infer_single(sample)
    }

    fn infer_batch(&self, batch: ArrayView4<'_, f32>) -> anyhow::Result<Array2<f32>> {
        (**self).infer_batch(batch)
    }
}

/// Raw dispatcher output.
#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    /// Batch of one: the prediction vector for that sample
    Single(Array1<f32>),
    /// Batch of N: one row per sample
    Batch(Array2<f32>),
}

/// Postprocessed output, shaped like the [`Prediction`] it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicted<T> {
    Single(T),
    Batch(Vec<T>),
}

impl Prediction {
    /// Number of samples covered.
    pub fn len(&self) -> usize {
        match self {
            Prediction::Single(_) => 1,
            Prediction::Batch(rows) => rows.nrows(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length of each prediction vector.
    pub fn width(&self) -> usize {
        match self {
            Prediction::Single(vector) => vector.len(),
            Prediction::Batch(rows) => rows.ncols(),
        }
    }

    /// Uniform 2-D view: a single vector becomes a `(1, K)` matrix.
    pub fn into_rows(self) -> Array2<f32> {
        match self {
            Prediction::Single(vector) => vector.insert_axis(Axis(0)),
            Prediction::Batch(rows) => rows,
        }
    }

    /// Apply per-sample postprocessing, keeping the single/batch shape.
    pub fn map<T>(&self, mut f: impl FnMut(ArrayView1<'_, f32>) -> T) -> Predicted<T> {
        match self {
            Prediction::Single(vector) => Predicted::Single(f(vector.view())),
            Prediction::Batch(rows) => Predicted::Batch(rows.rows().into_iter().map(f).collect()),
        }
    }
}

impl<T> Predicted<T> {
    /// Flatten into one value per sample.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Predicted::Single(value) => vec![value],
            Predicted::Batch(values) => values,
        }
    }
}

/// Run a normalized batch through the path matching its size.
pub fn predict_internal<C>(
    name: &ModelName,
    capability: &C,
    batch: ArrayViewD<'_, f32>,
) -> Result<Prediction>
where
    C: InferenceCapability + ?Sized,
{
    let actual = batch.ndim();
    let batch = batch
        .into_dimensionality::<Ix4>()
        .map_err(|_| DemographyError::InvalidRank { actual })?;

    if batch.len_of(Axis(0)) == 1 {
        let sample = batch.index_axis_move(Axis(0), 0);
        let output = capability.infer_single(sample)?;
        if output.nrows() == 0 {
            return Err(DemographyError::EmptyOutput {
                model: name.to_string(),
            });
        }
        Ok(Prediction::Single(output.row(0).to_owned()))
    } else {
        Ok(Prediction::Batch(capability.infer_batch(batch)?))
    }
}
