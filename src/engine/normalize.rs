//! Shape normalizer
//!
//! Turns a single image, a list of images or an already batched array
//! into the canonical `(N, H, W, C)` batch consumed by the dispatcher.
//!
//! Every length-1 axis is squeezed before the batch axis is restored, and
//! the batch axis is only restored for a 3-D result. A single-channel
//! `(H, W, 1)` image therefore comes out as a bare `(H, W)` plane, which
//! the dispatcher rejects: grayscale models must re-add their channel axis
//! after normalizing (see `models::emotion`).

use ndarray::{stack, ArrayD, ArrayViewD, Axis, Dimension};

use crate::error::{DemographyError, Result};

/// Input accepted by `Demography::predict`.
#[derive(Debug, Clone)]
pub enum ImageInput {
    /// One image `(H, W, C)` or a pre-batched `(N, H, W, C)` array
    Array(ArrayD<f32>),
    /// Ordered list of images sharing one shape
    List(Vec<ArrayD<f32>>),
}

impl<D: Dimension> From<ndarray::Array<f32, D>> for ImageInput {
    fn from(array: ndarray::Array<f32, D>) -> Self {
        ImageInput::Array(array.into_dyn())
    }
}

impl<D: Dimension> From<Vec<ndarray::Array<f32, D>>> for ImageInput {
    fn from(images: Vec<ndarray::Array<f32, D>>) -> Self {
        ImageInput::List(images.into_iter().map(|img| img.into_dyn()).collect())
    }
}

/// Normalize any accepted input into a batch.
///
/// The result is 4-D for every well-formed color input. Other ranks are
/// returned as they are and rejected later by the dispatcher.
pub fn normalize(input: impl Into<ImageInput>) -> Result<ArrayD<f32>> {
    let batch = match input.into() {
        ImageInput::Array(array) => array,
        ImageInput::List(images) => stack_images(&images)?,
    };

    let batch = squeeze(batch);
    if batch.ndim() == 3 {
        Ok(batch.insert_axis(Axis(0)))
    } else {
        Ok(batch)
    }
}

/// Stack images along a new leading axis, keeping list order.
fn stack_images(images: &[ArrayD<f32>]) -> Result<ArrayD<f32>> {
    let first = images.first().ok_or(DemographyError::EmptyInput)?;

    for (index, image) in images.iter().enumerate().skip(1) {
        if image.shape() != first.shape() {
            return Err(DemographyError::MismatchedShapes {
                index,
                expected: first.shape().to_vec(),
                actual: image.shape().to_vec(),
            });
        }
    }

    let views: Vec<ArrayViewD<'_, f32>> = images.iter().map(|img| img.view()).collect();
    Ok(stack(Axis(0), &views)?)
}

/// Remove every axis of length 1.
pub fn squeeze(mut array: ArrayD<f32>) -> ArrayD<f32> {
    for axis in (0..array.ndim()).rev() {
        if array.len_of(Axis(axis)) == 1 {
            array = array.remove_axis(Axis(axis));
        }
    }
    array
}
