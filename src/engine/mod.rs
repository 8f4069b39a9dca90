//! Demography engine
//!
//! - Shape normalization of single images, lists and batches
//! - Dispatch between the single-sample and batch inference paths
//! - OpenVINO-backed inference

pub mod demography;
pub mod dispatch;
pub mod normalize;
pub mod runtime;

#[cfg(test)]
pub(crate) mod testing;

pub use demography::{Demography, DemographyModel};
pub use dispatch::{predict_internal, InferenceCapability, ModelName, Predicted, Prediction};
pub use normalize::{normalize, squeeze, ImageInput};
pub use runtime::{OpenVinoModel, OpenVinoRuntime};
