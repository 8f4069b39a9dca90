//! Facial attribute model library
//!
//! Age, gender, emotion and race estimators and a recognition backbone,
//! all invoked through one `predict` contract that accepts a single image,
//! a list of images or a pre-batched array.

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod utils;

pub use config::Config;
pub use engine::{Demography, DemographyModel, ImageInput, InferenceCapability, Prediction};
pub use error::{DemographyError, Result};
