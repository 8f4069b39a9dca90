//! Concrete facial attribute and recognition models
//!
//! - Apparent age
//! - Gender
//! - Emotion
//! - Race
//! - Buffalo_L recognition

pub mod age;
pub mod analyzer;
pub mod buffalo_l;
pub mod emotion;
pub mod gender;
pub mod race;
pub mod registry;

pub use age::ApparentAgeClient;
pub use analyzer::{AttributeAnalyzer, FaceAttributes};
pub use buffalo_l::{BuffaloL, FacialRecognition};
pub use emotion::{Emotion, EmotionClient};
pub use gender::{Gender, GenderClient};
pub use race::{Race, RaceClient};
pub use registry::ModelSet;

/// A classifier label, listed in network output order.
pub trait AttributeLabel: Copy + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }
}
