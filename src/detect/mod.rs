pub mod attributes;
pub mod cascade;

pub use attributes::{AgeBracket, AttributeEstimator, Gender};
pub use cascade::FaceDetector;
