pub mod detector;
pub mod gesture;
pub mod landmark;

pub use detector::{preprocess_for_hand, HandDetector};
pub use gesture::{interpret, Direction};
pub use landmark::{HandLandmarkIndex, HandPose};
