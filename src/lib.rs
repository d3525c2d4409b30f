pub mod camera;
pub mod config;
pub mod detect;
pub mod geometry;
pub mod hand;
pub mod plan;
pub mod pose;
pub mod render;
pub mod session;
pub mod somatotype;
