pub mod generator;
pub mod geometry;
pub mod producer;

pub use generator::PathGenerator;
pub use geometry::{Bounds, CurvePath, Point};
pub use producer::PathProducer;
