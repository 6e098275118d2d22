//! Spectrum analysis and filter-response display pipeline for a
//! low cut / peak / high cut equalizer.
//!
//! The audio callback feeds an [`AudioTap`]; a fixed-rate poller drives the
//! matching [`AnalysisPipeline`], which turns the captured audio into one
//! spectrum path per channel and keeps the theoretical response curve of the
//! current filter settings up to date.

pub mod audio;
pub mod change;
pub mod config;
pub mod error;
pub mod filters;
pub mod params;
pub mod path;
pub mod pipeline;

pub use change::{ChangeCoordinator, ChangeFlag};
pub use config::ScopeConfig;
pub use error::ScopeError;
pub use params::{ParameterId, Parameters};
pub use path::{Bounds, CurvePath, Point};
pub use pipeline::{AnalysisPipeline, AudioTap, Channel, PollOutcome, pipeline};
