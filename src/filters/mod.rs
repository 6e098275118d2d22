pub mod biquad;
pub mod coefficients;
pub mod publish;
pub mod response;
pub mod settings;

pub use biquad::BiquadCoefficients;
pub use coefficients::{CutCascade, FilterCoefficients, FilterStage};
pub use publish::{CoefficientPublisher, CoefficientReceiver, coefficient_channel};
pub use response::{FilterResponseCalculator, ResponseCurve};
pub use settings::{ChainSettings, Slope};
