use super::coefficients::FilterCoefficients;
use crate::config::{DisplayRange, FrequencyRange, RESPONSE_FLOOR_DB};
use crate::path::geometry::{Bounds, CurvePath, Point, map_to_log10, remap};

pub fn gain_to_decibels(gain: f64) -> f64 {
    if gain > 0.0 {
        (20.0 * gain.log10()).max(RESPONSE_FLOOR_DB)
    } else {
        RESPONSE_FLOOR_DB
    }
}

/// Composite response, in dB, sampled once per horizontal pixel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResponseCurve {
    magnitudes_db: Vec<f64>,
}

impl ResponseCurve {
    pub fn magnitudes_db(&self) -> &[f64] {
        &self.magnitudes_db
    }

    pub fn width(&self) -> usize {
        self.magnitudes_db.len()
    }

    /// One point per pixel column from `bounds.left`, levels mapped over
    /// `display` and clamped into `bounds`.
    pub fn to_path(&self, bounds: Bounds, display: DisplayRange) -> CurvePath {
        if bounds.is_empty() {
            return CurvePath::default();
        }
        let mut path = CurvePath::with_capacity(self.magnitudes_db.len());
        for (i, &db) in self.magnitudes_db.iter().enumerate() {
            let y = remap(
                db as f32,
                display.min_db,
                display.max_db,
                bounds.bottom(),
                bounds.top,
            );
            path.line_to(Point::new(
                (bounds.left + i as f32).min(bounds.right()),
                y.clamp(bounds.top, bounds.bottom()),
            ));
        }
        path
    }
}

/// Evaluates filter coefficients across a log-spaced frequency sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterResponseCalculator {
    frequencies: FrequencyRange,
}

impl Default for FilterResponseCalculator {
    fn default() -> Self {
        Self::new(FrequencyRange::default())
    }
}

impl FilterResponseCalculator {
    pub fn new(frequencies: FrequencyRange) -> Self {
        Self { frequencies }
    }

    /// Frequency sampled at column `x` of `width`.
    pub fn frequency_at(&self, x: usize, width: usize) -> f64 {
        map_to_log10(
            x as f64 / width as f64,
            self.frequencies.low as f64,
            self.frequencies.high as f64,
        )
    }

    pub fn compute_response(
        &self,
        coefficients: &FilterCoefficients,
        sample_rate: f64,
        width: usize,
    ) -> ResponseCurve {
        let magnitudes_db = (0..width)
            .map(|x| {
                let freq = self.frequency_at(x, width);
                gain_to_decibels(coefficients.magnitude_at(freq, sample_rate))
            })
            .collect();

        ResponseCurve { magnitudes_db }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::coefficients::{CutCascade, FilterStage};
    use crate::filters::biquad::BiquadCoefficients;
    use crate::filters::settings::{ChainSettings, Slope};
    use approx::assert_abs_diff_eq;

    const SR: f64 = 48000.0;

    #[test]
    fn bypassed_chain_is_flat() {
        let calculator = FilterResponseCalculator::default();
        let curve = calculator.compute_response(&FilterCoefficients::flat(SR), SR, 600);
        assert_eq!(curve.width(), 600);
        assert!(curve.magnitudes_db().iter().all(|&db| db == 0.0));
    }

    #[test]
    fn sweep_is_logarithmic() {
        let calculator = FilterResponseCalculator::default();
        assert_abs_diff_eq!(calculator.frequency_at(0, 300), 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(calculator.frequency_at(150, 300), 632.455_532, epsilon = 1e-5);
        assert!(calculator.frequency_at(299, 300) < 20000.0);
    }

    #[test]
    fn single_low_cut_section_is_half_power_at_corner() {
        let calculator = FilterResponseCalculator::default();
        let width = 300;
        let corner = calculator.frequency_at(100, width);

        let mut coefficients = FilterCoefficients::flat(SR);
        coefficients.low_cut = CutCascade::low_cut(corner, Slope::Db12, SR);

        let curve = calculator.compute_response(&coefficients, SR, width);
        assert_abs_diff_eq!(curve.magnitudes_db()[100], -3.0103, epsilon = 1e-3);
        assert!(curve.magnitudes_db()[0] < -20.0);
        assert_abs_diff_eq!(curve.magnitudes_db()[width - 1], 0.0, epsilon = 0.01);
    }

    #[test]
    fn peak_shows_its_gain() {
        let calculator = FilterResponseCalculator::default();
        let width = 400;
        let centre = calculator.frequency_at(200, width);

        let mut coefficients = FilterCoefficients::flat(SR);
        coefficients.peak = FilterStage::active(BiquadCoefficients::peaking(SR, centre, 1.0, 12.0));

        let curve = calculator.compute_response(&coefficients, SR, width);
        assert_abs_diff_eq!(curve.magnitudes_db()[200], 12.0, epsilon = 1e-9);
        let max = curve.magnitudes_db().iter().cloned().fold(f64::MIN, f64::max);
        assert_abs_diff_eq!(max, 12.0, epsilon = 1e-9);
    }

    #[test]
    fn default_settings_are_nearly_flat_in_the_mid_range() {
        let calculator = FilterResponseCalculator::default();
        let coefficients = FilterCoefficients::from_settings(&ChainSettings::default(), SR);
        let curve = calculator.compute_response(&coefficients, SR, 300);
        // cuts at the extremes of the sweep, zero-gain peak in the middle
        assert!(curve.magnitudes_db()[150].abs() < 0.1);
    }

    #[test]
    fn curve_path_is_clamped_into_bounds() {
        let calculator = FilterResponseCalculator::default();
        let mut coefficients = FilterCoefficients::flat(SR);
        coefficients.low_cut = CutCascade::low_cut(2000.0, Slope::Db48, SR);
        let curve = calculator.compute_response(&coefficients, SR, 200);

        let bounds = Bounds::new(5.0, 5.0, 200.0, 80.0);
        let path = curve.to_path(bounds, DisplayRange::default());
        assert_eq!(path.len(), 200);
        assert!(path.points().iter().all(|p| bounds.contains(*p)));
        assert_eq!(path.points()[0].y, bounds.bottom());
        assert_abs_diff_eq!(path.points()[199].y, bounds.top + 40.0, epsilon = 0.1);
    }

    #[test]
    fn non_positive_gain_hits_floor() {
        assert_eq!(gain_to_decibels(0.0), RESPONSE_FLOOR_DB);
        assert_abs_diff_eq!(gain_to_decibels(1.0), 0.0);
    }
}
