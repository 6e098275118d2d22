use std::f64::consts::PI;

use super::biquad::BiquadCoefficients;
use super::settings::{ChainSettings, Slope};
use crate::config::MAX_CUT_SECTIONS;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FilterStage {
    pub coefficients: BiquadCoefficients,
    pub bypassed: bool,
}

impl FilterStage {
    pub fn active(coefficients: BiquadCoefficients) -> Self {
        Self {
            coefficients,
            bypassed: false,
        }
    }

    pub fn bypassed() -> Self {
        Self {
            coefficients: BiquadCoefficients::IDENTITY,
            bypassed: true,
        }
    }

    /// Contribution of this stage, 1.0 when bypassed.
    pub fn magnitude_at(&self, frequency: f64, sample_rate: f64) -> f64 {
        if self.bypassed {
            1.0
        } else {
            self.coefficients.magnitude_at(frequency, sample_rate)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutCascade {
    pub sections: [FilterStage; MAX_CUT_SECTIONS],
}

impl Default for CutCascade {
    fn default() -> Self {
        Self {
            sections: [FilterStage::bypassed(); MAX_CUT_SECTIONS],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CutKind {
    Low,
    High,
}

impl CutCascade {
    /// Butterworth low cut (high-pass) with one section per slope step.
    pub fn low_cut(frequency: f64, slope: Slope, sample_rate: f64) -> Self {
        Self::butterworth(CutKind::Low, frequency, slope, sample_rate)
    }

    /// Butterworth high cut (low-pass) with one section per slope step.
    pub fn high_cut(frequency: f64, slope: Slope, sample_rate: f64) -> Self {
        Self::butterworth(CutKind::High, frequency, slope, sample_rate)
    }

    fn butterworth(kind: CutKind, frequency: f64, slope: Slope, sample_rate: f64) -> Self {
        let mut cascade = Self::default();
        let order = slope.order() as f64;

        for (k, stage) in cascade.sections.iter_mut().take(slope.sections()).enumerate() {
            let q = 1.0 / (2.0 * ((2.0 * k as f64 + 1.0) * PI / (2.0 * order)).cos());
            let coefficients = match kind {
                CutKind::Low => BiquadCoefficients::high_pass(sample_rate, frequency, q),
                CutKind::High => BiquadCoefficients::low_pass(sample_rate, frequency, q),
            };
            *stage = FilterStage::active(coefficients);
        }
        cascade
    }

    pub fn active_sections(&self) -> usize {
        self.sections.iter().filter(|s| !s.bypassed).count()
    }

    pub fn magnitude_at(&self, frequency: f64, sample_rate: f64) -> f64 {
        self.sections
            .iter()
            .map(|s| s.magnitude_at(frequency, sample_rate))
            .product()
    }
}

/// Complete coefficient set for peak, low cut and high cut. Replaced as a
/// whole whenever the parameters change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterCoefficients {
    pub peak: FilterStage,
    pub low_cut: CutCascade,
    pub high_cut: CutCascade,
    pub sample_rate: f64,
}

impl FilterCoefficients {
    /// Every stage bypassed.
    pub fn flat(sample_rate: f64) -> Self {
        Self {
            peak: FilterStage::bypassed(),
            low_cut: CutCascade::default(),
            high_cut: CutCascade::default(),
            sample_rate,
        }
    }

    pub fn from_settings(settings: &ChainSettings, sample_rate: f64) -> Self {
        let peak = if settings.peak_bypassed {
            FilterStage::bypassed()
        } else {
            FilterStage::active(BiquadCoefficients::peaking(
                sample_rate,
                settings.peak_freq as f64,
                settings.peak_quality as f64,
                settings.peak_gain_db as f64,
            ))
        };

        let low_cut = if settings.low_cut_bypassed {
            CutCascade::default()
        } else {
            CutCascade::low_cut(settings.low_cut_freq as f64, settings.low_cut_slope, sample_rate)
        };

        let high_cut = if settings.high_cut_bypassed {
            CutCascade::default()
        } else {
            CutCascade::high_cut(settings.high_cut_freq as f64, settings.high_cut_slope, sample_rate)
        };

        Self {
            peak,
            low_cut,
            high_cut,
            sample_rate,
        }
    }

    /// Product of every active stage's magnitude at `frequency`.
    pub fn magnitude_at(&self, frequency: f64, sample_rate: f64) -> f64 {
        self.peak.magnitude_at(frequency, sample_rate)
            * self.low_cut.magnitude_at(frequency, sample_rate)
            * self.high_cut.magnitude_at(frequency, sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_1_SQRT_2;

    const SR: f64 = 44100.0;

    #[test]
    fn slope_selects_active_sections() {
        for slope in Slope::ALL {
            let cascade = CutCascade::low_cut(100.0, slope, SR);
            assert_eq!(cascade.active_sections(), slope.sections());
            for stage in &cascade.sections[slope.sections()..] {
                assert!(stage.bypassed);
            }
        }
    }

    #[test]
    fn single_section_uses_butterworth_q() {
        let cascade = CutCascade::low_cut(100.0, Slope::Db12, SR);
        let expected = BiquadCoefficients::high_pass(SR, 100.0, FRAC_1_SQRT_2);
        let actual = cascade.sections[0].coefficients;
        assert_abs_diff_eq!(actual.b0, expected.b0, epsilon = 1e-12);
        assert_abs_diff_eq!(actual.a1, expected.a1, epsilon = 1e-12);
        assert_abs_diff_eq!(actual.a2, expected.a2, epsilon = 1e-12);
    }

    #[test]
    fn every_slope_is_half_power_at_corner() {
        for slope in Slope::ALL {
            let low = CutCascade::low_cut(500.0, slope, SR);
            assert_abs_diff_eq!(low.magnitude_at(500.0, SR), FRAC_1_SQRT_2, epsilon = 1e-9);

            let high = CutCascade::high_cut(5000.0, slope, SR);
            assert_abs_diff_eq!(high.magnitude_at(5000.0, SR), FRAC_1_SQRT_2, epsilon = 1e-9);
        }
    }

    #[test]
    fn steeper_slope_attenuates_more() {
        let shallow = CutCascade::low_cut(1000.0, Slope::Db12, SR).magnitude_at(250.0, SR);
        let steep = CutCascade::low_cut(1000.0, Slope::Db48, SR).magnitude_at(250.0, SR);
        assert!(steep < shallow);
        // two octaves below the corner: about 24 dB vs 96 dB
        assert!((20.0 * shallow.log10() + 24.0).abs() < 1.0);
        assert!((20.0 * steep.log10() + 96.0).abs() < 1.5);
    }

    #[test]
    fn bypass_switches_clear_stages() {
        let settings = ChainSettings {
            peak_bypassed: true,
            low_cut_bypassed: true,
            high_cut_bypassed: true,
            ..Default::default()
        };
        let coefficients = FilterCoefficients::from_settings(&settings, SR);
        assert_eq!(coefficients, FilterCoefficients::flat(SR));
    }

    #[test]
    fn default_high_cut_is_transparent_at_low_sample_rates() {
        for sample_rate in [16000.0, 32000.0] {
            for slope in Slope::ALL {
                let settings = ChainSettings {
                    high_cut_slope: slope,
                    ..Default::default()
                };
                let coefficients = FilterCoefficients::from_settings(&settings, sample_rate);
                let db = 20.0 * coefficients.magnitude_at(6000.0, sample_rate).log10();
                assert!(db.abs() < 0.1, "{slope:?} at {sample_rate}: {db} dB");
            }
        }
    }
}
