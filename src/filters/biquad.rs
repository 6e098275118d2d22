use std::f64::consts::PI;

use rustfft::num_complex::Complex64;

/// Highest design frequency as a fraction of the sample rate. At Nyquist the
/// prewarped bilinear forms wrap around.
const MAX_DESIGN_RATIO: f64 = 0.499;

fn design_frequency(frequency: f64, sample_rate: f64) -> f64 {
    frequency.min(MAX_DESIGN_RATIO * sample_rate)
}

/// Second-order section normalised so that `a0 == 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl BiquadCoefficients {
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    fn normalized(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> Self {
        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    /// Bell filter (Audio EQ Cookbook).
    pub fn peaking(sample_rate: f64, frequency: f64, q: f64, gain_db: f64) -> Self {
        let amp = 10f64.powf(gain_db / 40.0);
        let omega = 2.0 * PI * design_frequency(frequency, sample_rate) / sample_rate;
        let alpha = omega.sin() / (2.0 * q);
        let cos_omega = omega.cos();

        Self::normalized(
            1.0 + alpha * amp,
            -2.0 * cos_omega,
            1.0 - alpha * amp,
            1.0 + alpha / amp,
            -2.0 * cos_omega,
            1.0 - alpha / amp,
        )
    }

    /// Second-order high-pass, bilinear transform with prewarping. Corners at
    /// or above Nyquist are pulled just below it.
    pub fn high_pass(sample_rate: f64, frequency: f64, q: f64) -> Self {
        let n = 1.0 / (PI * design_frequency(frequency, sample_rate) / sample_rate).tan();
        let n_squared = n * n;
        let inv_q = 1.0 / q;
        let c1 = 1.0 / (1.0 + inv_q * n + n_squared);

        Self {
            b0: c1 * n_squared,
            b1: -2.0 * c1 * n_squared,
            b2: c1 * n_squared,
            a1: c1 * 2.0 * (1.0 - n_squared),
            a2: c1 * (1.0 - inv_q * n + n_squared),
        }
    }

    /// Second-order low-pass, bilinear transform with prewarping.
    pub fn low_pass(sample_rate: f64, frequency: f64, q: f64) -> Self {
        let n = 1.0 / (PI * design_frequency(frequency, sample_rate) / sample_rate).tan();
        let n_squared = n * n;
        let inv_q = 1.0 / q;
        let c1 = 1.0 / (1.0 + inv_q * n + n_squared);

        Self {
            b0: c1,
            b1: c1 * 2.0,
            b2: c1,
            a1: c1 * 2.0 * (1.0 - n_squared),
            a2: c1 * (1.0 - inv_q * n + n_squared),
        }
    }

    /// |H(e^jw)| at `frequency`.
    pub fn magnitude_at(&self, frequency: f64, sample_rate: f64) -> f64 {
        let omega = 2.0 * PI * frequency / sample_rate;
        let z1 = Complex64::from_polar(1.0, -omega);
        let z2 = z1 * z1;

        let numerator = self.b0 + z1 * self.b1 + z2 * self.b2;
        let denominator = Complex64::new(1.0, 0.0) + z1 * self.a1 + z2 * self.a2;

        numerator.norm() / denominator.norm()
    }
}
