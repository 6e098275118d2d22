use apodize::{cosine_iter, hanning_iter};

/// Blackman-Harris 4-term coefficients.
const BLACKMAN_HARRIS: (f64, f64, f64, f64) = (0.35875, 0.48829, 0.14128, 0.01168);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowKind {
    Hann,
    #[default]
    BlackmanHarris,
}

impl WindowKind {
    pub fn table(self, size: usize) -> Vec<f32> {
        match self {
            WindowKind::Hann => hanning_iter(size).map(|x| x as f32).collect(),
            WindowKind::BlackmanHarris => {
                let (a, b, c, d) = BLACKMAN_HARRIS;
                cosine_iter(a, b, c, d, size).map(|x| x as f32).collect()
            }
        }
    }
}
