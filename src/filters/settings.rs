/// Steepness of a cut filter. Each step adds one second-order section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slope {
    #[default]
    Db12,
    Db24,
    Db36,
    Db48,
}

impl Slope {
    pub const ALL: [Slope; 4] = [Slope::Db12, Slope::Db24, Slope::Db36, Slope::Db48];

    /// Choice index as stored by the parameter store; out-of-range clamps.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn sections(self) -> usize {
        self.index() + 1
    }

    /// Butterworth order giving this slope.
    pub fn order(self) -> usize {
        2 * self.sections()
    }

    pub fn db_per_octave(self) -> u32 {
        12 * self.sections() as u32
    }

    pub fn label(self) -> &'static str {
        match self {
            Slope::Db12 => "12 dB/Oct",
            Slope::Db24 => "24 dB/Oct",
            Slope::Db36 => "36 dB/Oct",
            Slope::Db48 => "48 dB/Oct",
        }
    }
}

/// Plain snapshot of every filter parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainSettings {
    pub peak_freq: f32,
    pub peak_gain_db: f32,
    pub peak_quality: f32,
    pub low_cut_freq: f32,
    pub high_cut_freq: f32,
    pub low_cut_slope: Slope,
    pub high_cut_slope: Slope,
    pub peak_bypassed: bool,
    pub low_cut_bypassed: bool,
    pub high_cut_bypassed: bool,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            peak_freq: 750.0,
            peak_gain_db: 0.0,
            peak_quality: 1.0,
            low_cut_freq: 20.0,
            high_cut_freq: 20000.0,
            low_cut_slope: Slope::Db12,
            high_cut_slope: Slope::Db12,
            peak_bypassed: false,
            low_cut_bypassed: false,
            high_cut_bypassed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slope_sections() {
        assert_eq!(Slope::Db12.sections(), 1);
        assert_eq!(Slope::Db48.sections(), 4);
        assert_eq!(Slope::Db36.order(), 6);
        assert_eq!(Slope::Db24.db_per_octave(), 24);
    }

    #[test]
    fn slope_from_index_clamps() {
        assert_eq!(Slope::from_index(0), Slope::Db12);
        assert_eq!(Slope::from_index(2), Slope::Db36);
        assert_eq!(Slope::from_index(9), Slope::Db48);
    }
}
