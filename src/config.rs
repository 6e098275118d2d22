use crate::audio::window::WindowKind;
use crate::error::ScopeError;

pub const CHANNELS: usize = 2;
pub const BLOCK_SIZE: usize = 512;
pub const MAX_BLOCK_SIZE: usize = 8192;

pub const FFT_ORDER: usize = 11;
pub const FFT_SIZE: usize = 1 << FFT_ORDER;
pub const HOP_SIZE: usize = FFT_SIZE;

pub const NEGATIVE_INFINITY_DB: f32 = -48.0;
pub const DISPLAY_MIN_DB: f32 = -24.0;
pub const DISPLAY_MAX_DB: f32 = 24.0;
pub const RESPONSE_FLOOR_DB: f64 = -100.0;

pub const MIN_FREQUENCY: f32 = 20.0;
pub const MAX_FREQUENCY: f32 = 20000.0;

pub const REFRESH_RATE_HZ: u32 = 60;

pub const BLOCK_FIFO_CAPACITY: usize = 30;
pub const FRAME_FIFO_CAPACITY: usize = 30;
pub const PATH_FIFO_CAPACITY: usize = 30;
pub const COEFFICIENT_FIFO_CAPACITY: usize = 4;

// Every other bin is plenty above a few hundred Hz.
pub const PATH_RESOLUTION: usize = 2;

pub const MAX_CUT_SECTIONS: usize = 4;

const MIN_FFT_SIZE: usize = 16;
const MAX_FFT_SIZE: usize = 32768;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzerConfig {
    pub fft_size: usize,
    pub hop_size: usize,
    pub floor_db: f32,
    pub window: WindowKind,
    pub frame_fifo_capacity: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fft_size: FFT_SIZE,
            hop_size: HOP_SIZE,
            floor_db: NEGATIVE_INFINITY_DB,
            window: WindowKind::BlackmanHarris,
            frame_fifo_capacity: FRAME_FIFO_CAPACITY,
        }
    }
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<(), ScopeError> {
        if !self.fft_size.is_power_of_two()
            || self.fft_size < MIN_FFT_SIZE
            || self.fft_size > MAX_FFT_SIZE
        {
            return Err(ScopeError::FftSize(self.fft_size));
        }
        if self.hop_size == 0 || self.hop_size > self.fft_size {
            return Err(ScopeError::HopSize {
                hop: self.hop_size,
                fft: self.fft_size,
            });
        }
        if !self.floor_db.is_finite() || self.floor_db >= 0.0 {
            return Err(ScopeError::Floor(self.floor_db));
        }
        if self.frame_fifo_capacity == 0 {
            return Err(ScopeError::Capacity("frame fifo"));
        }
        Ok(())
    }
}

/// Frequency span shown on the horizontal axis, in Hz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyRange {
    pub low: f32,
    pub high: f32,
}

impl Default for FrequencyRange {
    fn default() -> Self {
        Self {
            low: MIN_FREQUENCY,
            high: MAX_FREQUENCY,
        }
    }
}

impl FrequencyRange {
    pub fn new(low: f32, high: f32) -> Result<Self, ScopeError> {
        let range = Self { low, high };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<(), ScopeError> {
        if !(self.low.is_finite() && self.high.is_finite()) || self.low <= 0.0 || self.low >= self.high {
            return Err(ScopeError::FrequencyRange {
                low: self.low,
                high: self.high,
            });
        }
        Ok(())
    }

    pub fn contains(&self, freq: f32) -> bool {
        freq >= self.low && freq <= self.high
    }
}

/// Decibel span shown on the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRange {
    pub min_db: f32,
    pub max_db: f32,
}

impl Default for DisplayRange {
    fn default() -> Self {
        Self {
            min_db: DISPLAY_MIN_DB,
            max_db: DISPLAY_MAX_DB,
        }
    }
}

impl DisplayRange {
    pub fn validate(&self) -> Result<(), ScopeError> {
        if !(self.min_db.is_finite() && self.max_db.is_finite()) || self.min_db >= self.max_db {
            return Err(ScopeError::DisplayRange {
                min: self.min_db,
                max: self.max_db,
            });
        }
        Ok(())
    }

    /// Range stretched downwards so that `floor_db` stays visible.
    pub fn including(&self, floor_db: f32) -> Self {
        Self {
            min_db: self.min_db.min(floor_db),
            max_db: self.max_db,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScopeConfig {
    pub analyzer: AnalyzerConfig,
    pub frequencies: FrequencyRange,
    pub display: DisplayRange,
    pub block_size: usize,
    pub max_block_size: usize,
    pub block_fifo_capacity: usize,
    pub path_fifo_capacity: usize,
    pub path_resolution: usize,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            analyzer: AnalyzerConfig::default(),
            frequencies: FrequencyRange::default(),
            display: DisplayRange::default(),
            block_size: BLOCK_SIZE,
            max_block_size: MAX_BLOCK_SIZE,
            block_fifo_capacity: BLOCK_FIFO_CAPACITY,
            path_fifo_capacity: PATH_FIFO_CAPACITY,
            path_resolution: PATH_RESOLUTION,
        }
    }
}

impl ScopeConfig {
    pub fn validate(&self) -> Result<(), ScopeError> {
        self.analyzer.validate()?;
        self.frequencies.validate()?;
        self.display.validate()?;
        if self.block_size == 0 || self.block_size > self.max_block_size {
            return Err(ScopeError::BlockSize {
                block: self.block_size,
                max: self.max_block_size,
            });
        }
        if self.block_fifo_capacity == 0 {
            return Err(ScopeError::Capacity("block fifo"));
        }
        if self.path_fifo_capacity == 0 {
            return Err(ScopeError::Capacity("path fifo"));
        }
        if self.path_resolution == 0 {
            return Err(ScopeError::PathResolution);
        }
        Ok(())
    }
}

pub fn validate_sample_rate(sample_rate: f64) -> Result<f64, ScopeError> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(sample_rate)
    } else {
        Err(ScopeError::SampleRate(sample_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ScopeConfig::default().validate().is_ok());
        assert_eq!(FFT_SIZE, 2048);
    }

    #[test]
    fn rejects_non_power_of_two_fft() {
        let config = AnalyzerConfig {
            fft_size: 3000,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ScopeError::FftSize(3000))));
    }

    #[test]
    fn rejects_hop_larger_than_window() {
        let config = AnalyzerConfig {
            hop_size: FFT_SIZE * 2,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ScopeError::HopSize { .. })));
    }

    #[test]
    fn rejects_inverted_frequency_range() {
        assert!(FrequencyRange::new(20000.0, 20.0).is_err());
        assert!(FrequencyRange::new(100.0, 100.0).is_err());
        assert!(FrequencyRange::new(0.0, 100.0).is_err());
        assert!(FrequencyRange::new(20.0, 20000.0).is_ok());
    }

    #[test]
    fn rejects_bad_block_size() {
        let config = ScopeConfig {
            block_size: MAX_BLOCK_SIZE + 1,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ScopeError::BlockSize { .. })));
    }

    #[test]
    fn display_range_extends_to_floor() {
        let range = DisplayRange::default().including(NEGATIVE_INFINITY_DB);
        assert_eq!(range.min_db, -48.0);
        assert_eq!(range.max_db, 24.0);

        let range = DisplayRange::default().including(-12.0);
        assert_eq!(range.min_db, -24.0);
    }

    #[test]
    fn sample_rate_must_be_positive() {
        assert!(validate_sample_rate(48000.0).is_ok());
        assert!(validate_sample_rate(0.0).is_err());
        assert!(validate_sample_rate(f64::NAN).is_err());
    }
}
