use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ScopeError {
    #[error("fft size {0} must be a power of two between 16 and 32768")]
    FftSize(usize),

    #[error("hop size {hop} must be between 1 and the fft size {fft}")]
    HopSize { hop: usize, fft: usize },

    #[error("decibel floor {0} must be finite and below 0 dB")]
    Floor(f32),

    #[error("frequency range {low} Hz..{high} Hz is empty or not positive")]
    FrequencyRange { low: f32, high: f32 },

    #[error("display range {min} dB..{max} dB is empty")]
    DisplayRange { min: f32, max: f32 },

    #[error("block size {block} must be between 1 and {max}")]
    BlockSize { block: usize, max: usize },

    #[error("{0} capacity must be at least one")]
    Capacity(&'static str),

    #[error("path resolution must be at least one bin")]
    PathResolution,

    #[error("sample rate {0} Hz is not usable")]
    SampleRate(f64),
}
