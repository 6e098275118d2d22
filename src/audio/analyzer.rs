use std::sync::Arc;

use ringbuf::HeapRb;
use ringbuf::traits::{Consumer, Observer, Producer};
use rustfft::num_complex::Complex32;
use rustfft::{Fft, FftPlanner};

use super::fifo::BlockConsumer;
use crate::config::{AnalyzerConfig, validate_sample_rate};
use crate::error::ScopeError;

/// Magnitudes at or below this are treated as silence.
pub const MAGNITUDE_EPSILON: f32 = 1e-12;

/// Converts a linear magnitude to decibels, never going below `floor_db`.
pub fn gain_to_decibels(magnitude: f32, floor_db: f32) -> f32 {
    if !magnitude.is_finite() || magnitude <= MAGNITUDE_EPSILON {
        return floor_db;
    }
    (20.0 * magnitude.log10()).max(floor_db)
}

/// Most recent `len` samples of one channel, oldest first.
pub struct HistoryBuffer {
    samples: Vec<f32>,
    filled: usize,
}

impl HistoryBuffer {
    pub fn new(len: usize) -> Self {
        Self {
            samples: vec![0.0; len],
            filled: 0,
        }
    }

    /// Shifts out `block.len()` old samples and appends `block` at the end.
    pub fn append(&mut self, block: &[f32]) {
        let len = self.samples.len();
        if block.len() >= len {
            self.samples.copy_from_slice(&block[block.len() - len..]);
        } else {
            self.samples.copy_within(block.len().., 0);
            self.samples[len - block.len()..].copy_from_slice(block);
        }
        self.filled = (self.filled + block.len()).min(len);
    }

    pub fn is_full(&self) -> bool {
        self.filled == self.samples.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.fill(0.0);
        self.filled = 0;
    }
}

/// A decibel spectrum of `fft_size / 2` bins.
#[derive(Debug, Clone, PartialEq)]
pub struct FftFrame {
    bins: Vec<f32>,
    bin_width: f32,
}

impl FftFrame {
    pub fn bins(&self) -> &[f32] {
        &self.bins
    }

    pub fn bin_width(&self) -> f32 {
        self.bin_width
    }

    pub fn fft_size(&self) -> usize {
        self.bins.len() * 2
    }

    pub fn bin_frequency(&self, bin: usize) -> f32 {
        bin_frequency(bin, self.bin_width)
    }
}

pub fn bin_width(sample_rate: f64, fft_size: usize) -> f32 {
    (sample_rate / fft_size as f64) as f32
}

pub fn bin_frequency(bin: usize, bin_width: f32) -> f32 {
    bin as f32 * bin_width
}

/// Turns the blocks of one channel into decibel spectra.
pub struct SpectrumAnalyzer {
    config: AnalyzerConfig,
    blocks: BlockConsumer,
    history: HistoryBuffer,
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    fft_buffer: Vec<Complex32>,
    scratch: Vec<Complex32>,
    frames: HeapRb<FftFrame>,
    sample_rate: f64,
    pending: usize,
    dropped_frames: u64,
}

impl SpectrumAnalyzer {
    pub fn new(
        blocks: BlockConsumer,
        config: AnalyzerConfig,
        sample_rate: f64,
    ) -> Result<Self, ScopeError> {
        config.validate()?;
        let sample_rate = validate_sample_rate(sample_rate)?;

        let fft = FftPlanner::<f32>::new().plan_fft_forward(config.fft_size);
        let scratch = vec![Complex32::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        Ok(Self {
            blocks,
            history: HistoryBuffer::new(config.fft_size),
            window: config.window.table(config.fft_size),
            fft,
            fft_buffer: vec![Complex32::new(0.0, 0.0); config.fft_size],
            scratch,
            frames: HeapRb::new(config.frame_fifo_capacity),
            sample_rate,
            pending: 0,
            dropped_frames: 0,
            config,
        })
    }

    /// Drains every available block and queues any completed frames.
    /// Returns the number of frames produced.
    pub fn process(&mut self) -> usize {
        let mut produced = 0;
        loop {
            // The guard borrows the consumer, so it must be gone before
            // the frame is computed.
            let history = &mut self.history;
            let Some(len) = self.blocks.pop().map(|block| {
                history.append(&block);
                block.len()
            }) else {
                break;
            };
            self.pending += len;

            if self.history.is_full() && self.pending >= self.config.hop_size {
                self.pending = 0;
                let frame = self.compute_frame();
                if self.frames.try_push(frame).is_err() {
                    self.dropped_frames += 1;
                }
                produced += 1;
            }
        }
        produced
    }

    fn compute_frame(&mut self) -> FftFrame {
        for ((slot, &sample), &w) in self
            .fft_buffer
            .iter_mut()
            .zip(self.history.as_slice())
            .zip(&self.window)
        {
            *slot = Complex32::new(sample * w, 0.0);
        }

        self.fft
            .process_with_scratch(&mut self.fft_buffer, &mut self.scratch);

        let num_bins = self.config.fft_size / 2;
        let floor = self.config.floor_db;
        let bins = self.fft_buffer[..num_bins]
            .iter()
            .map(|c| gain_to_decibels(c.norm() / num_bins as f32, floor))
            .collect();

        FftFrame {
            bins,
            bin_width: bin_width(self.sample_rate, self.config.fft_size),
        }
    }

    pub fn pop_frame(&mut self) -> Option<FftFrame> {
        self.frames.try_pop()
    }

    pub fn available_frames(&self) -> usize {
        self.frames.occupied_len()
    }

    /// Updates the bin width of future frames. The history is kept.
    pub fn set_sample_rate(&mut self, sample_rate: f64) -> Result<(), ScopeError> {
        self.sample_rate = validate_sample_rate(sample_rate)?;
        Ok(())
    }

    /// Clears the history and queued frames, and discards every block
    /// still waiting in the FIFO.
    pub fn reset(&mut self) {
        while self.blocks.pop().is_some() {}
        self.history.clear();
        self.pending = 0;
        self.frames.clear();
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn fft_size(&self) -> usize {
        self.config.fft_size
    }

    pub fn floor_db(&self) -> f32 {
        self.config.floor_db
    }

    pub fn bin_width(&self) -> f32 {
        bin_width(self.sample_rate, self.config.fft_size)
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }

    pub fn pending_blocks(&self) -> usize {
        self.blocks.available_blocks()
    }
}
