use std::sync::Arc;

use rayon::prelude::*;

use crate::audio::{SampleCollector, SpectrumAnalyzer, block_fifo};
use crate::change::{ChangeCoordinator, ChangeFlag};
use crate::config::{CHANNELS, DisplayRange, ScopeConfig};
use crate::error::ScopeError;
use crate::filters::{CoefficientPublisher, FilterCoefficients, FilterResponseCalculator, ResponseCurve};
use crate::params::Parameters;
use crate::path::{Bounds, CurvePath, PathGenerator, PathProducer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Left,
    Right,
}

impl Channel {
    pub const ALL: [Channel; CHANNELS] = [Channel::Left, Channel::Right];

    fn index(self) -> usize {
        self as usize
    }
}

/// Audio-thread end of the pipeline: one collector per channel.
pub struct AudioTap {
    collectors: Vec<SampleCollector>,
}

impl AudioTap {
    pub fn push_block(&mut self, channel: Channel, samples: &[f32]) {
        self.collectors[channel.index()].update(samples);
    }

    /// Splits an interleaved host buffer into the channel collectors. Mono
    /// input feeds both channels; channels past the second are ignored.
    pub fn push_interleaved(&mut self, data: &[f32], channels: usize) {
        if channels == 0 {
            return;
        }
        for frame in data.chunks_exact(channels) {
            let left = frame[0];
            let right = if channels > 1 { frame[1] } else { left };
            self.collectors[Channel::Left.index()].push_sample(left);
            self.collectors[Channel::Right.index()].push_sample(right);
        }
    }

    /// Re-blocks at a new size. Allocates; call outside the audio callback.
    pub fn prepare(&mut self, block_size: usize) {
        for collector in &mut self.collectors {
            collector.prepare(block_size);
        }
    }

    pub fn dropped_blocks(&self) -> u64 {
        self.collectors.iter().map(SampleCollector::dropped_blocks).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollOutcome {
    pub spectrum_updated: bool,
    pub response_updated: bool,
}

impl PollOutcome {
    pub fn has_new_data(&self) -> bool {
        self.spectrum_updated || self.response_updated
    }
}

/// Polling end of the pipeline: spectrum paths per channel plus the filter
/// response, refreshed by [`AnalysisPipeline::poll`].
pub struct AnalysisPipeline {
    config: ScopeConfig,
    producers: Vec<PathProducer>,
    coordinator: ChangeCoordinator,
    reported_drops: u64,
}

/// Builds both ends of the pipeline for one stream configuration.
pub fn pipeline(
    config: ScopeConfig,
    sample_rate: f64,
    parameters: Arc<Parameters>,
    flag: ChangeFlag,
) -> Result<(AudioTap, AnalysisPipeline), ScopeError> {
    config.validate()?;

    let mut collectors = Vec::with_capacity(CHANNELS);
    let mut producers = Vec::with_capacity(CHANNELS);
    for _ in Channel::ALL {
        let (producer, consumer) = block_fifo(config.block_fifo_capacity, config.max_block_size)?;
        collectors.push(SampleCollector::new(producer, config.block_size));

        let analyzer = SpectrumAnalyzer::new(consumer, config.analyzer, sample_rate)?;
        let generator = PathGenerator::new(
            config.frequencies,
            config.display,
            config.path_resolution,
            config.path_fifo_capacity,
        );
        producers.push(PathProducer::new(analyzer, generator));
    }

    let coordinator = ChangeCoordinator::new(
        flag,
        parameters,
        FilterResponseCalculator::new(config.frequencies),
        sample_rate,
        0,
    )?;

    log::debug!(
        "pipeline ready: {} Hz, fft {} (hop {}), blocks of {}, floor {} dB",
        sample_rate,
        config.analyzer.fft_size,
        config.analyzer.hop_size,
        config.block_size,
        config.analyzer.floor_db
    );

    Ok((
        AudioTap { collectors },
        AnalysisPipeline {
            config,
            producers,
            coordinator,
            reported_drops: 0,
        },
    ))
}

impl AnalysisPipeline {
    /// One refresh tick. Channels are analysed in parallel, then the filter
    /// response is recomputed if the parameters or the layout changed.
    pub fn poll(&mut self, bounds: Bounds) -> PollOutcome {
        self.coordinator.set_width(bounds.width.max(0.0) as usize);

        let spectrum_updated = self
            .producers
            .par_iter_mut()
            .map(|producer| producer.process(bounds))
            .reduce(|| false, |a, b| a || b);

        let response_updated = self.coordinator.poll();

        let drops = self.dropped();
        if drops > self.reported_drops {
            log::warn!(
                "analysis falling behind: {} frames/paths dropped",
                drops - self.reported_drops
            );
            self.reported_drops = drops;
        }

        let outcome = PollOutcome {
            spectrum_updated,
            response_updated,
        };
        log::trace!("poll: {outcome:?}");
        outcome
    }

    pub fn path(&self, channel: Channel) -> &CurvePath {
        self.producers[channel.index()].path()
    }

    pub fn response_curve(&self) -> &ResponseCurve {
        self.coordinator.response()
    }

    pub fn response_path(&self, bounds: Bounds) -> CurvePath {
        self.coordinator.response().to_path(bounds, self.config.display)
    }

    pub fn coefficients(&self) -> &FilterCoefficients {
        self.coordinator.coefficients()
    }

    pub fn coordinator(&self) -> &ChangeCoordinator {
        &self.coordinator
    }

    pub fn set_publisher(&mut self, publisher: CoefficientPublisher) {
        self.coordinator.set_publisher(publisher);
    }

    /// Applies a new host sample rate. Spectrum history is discarded.
    pub fn set_sample_rate(&mut self, sample_rate: f64) -> Result<(), ScopeError> {
        for producer in &mut self.producers {
            let analyzer = producer.analyzer_mut();
            analyzer.set_sample_rate(sample_rate)?;
            analyzer.reset();
        }
        self.coordinator.set_sample_rate(sample_rate)
    }

    pub fn sample_rate(&self) -> f64 {
        self.coordinator.sample_rate()
    }

    pub fn display_range(&self) -> DisplayRange {
        self.config.display
    }

    /// Display range used for the spectrum, stretched to the analyzer floor.
    pub fn spectrum_display_range(&self) -> DisplayRange {
        self.config.display.including(self.config.analyzer.floor_db)
    }

    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    pub fn dropped(&self) -> u64 {
        self.producers
            .iter()
            .map(|p| {
                let (frames, paths) = p.dropped();
                frames + paths
            })
            .sum()
    }
}
