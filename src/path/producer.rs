use super::generator::PathGenerator;
use super::geometry::{Bounds, CurvePath};
use crate::audio::SpectrumAnalyzer;

/// Spectrum path of one channel: blocks in, newest path out.
pub struct PathProducer {
    analyzer: SpectrumAnalyzer,
    generator: PathGenerator,
    path: CurvePath,
}

impl PathProducer {
    pub fn new(analyzer: SpectrumAnalyzer, generator: PathGenerator) -> Self {
        Self {
            analyzer,
            generator,
            path: CurvePath::default(),
        }
    }

    /// Runs one poll: analyse pending blocks, turn every frame into a path,
    /// keep the newest. Returns `true` when the displayed path changed.
    pub fn process(&mut self, bounds: Bounds) -> bool {
        self.analyzer.process();

        let fft_size = self.analyzer.fft_size();
        let floor_db = self.analyzer.floor_db();
        while let Some(frame) = self.analyzer.pop_frame() {
            self.generator
                .generate(frame.bins(), bounds, fft_size, frame.bin_width(), floor_db);
        }

        match self.generator.take_latest() {
            Some(path) => {
                self.path = path;
                true
            }
            None => false,
        }
    }

    pub fn path(&self) -> &CurvePath {
        &self.path
    }

    pub fn analyzer(&self) -> &SpectrumAnalyzer {
        &self.analyzer
    }

    pub fn analyzer_mut(&mut self) -> &mut SpectrumAnalyzer {
        &mut self.analyzer
    }

    pub fn dropped(&self) -> (u64, u64) {
        (self.analyzer.dropped_frames(), self.generator.dropped_paths())
    }
}
