use ringbuf::HeapRb;
use ringbuf::traits::{Consumer, Observer, RingBuffer};

use super::geometry::{Bounds, CurvePath, Point, map_from_log10, remap};
use crate::config::{DisplayRange, FrequencyRange};

/// Maps spectra to screen-space paths and queues them for the renderer.
pub struct PathGenerator {
    frequencies: FrequencyRange,
    display: DisplayRange,
    resolution: usize,
    paths: HeapRb<CurvePath>,
    dropped_paths: u64,
}

impl PathGenerator {
    pub fn new(
        frequencies: FrequencyRange,
        display: DisplayRange,
        resolution: usize,
        capacity: usize,
    ) -> Self {
        Self {
            frequencies,
            display,
            resolution: resolution.max(1),
            paths: HeapRb::new(capacity.max(1)),
            dropped_paths: 0,
        }
    }

    /// Builds the path for one spectrum.
    ///
    /// Bin `i` sits at `i * bin_width` Hz on a log10 axis across the width of
    /// `bounds`; its level maps linearly across the height, over the display
    /// range stretched down to `floor_db`. Bins outside the frequency range or
    /// above Nyquist are left out.
    pub fn generate_path(
        &self,
        fft_data: &[f32],
        bounds: Bounds,
        fft_size: usize,
        bin_width: f32,
        floor_db: f32,
    ) -> CurvePath {
        if bounds.is_empty() || !(bin_width > 0.0) {
            return CurvePath::default();
        }

        let num_bins = (fft_size / 2).min(fft_data.len());
        let nyquist = bin_width * (fft_size / 2) as f32;
        let low = self.frequencies.low;
        let high = self.frequencies.high;
        let ceiling = high.min(nyquist);
        let range = self.display.including(floor_db);

        let first_bin = ((low / bin_width).ceil() as usize).max(1);
        let mut path = CurvePath::with_capacity(num_bins.saturating_sub(first_bin) / self.resolution + 1);

        for bin in (first_bin..num_bins).step_by(self.resolution) {
            let freq = bin as f32 * bin_width;
            if freq < low {
                continue;
            }
            if freq > ceiling {
                break;
            }
            let db = fft_data[bin];
            if db.is_nan() {
                continue;
            }

            let x = bounds.left + map_from_log10(freq, low, high) * bounds.width;
            let y = remap(
                db.clamp(range.min_db, range.max_db),
                range.min_db,
                range.max_db,
                bounds.bottom(),
                bounds.top,
            );
            path.line_to(Point::new(
                x.clamp(bounds.left, bounds.right()),
                y.clamp(bounds.top, bounds.bottom()),
            ));
        }

        path
    }

    /// Generates a path and queues it. A full queue gives up its oldest path
    /// so the newest analysis is always the one displayed.
    pub fn generate(
        &mut self,
        fft_data: &[f32],
        bounds: Bounds,
        fft_size: usize,
        bin_width: f32,
        floor_db: f32,
    ) {
        let path = self.generate_path(fft_data, bounds, fft_size, bin_width, floor_db);
        if self.paths.push_overwrite(path).is_some() {
            self.dropped_paths += 1;
        }
    }

    /// Drains the queue and returns only the newest path.
    pub fn take_latest(&mut self) -> Option<CurvePath> {
        let mut latest = None;
        while let Some(path) = self.paths.try_pop() {
            latest = Some(path);
        }
        latest
    }

    pub fn available_paths(&self) -> usize {
        self.paths.occupied_len()
    }

    pub fn dropped_paths(&self) -> u64 {
        self.dropped_paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> PathGenerator {
        PathGenerator::new(FrequencyRange::default(), DisplayRange::default(), 1, 8)
    }

    #[test]
    fn points_stay_within_bounds() {
        let bounds = Bounds::new(12.0, 30.0, 400.0, 200.0);
        let fft_size = 2048;
        let bin_width = 48000.0 / fft_size as f32;
        let data: Vec<f32> = (0..fft_size / 2)
            .map(|i| -96.0 + (i % 150) as f32)
            .collect();

        let path = generator().generate_path(&data, bounds, fft_size, bin_width, -48.0);
        assert!(!path.is_empty());
        for point in path.points() {
            assert!(bounds.contains(*point), "{point:?} outside {bounds:?}");
        }
    }

    #[test]
    fn excludes_frequencies_outside_audible_range() {
        let bounds = Bounds::new(0.0, 0.0, 1000.0, 100.0);
        let fft_size = 2048;
        let bin_width = 48000.0 / fft_size as f32;
        let data = vec![0.0; fft_size / 2];

        let path = generator().generate_path(&data, bounds, fft_size, bin_width, -48.0);

        let first_bin = (20.0 / bin_width).ceil() as usize;
        let last_bin = (20000.0 / bin_width).floor() as usize;
        assert_eq!(path.len(), last_bin - first_bin + 1);
    }

    #[test]
    fn nyquist_caps_low_sample_rates() {
        let bounds = Bounds::new(0.0, 0.0, 500.0, 100.0);
        let fft_size = 256;
        let bin_width = 8000.0 / fft_size as f32;
        let data = vec![0.0; fft_size / 2];

        let path = generator().generate_path(&data, bounds, fft_size, bin_width, -48.0);
        let last = path.points().last().unwrap();
        assert!(last.x < bounds.left + map_from_log10(4000.0, 20.0, 20000.0) * bounds.width + 1e-3);
    }

    #[test]
    fn x_increases_monotonically() {
        let bounds = Bounds::new(0.0, 0.0, 600.0, 100.0);
        let data = vec![-10.0; 1024];
        let path = generator().generate_path(&data, bounds, 2048, 44100.0 / 2048.0, -48.0);
        for pair in path.points().windows(2) {
            assert!(pair[1].x > pair[0].x);
        }
    }

    #[test]
    fn floor_maps_to_bottom_and_top_of_range_to_top() {
        let bounds = Bounds::new(0.0, 10.0, 600.0, 100.0);
        let generator = generator();

        let silent = vec![-48.0; 1024];
        let path = generator.generate_path(&silent, bounds, 2048, 48000.0 / 2048.0, -48.0);
        assert!(path.points().iter().all(|p| p.y == bounds.bottom()));

        let loud = vec![24.0; 1024];
        let path = generator.generate_path(&loud, bounds, 2048, 48000.0 / 2048.0, -48.0);
        assert!(path.points().iter().all(|p| p.y == bounds.top));
    }

    #[test]
    fn resolution_skips_bins() {
        let bounds = Bounds::new(0.0, 0.0, 600.0, 100.0);
        let data = vec![0.0; 1024];
        let every = generator().generate_path(&data, bounds, 2048, 48000.0 / 2048.0, -48.0);
        let sparse = PathGenerator::new(FrequencyRange::default(), DisplayRange::default(), 2, 8)
            .generate_path(&data, bounds, 2048, 48000.0 / 2048.0, -48.0);
        assert_eq!(sparse.len(), every.len().div_ceil(2));
    }

    #[test]
    fn keeps_only_latest_path() {
        let mut generator = generator();
        let bounds = Bounds::new(0.0, 0.0, 100.0, 100.0);
        for level in [-40.0, -20.0, 0.0] {
            generator.generate(&vec![level; 1024], bounds, 2048, 48000.0 / 2048.0, -48.0);
        }
        assert_eq!(generator.available_paths(), 3);

        let latest = generator.take_latest().unwrap();
        let expected =
            generator.generate_path(&vec![0.0; 1024], bounds, 2048, 48000.0 / 2048.0, -48.0);
        assert_eq!(latest, expected);
        assert!(generator.take_latest().is_none());
    }

    #[test]
    fn full_queue_evicts_oldest_path() {
        let mut generator =
            PathGenerator::new(FrequencyRange::default(), DisplayRange::default(), 1, 2);
        let bounds = Bounds::new(0.0, 0.0, 100.0, 100.0);
        for level in [-48.0, -48.0, -48.0, 12.0] {
            generator.generate(&vec![level; 1024], bounds, 2048, 48000.0 / 2048.0, -48.0);
        }
        assert_eq!(generator.available_paths(), 2);
        assert_eq!(generator.dropped_paths(), 2);

        let latest = generator.take_latest().unwrap();
        let loud = generator.generate_path(&vec![12.0; 1024], bounds, 2048, 48000.0 / 2048.0, -48.0);
        assert_eq!(latest, loud);
    }

    #[test]
    fn empty_bounds_give_empty_path() {
        let path = generator().generate_path(&[0.0; 1024], Bounds::default(), 2048, 23.4, -48.0);
        assert!(path.is_empty());
    }
}
