use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::validate_sample_rate;
use crate::error::ScopeError;
use crate::filters::{CoefficientPublisher, FilterCoefficients, FilterResponseCalculator, ResponseCurve};
use crate::params::{ParameterId, ParameterListener, Parameters};

/// Dirty bit shared by every parameter callback and the poller.
#[derive(Debug, Clone, Default)]
pub struct ChangeFlag(Arc<AtomicBool>);

impl ChangeFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clean -> Dirty. Repeated calls are no-ops.
    pub fn notify(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Dirty -> Clean in one atomic step. Returns whether it was dirty.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    pub fn is_dirty(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl ParameterListener for ChangeFlag {
    fn parameter_changed(&self, _id: ParameterId, _value: f32) {
        self.notify();
    }
}

/// Owns the response side of the display: the coefficient snapshot, the
/// response curve, and the poll that keeps both in step with the parameters.
pub struct ChangeCoordinator {
    flag: ChangeFlag,
    parameters: Arc<Parameters>,
    calculator: FilterResponseCalculator,
    publisher: Option<CoefficientPublisher>,
    sample_rate: f64,
    width: usize,
    coefficients: FilterCoefficients,
    response: ResponseCurve,
    recomputations: u64,
}

impl ChangeCoordinator {
    /// Computes the initial coefficients and curve straight away.
    pub fn new(
        flag: ChangeFlag,
        parameters: Arc<Parameters>,
        calculator: FilterResponseCalculator,
        sample_rate: f64,
        width: usize,
    ) -> Result<Self, ScopeError> {
        let sample_rate = validate_sample_rate(sample_rate)?;
        let mut coordinator = Self {
            flag,
            parameters,
            calculator,
            publisher: None,
            sample_rate,
            width,
            coefficients: FilterCoefficients::flat(sample_rate),
            response: ResponseCurve::default(),
            recomputations: 0,
        };
        coordinator.recompute();
        Ok(coordinator)
    }

    /// Forwards every recomputed coefficient set to the real-time executor.
    pub fn set_publisher(&mut self, mut publisher: CoefficientPublisher) {
        publisher.publish(self.coefficients);
        self.publisher = Some(publisher);
    }

    /// Recomputes if anything changed since the last poll. Returns `true`
    /// when new coefficients and a new curve are available.
    pub fn poll(&mut self) -> bool {
        if !self.flag.take() {
            return false;
        }
        self.recompute();
        true
    }

    fn recompute(&mut self) {
        let settings = self.parameters.chain_settings();
        self.coefficients = FilterCoefficients::from_settings(&settings, self.sample_rate);
        self.response = self
            .calculator
            .compute_response(&self.coefficients, self.sample_rate, self.width);

        if let Some(publisher) = self.publisher.as_mut() {
            if !publisher.publish(self.coefficients) {
                log::warn!("filter executor lagging, coefficient update dropped");
            }
        }

        self.recomputations += 1;
        log::debug!(
            "recomputed filter response #{} ({} columns at {} Hz)",
            self.recomputations,
            self.width,
            self.sample_rate
        );
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) -> Result<(), ScopeError> {
        let sample_rate = validate_sample_rate(sample_rate)?;
        if sample_rate != self.sample_rate {
            self.sample_rate = sample_rate;
            self.flag.notify();
        }
        Ok(())
    }

    pub fn set_width(&mut self, width: usize) {
        if width != self.width {
            self.width = width;
            self.flag.notify();
        }
    }

    pub fn flag(&self) -> &ChangeFlag {
        &self.flag
    }

    pub fn coefficients(&self) -> &FilterCoefficients {
        &self.coefficients
    }

    pub fn response(&self) -> &ResponseCurve {
        &self.response
    }

    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::coefficient_channel;

    fn coordinator() -> (Arc<Parameters>, ChangeCoordinator) {
        let flag = ChangeFlag::new();
        let parameters = Arc::new(Parameters::new().with_listener(flag.clone()));
        let coordinator = ChangeCoordinator::new(
            flag,
            parameters.clone(),
            FilterResponseCalculator::default(),
            48000.0,
            256,
        )
        .unwrap();
        (parameters, coordinator)
    }

    #[test]
    fn flag_collapses_notifications() {
        let flag = ChangeFlag::new();
        assert!(!flag.take());
        flag.notify();
        flag.notify();
        assert!(flag.is_dirty());
        assert!(flag.take());
        assert!(!flag.take());
    }

    #[test]
    fn computes_on_construction() {
        let (_parameters, coordinator) = coordinator();
        assert_eq!(coordinator.recomputations(), 1);
        assert_eq!(coordinator.response().width(), 256);
    }

    #[test]
    fn burst_of_edits_recomputes_once() {
        let (parameters, mut coordinator) = coordinator();

        for i in 0..50 {
            parameters.set(ParameterId::PeakGain, -12.0 + i as f32 * 0.25);
        }
        assert!(coordinator.poll());
        assert_eq!(coordinator.recomputations(), 2);

        assert!(!coordinator.poll());
        assert_eq!(coordinator.recomputations(), 2);
    }

    #[test]
    fn poll_reflects_latest_parameters() {
        let (parameters, mut coordinator) = coordinator();
        parameters.set_bool(ParameterId::LowCutBypassed, true);
        parameters.set_bool(ParameterId::HighCutBypassed, true);
        parameters.set(ParameterId::PeakGain, 6.0);
        coordinator.poll();

        let max = coordinator
            .response()
            .magnitudes_db()
            .iter()
            .cloned()
            .fold(f64::MIN, f64::max);
        assert!((max - 6.0).abs() < 0.05);
    }

    #[test]
    fn edits_from_other_threads_are_seen() {
        let (parameters, mut coordinator) = coordinator();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let parameters = parameters.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        parameters.set(ParameterId::PeakFreq, 100.0 + (t * 100 + i) as f32);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(coordinator.poll());
        assert!(!coordinator.poll());
    }

    #[test]
    fn resize_and_sample_rate_mark_dirty() {
        let (_parameters, mut coordinator) = coordinator();
        coordinator.set_width(256);
        assert!(!coordinator.poll());

        coordinator.set_width(512);
        assert!(coordinator.poll());
        assert_eq!(coordinator.response().width(), 512);

        coordinator.set_sample_rate(96000.0).unwrap();
        assert!(coordinator.poll());
        assert_eq!(coordinator.coefficients().sample_rate, 96000.0);
        assert!(coordinator.set_sample_rate(-1.0).is_err());
    }

    #[test]
    fn publishes_each_recomputation() {
        let (parameters, mut coordinator) = coordinator();
        let (publisher, mut receiver) = coefficient_channel(4);
        coordinator.set_publisher(publisher);
        assert!(receiver.latest().is_some());

        parameters.set_bool(ParameterId::PeakBypassed, true);
        coordinator.poll();
        assert!(receiver.latest().unwrap().peak.bypassed);
    }
}
