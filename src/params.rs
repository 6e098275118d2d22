use std::sync::atomic::{AtomicU32, Ordering};

use crate::filters::{ChainSettings, Slope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterId {
    PeakFreq,
    PeakGain,
    PeakQuality,
    LowCutFreq,
    HighCutFreq,
    LowCutSlope,
    HighCutSlope,
    PeakBypassed,
    LowCutBypassed,
    HighCutBypassed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl ParameterId {
    pub const COUNT: usize = 10;

    pub const ALL: [ParameterId; Self::COUNT] = [
        ParameterId::PeakFreq,
        ParameterId::PeakGain,
        ParameterId::PeakQuality,
        ParameterId::LowCutFreq,
        ParameterId::HighCutFreq,
        ParameterId::LowCutSlope,
        ParameterId::HighCutSlope,
        ParameterId::PeakBypassed,
        ParameterId::LowCutBypassed,
        ParameterId::HighCutBypassed,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ParameterId::PeakFreq => "Peak Freq",
            ParameterId::PeakGain => "Peak Gain",
            ParameterId::PeakQuality => "Peak Quality",
            ParameterId::LowCutFreq => "LowCut Freq",
            ParameterId::HighCutFreq => "HighCut Freq",
            ParameterId::LowCutSlope => "LowCut Slope",
            ParameterId::HighCutSlope => "HighCut Slope",
            ParameterId::PeakBypassed => "Peak Bypassed",
            ParameterId::LowCutBypassed => "LowCut Bypassed",
            ParameterId::HighCutBypassed => "HighCut Bypassed",
        }
    }

    pub fn range(self) -> ParameterRange {
        let (min, max, default) = match self {
            ParameterId::PeakFreq => (20.0, 20000.0, 750.0),
            ParameterId::PeakGain => (-24.0, 24.0, 0.0),
            ParameterId::PeakQuality => (0.1, 10.0, 1.0),
            ParameterId::LowCutFreq => (20.0, 20000.0, 20.0),
            ParameterId::HighCutFreq => (20.0, 20000.0, 20000.0),
            ParameterId::LowCutSlope | ParameterId::HighCutSlope => {
                (0.0, (Slope::ALL.len() - 1) as f32, 0.0)
            }
            ParameterId::PeakBypassed
            | ParameterId::LowCutBypassed
            | ParameterId::HighCutBypassed => (0.0, 1.0, 0.0),
        };
        ParameterRange { min, max, default }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Observer notified after every parameter edit.
pub trait ParameterListener: Send + Sync {
    fn parameter_changed(&self, id: ParameterId, value: f32);
}

impl<F> ParameterListener for F
where
    F: Fn(ParameterId, f32) + Send + Sync,
{
    fn parameter_changed(&self, id: ParameterId, value: f32) {
        self(id, value)
    }
}

/// Lock-free parameter values shared between the host, the UI and the poller.
pub struct Parameters {
    values: [AtomicU32; ParameterId::COUNT],
    listeners: Vec<Box<dyn ParameterListener>>,
}

impl Default for Parameters {
    fn default() -> Self {
        Self::new()
    }
}

impl Parameters {
    pub fn new() -> Self {
        Self {
            values: ParameterId::ALL.map(|id| AtomicU32::new(id.range().default.to_bits())),
            listeners: Vec::new(),
        }
    }

    pub fn with_listener(mut self, listener: impl ParameterListener + 'static) -> Self {
        self.add_listener(listener);
        self
    }

    pub fn add_listener(&mut self, listener: impl ParameterListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn get(&self, id: ParameterId) -> f32 {
        f32::from_bits(self.values[id.index()].load(Ordering::Acquire))
    }

    /// Stores `value` clamped to the parameter's range and notifies listeners
    /// if it changed.
    pub fn set(&self, id: ParameterId, value: f32) {
        if value.is_nan() {
            return;
        }
        let range = id.range();
        let value = value.clamp(range.min, range.max);
        let previous = self.values[id.index()].swap(value.to_bits(), Ordering::AcqRel);
        if previous != value.to_bits() {
            for listener in &self.listeners {
                listener.parameter_changed(id, value);
            }
        }
    }

    pub fn get_bool(&self, id: ParameterId) -> bool {
        self.get(id) >= 0.5
    }

    pub fn set_bool(&self, id: ParameterId, value: bool) {
        self.set(id, if value { 1.0 } else { 0.0 });
    }

    pub fn reset(&self) {
        for id in ParameterId::ALL {
            self.set(id, id.range().default);
        }
    }

    pub fn chain_settings(&self) -> ChainSettings {
        ChainSettings {
            peak_freq: self.get(ParameterId::PeakFreq),
            peak_gain_db: self.get(ParameterId::PeakGain),
            peak_quality: self.get(ParameterId::PeakQuality),
            low_cut_freq: self.get(ParameterId::LowCutFreq),
            high_cut_freq: self.get(ParameterId::HighCutFreq),
            low_cut_slope: Slope::from_index(self.get(ParameterId::LowCutSlope).round() as usize),
            high_cut_slope: Slope::from_index(self.get(ParameterId::HighCutSlope).round() as usize),
            peak_bypassed: self.get_bool(ParameterId::PeakBypassed),
            low_cut_bypassed: self.get_bool(ParameterId::LowCutBypassed),
            high_cut_bypassed: self.get_bool(ParameterId::HighCutBypassed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn defaults_match_chain_settings() {
        let params = Parameters::new();
        assert_eq!(params.chain_settings(), ChainSettings::default());
    }

    #[test]
    fn values_are_clamped() {
        let params = Parameters::new();
        params.set(ParameterId::PeakGain, 60.0);
        assert_eq!(params.get(ParameterId::PeakGain), 24.0);
        params.set(ParameterId::PeakQuality, 0.0);
        assert_eq!(params.get(ParameterId::PeakQuality), 0.1);
        params.set(ParameterId::HighCutSlope, 7.0);
        assert_eq!(params.chain_settings().high_cut_slope, Slope::Db48);
    }

    #[test]
    fn listeners_fire_on_change_only() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let params = Parameters::new().with_listener(move |_id: ParameterId, _value: f32| {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        params.set(ParameterId::PeakFreq, 1000.0);
        params.set(ParameterId::PeakFreq, 1000.0);
        params.set(ParameterId::PeakGain, 3.0);
        params.set(ParameterId::PeakGain, f32::NAN);
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn bool_parameters() {
        let params = Parameters::new();
        assert!(!params.chain_settings().peak_bypassed);
        params.set_bool(ParameterId::PeakBypassed, true);
        assert!(params.chain_settings().peak_bypassed);
    }

    #[test]
    fn reset_restores_defaults() {
        let params = Parameters::new();
        params.set(ParameterId::LowCutFreq, 400.0);
        params.set(ParameterId::LowCutSlope, 3.0);
        params.reset();
        assert_eq!(params.chain_settings(), ChainSettings::default());
    }
}
