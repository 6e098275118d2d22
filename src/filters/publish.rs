//! Hands freshly computed coefficient sets to the real-time filter executor.
//!
//! `FilterCoefficients` is `Copy` and heap-free, so the receiver can drain the
//! ring on the audio thread without allocating or freeing anything.

use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};

use super::coefficients::FilterCoefficients;

pub struct CoefficientPublisher {
    producer: HeapProd<FilterCoefficients>,
    dropped: u64,
}

pub struct CoefficientReceiver {
    consumer: HeapCons<FilterCoefficients>,
    current: Option<FilterCoefficients>,
}

pub fn coefficient_channel(capacity: usize) -> (CoefficientPublisher, CoefficientReceiver) {
    let (producer, consumer) = HeapRb::new(capacity.max(1)).split();
    (
        CoefficientPublisher {
            producer,
            dropped: 0,
        },
        CoefficientReceiver {
            consumer,
            current: None,
        },
    )
}

impl CoefficientPublisher {
    /// Returns `false` if the receiver has fallen behind and the set was dropped.
    pub fn publish(&mut self, coefficients: FilterCoefficients) -> bool {
        let pushed = self.producer.try_push(coefficients).is_ok();
        if !pushed {
            self.dropped += 1;
        }
        pushed
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn is_full(&self) -> bool {
        self.producer.is_full()
    }
}

impl CoefficientReceiver {
    /// Newest published set, if any has arrived since construction.
    pub fn latest(&mut self) -> Option<&FilterCoefficients> {
        while let Some(coefficients) = self.consumer.try_pop() {
            self.current = Some(coefficients);
        }
        self.current.as_ref()
    }
}
