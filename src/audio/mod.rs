pub mod analyzer;
pub mod collector;
pub mod devices;
pub mod fifo;
pub mod window;

pub use analyzer::{FftFrame, HistoryBuffer, SpectrumAnalyzer};
pub use collector::SampleCollector;
pub use fifo::{BlockConsumer, BlockGuard, BlockProducer, block_fifo};
