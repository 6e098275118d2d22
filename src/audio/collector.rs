use super::fifo::BlockProducer;

/// Gathers samples of one channel into fixed-size blocks and forwards each
/// completed block to the FIFO. Lives on the audio thread.
pub struct SampleCollector {
    producer: BlockProducer,
    buffer: Vec<f32>,
    block_size: usize,
    dropped_blocks: u64,
}

impl SampleCollector {
    pub fn new(producer: BlockProducer, block_size: usize) -> Self {
        let block_size = block_size.clamp(1, producer.max_block_size());
        Self {
            producer,
            buffer: Vec::with_capacity(block_size),
            block_size,
            dropped_blocks: 0,
        }
    }

    /// Changes the block size. Allocates; call outside the audio callback.
    pub fn prepare(&mut self, block_size: usize) {
        self.block_size = block_size.clamp(1, self.producer.max_block_size());
        self.buffer = Vec::with_capacity(self.block_size);
    }

    #[inline]
    pub fn push_sample(&mut self, sample: f32) {
        self.buffer.push(sample);
        if self.buffer.len() == self.block_size {
            if !self.producer.push(&self.buffer) {
                self.dropped_blocks += 1;
            }
            self.buffer.clear();
        }
    }

    pub fn update(&mut self, samples: &[f32]) {
        for &sample in samples {
            self.push_sample(sample);
        }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn dropped_blocks(&self) -> u64 {
        self.dropped_blocks
    }

    pub fn pending_samples(&self) -> usize {
        self.buffer.len()
    }
}
