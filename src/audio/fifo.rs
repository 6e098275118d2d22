//! Single-producer/single-consumer FIFO of audio blocks.
//!
//! Two lock-free rings move preallocated sample buffers back and forth: the
//! producer takes an empty buffer from the `free` ring, copies the block into
//! it and hands it over through the `filled` ring. The consumer returns every
//! buffer to `free` once it is done reading, so neither side allocates after
//! construction.

use std::ops::Deref;

use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};

use crate::error::ScopeError;

/// Real-time half. Owned by the audio callback.
pub struct BlockProducer {
    filled: HeapProd<Vec<f32>>,
    free: HeapCons<Vec<f32>>,
    max_block_size: usize,
}

/// Analysis half. Owned by the polling side.
pub struct BlockConsumer {
    filled: HeapCons<Vec<f32>>,
    free: HeapProd<Vec<f32>>,
}

/// A block borrowed from the FIFO. The slot is recycled when the guard drops.
pub struct BlockGuard<'a> {
    block: Option<Vec<f32>>,
    free: &'a mut HeapProd<Vec<f32>>,
}

pub fn block_fifo(
    capacity: usize,
    max_block_size: usize,
) -> Result<(BlockProducer, BlockConsumer), ScopeError> {
    if capacity == 0 {
        return Err(ScopeError::Capacity("block fifo"));
    }
    if max_block_size == 0 {
        return Err(ScopeError::BlockSize {
            block: 0,
            max: max_block_size,
        });
    }

    let (filled_prod, filled_cons) = HeapRb::<Vec<f32>>::new(capacity).split();
    let (mut free_prod, free_cons) = HeapRb::<Vec<f32>>::new(capacity).split();
    for _ in 0..capacity {
        let _ = free_prod.try_push(Vec::with_capacity(max_block_size));
    }

    Ok((
        BlockProducer {
            filled: filled_prod,
            free: free_cons,
            max_block_size,
        },
        BlockConsumer {
            filled: filled_cons,
            free: free_prod,
        },
    ))
}

impl BlockProducer {
    /// Copies `samples` into the next free slot. Returns `false` and drops the
    /// block when every slot is occupied or the block does not fit a slot.
    pub fn push(&mut self, samples: &[f32]) -> bool {
        if samples.len() > self.max_block_size {
            return false;
        }
        let Some(mut slot) = self.free.try_pop() else {
            return false;
        };
        slot.clear();
        slot.extend_from_slice(samples);

        // The filled ring has room for every slot in circulation.
        let pushed = self.filled.try_push(slot).is_ok();
        debug_assert!(pushed);
        pushed
    }

    pub fn available_blocks(&self) -> usize {
        self.filled.occupied_len()
    }

    pub fn capacity(&self) -> usize {
        self.filled.capacity().get()
    }

    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }
}

impl BlockConsumer {
    pub fn pop(&mut self) -> Option<BlockGuard<'_>> {
        let block = self.filled.try_pop()?;
        Some(BlockGuard {
            block: Some(block),
            free: &mut self.free,
        })
    }

    pub fn available_blocks(&self) -> usize {
        self.filled.occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.filled.is_empty()
    }
}

impl Deref for BlockGuard<'_> {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        self.block.as_deref().unwrap_or(&[])
    }
}

impl Drop for BlockGuard<'_> {
    fn drop(&mut self) {
        if let Some(block) = self.block.take() {
            let _ = self.free.try_push(block);
        }
    }
}
