//! Linear (bump) allocation over a fixed arena.

use crate::arena::MemoryArena;
use crate::{align_up, check_alignment, AllocError, Allocator, BlockRange};

/// A bump allocator over a [`MemoryArena`].
///
/// Allocation moves a cursor forward; individual deallocation is a no-op.
/// Temporary buffers are recovered with [`mark`](LinearAllocator::mark) /
/// [`reset_to`](LinearAllocator::reset_to), or everything at once with
/// [`reset`](LinearAllocator::reset). Reallocation is supported only for
/// the most recently allocated block, detected by offset equality with the
/// recorded `last` position.
#[derive(Debug)]
pub struct LinearAllocator {
    arena: MemoryArena,
    free: usize,
    last: usize,
}

/// Saved allocator state for scoped temporary allocations.
#[derive(Clone, Copy, Debug)]
pub struct Marker {
    pos: usize,
    last: usize,
}

impl LinearAllocator {
    pub fn new(arena: MemoryArena) -> Self {
        Self {
            arena,
            free: 0,
            last: 0,
        }
    }

    /// Convenience constructor: a fresh arena of `size` bytes.
    pub fn with_capacity(size: usize) -> Self {
        Self::new(MemoryArena::new(size))
    }

    /// Total arena capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.arena.len()
    }

    /// Bytes handed out so far (including alignment padding).
    #[inline]
    pub fn used(&self) -> usize {
        self.free
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.arena.len() - self.free
    }

    /// Capture the current state.
    pub fn mark(&self) -> Marker {
        Marker {
            pos: self.free,
            last: self.last,
        }
    }

    /// Roll back to a previously captured state, recovering everything
    /// allocated since. Ranges handed out after the marker become stale;
    /// callers are expected not to use them again.
    pub fn reset_to(&mut self, marker: Marker) {
        self.free = marker.pos;
        self.last = marker.last;
    }

    /// Recover the whole arena.
    pub fn reset(&mut self) {
        self.free = 0;
        self.last = 0;
    }
}

impl Allocator for LinearAllocator {
    fn allocate_aligned(&mut self, size: usize, align: usize) -> Result<BlockRange, AllocError> {
        check_alignment(align)?;
        let aligned = align_up(self.free, align);
        let next_free = aligned
            .checked_add(size)
            .ok_or(AllocError::OutOfMemory {
                requested: size,
                available: self.remaining(),
            })?;
        if next_free > self.arena.len() {
            return Err(AllocError::OutOfMemory {
                requested: size,
                available: self.remaining(),
            });
        }
        self.free = next_free;
        self.last = aligned;
        Ok(aligned..next_free)
    }

    fn reallocate(&mut self, block: BlockRange, new_size: usize) -> Result<BlockRange, AllocError> {
        if block.start != self.last {
            return Err(AllocError::NotLastBlock);
        }
        let next_free = block
            .start
            .checked_add(new_size)
            .ok_or(AllocError::OutOfMemory {
                requested: new_size,
                available: self.remaining(),
            })?;
        if next_free > self.arena.len() {
            return Err(AllocError::OutOfMemory {
                requested: new_size,
                available: self.arena.len() - block.start,
            });
        }
        self.free = next_free;
        Ok(block.start..next_free)
    }

    fn deallocate(&mut self, _block: BlockRange) {
        // Recovered wholesale via mark/reset.
    }

    fn bytes(&self, block: &BlockRange) -> &[u8] {
        &self.arena.as_slice()[block.clone()]
    }

    fn bytes_mut(&mut self, block: &BlockRange) -> &mut [u8] {
        &mut self.arena.as_mut_slice()[block.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_advances() {
        let mut alloc = LinearAllocator::with_capacity(64);
        let a = alloc.allocate_aligned(8, 1).unwrap();
        let b = alloc.allocate_aligned(8, 1).unwrap();
        assert_eq!(a, 0..8);
        assert_eq!(b, 8..16);
        assert_eq!(alloc.used(), 16);
    }

    #[test]
    fn test_alignment_padding() {
        let mut alloc = LinearAllocator::with_capacity(64);
        alloc.allocate_aligned(3, 1).unwrap();
        let b = alloc.allocate_aligned(8, 8).unwrap();
        assert_eq!(b.start, 8);
    }

    #[test]
    fn test_out_of_memory() {
        let mut alloc = LinearAllocator::with_capacity(16);
        alloc.allocate_aligned(12, 1).unwrap();
        let err = alloc.allocate_aligned(8, 1).unwrap_err();
        assert!(matches!(err, AllocError::OutOfMemory { .. }));
    }

    #[test]
    fn test_exact_fit() {
        let mut alloc = LinearAllocator::with_capacity(16);
        assert!(alloc.allocate_aligned(16, 1).is_ok());
        assert_eq!(alloc.remaining(), 0);
    }

    #[test]
    fn test_mark_reset() {
        let mut alloc = LinearAllocator::with_capacity(64);
        alloc.allocate_aligned(8, 1).unwrap();
        let marker = alloc.mark();
        alloc.allocate_aligned(32, 1).unwrap();
        assert_eq!(alloc.used(), 40);

        alloc.reset_to(marker);
        assert_eq!(alloc.used(), 8);

        alloc.reset();
        assert_eq!(alloc.used(), 0);
    }

    #[test]
    fn test_reallocate_last_grows() {
        let mut alloc = LinearAllocator::with_capacity(64);
        let a = alloc.allocate_aligned(8, 1).unwrap();
        let grown = alloc.reallocate(a, 24).unwrap();
        assert_eq!(grown, 0..24);
        assert_eq!(alloc.used(), 24);
    }

    #[test]
    fn test_reallocate_not_last_fails() {
        let mut alloc = LinearAllocator::with_capacity(64);
        let a = alloc.allocate_aligned(8, 1).unwrap();
        alloc.allocate_aligned(8, 1).unwrap();
        assert_eq!(alloc.reallocate(a, 24), Err(AllocError::NotLastBlock));
    }

    #[test]
    fn test_bytes_round_trip() {
        let mut alloc = LinearAllocator::with_capacity(64);
        let a = alloc.allocate_aligned(4, 1).unwrap();
        alloc.bytes_mut(&a).copy_from_slice(b"abcd");
        assert_eq!(alloc.bytes(&a), b"abcd");
    }

    #[test]
    fn test_deallocate_is_noop() {
        let mut alloc = LinearAllocator::with_capacity(64);
        let a = alloc.allocate_aligned(8, 1).unwrap();
        alloc.deallocate(a);
        assert_eq!(alloc.used(), 8);
    }

    #[test]
    fn test_bad_alignment() {
        let mut alloc = LinearAllocator::with_capacity(64);
        assert_eq!(
            alloc.allocate_aligned(8, 3),
            Err(AllocError::BadAlignment(3))
        );
    }
}
