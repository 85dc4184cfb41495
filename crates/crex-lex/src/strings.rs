//! String interning.
//!
//! A [`StringSet`] is an append-only set of byte strings with stable
//! 16-bit handles. Lookup is a linear scan over a parallel array of
//! precomputed hashes; only a hash match pays for the byte comparison.
//! That is plenty for the bounded table sizes this front-end works with,
//! and it keeps insertion order equal to handle order, which the macro
//! table and the parameter-ordinal assignment both rely on.
//!
//! Storage is a bump allocation per string (plus a trailing NUL) carved
//! from a [`LinearAllocator`] over a fixed arena, so interned bytes never
//! move and both bounds (buffer bytes, entry count) are hard limits.
//!
//! Two hash functions coexist: FNV-1a for interning and DJB2 for the
//! keyword table (whose hash constants are computed at compile time).

use crex_mem::{Allocator, LinearAllocator};
use thiserror::Error;

/// Stable handle to an interned string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StrId(pub u16);

/// 32-bit FNV-1a.
pub const fn fnv1a(bytes: &[u8]) -> u32 {
    let mut hash: u32 = 2166136261;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u32;
        hash = hash.wrapping_mul(16777619);
        i += 1;
    }
    hash
}

/// 32-bit DJB2 (xor variant).
pub const fn djb2(bytes: &[u8]) -> u32 {
    let mut hash: u32 = 5381;
    let mut i = 0;
    while i < bytes.len() {
        hash = (hash << 5).wrapping_add(hash) ^ (bytes[i] as u32);
        i += 1;
    }
    hash
}

/// Why an intern attempt failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StringSetError {
    #[error("string buffer full")]
    BufferFull,
    #[error("string table full")]
    TableFull,
}

#[derive(Clone, Copy, Debug)]
struct StrEntry {
    offset: u32,
    length: u32,
}

/// Occupancy numbers for a string set.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringSetStats {
    pub count: usize,
    pub max_count: usize,
    pub bytes_used: usize,
    pub bytes_capacity: usize,
}

/// An append-only interned string set.
#[derive(Debug)]
pub struct StringSet {
    storage: LinearAllocator,
    entries: Vec<StrEntry>,
    hashes: Vec<u32>,
    max_strings: usize,
}

impl StringSet {
    /// A set bounded by `buffer_size` content bytes and `max_strings`
    /// entries.
    pub fn with_capacity(buffer_size: usize, max_strings: usize) -> Self {
        Self {
            storage: LinearAllocator::with_capacity(buffer_size),
            entries: Vec::new(),
            hashes: Vec::new(),
            max_strings,
        }
    }

    /// Intern `bytes`, hashing with FNV-1a.
    pub fn add(&mut self, bytes: &[u8]) -> Result<(StrId, bool), StringSetError> {
        self.add_hashed(bytes, fnv1a(bytes))
    }

    /// Intern `bytes` under a caller-computed hash. Returns the handle
    /// and whether the content was already present.
    pub fn add_hashed(&mut self, bytes: &[u8], hash: u32) -> Result<(StrId, bool), StringSetError> {
        if let Some(id) = self.find_hashed(bytes, hash) {
            return Ok((id, true));
        }
        if self.entries.len() >= self.max_strings {
            return Err(StringSetError::TableFull);
        }
        // One extra byte for the terminating NUL.
        let block = self
            .storage
            .allocate_aligned(bytes.len() + 1, 1)
            .map_err(|_| StringSetError::BufferFull)?;
        let dest = self.storage.bytes_mut(&block);
        dest[..bytes.len()].copy_from_slice(bytes);
        dest[bytes.len()] = 0;

        let index = self.entries.len() as u16;
        self.entries.push(StrEntry {
            offset: block.start as u32,
            length: bytes.len() as u32,
        });
        self.hashes.push(hash);
        Ok((StrId(index), false))
    }

    /// Find existing content under a caller-computed hash.
    pub fn find_hashed(&self, bytes: &[u8], hash: u32) -> Option<StrId> {
        for (i, &h) in self.hashes.iter().enumerate() {
            if h != hash {
                continue;
            }
            if self.get_bytes(StrId(i as u16)) == bytes {
                return Some(StrId(i as u16));
            }
        }
        None
    }

    /// Find existing content, hashing with FNV-1a.
    pub fn find(&self, bytes: &[u8]) -> Option<StrId> {
        self.find_hashed(bytes, fnv1a(bytes))
    }

    /// The interned bytes (without the trailing NUL).
    pub fn get_bytes(&self, id: StrId) -> &[u8] {
        let entry = self.entries[id.0 as usize];
        let range = entry.offset as usize..(entry.offset + entry.length) as usize;
        self.storage.bytes(&range)
    }

    /// The interned bytes as UTF-8, replacing invalid sequences.
    pub fn get_lossy(&self, id: StrId) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(self.get_bytes(id))
    }

    pub fn hash_at(&self, id: StrId) -> u32 {
        self.hashes[id.0 as usize]
    }

    pub fn len_at(&self, id: StrId) -> usize {
        self.entries[id.0 as usize].length as usize
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry and recover the whole buffer. Outstanding
    /// handles become stale.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hashes.clear();
        self.storage.reset();
    }

    pub fn stats(&self) -> StringSetStats {
        StringSetStats {
            count: self.entries.len(),
            max_count: self.max_strings,
            bytes_used: self.storage.used(),
            bytes_capacity: self.storage.capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let mut set = StringSet::with_capacity(256, 16);
        let (a, existed_a) = set.add(b"alpha").unwrap();
        let (b, existed_b) = set.add(b"beta").unwrap();
        let (a2, existed_a2) = set.add(b"alpha").unwrap();

        assert!(!existed_a);
        assert!(!existed_b);
        assert!(existed_a2);
        assert_eq!(a, a2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_get_bytes() {
        let mut set = StringSet::with_capacity(256, 16);
        let (id, _) = set.add(b"hello").unwrap();
        assert_eq!(set.get_bytes(id), b"hello");
        assert_eq!(set.len_at(id), 5);
        assert_eq!(set.get_lossy(id), "hello");
    }

    #[test]
    fn test_nul_terminated_storage() {
        let mut set = StringSet::with_capacity(256, 16);
        let (a, _) = set.add(b"ab").unwrap();
        let (b, _) = set.add(b"cd").unwrap();
        // Entries are laid out back to back, each with a trailing NUL.
        assert_eq!(set.get_bytes(a), b"ab");
        assert_eq!(set.get_bytes(b), b"cd");
        assert_eq!(set.stats().bytes_used, 6);
    }

    #[test]
    fn test_handle_order_is_insertion_order() {
        let mut set = StringSet::with_capacity(256, 16);
        let (a, _) = set.add(b"x").unwrap();
        let (b, _) = set.add(b"y").unwrap();
        let (c, _) = set.add(b"z").unwrap();
        assert_eq!((a.0, b.0, c.0), (0, 1, 2));
    }

    #[test]
    fn test_table_full() {
        let mut set = StringSet::with_capacity(256, 2);
        set.add(b"a").unwrap();
        set.add(b"b").unwrap();
        assert_eq!(set.add(b"c"), Err(StringSetError::TableFull));
        // Re-adding existing content still succeeds.
        assert!(set.add(b"a").unwrap().1);
    }

    #[test]
    fn test_buffer_full() {
        let mut set = StringSet::with_capacity(8, 16);
        set.add(b"abc").unwrap(); // 4 bytes with NUL
        assert_eq!(set.add(b"defgh"), Err(StringSetError::BufferFull));
    }

    #[test]
    fn test_clear() {
        let mut set = StringSet::with_capacity(64, 4);
        set.add(b"one").unwrap();
        set.add(b"two").unwrap();
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.stats().bytes_used, 0);
        let (id, existed) = set.add(b"one").unwrap();
        assert!(!existed);
        assert_eq!(id.0, 0);
    }

    #[test]
    fn test_find() {
        let mut set = StringSet::with_capacity(64, 4);
        let (id, _) = set.add(b"needle").unwrap();
        assert_eq!(set.find(b"needle"), Some(id));
        assert_eq!(set.find(b"missing"), None);
    }

    #[test]
    fn test_empty_string() {
        let mut set = StringSet::with_capacity(64, 4);
        let (id, _) = set.add(b"").unwrap();
        assert_eq!(set.get_bytes(id), b"");
        assert!(set.add(b"").unwrap().1);
    }

    #[test]
    fn test_hashes_differ() {
        // Not a guarantee, just a sanity check on the two functions.
        assert_ne!(fnv1a(b"while"), fnv1a(b"whild"));
        assert_ne!(djb2(b"while"), djb2(b"whild"));
    }
}
