//! Default term hasher

use quarry_core::{TermHasher, TermId};
use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Maps a token to the bits of its seeded XXH3-64 hash.
///
/// Distinct tokens may collide; the index accepts that.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Xxh3TermHasher {
    seed: u64,
}

impl Xxh3TermHasher {
    /// Create a hasher with the given seed
    pub fn new(seed: u64) -> Self {
        Xxh3TermHasher { seed }
    }

    /// Seed in use
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl TermHasher for Xxh3TermHasher {
    fn hash_term(&self, token: &str) -> TermId {
        xxh3_64_with_seed(token.as_bytes(), self.seed) as TermId
    }
}
