use std::hash::{BuildHasher, Hasher};

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// FNV-1a 64-bit hasher: one XOR-then-multiply step per input byte.
///
/// Deterministic and unseeded, so a key always lands on the same home
/// bucket for a given capacity, and the probe sequence derived from it is
/// reproducible across runs.
pub struct Fnv1aHasher(u64);

impl Default for Fnv1aHasher {
    fn default() -> Self {
        Self(FNV_OFFSET_BASIS)
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.0 = (self.0 ^ u64::from(byte)).wrapping_mul(FNV_PRIME);
        }
    }
}

/// `BuildHasher` producing [`Fnv1aHasher`]s, the dictionary's default.
#[derive(Default, Debug, Clone, Copy)]
pub struct FnvBuildHasher;

impl BuildHasher for FnvBuildHasher {
    type Hasher = Fnv1aHasher;

    fn build_hasher(&self) -> Self::Hasher {
        Fnv1aHasher::default()
    }
}

/// Digest of a byte span, bypassing `Hash`'s length prefixing so the result
/// is FNV-1a over exactly the given bytes.
pub(crate) fn hash_bytes<S: BuildHasher>(build: &S, bytes: &[u8]) -> u64 {
    let mut hasher = build.build_hasher();
    hasher.write(bytes);
    hasher.finish()
}
