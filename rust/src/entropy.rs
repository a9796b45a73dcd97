//! Random byte sources.

use rand::TryRngCore;
use rand::rngs::OsRng;
use tracing::warn;

use crate::id::IdError;

/// Source of the random bytes behind instance tags and suffixes.
///
/// Implementations must be cryptographically secure outside of tests.
pub trait EntropySource: Send + Sync {
    /// Fill `dest` entirely with random bytes.
    fn fill(&self, dest: &mut [u8]) -> Result<(), IdError>;
}

/// The operating system's CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<(), IdError> {
        OsRng.try_fill_bytes(dest).map_err(|err| {
            warn!(error = %err, "os random source failed");
            IdError::RandomSource(err.to_string())
        })
    }
}
