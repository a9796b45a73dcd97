//! Identifier generation and validation.
//!
//! Format: `<tag><suffix>`, both URL-safe base64 without padding.
//!
//! - `tag` is 3 characters encoding 2 random bytes, drawn once per generator. The
//!   process-wide generator behind [`generate`] draws it once per process.
//! - `suffix` encodes `length` fresh random bytes per call.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::entropy::{EntropySource, OsEntropy};
use crate::length::{Length, encoded_len};

/// Random bytes behind the instance tag.
const INSTANCE_TAG_BYTES: usize = 2;

/// Characters in an encoded instance tag.
pub const INSTANCE_TAG_LEN: usize = encoded_len(INSTANCE_TAG_BYTES);

/// Shortest string [`validate`] accepts.
pub const MIN_ID_LEN: usize = 8;

/// URL-safe alphabet, no padding on encode, tolerant of non-zero trailing bits
/// on decode.
const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("identifier pattern is valid"));

static PROCESS_IDS: IdGen = IdGen::new();

/// Errors that can occur during identifier operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("random source failed: {0}")]
    RandomSource(String),
    #[error("invalid length: must be > 0")]
    InvalidLength,
    #[error("identifier too short: {len} characters, need at least {min}", min = MIN_ID_LEN)]
    TooShort { len: usize },
    #[error("identifier contains characters outside [A-Za-z0-9_-]")]
    InvalidCharacter,
    #[error("identifier is not valid unpadded base64: {0}")]
    InvalidEncoding(String),
}

/// Parsed identifier components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedId {
    pub raw: String,
    pub instance_tag: String,
    pub suffix: String,
    /// The whole identifier, decoded.
    pub bytes: Vec<u8>,
}

impl ParsedId {
    /// Whether both identifiers carry the same instance tag.
    ///
    /// Equal tags are expected for identifiers from one process, but 2 bytes of
    /// tag collide across processes often enough that this is not proof.
    pub fn shares_instance(&self, other: &ParsedId) -> bool {
        self.instance_tag == other.instance_tag
    }
}

/// Parse a string into its instance tag and suffix.
///
/// This checks shape only: length, alphabet, and that the whole string decodes
/// as unpadded base64. It cannot tell a generated identifier from any other
/// string of the same shape.
///
/// A string of `4k + 1` characters never decodes. Generated identifiers hit
/// that when the suffix length is `1 (mod 3)` bytes, [`Length::MEDIUM`]
/// included, so those fail here even though [`generate_with_length`] made them.
pub fn parse(candidate: &str) -> Result<ParsedId, IdError> {
    if candidate.len() < MIN_ID_LEN {
        return Err(IdError::TooShort {
            len: candidate.len(),
        });
    }
    if !ID_PATTERN.is_match(candidate) {
        return Err(IdError::InvalidCharacter);
    }

    let bytes = ENGINE
        .decode(candidate)
        .map_err(|err| IdError::InvalidEncoding(err.to_string()))?;

    // ASCII from here on, so the split lands on a char boundary.
    let (tag, suffix) = candidate.split_at(INSTANCE_TAG_LEN);

    Ok(ParsedId {
        raw: candidate.to_string(),
        instance_tag: tag.to_string(),
        suffix: suffix.to_string(),
        bytes,
    })
}

/// Check whether a string has the shape of an identifier.
pub fn validate(candidate: &str) -> bool {
    parse(candidate).is_ok()
}

/// The process-wide instance tag, drawn on first use.
pub fn instance_tag() -> Result<&'static str, IdError> {
    PROCESS_IDS.instance_tag()
}

/// Generate an identifier with a [`Length::SHORT`] suffix.
///
/// This is the short length (5 bytes), not [`Length::DEFAULT`] (21 bytes).
pub fn generate() -> Result<String, IdError> {
    PROCESS_IDS.generate()
}

/// Generate an identifier with a suffix of `length` random bytes.
pub fn generate_with_length(length: Length) -> Result<String, IdError> {
    PROCESS_IDS.generate_with_length(length)
}

/// Like [`generate`], but panics if the random source fails.
///
/// For callers that treat an unavailable OS random source as fatal.
pub fn generate_or_panic() -> String {
    PROCESS_IDS.generate_or_panic()
}

/// Generate `n` identifiers, stopping at the first failure.
pub fn generate_n(length: Length, n: usize) -> Result<Vec<String>, IdError> {
    PROCESS_IDS.generate_n(length, n)
}

/// Identifier generator with its own entropy source and instance tag.
///
/// The free functions in this crate share one process-wide `IdGen<OsEntropy>`.
/// A separate `IdGen` draws its own tag, so its identifiers do not share the
/// process prefix.
#[derive(Debug)]
pub struct IdGen<S = OsEntropy> {
    source: S,
    tag: OnceCell<String>,
}

impl IdGen<OsEntropy> {
    /// Create a generator backed by the OS random source.
    pub const fn new() -> Self {
        Self::with_source(OsEntropy)
    }
}

impl Default for IdGen<OsEntropy> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> IdGen<S> {
    /// Create a generator drawing from `source`.
    pub const fn with_source(source: S) -> Self {
        Self {
            source,
            tag: OnceCell::new(),
        }
    }
}

impl<S: EntropySource> IdGen<S> {
    /// Instance tag of this generator, drawn on first use.
    ///
    /// Concurrent first calls draw it once. If the draw fails, the tag stays
    /// unset and the next call tries again.
    pub fn instance_tag(&self) -> Result<&str, IdError> {
        self.tag
            .get_or_try_init(|| {
                let mut bytes = [0u8; INSTANCE_TAG_BYTES];
                self.source.fill(&mut bytes)?;
                let tag = ENGINE.encode(bytes);
                debug!(instance_tag = %tag, "initialized instance tag");
                Ok(tag)
            })
            .map(String::as_str)
    }

    /// Generate an identifier with a [`Length::SHORT`] suffix.
    pub fn generate(&self) -> Result<String, IdError> {
        self.generate_with_length(Length::SHORT)
    }

    pub fn generate_with_length(&self, length: Length) -> Result<String, IdError> {
        let tag = self.instance_tag()?;

        let mut suffix = vec![0u8; length.get()];
        self.source.fill(&mut suffix)?;

        let mut id = String::with_capacity(tag.len() + length.encoded_len());
        id.push_str(tag);
        ENGINE.encode_string(&suffix, &mut id);
        Ok(id)
    }

    /// Like [`IdGen::generate`], but panics if the random source fails.
    pub fn generate_or_panic(&self) -> String {
        match self.generate() {
            Ok(id) => id,
            Err(err) => panic!("failed to generate identifier: {err}"),
        }
    }

    /// Generate `n` identifiers.
    pub fn generate_n(&self, length: Length, n: usize) -> Result<Vec<String>, IdError> {
        self.ids(length).take(n).collect()
    }

    /// Endless iterator of identifiers with `length`-byte suffixes.
    pub fn ids(&self, length: Length) -> Ids<'_, S> {
        Ids {
            generator: self,
            length,
        }
    }
}

/// Iterator returned by [`IdGen::ids`].
#[derive(Debug)]
pub struct Ids<'a, S> {
    generator: &'a IdGen<S>,
    length: Length,
}

impl<S: EntropySource> Iterator for Ids<'_, S> {
    type Item = Result<String, IdError>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generator.generate_with_length(self.length))
    }
}
