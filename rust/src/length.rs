//! Suffix length, measured in random bytes.

use std::fmt;

use crate::id::IdError;

/// Number of random bytes drawn for an identifier suffix.
///
/// Any positive count is accepted. The named lengths cover the common cases:
///
/// | name      | bytes | encoded chars |
/// |-----------|-------|---------------|
/// | `short`   | 5     | 7             |
/// | `medium`  | 10    | 14            |
/// | `long`    | 15    | 20            |
/// | `default` | 21    | 28            |
///
/// Note that [`crate::generate`] uses [`Length::SHORT`], not [`Length::DEFAULT`].
/// Suffixes under 4 bytes produce identifiers below [`crate::MIN_ID_LEN`], which
/// [`crate::validate`] rejects. So do suffixes of `1 (mod 3)` bytes, `MEDIUM`
/// among them: the result is `1 (mod 4)` characters long and never decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Length(usize);

impl Length {
    /// 21 bytes. Despite the name, this is not what [`crate::generate`] uses.
    pub const DEFAULT: Self = Self(21);
    pub const SHORT: Self = Self(5);
    pub const MEDIUM: Self = Self(10);
    pub const LONG: Self = Self(15);

    /// Create a length of `bytes` random bytes. Zero is rejected.
    pub fn new(bytes: usize) -> Result<Self, IdError> {
        if bytes == 0 {
            return Err(IdError::InvalidLength);
        }
        Ok(Self(bytes))
    }

    /// Byte count.
    pub fn get(self) -> usize {
        self.0
    }

    /// Characters produced when this many bytes are encoded without padding.
    pub fn encoded_len(self) -> usize {
        encoded_len(self.0)
    }

    /// Name of a well-known length, if this is one.
    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::SHORT => Some("short"),
            Self::MEDIUM => Some("medium"),
            Self::LONG => Some("long"),
            Self::DEFAULT => Some("default"),
            _ => None,
        }
    }

    /// Parse a length name (`short`, `medium`, `long`, `default`) or a positive
    /// byte count.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "short" => Some(Self::SHORT),
            "medium" => Some(Self::MEDIUM),
            "long" => Some(Self::LONG),
            "default" => Some(Self::DEFAULT),
            _ => s.parse::<usize>().ok().and_then(|n| Self::new(n).ok()),
        }
    }
}

impl TryFrom<usize> for Length {
    type Error = IdError;

    fn try_from(bytes: usize) -> Result<Self, Self::Error> {
        Self::new(bytes)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unpadded base64 length of `bytes` input bytes.
pub(crate) const fn encoded_len(bytes: usize) -> usize {
    let tail = match bytes % 3 {
        0 => 0,
        1 => 2,
        _ => 3,
    };
    bytes / 3 * 4 + tail
}
