//! nanotag: short, URL-safe unique identifiers.
//!
//! Every identifier is a per-process instance tag followed by a per-call random
//! suffix, both encoded as URL-safe base64 without padding.
//!
//! # Format
//!
//! ```text
//! ID  ::= TAG SUFFIX
//! TAG ::= 3 * [A-Za-z0-9_-]          ; 2 random bytes, drawn once per process
//! SUFFIX ::= 1* [A-Za-z0-9_-]        ; `length` random bytes, drawn per call
//! ```
//!
//! # Example
//!
//! ```
//! use nanotag::Length;
//!
//! let id = nanotag::generate().expect("os random source available");
//! assert_eq!(id.len(), 10); // e.g. "x3Q8fK-a_Z"
//! assert!(nanotag::validate(&id));
//!
//! let long = nanotag::generate_with_length(Length::LONG).expect("os random source available");
//! assert_eq!(&long[..3], &id[..3]);
//! ```

mod entropy;
mod id;
mod length;

pub use entropy::{EntropySource, OsEntropy};
pub use id::{
    INSTANCE_TAG_LEN, IdError, IdGen, Ids, MIN_ID_LEN, ParsedId, generate, generate_n,
    generate_or_panic, generate_with_length, instance_tag, parse, validate,
};
pub use length::Length;
