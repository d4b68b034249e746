//! Prefix validation oracle.
//!
//! Pure classification of candidate vanity prefixes, independent of any
//! implementation under test. The rules operate on raw bytes: inputs are not
//! assumed to be valid text, and the verdict is a total function of those
//! bytes alone.

use serde::Serialize;
use std::fmt;

/// Base58 alphabet used by the target encoding (excludes 0, O, I, l).
pub const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Maximum prefix length that can ever be satisfied: a 32-byte public key
/// encodes to at most 44 Base58 characters. Anything longer must be rejected
/// up front rather than searched for forever.
pub const MAX_PREFIX_LEN: usize = 44;

/// Substrings that are never valid prefix content. The harness itself never
/// invokes a shell, so these are not an injection vector here; the tools
/// under test must still refuse them as malformed prefixes.
const SHELL_META_TOKENS: &[&str] = &["$(", "${", "{{", "`", ";", "'", "<", ">"];

/// Accept/reject verdict produced by the oracles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Accept,
    Reject,
}

impl Verdict {
    /// Whether this verdict expects the implementation to succeed.
    #[must_use]
    pub const fn accepted(self) -> bool {
        matches!(self, Self::Accept)
    }

    /// Human label used in report lines ("success" / "failure").
    #[must_use]
    pub const fn outcome_label(self) -> &'static str {
        match self {
            Self::Accept => "success",
            Self::Reject => "failure",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accept => f.write_str("accept"),
            Self::Reject => f.write_str("reject"),
        }
    }
}

/// The first rule a rejected prefix violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixRejection {
    /// The prefix is empty.
    Empty,
    /// The prefix is longer than any encodable public identifier.
    TooLong { len: usize },
    /// NUL, ESC, DEL, or another control byte.
    ControlByte { byte: u8, index: usize },
    /// Space, tab, newline, or carriage return.
    Whitespace { byte: u8, index: usize },
    /// A byte outside the ASCII range (multi-byte Unicode lands here).
    NonAscii { byte: u8, index: usize },
    /// Shell-metacharacter or template-delimiter content.
    ShellMeta { token: &'static str, index: usize },
    /// An ASCII byte outside the Base58 alphabet (0, O, I, l, punctuation).
    InvalidBase58 { byte: u8, index: usize },
}

impl fmt::Display for PrefixRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("prefix is empty"),
            Self::TooLong { len } => {
                write!(f, "prefix length {len} exceeds maximum of {MAX_PREFIX_LEN}")
            }
            Self::ControlByte { byte, index } => {
                write!(f, "control byte 0x{byte:02x} at index {index}")
            }
            Self::Whitespace { byte, index } => {
                write!(f, "whitespace byte 0x{byte:02x} at index {index}")
            }
            Self::NonAscii { byte, index } => {
                write!(f, "non-ASCII byte 0x{byte:02x} at index {index}")
            }
            Self::ShellMeta { token, index } => {
                write!(f, "forbidden sequence {token:?} at index {index}")
            }
            Self::InvalidBase58 { byte, index } => {
                write!(
                    f,
                    "invalid Base58 character {:?} at index {index}; valid characters: {BASE58_ALPHABET}",
                    char::from(*byte)
                )
            }
        }
    }
}

/// Vet a candidate prefix, naming the first rule it violates.
///
/// Rules are checked in a fixed order (emptiness, length, per-byte class,
/// forbidden substrings, alphabet membership) so diagnostics are stable; the
/// accept/reject verdict itself does not depend on the ordering.
pub fn vet(prefix: &[u8]) -> Result<(), PrefixRejection> {
    if prefix.is_empty() {
        return Err(PrefixRejection::Empty);
    }
    if prefix.len() > MAX_PREFIX_LEN {
        return Err(PrefixRejection::TooLong { len: prefix.len() });
    }

    for (index, &byte) in prefix.iter().enumerate() {
        match byte {
            b' ' | b'\t' | b'\n' | b'\r' => {
                return Err(PrefixRejection::Whitespace { byte, index });
            }
            0x00 | 0x1b | 0x7f => {
                return Err(PrefixRejection::ControlByte { byte, index });
            }
            _ if byte.is_ascii_control() => {
                return Err(PrefixRejection::ControlByte { byte, index });
            }
            _ if !byte.is_ascii() => {
                return Err(PrefixRejection::NonAscii { byte, index });
            }
            _ => {}
        }
    }

    for token in SHELL_META_TOKENS {
        if let Some(index) = find_subslice(prefix, token.as_bytes()) {
            return Err(PrefixRejection::ShellMeta { token, index });
        }
    }

    for (index, &byte) in prefix.iter().enumerate() {
        if !BASE58_ALPHABET.as_bytes().contains(&byte) {
            return Err(PrefixRejection::InvalidBase58 { byte, index });
        }
    }

    Ok(())
}

/// Classify a candidate prefix.
#[must_use]
pub fn classify(prefix: &[u8]) -> Verdict {
    match vet(prefix) {
        Ok(()) => Verdict::Accept,
        Err(_) => Verdict::Reject,
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
