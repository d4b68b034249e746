//! Static conformance case corpus.
//!
//! The prefix table and path scenarios every implementation is judged
//! against. The tables are data, not behavior: expectations live with the
//! oracles, and the driver cross-checks each scenario's stated expectation
//! against the path oracle after fixture setup.

use crate::oracle::Verdict;
use serde::Serialize;
use std::fmt;

const A44: [u8; 44] = [b'a'; 44];
const A100: [u8; 100] = [b'a'; 100];

/// A single prefix conformance case.
#[derive(Debug, Clone, Copy)]
pub struct PrefixCase {
    /// Raw candidate bytes, not assumed to be valid text.
    pub input: &'static [u8],
    /// Label used in report lines.
    pub description: &'static str,
    /// Oracle verdict the corpus asserts.
    pub expected: Verdict,
}

/// The full prefix corpus: invalid Base58, valid inputs, length bounds,
/// whitespace, Unicode, injection-style content, and control bytes.
pub const PREFIX_CASES: &[PrefixCase] = &[
    // Invalid Base58 characters
    case(b"", "Empty string", Verdict::Reject),
    case(b"0", "Invalid Base58: zero", Verdict::Reject),
    case(b"O", "Invalid Base58: capital O", Verdict::Reject),
    case(b"I", "Invalid Base58: capital I", Verdict::Reject),
    case(b"l", "Invalid Base58: lowercase L", Verdict::Reject),
    case(b"0abc", "Contains invalid '0'", Verdict::Reject),
    case(b"Oabc", "Contains invalid 'O'", Verdict::Reject),
    case(b"Iabc", "Contains invalid 'I'", Verdict::Reject),
    case(b"labc", "Contains invalid 'l'", Verdict::Reject),
    // Valid Base58
    case(b"a", "Valid single character", Verdict::Accept),
    case(b"Ab", "Valid mixed case", Verdict::Accept),
    case(b"123", "Valid numbers", Verdict::Accept),
    case(b"ABC", "Valid uppercase", Verdict::Accept),
    // Length bounds
    case(&A44, "Maximum valid length (full address)", Verdict::Accept),
    case(&A100, "Very long prefix", Verdict::Reject),
    // Whitespace
    case(b" abc", "Leading whitespace", Verdict::Reject),
    case(b"abc ", "Trailing whitespace", Verdict::Reject),
    case(b"ab c", "Space in middle", Verdict::Reject),
    case(b"\tabc", "Leading tab", Verdict::Reject),
    case(b"abc\n", "Trailing newline", Verdict::Reject),
    // Unicode and special characters
    case("🚀".as_bytes(), "Unicode emoji", Verdict::Reject),
    case("café".as_bytes(), "Unicode accented char", Verdict::Reject),
    case("日本語".as_bytes(), "Unicode CJK", Verdict::Reject),
    case("αβγ".as_bytes(), "Unicode Greek", Verdict::Reject),
    // Injection attempts
    case(b"../../../etc/passwd", "Path traversal in prefix", Verdict::Reject),
    case(b"; rm -rf /", "Shell injection attempt", Verdict::Reject),
    case(b"${HOME}", "Variable expansion", Verdict::Reject),
    case(b"$(whoami)", "Command substitution", Verdict::Reject),
    case(b"`id`", "Backtick execution", Verdict::Reject),
    case(b"'; DROP TABLE users; --", "SQL injection pattern", Verdict::Reject),
    case(b"<script>alert(1)</script>", "XSS pattern", Verdict::Reject),
    case(b"{{7*7}}", "Template injection", Verdict::Reject),
    // Null and control characters
    case(b"ab\x00c", "Null byte injection", Verdict::Reject),
    case(b"ab\x1bc", "Escape character", Verdict::Reject),
    case(b"ab\x7fc", "DEL character", Verdict::Reject),
];

const fn case(input: &'static [u8], description: &'static str, expected: Verdict) -> PrefixCase {
    PrefixCase {
        input,
        description,
        expected,
    }
}

/// Filesystem precondition a path scenario needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureKind {
    /// Target directly inside the writable scratch root.
    PlainDir,
    /// Parent directory name contains spaces.
    SpacedDir,
    /// Parent directory name contains punctuation and underscores.
    PunctuatedDir,
    /// Ten nested directories, all present.
    DeepTree,
    /// Parent directory stripped of write permission.
    ReadOnlyDir,
    /// Target file pre-created (no overwrite flag is ever passed).
    ExistingFile,
    /// Target reached through a symlink to a writable directory.
    SymlinkedDir,
    /// Filename component of ~200+ characters.
    OverlongName,
    /// Parent directory name contains non-ASCII characters.
    UnicodeDir,
    /// Target is the platform null device.
    DeviceNull,
}

/// A path conformance scenario.
#[derive(Debug, Clone, Copy)]
pub struct PathScenario {
    /// Label used in report lines.
    pub name: &'static str,
    pub fixture: FixtureKind,
    /// Policy-table expectation, cross-checked against the path oracle
    /// after setup.
    pub expected: Verdict,
}

/// The path policy table.
pub const PATH_SCENARIOS: &[PathScenario] = &[
    scenario("Normal path", FixtureKind::PlainDir, Verdict::Accept),
    scenario("Path with spaces", FixtureKind::SpacedDir, Verdict::Accept),
    scenario(
        "Path with special characters",
        FixtureKind::PunctuatedDir,
        Verdict::Accept,
    ),
    scenario("Deeply nested path", FixtureKind::DeepTree, Verdict::Accept),
    scenario(
        "Non-writable directory",
        FixtureKind::ReadOnlyDir,
        Verdict::Reject,
    ),
    scenario(
        "Existing file (no overwrite flag)",
        FixtureKind::ExistingFile,
        Verdict::Reject,
    ),
    scenario(
        "Symlink to valid directory",
        FixtureKind::SymlinkedDir,
        Verdict::Accept,
    ),
    scenario("Very long filename", FixtureKind::OverlongName, Verdict::Reject),
    scenario("Unicode path", FixtureKind::UnicodeDir, Verdict::Accept),
    scenario("Null device", FixtureKind::DeviceNull, Verdict::Reject),
];

const fn scenario(name: &'static str, fixture: FixtureKind, expected: Verdict) -> PathScenario {
    PathScenario {
        name,
        fixture,
        expected,
    }
}

/// Which suite a case belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Suite {
    Prefix,
    Path,
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prefix => f.write_str("prefix"),
            Self::Path => f.write_str("path"),
        }
    }
}
