//! Common test infrastructure for `vanity-conformance`.
//!
//! Shared utilities for the integration tests: a harness with a temp
//! directory and a buffered logger that dumps on failure, plus helpers for
//! writing stub implementations of the CLI contract.

pub mod harness;
pub mod logging;

#[allow(unused_imports)]
pub use harness::TestHarness;

use std::path::PathBuf;

/// Whether `python3` is available for stub implementations.
///
/// Stub-driven tests skip (with a note on stderr) rather than fail when the
/// interpreter is missing, mirroring how the harness treats absent
/// implementations.
#[allow(dead_code)]
pub fn python3_available() -> bool {
    std::process::Command::new("python3")
        .arg("--version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}

/// Write a stub implementation script into `dir` and return its path.
#[allow(dead_code)]
pub fn write_stub(dir: &std::path::Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).expect("write stub script");
    path
}

/// A stub that implements the CLI contract faithfully: validates the prefix
/// against the Base58 rules, refuses unsafe output paths, and writes a JSON
/// artifact only on acceptance.
#[allow(dead_code)]
pub const CONFORMING_STUB: &str = r#"#!/usr/bin/env python3
import json
import os
import re
import sys


def parse(argv):
    prefix = None
    output = None
    i = 0
    while i < len(argv):
        if argv[i] == "--prefix" and i + 1 < len(argv):
            prefix = argv[i + 1]
            i += 2
        elif argv[i] == "--output" and i + 1 < len(argv):
            output = argv[i + 1]
            i += 2
        elif argv[i] == "--quiet":
            i += 1
        else:
            sys.exit(2)
    return prefix, output


def main():
    prefix, output = parse(sys.argv[1:])
    if prefix is None or output is None:
        sys.exit(2)

    if not re.fullmatch(r"[1-9A-HJ-NP-Za-km-z]{1,44}", prefix):
        print("invalid prefix", file=sys.stderr)
        sys.exit(1)

    name = os.path.basename(output)
    if len(name.encode("utf-8", "surrogateescape")) > 200:
        print("filename too long", file=sys.stderr)
        sys.exit(1)

    if os.path.lexists(output):
        print("refusing to overwrite", file=sys.stderr)
        sys.exit(1)

    try:
        fd = os.open(output, os.O_WRONLY | os.O_CREAT | os.O_EXCL, 0o600)
    except OSError as err:
        print(f"cannot open output: {err}", file=sys.stderr)
        sys.exit(1)

    os.write(fd, json.dumps(list(range(64))).encode())
    os.close(fd)
    sys.exit(0)


main()
"#;

/// A stub that accepts every prefix and writes wherever the OS lets it:
/// the shape of a broken implementation the harness must flag.
#[allow(dead_code)]
pub const PERMISSIVE_STUB: &str = r#"#!/usr/bin/env python3
import sys


def main():
    output = None
    argv = sys.argv[1:]
    for i, arg in enumerate(argv):
        if arg == "--output" and i + 1 < len(argv):
            output = argv[i + 1]
    if output is None:
        sys.exit(2)
    try:
        with open(output, "w") as handle:
            handle.write("[]")
    except OSError:
        sys.exit(1)
    sys.exit(0)


main()
"#;
