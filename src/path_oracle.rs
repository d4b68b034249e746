//! Output-path oracle.
//!
//! Classifies a target output path against live filesystem state: the
//! verdict an implementation under test must match when asked to write its
//! keypair artifact there. Evaluated after fixture setup, so the state it
//! observes is the state the implementations will see.

use crate::oracle::Verdict;
use std::fs::{self, OpenOptions};
use std::path::Path;

/// Longest filename component an implementation is expected to accept.
/// Deliberately tighter than NAME_MAX: a ~200-character keypair filename is
/// already past what the supported platforms guarantee portable.
pub const MAX_FILENAME_LEN: usize = 200;

/// Name of the short-lived probe file used to test directory writability.
const PROBE_FILE_NAME: &str = ".vanity-conformance-probe";

/// Classify a target output path.
///
/// Success for an implementation is defined as a real, readable artifact at
/// a regular file path, so device nodes are rejected outright; a
/// pre-existing target is rejected because no overwrite option is part of
/// the conformance contract.
#[must_use]
pub fn classify(path: &Path) -> Verdict {
    if let Ok(metadata) = fs::symlink_metadata(path) {
        if is_device_node(&metadata) {
            return Verdict::Reject;
        }
        // Anything already at the target path means the write must refuse.
        return Verdict::Reject;
    }

    if path
        .file_name()
        .is_some_and(|name| name.len() > MAX_FILENAME_LEN)
    {
        return Verdict::Reject;
    }

    // Implementations may create missing intermediate directories, so the
    // write succeeds exactly when the nearest existing ancestor is writable.
    match nearest_existing_ancestor(path) {
        Some(dir) if dir_is_writable(&dir) => Verdict::Accept,
        _ => Verdict::Reject,
    }
}

#[cfg(unix)]
fn is_device_node(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::FileTypeExt;

    let file_type = metadata.file_type();
    file_type.is_char_device() || file_type.is_block_device()
}

#[cfg(not(unix))]
fn is_device_node(metadata: &fs::Metadata) -> bool {
    let file_type = metadata.file_type();
    !file_type.is_file() && !file_type.is_dir() && !file_type.is_symlink()
}

fn nearest_existing_ancestor(path: &Path) -> Option<std::path::PathBuf> {
    let parent = match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
        Some(parent) => parent,
        None => return None,
    };
    parent
        .ancestors()
        .find(|candidate| candidate.exists())
        .map(Path::to_path_buf)
}

/// Probe writability by actually creating (and removing) a file, which is
/// the only check that agrees with what a subprocess will observe; mode
/// bits alone mispredict for root and for exotic mounts.
fn dir_is_writable(dir: &Path) -> bool {
    let probe = dir.join(PROBE_FILE_NAME);
    let _ = fs::remove_file(&probe);
    match OpenOptions::new().write(true).create_new(true).open(&probe) {
        Ok(file) => {
            drop(file);
            let _ = fs::remove_file(&probe);
            true
        }
        Err(_) => false,
    }
}
