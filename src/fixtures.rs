//! Filesystem fixtures for path scenarios.
//!
//! Each scenario's precondition is realized under a per-run scratch root and
//! dismantled again regardless of test outcome. Establishing a fixture first
//! clears any residue of a previous attempt, so both setup and teardown are
//! idempotent and the suite can be re-run without manual cleanup.

use crate::cases::FixtureKind;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Depth of the nested-directory scenario.
const DEEP_TREE_LEVELS: usize = 10;

/// Owns the scratch root all fixtures live under.
///
/// The root is a fresh temp directory per run; dropping the manager removes
/// it wholesale after individual fixtures have restored their permission
/// bits.
pub struct FixtureManager {
    root: TempDir,
}

impl FixtureManager {
    pub fn new() -> Result<Self> {
        let root = TempDir::with_prefix("vanity-conformance-")?;
        Ok(Self { root })
    }

    /// Scratch directory fixtures (and prefix-case artifacts) live under.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Establish the precondition for `kind`, returning a guard that
    /// dismantles it on drop.
    ///
    /// An error here means the filesystem cannot represent the requested
    /// condition (unsupported platform, exotic mount); callers skip the
    /// scenario rather than failing it.
    pub fn establish(&self, kind: FixtureKind) -> Result<Fixture> {
        undo(kind, self.root());
        let target = apply(kind, self.root())
            .map_err(|err| Error::fixture(format!("{kind:?}"), err.to_string()))?;
        Ok(Fixture {
            kind,
            root: self.root().to_path_buf(),
            target,
            dismantled: false,
        })
    }
}

/// An established fixture: the target output path plus guaranteed teardown.
pub struct Fixture {
    kind: FixtureKind,
    root: PathBuf,
    target: PathBuf,
    dismantled: bool,
}

impl Fixture {
    /// The output path implementations are pointed at.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Tear the fixture down now. Best-effort: failures are logged, never
    /// raised, so they cannot mask the primary test result.
    pub fn dismantle(&mut self) {
        if self.dismantled {
            return;
        }
        self.dismantled = true;
        undo(self.kind, &self.root);
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        self.dismantle();
    }
}

// ── Per-kind setup/teardown ─────────────────────────────────────────

fn apply(kind: FixtureKind, root: &Path) -> std::io::Result<PathBuf> {
    match kind {
        FixtureKind::PlainDir => Ok(root.join("normal.json")),
        FixtureKind::SpacedDir => {
            let dir = root.join("path with spaces");
            fs::create_dir_all(&dir)?;
            Ok(dir.join("key file.json"))
        }
        FixtureKind::PunctuatedDir => {
            let dir = root.join("special-chars_123");
            fs::create_dir_all(&dir)?;
            Ok(dir.join("key-file_v2.json"))
        }
        FixtureKind::DeepTree => {
            let mut dir = root.to_path_buf();
            for level in 0..DEEP_TREE_LEVELS {
                dir.push(format!("level{level}"));
            }
            fs::create_dir_all(&dir)?;
            Ok(dir.join("deep.json"))
        }
        FixtureKind::ReadOnlyDir => {
            let dir = root.join("readonly");
            fs::create_dir_all(&dir)?;
            set_mode(&dir, 0o500)?;
            Ok(dir.join("key.json"))
        }
        FixtureKind::ExistingFile => {
            let target = root.join("existing.json");
            fs::write(&target, "[]")?;
            Ok(target)
        }
        FixtureKind::SymlinkedDir => {
            let link_target = root.join("symlink_target");
            fs::create_dir_all(&link_target)?;
            let link = root.join("symlink");
            make_symlink(&link_target, &link)?;
            Ok(link.join("key.json"))
        }
        FixtureKind::OverlongName => Ok(root.join(format!("{}.json", "a".repeat(200)))),
        FixtureKind::UnicodeDir => {
            let dir = root.join("üñíçödé");
            fs::create_dir_all(&dir)?;
            Ok(dir.join("key.json"))
        }
        FixtureKind::DeviceNull => {
            let null = null_device();
            if fs::symlink_metadata(&null).is_err() {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "null device not present",
                ));
            }
            Ok(null)
        }
    }
}

fn undo(kind: FixtureKind, root: &Path) {
    match kind {
        FixtureKind::PlainDir => remove_file_quietly(&root.join("normal.json")),
        FixtureKind::SpacedDir => remove_tree_quietly(&root.join("path with spaces")),
        FixtureKind::PunctuatedDir => remove_tree_quietly(&root.join("special-chars_123")),
        FixtureKind::DeepTree => remove_tree_quietly(&root.join("level0")),
        FixtureKind::ReadOnlyDir => {
            let dir = root.join("readonly");
            if dir.exists() {
                // A 0o500 dir cannot have its contents unlinked; restore
                // write permission before removal.
                if let Err(err) = set_mode(&dir, 0o700) {
                    tracing::warn!(path = %dir.display(), %err, "failed to restore permissions");
                }
                remove_tree_quietly(&dir);
            }
        }
        FixtureKind::ExistingFile => remove_file_quietly(&root.join("existing.json")),
        FixtureKind::SymlinkedDir => {
            let link = root.join("symlink");
            if fs::symlink_metadata(&link).is_ok() {
                remove_file_quietly(&link);
            }
            remove_tree_quietly(&root.join("symlink_target"));
        }
        FixtureKind::OverlongName => {
            remove_file_quietly(&root.join(format!("{}.json", "a".repeat(200))));
        }
        FixtureKind::UnicodeDir => remove_tree_quietly(&root.join("üñíçödé")),
        FixtureKind::DeviceNull => {}
    }
}

fn remove_file_quietly(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        if err.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), %err, "fixture cleanup failed");
        }
    }
}

fn remove_tree_quietly(path: &Path) {
    if let Err(err) = fs::remove_dir_all(path) {
        if err.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), %err, "fixture cleanup failed");
        }
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "permission toggling not supported on this platform",
    ))
}

#[cfg(unix)]
fn make_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn make_symlink(_target: &Path, _link: &Path) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "symlinks not supported on this platform",
    ))
}

#[cfg(unix)]
fn null_device() -> PathBuf {
    PathBuf::from("/dev/null")
}

#[cfg(not(unix))]
fn null_device() -> PathBuf {
    PathBuf::from("NUL")
}
