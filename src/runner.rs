//! Implementation targets and subprocess invocation.
//!
//! Each implementation under test is a black box behind the fixed CLI
//! contract `<binary> --prefix <STRING> --output <PATH> [--quiet]`. The
//! runner locates it at its conventional build-output path, invokes it with
//! a hard timeout, observes exit code and artifact state independently, and
//! defensively removes whatever the process left behind.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Default timeout for interpreted targets and path scenarios, seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Grace window between SIGTERM and SIGKILL on timeout.
const TERMINATE_GRACE_SECS: u64 = 2;

const POLL_TICK: Duration = Duration::from_millis(10);

// ── Targets ─────────────────────────────────────────────────────────

/// How an implementation under test is launched.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Launch {
    /// Native executable invoked directly.
    Binary { path: PathBuf },
    /// Script run through an interpreter (node, python3, ...).
    Interpreted {
        interpreter: String,
        script: PathBuf,
    },
}

/// One implementation under test: a name plus locate/invoke capabilities.
#[derive(Debug, Clone)]
pub struct ImplementationTarget {
    name: String,
    launch: Launch,
    quiet_flag: bool,
    timeout_secs: u64,
}

impl ImplementationTarget {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        launch: Launch,
        quiet_flag: bool,
        timeout_secs: u64,
    ) -> Self {
        Self {
            name: name.into(),
            launch,
            quiet_flag,
            timeout_secs,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Per-target timeout ceiling for prefix probes, seconds.
    #[must_use]
    pub const fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// Resolve the launch vector, or `None` when the implementation is not
    /// built. Absence means "skip", never "fail".
    #[must_use]
    pub fn locate(&self) -> Option<(OsString, Vec<OsString>)> {
        match &self.launch {
            Launch::Binary { path } => path
                .is_file()
                .then(|| (path.clone().into_os_string(), Vec::new())),
            Launch::Interpreted {
                interpreter,
                script,
            } => script
                .is_file()
                .then(|| (OsString::from(interpreter), vec![script.clone().into_os_string()])),
        }
    }

    /// Invoke this implementation for one case.
    ///
    /// Never returns an error for subprocess misbehavior: spawn failures,
    /// timeouts, and wait errors all fold into a non-succeeded
    /// [`Invocation`] so the driver can compare them against the oracle
    /// like any other failure.
    #[must_use]
    pub fn invoke(&self, prefix: &[u8], output: &Path, timeout: Duration) -> Invocation {
        let Some((program, leading)) = self.locate() else {
            return Invocation::broken("implementation disappeared between locate and invoke");
        };

        // A pre-existing target (the "existing file" fixture) belongs to the
        // fixture, not the process; only artifacts the process itself
        // created are scrubbed afterwards.
        let preexisting = is_regular_file(output);

        let mut command = Command::new(program);
        command
            .args(leading)
            .arg("--prefix")
            .arg(os_arg(prefix))
            .arg("--output")
            .arg(output);
        if self.quiet_flag {
            command.arg("--quiet");
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let invocation = match command.spawn() {
            Ok(child) => self.supervise(child, timeout),
            Err(err) => Invocation::broken(format!("failed to spawn: {err}")),
        };

        // A process may create the artifact despite reporting failure (or
        // vice versa); check and scrub filesystem state independently of the
        // exit code so later cases start clean.
        let artifact_exists = is_regular_file(output);
        if !preexisting {
            remove_artifact(output);
        }

        invocation.finish(artifact_exists)
    }

    fn supervise(&self, mut child: std::process::Child, timeout: Duration) -> Invocation {
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let stdout_pump = stdout.map(|mut pipe| {
            thread::spawn(move || {
                let _ = std::io::copy(&mut pipe, &mut std::io::sink());
            })
        });
        let stderr_pump = stderr.map(|mut pipe| {
            thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = pipe.read_to_end(&mut buf);
                buf
            })
        });

        let mut guard = ProcessGuard::new(child, true);
        let start = Instant::now();
        let mut timed_out = false;
        let mut terminate_deadline: Option<Instant> = None;
        let mut exit_code: Option<i32> = None;
        let mut wait_error: Option<String> = None;

        loop {
            let child = guard
                .child
                .as_mut()
                .expect("guard owns the child until kill/wait");
            match child.try_wait() {
                Ok(Some(status)) => {
                    exit_code = status.code();
                    guard.disarm();
                    break;
                }
                Ok(None) => {}
                Err(err) => {
                    wait_error = Some(err.to_string());
                    let _ = guard.kill();
                    break;
                }
            }

            if let Some(deadline) = terminate_deadline {
                if Instant::now() >= deadline {
                    if let Ok(Some(status)) = guard.kill() {
                        exit_code = status.code();
                    }
                    break;
                }
            } else if start.elapsed() >= timeout {
                timed_out = true;
                let pid = guard.child.as_ref().map(std::process::Child::id);
                terminate_process_tree(pid);
                terminate_deadline = Some(Instant::now() + Duration::from_secs(TERMINATE_GRACE_SECS));
            }

            thread::sleep(POLL_TICK);
        }

        if let Some(handle) = stdout_pump {
            let _ = handle.join();
        }
        let stderr_bytes = stderr_pump
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();
        let mut stderr = String::from_utf8_lossy(&stderr_bytes).into_owned();
        if let Some(err) = wait_error {
            tracing::warn!(implementation = %self.name, %err, "wait failed");
            stderr.push_str(&err);
        }

        Invocation {
            exit_code,
            timed_out,
            stderr,
            succeeded: false,
            artifact_exists: false,
        }
    }
}

/// Externally observable result of one invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Exit code 0 AND artifact present.
    pub succeeded: bool,
    pub exit_code: Option<i32>,
    pub timed_out: bool,
    pub artifact_exists: bool,
    pub stderr: String,
}

impl Invocation {
    fn broken(message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            exit_code: None,
            timed_out: false,
            artifact_exists: false,
            stderr: message.into(),
        }
    }

    fn finish(mut self, artifact_exists: bool) -> Self {
        self.artifact_exists = artifact_exists;
        self.succeeded = self.exit_code == Some(0) && artifact_exists;
        self
    }

    /// Short label for divergence details.
    #[must_use]
    pub fn describe(&self) -> String {
        if self.timed_out {
            "timed out".to_string()
        } else {
            match self.exit_code {
                Some(code) => format!(
                    "exit code {code}, artifact {}",
                    if self.artifact_exists { "present" } else { "absent" }
                ),
                None => format!("no exit code: {}", self.stderr.trim()),
            }
        }
    }
}

// ── Conventional targets & manifest ─────────────────────────────────

/// Targets at their conventional build-output paths under the suite root.
#[must_use]
pub fn builtin_targets(root: &Path) -> Vec<ImplementationTarget> {
    vec![
        ImplementationTarget::new(
            "rust",
            Launch::Binary {
                path: root.join("rust/target/release/solana-vanity"),
            },
            true,
            5,
        ),
        ImplementationTarget::new(
            "typescript",
            Launch::Interpreted {
                interpreter: "node".to_string(),
                script: root.join("typescript/dist/index.js"),
            },
            false,
            DEFAULT_TIMEOUT_SECS,
        ),
    ]
}

/// One entry of a target manifest.
#[derive(Debug, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    #[serde(flatten)]
    pub launch: Launch,
    #[serde(default)]
    pub quiet: bool,
    #[serde(default = "default_manifest_timeout")]
    pub timeout_secs: u64,
}

const fn default_manifest_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Load additional targets from a JSON manifest.
///
/// Relative launch paths are resolved against the suite root, so a manifest
/// can live alongside the implementations it registers.
pub fn load_manifest(path: &Path, root: &Path) -> Result<Vec<ImplementationTarget>> {
    let raw = fs::read_to_string(path)
        .map_err(|err| Error::manifest(format!("{}: {err}", path.display())))?;
    let entries: Vec<ManifestEntry> = serde_json::from_str(&raw)
        .map_err(|err| Error::manifest(format!("{}: {err}", path.display())))?;

    let mut targets = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry.name.is_empty() {
            return Err(Error::manifest("target name must not be empty"));
        }
        let launch = match entry.launch {
            Launch::Binary { path } => Launch::Binary {
                path: resolve(root, path),
            },
            Launch::Interpreted {
                interpreter,
                script,
            } => Launch::Interpreted {
                interpreter,
                script: resolve(root, script),
            },
        };
        targets.push(ImplementationTarget::new(
            entry.name,
            launch,
            entry.quiet,
            entry.timeout_secs,
        ));
    }
    Ok(targets)
}

fn resolve(root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        root.join(path)
    }
}

// ── Artifact handling ───────────────────────────────────────────────

fn is_regular_file(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|metadata| metadata.is_file())
}

/// Remove a leftover artifact. Only regular files are ever unlinked; device
/// nodes and directories are left alone.
fn remove_artifact(path: &Path) {
    if !is_regular_file(path) {
        return;
    }
    if let Err(err) = fs::remove_file(path) {
        tracing::warn!(path = %path.display(), %err, "artifact cleanup failed");
    }
}

#[cfg(unix)]
fn os_arg(bytes: &[u8]) -> OsString {
    use std::os::unix::ffi::OsStrExt;
    std::ffi::OsStr::from_bytes(bytes).to_os_string()
}

#[cfg(not(unix))]
fn os_arg(bytes: &[u8]) -> OsString {
    OsString::from(String::from_utf8_lossy(bytes).into_owned())
}

// ── Process lifetime ────────────────────────────────────────────────

struct ProcessGuard {
    child: Option<std::process::Child>,
    kill_tree: bool,
}

impl ProcessGuard {
    const fn new(child: std::process::Child, kill_tree: bool) -> Self {
        Self {
            child: Some(child),
            kill_tree,
        }
    }

    fn kill(&mut self) -> std::io::Result<Option<std::process::ExitStatus>> {
        if let Some(mut child) = self.child.take() {
            if self.kill_tree {
                kill_process_tree(Some(child.id()));
            }
            let _ = child.kill();
            let status = child.wait()?;
            return Ok(Some(status));
        }
        Ok(None)
    }

    fn disarm(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.wait();
        }
    }
}

impl Drop for ProcessGuard {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            match child.try_wait() {
                Ok(None) => {}
                Ok(Some(_)) | Err(_) => return,
            }
            if self.kill_tree {
                kill_process_tree(Some(child.id()));
            }
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

fn terminate_process_tree(pid: Option<u32>) {
    kill_process_tree_with(pid, sysinfo::Signal::Term);
}

fn kill_process_tree(pid: Option<u32>) {
    kill_process_tree_with(pid, sysinfo::Signal::Kill);
}

fn kill_process_tree_with(pid: Option<u32>, signal: sysinfo::Signal) {
    let Some(pid) = pid else {
        return;
    };
    let root = sysinfo::Pid::from_u32(pid);

    let mut sys = sysinfo::System::new();
    sys.refresh_processes(sysinfo::ProcessesToUpdate::All, true);

    let mut children_map: HashMap<sysinfo::Pid, Vec<sysinfo::Pid>> = HashMap::new();
    for (p, proc_) in sys.processes() {
        if let Some(parent) = proc_.parent() {
            children_map.entry(parent).or_default().push(*p);
        }
    }

    let mut to_kill = Vec::new();
    collect_process_tree(root, &children_map, &mut to_kill);

    // Kill children first.
    for pid in to_kill.into_iter().rev() {
        if let Some(proc_) = sys.process(pid) {
            match proc_.kill_with(signal) {
                Some(true) => {}
                Some(false) | None => {
                    let _ = proc_.kill();
                }
            }
        }
    }
}

fn collect_process_tree(
    pid: sysinfo::Pid,
    children_map: &HashMap<sysinfo::Pid, Vec<sysinfo::Pid>>,
    out: &mut Vec<sysinfo::Pid>,
) {
    out.push(pid);
    if let Some(children) = children_map.get(&pid) {
        for child in children {
            collect_process_tree(*child, children_map, out);
        }
    }
}
