//! Version resolution from git metadata

use crate::models::{ResolvedVersion, VersionOrigin};
use log::debug;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Version reported when git cannot describe the checkout.
pub const FALLBACK_VERSION: &str = "dev";

/// Arguments passed to the revision-control tool: exact tag, else
/// tag-plus-distance, else abbreviated commit hash.
pub const DESCRIBE_ARGS: [&str; 3] = ["describe", "--tags", "--always"];

/// Runs `git describe` against a checkout and normalizes the result.
#[derive(Debug, Clone)]
pub struct VersionResolver {
    program: OsString,
    repo_dir: Option<PathBuf>,
}

impl Default for VersionResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionResolver {
    /// Resolver using `git` from `PATH` in the current directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: OsString::from("git"),
            repo_dir: None,
        }
    }

    /// Use a different revision-control executable.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    /// Describe the checkout rooted at `dir` instead of the current directory.
    #[must_use]
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.repo_dir = Some(dir.into());
        self
    }

    /// Resolve the version. Never fails: any problem yields [`FALLBACK_VERSION`].
    #[must_use]
    pub fn resolve(&self) -> ResolvedVersion {
        match self.describe() {
            Ok(value) => ResolvedVersion {
                value,
                origin: VersionOrigin::Git,
            },
            Err(reason) => {
                debug!("git describe unavailable ({reason}), using '{FALLBACK_VERSION}'");
                ResolvedVersion {
                    value: FALLBACK_VERSION.to_string(),
                    origin: VersionOrigin::Fallback { reason },
                }
            }
        }
    }

    fn describe(&self) -> Result<String, String> {
        let mut command = Command::new(&self.program);
        command
            .args(DESCRIBE_ARGS)
            .stdin(Stdio::null())
            .stderr(Stdio::null());
        if let Some(dir) = &self.repo_dir {
            command.current_dir(dir);
        }

        let output = command
            .output()
            .map_err(|e| format!("failed to run {}: {e}", self.program.to_string_lossy()))?;

        if !output.status.success() {
            return Err(format!("describe exited with {}", output.status));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|_| "describe output is not valid UTF-8".to_string())?;

        normalize_version(&stdout).ok_or_else(|| "describe output is empty".to_string())
    }
}

/// Trim describe output and strip a single leading `v` (`v1.4.3` -> `1.4.3`).
///
/// Returns `None` when nothing is left.
#[must_use]
pub fn normalize_version(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let stripped = trimmed.strip_prefix('v').unwrap_or(trimmed);
    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_string())
    }
}
