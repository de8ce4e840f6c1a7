//! Data models for the build context, resolved versions, and archive reports

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_PROG_NAME: &str = "firmware";

/// Build environment shared by the injector and the archiver.
///
/// Stands in for the orchestrator's environment object: the injector appends
/// to `build_flags`, the archiver reads them back along with the directories
/// and project options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildContext {
    pub project_dir: PathBuf,
    pub build_dir: PathBuf,
    #[serde(default = "default_prog_name")]
    pub prog_name: String,
    #[serde(default)]
    pub build_flags: Vec<String>,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

fn default_prog_name() -> String {
    DEFAULT_PROG_NAME.to_string()
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::new(".", ".")
    }
}

impl BuildContext {
    #[must_use]
    pub fn new(project_dir: impl Into<PathBuf>, build_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            build_dir: build_dir.into(),
            prog_name: default_prog_name(),
            build_flags: Vec::new(),
            options: BTreeMap::new(),
        }
    }

    /// Append a single compiler flag, preserving order.
    pub fn append_build_flag(&mut self, flag: impl Into<String>) {
        self.build_flags.push(flag.into());
    }

    /// Look up a project option. Blank values count as unset.
    #[must_use]
    pub fn project_option(&self, key: &str) -> Option<&str> {
        self.options
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.options.insert(key.into(), value.into());
    }

    /// Expand `$PROJECT_DIR`, `$BUILD_DIR` and `$PROGNAME` (bare or braced).
    #[must_use]
    pub fn subst(&self, template: &str) -> String {
        let project_dir = self.project_dir.to_string_lossy();
        let build_dir = self.build_dir.to_string_lossy();
        let vars: [(&str, &str); 3] = [
            ("PROJECT_DIR", &*project_dir),
            ("BUILD_DIR", &*build_dir),
            ("PROGNAME", &self.prog_name),
        ];

        let mut out = template.to_string();
        for (name, value) in vars {
            out = out.replace(&format!("${{{name}}}"), value);
            out = out.replace(&format!("${name}"), value);
        }
        out
    }

    /// Path of the primary firmware binary: `$BUILD_DIR/${PROGNAME}.bin`.
    #[must_use]
    pub fn artifact_path(&self) -> PathBuf {
        self.build_dir.join(format!("{}.bin", self.prog_name))
    }
}

/// Where a resolved version came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VersionOrigin {
    Git,
    Fallback { reason: String },
}

/// A version string together with how it was obtained
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedVersion {
    pub value: String,
    pub origin: VersionOrigin,
}

impl ResolvedVersion {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, VersionOrigin::Fallback { .. })
    }
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Destination of an archived copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationKind {
    BuildDir,
    Archive,
    Export,
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DestinationKind::BuildDir => "build",
            DestinationKind::Archive => "archive",
            DestinationKind::Export => "export",
        };
        f.pad(label)
    }
}

/// Result of copying the artifact to one destination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyOutcome {
    pub destination: DestinationKind,
    pub path: PathBuf,
    /// A file of the same name was already there and got overwritten.
    #[serde(default)]
    pub replaced: bool,
    pub error: Option<String>,
}

impl CopyOutcome {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// What happened to the original, unversioned artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CleanupOutcome {
    Deleted,
    Kept,
    Failed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveStatus {
    Completed,
    Partial,
    ArtifactMissing,
}

/// Per-stage outcome of one archive run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveReport {
    pub artifact: PathBuf,
    pub status: ArchiveStatus,
    pub version: Option<String>,
    pub file_name: Option<String>,
    pub copies: Vec<CopyOutcome>,
    pub cleanup: CleanupOutcome,
}

impl ArchiveReport {
    #[must_use]
    pub fn artifact_missing(artifact: &Path) -> Self {
        Self {
            artifact: artifact.to_path_buf(),
            status: ArchiveStatus::ArtifactMissing,
            version: None,
            file_name: None,
            copies: Vec::new(),
            cleanup: CleanupOutcome::Kept,
        }
    }

    /// Copy destined for `kind`, if one was attempted.
    #[must_use]
    pub fn copy_for(&self, kind: DestinationKind) -> Option<&CopyOutcome> {
        self.copies.iter().find(|copy| copy.destination == kind)
    }
}
