//! Post-build archival of the firmware binary
//!
//! Once the build has produced `$BUILD_DIR/${PROGNAME}.bin`, the archiver waits
//! for the file to appear, names a copy after the injected version and the
//! current local time, and places that copy in the build directory, the
//! project's `firmware_builds` directory, and an optional export directory.
//! The unversioned original is removed only when every copy succeeded.
//!
//! Nothing here fails the build: every stage logs and records its outcome in
//! the returned [`ArchiveReport`].

pub mod naming;
pub mod wait;

pub use naming::{archive_file_name, extract_version};
pub use wait::{WaitPolicy, wait_for_artifact};

use crate::models::{
    ArchiveReport, ArchiveStatus, BuildContext, CleanupOutcome, CopyOutcome, DestinationKind,
};
use crate::services::hooks::PostActionRegistry;
use crate::services::inject::DEFAULT_VERSION_SYMBOL;
use chrono::{Local, NaiveDateTime};
use filetime::FileTime;
use log::{info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Archive directory name, relative to the project root.
pub const ARCHIVE_DIR_NAME: &str = "firmware_builds";

/// Project option naming the optional export directory.
pub const EXPORT_DIR_OPTION: &str = "custom_firmware_export_dir";

/// Version used in the file name when no version define is found.
pub const UNKNOWN_VERSION: &str = "vUnknown";

/// Target the archiver is registered for.
pub const ARTIFACT_PATTERN: &str = "$BUILD_DIR/${PROGNAME}.bin";

/// Options controlling an archive run
#[derive(Debug, Clone)]
pub struct ArchiveOptions {
    pub wait: WaitPolicy,
    pub symbol: String,
    /// Takes precedence over the `custom_firmware_export_dir` project option.
    pub export_dir: Option<PathBuf>,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            wait: WaitPolicy::default(),
            symbol: DEFAULT_VERSION_SYMBOL.to_string(),
            export_dir: None,
        }
    }
}

/// Register the archiver as a post-action on the primary firmware binary.
pub fn register_archiver(registry: &mut PostActionRegistry<'_, ArchiveReport>, opts: ArchiveOptions) {
    registry.register(ARTIFACT_PATTERN, move |produced: &Path, ctx: &BuildContext| {
        archive_artifact(ctx, produced, &opts)
    });
}

/// Wait for `artifact`, then archive it stamped with the current local time.
#[must_use]
pub fn archive_artifact(ctx: &BuildContext, artifact: &Path, opts: &ArchiveOptions) -> ArchiveReport {
    info!("Post-build archive triggered for {}", artifact.display());

    if !wait_for_artifact(artifact, &opts.wait) {
        warn!(
            "Firmware not found after waiting {:.1}s: {}",
            opts.wait.total().as_secs_f64(),
            artifact.display()
        );
        return ArchiveReport::artifact_missing(artifact);
    }

    archive_existing(ctx, artifact, opts, &Local::now().naive_local())
}

/// Archive an artifact that is already present, naming copies after `when`.
#[must_use]
pub fn archive_existing(
    ctx: &BuildContext,
    artifact: &Path,
    opts: &ArchiveOptions,
    when: &NaiveDateTime,
) -> ArchiveReport {
    let version = extract_version(&ctx.build_flags, &opts.symbol).unwrap_or_else(|| {
        warn!("No {} define in build flags, using '{UNKNOWN_VERSION}'", opts.symbol);
        UNKNOWN_VERSION.to_string()
    });
    let file_name = archive_file_name(&version, when);

    let mut copies = vec![
        copy_to(artifact, &ctx.build_dir, &file_name, DestinationKind::BuildDir),
        copy_to(
            artifact,
            &ctx.project_dir.join(ARCHIVE_DIR_NAME),
            &file_name,
            DestinationKind::Archive,
        ),
    ];

    match export_dir(ctx, opts) {
        Some(dir) => copies.push(copy_to(artifact, &dir, &file_name, DestinationKind::Export)),
        None => info!("No external export directory defined"),
    }

    let all_copied = copies.iter().all(CopyOutcome::succeeded);
    let cleanup = if all_copied {
        remove_original(artifact)
    } else {
        warn!("Keeping original {} because a copy failed", artifact.display());
        CleanupOutcome::Kept
    };

    ArchiveReport {
        artifact: artifact.to_path_buf(),
        status: if all_copied {
            ArchiveStatus::Completed
        } else {
            ArchiveStatus::Partial
        },
        version: Some(version),
        file_name: Some(file_name),
        copies,
        cleanup,
    }
}

/// Export directory from the override or the project option. Relative
/// values from either source resolve against the project root.
fn export_dir(ctx: &BuildContext, opts: &ArchiveOptions) -> Option<PathBuf> {
    let dir = match &opts.export_dir {
        Some(dir) => dir.clone(),
        None => PathBuf::from(ctx.project_option(EXPORT_DIR_OPTION)?),
    };
    Some(ctx.project_dir.join(dir))
}

fn copy_to(source: &Path, dir: &Path, file_name: &str, destination: DestinationKind) -> CopyOutcome {
    let path = dir.join(file_name);
    let replaced = path.exists();
    if replaced {
        warn!("Replacing existing {destination} copy: {}", path.display());
    }
    let result = fs::create_dir_all(dir).and_then(|()| copy_preserving_times(source, &path));

    let error = match result {
        Ok(_) => {
            match destination {
                DestinationKind::BuildDir => info!("Copied as: {file_name}"),
                DestinationKind::Archive => info!("Archived to: {}", dir.display()),
                DestinationKind::Export => info!("Exported to: {}", dir.display()),
            }
            None
        }
        Err(e) => {
            warn!("Copy to {destination} directory {} failed: {e}", dir.display());
            Some(e.to_string())
        }
    };

    CopyOutcome {
        destination,
        path,
        replaced,
        error,
    }
}

/// Copy file contents and carry over access and modification times.
pub fn copy_preserving_times(from: &Path, to: &Path) -> io::Result<u64> {
    let bytes = fs::copy(from, to)?;
    let metadata = fs::metadata(from)?;
    filetime::set_file_times(
        to,
        FileTime::from_last_access_time(&metadata),
        FileTime::from_last_modification_time(&metadata),
    )?;
    Ok(bytes)
}

fn remove_original(artifact: &Path) -> CleanupOutcome {
    match fs::remove_file(artifact) {
        Ok(()) => {
            info!("Deleted original: {}", artifact.display());
            CleanupOutcome::Deleted
        }
        Err(e) => {
            warn!("Could not delete original {}: {e}", artifact.display());
            CleanupOutcome::Failed {
                message: e.to_string(),
            }
        }
    }
}
