//! End-to-end flow: inject the version, then archive through the post-action hook

use crate::fixtures::{context_with_version, create_build_layout, file_names, write_artifact};
use fwstamp::services::archive::{
    ARCHIVE_DIR_NAME, ARTIFACT_PATTERN, EXPORT_DIR_OPTION, register_archiver,
};
use fwstamp::{
    ArchiveOptions, ArchiveReport, ArchiveStatus, DEFAULT_VERSION_SYMBOL, PostActionRegistry,
    VersionResolver, inject_version_flag,
};
use std::path::PathBuf;
use tempfile::TempDir;

fn fire_archiver(ctx: &fwstamp::BuildContext) -> Vec<ArchiveReport> {
    let mut registry = PostActionRegistry::new();
    register_archiver(&mut registry, ArchiveOptions::default());
    let produced = PathBuf::from(ctx.subst(ARTIFACT_PATTERN));
    registry.fire(ctx, &produced)
}

#[test]
fn test_version_2_0_0_without_export_dir() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = context_with_version(temp_dir.path(), "2.0.0").unwrap();
    let artifact = write_artifact(&ctx).unwrap();

    let reports = fire_archiver(&ctx);

    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert_eq!(report.status, ArchiveStatus::Completed);

    let name = report.file_name.clone().unwrap();
    assert!(name.starts_with("firmware_2.0.0_"));
    assert!(name.ends_with(".bin"));
    // firmware_2.0.0_YYYYMMDD_HHMM.bin
    let stamp = &name["firmware_2.0.0_".len()..name.len() - ".bin".len()];
    assert_eq!(stamp.len(), 13);
    assert_eq!(stamp.as_bytes()[8], b'_');

    assert_eq!(file_names(&ctx.build_dir), vec![name.clone()]);
    assert_eq!(
        file_names(&ctx.project_dir.join(ARCHIVE_DIR_NAME)),
        vec![name]
    );
    assert!(report.copies.iter().all(|c| c.path.is_file()));
    assert!(!artifact.exists());
}

#[test]
fn test_version_2_0_0_with_new_export_dir() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = context_with_version(temp_dir.path(), "2.0.0").unwrap();
    let export_dir = temp_dir.path().join("exports/not/yet/there");
    ctx.set_option(EXPORT_DIR_OPTION, export_dir.to_string_lossy());
    write_artifact(&ctx).unwrap();

    let reports = fire_archiver(&ctx);

    assert_eq!(reports[0].status, ArchiveStatus::Completed);
    let names = file_names(&export_dir);
    assert_eq!(names.len(), 1);
    assert!(names[0].starts_with("firmware_2.0.0_"));
}

#[test]
fn test_injected_fallback_version_flows_into_archive_name() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = create_build_layout(temp_dir.path()).unwrap();
    let resolver = VersionResolver::new().with_program("fwstamp-definitely-not-a-vcs-xyz123");

    let resolved = inject_version_flag(&mut ctx, &resolver, DEFAULT_VERSION_SYMBOL);
    assert!(resolved.is_fallback());
    write_artifact(&ctx).unwrap();

    let reports = fire_archiver(&ctx);

    assert_eq!(reports[0].version.as_deref(), Some("dev"));
    assert!(
        reports[0]
            .file_name
            .as_deref()
            .is_some_and(|n| n.starts_with("firmware_dev_"))
    );
}

#[test]
fn test_other_targets_do_not_trigger_archiver() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = context_with_version(temp_dir.path(), "2.0.0").unwrap();
    write_artifact(&ctx).unwrap();

    let mut registry = PostActionRegistry::new();
    register_archiver(&mut registry, ArchiveOptions::default());
    let reports = registry.fire(&ctx, &ctx.build_dir.join("firmware.elf"));

    assert!(reports.is_empty());
    assert!(ctx.artifact_path().exists());
}
