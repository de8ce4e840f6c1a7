//! Tests for post-action registration and target substitution

use fwstamp::{BuildContext, PostActionRegistry};
use std::path::{Path, PathBuf};

fn sample_context() -> BuildContext {
    let mut ctx = BuildContext::new("/work/proj", "/work/proj/.pio/build/esp32");
    ctx.prog_name = "app".to_string();
    ctx
}

#[test]
fn test_subst_expands_bare_and_braced_variables() {
    let ctx = sample_context();
    assert_eq!(
        ctx.subst("$BUILD_DIR/${PROGNAME}.bin"),
        "/work/proj/.pio/build/esp32/app.bin"
    );
    assert_eq!(
        ctx.subst("${PROJECT_DIR}/firmware_builds/$PROGNAME"),
        "/work/proj/firmware_builds/app"
    );
    assert_eq!(ctx.subst("no variables"), "no variables");
}

#[test]
fn test_artifact_path_matches_substituted_pattern() {
    let ctx = sample_context();
    assert_eq!(
        ctx.artifact_path(),
        PathBuf::from(ctx.subst("$BUILD_DIR/${PROGNAME}.bin"))
    );
}

#[test]
fn test_fire_runs_only_matching_actions() {
    let ctx = sample_context();
    let mut registry = PostActionRegistry::new();
    registry.register("$BUILD_DIR/${PROGNAME}.bin", |_: &Path, _: &BuildContext| "bin");
    registry.register("$BUILD_DIR/${PROGNAME}.elf", |_: &Path, _: &BuildContext| "elf");
    registry.register("$BUILD_DIR/${PROGNAME}.bin", |p: &Path, c: &BuildContext| {
        assert_eq!(c.prog_name, "app");
        assert!(p.ends_with("app.bin"));
        "bin-2"
    });
    assert_eq!(registry.len(), 3);

    let outputs = registry.fire(&ctx, &ctx.artifact_path());
    assert_eq!(outputs, vec!["bin", "bin-2"]);

    let elf = ctx.build_dir.join("app.elf");
    assert_eq!(registry.fire(&ctx, &elf), vec!["elf"]);

    let none = registry.fire(&ctx, Path::new("/elsewhere/app.bin"));
    assert!(none.is_empty());
}

#[test]
fn test_actions_may_fire_repeatedly_with_state() {
    let ctx = sample_context();
    let mut count = 0;
    {
        let mut registry = PostActionRegistry::new();
        registry.register("$BUILD_DIR/${PROGNAME}.bin", |_: &Path, _: &BuildContext| {
            count += 1;
        });
        registry.fire(&ctx, &ctx.artifact_path());
        registry.fire(&ctx, &ctx.artifact_path());
    }
    assert_eq!(count, 2);
}

#[test]
fn test_empty_registry() {
    let mut registry: PostActionRegistry<'_, ()> = PostActionRegistry::default();
    assert!(registry.is_empty());
    assert!(registry.fire(&BuildContext::default(), Path::new("firmware.bin")).is_empty());
}

#[test]
fn test_project_option_treats_blank_as_unset() {
    let mut ctx = BuildContext::default();
    assert_eq!(ctx.project_option("custom_firmware_export_dir"), None);
    ctx.set_option("custom_firmware_export_dir", "   ");
    assert_eq!(ctx.project_option("custom_firmware_export_dir"), None);
    ctx.set_option("custom_firmware_export_dir", " /srv/fw ");
    assert_eq!(ctx.project_option("custom_firmware_export_dir"), Some("/srv/fw"));
}
