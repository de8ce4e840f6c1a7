//! Firmware version stamper (fwstamp) - Main binary entry point

use fwstamp::cli::args::{ArchiveArgs, Command, InjectArgs, ResolverArgs, parse_args};
use fwstamp::cli::output::{format_json, format_text};
use fwstamp::io::context::{read_context, read_or_init_context, write_context};
use fwstamp::services::archive::{ARTIFACT_PATTERN, register_archiver};
use fwstamp::services::inject::{clear_version_defines, version_define};
use fwstamp::{
    ArchiveOptions, ArchiveStatus, BuildContext, PostActionRegistry, VersionResolver, WaitPolicy,
};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

fn main() {
    // Stage status goes through `log`; RUST_LOG overrides the default level
    // Example: RUST_LOG=debug fwstamp version
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        return;
    }

    match args[1].as_str() {
        "--help" | "-h" => {
            print_help();
            return;
        }
        "--version" | "-v" => {
            print_version();
            return;
        }
        _ => {}
    }

    let cli_args = match parse_args(&args) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Use --help for usage information");
            process::exit(2);
        }
    };

    let exit_code = match &cli_args.command {
        Command::Version(resolver_args) => handle_version(resolver_args),
        Command::Flag(flag_args) => {
            let resolved = build_resolver(&flag_args.resolver, None).resolve();
            println!("{}", version_define(&flag_args.symbol, &resolved.value));
            0
        }
        Command::Inject(inject_args) => handle_inject(inject_args),
        Command::Archive(archive_args) => handle_archive(archive_args),
    };

    process::exit(exit_code);
}

fn build_resolver(args: &ResolverArgs, default_repo: Option<&Path>) -> VersionResolver {
    let mut resolver = VersionResolver::new();
    if let Some(git) = &args.git {
        resolver = resolver.with_program(git);
    }
    if let Some(repo) = args.repo.as_deref().map(Path::new).or(default_repo) {
        resolver = resolver.in_dir(repo);
    }
    resolver
}

fn handle_version(args: &ResolverArgs) -> i32 {
    let resolved = build_resolver(args, None).resolve();
    println!("{}", resolved.value);
    0
}

fn exit_code_for(err: &fwstamp::Error) -> i32 {
    match err {
        fwstamp::Error::InvalidInput(_) => 2,
        _ => 4,
    }
}

fn handle_inject(args: &InjectArgs) -> i32 {
    let context_path = Path::new(&args.context);

    let loaded = read_or_init_context(context_path, || {
        let build_dir = args.build_dir.as_deref().ok_or_else(|| {
            fwstamp::Error::InvalidInput(
                "--build-dir is required when the context file does not exist".to_string(),
            )
        })?;
        Ok(BuildContext::new(
            args.project_dir.as_deref().unwrap_or("."),
            build_dir,
        ))
    });

    let mut ctx = match loaded {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {e}");
            return exit_code_for(&e);
        }
    };

    if let Some(dir) = &args.project_dir {
        ctx.project_dir = PathBuf::from(dir);
    }
    if let Some(dir) = &args.build_dir {
        ctx.build_dir = PathBuf::from(dir);
    }
    if let Some(name) = &args.prog_name {
        ctx.prog_name.clone_from(name);
    }
    for (key, value) in &args.options {
        ctx.set_option(key, value);
    }

    // A context reused from an earlier build must not keep that build's version
    clear_version_defines(&mut ctx, &args.symbol);
    let resolver = build_resolver(&args.resolver, Some(ctx.project_dir.as_path()));
    fwstamp::inject_version_flag(&mut ctx, &resolver, &args.symbol);

    if let Err(e) = write_context(context_path, &ctx) {
        eprintln!("Error: Failed to save build context: {e}");
        return 4;
    }

    0
}

fn handle_archive(args: &ArchiveArgs) -> i32 {
    let ctx = match read_context(Path::new(&args.context)) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {e}");
            return exit_code_for(&e);
        }
    };

    let opts = ArchiveOptions {
        wait: args
            .wait_ms
            .map(|ms| WaitPolicy::for_total(Duration::from_millis(ms)))
            .unwrap_or_default(),
        symbol: args.symbol.clone(),
        export_dir: args.export_dir.as_ref().map(PathBuf::from),
    };

    let mut registry = PostActionRegistry::new();
    register_archiver(&mut registry, opts);

    let artifact = PathBuf::from(ctx.subst(ARTIFACT_PATTERN));
    let reports = registry.fire(&ctx, &artifact);

    let mut exit_code = 0;
    for report in &reports {
        if args.json {
            println!("{}", format_json(report));
        } else {
            print!("{}", format_text(report));
        }
        if args.strict && report.status != ArchiveStatus::Completed {
            exit_code = 3;
        }
    }

    exit_code
}

fn print_help() {
    println!("Firmware version stamper (fwstamp) - Git versions and archived firmware builds");
    println!();
    println!("USAGE:");
    println!("    fwstamp version [OPTIONS]");
    println!("    fwstamp flag [OPTIONS]");
    println!("    fwstamp inject --context <FILE> [OPTIONS]");
    println!("    fwstamp archive --context <FILE> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    version   Print the version derived from `git describe`");
    println!("    flag      Print the version define for the compiler flag list");
    println!("    inject    Replace the version define in a build context file");
    println!("    archive   Copy the built firmware under a versioned, timestamped name");
    println!();
    println!("GLOBAL OPTIONS:");
    println!("    -h, --help                 Show this help message");
    println!("    -v, --version              Show version information");
    println!();
    println!("VERSION / FLAG OPTIONS:");
    println!("    --repo <DIR>              Checkout to describe (default: current directory)");
    println!("    --git <PROGRAM>           Revision-control executable (default: git)");
    println!("    --symbol <NAME>           Define name (flag only, default: FW_VERSION_STRING)");
    println!();
    println!("INJECT OPTIONS:");
    println!("    --context <FILE>          Build context JSON file (created if missing)");
    println!("    --project-dir <DIR>       Project root (default: .)");
    println!("    --build-dir <DIR>         Build output directory (required for a new context)");
    println!("    --progname <NAME>         Firmware program name (default: firmware)");
    println!("    --option <KEY=VALUE>      Set a project option (repeatable)");
    println!("    --symbol <NAME>           Define name (default: FW_VERSION_STRING)");
    println!("    --repo <DIR>, --git <PROGRAM>");
    println!();
    println!("ARCHIVE OPTIONS:");
    println!("    --context <FILE>          Build context JSON file (required)");
    println!("    --export-dir <DIR>        Extra destination (overrides custom_firmware_export_dir)");
    println!("                              Relative paths resolve against the project dir");
    println!("    --wait-ms <MS>            Wait up to MS for the firmware binary (default: 10000)");
    println!("    --symbol <NAME>           Define to read the version from");
    println!("    --json                    Emit machine-readable output");
    println!("    --strict                  Exit with 3 unless every copy succeeded");
    println!();
    println!("EXAMPLES:");
    println!("    fwstamp inject --context .pio/build/esp32/fwstamp.json --build-dir .pio/build/esp32");
    println!("    fwstamp archive --context .pio/build/esp32/fwstamp.json --export-dir /srv/firmware");
    println!("    build_flags = !fwstamp flag        (platformio.ini)");
}

fn print_version() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_DESCRIBE: &str = env!("FWSTAMP_GIT_DESCRIBE");
    const GIT_DATE: &str = env!("GIT_DATE");
    const BUILD_TARGET: &str = env!("BUILD_TARGET");

    println!("fwstamp {VERSION}");
    println!("Commit: {GIT_DESCRIBE} ({GIT_DATE})");
    println!("Target: {BUILD_TARGET}");

    #[cfg(debug_assertions)]
    println!("Build: debug");
    #[cfg(not(debug_assertions))]
    println!("Build: release");
}
