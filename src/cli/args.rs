//! CLI argument parsing

use crate::services::inject::DEFAULT_VERSION_SYMBOL;

#[derive(Debug, Clone)]
pub struct CliArgs {
    pub command: Command,
}

#[derive(Debug, Clone)]
pub enum Command {
    Version(ResolverArgs),
    Flag(FlagArgs),
    Inject(InjectArgs),
    Archive(ArchiveArgs),
}

/// Where and how to run `git describe`
#[derive(Debug, Clone, Default)]
pub struct ResolverArgs {
    pub repo: Option<String>,
    pub git: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FlagArgs {
    pub resolver: ResolverArgs,
    pub symbol: String,
}

#[derive(Debug, Clone)]
pub struct InjectArgs {
    pub context: String,
    pub project_dir: Option<String>,
    pub build_dir: Option<String>,
    pub prog_name: Option<String>,
    pub options: Vec<(String, String)>,
    pub symbol: String,
    pub resolver: ResolverArgs,
}

#[derive(Debug, Clone)]
pub struct ArchiveArgs {
    pub context: String,
    pub export_dir: Option<String>,
    pub wait_ms: Option<u64>,
    pub symbol: String,
    pub json: bool,
    pub strict: bool,
}

impl Default for FlagArgs {
    fn default() -> Self {
        Self {
            resolver: ResolverArgs::default(),
            symbol: DEFAULT_VERSION_SYMBOL.to_string(),
        }
    }
}

impl Default for InjectArgs {
    fn default() -> Self {
        Self {
            context: String::new(),
            project_dir: None,
            build_dir: None,
            prog_name: None,
            options: Vec::new(),
            symbol: DEFAULT_VERSION_SYMBOL.to_string(),
            resolver: ResolverArgs::default(),
        }
    }
}

impl Default for ArchiveArgs {
    fn default() -> Self {
        Self {
            context: String::new(),
            export_dir: None,
            wait_ms: None,
            symbol: DEFAULT_VERSION_SYMBOL.to_string(),
            json: false,
            strict: false,
        }
    }
}

/// Parse command line arguments
pub fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    if args.len() < 2 {
        return Err("No command specified".to_string());
    }

    let command = match args[1].as_str() {
        "version" => Command::Version(parse_version_args(&args[2..])?),
        "flag" => Command::Flag(parse_flag_args(&args[2..])?),
        "inject" => Command::Inject(parse_inject_args(&args[2..])?),
        "archive" => Command::Archive(parse_archive_args(&args[2..])?),
        _ => return Err(format!("Unknown command: {}", args[1])),
    };

    Ok(CliArgs { command })
}

/// Advance past `flag` and return its value.
fn take_value(args: &[String], i: &mut usize, flag: &str) -> Result<String, String> {
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| format!("{flag} requires a value"))
}

/// Consume a resolver option at `args[*i]`; `Ok(false)` if it is not one.
fn parse_resolver_option(
    args: &[String],
    i: &mut usize,
    resolver: &mut ResolverArgs,
) -> Result<bool, String> {
    match args[*i].as_str() {
        "--repo" => resolver.repo = Some(take_value(args, i, "--repo")?),
        "--git" => resolver.git = Some(take_value(args, i, "--git")?),
        _ => return Ok(false),
    }
    Ok(true)
}

fn parse_version_args(args: &[String]) -> Result<ResolverArgs, String> {
    let mut resolver = ResolverArgs::default();
    let mut i = 0;

    while i < args.len() {
        if !parse_resolver_option(args, &mut i, &mut resolver)? {
            return Err(unexpected(&args[i]));
        }
        i += 1;
    }

    Ok(resolver)
}

fn parse_flag_args(args: &[String]) -> Result<FlagArgs, String> {
    let mut flag_args = FlagArgs::default();
    let mut i = 0;

    while i < args.len() {
        if parse_resolver_option(args, &mut i, &mut flag_args.resolver)? {
            i += 1;
            continue;
        }
        match args[i].as_str() {
            "--symbol" => flag_args.symbol = parse_symbol(&take_value(args, &mut i, "--symbol")?)?,
            other => return Err(unexpected(other)),
        }
        i += 1;
    }

    Ok(flag_args)
}

fn parse_inject_args(args: &[String]) -> Result<InjectArgs, String> {
    let mut inject_args = InjectArgs::default();
    let mut i = 0;

    while i < args.len() {
        if parse_resolver_option(args, &mut i, &mut inject_args.resolver)? {
            i += 1;
            continue;
        }
        match args[i].as_str() {
            "--context" => inject_args.context = take_value(args, &mut i, "--context")?,
            "--project-dir" => {
                inject_args.project_dir = Some(take_value(args, &mut i, "--project-dir")?);
            }
            "--build-dir" => inject_args.build_dir = Some(take_value(args, &mut i, "--build-dir")?),
            "--progname" => {
                let name = take_value(args, &mut i, "--progname")?;
                if name.is_empty() {
                    return Err("--progname must not be empty".to_string());
                }
                inject_args.prog_name = Some(name);
            }
            "--option" => {
                let pair = take_value(args, &mut i, "--option")?;
                inject_args.options.push(parse_option_pair(&pair)?);
            }
            "--symbol" => {
                inject_args.symbol = parse_symbol(&take_value(args, &mut i, "--symbol")?)?;
            }
            other => return Err(unexpected(other)),
        }
        i += 1;
    }

    if inject_args.context.is_empty() {
        return Err("Missing required option: --context <FILE>".to_string());
    }

    Ok(inject_args)
}

fn parse_archive_args(args: &[String]) -> Result<ArchiveArgs, String> {
    let mut archive_args = ArchiveArgs::default();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--context" => archive_args.context = take_value(args, &mut i, "--context")?,
            "--export-dir" => {
                archive_args.export_dir = Some(take_value(args, &mut i, "--export-dir")?);
            }
            "--wait-ms" => {
                let ms: u64 = take_value(args, &mut i, "--wait-ms")?
                    .parse()
                    .map_err(|_| "--wait-ms must be a non-negative integer".to_string())?;
                archive_args.wait_ms = Some(ms);
            }
            "--symbol" => {
                archive_args.symbol = parse_symbol(&take_value(args, &mut i, "--symbol")?)?;
            }
            "--json" => archive_args.json = true,
            "--strict" => archive_args.strict = true,
            other => return Err(unexpected(other)),
        }
        i += 1;
    }

    if archive_args.context.is_empty() {
        return Err("Missing required option: --context <FILE>".to_string());
    }

    Ok(archive_args)
}

/// Split `KEY=VALUE`; the value may be empty, the key may not.
pub fn parse_option_pair(pair: &str) -> Result<(String, String), String> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("--option expects KEY=VALUE, got: {pair}")),
    }
}

fn parse_symbol(symbol: &str) -> Result<String, String> {
    let valid = symbol
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && symbol.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(symbol.to_string())
    } else {
        Err(format!("Invalid preprocessor symbol: {symbol}"))
    }
}

fn unexpected(arg: &str) -> String {
    if arg.starts_with("--") {
        format!("Unknown option: {arg}")
    } else {
        format!("Unexpected argument: {arg}")
    }
}
