//! Build-flag injection of the resolved firmware version

use super::version::VersionResolver;
use crate::models::{BuildContext, ResolvedVersion};
use log::{debug, info};

/// Preprocessor symbol the firmware reads its version from.
pub const DEFAULT_VERSION_SYMBOL: &str = "FW_VERSION_STRING";

/// Render the define for `version`, e.g. `-DFW_VERSION_STRING=\"v1.2.3\"`.
///
/// The quotes are backslash-escaped so they survive the compiler driver's
/// shell splitting and reach the preprocessor as a string literal.
#[must_use]
pub fn version_define(symbol: &str, version: &str) -> String {
    format!(r#"-D{symbol}=\"v{version}\""#)
}

/// Resolve the version and append exactly one define to the context's flags.
///
/// Repeated calls append repeated entries.
pub fn inject_version_flag(
    ctx: &mut BuildContext,
    resolver: &VersionResolver,
    symbol: &str,
) -> ResolvedVersion {
    let resolved = resolver.resolve();
    ctx.append_build_flag(version_define(symbol, &resolved.value));
    info!("Firmware version from Git: v{}", resolved.value);
    resolved
}

/// Drop every `-D<symbol>=...` token from the context's flags, returning how
/// many were removed.
///
/// A context persisted from an earlier build still carries that build's
/// define; clearing it first keeps each build stamped with a fresh version.
pub fn clear_version_defines(ctx: &mut BuildContext, symbol: &str) -> usize {
    let prefix = format!("-D{symbol}=");
    let mut removed = 0;

    ctx.build_flags.retain_mut(|flag| {
        let (kept, dropped) = drop_prefixed_tokens(flag, &prefix);
        if dropped == 0 {
            return true;
        }
        removed += dropped;
        *flag = kept;
        !flag.is_empty()
    });

    if removed > 0 {
        debug!("Cleared {removed} stale {symbol} define(s) from build flags");
    }
    removed
}

fn drop_prefixed_tokens(flag: &str, prefix: &str) -> (String, usize) {
    let mut dropped = 0;
    let kept: Vec<&str> = flag
        .split_whitespace()
        .filter(|token| {
            let hit = token.starts_with(prefix);
            dropped += usize::from(hit);
            !hit
        })
        .collect();
    (kept.join(" "), dropped)
}
