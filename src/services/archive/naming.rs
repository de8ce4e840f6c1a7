//! Version extraction from build flags and archive file naming.

use crate::services::version::normalize_version;
use chrono::NaiveDateTime;

pub const ARCHIVE_PREFIX: &str = "firmware";
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";

/// Find the last `-D<symbol>=...` define and return the bare version it carries.
///
/// Quote and backslash characters are dropped and a single leading `v` is
/// stripped, so `-DFW_VERSION_STRING=\"v1.2.3\"` yields `1.2.3`. When the
/// define appears more than once the most recent injection wins.
#[must_use]
pub fn extract_version(flags: &[String], symbol: &str) -> Option<String> {
    let prefix = format!("-D{symbol}=");
    flags
        .iter()
        .flat_map(|flag| flag.split_whitespace())
        .filter_map(|token| token.strip_prefix(prefix.as_str()))
        .last()
        .and_then(unquote_version)
}

fn unquote_version(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '"' | '\'' | '\\'))
        .collect();
    normalize_version(&cleaned)
}

/// `firmware_<version>_<YYYYMMDD_HHMM>.bin`
#[must_use]
pub fn archive_file_name(version: &str, when: &NaiveDateTime) -> String {
    format!(
        "{ARCHIVE_PREFIX}_{}_{}.bin",
        sanitize_version(version),
        when.format(TIMESTAMP_FORMAT)
    )
}

/// Replace characters that are unsafe in a file name with `_`.
#[must_use]
pub fn sanitize_version(version: &str) -> String {
    version
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '+') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
