//! Build context read/write operations
//!
//! The orchestrator runs `inject` and `archive` as separate processes, so the
//! build context travels between them as a small JSON file.

use crate::models::BuildContext;
use crate::{Error, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Write the build context as pretty-printed JSON, creating parent directories.
pub fn write_context(path: &Path, ctx: &BuildContext) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, ctx)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Read a build context from a JSON file.
pub fn read_context(path: &Path) -> Result<BuildContext> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::InvalidInput(format!("Context file does not exist: {}", path.display()))
        } else {
            Error::Io(e)
        }
    })?;
    let ctx = serde_json::from_reader(BufReader::new(file))?;
    Ok(ctx)
}

/// Read the context at `path`, or build one with `init` when the file is absent.
pub fn read_or_init_context(
    path: &Path,
    init: impl FnOnce() -> Result<BuildContext>,
) -> Result<BuildContext> {
    if path.exists() {
        read_context(path)
    } else {
        init()
    }
}
