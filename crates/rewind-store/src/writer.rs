//! Saving timelines.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use rewind_core::{Rules, Timeline};
use tracing::info;

use crate::codec::{encode_header, encode_timeline};
use crate::error::StoreError;

/// Encode `rules` and `timeline` to any `Write` sink.
///
/// Generic over `W: Write` so tests can use `Vec<u8>` and production code
/// can use `BufWriter<File>`. Resolution flags are not written.
pub fn save<W: Write>(mut writer: W, rules: &Rules, timeline: &Timeline) -> Result<(), StoreError> {
    encode_header(&mut writer, rules)?;
    encode_timeline(&mut writer, timeline)?;
    writer.flush()?;
    Ok(())
}

/// Save to a file, creating parent directories as needed.
pub fn save_to_path(
    path: impl AsRef<Path>,
    rules: &Rules,
    timeline: &Timeline,
) -> Result<(), StoreError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    save(BufWriter::new(File::create(path)?), rules, timeline)?;
    info!(
        path = %path.display(),
        turns = timeline.turn_count(),
        copies = timeline.copies().count(),
        "timeline saved"
    );
    Ok(())
}
