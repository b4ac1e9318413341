//! Loading timelines.
//!
//! Every loader decodes into fresh values and validates them fully before
//! returning, so a failed load never leaves partial state behind.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use rewind_core::Rules;
use tracing::info;

use crate::codec::{decode_header, decode_timeline, expect_eof};
use crate::error::StoreError;
use crate::hash::rules_hash;
use crate::types::Document;

/// Decode and validate a document from any `Read` source.
///
/// Fails on a bad header, invalid stored rules, truncated or trailing
/// data, or a log that violates any structural invariant.
pub fn load<R: Read>(mut reader: R) -> Result<Document, StoreError> {
    let rules = decode_header(&mut reader)?;
    rules.validate()?;
    let timeline = decode_timeline(&mut reader)?;
    expect_eof(&mut reader)?;
    timeline.validate(&rules)?;
    Ok(Document::new(rules, timeline))
}

/// Like [`load`], but also require the stored rules to match `expected`.
pub fn load_with_rules<R: Read>(reader: R, expected: &Rules) -> Result<Document, StoreError> {
    let doc = load(reader)?;
    let recorded = rules_hash(&doc.rules);
    let current = rules_hash(expected);
    if recorded != current {
        return Err(StoreError::RulesMismatch { recorded, current });
    }
    Ok(doc)
}

/// Load and validate a document from a file.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Document, StoreError> {
    let path = path.as_ref();
    let doc = load(BufReader::new(File::open(path)?))?;
    info!(
        path = %path.display(),
        turns = doc.timeline.turn_count(),
        copies = doc.timeline.copies().count(),
        "timeline loaded"
    );
    Ok(doc)
}
