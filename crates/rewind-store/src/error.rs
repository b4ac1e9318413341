//! Error types for timeline persistence.

use std::fmt;
use std::io;

use rewind_core::{ConfigError, TimelineError};

/// Errors that can occur while saving or loading a timeline.
#[derive(Debug)]
pub enum StoreError {
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// The data does not start with the expected `b"RWND"` magic bytes.
    InvalidMagic,
    /// The format version is not supported by this build.
    UnsupportedVersion {
        /// The version found in the data.
        found: u8,
    },
    /// A record could not be decoded (truncated or corrupt data).
    MalformedRecord {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// A record tag is not recognized.
    UnknownRecordTag {
        /// The unrecognized tag.
        tag: u8,
    },
    /// The stored rules differ from the rules the caller expects.
    RulesMismatch {
        /// Hash of the stored rules.
        recorded: u64,
        /// Hash of the expected rules.
        current: u64,
    },
    /// The stored rules fail validation.
    InvalidRules(ConfigError),
    /// The decoded log violates a structural invariant.
    InvalidTimeline(TimelineError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidMagic => write!(f, "invalid magic bytes (expected b\"RWND\")"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported format version {found}")
            }
            Self::MalformedRecord { detail } => write!(f, "malformed record: {detail}"),
            Self::UnknownRecordTag { tag } => write!(f, "unknown record tag {tag}"),
            Self::RulesMismatch { recorded, current } => write!(
                f,
                "rules hash mismatch: recorded={recorded:#018x}, current={current:#018x}"
            ),
            Self::InvalidRules(e) => write!(f, "invalid stored rules: {e}"),
            Self::InvalidTimeline(e) => write!(f, "invalid stored timeline: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::InvalidRules(e) => Some(e),
            Self::InvalidTimeline(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ConfigError> for StoreError {
    fn from(e: ConfigError) -> Self {
        Self::InvalidRules(e)
    }
}

impl From<TimelineError> for StoreError {
    fn from(e: TimelineError) -> Self {
        Self::InvalidTimeline(e)
    }
}
