//! Error types for the authored action log.
//!
//! [`TimelineError`] reports a structural invariant violation, either when a
//! record is inserted into a [`Turn`](crate::Turn) or when a whole
//! [`Timeline`](crate::Timeline) is validated after loading.

use std::error::Error;
use std::fmt;

use crate::id::CopyId;

/// A violated invariant of the action log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimelineError {
    /// The log holds no turns at all.
    NoTurns,
    /// A scalar cursor points outside the log.
    CursorOutOfRange {
        /// Which cursor.
        cursor: &'static str,
        /// Its value.
        value: u32,
        /// Exclusive upper bound it must respect.
        limit: u32,
    },
    /// `action_points_left` disagrees with what the acting copy has spent.
    BudgetMismatch {
        /// Budget implied by the records of the current turn.
        expected: u32,
        /// Budget stored in the cursors.
        found: u32,
    },
    /// A copy up to the current copy id has no spawn record.
    MissingSpawn {
        /// The copy without a spawn.
        copy: CopyId,
    },
    /// A copy has more than one spawn record.
    DuplicateSpawn {
        /// The offending copy.
        copy: CopyId,
    },
    /// A record names a copy beyond the current copy id.
    UnknownCopy {
        /// The unknown copy.
        copy: CopyId,
    },
    /// A record precedes its copy's spawn.
    RecordBeforeSpawn {
        /// The offending copy.
        copy: CopyId,
        /// Turn of the early record.
        turn: u32,
    },
    /// Two duration records of one copy overlap within a turn.
    Overlap {
        /// Owning turn, when known.
        turn: Option<u32>,
        /// The copy.
        copy: CopyId,
        /// Start of the rejected record.
        ap_start: u32,
    },
    /// A record extends past the end of its turn.
    OutOfTurnBounds {
        /// Owning turn.
        turn: u32,
        /// The copy.
        copy: CopyId,
        /// Record start.
        ap_start: u32,
        /// Record cost.
        ap_cost: u32,
    },
    /// A non-spawn record has zero cost, or a spawn has non-zero cost.
    InvalidCost {
        /// Owning turn.
        turn: u32,
        /// The copy.
        copy: CopyId,
        /// Record start.
        ap_start: u32,
    },
    /// A move or push does not begin on a slice boundary.
    Misaligned {
        /// Owning turn.
        turn: u32,
        /// The copy.
        copy: CopyId,
        /// Record start.
        ap_start: u32,
    },
    /// A direction or position is NaN or infinite.
    NonFinite {
        /// Owning turn.
        turn: u32,
        /// The copy.
        copy: CopyId,
    },
}

impl fmt::Display for TimelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTurns => write!(f, "timeline has no turns"),
            Self::CursorOutOfRange {
                cursor,
                value,
                limit,
            } => write!(f, "cursor {cursor} = {value} is out of range (limit {limit})"),
            Self::BudgetMismatch { expected, found } => write!(
                f,
                "action points left is {found}, records of the current turn imply {expected}"
            ),
            Self::MissingSpawn { copy } => write!(f, "copy {copy} has no spawn record"),
            Self::DuplicateSpawn { copy } => write!(f, "copy {copy} has more than one spawn"),
            Self::UnknownCopy { copy } => write!(f, "record names unallocated copy {copy}"),
            Self::RecordBeforeSpawn { copy, turn } => {
                write!(f, "copy {copy} has a record in turn {turn} before its spawn")
            }
            Self::Overlap {
                turn,
                copy,
                ap_start,
            } => {
                write!(f, "record of copy {copy} at ap {ap_start} overlaps another")?;
                if let Some(t) = turn {
                    write!(f, " in turn {t}")?;
                }
                Ok(())
            }
            Self::OutOfTurnBounds {
                turn,
                copy,
                ap_start,
                ap_cost,
            } => write!(
                f,
                "record of copy {copy} in turn {turn} spans [{ap_start}, {}) past the turn end",
                ap_start + ap_cost
            ),
            Self::InvalidCost {
                turn,
                copy,
                ap_start,
            } => write!(
                f,
                "record of copy {copy} in turn {turn} at ap {ap_start} has an invalid cost"
            ),
            Self::Misaligned {
                turn,
                copy,
                ap_start,
            } => write!(
                f,
                "record of copy {copy} in turn {turn} starts at ap {ap_start}, off a slice boundary"
            ),
            Self::NonFinite { turn, copy } => {
                write!(f, "record of copy {copy} in turn {turn} has a non-finite vector")
            }
        }
    }
}

impl Error for TimelineError {}
