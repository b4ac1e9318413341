//! Error types for authoring and session handling.

use std::error::Error;
use std::fmt;

use rewind_core::{ConfigError, CopyId, TimelineError, Vec3};
use rewind_store::StoreError;

use crate::session::Mode;

// ── BuildError ─────────────────────────────────────────────────────

/// Errors from appending records to the current turn.
///
/// A rejected call leaves the log untouched.
#[derive(Clone, Debug, PartialEq)]
pub enum BuildError {
    /// The action costs more than the acting copy has left.
    InsufficientActionPoints {
        /// Cost of the action.
        requested: u32,
        /// Budget remaining.
        available: u32,
    },
    /// Only the current copy can author budgeted actions.
    NotCurrentCopy {
        /// The copy named by the caller.
        copy: CopyId,
        /// The copy being authored.
        current: CopyId,
    },
    /// The copy does not exist in the current turn.
    NotLive {
        /// The copy named by the caller.
        copy: CopyId,
        /// The current turn.
        turn: u32,
    },
    /// A target position is NaN or infinite.
    NonFiniteTarget {
        /// The rejected position.
        target: Vec3,
    },
    /// The record would break a log invariant.
    Timeline(TimelineError),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientActionPoints {
                requested,
                available,
            } => write!(
                f,
                "action costs {requested} action points but only {available} remain"
            ),
            Self::NotCurrentCopy { copy, current } => {
                write!(f, "copy {copy} cannot act; copy {current} is being authored")
            }
            Self::NotLive { copy, turn } => write!(f, "copy {copy} does not exist in turn {turn}"),
            Self::NonFiniteTarget { target } => write!(f, "target {target:?} is not finite"),
            Self::Timeline(e) => write!(f, "{e}"),
        }
    }
}

impl Error for BuildError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Timeline(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TimelineError> for BuildError {
    fn from(e: TimelineError) -> Self {
        Self::Timeline(e)
    }
}

// ── WorldError ─────────────────────────────────────────────────────

/// Errors from [`TimelineWorld`](crate::TimelineWorld) operations.
#[derive(Debug)]
pub enum WorldError {
    /// The rules failed validation.
    Config(ConfigError),
    /// An authoring call was rejected.
    Build(BuildError),
    /// A save or load failed; the world is unchanged.
    Store(StoreError),
    /// A flashback was requested with no charges left.
    NoFlashbackCharges,
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid rules: {e}"),
            Self::Build(e) => write!(f, "rejected action: {e}"),
            Self::Store(e) => write!(f, "persistence failed: {e}"),
            Self::NoFlashbackCharges => write!(f, "no flashback charges left"),
        }
    }
}

impl Error for WorldError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Build(e) => Some(e),
            Self::Store(e) => Some(e),
            Self::NoFlashbackCharges => None,
        }
    }
}

impl From<ConfigError> for WorldError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<BuildError> for WorldError {
    fn from(e: BuildError) -> Self {
        Self::Build(e)
    }
}

impl From<StoreError> for WorldError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

// ── SessionError ───────────────────────────────────────────────────

/// Errors from [`Session::handle`](crate::Session::handle).
#[derive(Debug)]
pub enum SessionError {
    /// The command needs a different interaction mode.
    WrongMode {
        /// Mode the command requires.
        expected: Mode,
        /// Mode the session is in.
        found: Mode,
    },
    /// Flashback mode cannot be entered without a charge.
    NoFlashbackCharges,
    /// The position is not one of the offered targets.
    NotATarget {
        /// The rejected position.
        target: Vec3,
    },
    /// The flashback destination lies outside the flashback zone.
    OutsideFlashbackZone {
        /// The rejected position.
        target: Vec3,
    },
    /// The underlying world rejected the command.
    World(WorldError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongMode { expected, found } => {
                write!(f, "command requires {expected:?} mode, session is in {found:?} mode")
            }
            Self::NoFlashbackCharges => write!(f, "no flashback charges left"),
            Self::NotATarget { target } => write!(f, "{target:?} is not a valid target"),
            Self::OutsideFlashbackZone { target } => {
                write!(f, "{target:?} lies outside the flashback zone")
            }
            Self::World(e) => write!(f, "{e}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::World(e) => Some(e),
            _ => None,
        }
    }
}

impl From<WorldError> for SessionError {
    fn from(e: WorldError) -> Self {
        match e {
            WorldError::NoFlashbackCharges => Self::NoFlashbackCharges,
            other => Self::World(other),
        }
    }
}

impl From<BuildError> for SessionError {
    fn from(e: BuildError) -> Self {
        Self::World(WorldError::Build(e))
    }
}
