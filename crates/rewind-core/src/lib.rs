//! Core types for the Rewind timeline engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! authored data model shared by every other crate in the workspace:
//!
//! - [`CopyId`] / [`PlayerId`] identifiers
//! - [`Vec3`] and the snapping [`Grid`]
//! - [`ActionRecord`] and its [`ActionKind`] variants
//! - [`Turn`] and the authoritative [`Timeline`] with its [`Cursors`]
//! - [`Rules`], the tunable constants of a game, and their validation
//!
//! Nothing here replays or resolves the log; see `rewind-sim` for that.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod action;
pub mod error;
pub mod grid;
pub mod id;
pub mod rules;
pub mod timeline;
pub mod turn;

pub use action::{ActionClass, ActionKind, ActionRecord};
pub use error::TimelineError;
pub use grid::{Grid, Vec3};
pub use id::{CopyId, PlayerId};
pub use rules::{ConfigError, Rules};
pub use timeline::{Cursors, Timeline};
pub use turn::Turn;
