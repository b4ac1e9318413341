//! Authoring and interaction layer for Rewind timelines.
//!
//! [`TimelineWorld`] owns the authored log and its resolved overlay and is
//! the only writer: the action builder methods ([`move_to`], [`attack`],
//! [`push`], [`empty`], [`finalize_turn`], [`next_turn`], [`reset_turn`])
//! and [`flashback`] all re-resolve before returning. [`Session`] adds the
//! mode-gated command surface a UI drives.
//!
//! [`move_to`]: TimelineWorld::move_to
//! [`attack`]: TimelineWorld::attack
//! [`push`]: TimelineWorld::push
//! [`empty`]: TimelineWorld::empty
//! [`finalize_turn`]: TimelineWorld::finalize_turn
//! [`next_turn`]: TimelineWorld::next_turn
//! [`reset_turn`]: TimelineWorld::reset_turn
//! [`flashback`]: TimelineWorld::flashback

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod builder;
pub mod error;
pub mod flashback;
pub mod session;
pub mod world;

pub use error::{BuildError, SessionError, WorldError};
pub use flashback::{FlashbackController, FlashbackReport, FlashbackState};
pub use session::{Command, Mode, Session, SessionView};
pub use world::{TimelineWorld, DEFAULT_DUMP_PATH};
