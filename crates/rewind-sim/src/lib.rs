//! Deterministic playback and conflict resolution for the Rewind action log.
//!
//! Playback ([`snapshot_at`], [`position_at`]) is a pure function of the
//! authored [`Timeline`](rewind_core::Timeline), the [`Rules`](rewind_core::Rules)
//! and the derived [`Resolutions`] overlay: it always replays from offset 0
//! and caches nothing between calls.
//!
//! [`resolve_from`] recomputes the overlay slice by slice, turning pushes
//! into forced moves and canceling moves that contend for one cell.
//! [`trail`] and [`trails_for_turn`] sample playback into polylines.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod overlay;
pub mod player;
pub mod resolve;
pub mod snapshot;
pub mod trail;

pub use overlay::{MoveResolution, PushOutcome, RecordKey, Resolutions};
pub use player::{position_at, snapshot_at, LogView, Replay};
pub use resolve::{resolve_all, resolve_from, ResolveReport};
pub use snapshot::{CopyState, WorldSnapshot};
pub use trail::{trail, trails_for_turn, Trail, TrailKind, TRAIL_EPSILON};
