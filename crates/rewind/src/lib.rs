//! Rewind: a turn-based timeline engine where the player's past selves
//! keep acting after every flashback.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Rewind sub-crates. For most users, adding `rewind` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use rewind::prelude::*;
//!
//! let rules = Rules { initial_flashback_charges: 1, ..Rules::default() };
//! let mut world = TimelineWorld::new(rules, Vec3::ZERO).unwrap();
//!
//! // Copy 0 steps right during turn 0.
//! world.move_to(CopyId(0), Vec3::new(10.0, 0.0, 0.0)).unwrap();
//! world.next_turn().unwrap();
//!
//! // Rewind and spawn copy 1 two cells right, then walk into the same cell.
//! let fork = world.flashback(Vec3::new(20.0, 0.0, 0.0)).unwrap();
//! world.move_to(fork.copy, Vec3::new(10.0, 0.0, 0.0)).unwrap();
//!
//! // Both moves contend for (10, 0) and are canceled.
//! assert_eq!(world.resolutions().canceled_count(), 2);
//! let original = world.position_at(CopyId(0), 10).unwrap();
//! assert_eq!(original.position, Vec3::ZERO);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `rewind-core` | IDs, grid, action records, timeline, rules |
//! | [`sim`] | `rewind-sim` | Playback, conflict resolution, trails |
//! | [`engine`] | `rewind-engine` | Action builder, flashbacks, sessions |
//! | [`store`] | `rewind-store` | Save/load, hashing, replay comparison |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, IDs and rules (`rewind-core`).
///
/// Contains the authored data model: [`types::ActionRecord`],
/// [`types::Turn`], [`types::Timeline`] and the tunable [`types::Rules`].
pub use rewind_core as types;

/// Playback and conflict resolution (`rewind-sim`).
///
/// [`sim::snapshot_at`] and [`sim::position_at`] replay a log from offset 0;
/// [`sim::resolve_from`] rebuilds the [`sim::Resolutions`] overlay.
pub use rewind_sim as sim;

/// Authoring and interaction (`rewind-engine`).
///
/// [`engine::TimelineWorld`] owns a log and its overlay;
/// [`engine::Session`] adds the mode-gated command surface.
pub use rewind_engine as engine;

/// Persistence and verification (`rewind-store`).
///
/// Save and load with [`store::save`] / [`store::load`], fingerprint with
/// [`store::timeline_hash`], and diff replays with [`store::compare_replays`].
pub use rewind_store as store;

/// Common imports for typical Rewind usage.
///
/// ```rust
/// use rewind::prelude::*;
/// ```
///
/// This imports the world and session types, core identifiers, snapshots
/// and the error enums.
pub mod prelude {
    // Core types
    pub use rewind_core::{ActionKind, CopyId, Grid, Rules, Timeline, Vec3};

    // Errors
    pub use rewind_core::{ConfigError, TimelineError};
    pub use rewind_engine::{BuildError, SessionError, WorldError};
    pub use rewind_store::StoreError;

    // Playback
    pub use rewind_sim::{CopyState, Trail, TrailKind, WorldSnapshot};

    // Engine
    pub use rewind_engine::{
        Command, FlashbackController, FlashbackState, Mode, Session, SessionView, TimelineWorld,
    };
}
