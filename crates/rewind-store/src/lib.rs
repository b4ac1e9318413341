//! Persistence and verification for Rewind timelines.
//!
//! Saves and loads the authored log, and checks that two logs replay
//! identically.
//!
//! # Architecture
//!
//! - [`save`] / [`load`] encode a [`Document`] to any `Write` / `Read`
//! - [`save_to_path`] / [`load_from_path`] wrap them with buffered files
//! - [`rules_hash`], [`timeline_hash`] and [`snapshot_hash`] fingerprint
//!   configuration, authored intent and replayed state
//! - [`compare_replays`] finds the first offset where two logs diverge
//! - All I/O uses a custom binary codec (no serde dependency)
//!
//! # Format
//!
//! ```text
//! [MAGIC "RWND"] [VERSION u8] [Rules] [Cursors]
//! [turn count u32] [Turn 0] ... [Turn N-1]
//! ```
//!
//! Each turn is a `u32` record count followed by tagged records. Derived
//! resolution flags are not stored; loading callers re-run the resolver.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod compare;
pub mod error;
pub mod hash;
pub mod reader;
pub mod types;
pub mod writer;

pub use compare::{compare_replays, compare_snapshots, CopyDivergence, DivergenceReport};
pub use error::StoreError;
pub use hash::{copies_hash, rules_hash, snapshot_hash, timeline_hash};
pub use reader::{load, load_from_path, load_with_rules};
pub use types::Document;
pub use writer::{save, save_to_path};

/// Magic bytes at the start of every saved timeline.
pub const MAGIC: [u8; 4] = *b"RWND";

/// Current binary format version.
pub const FORMAT_VERSION: u8 = 1;
