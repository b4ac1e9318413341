//! The timeline world: rules, authored log and resolved overlay.
//!
//! [`TimelineWorld`] is the primary user-facing API. It owns the single
//! writable copy of the [`Timeline`] and keeps the [`Resolutions`] overlay
//! in step with it: every mutating call re-resolves from the first turn
//! it touched before returning, so reads never see stale flags.
//!
//! Reads ([`snapshot_at`](TimelineWorld::snapshot_at),
//! [`position_at`](TimelineWorld::position_at),
//! [`trails_for_turn`](TimelineWorld::trails_for_turn)) replay from
//! offset 0 on every call and cache nothing.
//!
//! # Ownership model
//!
//! All mutating methods take `&mut self`; [`view()`](TimelineWorld::view)
//! hands out a [`LogView`] borrowing the world, so a view can never
//! observe a half-applied mutation.

use std::io::{Read, Write};
use std::path::Path;

use rewind_core::{ConfigError, CopyId, Cursors, Rules, Timeline, Vec3};
use rewind_sim::{
    resolve_all, resolve_from, snapshot_at, trails_for_turn, CopyState, LogView, Resolutions,
    ResolveReport, Trail, WorldSnapshot,
};
use rewind_store::{load, load_from_path, save, save_to_path, Document};
use tracing::info;

use crate::error::WorldError;

/// Where [`TimelineWorld::dump`] and [`TimelineWorld::reload`] are pointed
/// by default.
pub const DEFAULT_DUMP_PATH: &str = "debug/timeline.rwnd";

/// Single-threaded owner of one game's timeline.
///
/// # Examples
///
/// ```
/// use rewind_core::{CopyId, Rules, Vec3};
/// use rewind_engine::TimelineWorld;
///
/// let mut world = TimelineWorld::new(Rules::default(), Vec3::ZERO).unwrap();
/// world.move_to(CopyId(0), Vec3::new(10.0, 0.0, 0.0)).unwrap();
/// world.move_to(CopyId(0), Vec3::new(10.0, 10.0, 0.0)).unwrap();
/// world.finalize_turn().unwrap();
///
/// let at = |t| world.position_at(CopyId(0), t).unwrap().position;
/// assert_eq!(at(5), Vec3::new(5.0, 0.0, 0.0));
/// assert_eq!(at(15), Vec3::new(10.0, 5.0, 0.0));
/// assert_eq!(at(20), Vec3::new(10.0, 10.0, 0.0));
/// ```
#[derive(Clone, Debug)]
pub struct TimelineWorld {
    pub(crate) rules: Rules,
    pub(crate) timeline: Timeline,
    pub(crate) resolutions: Resolutions,
}

impl TimelineWorld {
    /// Validate `rules` and start a game with copy 0 at `origin`.
    pub fn new(rules: Rules, origin: Vec3) -> Result<Self, ConfigError> {
        rules.validate()?;
        let timeline = Timeline::new(&rules, origin);
        let mut world = Self {
            rules,
            timeline,
            resolutions: Resolutions::new(),
        };
        world.resolve_all();
        Ok(world)
    }

    /// Build a world from a validated document, resolving it fully.
    pub fn from_document(doc: Document) -> Self {
        let mut world = Self {
            rules: doc.rules,
            timeline: doc.timeline,
            resolutions: Resolutions::new(),
        };
        world.resolve_all();
        world
    }

    /// The rules.
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// The authored log.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// The resolved overlay.
    pub fn resolutions(&self) -> &Resolutions {
        &self.resolutions
    }

    /// The authoring cursors.
    pub fn cursors(&self) -> &Cursors {
        self.timeline.cursors()
    }

    /// The copy being authored.
    pub fn current_copy(&self) -> CopyId {
        self.timeline.cursors().current_copy
    }

    /// A read-only view for playback.
    pub fn view(&self) -> LogView<'_> {
        LogView::new(&self.rules, &self.timeline, &self.resolutions)
    }

    /// Global offset of the current copy's next action.
    pub fn authoring_offset(&self) -> u32 {
        self.timeline.authoring_offset(&self.rules)
    }

    /// Global offset one past the last authored turn.
    pub fn end_offset(&self) -> u32 {
        self.timeline.end_offset(&self.rules)
    }

    /// Every copy's state at `offset`.
    pub fn snapshot_at(&self, offset: u32) -> WorldSnapshot {
        snapshot_at(self.view(), offset)
    }

    /// One copy's state at `offset`.
    pub fn position_at(&self, copy: CopyId, offset: u32) -> Option<CopyState> {
        rewind_sim::position_at(self.view(), copy, offset)
    }

    /// Where `copy` stands at the authoring offset.
    ///
    /// This is the position new moves are measured from.
    pub fn last_known_position(&self, copy: CopyId) -> Option<Vec3> {
        self.position_at(copy, self.authoring_offset())
            .map(|s| s.position)
    }

    /// Past, current and future trails of every copy around `turn`.
    pub fn trails_for_turn(&self, turn: u32) -> Vec<Trail> {
        trails_for_turn(self.view(), turn)
    }

    pub(crate) fn resolve_from(&mut self, turn: u32) -> ResolveReport {
        resolve_from(&self.rules, &self.timeline, &mut self.resolutions, turn)
    }

    fn resolve_all(&mut self) -> ResolveReport {
        resolve_all(&self.rules, &self.timeline, &mut self.resolutions)
    }

    // ── Persistence ─────────────────────────────────────────────────

    /// Encode the rules and authored log to `writer`.
    pub fn save(&self, writer: impl Write) -> Result<(), WorldError> {
        save(writer, &self.rules, &self.timeline)?;
        Ok(())
    }

    /// Replace this world with one decoded from `reader`.
    ///
    /// Decoding and validation finish before anything is swapped in; on
    /// error the world is untouched.
    pub fn load_from(&mut self, reader: impl Read) -> Result<(), WorldError> {
        let doc = load(reader)?;
        *self = Self::from_document(doc);
        Ok(())
    }

    /// Write a debug dump of the whole log to `path`.
    pub fn dump(&self, path: impl AsRef<Path>) -> Result<(), WorldError> {
        save_to_path(path, &self.rules, &self.timeline)?;
        Ok(())
    }

    /// Replace this world with a debug dump read from `path`.
    ///
    /// On error the world is untouched.
    pub fn reload(&mut self, path: impl AsRef<Path>) -> Result<(), WorldError> {
        let doc = load_from_path(path)?;
        *self = Self::from_document(doc);
        info!(
            copies = self.timeline.copies().count(),
            current_turn = self.cursors().current_turn,
            "world reloaded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_rules() {
        let rules = Rules {
            grid_step: 0.0,
            ..Rules::default()
        };
        assert!(TimelineWorld::new(rules, Vec3::ZERO).is_err());
    }

    #[test]
    fn origin_is_snapped() {
        let world = TimelineWorld::new(Rules::default(), Vec3::new(12.0, 17.0, 0.0)).unwrap();
        assert_eq!(
            world.last_known_position(CopyId(0)),
            Some(Vec3::new(10.0, 20.0, 0.0))
        );
    }

    #[test]
    fn failed_load_leaves_world_untouched() {
        let mut world = TimelineWorld::new(Rules::default(), Vec3::ZERO).unwrap();
        world.move_to(CopyId(0), Vec3::new(10.0, 0.0, 0.0)).unwrap();
        let before = world.timeline().clone();
        let err = world.load_from(&b"RWNDgarbage"[..]).unwrap_err();
        assert!(matches!(err, WorldError::Store(_)));
        assert_eq!(world.timeline(), &before);
        assert_eq!(world.cursors().action_points_left, 90);
    }

    #[test]
    fn save_then_load_restores_cursors() {
        let mut world = TimelineWorld::new(Rules::default(), Vec3::ZERO).unwrap();
        world.move_to(CopyId(0), Vec3::new(10.0, 0.0, 0.0)).unwrap();
        world.next_turn().unwrap();
        let mut buf = Vec::new();
        world.save(&mut buf).unwrap();

        let mut other = TimelineWorld::new(Rules::default(), Vec3::ZERO).unwrap();
        other.load_from(buf.as_slice()).unwrap();
        assert_eq!(other.timeline(), world.timeline());
        assert_eq!(other.resolutions(), world.resolutions());
    }
}
