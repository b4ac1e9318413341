//! Derived resolution overlay.
//!
//! The authored [`Timeline`](rewind_core::Timeline) never stores conflict
//! outcomes. The resolver writes them here instead, keyed by
//! [`RecordKey`]:
//!
//! - **Move resolutions**: the resolved target and `canceled` flag of every
//!   move that starts in a slice, including *forced* moves synthesized on
//!   a pushed copy. A forced entry shadows whatever the pushed copy
//!   authored for that slice.
//! - **Push outcomes**: which copy, if any, each push retargeted.
//!
//! Entries are kept in insertion order (`IndexMap`), so iteration follows
//! resolution order and two resolutions of the same log compare equal.

use indexmap::IndexMap;
use rewind_core::{CopyId, Vec3};

/// Identifies the slot a resolution applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    /// Owning turn.
    pub turn: u32,
    /// Copy whose record is resolved.
    pub copy: CopyId,
    /// Start of the record (or of the forced slice) within the turn.
    pub ap_start: u32,
}

impl RecordKey {
    /// Build a key.
    pub fn new(turn: u32, copy: CopyId, ap_start: u32) -> Self {
        Self {
            turn,
            copy,
            ap_start,
        }
    }
}

/// Resolved flags of one move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveResolution {
    /// Displacement applied over the move.
    pub direction: Vec3,
    /// Position at slice start plus `direction`.
    pub target: Vec3,
    /// Set when another move in the same slice targets the same cell.
    pub canceled: bool,
    /// The pushing copy, for moves synthesized by a push.
    pub forced_by: Option<CopyId>,
}

impl MoveResolution {
    /// Whether the move was synthesized by a push.
    pub fn is_forced(&self) -> bool {
        self.forced_by.is_some()
    }
}

/// What a push did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PushOutcome {
    /// The retargeted copy, or `None` when the destination cell was empty.
    pub victim: Option<CopyId>,
}

/// The resolver's output for a whole log.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resolutions {
    moves: IndexMap<RecordKey, MoveResolution>,
    pushes: IndexMap<RecordKey, PushOutcome>,
}

impl Resolutions {
    /// An empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.moves.clear();
        self.pushes.clear();
    }

    /// Drop every entry belonging to `turn` or later.
    pub fn clear_from(&mut self, turn: u32) {
        self.moves.retain(|k, _| k.turn < turn);
        self.pushes.retain(|k, _| k.turn < turn);
    }

    /// The move resolution stored at `key`.
    pub fn move_at(&self, key: RecordKey) -> Option<&MoveResolution> {
        self.moves.get(&key)
    }

    /// The forced move stored at `key`, if the slot was retargeted.
    pub fn forced_at(&self, key: RecordKey) -> Option<&MoveResolution> {
        self.moves.get(&key).filter(|m| m.is_forced())
    }

    /// Store a move resolution; a later write to the same key wins.
    pub fn set_move(&mut self, key: RecordKey, resolution: MoveResolution) {
        self.moves.insert(key, resolution);
    }

    /// The outcome of the push starting at `key`.
    pub fn push_at(&self, key: RecordKey) -> Option<&PushOutcome> {
        self.pushes.get(&key)
    }

    /// Store a push outcome.
    pub fn set_push(&mut self, key: RecordKey, outcome: PushOutcome) {
        self.pushes.insert(key, outcome);
    }

    /// Move resolutions in resolution order.
    pub fn moves(&self) -> impl Iterator<Item = (&RecordKey, &MoveResolution)> {
        self.moves.iter()
    }

    /// Push outcomes in resolution order.
    pub fn pushes(&self) -> impl Iterator<Item = (&RecordKey, &PushOutcome)> {
        self.pushes.iter()
    }

    /// Number of canceled moves.
    pub fn canceled_count(&self) -> usize {
        self.moves.values().filter(|m| m.canceled).count()
    }

    /// Whether no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty() && self.pushes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolution(forced_by: Option<CopyId>) -> MoveResolution {
        MoveResolution {
            direction: Vec3::new(10.0, 0.0, 0.0),
            target: Vec3::new(10.0, 0.0, 0.0),
            canceled: false,
            forced_by,
        }
    }

    #[test]
    fn clear_from_keeps_earlier_turns() {
        let mut res = Resolutions::new();
        for turn in 0..4 {
            res.set_move(RecordKey::new(turn, CopyId(0), 0), resolution(None));
            res.set_push(
                RecordKey::new(turn, CopyId(1), 0),
                PushOutcome { victim: None },
            );
        }
        res.clear_from(2);
        assert_eq!(res.moves().count(), 2);
        assert_eq!(res.pushes().count(), 2);
        assert!(res.move_at(RecordKey::new(1, CopyId(0), 0)).is_some());
        assert!(res.move_at(RecordKey::new(2, CopyId(0), 0)).is_none());
    }

    #[test]
    fn forced_lookup_ignores_authored_moves() {
        let mut res = Resolutions::new();
        let authored = RecordKey::new(0, CopyId(0), 0);
        let forced = RecordKey::new(0, CopyId(1), 0);
        res.set_move(authored, resolution(None));
        res.set_move(forced, resolution(Some(CopyId(0))));
        assert!(res.forced_at(authored).is_none());
        assert_eq!(res.forced_at(forced).and_then(|m| m.forced_by), Some(CopyId(0)));
    }

    #[test]
    fn last_write_wins() {
        let mut res = Resolutions::new();
        let key = RecordKey::new(0, CopyId(0), 0);
        res.set_move(key, resolution(Some(CopyId(1))));
        res.set_move(key, resolution(Some(CopyId(2))));
        assert_eq!(res.forced_at(key).and_then(|m| m.forced_by), Some(CopyId(2)));
        assert_eq!(res.moves().count(), 1);
    }
}
