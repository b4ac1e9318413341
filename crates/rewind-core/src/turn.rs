//! One turn of the action log.

use std::ops::Range;

use crate::action::ActionRecord;
use crate::error::TimelineError;
use crate::id::{CopyId, PlayerId};

/// The records authored for one turn index.
///
/// Insertion order carries no meaning for playback, but it is preserved:
/// the conflict resolver enumerates pushes in authoring order. Duration
/// records of one copy never overlap, so `(copy, ap_start)` identifies a
/// duration record uniquely; each copy has at most one spawn.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Turn {
    records: Vec<ActionRecord>,
}

impl Turn {
    /// An empty turn.
    pub fn new() -> Self {
        Self::default()
    }

    /// A turn holding `records` as given, without overlap checks.
    ///
    /// Used when decoding; [`Timeline::validate`](crate::Timeline::validate)
    /// checks the result.
    pub fn from_records(records: Vec<ActionRecord>) -> Self {
        Self { records }
    }

    /// All records, in authoring order.
    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the turn holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record, rejecting overlaps and duplicate spawns.
    ///
    /// The turn index is not known here, so errors carry `turn: None`;
    /// callers that know it should attach it.
    pub fn insert(&mut self, record: ActionRecord) -> Result<(), TimelineError> {
        if record.kind.is_spawn() {
            if self.spawn_of(record.copy).is_some() {
                return Err(TimelineError::DuplicateSpawn { copy: record.copy });
            }
        } else if self.overlaps_range(record.copy, &record.interval()) {
            return Err(TimelineError::Overlap {
                turn: None,
                copy: record.copy,
                ap_start: record.ap_start,
            });
        }
        self.records.push(record);
        Ok(())
    }

    /// Records belonging to one copy.
    pub fn records_of(&self, copy: CopyId) -> impl Iterator<Item = &ActionRecord> + '_ {
        self.records.iter().filter(move |r| r.copy == copy)
    }

    /// The duration record of `copy` active at `local`.
    pub fn record_at(&self, copy: CopyId, local: u32) -> Option<&ActionRecord> {
        self.records
            .iter()
            .find(|r| r.copy == copy && r.contains(local))
    }

    /// The spawn record of `copy`, if it spawns in this turn.
    pub fn spawn_of(&self, copy: CopyId) -> Option<&ActionRecord> {
        self.records
            .iter()
            .find(|r| r.copy == copy && r.kind.is_spawn())
    }

    /// Spawn records acting at exactly `local`.
    pub fn spawns_at(&self, local: u32) -> impl Iterator<Item = &ActionRecord> + '_ {
        self.records
            .iter()
            .filter(move |r| r.kind.is_spawn() && r.ap_start == local)
    }

    /// Action points charged to `(copy, player)` in this turn.
    pub fn charged(&self, copy: CopyId, player: PlayerId) -> u32 {
        self.records
            .iter()
            .filter(|r| r.copy == copy && r.player == player)
            .map(|r| r.ap_cost)
            .sum()
    }

    /// Whether any duration record of `copy` intersects `range`.
    pub fn overlaps_range(&self, copy: CopyId, range: &Range<u32>) -> bool {
        self.records
            .iter()
            .any(|r| r.copy == copy && r.overlaps(range))
    }

    /// Remove every non-spawn record of `(copy, player)`; returns how many
    /// were removed.
    pub fn remove_authored(&mut self, copy: CopyId, player: PlayerId) -> usize {
        let before = self.records.len();
        self.records
            .retain(|r| !(r.copy == copy && r.player == player && !r.kind.is_spawn()));
        before - self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use crate::grid::Vec3;

    fn record(copy: u32, start: u32, cost: u32, kind: ActionKind) -> ActionRecord {
        ActionRecord {
            player: PlayerId(0),
            copy: CopyId(copy),
            ap_start: start,
            ap_cost: cost,
            kind,
        }
    }

    #[test]
    fn rejects_overlap_for_same_copy_only() {
        let mut turn = Turn::new();
        turn.insert(record(0, 0, 20, ActionKind::Empty)).unwrap();
        let err = turn.insert(record(0, 10, 10, ActionKind::Empty)).unwrap_err();
        assert!(matches!(err, TimelineError::Overlap { turn: None, .. }));
        turn.insert(record(1, 10, 10, ActionKind::Empty)).unwrap();
        turn.insert(record(0, 20, 10, ActionKind::Empty)).unwrap();
        assert_eq!(turn.len(), 3);
    }

    #[test]
    fn rejects_second_spawn() {
        let mut turn = Turn::new();
        turn.insert(ActionRecord::spawn(PlayerId(0), CopyId(2), Vec3::ZERO))
            .unwrap();
        assert_eq!(
            turn.insert(ActionRecord::spawn(PlayerId(0), CopyId(2), Vec3::ZERO)),
            Err(TimelineError::DuplicateSpawn { copy: CopyId(2) })
        );
    }

    #[test]
    fn lookup_and_charge() {
        let mut turn = Turn::new();
        let dir = Vec3::new(10.0, 0.0, 0.0);
        turn.insert(ActionRecord::spawn(PlayerId(0), CopyId(0), Vec3::ZERO))
            .unwrap();
        turn.insert(record(0, 0, 10, ActionKind::Move { direction: dir }))
            .unwrap();
        turn.insert(record(0, 10, 10, ActionKind::Attack { direction: dir }))
            .unwrap();
        assert_eq!(turn.charged(CopyId(0), PlayerId(0)), 20);
        assert_eq!(turn.record_at(CopyId(0), 15).map(|r| r.ap_start), Some(10));
        assert!(turn.record_at(CopyId(0), 20).is_none());
        assert_eq!(turn.spawns_at(0).count(), 1);
    }

    #[test]
    fn remove_authored_keeps_spawn() {
        let mut turn = Turn::new();
        turn.insert(ActionRecord::spawn(PlayerId(0), CopyId(0), Vec3::ZERO))
            .unwrap();
        turn.insert(record(0, 0, 10, ActionKind::Empty)).unwrap();
        turn.insert(record(1, 0, 10, ActionKind::Empty)).unwrap();
        assert_eq!(turn.remove_authored(CopyId(0), PlayerId(0)), 1);
        assert!(turn.spawn_of(CopyId(0)).is_some());
        assert_eq!(turn.len(), 2);
    }
}
