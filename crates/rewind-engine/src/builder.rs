//! Appending authored records to the current turn.
//!
//! Every method here either leaves the log untouched and returns an error,
//! or mutates it and re-resolves from the current turn before returning.

use std::ops::Range;

use rewind_core::{ActionClass, ActionKind, ActionRecord, CopyId, TimelineError, Turn, Vec3};
use rewind_sim::ResolveReport;
use tracing::{debug, info};

use crate::error::BuildError;
use crate::world::TimelineWorld;

impl TimelineWorld {
    // ── Authoring ──────────────────────────────────────────────────

    /// Append a spawn for `copy` at the start of the current turn and
    /// re-resolve from there. Charges nothing.
    ///
    /// The copy must already be allocated and not yet spawned;
    /// [`TimelineWorld::flashback`] allocates a copy and then spawns it here.
    pub fn spawn(&mut self, copy: CopyId, position: Vec3) -> Result<ResolveReport, BuildError> {
        if !position.is_finite() {
            return Err(BuildError::NonFiniteTarget { target: position });
        }
        if copy > self.current_copy() {
            return Err(TimelineError::UnknownCopy { copy }.into());
        }
        if self.timeline.spawn_turn(copy).is_some() {
            return Err(TimelineError::DuplicateSpawn { copy }.into());
        }
        let c = *self.cursors();
        let record = ActionRecord::spawn(c.current_player, copy, self.rules.grid().snap(position));
        self.timeline.insert(c.current_turn, record)?;
        let report = self.resolve_from(c.current_turn);
        debug!(copy = copy.0, turn = c.current_turn, "copy spawned");
        Ok(report)
    }

    /// Move `copy` toward `target`, measured from its last known position.
    ///
    /// The displacement is the snapped target minus where the copy stands
    /// at the authoring offset; it is not limited to one cell.
    pub fn move_to(&mut self, copy: CopyId, target: Vec3) -> Result<(), BuildError> {
        let from = self.acting_position(copy, target)?;
        let direction = self.rules.grid().snap(target) - from;
        self.author(copy, ActionClass::Move, ActionKind::Move { direction })
    }

    /// Face `target` and strike; no position change.
    pub fn attack(&mut self, copy: CopyId, target: Vec3) -> Result<(), BuildError> {
        let from = self.acting_position(copy, target)?;
        let direction = (target - from).normalized();
        self.author(copy, ActionClass::Attack, ActionKind::Attack { direction })
    }

    /// Shove whichever copy stands one cell toward `target`.
    pub fn push(&mut self, copy: CopyId, target: Vec3) -> Result<(), BuildError> {
        let from = self.acting_position(copy, target)?;
        let direction = target - from;
        self.author(copy, ActionClass::Push, ActionKind::Push { direction })
    }

    /// Append an idle filler.
    ///
    /// For the current copy the filler starts at the authoring offset and
    /// is charged to the budget; `ap_start` is ignored. For any other live
    /// copy it starts at `ap_start` and charges nothing.
    pub fn empty(&mut self, copy: CopyId, ap_start: u32, ap_cost: u32) -> Result<(), BuildError> {
        let c = *self.cursors();
        if !self.timeline.is_live(copy, c.current_turn) {
            return Err(BuildError::NotLive {
                copy,
                turn: c.current_turn,
            });
        }
        let charged = copy == c.current_copy;
        let start = if charged {
            self.rules.ap_per_turn - c.action_points_left
        } else {
            ap_start
        };
        if charged && ap_cost > c.action_points_left {
            return Err(BuildError::InsufficientActionPoints {
                requested: ap_cost,
                available: c.action_points_left,
            });
        }
        let past_end = start
            .checked_add(ap_cost)
            .is_none_or(|end| end > self.rules.ap_per_turn);
        if ap_cost == 0 || past_end {
            return Err(TimelineError::OutOfTurnBounds {
                turn: c.current_turn,
                copy,
                ap_start: start,
                ap_cost,
            }
            .into());
        }
        let record = ActionRecord {
            player: c.current_player,
            copy,
            ap_start: start,
            ap_cost,
            kind: ActionKind::Empty,
        };
        self.timeline.insert(c.current_turn, record)?;
        if charged {
            self.timeline.cursors_mut().action_points_left -= ap_cost;
        }
        self.resolve_from(c.current_turn);
        Ok(())
    }

    /// Close out the current turn.
    ///
    /// The current copy's remaining budget becomes one `Empty`; every other
    /// live copy has its uncovered slices padded. Idempotent.
    pub fn finalize_turn(&mut self) -> Result<(), BuildError> {
        let turn = self.cursors().current_turn;
        self.finalize_current(turn)?;
        self.pad_others(turn)?;
        self.resolve_from(turn);
        Ok(())
    }

    /// Finalize, then step the authoring cursor to the next turn.
    ///
    /// Reaching a new top turn that is a multiple of
    /// `turns_per_flashback` earns one flashback charge.
    pub fn next_turn(&mut self) -> Result<(), BuildError> {
        let turn = self.cursors().current_turn;
        self.finalize_current(turn)?;
        self.pad_others(turn)?;

        let next = turn + 1;
        self.timeline.ensure_turn(next);
        let ap_per_turn = self.rules.ap_per_turn;
        let turns_per_flashback = self.rules.turns_per_flashback;
        let c = self.timeline.cursors_mut();
        c.current_turn = next;
        c.action_points_left = ap_per_turn;
        if next > c.current_top_turn {
            c.current_top_turn = next;
            if next % turns_per_flashback == 0 {
                c.flashback_charges += 1;
            }
        }
        let charges = c.flashback_charges;

        self.pad_others(next)?;
        self.resolve_from(turn);
        info!(turn = next, charges, "turn advanced");
        Ok(())
    }

    /// Drop everything the current copy authored this turn and refund the
    /// budget. Other copies' records and every spawn stay.
    pub fn reset_turn(&mut self, copy: CopyId) -> Result<(), BuildError> {
        let c = *self.cursors();
        if copy != c.current_copy {
            return Err(BuildError::NotCurrentCopy {
                copy,
                current: c.current_copy,
            });
        }
        let removed = self
            .timeline
            .ensure_turn(c.current_turn)
            .remove_authored(copy, c.current_player);
        self.timeline.cursors_mut().action_points_left = self.rules.ap_per_turn;
        self.resolve_from(c.current_turn);
        debug!(copy = copy.0, turn = c.current_turn, removed, "turn reset");
        Ok(())
    }

    // ── Internals ──────────────────────────────────────────────────

    /// Where a budgeted action by `copy` starts from, after checking the
    /// copy may act and the target is usable.
    fn acting_position(&self, copy: CopyId, target: Vec3) -> Result<Vec3, BuildError> {
        if !target.is_finite() {
            return Err(BuildError::NonFiniteTarget { target });
        }
        let c = self.cursors();
        if copy != c.current_copy {
            return Err(BuildError::NotCurrentCopy {
                copy,
                current: c.current_copy,
            });
        }
        if !self.timeline.is_live(copy, c.current_turn) {
            return Err(BuildError::NotLive {
                copy,
                turn: c.current_turn,
            });
        }
        self.last_known_position(copy).ok_or(BuildError::NotLive {
            copy,
            turn: c.current_turn,
        })
    }

    /// Charge and append one budgeted record for the current copy.
    fn author(
        &mut self,
        copy: CopyId,
        class: ActionClass,
        kind: ActionKind,
    ) -> Result<(), BuildError> {
        let c = *self.cursors();
        let cost = self.rules.cost_of(class);
        if cost > c.action_points_left {
            return Err(BuildError::InsufficientActionPoints {
                requested: cost,
                available: c.action_points_left,
            });
        }
        let ap_start = self.rules.ap_per_turn - c.action_points_left;
        let aligned = ap_start % self.rules.slice_width() == 0;
        if !aligned && matches!(class, ActionClass::Move | ActionClass::Push) {
            return Err(TimelineError::Misaligned {
                turn: c.current_turn,
                copy,
                ap_start,
            }
            .into());
        }
        let record = ActionRecord {
            player: c.current_player,
            copy,
            ap_start,
            ap_cost: cost,
            kind,
        };
        self.timeline.insert(c.current_turn, record)?;
        self.timeline.cursors_mut().action_points_left -= cost;
        self.resolve_from(c.current_turn);
        Ok(())
    }

    fn finalize_current(&mut self, turn: u32) -> Result<(), BuildError> {
        let c = *self.cursors();
        if c.action_points_left == 0 {
            return Ok(());
        }
        let record = ActionRecord {
            player: c.current_player,
            copy: c.current_copy,
            ap_start: self.rules.ap_per_turn - c.action_points_left,
            ap_cost: c.action_points_left,
            kind: ActionKind::Empty,
        };
        self.timeline.insert(turn, record)?;
        self.timeline.cursors_mut().action_points_left = 0;
        Ok(())
    }

    /// Fill every uncovered slice of each live copy other than the current
    /// one with `Empty`.
    fn pad_others(&mut self, turn: u32) -> Result<(), BuildError> {
        let c = *self.cursors();
        let width = self.rules.slice_width();
        let ap_per_turn = self.rules.ap_per_turn;
        let live: Vec<CopyId> = self
            .timeline
            .copies()
            .filter(|&copy| copy != c.current_copy && self.timeline.is_live(copy, turn))
            .collect();
        for copy in live {
            let gaps = uncovered(self.timeline.ensure_turn(turn), copy, ap_per_turn, width);
            for gap in gaps {
                self.timeline.insert(
                    turn,
                    ActionRecord {
                        player: c.current_player,
                        copy,
                        ap_start: gap.start,
                        ap_cost: gap.end - gap.start,
                        kind: ActionKind::Empty,
                    },
                )?;
            }
        }
        Ok(())
    }
}

/// Sub-ranges of `[0, ap_per_turn)` no duration record of `copy` covers,
/// split at slice boundaries.
fn uncovered(turn: &Turn, copy: CopyId, ap_per_turn: u32, width: u32) -> Vec<Range<u32>> {
    let mut covered: Vec<Range<u32>> = turn
        .records_of(copy)
        .filter(|r| r.ap_cost > 0)
        .map(ActionRecord::interval)
        .collect();
    covered.sort_by_key(|r| r.start);

    let mut gaps = Vec::new();
    let mut push_gap = |from: u32, to: u32| {
        let mut start = from;
        while start < to {
            let boundary = (start / width + 1) * width;
            let end = boundary.min(to);
            gaps.push(start..end);
            start = end;
        }
    };
    let mut cursor = 0;
    for r in covered {
        if r.start > cursor {
            push_gap(cursor, r.start);
        }
        cursor = cursor.max(r.end);
    }
    push_gap(cursor, ap_per_turn);
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use rewind_core::{PlayerId, Rules};
    use rewind_sim::RecordKey;

    fn world() -> TimelineWorld {
        TimelineWorld::new(Rules::default(), Vec3::ZERO).unwrap()
    }

    fn total_cost(world: &TimelineWorld, turn: u32, copy: CopyId) -> u32 {
        world
            .timeline()
            .turn(turn)
            .unwrap()
            .records_of(copy)
            .map(|r| r.ap_cost)
            .sum()
    }

    #[test]
    fn move_charges_and_starts_at_budget_offset() {
        let mut w = world();
        w.move_to(CopyId(0), Vec3::new(10.0, 0.0, 0.0)).unwrap();
        w.move_to(CopyId(0), Vec3::new(10.0, 10.0, 0.0)).unwrap();
        assert_eq!(w.cursors().action_points_left, 80);
        let starts: Vec<u32> = w
            .timeline()
            .turn(0)
            .unwrap()
            .records_of(CopyId(0))
            .filter(|r| !r.kind.is_spawn())
            .map(|r| r.ap_start)
            .collect();
        assert_eq!(starts, vec![0, 10]);
    }

    #[test]
    fn move_direction_is_snapped_relative_to_last_position() {
        let mut w = world();
        w.move_to(CopyId(0), Vec3::new(13.0, -2.0, 0.0)).unwrap();
        let rec = w.timeline().turn(0).unwrap().record_at(CopyId(0), 0).unwrap();
        assert_eq!(
            rec.kind,
            ActionKind::Move {
                direction: Vec3::new(10.0, 0.0, 0.0)
            }
        );
    }

    #[test]
    fn attack_direction_is_unit_and_push_is_raw() {
        let mut w = world();
        w.attack(CopyId(0), Vec3::new(0.0, 30.0, 0.0)).unwrap();
        w.push(CopyId(0), Vec3::new(10.0, 0.0, 0.0)).unwrap();
        let turn = w.timeline().turn(0).unwrap();
        assert_eq!(
            turn.record_at(CopyId(0), 0).unwrap().kind,
            ActionKind::Attack {
                direction: Vec3::new(0.0, 1.0, 0.0)
            }
        );
        assert_eq!(
            turn.record_at(CopyId(0), 10).unwrap().kind,
            ActionKind::Push {
                direction: Vec3::new(10.0, 0.0, 0.0)
            }
        );
    }

    #[test]
    fn over_budget_is_rejected_without_mutation() {
        let mut w = world();
        for i in 1..=10 {
            w.move_to(CopyId(0), Vec3::new(10.0 * i as f32, 0.0, 0.0))
                .unwrap();
        }
        let before = w.timeline().clone();
        let err = w.move_to(CopyId(0), Vec3::new(110.0, 0.0, 0.0)).unwrap_err();
        assert_eq!(
            err,
            BuildError::InsufficientActionPoints {
                requested: 10,
                available: 0
            }
        );
        assert_eq!(w.timeline(), &before);
    }

    #[test]
    fn only_current_copy_authors() {
        let mut w = world();
        assert_eq!(
            w.move_to(CopyId(1), Vec3::ZERO),
            Err(BuildError::NotCurrentCopy {
                copy: CopyId(1),
                current: CopyId(0)
            })
        );
    }

    #[test]
    fn non_finite_target_is_rejected() {
        let mut w = world();
        assert!(matches!(
            w.move_to(CopyId(0), Vec3::new(f32::NAN, 0.0, 0.0)),
            Err(BuildError::NonFiniteTarget { .. })
        ));
    }

    #[test]
    fn misaligned_move_is_rejected() {
        let mut w = world();
        w.empty(CopyId(0), 0, 5).unwrap();
        assert!(matches!(
            w.move_to(CopyId(0), Vec3::new(10.0, 0.0, 0.0)),
            Err(BuildError::Timeline(TimelineError::Misaligned { ap_start: 5, .. }))
        ));
    }

    #[test]
    fn empty_for_current_copy_uses_budget_offset() {
        let mut w = world();
        w.move_to(CopyId(0), Vec3::new(10.0, 0.0, 0.0)).unwrap();
        w.empty(CopyId(0), 70, 20).unwrap();
        let rec = w.timeline().turn(0).unwrap().record_at(CopyId(0), 10).unwrap();
        assert_eq!(rec.kind, ActionKind::Empty);
        assert_eq!(rec.interval(), 10..30);
        assert_eq!(w.cursors().action_points_left, 70);
    }

    #[test]
    fn finalize_fills_remainder_once() {
        let mut w = world();
        w.move_to(CopyId(0), Vec3::new(10.0, 0.0, 0.0)).unwrap();
        w.finalize_turn().unwrap();
        w.finalize_turn().unwrap();
        assert_eq!(w.cursors().action_points_left, 0);
        assert_eq!(total_cost(&w, 0, CopyId(0)), 100);
        assert_eq!(w.timeline().validate(w.rules()), Ok(()));
    }

    #[test]
    fn next_turn_earns_charge_on_multiple() {
        let mut w = world();
        for _ in 0..3 {
            w.next_turn().unwrap();
        }
        assert_eq!(w.cursors().current_turn, 3);
        assert_eq!(w.cursors().current_top_turn, 3);
        assert_eq!(w.cursors().flashback_charges, 1);
        assert_eq!(w.cursors().action_points_left, 100);
        assert_eq!(w.timeline().turn_count(), 4);
    }

    #[test]
    fn reset_turn_refunds_and_keeps_spawn() {
        let mut w = world();
        w.move_to(CopyId(0), Vec3::new(10.0, 0.0, 0.0)).unwrap();
        w.attack(CopyId(0), Vec3::new(20.0, 0.0, 0.0)).unwrap();
        w.reset_turn(CopyId(0)).unwrap();
        assert_eq!(w.cursors().action_points_left, 100);
        let turn = w.timeline().turn(0).unwrap();
        assert_eq!(turn.len(), 1);
        assert!(turn.spawn_of(CopyId(0)).is_some());
    }

    #[test]
    fn spawn_rejects_duplicates_and_unknown_copies() {
        let mut w = world();
        assert!(matches!(
            w.spawn(CopyId(0), Vec3::ZERO),
            Err(BuildError::Timeline(TimelineError::DuplicateSpawn { .. }))
        ));
        assert!(matches!(
            w.spawn(CopyId(4), Vec3::ZERO),
            Err(BuildError::Timeline(TimelineError::UnknownCopy { .. }))
        ));
    }

    #[test]
    fn spawn_places_an_allocated_copy_and_resolves() {
        let mut w = world();
        w.move_to(CopyId(0), Vec3::new(10.0, 0.0, 0.0)).unwrap();
        w.timeline.cursors_mut().current_copy = CopyId(1);

        let report = w.spawn(CopyId(1), Vec3::new(21.0, 0.0, 0.0)).unwrap();
        assert_eq!(report.turns, 1);
        assert_eq!(report.slices, 10);
        assert_eq!(
            w.timeline().spawn_position(CopyId(1)),
            Some(Vec3::new(20.0, 0.0, 0.0))
        );
        assert_eq!(w.cursors().action_points_left, 90);
        assert!(w
            .resolutions()
            .move_at(RecordKey::new(0, CopyId(0), 0))
            .is_some());
        assert_eq!(
            w.snapshot_at(0).get(CopyId(1)).unwrap().position,
            Vec3::new(20.0, 0.0, 0.0)
        );
        assert!(matches!(
            w.spawn(CopyId(1), Vec3::ZERO),
            Err(BuildError::Timeline(TimelineError::DuplicateSpawn { .. }))
        ));
    }

    #[test]
    fn uncovered_splits_at_slice_boundaries() {
        let turn = Turn::from_records(vec![
            ActionRecord::spawn(PlayerId(0), CopyId(0), Vec3::ZERO),
            ActionRecord {
                player: PlayerId(0),
                copy: CopyId(0),
                ap_start: 5,
                ap_cost: 10,
                kind: ActionKind::Empty,
            },
        ]);
        assert_eq!(
            uncovered(&turn, CopyId(0), 40, 10),
            vec![0..5, 15..20, 20..30, 30..40]
        );
        assert_eq!(uncovered(&turn, CopyId(1), 20, 10), vec![0..10, 10..20]);
    }
}
