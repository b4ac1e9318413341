//! The authoritative action log: turns plus scalar cursors.

use crate::action::{ActionKind, ActionRecord};
use crate::error::TimelineError;
use crate::grid::Vec3;
use crate::id::{CopyId, PlayerId};
use crate::rules::Rules;
use crate::turn::Turn;

/// Scalar authoring cursors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursors {
    /// Turn being authored.
    pub current_turn: u32,
    /// Highest turn index ever reached. Never decreases.
    pub current_top_turn: u32,
    /// The authoring player.
    pub current_player: PlayerId,
    /// Highest allocated copy; the copy being authored.
    pub current_copy: CopyId,
    /// Budget left to `current_copy` in `current_turn`.
    pub action_points_left: u32,
    /// Consumable flashback charges.
    pub flashback_charges: u32,
}

/// Ordered turns of authored records and the cursors that go with them.
///
/// The timeline is mutated only through the action builder and the
/// flashback controller; loading replaces it wholesale.
///
/// # Examples
///
/// ```
/// use rewind_core::{CopyId, Rules, Timeline, Vec3};
///
/// let rules = Rules::default();
/// let timeline = Timeline::new(&rules, Vec3::new(3.0, -2.0, 0.0));
/// assert_eq!(timeline.turn_count(), 1);
/// assert_eq!(timeline.spawn_position(CopyId::ORIGINAL), Some(Vec3::ZERO));
/// assert_eq!(timeline.cursors().action_points_left, 100);
/// assert!(timeline.validate(&rules).is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    turns: Vec<Turn>,
    cursors: Cursors,
}

impl Timeline {
    /// A fresh log: turn 0 holding the original copy's spawn at the snapped
    /// `start` position.
    pub fn new(rules: &Rules, start: Vec3) -> Self {
        let first = Turn::from_records(vec![ActionRecord::spawn(
            PlayerId(0),
            CopyId::ORIGINAL,
            rules.grid().snap(start),
        )]);
        Self {
            turns: vec![first],
            cursors: Cursors {
                current_turn: 0,
                current_top_turn: 0,
                current_player: PlayerId(0),
                current_copy: CopyId::ORIGINAL,
                action_points_left: rules.ap_per_turn,
                flashback_charges: rules.initial_flashback_charges,
            },
        }
    }

    /// Assemble a log from decoded parts without checking it.
    ///
    /// Call [`validate`](Timeline::validate) before using the result.
    pub fn from_parts(turns: Vec<Turn>, cursors: Cursors) -> Self {
        Self { turns, cursors }
    }

    /// The cursors.
    pub fn cursors(&self) -> &Cursors {
        &self.cursors
    }

    /// Mutable access to the cursors.
    pub fn cursors_mut(&mut self) -> &mut Cursors {
        &mut self.cursors
    }

    /// All turns, oldest first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of turns in the log.
    pub fn turn_count(&self) -> u32 {
        self.turns.len() as u32
    }

    /// The turn at `index`.
    pub fn turn(&self, index: u32) -> Option<&Turn> {
        self.turns.get(index as usize)
    }

    /// Mutable access to the turn at `index`.
    pub fn turn_mut(&mut self, index: u32) -> Option<&mut Turn> {
        self.turns.get_mut(index as usize)
    }

    /// The turn at `index`, appending empty turns up to it if needed.
    pub fn ensure_turn(&mut self, index: u32) -> &mut Turn {
        let needed = index as usize + 1;
        if self.turns.len() < needed {
            self.turns.resize_with(needed, Turn::new);
        }
        &mut self.turns[index as usize]
    }

    /// Insert a record into turn `index`, attaching the turn to any error.
    pub fn insert(&mut self, index: u32, record: ActionRecord) -> Result<(), TimelineError> {
        self.ensure_turn(index).insert(record).map_err(|e| match e {
            TimelineError::Overlap { copy, ap_start, .. } => TimelineError::Overlap {
                turn: Some(index),
                copy,
                ap_start,
            },
            other => other,
        })
    }

    /// Every allocated copy, oldest first.
    pub fn copies(&self) -> impl Iterator<Item = CopyId> {
        (0..=self.cursors.current_copy.0).map(CopyId)
    }

    /// Turn in which `copy` spawns.
    pub fn spawn_turn(&self, copy: CopyId) -> Option<u32> {
        self.turns
            .iter()
            .position(|t| t.spawn_of(copy).is_some())
            .map(|i| i as u32)
    }

    /// Global offset at which `copy` spawns.
    pub fn spawn_offset(&self, rules: &Rules, copy: CopyId) -> Option<u32> {
        let turn = self.spawn_turn(copy)?;
        let local = self.turns[turn as usize].spawn_of(copy)?.ap_start;
        Some(rules.global_offset(turn, local))
    }

    /// Position at which `copy` spawns.
    pub fn spawn_position(&self, copy: CopyId) -> Option<Vec3> {
        self.turns.iter().find_map(|t| match t.spawn_of(copy)?.kind {
            ActionKind::Spawn { from } => Some(from),
            _ => None,
        })
    }

    /// Whether `copy` exists in turn `turn`.
    pub fn is_live(&self, copy: CopyId, turn: u32) -> bool {
        self.spawn_turn(copy).is_some_and(|s| s <= turn)
    }

    /// Global offset of the next action of the current copy.
    pub fn authoring_offset(&self, rules: &Rules) -> u32 {
        rules.global_offset(
            self.cursors.current_turn,
            rules.ap_per_turn - self.cursors.action_points_left,
        )
    }

    /// Global offset one past the last authored turn.
    pub fn end_offset(&self, rules: &Rules) -> u32 {
        self.turn_count() * rules.ap_per_turn
    }

    /// Check every structural invariant of a loaded log.
    pub fn validate(&self, rules: &Rules) -> Result<(), TimelineError> {
        if self.turns.is_empty() {
            return Err(TimelineError::NoTurns);
        }
        let c = &self.cursors;
        let turns = self.turn_count();
        check_cursor("current_turn", c.current_turn, turns)?;
        check_cursor("current_top_turn", c.current_top_turn, turns)?;
        check_cursor("current_turn", c.current_turn, c.current_top_turn + 1)?;
        check_cursor("action_points_left", c.action_points_left, rules.ap_per_turn + 1)?;

        let spawn_count = self
            .turns
            .iter()
            .flat_map(|t| t.records())
            .filter(|r| r.kind.is_spawn())
            .count();
        if c.current_copy.index() >= spawn_count {
            return Err(TimelineError::MissingSpawn {
                copy: CopyId(spawn_count as u32),
            });
        }
        let mut spawn_turns = vec![None; c.current_copy.index() + 1];
        for (t, turn) in self.turns.iter().enumerate() {
            for rec in turn.records().iter().filter(|r| r.kind.is_spawn()) {
                let slot = spawn_turns
                    .get_mut(rec.copy.index())
                    .ok_or(TimelineError::UnknownCopy { copy: rec.copy })?;
                if slot.is_some() {
                    return Err(TimelineError::DuplicateSpawn { copy: rec.copy });
                }
                *slot = Some(t as u32);
            }
        }
        if let Some(missing) = spawn_turns.iter().position(Option::is_none) {
            return Err(TimelineError::MissingSpawn {
                copy: CopyId(missing as u32),
            });
        }

        for (t, turn) in self.turns.iter().enumerate() {
            let t = t as u32;
            let mut checked = Turn::new();
            for rec in turn.records() {
                check_record(rules, t, rec)?;
                match spawn_turns.get(rec.copy.index()).copied().flatten() {
                    None => return Err(TimelineError::UnknownCopy { copy: rec.copy }),
                    Some(s) if s > t => {
                        return Err(TimelineError::RecordBeforeSpawn {
                            copy: rec.copy,
                            turn: t,
                        })
                    }
                    Some(_) => {}
                }
                checked.insert(*rec).map_err(|e| match e {
                    TimelineError::Overlap { copy, ap_start, .. } => TimelineError::Overlap {
                        turn: Some(t),
                        copy,
                        ap_start,
                    },
                    other => other,
                })?;
            }
        }

        let charged = self.turns[c.current_turn as usize].charged(c.current_copy, c.current_player);
        let expected = rules.ap_per_turn.saturating_sub(charged);
        if charged > rules.ap_per_turn || expected != c.action_points_left {
            return Err(TimelineError::BudgetMismatch {
                expected,
                found: c.action_points_left,
            });
        }
        Ok(())
    }
}

fn check_cursor(cursor: &'static str, value: u32, limit: u32) -> Result<(), TimelineError> {
    if value >= limit {
        return Err(TimelineError::CursorOutOfRange {
            cursor,
            value,
            limit,
        });
    }
    Ok(())
}

fn check_record(rules: &Rules, turn: u32, rec: &ActionRecord) -> Result<(), TimelineError> {
    let (copy, ap_start) = (rec.copy, rec.ap_start);
    let finite = match rec.kind {
        ActionKind::Spawn { from } => from.is_finite(),
        other => other.direction().is_none_or(Vec3::is_finite),
    };
    if !finite {
        return Err(TimelineError::NonFinite { turn, copy });
    }
    let cost_ok = match rec.kind {
        ActionKind::Spawn { .. } => rec.ap_cost == 0,
        ActionKind::Move { .. } => rec.ap_cost == rules.ap_per_move,
        _ => rec.ap_cost > 0,
    };
    if !cost_ok {
        return Err(TimelineError::InvalidCost {
            turn,
            copy,
            ap_start,
        });
    }
    if rec.ap_end() > rules.ap_per_turn || (rec.ap_cost == 0 && ap_start >= rules.ap_per_turn) {
        return Err(TimelineError::OutOfTurnBounds {
            turn,
            copy,
            ap_start,
            ap_cost: rec.ap_cost,
        });
    }
    let sliced = matches!(rec.kind, ActionKind::Move { .. } | ActionKind::Push { .. });
    if sliced && ap_start % rules.ap_per_move != 0 {
        return Err(TimelineError::Misaligned {
            turn,
            copy,
            ap_start,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(copy: u32, start: u32, dx: f32) -> ActionRecord {
        ActionRecord {
            player: PlayerId(0),
            copy: CopyId(copy),
            ap_start: start,
            ap_cost: 10,
            kind: ActionKind::Move {
                direction: Vec3::new(dx, 0.0, 0.0),
            },
        }
    }

    #[test]
    fn fresh_timeline_is_valid() {
        let rules = Rules::default();
        let tl = Timeline::new(&rules, Vec3::ZERO);
        assert_eq!(tl.validate(&rules), Ok(()));
        assert_eq!(tl.authoring_offset(&rules), 0);
        assert_eq!(tl.end_offset(&rules), 100);
        assert!(tl.is_live(CopyId(0), 0));
        assert!(!tl.is_live(CopyId(1), 5));
    }

    #[test]
    fn ensure_turn_grows_log() {
        let rules = Rules::default();
        let mut tl = Timeline::new(&rules, Vec3::ZERO);
        tl.ensure_turn(3);
        assert_eq!(tl.turn_count(), 4);
        assert!(tl.turn(3).is_some_and(Turn::is_empty));
    }

    #[test]
    fn insert_reports_turn_on_overlap() {
        let rules = Rules::default();
        let mut tl = Timeline::new(&rules, Vec3::ZERO);
        tl.insert(0, mv(0, 0, 10.0)).unwrap();
        assert_eq!(
            tl.insert(0, mv(0, 0, 10.0)),
            Err(TimelineError::Overlap {
                turn: Some(0),
                copy: CopyId(0),
                ap_start: 0
            })
        );
    }

    #[test]
    fn validate_detects_budget_mismatch() {
        let rules = Rules::default();
        let mut tl = Timeline::new(&rules, Vec3::ZERO);
        tl.insert(0, mv(0, 0, 10.0)).unwrap();
        assert_eq!(
            tl.validate(&rules),
            Err(TimelineError::BudgetMismatch {
                expected: 90,
                found: 100
            })
        );
        tl.cursors_mut().action_points_left = 90;
        assert_eq!(tl.validate(&rules), Ok(()));
    }

    #[test]
    fn validate_detects_missing_and_unknown_copies() {
        let rules = Rules::default();
        let mut tl = Timeline::new(&rules, Vec3::ZERO);
        tl.cursors_mut().current_copy = CopyId(1);
        assert_eq!(
            tl.validate(&rules),
            Err(TimelineError::MissingSpawn { copy: CopyId(1) })
        );

        let mut tl = Timeline::new(&rules, Vec3::ZERO);
        tl.insert(0, mv(4, 0, 10.0)).unwrap();
        assert_eq!(
            tl.validate(&rules),
            Err(TimelineError::UnknownCopy { copy: CopyId(4) })
        );
    }

    #[test]
    fn validate_detects_record_before_spawn() {
        let rules = Rules::default();
        let mut tl = Timeline::new(&rules, Vec3::ZERO);
        tl.insert(0, mv(1, 0, 10.0)).unwrap();
        tl.insert(1, ActionRecord::spawn(PlayerId(0), CopyId(1), Vec3::ZERO))
            .unwrap();
        tl.cursors_mut().current_copy = CopyId(1);
        tl.cursors_mut().current_top_turn = 1;
        assert_eq!(
            tl.validate(&rules),
            Err(TimelineError::RecordBeforeSpawn {
                copy: CopyId(1),
                turn: 0
            })
        );
    }

    #[test]
    fn validate_detects_misaligned_and_out_of_bounds() {
        let rules = Rules::default();
        let mut tl = Timeline::new(&rules, Vec3::ZERO);
        tl.insert(0, mv(0, 5, 10.0)).unwrap();
        assert!(matches!(
            tl.validate(&rules),
            Err(TimelineError::Misaligned { ap_start: 5, .. })
        ));

        let mut tl = Timeline::new(&rules, Vec3::ZERO);
        tl.insert(0, mv(0, 95, 10.0)).unwrap();
        assert!(matches!(
            tl.validate(&rules),
            Err(TimelineError::OutOfTurnBounds { .. })
        ));
    }

    #[test]
    fn validate_rejects_cursor_past_log() {
        let rules = Rules::default();
        let mut tl = Timeline::new(&rules, Vec3::ZERO);
        tl.cursors_mut().current_top_turn = 2;
        assert!(matches!(
            tl.validate(&rules),
            Err(TimelineError::CursorOutOfRange {
                cursor: "current_top_turn",
                ..
            })
        ));
    }
}
