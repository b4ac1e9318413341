//! Timeline playback.
//!
//! A [`Replay`] walks the log forward one action point at a time. Each
//! step has two phases:
//!
//! 1. **Instant phase**: zero-cost spawns acting at the step place their
//!    copy.
//! 2. **Duration phase**: every spawned copy applies the record whose
//!    interval contains the step (or the forced move shadowing it).
//!
//! The state "at offset `t`" is every step before `t` fully applied, plus
//! the instant phase of step `t`. A copy is therefore visible at its own
//! spawn offset, and a move spanning `[s, s + cost)` reaches its target at
//! offset `s + cost`.
//!
//! [`position_at`] and [`snapshot_at`] always replay from offset 0 and
//! keep nothing between calls. A [`Replay`] may be held and advanced
//! incrementally (the resolver and trail sampler do this), but it is
//! only valid for the log it was advanced against.

use rewind_core::{ActionKind, CopyId, Rules, Timeline, Vec3};
use tracing::trace;

use crate::overlay::{RecordKey, Resolutions};
use crate::snapshot::{CopyState, WorldSnapshot};

/// Read-only view of everything playback depends on.
#[derive(Clone, Copy, Debug)]
pub struct LogView<'a> {
    /// Game rules.
    pub rules: &'a Rules,
    /// The authored log.
    pub timeline: &'a Timeline,
    /// Resolved flags for the log.
    pub resolutions: &'a Resolutions,
}

impl<'a> LogView<'a> {
    /// Bundle the three inputs of playback.
    pub fn new(rules: &'a Rules, timeline: &'a Timeline, resolutions: &'a Resolutions) -> Self {
        Self {
            rules,
            timeline,
            resolutions,
        }
    }
}

/// An incremental playback cursor.
#[derive(Clone, Debug, Default)]
pub struct Replay {
    step: u32,
    instants_done: bool,
    states: Vec<CopyState>,
    // Position of each copy when its current move began; used when a move
    // has no stored resolution yet.
    origins: Vec<Vec3>,
}

impl Replay {
    /// A cursor at offset 0 with nothing applied.
    pub fn new() -> Self {
        Self::default()
    }

    /// The offset the states currently describe.
    pub fn offset(&self) -> u32 {
        self.step
    }

    /// All copy states, indexed by copy id.
    pub fn states(&self) -> &[CopyState] {
        &self.states
    }

    /// State of one copy.
    pub fn state(&self, copy: CopyId) -> Option<&CopyState> {
        self.states.get(copy.index())
    }

    /// Copy the current states into a snapshot.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::new(self.step, self.states.clone())
    }

    /// Advance to `offset`, restarting from 0 if it lies behind the cursor.
    pub fn advance_to(&mut self, view: LogView<'_>, offset: u32) {
        if offset < self.step {
            *self = Self::new();
        }
        let copies = view.timeline.copies().count();
        if self.states.len() < copies {
            self.states.resize(copies, CopyState::default());
            self.origins.resize(copies, Vec3::ZERO);
        }
        while self.step < offset {
            if !self.instants_done {
                self.apply_instants(view);
            }
            self.apply_durations(view);
            self.step += 1;
            self.instants_done = false;
        }
        if !self.instants_done {
            self.apply_instants(view);
            self.instants_done = true;
        }
    }

    fn apply_instants(&mut self, view: LogView<'_>) {
        let rules = view.rules;
        let Some(turn) = view.timeline.turn(rules.turn_of(self.step)) else {
            return;
        };
        for rec in turn.spawns_at(rules.local_offset(self.step)) {
            let ActionKind::Spawn { from } = rec.kind else {
                continue;
            };
            if let Some(state) = self.states.get_mut(rec.copy.index()) {
                state.position = from;
                state.spawned = true;
                state.visible = true;
                state.action_indicator = false;
            }
        }
    }

    fn apply_durations(&mut self, view: LogView<'_>) {
        let rules = view.rules;
        let turn_index = rules.turn_of(self.step);
        let local = rules.local_offset(self.step);
        let slice_start = rules.slice_start(local);
        let turn = view.timeline.turn(turn_index);

        for (i, state) in self.states.iter_mut().enumerate() {
            if !state.spawned {
                continue;
            }
            let copy = CopyId(i as u32);
            state.action_indicator = false;

            let slot = RecordKey::new(turn_index, copy, slice_start);
            if let Some(forced) = view.resolutions.forced_at(slot) {
                if local == slice_start {
                    self.origins[i] = state.position;
                }
                state.visible = true;
                if !forced.canceled {
                    let t = (local - slice_start + 1) as f32 / rules.ap_per_move as f32;
                    state.position = Vec3::lerp(forced.target - forced.direction, forced.target, t);
                }
                continue;
            }

            let Some(rec) = turn.and_then(|t| t.record_at(copy, local)) else {
                if state.visible {
                    trace!(copy = %copy, offset = self.step, "no record; copy not visible");
                }
                state.visible = false;
                continue;
            };
            state.visible = true;
            match rec.kind {
                ActionKind::Move { direction } => {
                    if local == rec.ap_start {
                        self.origins[i] = state.position;
                    }
                    let key = RecordKey::new(turn_index, copy, rec.ap_start);
                    let (target, canceled) = match view.resolutions.move_at(key) {
                        Some(m) if !m.is_forced() => (m.target, m.canceled),
                        _ => (self.origins[i] + direction, false),
                    };
                    if !canceled {
                        let t = (local - rec.ap_start + 1) as f32 / rec.ap_cost as f32;
                        state.position = Vec3::lerp(target - direction, target, t);
                    }
                }
                ActionKind::Attack { direction } | ActionKind::Push { direction } => {
                    state.orientation = direction.normalized();
                    state.action_indicator = true;
                }
                ActionKind::Empty | ActionKind::Spawn { .. } => {}
            }
        }
    }
}

/// Replay from offset 0 and return every copy's state at `offset`.
///
/// # Examples
///
/// ```
/// use rewind_core::{CopyId, Rules, Timeline, Vec3};
/// use rewind_sim::{snapshot_at, LogView, Resolutions};
///
/// let rules = Rules::default();
/// let timeline = Timeline::new(&rules, Vec3::new(20.0, 0.0, 0.0));
/// let resolutions = Resolutions::new();
/// let view = LogView::new(&rules, &timeline, &resolutions);
///
/// let snap = snapshot_at(view, 0);
/// let original = snap.get(CopyId::ORIGINAL).unwrap();
/// assert!(original.visible);
/// assert_eq!(original.position, Vec3::new(20.0, 0.0, 0.0));
/// ```
pub fn snapshot_at(view: LogView<'_>, offset: u32) -> WorldSnapshot {
    let mut replay = Replay::new();
    replay.advance_to(view, offset);
    replay.snapshot()
}

/// Replay from offset 0 and return one copy's state at `offset`.
///
/// `None` when `copy` is not allocated in the log.
pub fn position_at(view: LogView<'_>, copy: CopyId, offset: u32) -> Option<CopyState> {
    let mut replay = Replay::new();
    replay.advance_to(view, offset);
    replay.state(copy).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rewind_core::{ActionRecord, PlayerId};

    fn record(copy: u32, start: u32, kind: ActionKind) -> ActionRecord {
        ActionRecord {
            player: PlayerId(0),
            copy: CopyId(copy),
            ap_start: start,
            ap_cost: 10,
            kind,
        }
    }

    fn two_moves() -> (Rules, Timeline) {
        let rules = Rules::default();
        let mut tl = Timeline::new(&rules, Vec3::ZERO);
        tl.insert(
            0,
            record(0, 0, ActionKind::Move {
                direction: Vec3::new(10.0, 0.0, 0.0),
            }),
        )
        .unwrap();
        tl.insert(
            0,
            record(0, 10, ActionKind::Move {
                direction: Vec3::new(0.0, 10.0, 0.0),
            }),
        )
        .unwrap();
        (rules, tl)
    }

    #[test]
    fn moves_interpolate_without_resolutions() {
        let (rules, tl) = two_moves();
        let res = Resolutions::new();
        let view = LogView::new(&rules, &tl, &res);
        let at = |t| position_at(view, CopyId(0), t).unwrap().position;
        assert_eq!(at(0), Vec3::ZERO);
        assert_eq!(at(5), Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(at(10), Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(at(15), Vec3::new(10.0, 5.0, 0.0));
        assert_eq!(at(20), Vec3::new(10.0, 10.0, 0.0));
    }

    #[test]
    fn unknown_copy_has_no_state() {
        let (rules, tl) = two_moves();
        let res = Resolutions::new();
        let view = LogView::new(&rules, &tl, &res);
        assert!(position_at(view, CopyId(3), 5).is_none());
    }

    #[test]
    fn copy_without_record_is_hidden() {
        let (rules, tl) = two_moves();
        let res = Resolutions::new();
        let view = LogView::new(&rules, &tl, &res);
        assert!(position_at(view, CopyId(0), 20).unwrap().visible);
        let after = position_at(view, CopyId(0), 21).unwrap();
        assert!(!after.visible);
        assert_eq!(after.position, Vec3::new(10.0, 10.0, 0.0));
    }

    #[test]
    fn attack_sets_orientation_and_indicator() {
        let rules = Rules::default();
        let mut tl = Timeline::new(&rules, Vec3::ZERO);
        tl.insert(
            0,
            record(0, 0, ActionKind::Attack {
                direction: Vec3::new(0.0, -1.0, 0.0),
            }),
        )
        .unwrap();
        tl.insert(0, record(0, 10, ActionKind::Empty)).unwrap();
        let res = Resolutions::new();
        let view = LogView::new(&rules, &tl, &res);
        let during = position_at(view, CopyId(0), 5).unwrap();
        assert!(during.action_indicator);
        assert_eq!(during.orientation, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(during.position, Vec3::ZERO);
        let after = position_at(view, CopyId(0), 15).unwrap();
        assert!(!after.action_indicator);
        assert_eq!(after.orientation, Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn incremental_replay_matches_fresh_replay() {
        let (rules, tl) = two_moves();
        let res = Resolutions::new();
        let view = LogView::new(&rules, &tl, &res);
        let mut replay = Replay::new();
        for t in [3, 7, 12, 19, 4, 20] {
            replay.advance_to(view, t);
            assert_eq!(replay.snapshot(), snapshot_at(view, t));
        }
    }
}
