//! Slice-by-slice conflict resolution.
//!
//! Resolution walks every slice of every affected turn in increasing
//! order, replaying the log up to each slice start so that positions
//! reflect everything resolved before it. Each slice runs two passes:
//!
//! 1. **Pushes.** Every push starting in the slice looks one cell past the
//!    pusher along its direction. The first spawned, visible copy standing
//!    in that cell receives a forced one-slice move by that cell step,
//!    shadowing whatever it authored for the slice. Pushes run in
//!    authoring order; a later push retargeting the same copy overwrites
//!    the earlier one. A copy retargeted earlier in the slice does not
//!    push.
//! 2. **Moves.** Every move starting in the slice (forced ones included)
//!    gets `target = position at slice start + direction`. When two or
//!    more targets share a cell, every one of them is canceled.
//!
//! Outcomes go to the [`Resolutions`] overlay; the authored log is never
//! touched.

use rewind_core::{ActionKind, CopyId, Rules, Timeline, Vec3};
use smallvec::SmallVec;
use tracing::debug;

use crate::overlay::{MoveResolution, PushOutcome, RecordKey, Resolutions};
use crate::player::{LogView, Replay};

/// Counters from one resolution run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolveReport {
    /// Turns re-resolved.
    pub turns: u32,
    /// Slices visited.
    pub slices: u32,
    /// Pushes that found a copy to retarget.
    pub retargeted: u32,
    /// Moves canceled by contention.
    pub canceled: u32,
}

struct Mover {
    copy: CopyId,
    direction: Vec3,
    forced_by: Option<CopyId>,
    target: Vec3,
}

/// Recompute the overlay for `first_turn` and every later turn.
///
/// Entries for earlier turns are kept; they cannot depend on later ones.
pub fn resolve_from(
    rules: &Rules,
    timeline: &Timeline,
    resolutions: &mut Resolutions,
    first_turn: u32,
) -> ResolveReport {
    resolutions.clear_from(first_turn);
    let grid = rules.grid();
    let width = rules.slice_width();
    let mut report = ResolveReport::default();
    let mut replay = Replay::new();

    for turn_index in first_turn..timeline.turn_count() {
        let Some(turn) = timeline.turn(turn_index) else {
            break;
        };
        report.turns += 1;
        for slice in 0..rules.slices_per_turn() {
            let local = slice * width;
            report.slices += 1;
            replay.advance_to(
                LogView::new(rules, timeline, resolutions),
                rules.global_offset(turn_index, local),
            );

            // Pass 1: pushes become forced moves on their victims.
            let mut retargeted: SmallVec<[CopyId; 4]> = SmallVec::new();
            for rec in turn.records().iter().filter(|r| r.ap_start == local) {
                let ActionKind::Push { direction } = rec.kind else {
                    continue;
                };
                if retargeted.contains(&rec.copy) {
                    debug!(turn = turn_index, slice, pusher = %rec.copy, "pusher was retargeted; push skipped");
                    continue;
                }
                let Some(pusher) = replay.state(rec.copy).filter(|s| s.spawned) else {
                    continue;
                };
                let step = grid.cell_step(direction);
                let dest = pusher.position + step;
                let victim = replay
                    .states()
                    .iter()
                    .enumerate()
                    .find(|(i, s)| {
                        *i != rec.copy.index()
                            && s.spawned
                            && s.visible
                            && grid.same_cell(s.position, dest)
                    })
                    .map(|(i, _)| CopyId(i as u32));

                let push_key = RecordKey::new(turn_index, rec.copy, rec.ap_start);
                resolutions.set_push(push_key, PushOutcome { victim });
                if let Some(victim) = victim {
                    debug!(turn = turn_index, slice, pusher = %rec.copy, victim = %victim, "push retargets copy");
                    resolutions.set_move(
                        RecordKey::new(turn_index, victim, local),
                        MoveResolution {
                            direction: step,
                            target: dest + step,
                            canceled: false,
                            forced_by: Some(rec.copy),
                        },
                    );
                    if !retargeted.contains(&victim) {
                        retargeted.push(victim);
                    }
                    report.retargeted += 1;
                }
            }

            // Pass 2: moves sharing a target cell cancel each other.
            let mut movers: SmallVec<[Mover; 8]> = SmallVec::new();
            for copy in timeline.copies() {
                let key = RecordKey::new(turn_index, copy, local);
                let (direction, forced_by) = match resolutions.forced_at(key) {
                    Some(forced) => (forced.direction, forced.forced_by),
                    None => match turn.record_at(copy, local) {
                        Some(rec) if rec.ap_start == local => match rec.kind {
                            ActionKind::Move { direction } => (direction, None),
                            _ => continue,
                        },
                        _ => continue,
                    },
                };
                let Some(start) = replay.state(copy) else {
                    continue;
                };
                movers.push(Mover {
                    copy,
                    direction,
                    forced_by,
                    target: start.position + direction,
                });
            }

            let mut canceled: SmallVec<[bool; 8]> = SmallVec::from_elem(false, movers.len());
            for i in 0..movers.len() {
                for j in i + 1..movers.len() {
                    if grid.same_cell(movers[i].target, movers[j].target) {
                        canceled[i] = true;
                        canceled[j] = true;
                    }
                }
            }
            let group: SmallVec<[CopyId; 8]> = movers
                .iter()
                .zip(&canceled)
                .filter(|(_, c)| **c)
                .map(|(m, _)| m.copy)
                .collect();
            if !group.is_empty() {
                debug!(turn = turn_index, slice, copies = ?group, "contending moves canceled");
            }

            for (mover, canceled) in movers.iter().zip(canceled) {
                if canceled {
                    report.canceled += 1;
                }
                resolutions.set_move(
                    RecordKey::new(turn_index, mover.copy, local),
                    MoveResolution {
                        direction: mover.direction,
                        target: mover.target,
                        canceled,
                        forced_by: mover.forced_by,
                    },
                );
            }
        }
    }
    report
}

/// Recompute the whole overlay from turn 0.
pub fn resolve_all(rules: &Rules, timeline: &Timeline, resolutions: &mut Resolutions) -> ResolveReport {
    resolve_from(rules, timeline, resolutions, 0)
}
