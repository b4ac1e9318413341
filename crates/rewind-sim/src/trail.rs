//! Trail polylines sampled from playback.

use std::ops::Range;

use rewind_core::{CopyId, Vec3};

use crate::player::{LogView, Replay};

/// Tolerance subtracted from the grid step when deciding whether a sample
/// has moved far enough to emit a new vertex.
pub const TRAIL_EPSILON: f32 = 0.05;

/// Which part of the timeline a trail covers, relative to a viewed turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrailKind {
    /// Every turn before the viewed one.
    Past,
    /// The viewed turn.
    Current,
    /// Authored turns after the viewed one.
    Future,
}

/// One copy's polyline over a range of offsets.
#[derive(Clone, Debug, PartialEq)]
pub struct Trail {
    /// The copy traced.
    pub copy: CopyId,
    /// The part of the timeline covered.
    pub kind: TrailKind,
    /// Snapped vertices, in time order.
    pub points: Vec<Vec3>,
}

/// Sample `copy`'s position at every offset in `[range.start, range.end]`
/// and return the polyline vertices.
///
/// The start is clamped forward to the copy's spawn offset. Only visible
/// samples contribute; a sample becomes a vertex when its snapped
/// position lies at least one grid step (less [`TRAIL_EPSILON`]) from the
/// previous vertex.
pub fn trail(view: LogView<'_>, copy: CopyId, range: Range<u32>) -> Vec<Vec3> {
    let Some(spawn) = view.timeline.spawn_offset(view.rules, copy) else {
        return Vec::new();
    };
    let start = range.start.max(spawn);
    if start >= range.end {
        return Vec::new();
    }
    let grid = view.rules.grid();
    let threshold = grid.step() - TRAIL_EPSILON;
    let mut replay = Replay::new();
    let mut points: Vec<Vec3> = Vec::new();
    for offset in start..=range.end {
        replay.advance_to(view, offset);
        let Some(state) = replay.state(copy).filter(|s| s.visible) else {
            continue;
        };
        let sample = grid.snap(state.position);
        match points.last() {
            Some(last) if last.distance(sample) < threshold => {}
            _ => points.push(sample),
        }
    }
    points
}

/// Past, current and future trails of every copy around `turn`.
///
/// Trails with no vertices are omitted. Ranges are clamped to the end of
/// the log, so a turn past it sees the whole log as past.
pub fn trails_for_turn(view: LogView<'_>, turn: u32) -> Vec<Trail> {
    let width = view.rules.ap_per_turn;
    let log_end = view.timeline.end_offset(view.rules);
    let turn_start = turn.saturating_mul(width).min(log_end);
    let turn_end = turn_start.saturating_add(width).min(log_end);
    let mut trails = Vec::new();
    for copy in view.timeline.copies() {
        let ranges = [
            (TrailKind::Past, 0..turn_start),
            (TrailKind::Current, turn_start..turn_end),
            (TrailKind::Future, turn_end..log_end),
        ];
        for (kind, range) in ranges {
            let points = trail(view, copy, range);
            if !points.is_empty() {
                trails.push(Trail { copy, kind, points });
            }
        }
    }
    trails
}
