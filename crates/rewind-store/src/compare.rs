//! Replay comparison.
//!
//! Hash-first comparison (fast path) with a per-copy bit-exact fallback on
//! mismatch, plus a driver that walks two logs offset by offset.

use std::ops::Range;

use rewind_core::CopyId;
use rewind_sim::{CopyState, LogView, Replay, WorldSnapshot};

use crate::hash::copies_hash;

/// One copy whose state differs between two replays.
#[derive(Clone, Debug, PartialEq)]
pub struct CopyDivergence {
    /// Which copy diverged.
    pub copy: CopyId,
    /// State in the first replay, if the copy exists there.
    pub left: Option<CopyState>,
    /// State in the second replay, if the copy exists there.
    pub right: Option<CopyState>,
}

/// Report of all divergences found at a single offset.
#[derive(Clone, Debug, PartialEq)]
pub struct DivergenceReport {
    /// The offset at which divergence was detected.
    pub offset: u32,
    /// Every listed copy that differs at this offset.
    pub divergences: Vec<CopyDivergence>,
}

fn bit_eq(a: &CopyState, b: &CopyState) -> bool {
    let bits = |s: &CopyState| {
        [
            s.position.x.to_bits(),
            s.position.y.to_bits(),
            s.position.z.to_bits(),
            s.orientation.x.to_bits(),
            s.orientation.y.to_bits(),
            s.orientation.z.to_bits(),
        ]
    };
    bits(a) == bits(b)
        && a.visible == b.visible
        && a.spawned == b.spawned
        && a.action_indicator == b.action_indicator
}

/// Compare the listed copies of two snapshots bit for bit.
///
/// Returns an empty list when they agree.
pub fn compare_snapshots(
    left: &WorldSnapshot,
    right: &WorldSnapshot,
    copies: &[CopyId],
) -> Vec<CopyDivergence> {
    if copies_hash(left, copies) == copies_hash(right, copies) {
        return Vec::new();
    }
    copies
        .iter()
        .filter_map(|&copy| {
            let (l, r) = (left.get(copy).copied(), right.get(copy).copied());
            let same = match (&l, &r) {
                (Some(a), Some(b)) => bit_eq(a, b),
                (None, None) => true,
                _ => false,
            };
            (!same).then_some(CopyDivergence {
                copy,
                left: l,
                right: r,
            })
        })
        .collect()
}

/// Replay two logs across `range` and report the first offset at which
/// any of `copies` differs.
///
/// Returns `None` when every offset agrees.
///
/// # Examples
///
/// ```
/// use rewind_core::{CopyId, Rules, Timeline, Vec3};
/// use rewind_sim::{LogView, Resolutions};
/// use rewind_store::compare_replays;
///
/// let rules = Rules::default();
/// let a = Timeline::new(&rules, Vec3::ZERO);
/// let b = Timeline::new(&rules, Vec3::new(10.0, 0.0, 0.0));
/// let res = Resolutions::new();
///
/// let same = compare_replays(
///     LogView::new(&rules, &a, &res),
///     LogView::new(&rules, &a, &res),
///     0..50,
///     &[CopyId(0)],
/// );
/// assert!(same.is_none());
///
/// let report = compare_replays(
///     LogView::new(&rules, &a, &res),
///     LogView::new(&rules, &b, &res),
///     0..50,
///     &[CopyId(0)],
/// )
/// .unwrap();
/// assert_eq!(report.offset, 0);
/// ```
pub fn compare_replays(
    left: LogView<'_>,
    right: LogView<'_>,
    range: Range<u32>,
    copies: &[CopyId],
) -> Option<DivergenceReport> {
    let mut a = Replay::new();
    let mut b = Replay::new();
    for offset in range {
        a.advance_to(left, offset);
        b.advance_to(right, offset);
        let divergences = compare_snapshots(&a.snapshot(), &b.snapshot(), copies);
        if !divergences.is_empty() {
            return Some(DivergenceReport {
                offset,
                divergences,
            });
        }
    }
    None
}
