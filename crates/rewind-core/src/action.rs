//! Authored action records.
//!
//! An [`ActionRecord`] is one entry of the per-turn action log: who acted,
//! over which action-point interval, and what they did. Records carry only
//! authored intent. The derived move flags (`canceled`, resolved target)
//! and push conversions live in a separate overlay computed by the
//! conflict resolver, so resetting or reloading a turn never loses intent.

use std::ops::Range;

use crate::grid::Vec3;
use crate::id::{CopyId, PlayerId};

/// What an action record does.
///
/// # Examples
///
/// ```
/// use rewind_core::{ActionKind, Vec3};
///
/// let kind = ActionKind::Move { direction: Vec3::new(10.0, 0.0, 0.0) };
/// assert_eq!(kind.name(), "move");
/// assert_eq!(kind.direction(), Some(Vec3::new(10.0, 0.0, 0.0)));
/// assert_eq!(ActionKind::Empty.direction(), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActionKind {
    /// Marks where a copy starts existing. Zero cost; exactly one per copy.
    Spawn {
        /// The snapped spawn position.
        from: Vec3,
    },
    /// Idle filler padding a copy's budget.
    Empty,
    /// Displacement by `direction` from the copy's position at `ap_start`.
    Move {
        /// Snapped displacement.
        direction: Vec3,
    },
    /// Stationary action with a facing.
    Attack {
        /// Unit vector toward the target.
        direction: Vec3,
    },
    /// Attempt to shove whichever copy stands one cell along `direction`.
    Push {
        /// Raw offset toward the target; interpreted as one cell.
        direction: Vec3,
    },
}

impl ActionKind {
    /// Short lowercase name, used in logs and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Spawn { .. } => "spawn",
            Self::Empty => "empty",
            Self::Move { .. } => "move",
            Self::Attack { .. } => "attack",
            Self::Push { .. } => "push",
        }
    }

    /// The authored direction, for variants that have one.
    pub fn direction(&self) -> Option<Vec3> {
        match *self {
            Self::Move { direction } | Self::Attack { direction } | Self::Push { direction } => {
                Some(direction)
            }
            Self::Spawn { .. } | Self::Empty => None,
        }
    }

    /// Whether this is a spawn marker.
    pub fn is_spawn(&self) -> bool {
        matches!(self, Self::Spawn { .. })
    }
}

/// Player-initiated action classes that charge a fixed cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionClass {
    /// A one-cell move.
    Move,
    /// A stationary attack.
    Attack,
    /// A push.
    Push,
}

/// One entry of a [`Turn`](crate::Turn).
///
/// The record occupies the half-open action-point interval
/// `[ap_start, ap_start + ap_cost)` of its owning turn. Spawns have zero
/// cost and act at the instant `ap_start`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActionRecord {
    /// Authoring player.
    pub player: PlayerId,
    /// Acting copy.
    pub copy: CopyId,
    /// Offset within the owning turn at which the action begins.
    pub ap_start: u32,
    /// Duration in action points; zero only for spawns.
    pub ap_cost: u32,
    /// The action itself.
    pub kind: ActionKind,
}

impl ActionRecord {
    /// A spawn marker at the start of a turn.
    pub fn spawn(player: PlayerId, copy: CopyId, from: Vec3) -> Self {
        Self {
            player,
            copy,
            ap_start: 0,
            ap_cost: 0,
            kind: ActionKind::Spawn { from },
        }
    }

    /// The occupied interval within the owning turn.
    pub fn interval(&self) -> Range<u32> {
        self.ap_start..self.ap_end()
    }

    /// First offset after the action.
    pub fn ap_end(&self) -> u32 {
        self.ap_start + self.ap_cost
    }

    /// Whether the record is active at `offset` (duration records only).
    pub fn contains(&self, offset: u32) -> bool {
        self.ap_cost > 0 && self.ap_start <= offset && offset < self.ap_end()
    }

    /// Whether the record's interval intersects `range`.
    pub fn overlaps(&self, range: &Range<u32>) -> bool {
        self.ap_cost > 0 && self.ap_start < range.end && range.start < self.ap_end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty(start: u32, cost: u32) -> ActionRecord {
        ActionRecord {
            player: PlayerId(0),
            copy: CopyId(0),
            ap_start: start,
            ap_cost: cost,
            kind: ActionKind::Empty,
        }
    }

    #[test]
    fn interval_is_half_open() {
        let rec = empty(10, 10);
        assert!(!rec.contains(9));
        assert!(rec.contains(10));
        assert!(rec.contains(19));
        assert!(!rec.contains(20));
    }

    #[test]
    fn spawn_occupies_no_interval() {
        let rec = ActionRecord::spawn(PlayerId(0), CopyId(1), Vec3::ZERO);
        assert!(!rec.contains(0));
        assert!(!rec.overlaps(&(0..100)));
        assert!(rec.kind.is_spawn());
    }

    #[test]
    fn overlap_detection() {
        let rec = empty(10, 20);
        assert!(rec.overlaps(&(0..11)));
        assert!(rec.overlaps(&(29..40)));
        assert!(!rec.overlaps(&(30..40)));
        assert!(!rec.overlaps(&(0..10)));
    }
}
