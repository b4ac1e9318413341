//! Replayed per-copy state.

use rewind_core::{CopyId, Vec3};

/// State of one copy at a replay offset.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CopyState {
    /// Current position; interpolated while a move is in progress.
    pub position: Vec3,
    /// Facing set by the most recent attack or push.
    pub orientation: Vec3,
    /// Whether the copy has a record covering the current step.
    pub visible: bool,
    /// Whether the copy's spawn has been replayed.
    pub spawned: bool,
    /// Set only during the steps of an attack or push.
    pub action_indicator: bool,
}

/// Every copy's state at one global offset.
///
/// # Examples
///
/// ```
/// use rewind_core::CopyId;
/// use rewind_sim::{CopyState, WorldSnapshot};
///
/// let snap = WorldSnapshot::new(40, vec![CopyState::default(); 2]);
/// assert_eq!(snap.offset(), 40);
/// assert!(snap.get(CopyId(1)).is_some());
/// assert!(snap.get(CopyId(2)).is_none());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct WorldSnapshot {
    offset: u32,
    copies: Vec<CopyState>,
}

impl WorldSnapshot {
    /// Wrap per-copy states, indexed by copy id.
    pub fn new(offset: u32, copies: Vec<CopyState>) -> Self {
        Self { offset, copies }
    }

    /// The global offset this snapshot was taken at.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// State of one copy.
    pub fn get(&self, copy: CopyId) -> Option<&CopyState> {
        self.copies.get(copy.index())
    }

    /// All states, indexed by copy id.
    pub fn copies(&self) -> &[CopyState] {
        &self.copies
    }

    /// `(copy, state)` pairs of the currently visible copies.
    pub fn visible(&self) -> impl Iterator<Item = (CopyId, &CopyState)> + '_ {
        self.copies
            .iter()
            .enumerate()
            .filter(|(_, s)| s.visible)
            .map(|(i, s)| (CopyId(i as u32), s))
    }
}
