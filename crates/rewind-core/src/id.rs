//! Strongly-typed identifiers.

use std::fmt;

/// Identifies one chronological copy of the player.
///
/// `CopyId(0)` is the original. New ids are allocated sequentially by
/// each flashback and are never reused or removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CopyId(pub u32);

impl CopyId {
    /// The original copy, present from turn 0.
    pub const ORIGINAL: CopyId = CopyId(0);

    /// The id allocated after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Position of this copy in per-copy tables.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CopyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CopyId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies the human player who authored a record.
///
/// A single local player drives every copy; the id is carried on every
/// record so that reset and persistence stay player-scoped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PlayerId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_ids_allocate_sequentially() {
        let first = CopyId::ORIGINAL;
        assert_eq!(first.next(), CopyId(1));
        assert_eq!(first.next().next().index(), 2);
    }

    #[test]
    fn ids_display_as_bare_numbers() {
        assert_eq!(CopyId(7).to_string(), "7");
        assert_eq!(PlayerId::from(3).to_string(), "3");
    }
}
