//! Hashing utilities for rules, log and replay comparison.
//!
//! Uses FNV-1a for fast, deterministic hashing. These hashes are not
//! cryptographically secure; they are used for fast equality checks when
//! loading and when comparing replays.

use rewind_core::{ActionKind, CopyId, Rules, Timeline, Vec3};
use rewind_sim::{CopyState, WorldSnapshot};

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_byte(hash: u64, byte: u8) -> u64 {
    (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
}

#[inline]
fn fnv1a_u32(mut hash: u64, v: u32) -> u64 {
    for &b in &v.to_le_bytes() {
        hash = fnv1a_byte(hash, b);
    }
    hash
}

#[inline]
fn fnv1a_vec3(hash: u64, v: Vec3) -> u64 {
    let hash = fnv1a_u32(hash, v.x.to_bits());
    let hash = fnv1a_u32(hash, v.y.to_bits());
    fnv1a_u32(hash, v.z.to_bits())
}

/// Hash every field of the rules.
pub fn rules_hash(rules: &Rules) -> u64 {
    let mut hash = fnv1a_u32(FNV_OFFSET, rules.grid_step.to_bits());
    for v in [
        rules.ap_per_move,
        rules.ap_per_attack,
        rules.ap_per_push,
        rules.ap_per_turn,
        rules.flashback_turns,
        rules.flashback_zone,
        rules.turns_per_flashback,
        rules.initial_flashback_charges,
    ] {
        hash = fnv1a_u32(hash, v);
    }
    hash
}

/// Hash the authored log: cursors, then every record of every turn.
///
/// Turn boundaries are folded in so that moving a record between turns
/// changes the hash.
pub fn timeline_hash(timeline: &Timeline) -> u64 {
    let c = timeline.cursors();
    let mut hash = FNV_OFFSET;
    for v in [
        c.current_turn,
        c.current_top_turn,
        c.current_player.0,
        c.current_copy.0,
        c.action_points_left,
        c.flashback_charges,
    ] {
        hash = fnv1a_u32(hash, v);
    }
    for (t, turn) in timeline.turns().iter().enumerate() {
        hash = fnv1a_u32(hash, t as u32);
        for rec in turn.records() {
            let (tag, vector) = match rec.kind {
                ActionKind::Spawn { from } => (0, from),
                ActionKind::Empty => (1, Vec3::ZERO),
                ActionKind::Move { direction } => (2, direction),
                ActionKind::Attack { direction } => (3, direction),
                ActionKind::Push { direction } => (4, direction),
            };
            hash = fnv1a_byte(hash, tag);
            hash = fnv1a_u32(hash, rec.player.0);
            hash = fnv1a_u32(hash, rec.copy.0);
            hash = fnv1a_u32(hash, rec.ap_start);
            hash = fnv1a_u32(hash, rec.ap_cost);
            hash = fnv1a_vec3(hash, vector);
        }
    }
    hash
}

fn fnv1a_state(hash: u64, state: &CopyState) -> u64 {
    let hash = fnv1a_vec3(hash, state.position);
    let hash = fnv1a_vec3(hash, state.orientation);
    let flags = (state.visible as u8)
        | ((state.spawned as u8) << 1)
        | ((state.action_indicator as u8) << 2);
    fnv1a_byte(hash, flags)
}

/// Hash every copy's replayed state.
pub fn snapshot_hash(snapshot: &WorldSnapshot) -> u64 {
    let mut hash = FNV_OFFSET;
    for (i, state) in snapshot.copies().iter().enumerate() {
        hash = fnv1a_u32(hash, i as u32);
        hash = fnv1a_state(hash, state);
    }
    hash
}

/// Hash the replayed state of the listed copies only.
///
/// Copies absent from the snapshot contribute a marker byte.
pub fn copies_hash(snapshot: &WorldSnapshot, copies: &[CopyId]) -> u64 {
    let mut hash = FNV_OFFSET;
    for &copy in copies {
        hash = fnv1a_u32(hash, copy.0);
        hash = match snapshot.get(copy) {
            Some(state) => fnv1a_state(hash, state),
            None => fnv1a_byte(hash, 0xff),
        };
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_hash_tracks_every_field() {
        let base = Rules::default();
        let changed = Rules {
            initial_flashback_charges: 1,
            ..Rules::default()
        };
        assert_eq!(rules_hash(&base), rules_hash(&Rules::default()));
        assert_ne!(rules_hash(&base), rules_hash(&changed));
    }

    #[test]
    fn timeline_hash_tracks_cursors_and_records() {
        let rules = Rules::default();
        let a = Timeline::new(&rules, Vec3::ZERO);
        let b = Timeline::new(&rules, Vec3::new(10.0, 0.0, 0.0));
        let mut c = a.clone();
        c.cursors_mut().flashback_charges = 2;
        assert_eq!(timeline_hash(&a), timeline_hash(&a.clone()));
        assert_ne!(timeline_hash(&a), timeline_hash(&b));
        assert_ne!(timeline_hash(&a), timeline_hash(&c));
    }

    #[test]
    fn snapshot_hash_distinguishes_flags() {
        let shown = CopyState {
            visible: true,
            spawned: true,
            ..CopyState::default()
        };
        let hidden = CopyState {
            visible: false,
            spawned: true,
            ..CopyState::default()
        };
        let a = WorldSnapshot::new(0, vec![shown]);
        let b = WorldSnapshot::new(0, vec![hidden]);
        assert_ne!(snapshot_hash(&a), snapshot_hash(&b));
        assert_eq!(
            copies_hash(&a, &[CopyId(0)]),
            copies_hash(&a.clone(), &[CopyId(0)])
        );
        assert_ne!(copies_hash(&a, &[CopyId(1)]), copies_hash(&a, &[CopyId(0)]));
    }
}
