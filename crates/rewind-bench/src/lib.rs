//! Benchmark profiles for the Rewind timeline engine.
//!
//! Profiles are authored through the public [`TimelineWorld`] API, so they
//! exercise the same builder, flashback and resolution paths a game does:
//!
//! - [`reference_profile`]: 10 turns, 4 copies
//! - [`stress_profile`]: 40 turns, 8 copies
//! - [`patrol_world`]: any size

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rewind_core::{Rules, Vec3};
use rewind_engine::{TimelineWorld, WorldError};

/// Per-slice walk: two cells right, up, left, down.
const CYCLE: [Vec3; 8] = [
    Vec3::new(10.0, 0.0, 0.0),
    Vec3::new(10.0, 0.0, 0.0),
    Vec3::new(0.0, 10.0, 0.0),
    Vec3::new(0.0, 10.0, 0.0),
    Vec3::new(-10.0, 0.0, 0.0),
    Vec3::new(-10.0, 0.0, 0.0),
    Vec3::new(0.0, -10.0, 0.0),
    Vec3::new(0.0, -10.0, 0.0),
];

/// Rules for a profile of `turns` turns and `copies` copies: every
/// flashback rewinds to turn 0 and there are exactly enough charges.
pub fn profile_rules(turns: u32, copies: u32) -> Rules {
    Rules {
        flashback_turns: turns,
        turns_per_flashback: turns.max(1) + 1,
        initial_flashback_charges: copies.saturating_sub(1),
        ..Rules::default()
    }
}

/// `copies` copies each walking square loops for `turns` turns.
///
/// Copy 0 is authored first; every later copy flashes back to turn 0 and
/// spawns at `(0, 40c)`, so loops never share a cell and nothing is
/// canceled.
pub fn patrol_world(turns: u32, copies: u32) -> Result<TimelineWorld, WorldError> {
    let rules = profile_rules(turns, copies);
    let slices = rules.slices_per_turn();
    let mut world = TimelineWorld::new(rules, Vec3::ZERO)?;
    for c in 0..copies {
        if c > 0 {
            world.flashback(Vec3::new(0.0, 40.0 * c as f32, 0.0))?;
        }
        let copy = world.current_copy();
        for turn in 0..turns {
            for s in 0..slices {
                let step = CYCLE[((turn * slices + s) as usize) % CYCLE.len()];
                let here = world
                    .last_known_position(copy)
                    .unwrap_or(Vec3::ZERO);
                world.move_to(copy, here + step)?;
            }
            world.next_turn()?;
        }
    }
    Ok(world)
}

/// 10 turns, 4 copies.
pub fn reference_profile() -> Result<TimelineWorld, WorldError> {
    patrol_world(10, 4)
}

/// 40 turns, 8 copies.
pub fn stress_profile() -> Result<TimelineWorld, WorldError> {
    patrol_world(40, 8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_profile_has_no_contention() {
        let world = reference_profile().unwrap();
        assert_eq!(world.timeline().copies().count(), 4);
        assert_eq!(world.resolutions().canceled_count(), 0);
        assert_eq!(world.timeline().validate(world.rules()), Ok(()));
    }

    #[test]
    fn loops_close_every_four_turns() {
        let world = patrol_world(4, 1).unwrap();
        let at = |t| world.position_at(rewind_core::CopyId(0), t).unwrap().position;
        assert_eq!(at(100), Vec3::new(20.0, 0.0, 0.0));
        assert_eq!(at(200), Vec3::new(20.0, 20.0, 0.0));
        assert_eq!(at(400), Vec3::ZERO);
    }
}
