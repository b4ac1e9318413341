//! Canonical scenarios.
//!
//! Every fixture returns the rules it was built with alongside a padded
//! timeline (every live copy covers every slice of every turn).

use rewind_core::{ActionKind, Rules, Timeline, Vec3};

use crate::ScriptBuilder;

pub fn right() -> Vec3 {
    Vec3::new(10.0, 0.0, 0.0)
}

pub fn left() -> Vec3 {
    Vec3::new(-10.0, 0.0, 0.0)
}

pub fn up() -> Vec3 {
    Vec3::new(0.0, 10.0, 0.0)
}

pub fn down() -> Vec3 {
    Vec3::new(0.0, -10.0, 0.0)
}

/// Default rules with flashback charges available from the start.
pub fn flashback_rules(charges: u32) -> Rules {
    Rules {
        initial_flashback_charges: charges,
        ..Rules::default()
    }
}

/// Copy 0 at the origin moves right then up in turn 0.
pub fn right_then_up() -> (Rules, Timeline) {
    let rules = Rules::default();
    let tl = ScriptBuilder::new(rules.clone(), Vec3::ZERO)
        .moves(0, 0, &[right(), up()])
        .pad()
        .build();
    (rules, tl)
}

/// Copies at (0,0) and (20,0) both move into (10,0) in slice 0.
pub fn head_on() -> (Rules, Timeline) {
    let rules = Rules::default();
    let tl = ScriptBuilder::new(rules.clone(), Vec3::ZERO)
        .spawn(0, Vec3::new(20.0, 0.0, 0.0))
        .moves(0, 0, &[right()])
        .moves(0, 1, &[left()])
        .pad()
        .build();
    (rules, tl)
}

/// Copy 0 at the origin pushes right into copy 1 standing at (10,0).
pub fn push_neighbour() -> (Rules, Timeline) {
    let rules = Rules::default();
    let tl = ScriptBuilder::new(rules.clone(), Vec3::ZERO)
        .spawn(0, right())
        .act(0, 0, 0, ActionKind::Push { direction: right() })
        .pad()
        .build();
    (rules, tl)
}

/// `copies` copies walking square loops for `turns` turns.
///
/// Copy `c` spawns in turn 0 at `(0, 40c)` and walks right, up, left and
/// down in turn, two slices each, so no two copies ever share a cell.
pub fn patrol(turns: u32, copies: u32) -> (Rules, Timeline) {
    let rules = Rules::default();
    let mut script = ScriptBuilder::new(rules.clone(), Vec3::ZERO);
    for c in 1..copies {
        script = script.spawn(0, Vec3::new(0.0, 40.0 * c as f32, 0.0));
    }
    let cycle = [right(), right(), up(), up(), left(), left(), down(), down()];
    for turn in 0..turns {
        for c in 0..copies {
            let slices = rules.slices_per_turn();
            let dirs: Vec<Vec3> = (0..slices)
                .map(|s| cycle[((turn * slices + s) as usize) % cycle.len()])
                .collect();
            script = script.moves(turn, c, &dirs);
        }
    }
    (rules, script.pad().build())
}
