//! Game rules: grid step, action-point costs and flashback tuning.
//!
//! [`Rules`] is the configuration input for every world.
//! [`validate()`](Rules::validate) checks the structural invariants the
//! resolver relies on, chiefly that every cost is a whole number of
//! slices so that actions of different copies line up slice by slice.

use std::error::Error;
use std::fmt;

use crate::action::ActionClass;
use crate::grid::Grid;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`Rules::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// `grid_step` is NaN, infinite, zero, or negative.
    InvalidGridStep {
        /// The invalid value.
        value: f32,
    },
    /// `ap_per_move` is zero.
    ZeroSliceWidth,
    /// `ap_per_turn` is zero or not a multiple of `ap_per_move`.
    TurnNotSliceAligned {
        /// Configured turn width.
        ap_per_turn: u32,
        /// Configured slice width.
        ap_per_move: u32,
    },
    /// An action cost is zero, not a whole number of slices, or wider
    /// than a turn.
    InvalidCost {
        /// Which cost.
        action: &'static str,
        /// The configured value.
        cost: u32,
    },
    /// `turns_per_flashback` is zero.
    ZeroFlashbackPeriod,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGridStep { value } => {
                write!(f, "grid_step must be finite and positive, got {value}")
            }
            Self::ZeroSliceWidth => write!(f, "ap_per_move must be at least 1"),
            Self::TurnNotSliceAligned {
                ap_per_turn,
                ap_per_move,
            } => write!(
                f,
                "ap_per_turn {ap_per_turn} is not a positive multiple of ap_per_move {ap_per_move}"
            ),
            Self::InvalidCost { action, cost } => write!(
                f,
                "{action} cost {cost} must be a positive whole number of slices within one turn"
            ),
            Self::ZeroFlashbackPeriod => write!(f, "turns_per_flashback must be at least 1"),
        }
    }
}

impl Error for ConfigError {}

// ── Rules ──────────────────────────────────────────────────────────

/// Tunable constants of one game.
///
/// # Examples
///
/// ```
/// use rewind_core::Rules;
///
/// let rules = Rules::default();
/// assert!(rules.validate().is_ok());
/// assert_eq!(rules.slices_per_turn(), 10);
/// assert_eq!(rules.turn_of(250), 2);
/// assert_eq!(rules.local_offset(250), 50);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Rules {
    /// Cell size of the coordinate grid. Default: 10.
    pub grid_step: f32,
    /// Cost of a move; also the slice width. Default: 10.
    pub ap_per_move: u32,
    /// Cost of an attack. Default: 10.
    pub ap_per_attack: u32,
    /// Cost of a push. Default: 10.
    pub ap_per_push: u32,
    /// Width of a turn. Default: 100.
    pub ap_per_turn: u32,
    /// How many turns a flashback rewinds. Default: 3.
    pub flashback_turns: u32,
    /// Radius, in cells, of the flashback target zone. Default: 2.
    pub flashback_zone: u32,
    /// A flashback charge is earned every this many new top turns. Default: 3.
    pub turns_per_flashback: u32,
    /// Flashback charges available at game start. Default: 0.
    pub initial_flashback_charges: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            grid_step: 10.0,
            ap_per_move: 10,
            ap_per_attack: 10,
            ap_per_push: 10,
            ap_per_turn: 100,
            flashback_turns: 3,
            flashback_zone: 2,
            turns_per_flashback: 3,
            initial_flashback_charges: 0,
        }
    }
}

impl Rules {
    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.grid_step.is_finite() || self.grid_step <= 0.0 {
            return Err(ConfigError::InvalidGridStep {
                value: self.grid_step,
            });
        }
        if self.ap_per_move == 0 {
            return Err(ConfigError::ZeroSliceWidth);
        }
        if self.ap_per_turn == 0 || self.ap_per_turn % self.ap_per_move != 0 {
            return Err(ConfigError::TurnNotSliceAligned {
                ap_per_turn: self.ap_per_turn,
                ap_per_move: self.ap_per_move,
            });
        }
        for (action, cost) in [("attack", self.ap_per_attack), ("push", self.ap_per_push)] {
            if cost == 0 || cost % self.ap_per_move != 0 || cost > self.ap_per_turn {
                return Err(ConfigError::InvalidCost { action, cost });
            }
        }
        if self.turns_per_flashback == 0 {
            return Err(ConfigError::ZeroFlashbackPeriod);
        }
        Ok(())
    }

    /// The coordinate grid.
    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_step)
    }

    /// Width of one conflict-resolution slice.
    pub fn slice_width(&self) -> u32 {
        self.ap_per_move
    }

    /// Number of slices in a turn.
    pub fn slices_per_turn(&self) -> u32 {
        self.ap_per_turn / self.ap_per_move
    }

    /// Cost charged for an action class.
    pub fn cost_of(&self, class: ActionClass) -> u32 {
        match class {
            ActionClass::Move => self.ap_per_move,
            ActionClass::Attack => self.ap_per_attack,
            ActionClass::Push => self.ap_per_push,
        }
    }

    /// Turn containing a global action-point offset.
    pub fn turn_of(&self, offset: u32) -> u32 {
        offset / self.ap_per_turn
    }

    /// Offset within its turn of a global action-point offset.
    pub fn local_offset(&self, offset: u32) -> u32 {
        offset % self.ap_per_turn
    }

    /// Global offset of a turn-local offset.
    pub fn global_offset(&self, turn: u32, local: u32) -> u32 {
        turn * self.ap_per_turn + local
    }

    /// Start of the slice containing a turn-local offset.
    pub fn slice_start(&self, local: u32) -> u32 {
        local - local % self.ap_per_move
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_are_valid() {
        assert_eq!(Rules::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_grid_step() {
        for step in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let rules = Rules {
                grid_step: step,
                ..Rules::default()
            };
            assert!(matches!(
                rules.validate(),
                Err(ConfigError::InvalidGridStep { .. })
            ));
        }
    }

    #[test]
    fn rejects_turn_not_multiple_of_slice() {
        let rules = Rules {
            ap_per_turn: 95,
            ..Rules::default()
        };
        assert_eq!(
            rules.validate(),
            Err(ConfigError::TurnNotSliceAligned {
                ap_per_turn: 95,
                ap_per_move: 10
            })
        );
    }

    #[test]
    fn rejects_unaligned_attack_cost() {
        let rules = Rules {
            ap_per_attack: 15,
            ..Rules::default()
        };
        assert_eq!(
            rules.validate(),
            Err(ConfigError::InvalidCost {
                action: "attack",
                cost: 15
            })
        );
    }

    #[test]
    fn rejects_zero_flashback_period() {
        let rules = Rules {
            turns_per_flashback: 0,
            ..Rules::default()
        };
        assert_eq!(rules.validate(), Err(ConfigError::ZeroFlashbackPeriod));
    }

    #[test]
    fn offset_arithmetic() {
        let rules = Rules::default();
        assert_eq!(rules.global_offset(3, 40), 340);
        assert_eq!(rules.turn_of(340), 3);
        assert_eq!(rules.local_offset(340), 40);
        assert_eq!(rules.slice_start(47), 40);
        assert_eq!(rules.cost_of(ActionClass::Push), 10);
    }
}
