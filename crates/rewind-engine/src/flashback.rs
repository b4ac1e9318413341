//! Forking the timeline into a new copy.
//!
//! [`TimelineWorld::flashback`] performs the fork itself.
//! [`FlashbackController`] wraps it in the two-state machine the player
//! drives: enter targeting, then confirm or cancel.

use rewind_core::{CopyId, Vec3};
use rewind_sim::ResolveReport;
use tracing::info;

use crate::error::{BuildError, WorldError};
use crate::world::TimelineWorld;

/// Outcome of a confirmed flashback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlashbackReport {
    /// The copy that was spawned.
    pub copy: CopyId,
    /// The turn the authoring cursor rewound to.
    pub turn: u32,
    /// Re-resolution from `turn` forward.
    pub resolve: ResolveReport,
}

impl TimelineWorld {
    /// Spend a charge, close the current turn and spawn a new copy at
    /// `target`, `flashback_turns` turns back.
    ///
    /// Turns after the rewound cursor stay authored; older copies replay
    /// through them unchanged except where the new copy now contends with
    /// them.
    pub fn flashback(&mut self, target: Vec3) -> Result<FlashbackReport, WorldError> {
        if self.cursors().flashback_charges == 0 {
            return Err(WorldError::NoFlashbackCharges);
        }
        if !target.is_finite() {
            return Err(BuildError::NonFiniteTarget { target }.into());
        }
        self.finalize_turn()?;

        let saved = *self.cursors();
        let from = saved.current_turn;
        let rewound = from.saturating_sub(self.rules.flashback_turns);
        let ap_per_turn = self.rules.ap_per_turn;
        let c = self.timeline.cursors_mut();
        c.flashback_charges -= 1;
        c.current_copy = c.current_copy.next();
        c.current_turn = rewound;
        c.action_points_left = ap_per_turn;
        let copy = c.current_copy;

        let resolve = match self.spawn(copy, target) {
            Ok(report) => report,
            Err(err) => {
                *self.timeline.cursors_mut() = saved;
                return Err(err.into());
            }
        };
        let position = self.rules.grid().snap(target);
        info!(
            copy = copy.0,
            from_turn = from,
            to_turn = rewound,
            ?position,
            canceled = resolve.canceled,
            "flashback"
        );
        Ok(FlashbackReport {
            copy,
            turn: rewound,
            resolve,
        })
    }
}

/// Where the controller is in the flashback interaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FlashbackState {
    /// Normal turn play.
    #[default]
    Authoring,
    /// The player is choosing where to rewind to.
    Targeting,
}

/// Two-state flashback interaction.
///
/// # Examples
///
/// ```
/// use rewind_core::{Rules, Vec3};
/// use rewind_engine::{FlashbackController, FlashbackState, TimelineWorld};
///
/// let rules = Rules { initial_flashback_charges: 1, ..Rules::default() };
/// let mut world = TimelineWorld::new(rules, Vec3::ZERO).unwrap();
/// let mut ctl = FlashbackController::new();
///
/// ctl.begin(&world).unwrap();
/// assert_eq!(ctl.state(), FlashbackState::Targeting);
/// let report = ctl.confirm(&mut world, Vec3::new(10.0, 0.0, 0.0)).unwrap();
/// assert_eq!(report.copy.0, 1);
/// assert_eq!(ctl.state(), FlashbackState::Authoring);
/// ```
#[derive(Clone, Debug, Default)]
pub struct FlashbackController {
    state: FlashbackState,
}

impl FlashbackController {
    /// A controller in [`FlashbackState::Authoring`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> FlashbackState {
        self.state
    }

    /// Enter targeting. Requires a flashback charge.
    pub fn begin(&mut self, world: &TimelineWorld) -> Result<(), WorldError> {
        if world.cursors().flashback_charges == 0 {
            return Err(WorldError::NoFlashbackCharges);
        }
        self.state = FlashbackState::Targeting;
        Ok(())
    }

    /// Leave targeting without rewinding.
    pub fn cancel(&mut self) {
        self.state = FlashbackState::Authoring;
    }

    /// Perform the flashback to `target` and return to authoring.
    ///
    /// Confirming outside targeting is allowed; the charge check in
    /// [`TimelineWorld::flashback`] still applies. The controller returns
    /// to authoring even when the flashback is rejected.
    pub fn confirm(
        &mut self,
        world: &mut TimelineWorld,
        target: Vec3,
    ) -> Result<FlashbackReport, WorldError> {
        self.state = FlashbackState::Authoring;
        world.flashback(target)
    }
}
