//! Player-facing command surface.
//!
//! A [`Session`] owns a [`TimelineWorld`] plus the interaction state a UI
//! needs (selected mode, flashback targeting, scrub position) and turns
//! [`Command`]s into world mutations. Every successful command returns a
//! [`SessionView`] carrying enough state to redraw without reaching into
//! the world.

use rewind_core::{ActionClass, Vec3};
use rewind_sim::WorldSnapshot;
use tracing::debug;

use crate::error::SessionError;
use crate::flashback::FlashbackController;
use crate::world::TimelineWorld;

/// Interaction mode selecting what a click on a target cell means.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Targets are movement destinations.
    #[default]
    Move,
    /// Targets are attack directions.
    Attack,
    /// Targets are push directions.
    Push,
    /// Targets are flashback spawn positions.
    Flashback,
}

impl Mode {
    fn class(self) -> Option<ActionClass> {
        match self {
            Self::Move => Some(ActionClass::Move),
            Self::Attack => Some(ActionClass::Attack),
            Self::Push => Some(ActionClass::Push),
            Self::Flashback => None,
        }
    }
}

/// One player intent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Move the current copy toward a position.
    RequestMove(Vec3),
    /// Attack toward a position.
    RequestAttack(Vec3),
    /// Push whatever stands at a position.
    RequestPush(Vec3),
    /// Rewind and spawn a new copy at a position.
    RequestFlashback(Vec3),
    /// Finalize and advance to the next turn.
    NextTurn,
    /// Discard the current copy's actions this turn.
    ResetTurn,
    /// Show the world at a global offset.
    ScrubTo(u32),
    /// Switch interaction mode.
    EnterMode(Mode),
}

/// Everything a UI needs to render after a command.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionView {
    /// Active mode.
    pub mode: Mode,
    /// Turn being authored.
    pub current_turn: u32,
    /// Copy being authored.
    pub current_copy: rewind_core::CopyId,
    /// Budget left for the current copy.
    pub action_points_left: u32,
    /// Flashbacks available.
    pub flashback_charges: u32,
    /// Offset of `frame`.
    pub scrub_offset: u32,
    /// Every copy's state at `scrub_offset`.
    pub frame: WorldSnapshot,
    /// Cells the active mode accepts.
    pub targets: Vec<Vec3>,
}

/// A world plus its interaction state.
#[derive(Clone, Debug)]
pub struct Session {
    world: TimelineWorld,
    mode: Mode,
    flashback: FlashbackController,
    scrub: u32,
}

impl Session {
    /// Wrap `world`, starting in [`Mode::Move`] with the frame at the
    /// authoring offset.
    pub fn new(world: TimelineWorld) -> Self {
        let scrub = world.authoring_offset();
        Self {
            world,
            mode: Mode::Move,
            flashback: FlashbackController::new(),
            scrub,
        }
    }

    /// The world.
    pub fn world(&self) -> &TimelineWorld {
        &self.world
    }

    /// Give the world back.
    pub fn into_world(self) -> TimelineWorld {
        self.world
    }

    /// Active mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Apply one command.
    ///
    /// A rejected command leaves the world unchanged. It also leaves the
    /// mode unchanged, except that a flashback the world refuses drops the
    /// session back to [`Mode::Move`] along with its controller.
    pub fn handle(&mut self, command: Command) -> Result<SessionView, SessionError> {
        debug!(?command, mode = ?self.mode, "session command");
        match command {
            Command::RequestMove(target) => self.request(Mode::Move, target)?,
            Command::RequestAttack(target) => self.request(Mode::Attack, target)?,
            Command::RequestPush(target) => self.request(Mode::Push, target)?,
            Command::RequestFlashback(target) => self.request(Mode::Flashback, target)?,
            Command::NextTurn => {
                self.world.next_turn()?;
                self.scrub = self.world.authoring_offset();
            }
            Command::ResetTurn => {
                let copy = self.world.current_copy();
                self.world.reset_turn(copy)?;
                self.scrub = self.world.authoring_offset();
            }
            Command::ScrubTo(offset) => {
                self.scrub = offset.min(self.world.authoring_offset());
            }
            Command::EnterMode(mode) => self.enter_mode(mode)?,
        }
        Ok(self.view())
    }

    /// Snapshot of the session for rendering.
    pub fn view(&self) -> SessionView {
        let c = self.world.cursors();
        SessionView {
            mode: self.mode,
            current_turn: c.current_turn,
            current_copy: c.current_copy,
            action_points_left: c.action_points_left,
            flashback_charges: c.flashback_charges,
            scrub_offset: self.scrub,
            frame: self.world.snapshot_at(self.scrub),
            targets: self.targets(),
        }
    }

    /// Cells the active mode accepts.
    ///
    /// Move, attack and push offer the four orthogonal neighbours of the
    /// current copy, or nothing once the budget cannot cover the action.
    /// Flashback offers every cell of the flashback zone.
    pub fn targets(&self) -> Vec<Vec3> {
        let copy = self.world.current_copy();
        let Some(center) = self.world.last_known_position(copy) else {
            return Vec::new();
        };
        let rules = self.world.rules();
        let grid = rules.grid();
        match self.mode.class() {
            Some(class) => {
                if self.world.cursors().action_points_left < rules.cost_of(class) {
                    Vec::new()
                } else {
                    grid.neighbours4(center).to_vec()
                }
            }
            None => grid.zone(center, rules.flashback_zone),
        }
    }

    fn enter_mode(&mut self, mode: Mode) -> Result<(), SessionError> {
        if mode == Mode::Flashback {
            self.flashback.begin(&self.world)?;
        } else {
            self.flashback.cancel();
        }
        self.mode = mode;
        Ok(())
    }

    fn request(&mut self, mode: Mode, target: Vec3) -> Result<(), SessionError> {
        self.expect_mode(mode)?;
        let Some(class) = mode.class() else {
            return self.request_flashback(target);
        };
        let grid = self.world.rules().grid();
        if !self.targets().iter().any(|&t| grid.same_cell(t, target)) {
            return Err(SessionError::NotATarget { target });
        }
        let copy = self.world.current_copy();
        match class {
            ActionClass::Move => self.world.move_to(copy, target)?,
            ActionClass::Attack => self.world.attack(copy, target)?,
            ActionClass::Push => self.world.push(copy, target)?,
        }
        self.scrub = self.world.authoring_offset();
        Ok(())
    }

    fn request_flashback(&mut self, target: Vec3) -> Result<(), SessionError> {
        let copy = self.world.current_copy();
        let rules = self.world.rules();
        let in_zone = self
            .world
            .last_known_position(copy)
            .is_some_and(|center| rules.grid().in_zone(center, target, rules.flashback_zone));
        if !in_zone {
            return Err(SessionError::OutsideFlashbackZone { target });
        }
        let confirmed = self.flashback.confirm(&mut self.world, target);
        self.mode = Mode::Move;
        confirmed?;
        self.scrub = self.world.authoring_offset();
        Ok(())
    }

    fn expect_mode(&self, expected: Mode) -> Result<(), SessionError> {
        if self.mode != expected {
            return Err(SessionError::WrongMode {
                expected,
                found: self.mode,
            });
        }
        Ok(())
    }
}
