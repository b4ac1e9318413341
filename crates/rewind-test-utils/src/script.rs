use rewind_core::{ActionKind, ActionRecord, CopyId, PlayerId, Rules, Timeline, Vec3};

/// Assemble a timeline slice by slice.
///
/// Panics on overlapping or malformed scripts; it is meant for tests.
///
/// ```
/// use rewind_core::{ActionKind, Rules, Vec3};
/// use rewind_test_utils::ScriptBuilder;
///
/// let timeline = ScriptBuilder::new(Rules::default(), Vec3::ZERO)
///     .act(0, 0, 0, ActionKind::Move { direction: Vec3::new(10.0, 0.0, 0.0) })
///     .pad()
///     .build();
/// assert_eq!(timeline.turn(0).unwrap().len(), 11);
/// ```
pub struct ScriptBuilder {
    rules: Rules,
    timeline: Timeline,
}

impl ScriptBuilder {
    /// Start from a fresh log with copy 0 spawned at `origin` in turn 0.
    pub fn new(rules: Rules, origin: Vec3) -> Self {
        let timeline = Timeline::new(&rules, origin);
        Self { rules, timeline }
    }

    /// Allocate the next copy and spawn it at the start of `turn`.
    pub fn spawn(mut self, turn: u32, at: Vec3) -> Self {
        let copy = self.timeline.cursors().current_copy.next();
        self.timeline.cursors_mut().current_copy = copy;
        self.timeline
            .insert(turn, ActionRecord::spawn(PlayerId(0), copy, at))
            .expect("spawn script is well formed");
        self
    }

    /// Author one action for `copy` starting at `slice` of `turn`.
    pub fn act(mut self, turn: u32, copy: u32, slice: u32, kind: ActionKind) -> Self {
        let cost = match kind {
            ActionKind::Attack { .. } => self.rules.ap_per_attack,
            ActionKind::Push { .. } => self.rules.ap_per_push,
            ActionKind::Spawn { .. } => 0,
            ActionKind::Move { .. } | ActionKind::Empty => self.rules.ap_per_move,
        };
        let record = ActionRecord {
            player: PlayerId(0),
            copy: CopyId(copy),
            ap_start: slice * self.rules.ap_per_move,
            ap_cost: cost,
            kind,
        };
        self.timeline
            .insert(turn, record)
            .expect("action script is well formed");
        self
    }

    /// Author consecutive moves for `copy` from slice 0 of `turn`.
    pub fn moves(mut self, turn: u32, copy: u32, directions: &[Vec3]) -> Self {
        for (slice, &direction) in directions.iter().enumerate() {
            self = self.act(turn, copy, slice as u32, ActionKind::Move { direction });
        }
        self
    }

    /// Fill every uncovered slice of every live copy with `Empty`.
    pub fn pad(mut self) -> Self {
        let width = self.rules.ap_per_move;
        let copies: Vec<CopyId> = self.timeline.copies().collect();
        for turn in 0..self.timeline.turn_count() {
            for &copy in &copies {
                if !self.timeline.is_live(copy, turn) {
                    continue;
                }
                for slice in 0..self.rules.slices_per_turn() {
                    let range = slice * width..(slice + 1) * width;
                    let covered = self
                        .timeline
                        .turn(turn)
                        .is_some_and(|t| t.overlaps_range(copy, &range));
                    if !covered {
                        self = self.act(turn, copy.0, slice, ActionKind::Empty);
                    }
                }
            }
        }
        self
    }

    /// Finish the log with cursors on its last turn.
    pub fn build(mut self) -> Timeline {
        let last = self.timeline.turn_count() - 1;
        let copy = self.timeline.cursors().current_copy;
        let charged = self
            .timeline
            .turn(last)
            .map_or(0, |t| t.charged(copy, PlayerId(0)));
        let cursors = self.timeline.cursors_mut();
        cursors.current_turn = last;
        cursors.current_top_turn = last;
        cursors.action_points_left = self.rules.ap_per_turn.saturating_sub(charged);
        self.timeline
    }
}
