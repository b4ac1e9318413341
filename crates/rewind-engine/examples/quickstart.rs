//! Walk one copy for a few turns, flash back, and collide with the past.
//!
//! Run with `RUST_LOG=debug` to see resolution outcomes.

use rewind_core::{Rules, Vec3};
use rewind_engine::{Command, Mode, Session, TimelineWorld, DEFAULT_DUMP_PATH};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    println!("=== Rewind Quickstart ===\n");

    let rules = Rules {
        initial_flashback_charges: 1,
        ..Rules::default()
    };
    let mut session = Session::new(TimelineWorld::new(rules, Vec3::ZERO)?);

    // Turns 0..3: walk right one cell per turn.
    for turn in 0..3 {
        let here = session.view().frame.get(session.view().current_copy).map(|s| s.position);
        let target = here.unwrap_or(Vec3::ZERO) + Vec3::new(10.0, 0.0, 0.0);
        session.handle(Command::RequestMove(target))?;
        let view = session.handle(Command::NextTurn)?;
        println!(
            "turn {turn}: moved to {target:?}, charges {}",
            view.flashback_charges
        );
    }

    // Rewind and spawn a second copy right where the first one will step.
    session.handle(Command::EnterMode(Mode::Flashback))?;
    let view = session.handle(Command::RequestFlashback(Vec3::new(20.0, 0.0, 0.0)))?;
    println!(
        "\nflashback: copy {} now authoring turn {}",
        view.current_copy, view.current_turn
    );

    // Step into the cell the original copy is about to enter.
    let view = session.handle(Command::RequestMove(Vec3::new(10.0, 0.0, 0.0)))?;
    println!(
        "copy {} requested a move, {} AP left",
        view.current_copy, view.action_points_left
    );

    let world = session.world();
    println!(
        "canceled moves after the fork: {}",
        world.resolutions().canceled_count()
    );
    for offset in [0, 5, 10, 100, 200] {
        let snap = world.snapshot_at(offset);
        for (copy, state) in snap.visible() {
            println!("  t={offset:>3} copy {copy}: {:?}", state.position);
        }
    }

    if std::env::var_os("REWIND_DUMP").is_some() {
        world.dump(DEFAULT_DUMP_PATH)?;
        println!("\ndumped timeline to {DEFAULT_DUMP_PATH}");
    }
    Ok(())
}
