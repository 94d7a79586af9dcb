//! Noodle Chef headless runner
//!
//! Plays one run with the autopilot at a fixed 60 fps frame time and logs
//! what happens. Prints the final frame snapshot as JSON on stdout.
//!
//! Usage: `noodle-chef [settings.json]`

use std::time::{SystemTime, UNIX_EPOCH};

use noodle_chef::Settings;
use noodle_chef::consts::PHYSICS_DT;
use noodle_chef::sim::{FrameScheduler, GameEvent, GameSession, RunState, autopilot_input};

fn main() {
    env_logger::init();
    log::info!("Noodle Chef (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };

    let seed = settings.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });
    log::info!("Session seed: {}", seed);

    let difficulty = settings.difficulty;
    let run_seconds = settings.run_seconds.max(0.0) as f64;
    let mut session = GameSession::new(settings, seed);
    let mut frames = FrameScheduler::new();

    session.start_run(difficulty);

    let (mut caught, mut missed, mut deflected) = (0u32, 0u32, 0u32);
    while session.run_state == RunState::Playing && session.clock < run_seconds {
        let input = autopilot_input(&session);
        frames.advance(&mut session, &input, PHYSICS_DT);

        for event in session.drain_events() {
            match event {
                GameEvent::Caught { kind, .. } => {
                    caught += 1;
                    log::info!(
                        "Caught {:?} (soup {}%)",
                        kind,
                        session.soup_quality.round()
                    );
                }
                GameEvent::Missed { kind, .. } => {
                    missed += 1;
                    log::info!(
                        "Missed {:?} (panic {}%)",
                        kind,
                        session.panic_level.round()
                    );
                }
                GameEvent::Deflected { side, .. } => {
                    deflected += 1;
                    log::debug!("{:?} hand swat", side);
                }
                GameEvent::Sound(cue) => log::trace!("Sound {:?}", cue),
                GameEvent::MusicStart { volume } => log::debug!("Music on at {:.2}", volume),
                GameEvent::MusicStop => log::debug!("Music off"),
                GameEvent::Won | GameEvent::Lost => {}
            }
        }
    }

    match session.run_state {
        RunState::Won => log::info!("Soup served after {:.1}s", session.clock),
        RunState::Lost => log::info!("Chef panicked after {:.1}s", session.clock),
        _ => log::info!("Time up after {:.1}s", session.clock),
    }
    log::info!(
        "Caught {}, missed {}, swatted {} on {}",
        caught,
        missed,
        deflected,
        difficulty.as_str()
    );

    match serde_json::to_string_pretty(&session.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize snapshot: {}", e),
    }
}
