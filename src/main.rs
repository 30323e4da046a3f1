//! Blocked headless runner
//!
//! Usage: `blocked [stage.json] [moves]`
//!
//! `moves` is a string over `LRUD`, one per player input, `.` for a pause. Every input
//! is followed by idle ticks until all blocks have settled. Without arguments a small
//! built-in stage is played. Set `RUST_LOG=debug` to see every event.

use std::path::Path;

use anyhow::{Context, Result};

use blocked::audio::{AudioManager, LogBackend};
use blocked::settings::DEFAULT_SETTINGS_PATH;
use blocked::sim::{Direction, GamePhase, GameState, TickInput, tick};
use blocked::{CompletionInfo, Settings, StageDef};

/// Upper bound on idle ticks spent waiting for blocks to settle
const MAX_SETTLE_TICKS: u32 = 10_000;

const DEMO_MOVES: &str = "R";

fn demo_stage() -> Result<StageDef> {
    StageDef::from_rows(
        "Demo",
        1,
        &[
            "#######", //
            "#1...a#", //
            "#.....#", //
            "#2...b#", //
            "#######",
        ],
    )
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (def, moves) = match args.as_slice() {
        [] => (demo_stage()?, DEMO_MOVES.to_string()),
        [path] => (StageDef::load(Path::new(path))?, String::new()),
        [path, moves, ..] => (StageDef::load(Path::new(path))?, moves.clone()),
    };

    let settings = Settings::load(Path::new(DEFAULT_SETTINGS_PATH));
    let step = settings.step();
    let mut audio = AudioManager::from_settings(LogBackend, &settings);
    let mut state = GameState::new(def, 0)?;

    for c in moves.chars() {
        let direction = match c {
            '.' => None,
            c => Some(Direction::from_char(c).with_context(|| format!("unknown move '{c}'"))?),
        };
        tick(
            &mut state,
            &TickInput {
                direction,
                reset: false,
            },
            step,
        );

        let mut waited = 0;
        while state.phase == GamePhase::Playing
            && state.objects.is_any_moving()
            && waited < MAX_SETTLE_TICKS
        {
            tick(&mut state, &TickInput::default(), step);
            waited += 1;
        }
        if waited == MAX_SETTLE_TICKS {
            log::warn!("blocks still moving after {MAX_SETTLE_TICKS} ticks");
        }

        let events = state.drain_events();
        for event in &events {
            log::debug!("{event:?}");
        }
        audio.dispatch(&events);

        if state.phase != GamePhase::Playing {
            break;
        }
    }

    match state.phase {
        GamePhase::Cleared { result } => {
            let mut progress = CompletionInfo::new(1);
            progress.update_state(1, result.completion);
            println!(
                "cleared \"{}\" in {} moves (bonus limit {}): {:?}",
                state.def.name, result.moves, result.bonus_moves, result.completion
            );
            if progress.check_if_new_ending_obtained() {
                println!("ending tier {} unlocked", progress.ending_tier());
            }
        }
        GamePhase::Failed { .. } => {
            println!(
                "failed \"{}\" after {} moves",
                state.def.name,
                state.moves()
            );
        }
        GamePhase::Playing => {
            println!(
                "\"{}\": {} moves, {} blocks remaining",
                state.def.name,
                state.moves(),
                state.objects.remaining()
            );
        }
    }

    Ok(())
}
