//! Fixed-step session tick
//!
//! Drives one `GameState` forward: object updates while playing, the failure shake
//! and automatic reset, and stage-clear classification.

use super::block::Direction;
use super::state::{GameEvent, GamePhase, GameState, StageResult};
use crate::consts::*;

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Just-pressed direction, if any
    pub direction: Option<Direction>,
    /// Restart the stage
    pub reset: bool,
}

impl TickInput {
    pub fn push(direction: Direction) -> Self {
        Self {
            direction: Some(direction),
            reset: false,
        }
    }
}

/// Advance the session by one tick of `step` game steps
pub fn tick(state: &mut GameState, input: &TickInput, step: i32) {
    if input.reset {
        state.reset();
        return;
    }

    state.time_ticks += 1;

    // Fragments keep flying in every phase
    state.objects.update_fragments(step);

    match state.phase {
        GamePhase::Playing => play(state, input, step),
        GamePhase::Failed { shake_ticks } => {
            let shake_ticks = shake_ticks - step;
            if shake_ticks <= 0 {
                state.reset();
            } else {
                state.phase = GamePhase::Failed { shake_ticks };
            }
        }
        GamePhase::Cleared { .. } => {}
    }
}

fn play(state: &mut GameState, input: &TickInput, step: i32) {
    let report = state
        .objects
        .update(&mut state.stage, input.direction, step, &mut state.events);

    if let Some(at) = report.failure {
        log::info!(
            "stage \"{}\" failed after {} moves",
            state.def.name,
            state.moves()
        );
        state.phase = GamePhase::Failed {
            shake_ticks: FAILURE_SHAKE_TICKS,
        };
        state.events.push(GameEvent::Failed { at });
        state.events.push(GameEvent::Shake {
            ticks: FAILURE_SHAKE_TICKS,
        });
        return;
    }

    if state.objects.is_cleared() {
        let result = StageResult::new(state.moves(), state.def.bonus_moves);
        log::info!(
            "stage \"{}\" cleared in {} moves (bonus limit {}): {:?}",
            state.def.name,
            result.moves,
            result.bonus_moves,
            result.completion
        );
        state.phase = GamePhase::Cleared { result };
        state.events.push(GameEvent::Cleared(result));
    }
}
