//! Play session state
//!
//! One stage being played: the grid, its blocks, the phase, and the event queue the
//! audio/visual collaborators drain after each tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::objects::ObjectManager;
use super::stage::Stage;
use crate::audio::SoundEffect;
use crate::progress::Completion;
use crate::stages::StageDef;

/// Result of clearing a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageResult {
    pub moves: u32,
    pub bonus_moves: u32,
    pub completion: Completion,
}

impl StageResult {
    pub fn new(moves: u32, bonus_moves: u32) -> Self {
        Self {
            moves,
            bonus_moves,
            completion: Completion::classify(moves, bonus_moves),
        }
    }
}

/// Current phase of a play session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Accepting input
    Playing,
    /// A block entered a wrong hole; the stage shakes, then resets
    Failed { shake_ticks: i32 },
    /// Every matchable block is gone
    Cleared { result: StageResult },
}

/// Fire-and-forget requests to collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PlaySound(SoundEffect),
    /// Destruction burst at a block's render position
    SpawnFragments { at: Vec2, identity: u32, count: u32 },
    MoveCounted { total: u32 },
    BlocksRemaining { count: u32 },
    /// Wrong-hole insertion at the offending block's render position
    Failed { at: Vec2 },
    Shake { ticks: i32 },
    Cleared(StageResult),
    StageReset,
}

pub struct GameState {
    /// Definition the stage is (re)built from
    pub def: StageDef,
    pub stage: Stage,
    pub objects: ObjectManager,
    pub phase: GamePhase,
    /// Fragment RNG seed, reused on every reset
    pub seed: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pristine: Stage,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(def: StageDef, seed: u64) -> anyhow::Result<Self> {
        let stage = def.build_stage()?;
        let objects = ObjectManager::from_stage(&stage, seed);
        log::info!(
            "stage \"{}\" loaded: {}x{}, {} blocks to match",
            def.name,
            stage.width(),
            stage.height(),
            objects.remaining()
        );
        Ok(Self {
            def,
            pristine: stage.clone(),
            stage,
            objects,
            phase: GamePhase::Playing,
            seed,
            time_ticks: 0,
            events: Vec::new(),
        })
    }

    /// Restore the stage to its loaded layout
    pub fn reset(&mut self) {
        self.stage = self.pristine.clone();
        self.objects = ObjectManager::from_stage(&self.stage, self.seed);
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::StageReset);
        log::info!("stage \"{}\" reset", self.def.name);
    }

    pub fn moves(&self) -> u32 {
        self.objects.moves()
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.phase, GamePhase::Failed { .. })
    }

    pub fn result(&self) -> Option<StageResult> {
        match self.phase {
            GamePhase::Cleared { result } => Some(result),
            _ => None,
        }
    }

    /// Remaining shake ticks, 0 when not shaking
    pub fn shake(&self) -> i32 {
        match self.phase {
            GamePhase::Failed { shake_ticks } => shake_ticks,
            _ => 0,
        }
    }

    /// Events queued since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Direction;

    fn def() -> StageDef {
        StageDef::from_rows("test", 2, &["#....#", "#1..a#", "######"]).unwrap()
    }

    #[test]
    fn test_new_state() {
        let state = GameState::new(def(), 1).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.objects.remaining(), 1);
        assert_eq!(state.moves(), 0);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_reset_restores_layout() {
        let mut state = GameState::new(def(), 1).unwrap();
        let mut events = Vec::new();
        state
            .objects
            .update(&mut state.stage, Some(Direction::Right), 1, &mut events);
        assert_eq!(state.moves(), 1);

        state.reset();
        assert_eq!(state.moves(), 0);
        assert!(!state.objects.is_any_moving());
        assert_eq!(state.drain_events(), vec![GameEvent::StageReset]);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_stage_result_classification() {
        assert_eq!(
            StageResult::new(3, 4).completion,
            Completion::ClearedWithBonus
        );
        assert_eq!(StageResult::new(4, 4).completion, Completion::ClearedWithBonus);
        assert_eq!(StageResult::new(5, 4).completion, Completion::Cleared);
    }
}
