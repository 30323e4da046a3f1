//! Stage completion tracking
//!
//! Best result per stage plus the ending tier already shown to the player.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_ENDING_TIER;

/// Best result achieved on a stage
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum Completion {
    #[default]
    NotCleared = 0,
    Cleared = 1,
    /// Cleared within the stage's bonus move limit
    ClearedWithBonus = 2,
}

impl Completion {
    /// Classify a clear by its move count
    pub fn classify(moves: u32, bonus_moves: u32) -> Self {
        if moves <= bonus_moves {
            Completion::ClearedWithBonus
        } else {
            Completion::Cleared
        }
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(Completion::NotCleared),
            1 => Some(Completion::Cleared),
            2 => Some(Completion::ClearedWithBonus),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// Per-stage completion states (stages are numbered from 1)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionInfo {
    pub(crate) states: Vec<Completion>,
    pub(crate) ending_tier: u8,
    /// Stage selected in the level menu
    pub current_stage: usize,
}

impl CompletionInfo {
    pub fn new(stage_count: usize) -> Self {
        Self {
            states: vec![Completion::NotCleared; stage_count],
            ending_tier: 0,
            current_stage: 1,
        }
    }

    pub fn stage_count(&self) -> usize {
        self.states.len()
    }

    /// Record a result; keeps the better of the stored and new state.
    /// Out-of-range stages are ignored.
    pub fn update_state(&mut self, index: usize, state: Completion) {
        if index < 1 || index > self.stage_count() {
            return;
        }
        let slot = &mut self.states[index - 1];
        *slot = (*slot).max(state);
    }

    /// Stored state, `NotCleared` when out of range
    pub fn get_state(&self, index: usize) -> Completion {
        if index < 1 || index > self.stage_count() {
            return Completion::NotCleared;
        }
        self.states[index - 1]
    }

    pub fn states(&self) -> &[Completion] {
        &self.states
    }

    /// Ending tier already shown (0 = none)
    pub fn ending_tier(&self) -> u8 {
        self.ending_tier
    }

    /// True once per tier: when every stage beats the ending already shown.
    /// Raises the shown tier to the weakest stage result. With no stages at all the
    /// best ending counts as earned.
    pub fn check_if_new_ending_obtained(&mut self) -> bool {
        let min = self
            .states
            .iter()
            .map(|s| s.as_byte())
            .fold(MAX_ENDING_TIER, u8::min);
        if min <= self.ending_tier {
            return false;
        }
        self.ending_tier = min;
        log::info!("ending tier {} unlocked", self.ending_tier);
        true
    }

    /// Forget all progress
    pub fn clear(&mut self) {
        self.states.fill(Completion::NotCleared);
        self.ending_tier = 0;
    }
}
