//! Blocked - a toroidal block-pushing puzzle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (stage grid, blocks, simultaneous move resolution)
//! - `progress`: Per-stage completion states and ending unlocks
//! - `stages`: Stage definitions and the numbered stage catalog
//! - `persistence`: Flat save file for completion progress
//! - `settings`: User preferences
//! - `audio`: Sound effect routing

pub mod audio;
pub mod persistence;
pub mod progress;
pub mod settings;
pub mod sim;
pub mod stages;

pub use progress::{Completion, CompletionInfo};
pub use settings::Settings;
pub use stages::{StageCatalog, StageDef};

use glam::IVec2;

/// Game configuration constants
pub mod consts {
    /// Ticks a block needs to slide one tile
    pub const BLOCK_MOVE_TIME: i32 = 8;
    /// Tile edge length in pixels
    pub const TILE_SIZE: i32 = 16;

    /// Destruction fragments per axis (4x4 burst per block)
    pub const FRAGMENTS_PER_AXIS: i32 = 4;
    /// Fragment edge length in pixels
    pub const FRAGMENT_SIZE: i32 = TILE_SIZE / FRAGMENTS_PER_AXIS;
    /// Radial fragment speed (pixels per step)
    pub const FRAGMENT_BASE_SPEED: f32 = 0.5;
    /// Random extra radial speed, uniform in [0, variance)
    pub const FRAGMENT_SPEED_VARIANCE: f32 = 0.5;
    /// Fragment lifetime in ticks
    pub const FRAGMENT_LIFETIME: i32 = 30;

    /// Stage shake after a wrong-hole insertion, before the stage resets
    pub const FAILURE_SHAKE_TICKS: i32 = 60;

    /// Highest ending tier (every stage cleared within its bonus move limit)
    pub const MAX_ENDING_TIER: u8 = 2;
}

/// Floor-style modulus: negative inputs wrap into [0, n)
#[inline]
pub fn neg_mod(m: i32, n: i32) -> i32 {
    m.rem_euclid(n)
}

/// Wrap a grid position onto a toroidal field of the given size
#[inline]
pub fn wrap_point(p: IVec2, size: IVec2) -> IVec2 {
    IVec2::new(neg_mod(p.x, size.x), neg_mod(p.y, size.y))
}
