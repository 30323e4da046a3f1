//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Integer time steps only
//! - Seeded RNG only
//! - Stable iteration order (block spawn order)
//! - No rendering or platform dependencies

pub mod block;
pub mod fragment;
pub mod objects;
pub mod stage;
pub mod state;
pub mod tick;

pub use block::{Block, BlockState, Direction, MoveOutcome};
pub use fragment::{Fragment, FragmentPool};
pub use objects::{ObjectManager, TickReport};
pub use stage::{HoleCheck, Solid, Stage, TileKind};
pub use state::{GameEvent, GamePhase, GameState, StageResult};
pub use tick::{TickInput, tick};
