//! Block entity and its movement state machine

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::stage::{Solid, Stage};
use crate::consts::*;

/// Player intent for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Unit grid step
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
        }
    }

    /// Parse a move-script character (`L`, `R`, `U`, `D`, any case)
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'L' => Some(Direction::Left),
            'R' => Some(Direction::Right),
            'U' => Some(Direction::Up),
            'D' => Some(Direction::Down),
            _ => None,
        }
    }
}

/// Movement state of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockState {
    /// At rest; its cell is committed to the solid grid
    Idle,
    /// Sliding from `pos` to `target` while `timer` counts down
    Moving {
        target: IVec2,
        timer: i32,
        /// The unwrapped destination fell off the grid edge
        wrapping: bool,
    },
    /// Entered its matching hole. The hole stays plugged until `released`.
    Destroyed { released: bool },
}

/// What happened to a block during one update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    None,
    /// Arrived and could not keep sliding
    Stopped,
    /// Arrived on its matching hole and was destroyed
    RightHole,
    /// Arrived on a hole of another color
    WrongHole,
}

/// A pushable block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Grid position (last tile reached)
    pub pos: IVec2,
    /// Last movement direction, kept after arrival so the block keeps sliding
    pub dir: IVec2,
    /// 0 = neutral, 1+ = must end in the hole of color identity - 1
    pub identity: u32,
    pub state: BlockState,
}

impl Block {
    pub fn new(pos: IVec2, identity: u32) -> Self {
        Self {
            pos,
            dir: IVec2::ZERO,
            identity,
            state: BlockState::Idle,
        }
    }

    pub fn exists(&self) -> bool {
        !matches!(self.state, BlockState::Destroyed { .. })
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.state, BlockState::Moving { .. })
    }

    pub fn is_wrapping(&self) -> bool {
        matches!(self.state, BlockState::Moving { wrapping: true, .. })
    }

    /// Counts toward the stage clear condition
    pub fn is_matchable(&self) -> bool {
        self.identity != 0 && self.exists()
    }

    /// Destination while moving, otherwise the current cell
    pub fn target(&self) -> IVec2 {
        match self.state {
            BlockState::Moving { target, .. } => target,
            _ => self.pos,
        }
    }

    /// Offer the tick's directional intent. Returns true if the block started moving.
    pub fn handle_controls(&mut self, intent: Option<Direction>, stage: &mut Stage) -> bool {
        if !self.exists() || self.is_moving() {
            return false;
        }
        match intent {
            Some(dir) => self.move_to(dir.delta(), stage),
            None => false,
        }
    }

    /// Start sliding one tile by `delta` if the (wrapped) destination is free.
    /// Frees the source cell immediately so a trailing block can follow.
    pub fn move_to(&mut self, delta: IVec2, stage: &mut Stage) -> bool {
        if self.is_moving() || !self.exists() {
            return false;
        }
        let next = self.pos + delta;
        if !stage.solid_at(next).is_free() {
            return false;
        }

        self.dir = delta;
        self.state = BlockState::Moving {
            target: stage.wrap(next),
            timer: BLOCK_MOVE_TIME,
            wrapping: !stage.in_bounds(next),
        };
        stage.set_solid_at(self.pos, Solid::Free);
        true
    }

    /// Advance the movement timer by `step`.
    ///
    /// `any_moving` gates the release of a plugged hole: a destroyed block frees its
    /// cell only on a tick where no block is in motion.
    pub fn update(&mut self, any_moving: bool, stage: &mut Stage, step: i32) -> MoveOutcome {
        match self.state {
            BlockState::Idle | BlockState::Destroyed { released: true } => MoveOutcome::None,
            BlockState::Destroyed { released: false } => {
                if !any_moving {
                    stage.set_solid_at(self.pos, Solid::Free);
                    self.state = BlockState::Destroyed { released: true };
                }
                MoveOutcome::None
            }
            BlockState::Moving {
                target,
                timer,
                wrapping,
            } => {
                let timer = timer - step;
                if timer > 0 {
                    self.state = BlockState::Moving {
                        target,
                        timer,
                        wrapping,
                    };
                    return MoveOutcome::None;
                }
                self.arrive(target, stage)
            }
        }
    }

    fn arrive(&mut self, target: IVec2, stage: &mut Stage) -> MoveOutcome {
        // Position commits before the hole check, so a failed block sits in the wrong hole
        self.pos = target;

        if self.identity != 0 {
            let hole = stage.check_hole_tile(self.pos.x, self.pos.y, self.identity);
            if hole.is_hole {
                if hole.matches {
                    self.state = BlockState::Destroyed { released: false };
                    stage.set_solid_at(self.pos, Solid::Occupied);
                    return MoveOutcome::RightHole;
                }
                self.state = BlockState::Moving {
                    target: self.pos,
                    timer: 0,
                    wrapping: false,
                };
                return MoveOutcome::WrongHole;
            }
        }

        // Keep sliding in the same direction if possible
        self.state = BlockState::Idle;
        if self.move_to(self.dir, stage) {
            return MoveOutcome::None;
        }
        stage.set_solid_at(self.pos, Solid::Occupied);
        MoveOutcome::Stopped
    }

    /// Abort a movement whose target became solid and settle in place.
    /// Returns true if a repair happened.
    pub fn safe_check(&mut self, stage: &mut Stage) -> bool {
        let BlockState::Moving { target, .. } = self.state else {
            return false;
        };
        if stage.solid_at(target).is_free() {
            return false;
        }
        log::debug!(
            "safe check: block at {} lost target {}, settling",
            self.pos,
            target
        );
        self.state = BlockState::Idle;
        stage.set_solid_at(self.pos, Solid::Occupied);
        true
    }

    /// Interpolated pixel position (top-left corner of the sprite).
    ///
    /// A wrapping block interpolates toward its unwrapped destination, past the grid edge.
    pub fn render_pos(&self) -> Vec2 {
        let from = (self.pos * TILE_SIZE).as_vec2();
        match self.state {
            BlockState::Moving {
                target,
                timer,
                wrapping,
            } => {
                let t = (timer as f32 / BLOCK_MOVE_TIME as f32).clamp(0.0, 1.0);
                let to = if wrapping { self.pos + self.dir } else { target };
                let to = (to * TILE_SIZE).as_vec2();
                (from * t + to * (1.0 - t)).round()
            }
            _ => from,
        }
    }

    /// Second draw position for a wrapping block, offset by one full stage
    pub fn mirror_render_pos(&self, stage: &Stage) -> Option<Vec2> {
        if !self.is_wrapping() {
            return None;
        }
        let offset = (self.dir * stage.size() * TILE_SIZE).as_vec2();
        Some(self.render_pos() - offset)
    }
}
