//! Object manager: owns the blocks and resolves simultaneous movement
//!
//! Blocks are kept in spawn order (row-major scan of the stage) and every pass walks
//! them in that order, so an earlier block always wins a contested cell.

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::block::{Block, Direction, MoveOutcome};
use super::fragment::FragmentPool;
use super::stage::{Solid, Stage};
use super::state::GameEvent;
use crate::audio::SoundEffect;

/// Aggregate result of one object update
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// At least one block started moving from player input (counts as one move)
    pub moved: bool,
    /// Blocks destroyed in their matching hole this tick
    pub destroyed: u32,
    /// Render position of the block that entered a wrong hole
    pub failure: Option<Vec2>,
    /// Movements aborted by the safe-check pass
    pub repairs: u32,
}

pub struct ObjectManager {
    blocks: Vec<Block>,
    fragments: FragmentPool,
    rng: Pcg32,
    remaining: u32,
    moves: u32,
}

impl ObjectManager {
    pub fn new(seed: u64) -> Self {
        Self {
            blocks: Vec::new(),
            fragments: FragmentPool::new(),
            rng: Pcg32::seed_from_u64(seed),
            remaining: 0,
            moves: 0,
        }
    }

    /// Create one block per spawn tile. Spawn cells are already occupied in `stage`.
    pub fn from_stage(stage: &Stage, seed: u64) -> Self {
        let mut objects = Self::new(seed);
        for (pos, identity) in stage.spawn_points() {
            objects.push_block(Block::new(pos, identity));
        }
        log::debug!(
            "spawned {} blocks, {} to match",
            objects.blocks.len(),
            objects.remaining
        );
        objects
    }

    /// Place a block and commit its cell
    pub fn add_block(&mut self, stage: &mut Stage, pos: IVec2, identity: u32) {
        stage.set_solid_at(pos, Solid::Occupied);
        self.push_block(Block::new(stage.wrap(pos), identity));
    }

    fn push_block(&mut self, block: Block) {
        if block.is_matchable() {
            self.remaining += 1;
        }
        self.blocks.push(block);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn fragments(&self) -> &FragmentPool {
        &self.fragments
    }

    /// Matchable blocks not yet destroyed
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Player moves counted so far
    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_cleared(&self) -> bool {
        self.remaining == 0
    }

    pub fn is_any_moving(&self) -> bool {
        self.blocks.iter().any(|b| b.is_moving())
    }

    /// Offer `dir` to every block until a full pass starts nothing new.
    /// A block that starts moving frees its cell, letting a block behind it follow
    /// on the next pass. Returns true if any block started.
    fn resolve_input(&mut self, stage: &mut Stage, dir: Direction) -> bool {
        let mut any_started = false;
        // Every productive pass starts at least one idle block
        for _ in 0..=self.blocks.len() {
            let mut started = false;
            for block in &mut self.blocks {
                if block.handle_controls(Some(dir), stage) {
                    started = true;
                }
            }
            if !started {
                return any_started;
            }
            any_started = true;
        }
        log::warn!("move resolution did not settle within the pass bound");
        any_started
    }

    /// Run one simulation tick over all blocks.
    ///
    /// Stops at the first wrong-hole arrival and reports it in `TickReport::failure`;
    /// blocks after it are not advanced and the safe-check pass is skipped.
    pub fn update(
        &mut self,
        stage: &mut Stage,
        input: Option<Direction>,
        step: i32,
        events: &mut Vec<GameEvent>,
    ) -> TickReport {
        let mut report = TickReport::default();

        if let Some(dir) = input {
            if !self.is_any_moving() {
                report.moved = self.resolve_input(stage, dir);
            }
        }
        if report.moved {
            self.moves += 1;
            log::debug!("move {} ({:?})", self.moves, input);
            events.push(GameEvent::MoveCounted { total: self.moves });
        }

        let any_moving = self.is_any_moving();
        let mut bumped = false;
        for i in 0..self.blocks.len() {
            let outcome = self.blocks[i].update(any_moving, stage, step);
            match outcome {
                MoveOutcome::None => {}
                MoveOutcome::Stopped => bumped = true,
                MoveOutcome::WrongHole => {
                    let at = self.blocks[i].render_pos();
                    log::debug!("block {} entered a wrong hole at {}", i, self.blocks[i].pos);
                    events.push(GameEvent::PlaySound(SoundEffect::Failure));
                    report.failure = Some(at);
                    return report;
                }
                MoveOutcome::RightHole => {
                    let block = &self.blocks[i];
                    let at = block.render_pos();
                    let identity = block.identity;
                    let count = self.fragments.spawn_burst(at, identity, &mut self.rng);

                    self.remaining = self.remaining.saturating_sub(1);
                    report.destroyed += 1;
                    log::debug!(
                        "block {} destroyed at {}, {} remaining",
                        i,
                        self.blocks[i].pos,
                        self.remaining
                    );

                    events.push(GameEvent::SpawnFragments {
                        at,
                        identity,
                        count: count as u32,
                    });
                    events.push(GameEvent::PlaySound(SoundEffect::Destroy));
                    events.push(GameEvent::BlocksRemaining {
                        count: self.remaining,
                    });
                }
            }
        }
        if bumped {
            events.push(GameEvent::PlaySound(SoundEffect::Hit));
        }

        report.repairs = self.safe_check(stage);
        report
    }

    /// Abort every movement whose target became solid. Returns the number of repairs.
    ///
    /// A repaired block re-occupies its cell, which can strand a block earlier in the
    /// order that is sliding toward it, so passes repeat until one repairs nothing.
    pub fn safe_check(&mut self, stage: &mut Stage) -> u32 {
        let mut repairs = 0;
        // Every productive pass settles at least one moving block
        for _ in 0..=self.blocks.len() {
            let pass: u32 = self
                .blocks
                .iter_mut()
                .map(|b| b.safe_check(stage) as u32)
                .sum();
            if pass == 0 {
                return repairs;
            }
            repairs += pass;
        }
        log::warn!("safe check did not settle within the pass bound");
        repairs
    }

    /// Advance destruction fragments
    pub fn update_fragments(&mut self, step: i32) {
        self.fragments.update(step);
    }
}
