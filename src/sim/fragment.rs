//! Destruction fragments
//!
//! A destroyed block bursts into a 4x4 grid of sub-tile pieces flying away from its
//! centre. Purely visual, but the spawn parameters are deterministic for a given seed.

use glam::{IVec2, Vec2};
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// One flying piece of a destroyed block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fragment {
    /// Centre in pixels
    pub pos: Vec2,
    /// Pixels per step
    pub speed: Vec2,
    /// Top-left of the source region in the block sheet
    pub src: IVec2,
    /// Source region size
    pub size: IVec2,
    pub timer: i32,
    pub max_time: i32,
    pub alive: bool,
}

impl Fragment {
    fn spawn(&mut self, pos: Vec2, speed: Vec2, src: IVec2, size: IVec2, time: i32) {
        *self = Self {
            pos,
            speed,
            src,
            size,
            timer: time,
            max_time: time,
            alive: true,
        };
    }

    pub fn update(&mut self, step: i32) {
        if !self.alive {
            return;
        }
        self.timer -= step;
        if self.timer <= 0 {
            self.alive = false;
        }
        self.pos += self.speed * step as f32;
    }

    /// Remaining life in [0, 1]
    pub fn life(&self) -> f32 {
        if self.max_time <= 0 {
            return 0.0;
        }
        (self.timer as f32 / self.max_time as f32).clamp(0.0, 1.0)
    }
}

/// Reusable fragment storage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FragmentPool {
    fragments: Vec<Fragment>,
}

impl FragmentPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// First dead fragment, or a fresh one
    fn next_free(&mut self) -> &mut Fragment {
        let idx = match self.fragments.iter().position(|f| !f.alive) {
            Some(i) => i,
            None => {
                self.fragments.push(Fragment::default());
                self.fragments.len() - 1
            }
        };
        &mut self.fragments[idx]
    }

    /// Burst a destroyed block drawn at `render_pos` (top-left, pixels).
    /// Returns the number of fragments spawned.
    pub fn spawn_burst(&mut self, render_pos: Vec2, identity: u32, rng: &mut Pcg32) -> usize {
        let center = Vec2::splat(TILE_SIZE as f32 / 2.0);
        let half = Vec2::splat(FRAGMENT_SIZE as f32 / 2.0);
        let mut count = 0;

        for j in 0..FRAGMENTS_PER_AXIS {
            for i in 0..FRAGMENTS_PER_AXIS {
                let cell = IVec2::new(i, j) * FRAGMENT_SIZE;
                let offset = cell.as_vec2() + half;
                let speed = (offset - center).normalize_or_zero()
                    * (FRAGMENT_BASE_SPEED + rng.random_range(0.0..FRAGMENT_SPEED_VARIANCE));
                let src = IVec2::new(identity as i32 * TILE_SIZE, 0) + cell;

                self.next_free().spawn(
                    render_pos + offset,
                    speed,
                    src,
                    IVec2::splat(FRAGMENT_SIZE),
                    FRAGMENT_LIFETIME,
                );
                count += 1;
            }
        }
        count
    }

    pub fn update(&mut self, step: i32) {
        for fragment in &mut self.fragments {
            fragment.update(step);
        }
    }

    pub fn alive(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter().filter(|f| f.alive)
    }

    pub fn alive_count(&self) -> usize {
        self.alive().count()
    }

    /// Allocated slots, alive or not
    pub fn capacity(&self) -> usize {
        self.fragments.len()
    }
}
