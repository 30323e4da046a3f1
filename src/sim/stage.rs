//! Stage grid: static tile ids plus the mutable solid overlay
//!
//! One grid, two kinds of access:
//! - `get_tile` / `tile_kind` clip: out-of-range reads return the caller's default
//! - `get_solid` / `update_solid_tile` wrap: the playfield is toroidal

use anyhow::{Context, ensure};
use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::wrap_point;

/// Empty floor
pub const TILE_FLOOR: i32 = 0;
/// Permanent wall
pub const TILE_WALL: i32 = 1;
/// First hole tile (hole color 0)
pub const TILE_HOLE_FIRST: i32 = 2;
/// Last hole tile (hole color 3)
pub const TILE_HOLE_LAST: i32 = 5;
/// First block spawn tile (identity 0); identity = id - TILE_SPAWN_FIRST
pub const TILE_SPAWN_FIRST: i32 = 9;

/// Static meaning of a tile id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Floor,
    Wall,
    /// Hole with color 0-3; accepts blocks whose identity is color + 1
    Hole { color: u32 },
    /// Initial block position
    Spawn { identity: u32 },
}

impl TileKind {
    pub fn from_id(id: i32) -> Self {
        match id {
            TILE_WALL => TileKind::Wall,
            TILE_HOLE_FIRST..=TILE_HOLE_LAST => TileKind::Hole {
                color: (id - TILE_HOLE_FIRST) as u32,
            },
            id if id >= TILE_SPAWN_FIRST => TileKind::Spawn {
                identity: (id - TILE_SPAWN_FIRST) as u32,
            },
            // Decorative ids (6-8) and anything negative behave as floor
            _ => TileKind::Floor,
        }
    }
}

/// Occupancy of a cell in the solid overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Solid {
    #[default]
    Free = 0,
    /// Permanently solid
    Wall = 1,
    /// A block rests here (or a destroyed block still plugs its hole)
    Occupied = 2,
}

impl Solid {
    pub fn is_free(self) -> bool {
        self == Solid::Free
    }
}

/// Result of landing on a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoleCheck {
    /// The tile is a hole of any color
    pub is_hole: bool,
    /// The hole color matches the block identity
    pub matches: bool,
}

/// One level's tile grid with its solid overlay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    width: i32,
    height: i32,
    tiles: Vec<i32>,
    solid: Vec<Solid>,
}

impl Stage {
    /// Build a stage from row-major tile ids. Walls start solid, spawn tiles start occupied.
    pub fn new(width: i32, height: i32, tiles: Vec<i32>) -> anyhow::Result<Self> {
        ensure!(
            width > 0 && height > 0,
            "stage dimensions must be positive, got {width}x{height}"
        );
        let cells = width
            .checked_mul(height)
            .with_context(|| format!("stage dimensions {width}x{height} are too large"))?;
        ensure!(
            tiles.len() == cells as usize,
            "stage is {width}x{height} but has {} tiles",
            tiles.len()
        );

        let solid = tiles
            .iter()
            .map(|&id| match TileKind::from_id(id) {
                TileKind::Wall => Solid::Wall,
                TileKind::Spawn { .. } => Solid::Occupied,
                _ => Solid::Free,
            })
            .collect();

        Ok(Self {
            width,
            height,
            tiles,
            solid,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width, self.height)
    }

    /// Whether (x, y) lies on the grid without wrapping
    pub fn in_bounds(&self, p: IVec2) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    /// Reduce a position onto the toroidal grid
    pub fn wrap(&self, p: IVec2) -> IVec2 {
        wrap_point(p, self.size())
    }

    fn index(&self, p: IVec2) -> usize {
        (p.y * self.width + p.x) as usize
    }

    /// Clipped tile lookup; `default` outside the grid
    pub fn get_tile(&self, x: i32, y: i32, default: i32) -> i32 {
        let p = IVec2::new(x, y);
        if !self.in_bounds(p) {
            return default;
        }
        self.tiles[self.index(p)]
    }

    /// Clipped tile classification; floor outside the grid
    pub fn tile_kind(&self, x: i32, y: i32) -> TileKind {
        TileKind::from_id(self.get_tile(x, y, TILE_FLOOR))
    }

    /// Wrapping solid lookup
    pub fn get_solid(&self, x: i32, y: i32) -> Solid {
        let p = self.wrap(IVec2::new(x, y));
        self.solid[self.index(p)]
    }

    pub fn solid_at(&self, p: IVec2) -> Solid {
        self.get_solid(p.x, p.y)
    }

    /// Wrapping solid write
    pub fn update_solid_tile(&mut self, x: i32, y: i32, value: Solid) {
        let p = self.wrap(IVec2::new(x, y));
        let idx = self.index(p);
        self.solid[idx] = value;
    }

    pub fn set_solid_at(&mut self, p: IVec2, value: Solid) {
        self.update_solid_tile(p.x, p.y, value);
    }

    /// Check the tile a block with `identity` just landed on
    pub fn check_hole_tile(&self, x: i32, y: i32, identity: u32) -> HoleCheck {
        match self.tile_kind(x, y) {
            TileKind::Hole { color } => HoleCheck {
                is_hole: true,
                matches: identity.checked_sub(1) == Some(color),
            },
            _ => HoleCheck::default(),
        }
    }

    /// Block spawn points in row-major order
    pub fn spawn_points(&self) -> impl Iterator<Item = (IVec2, u32)> + '_ {
        self.tiles.iter().enumerate().filter_map(|(i, &id)| match TileKind::from_id(id) {
            TileKind::Spawn { identity } => {
                let i = i as i32;
                Some((IVec2::new(i % self.width, i / self.width), identity))
            }
            _ => None,
        })
    }

    /// Number of cells holding the given solid value
    pub fn count_solid(&self, value: Solid) -> usize {
        self.solid.iter().filter(|&&s| s == value).count()
    }
}
