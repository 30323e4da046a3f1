//! Stage definitions and the numbered stage catalog
//!
//! Stages are stored as JSON files named `1.json`, `2.json`, ... in one directory.
//! The catalog loads them in order and stops at the first missing number.

use std::fs;
use std::path::Path;

use anyhow::{Context, bail, ensure};
use serde::{Deserialize, Serialize};

use crate::sim::Stage;
use crate::sim::stage::{TILE_FLOOR, TILE_HOLE_FIRST, TILE_SPAWN_FIRST, TILE_WALL};

fn default_difficulty() -> u32 {
    1
}

/// One stage as authored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDef {
    pub name: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: u32,
    /// Clearing in at most this many moves earns the bonus result
    pub bonus_moves: u32,
    pub width: i32,
    pub height: i32,
    /// Row-major tile ids
    pub tiles: Vec<i32>,
}

impl StageDef {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.width > 0 && self.height > 0,
            "stage \"{}\" has non-positive size {}x{}",
            self.name,
            self.width,
            self.height
        );
        let Some(cells) = self.width.checked_mul(self.height) else {
            bail!(
                "stage \"{}\" size {}x{} is too large",
                self.name,
                self.width,
                self.height
            );
        };
        ensure!(
            self.tiles.len() == cells as usize,
            "stage \"{}\" is {}x{} but has {} tiles",
            self.name,
            self.width,
            self.height,
            self.tiles.len()
        );
        Ok(())
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let def: StageDef = serde_json::from_str(json).context("invalid stage JSON")?;
        def.validate()?;
        Ok(def)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read stage {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("in {}", path.display()))
    }

    /// Build a stage from ASCII rows.
    ///
    /// `#` wall, `.` floor, `a`-`d` holes of color 0-3, `0`-`9` a block with that identity.
    pub fn from_rows(name: &str, bonus_moves: u32, rows: &[&str]) -> anyhow::Result<Self> {
        let height = rows.len() as i32;
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0) as i32;
        let mut tiles = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            ensure!(
                row.chars().count() as i32 == width,
                "row {y} of stage \"{name}\" has a different width"
            );
            for c in row.chars() {
                let id = match c {
                    '#' => TILE_WALL,
                    '.' => TILE_FLOOR,
                    'a'..='d' => TILE_HOLE_FIRST + (c as i32 - 'a' as i32),
                    '0'..='9' => TILE_SPAWN_FIRST + (c as i32 - '0' as i32),
                    other => bail!("unknown tile '{other}' in stage \"{name}\""),
                };
                tiles.push(id);
            }
        }

        let def = Self {
            name: name.to_string(),
            difficulty: default_difficulty(),
            bonus_moves,
            width,
            height,
            tiles,
        };
        def.validate()?;
        Ok(def)
    }

    pub fn build_stage(&self) -> anyhow::Result<Stage> {
        Stage::new(self.width, self.height, self.tiles.clone())
            .with_context(|| format!("building stage \"{}\"", self.name))
    }
}

/// All stages in play order
#[derive(Debug, Clone, Default)]
pub struct StageCatalog {
    entries: Vec<StageDef>,
}

impl StageCatalog {
    pub fn from_defs(entries: Vec<StageDef>) -> Self {
        Self { entries }
    }

    /// Load `1.json`, `2.json`, ... from `dir` until a number is missing
    pub fn load_dir(dir: &Path) -> anyhow::Result<Self> {
        let mut entries = Vec::new();
        for index in 1.. {
            let path = dir.join(format!("{index}.json"));
            if !path.is_file() {
                break;
            }
            entries.push(StageDef::load(&path)?);
        }
        log::info!("Loaded {} stages from {}", entries.len(), dir.display());
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stage by 1-based number
    pub fn get(&self, index: usize) -> Option<&StageDef> {
        index.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    /// Name and difficulty for the level menu, `("null", 1)` when out of range
    pub fn info(&self, index: usize) -> (&str, u32) {
        match self.get(index) {
            Some(def) => (def.name.as_str(), def.difficulty),
            None => ("null", default_difficulty()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &StageDef> {
        self.entries.iter()
    }
}
