#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use error::*;
pub use grid::*;
pub use session::*;
pub use shuffle::*;
pub use tile::*;
pub use types::*;

mod error;
mod grid;
mod session;
mod shuffle;
mod tile;
mod types;

/// Board layout and mine budget for one round.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub cols: Coord,
    pub rows: Coord,
    pub tile_size: Pixel,
    pub padding: Pixel,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn total_cells(&self) -> CellCount {
        mult(self.cols, self.rows)
    }

    /// Mines actually placed: the requested count capped at the cell total.
    pub fn effective_mines(&self) -> CellCount {
        self.mines.min(self.total_cells())
    }

    pub fn safe_total(&self) -> CellCount {
        self.total_cells() - self.effective_mines()
    }

    /// Clamps degenerate values coming from an untrusted level file so the
    /// pixel hit-test never divides by zero and the board is never empty.
    pub fn sanitized(mut self) -> Self {
        self.cols = self.cols.max(1);
        self.rows = self.rows.max(1);
        self.tile_size = self.tile_size.max(1);
        self.padding = self.padding.max(0);
        self
    }

    /// Overwrites only the fields the level file actually provides.
    pub fn apply_level(&mut self, level: &LevelConfig) {
        if let Some(cols) = level.cols {
            self.cols = cols;
        }
        if let Some(rows) = level.rows {
            self.rows = rows;
        }
        if let Some(tile_size) = level.tile_size {
            self.tile_size = tile_size;
        }
        if let Some(padding) = level.padding {
            self.padding = padding;
        }
        if let Some(mine_count) = level.mine_count {
            self.mines = mine_count;
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cols: 8,
            rows: 6,
            tile_size: 64,
            padding: 16,
            mines: 10,
        }
    }
}

/// Optional per-field overrides read from `level.json`. Absent fields keep
/// the built-in defaults.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LevelConfig {
    pub cols: Option<Coord>,
    pub rows: Option<Coord>,
    pub tile_size: Option<Pixel>,
    pub padding: Option<Pixel>,
    pub mine_count: Option<CellCount>,
}
