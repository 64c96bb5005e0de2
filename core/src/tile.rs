use serde::{Deserialize, Serialize};

use crate::types::{Coord, Pixel};

/// Player-visible color of a single tile.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TileColor {
    Hidden,
    Safe,
    Mine,
}

impl TileColor {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }
}

impl Default for TileColor {
    fn default() -> Self {
        Self::Hidden
    }
}

/// One cell of the board. Holds its own grid coordinates and the pixel origin
/// the renderer draws it at.
///
/// Invariant: `color` is `Hidden` exactly while `revealed` is false; once
/// revealed, the color stays `Safe` or `Mine` until the grid is rebuilt.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    x: Coord,
    y: Coord,
    px: Pixel,
    py: Pixel,
    is_mine: bool,
    revealed: bool,
    color: TileColor,
}

impl Tile {
    pub(crate) fn new(x: Coord, y: Coord, px: Pixel, py: Pixel) -> Self {
        Self {
            x,
            y,
            px,
            py,
            is_mine: false,
            revealed: false,
            color: TileColor::default(),
        }
    }

    pub const fn coords(&self) -> (Coord, Coord) {
        (self.x, self.y)
    }

    /// Pixel origin `(left, top)` of this tile.
    pub const fn pixel_origin(&self) -> (Pixel, Pixel) {
        (self.px, self.py)
    }

    pub const fn is_mine(&self) -> bool {
        self.is_mine
    }

    pub const fn revealed(&self) -> bool {
        self.revealed
    }

    pub const fn color(&self) -> TileColor {
        self.color
    }

    pub(crate) fn set_mine(&mut self) {
        self.is_mine = true;
    }

    /// One-way `Hidden -> Safe | Mine` transition. Calling this twice leaves
    /// the tile exactly as after the first call.
    pub(crate) fn reveal(&mut self, force_mine: bool) {
        self.revealed = true;
        self.color = if self.is_mine || force_mine {
            TileColor::Mine
        } else {
            TileColor::Safe
        };
    }
}
