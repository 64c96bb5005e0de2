use alloc::vec::Vec;
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::shuffle::fisher_yates;
use crate::tile::Tile;
use crate::types::{CellCount, Coord, Coord2, Pixel, ToNdIndex};

/// Rectangular board owning every tile, plus the pixel layout it was built
/// with. Tiles leave the grid only as borrows handed to the renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    tiles: Array2<Tile>,
    tile_size: Pixel,
    padding: Pixel,
}

impl Grid {
    /// Fresh `cols x rows` board, every tile unmined, unrevealed, hidden.
    /// The pixel origin of tile `(x, y)` is `padding + index * tile_size`
    /// on each axis.
    pub fn build(cols: Coord, rows: Coord, tile_size: Pixel, padding: Pixel) -> Self {
        let tiles = Array2::from_shape_fn([cols as usize, rows as usize], |(x, y)| {
            Tile::new(
                x as Coord,
                y as Coord,
                padding + x as Pixel * tile_size,
                padding + y as Pixel * tile_size,
            )
        });
        Self {
            tiles,
            tile_size,
            padding,
        }
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.tiles.dim();
        (dim.0 as Coord, dim.1 as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        self.tiles.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.tiles.iter().filter(|tile| tile.is_mine()).count() as CellCount
    }

    pub const fn tile_size(&self) -> Pixel {
        self.tile_size
    }

    pub const fn padding(&self) -> Pixel {
        self.padding
    }

    pub fn tile_at(&self, coords: Coord2) -> Option<&Tile> {
        let (cols, rows) = self.size();
        if coords.0 < cols && coords.1 < rows {
            Some(&self.tiles[coords.to_nd_index()])
        } else {
            None
        }
    }

    pub(crate) fn tile_at_mut(&mut self, coords: Coord2) -> Option<&mut Tile> {
        let (cols, rows) = self.size();
        if coords.0 < cols && coords.1 < rows {
            Some(&mut self.tiles[coords.to_nd_index()])
        } else {
            None
        }
    }

    /// Row-major walk over all tiles, for drawing.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Maps a pixel position to the grid coordinates under it using
    /// `floor((pixel - padding) / tile_size)` per axis. Positions inside the
    /// padding band or past the far edge map to `None`.
    pub fn coords_at_pixel(&self, px: Pixel, py: Pixel) -> Option<Coord2> {
        if px < self.padding || py < self.padding {
            return None;
        }

        let gx = (px - self.padding) / self.tile_size;
        let gy = (py - self.padding) / self.tile_size;
        let (cols, rows) = self.size();

        if gx >= cols as Pixel || gy >= rows as Pixel {
            None
        } else {
            Some((gx as Coord, gy as Coord))
        }
    }

    /// Marks `count` mines on positions chosen by a Fisher–Yates pass over
    /// every coordinate pair. A count above the cell total degrades to a
    /// fully mined board.
    pub fn place_mines<R: Rng + ?Sized>(&mut self, rng: &mut R, count: CellCount) {
        let (cols, rows) = self.size();
        let mut positions: Vec<Coord2> = Vec::with_capacity(self.tiles.len());
        for y in 0..rows {
            for x in 0..cols {
                positions.push((x, y));
            }
        }

        if count as usize > positions.len() {
            log::warn!(
                "requested {} mines but the board only fits {}, filling it",
                count,
                positions.len()
            );
        }

        fisher_yates(&mut positions, rng);

        for &coords in positions.iter().take(count as usize) {
            self.tiles[coords.to_nd_index()].set_mine();
        }
    }

    /// Marks mines on a fixed set of coordinates, for scripted boards.
    pub fn place_mines_at(&mut self, mine_coords: &[Coord2]) -> Result<()> {
        let (cols, rows) = self.size();
        for &coords in mine_coords {
            if coords.0 >= cols || coords.1 >= rows {
                return Err(GameError::InvalidCoords);
            }
        }
        for &coords in mine_coords {
            self.tiles[coords.to_nd_index()].set_mine();
        }
        Ok(())
    }

    /// Force-shows every mine. Counters are untouched; this backs the
    /// win-time reveal-all display.
    pub(crate) fn reveal_all_mines(&mut self) {
        for tile in self.tiles.iter_mut() {
            if tile.is_mine() {
                tile.reveal(true);
            }
        }
    }
}
