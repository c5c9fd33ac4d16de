//! The tile grid mutated by generation and read by consumers.

use crate::error::GenError;
use crate::rect::{Point, Rect};
use serde::{Deserialize, Serialize};

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Tile {
    /// Outside the dungeon. Never written by the generator.
    Empty = 0,
    Floor = 1,
    Wall = 2,
}

impl Tile {
    /// Character used by the text dump.
    pub fn glyph(self) -> char {
        match self {
            Tile::Floor => '.',
            Tile::Wall => '#',
            Tile::Empty => ' ',
        }
    }

    /// Gray level used by raster export.
    pub fn gray(self) -> u8 {
        match self {
            Tile::Floor => 200,
            Tile::Wall => 80,
            Tile::Empty => 0,
        }
    }
}

/// Fixed-size, row-major tile storage. Starts entirely Wall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Callers validate dimensions first; negative extents yield an empty grid.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            tiles: vec![Tile::Wall; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get_tile(&self, x: i32, y: i32) -> Result<Tile, GenError> {
        self.index(x, y)
            .map(|idx| self.tiles[idx])
            .ok_or(GenError::IndexOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
    }

    /// Write a tile. Returns false (and writes nothing) when out of bounds.
    pub(crate) fn set(&mut self, x: i32, y: i32, tile: Tile) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.tiles[idx] = tile;
                true
            }
            None => false,
        }
    }

    pub(crate) fn fill_rect(&mut self, rect: &Rect, tile: Tile) {
        for p in rect.cells() {
            self.set(p.x, p.y, tile);
        }
    }

    /// Number of cells holding `tile`.
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// Every cell as `(point, tile)`, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Tile)> + '_ {
        let w = self.width.max(1) as usize;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, &t)| (Point::new((i % w) as i32, (i / w) as i32), t))
    }

    /// One row of tiles, top to bottom.
    pub fn row(&self, y: i32) -> Option<&[Tile]> {
        if y < 0 || y >= self.height {
            return None;
        }
        let w = self.width as usize;
        let start = y as usize * w;
        Some(&self.tiles[start..start + w])
    }

    /// In-bounds 4-neighbours of `p`.
    pub fn neighbors4(&self, p: Point) -> impl Iterator<Item = Point> + '_ {
        [(0, -1), (1, 0), (0, 1), (-1, 0)]
            .into_iter()
            .map(move |(dx, dy)| Point::new(p.x + dx, p.y + dy))
            .filter(move |n| self.in_bounds(n.x, n.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_all_wall() {
        let g = TileGrid::new(7, 5);
        assert_eq!(g.width(), 7);
        assert_eq!(g.height(), 5);
        assert_eq!(g.count(Tile::Wall), 35);
        assert_eq!(g.count(Tile::Floor), 0);
    }

    #[test]
    fn get_tile_out_of_bounds() {
        let g = TileGrid::new(4, 3);
        assert!(g.get_tile(3, 2).is_ok());
        for (x, y) in [(4, 0), (0, 3), (-1, 0), (0, -1)] {
            assert_eq!(
                g.get_tile(x, y),
                Err(GenError::IndexOutOfBounds {
                    x,
                    y,
                    width: 4,
                    height: 3
                })
            );
        }
    }

    #[test]
    fn set_is_row_major() {
        let mut g = TileGrid::new(4, 3);
        assert!(g.set(3, 1, Tile::Floor));
        assert!(!g.set(4, 1, Tile::Floor));
        assert_eq!(g.row(1).unwrap()[3], Tile::Floor);
        assert_eq!(g.get_tile(3, 1), Ok(Tile::Floor));
        let (p, _) = g.iter().find(|(_, t)| *t == Tile::Floor).unwrap();
        assert_eq!(p, Point::new(3, 1));
    }

    #[test]
    fn fill_rect_marks_exact_area() {
        let mut g = TileGrid::new(10, 10);
        g.fill_rect(&Rect::new(2, 3, 4, 2), Tile::Floor);
        assert_eq!(g.count(Tile::Floor), 8);
        assert_eq!(g.get_tile(1, 3), Ok(Tile::Wall));
        assert_eq!(g.get_tile(5, 4), Ok(Tile::Floor));
        assert_eq!(g.get_tile(6, 4), Ok(Tile::Wall));
    }

    #[test]
    fn corner_has_two_neighbors() {
        let g = TileGrid::new(3, 3);
        assert_eq!(g.neighbors4(Point::new(0, 0)).count(), 2);
        assert_eq!(g.neighbors4(Point::new(1, 1)).count(), 4);
    }
}
