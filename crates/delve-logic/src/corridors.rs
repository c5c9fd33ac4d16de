//! Corridor digging: join sibling subtrees with L-shaped paths.
//!
//! Internal nodes are visited children-first, so both halves of a node are
//! already internally connected when the node joins them. Any room reached by
//! descending into a half is therefore a valid endpoint, and the descent is
//! randomized to spread connections over the subtree.

use crate::bsp::{NodeId, PartitionTree};
use crate::grid::{Tile, TileGrid};
use crate::rect::Point;
use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};

/// One dug L-shaped corridor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corridor {
    pub from: Point,
    pub to: Point,
    /// Run along `from.y` first, then down `to.x`; otherwise down `from.x`, then along `to.y`.
    pub horizontal_first: bool,
}

impl Corridor {
    /// Tiles covered by both segments, endpoints included. The corner appears twice.
    pub fn cells(&self) -> Vec<Point> {
        let (a, b) = (self.from, self.to);
        let mut cells = Vec::new();
        if self.horizontal_first {
            cells.extend(span(a.x, b.x).map(|x| Point::new(x, a.y)));
            cells.extend(span(a.y, b.y).map(|y| Point::new(b.x, y)));
        } else {
            cells.extend(span(a.y, b.y).map(|y| Point::new(a.x, y)));
            cells.extend(span(a.x, b.x).map(|x| Point::new(x, b.y)));
        }
        cells
    }

    /// Write the path into `grid` as Floor.
    pub fn carve(&self, grid: &mut TileGrid) {
        let (a, b) = (self.from, self.to);
        if self.horizontal_first {
            carve_horizontal(grid, a.x, b.x, a.y);
            carve_vertical(grid, a.y, b.y, b.x);
        } else {
            carve_vertical(grid, a.y, b.y, a.x);
            carve_horizontal(grid, a.x, b.x, b.y);
        }
    }
}

fn span(a: i32, b: i32) -> std::ops::RangeInclusive<i32> {
    a.min(b)..=a.max(b)
}

/// Floor every tile on row `y` between `x1` and `x2`, inclusive.
pub fn carve_horizontal(grid: &mut TileGrid, x1: i32, x2: i32, y: i32) {
    for x in span(x1, x2) {
        grid.set(x, y, Tile::Floor);
    }
}

/// Floor every tile on column `x` between `y1` and `y2`, inclusive.
pub fn carve_vertical(grid: &mut TileGrid, y1: i32, y2: i32, x: i32) {
    for y in span(y1, y2) {
        grid.set(x, y, Tile::Floor);
    }
}

/// Connect every pair of sibling subtrees, bottom-up.
///
/// Nodes where one side holds no room at all (only degenerate leaves) are
/// skipped; there is nothing on that side to connect.
pub fn dig_corridors(
    tree: &PartitionTree,
    grid: &mut TileGrid,
    rng: &mut RandomSource,
) -> Vec<Corridor> {
    let has_room = tree.subtree_has_room();
    let mut corridors = Vec::new();

    for id in tree.postorder() {
        let Some((left, right)) = tree.node(id).children else {
            continue;
        };
        if !has_room[left] || !has_room[right] {
            log::debug!(
                "Node {} at {:?}: one side has no room, not connecting",
                id,
                tree.node(id).rect
            );
            continue;
        }

        let (Some(from), Some(to)) = (
            point_in_subtree(tree, &has_room, left, rng),
            point_in_subtree(tree, &has_room, right, rng),
        ) else {
            continue;
        };
        let corridor = Corridor {
            from,
            to,
            horizontal_first: rng.next_bool(),
        };
        corridor.carve(grid);
        corridors.push(corridor);
    }
    corridors
}

/// Descend from `start` through randomly chosen children until a node with a
/// room, then pick a uniform point in that room. Children without any room in
/// their subtree are never chosen.
pub fn point_in_subtree(
    tree: &PartitionTree,
    has_room: &[bool],
    start: NodeId,
    rng: &mut RandomSource,
) -> Option<Point> {
    let mut current = start;
    let room = loop {
        let node = tree.node(current);
        if let Some(room) = node.room {
            break room;
        }
        let (left, right) = node.children?;
        current = match (has_room[left], has_room[right]) {
            (true, true) => {
                if rng.next_bool() {
                    left
                } else {
                    right
                }
            }
            (true, false) => left,
            (false, true) => right,
            (false, false) => return None,
        };
    };

    let x = rng.uniform_int(room.x, room.right() - 1).ok()?;
    let y = rng.uniform_int(room.y, room.bottom() - 1).ok()?;
    Some(Point::new(x, y))
}
