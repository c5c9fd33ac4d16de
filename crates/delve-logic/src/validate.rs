//! Structural validation for generated dungeons.
//!
//! Pure functions that inspect a finished [`Dungeon`] (or its parts) and
//! return validation errors. Used by the integration tests and the simtest
//! harness to sweep many seeds.

use crate::bsp::PartitionTree;
use crate::generator::Dungeon;
use crate::grid::{Tile, TileGrid};
use crate::rect::Point;
use crate::rooms::ROOM_MARGIN;
use std::collections::{HashSet, VecDeque};

/// A dungeon validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Error severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Error,
    Warning,
}

// ── A. Tree structure ───────────────────────────────────────────────────

/// Every internal node has two children that exactly tile it.
pub fn check_tree_structure(tree: &PartitionTree) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (id, node) in tree.nodes().iter().enumerate() {
        let Some((l, r)) = node.children else {
            continue;
        };
        if node.has_room() {
            errors.push(ValidationError {
                category: "tree",
                severity: Severity::Error,
                message: format!("Internal node #{} carries a room", id),
            });
        }
        let (a, b) = (tree.node(l).rect, tree.node(r).rect);
        let stacked = a.x == node.rect.x
            && b.x == node.rect.x
            && a.w == node.rect.w
            && b.w == node.rect.w
            && a.y == node.rect.y
            && b.y == a.bottom()
            && b.bottom() == node.rect.bottom();
        let side_by_side = a.y == node.rect.y
            && b.y == node.rect.y
            && a.h == node.rect.h
            && b.h == node.rect.h
            && a.x == node.rect.x
            && b.x == a.right()
            && b.right() == node.rect.right();
        if !stacked && !side_by_side {
            errors.push(ValidationError {
                category: "tree",
                severity: Severity::Error,
                message: format!(
                    "Children of node #{} {:?} do not tile it: {:?} + {:?}",
                    id, node.rect, a, b
                ),
            });
        }
    }
    errors
}

// ── B. Rooms ────────────────────────────────────────────────────────────

/// Rooms lie strictly inside their leaf, with the wall margin on every side.
pub fn check_room_margins(tree: &PartitionTree) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for id in tree.leaves() {
        let leaf = tree.node(id);
        if let Some(room) = leaf.room {
            if !leaf.rect.contains_with_margin(&room, ROOM_MARGIN) {
                errors.push(ValidationError {
                    category: "room",
                    severity: Severity::Error,
                    message: format!("Room {:?} touches the edge of leaf {:?}", room, leaf.rect),
                });
            }
        }
    }
    errors
}

/// Every leaf has a room, unless it was recorded as degenerate.
pub fn check_leaf_rooms(dungeon: &Dungeon) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let tree = dungeon.tree();
    for id in tree.leaves() {
        let leaf = tree.node(id);
        if leaf.has_room() {
            continue;
        }
        if dungeon.degenerate_leaves().contains(&leaf.rect) {
            errors.push(ValidationError {
                category: "room",
                severity: Severity::Warning,
                message: format!("Leaf {:?} too small for a room", leaf.rect),
            });
        } else {
            errors.push(ValidationError {
                category: "room",
                severity: Severity::Error,
                message: format!("Leaf {:?} has no room", leaf.rect),
            });
        }
    }
    errors
}

// ── C. Tiles ────────────────────────────────────────────────────────────

/// Number of 4-connected Floor components.
pub fn floor_component_count(grid: &TileGrid) -> usize {
    let mut visited: HashSet<Point> = HashSet::new();
    let mut components = 0;
    for (p, tile) in grid.iter() {
        if tile != Tile::Floor || visited.contains(&p) {
            continue;
        }
        components += 1;
        flood_floor(grid, p, &mut visited);
    }
    components
}

fn flood_floor(grid: &TileGrid, start: Point, visited: &mut HashSet<Point>) {
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);
    while let Some(current) = queue.pop_front() {
        for next in grid.neighbors4(current) {
            if grid.get_tile(next.x, next.y) == Ok(Tile::Floor) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
}

/// All Floor tiles form a single 4-connected region.
pub fn check_floor_connectivity(grid: &TileGrid) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let floor = grid.count(Tile::Floor);
    if floor == 0 {
        errors.push(ValidationError {
            category: "connectivity",
            severity: Severity::Warning,
            message: "Grid has no floor tiles".to_string(),
        });
        return errors;
    }
    let components = floor_component_count(grid);
    if components != 1 {
        errors.push(ValidationError {
            category: "connectivity",
            severity: Severity::Error,
            message: format!(
                "{} floor tiles split into {} disconnected regions",
                floor, components
            ),
        });
    }
    errors
}

/// Floor tiles are exactly the union of rooms and corridors.
pub fn check_no_stray_floor(dungeon: &Dungeon) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut carved: HashSet<Point> = HashSet::new();
    for room in dungeon.rooms() {
        carved.extend(room.cells());
    }
    for corridor in dungeon.corridors() {
        carved.extend(corridor.cells());
    }

    let grid = dungeon.grid();
    let stray: Vec<Point> = grid
        .iter()
        .filter(|(p, t)| *t == Tile::Floor && !carved.contains(p))
        .map(|(p, _)| p)
        .collect();
    if !stray.is_empty() {
        errors.push(ValidationError {
            category: "tiles",
            severity: Severity::Error,
            message: format!(
                "{} floor tiles outside any room or corridor (e.g. {:?})",
                stray.len(),
                stray[0]
            ),
        });
    }

    let uncarved = carved
        .iter()
        .filter(|p| grid.get_tile(p.x, p.y) != Ok(Tile::Floor))
        .count();
    if uncarved > 0 {
        errors.push(ValidationError {
            category: "tiles",
            severity: Severity::Error,
            message: format!("{} room/corridor tiles are not floor", uncarved),
        });
    }

    let other = grid
        .iter()
        .filter(|(_, t)| !matches!(t, Tile::Floor | Tile::Wall))
        .count();
    if other > 0 {
        errors.push(ValidationError {
            category: "tiles",
            severity: Severity::Error,
            message: format!("{} tiles are neither floor nor wall", other),
        });
    }
    errors
}

// ── Master validation ───────────────────────────────────────────────────

/// Run all validations and return combined results.
pub fn validate_all(dungeon: &Dungeon) -> Vec<ValidationError> {
    let mut all = Vec::new();
    let config = dungeon.config();
    if dungeon.width() != config.width || dungeon.height() != config.height {
        all.push(ValidationError {
            category: "grid",
            severity: Severity::Error,
            message: format!(
                "Grid is {}×{}, expected {}×{}",
                dungeon.width(),
                dungeon.height(),
                config.width,
                config.height
            ),
        });
    }
    all.extend(check_tree_structure(dungeon.tree()));
    all.extend(check_room_margins(dungeon.tree()));
    all.extend(check_leaf_rooms(dungeon));
    all.extend(check_floor_connectivity(dungeon.grid()));
    all.extend(check_no_stray_floor(dungeon));
    all
}

/// Only the `Severity::Error` entries.
pub fn errors_only(results: &[ValidationError]) -> Vec<&ValidationError> {
    results
        .iter()
        .filter(|e| e.severity == Severity::Error)
        .collect()
}
