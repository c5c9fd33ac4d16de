//! Room carving: one room per BSP leaf.

use crate::bsp::{NodeId, PartitionTree};
use crate::error::GenError;
use crate::grid::{Tile, TileGrid};
use crate::rect::Rect;
use crate::rng::RandomSource;

/// Smallest room side.
pub const MIN_ROOM_SIZE: i32 = 3;
/// Wall tiles kept between a room and its leaf edge.
pub const ROOM_MARGIN: i32 = 1;
/// Smallest leaf side that can host a room.
pub const MIN_CARVABLE_LEAF: i32 = MIN_ROOM_SIZE + 2 * ROOM_MARGIN;

/// Pick a room rectangle strictly inside `leaf`.
///
/// Fails with [`GenError::DegenerateLeaf`] when either side of the leaf is
/// shorter than [`MIN_CARVABLE_LEAF`].
pub fn pick_room(leaf: Rect, rng: &mut RandomSource) -> Result<Rect, GenError> {
    if leaf.w < MIN_CARVABLE_LEAF || leaf.h < MIN_CARVABLE_LEAF {
        return Err(GenError::DegenerateLeaf {
            x: leaf.x,
            y: leaf.y,
            w: leaf.w,
            h: leaf.h,
        });
    }

    let room_w = rng.uniform_int(MIN_ROOM_SIZE, leaf.w - 2 * ROOM_MARGIN)?;
    let room_h = rng.uniform_int(MIN_ROOM_SIZE, leaf.h - 2 * ROOM_MARGIN)?;
    let dx = rng.uniform_int(ROOM_MARGIN, leaf.w - room_w - ROOM_MARGIN)?;
    let dy = rng.uniform_int(ROOM_MARGIN, leaf.h - room_h - ROOM_MARGIN)?;

    Ok(Rect::new(leaf.x + dx, leaf.y + dy, room_w, room_h))
}

/// Carve a room into every leaf, in pre-order.
///
/// Degenerate leaves are left as solid wall and returned so the caller can
/// report them; they do not stop the rest of the dungeon from being carved.
pub fn carve_rooms(
    tree: &mut PartitionTree,
    grid: &mut TileGrid,
    rng: &mut RandomSource,
) -> Vec<Rect> {
    let mut degenerate = Vec::new();
    for id in tree.leaves() {
        if let Err(err) = carve_leaf(tree, id, grid, rng) {
            log::debug!("Skipping room: {}", err);
            degenerate.push(tree.node(id).rect);
        }
    }
    degenerate
}

fn carve_leaf(
    tree: &mut PartitionTree,
    id: NodeId,
    grid: &mut TileGrid,
    rng: &mut RandomSource,
) -> Result<(), GenError> {
    let room = pick_room(tree.node(id).rect, rng)?;
    grid.fill_rect(&room, Tile::Floor);
    tree.node_mut(id).room = Some(room);
    Ok(())
}
