//! Pure dungeon generation logic for Delve.
//!
//! Builds a binary space partition over a rectangular map, carves a room into
//! every leaf and joins sibling subtrees with L-shaped corridors, producing a
//! Wall/Floor tile grid whose floor is one 4-connected region. Generation is
//! deterministic for a given seed and has no engine or I/O dependencies
//! beyond the optional export helpers in [`render`].
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`bsp`] | Partition tree (arena) and the recursive split rule |
//! | [`corridors`] | Bottom-up L-shaped corridor digging |
//! | [`error`] | `GenError` taxonomy |
//! | [`generator`] | `GeneratorConfig`, `Dungeon`, stateful `DungeonGenerator` |
//! | [`grid`] | `Tile` and the row-major `TileGrid` |
//! | [`rect`] | Integer `Rect` / `Point` helpers |
//! | [`render`] | Text dump, PPM and (with the `png` feature) grayscale PNG export |
//! | [`rng`] | Seeded `RandomSource` |
//! | [`rooms`] | One room per leaf, with a wall margin |
//! | [`validate`] | Connectivity, containment and tile-coverage checks |

pub mod bsp;
pub mod corridors;
pub mod error;
pub mod generator;
pub mod grid;
pub mod rect;
pub mod render;
pub mod rng;
pub mod rooms;
pub mod validate;

pub use error::GenError;
pub use generator::{Dungeon, DungeonGenerator, GeneratorConfig};
pub use grid::{Tile, TileGrid};
