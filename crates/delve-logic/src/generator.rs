//! Dungeon generation entry points.
//!
//! Generation runs in three phases over a fresh Wall-filled grid:
//!
//! 1. [`PartitionTree::build`] splits the map rectangle into leaves
//! 2. [`carve_rooms`] carves one room per leaf
//! 3. [`dig_corridors`] joins sibling subtrees bottom-up
//!
//! ```
//! use delve_logic::generator::{Dungeon, GeneratorConfig};
//! use delve_logic::grid::Tile;
//!
//! let config = GeneratorConfig { seed: 7, ..GeneratorConfig::default() };
//! let dungeon = Dungeon::generate(&config).unwrap();
//! assert_eq!(dungeon.width(), config.width);
//! assert!(dungeon.grid().count(Tile::Floor) > 0);
//! ```

use crate::bsp::PartitionTree;
use crate::corridors::{dig_corridors, Corridor};
use crate::error::GenError;
use crate::grid::{Tile, TileGrid};
use crate::rect::Rect;
use crate::rng::RandomSource;
use crate::rooms::carve_rooms;
use serde::{Deserialize, Serialize};

/// Parameters for one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub width: i32,
    pub height: i32,
    /// Smallest leaf extent along a split axis.
    pub min_leaf: i32,
    /// Upper bound for the split offset. Leaves may still end up larger.
    pub max_leaf: i32,
    pub seed: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 48,
            min_leaf: 8,
            max_leaf: 20,
            seed: 0,
        }
    }
}

impl GeneratorConfig {
    pub fn new(width: i32, height: i32, min_leaf: i32, max_leaf: i32, seed: u32) -> Self {
        Self {
            width,
            height,
            min_leaf,
            max_leaf,
            seed,
        }
    }

    /// Same parameters with a freshly drawn seed from the thread RNG.
    pub fn with_random_seed(self) -> Self {
        Self {
            seed: rand::random(),
            ..self
        }
    }

    /// Reject non-positive dimensions and `min_leaf > max_leaf`.
    pub fn validate(&self) -> Result<(), GenError> {
        for (field, value) in [
            ("width", self.width),
            ("height", self.height),
            ("min_leaf", self.min_leaf),
            ("max_leaf", self.max_leaf),
        ] {
            if value <= 0 {
                return Err(GenError::InvalidDimension {
                    field,
                    value,
                    reason: "must be positive",
                });
            }
        }
        if self.min_leaf > self.max_leaf {
            return Err(GenError::InvalidDimension {
                field: "min_leaf",
                value: self.min_leaf,
                reason: "must not exceed max_leaf",
            });
        }
        Ok(())
    }
}

/// A finished dungeon: the grid plus the structure that produced it.
#[derive(Debug, Clone)]
pub struct Dungeon {
    config: GeneratorConfig,
    grid: TileGrid,
    tree: PartitionTree,
    corridors: Vec<Corridor>,
    degenerate_leaves: Vec<Rect>,
}

impl Dungeon {
    pub fn generate(config: &GeneratorConfig) -> Result<Self, GenError> {
        config.validate()?;

        let mut rng = RandomSource::new(config.seed);
        let mut grid = TileGrid::new(config.width, config.height);
        let root = Rect::new(0, 0, config.width, config.height);

        let mut tree = PartitionTree::build(root, config.min_leaf, config.max_leaf, &mut rng)?;
        let degenerate_leaves = carve_rooms(&mut tree, &mut grid, &mut rng);
        let corridors = dig_corridors(&tree, &mut grid, &mut rng);

        log::info!(
            "Generated {}x{} dungeon (seed {}): {} leaves, {} rooms, {} corridors, {} floor tiles",
            config.width,
            config.height,
            config.seed,
            tree.leaf_count(),
            tree.leaf_count() - degenerate_leaves.len(),
            corridors.len(),
            grid.count(Tile::Floor)
        );
        if !degenerate_leaves.is_empty() {
            log::warn!(
                "{} leaves too small for a room (min_leaf {})",
                degenerate_leaves.len(),
                config.min_leaf
            );
        }

        Ok(Self {
            config: config.clone(),
            grid,
            tree,
            corridors,
            degenerate_leaves,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn tree(&self) -> &PartitionTree {
        &self.tree
    }

    pub fn rooms(&self) -> Vec<Rect> {
        self.tree.rooms()
    }

    pub fn corridors(&self) -> &[Corridor] {
        &self.corridors
    }

    /// Leaves left as solid wall because they could not fit a room.
    pub fn degenerate_leaves(&self) -> &[Rect] {
        &self.degenerate_leaves
    }

    pub fn get_tile(&self, x: i32, y: i32) -> Result<Tile, GenError> {
        self.grid.get_tile(x, y)
    }

    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    pub fn into_grid(self) -> TileGrid {
        self.grid
    }
}

/// Stateful generator: uninitialized until the first successful
/// [`generate`](Self::generate), after which it holds the latest dungeon.
#[derive(Debug, Default)]
pub struct DungeonGenerator {
    dungeon: Option<Dungeon>,
}

impl DungeonGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any previous dungeon with a new one. On error the previous
    /// state is kept.
    pub fn generate(
        &mut self,
        width: i32,
        height: i32,
        min_leaf: i32,
        max_leaf: i32,
        seed: u32,
    ) -> Result<(), GenError> {
        self.generate_with(&GeneratorConfig::new(width, height, min_leaf, max_leaf, seed))
    }

    pub fn generate_with(&mut self, config: &GeneratorConfig) -> Result<(), GenError> {
        let dungeon = Dungeon::generate(config)?;
        self.dungeon = Some(dungeon);
        Ok(())
    }

    pub fn is_generated(&self) -> bool {
        self.dungeon.is_some()
    }

    pub fn dungeon(&self) -> Option<&Dungeon> {
        self.dungeon.as_ref()
    }

    /// Before the first generation every coordinate is out of bounds.
    pub fn get_tile(&self, x: i32, y: i32) -> Result<Tile, GenError> {
        match &self.dungeon {
            Some(d) => d.get_tile(x, y),
            None => Err(GenError::IndexOutOfBounds {
                x,
                y,
                width: 0,
                height: 0,
            }),
        }
    }

    pub fn width(&self) -> i32 {
        self.dungeon.as_ref().map_or(0, Dungeon::width)
    }

    pub fn height(&self) -> i32 {
        self.dungeon.as_ref().map_or(0, Dungeon::height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(GeneratorConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_non_positive_fields() {
        let cases = [
            GeneratorConfig::new(0, 10, 4, 8, 0),
            GeneratorConfig::new(10, -3, 4, 8, 0),
            GeneratorConfig::new(10, 10, 0, 8, 0),
            GeneratorConfig::new(10, 10, 4, 0, 0),
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(GenError::InvalidDimension { .. })),
                "{config:?}"
            );
        }
    }

    #[test]
    fn rejects_min_above_max() {
        let err = GeneratorConfig::new(30, 30, 9, 8, 0).validate().unwrap_err();
        assert_eq!(
            err,
            GenError::InvalidDimension {
                field: "min_leaf",
                value: 9,
                reason: "must not exceed max_leaf",
            }
        );
    }

    #[test]
    fn random_seed_keeps_dimensions() {
        let base = GeneratorConfig::new(40, 30, 6, 12, 0);
        let seeds: std::collections::HashSet<u32> =
            (0..8).map(|_| base.clone().with_random_seed().seed).collect();
        // eight identical u32 draws would mean the seed is not random
        assert!(seeds.len() > 1);

        let config = base.clone().with_random_seed();
        assert_eq!(
            (config.width, config.height, config.min_leaf, config.max_leaf),
            (40, 30, 6, 12)
        );
        assert!(Dungeon::generate(&config).is_ok());
    }

    #[test]
    fn config_json_fills_defaults() {
        let config: GeneratorConfig = serde_json::from_str(r#"{"width": 100, "seed": 5}"#).unwrap();
        assert_eq!(config.width, 100);
        assert_eq!(config.seed, 5);
        assert_eq!(config.height, 48);
        assert_eq!(config.min_leaf, 8);
    }

    #[test]
    fn uninitialized_generator() {
        let gen = DungeonGenerator::new();
        assert!(!gen.is_generated());
        assert_eq!(gen.width(), 0);
        assert_eq!(gen.height(), 0);
        assert!(matches!(gen.get_tile(0, 0), Err(GenError::IndexOutOfBounds { .. })));
    }

    #[test]
    fn failed_generate_keeps_previous_dungeon() {
        let mut gen = DungeonGenerator::new();
        gen.generate(30, 20, 6, 10, 1).unwrap();
        let before = gen.dungeon().unwrap().grid().clone();

        assert!(gen.generate(30, 20, 12, 10, 1).is_err());
        assert_eq!(gen.width(), 30);
        assert_eq!(gen.dungeon().unwrap().grid(), &before);
    }

    #[test]
    fn regenerate_replaces_state() {
        let mut gen = DungeonGenerator::new();
        gen.generate(30, 20, 6, 10, 1).unwrap();
        gen.generate(50, 40, 6, 10, 2).unwrap();
        assert_eq!((gen.width(), gen.height()), (50, 40));
        assert!(gen.get_tile(49, 39).is_ok());
        assert!(gen.get_tile(50, 39).is_err());
    }
}
