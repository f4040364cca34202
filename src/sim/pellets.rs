//! Pellet bookkeeping
//!
//! Tracks which pellet and power item cells have been eaten. Scoring and ghost
//! reactions belong to the session; this registry only counts.

use serde::{Deserialize, Serialize};

use super::grid::{Cell, GridMap};

/// What a consumption attempt ate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Consumption {
    /// Not an edible cell, or already eaten
    None,
    Pellet,
    PowerItem,
}

/// Per-cell consumed flags for every pellet-kind cell
#[derive(Debug, Clone, Default)]
pub struct PelletRegistry {
    /// `Some(consumed)` for pellet-kind cells, `None` elsewhere
    consumed: Vec<Option<bool>>,
    kinds: Vec<Cell>,
    remaining: usize,
}

impl PelletRegistry {
    pub fn new(grid: &GridMap) -> Self {
        let mut registry = Self::default();
        registry.reset(grid);
        registry
    }

    /// Restore every pellet and power item
    pub fn reset(&mut self, grid: &GridMap) {
        self.kinds = grid.cells().to_vec();
        self.consumed = self
            .kinds
            .iter()
            .map(|c| c.is_pellet_kind().then_some(false))
            .collect();
        self.remaining = self.consumed.iter().filter(|c| c.is_some()).count();
    }

    /// Eat whatever is at `index`, at most once per reset
    pub fn consume_at(&mut self, index: usize) -> Consumption {
        match self.consumed.get_mut(index) {
            Some(Some(consumed)) if !*consumed => {
                *consumed = true;
                self.remaining -= 1;
                match self.kinds[index] {
                    Cell::PowerItem => Consumption::PowerItem,
                    _ => Consumption::Pellet,
                }
            }
            _ => Consumption::None,
        }
    }

    /// Pellet-kind cells not yet eaten
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn total(&self) -> usize {
        self.consumed.iter().filter(|c| c.is_some()).count()
    }

    /// `Some(true)` once eaten, `None` for cells that never held a pellet
    pub fn is_consumed(&self, index: usize) -> Option<bool> {
        self.consumed.get(index).copied().flatten()
    }

    pub fn is_cleared(&self) -> bool {
        self.remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::CellCoord;
    use crate::sim::grid::GridGeometry;
    use glam::Vec3;
    use proptest::prelude::*;

    fn tiny_grid() -> GridMap {
        // wall, road, pellet, power, pellet
        let geometry = GridGeometry {
            origin: Vec3::ZERO,
            step: 1.0,
            tunnel: None,
            waypoints: vec![CellCoord::new(0, 1)],
        };
        GridMap::decode(&[-1, 0, 1, 2, 1], 1, 5, &geometry).expect("decodes")
    }

    #[test]
    fn test_reset_counts_pellet_kinds() {
        let registry = PelletRegistry::new(&tiny_grid());
        assert_eq!(registry.remaining(), 3);
        assert_eq!(registry.total(), 3);
        assert_eq!(registry.is_consumed(0), None);
        assert_eq!(registry.is_consumed(2), Some(false));
    }

    #[test]
    fn test_consume_kinds_and_repeats() {
        let mut registry = PelletRegistry::new(&tiny_grid());
        assert_eq!(registry.consume_at(0), Consumption::None);
        assert_eq!(registry.consume_at(1), Consumption::None);
        assert_eq!(registry.consume_at(2), Consumption::Pellet);
        assert_eq!(registry.consume_at(2), Consumption::None);
        assert_eq!(registry.consume_at(3), Consumption::PowerItem);
        assert_eq!(registry.consume_at(99), Consumption::None);
        assert_eq!(registry.remaining(), 1);
        assert!(!registry.is_cleared());
        assert_eq!(registry.consume_at(4), Consumption::Pellet);
        assert!(registry.is_cleared());
    }

    #[test]
    fn test_reset_restores_consumed() {
        let grid = tiny_grid();
        let mut registry = PelletRegistry::new(&grid);
        registry.consume_at(2);
        registry.consume_at(3);
        registry.reset(&grid);
        assert_eq!(registry.remaining(), 3);
        assert_eq!(registry.consume_at(3), Consumption::PowerItem);
    }

    proptest! {
        #[test]
        fn prop_remaining_drops_once_per_first_consumption(
            indices in proptest::collection::vec(0usize..8, 0..40)
        ) {
            let grid = tiny_grid();
            let mut registry = PelletRegistry::new(&grid);
            let mut seen = std::collections::HashSet::new();
            for index in indices {
                let before = registry.remaining();
                let result = registry.consume_at(index);
                let edible = grid.cell(index).is_some_and(|c| c.is_pellet_kind());
                if edible && seen.insert(index) {
                    prop_assert_ne!(result, Consumption::None);
                    prop_assert_eq!(registry.remaining(), before - 1);
                } else {
                    prop_assert_eq!(result, Consumption::None);
                    prop_assert_eq!(registry.remaining(), before);
                }
            }
        }
    }
}
