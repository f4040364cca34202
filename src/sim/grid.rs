//! Maze grid decoding and world/grid coordinate mapping
//!
//! The maze is a row-major sequence of cells. Cell `(row, col)` sits at
//! `origin + (col * step, 0, row * step)` in world space.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::settings::CellCoord;

/// Kind of a maze cell (fixed once decoded)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Road,
    Pellet,
    PowerItem,
}

impl Cell {
    /// Decode the integer encoding: negative wall, 0 road, 1 pellet, >= 2 power item
    pub fn from_value(value: i32) -> Self {
        match value {
            v if v < 0 => Cell::Wall,
            0 => Cell::Road,
            1 => Cell::Pellet,
            _ => Cell::PowerItem,
        }
    }

    pub fn is_walkable(self) -> bool {
        self != Cell::Wall
    }

    /// Returns true for cells that start the game holding something edible
    pub fn is_pellet_kind(self) -> bool {
        matches!(self, Cell::Pellet | Cell::PowerItem)
    }
}

/// The wrap-around corridor: stepping onto an end column teleports to the
/// opposite interior column of the same row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TunnelConfig {
    pub row: usize,
    pub left_column: usize,
    pub right_column: usize,
    /// Landing column after crossing the right end
    pub left_interior: usize,
    /// Landing column after crossing the left end
    pub right_interior: usize,
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            row: TUNNEL_ROW,
            left_column: TUNNEL_LEFT_COLUMN,
            right_column: TUNNEL_RIGHT_COLUMN,
            left_interior: TUNNEL_LEFT_INTERIOR,
            right_interior: TUNNEL_RIGHT_INTERIOR,
        }
    }
}

/// World placement and special cells supplied alongside the raw layout
#[derive(Debug, Clone)]
pub struct GridGeometry {
    pub origin: Vec3,
    pub step: f32,
    pub tunnel: Option<TunnelConfig>,
    pub waypoints: Vec<CellCoord>,
}

/// Decoded, immutable maze
#[derive(Debug, Clone)]
pub struct GridMap {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
    positions: Vec<Vec3>,
    origin: Vec3,
    step: f32,
    /// Linear indices of scatter waypoints
    waypoints: Vec<usize>,
    tunnel: Option<TunnelConfig>,
    /// Connected-region label per walkable cell (tunnel ends count as linked)
    regions: Vec<Option<usize>>,
    /// Label of the largest region; everything the game uses must live there
    main_region: usize,
}

impl GridMap {
    /// Decode a flat cell sequence into a grid
    pub fn decode(
        flat_cells: &[i32],
        rows: usize,
        columns: usize,
        geometry: &GridGeometry,
    ) -> Result<Self, ConfigError> {
        if rows == 0 || columns == 0 {
            return Err(ConfigError::EmptyMaze { rows, columns });
        }
        let expected = rows * columns;
        if flat_cells.len() != expected {
            return Err(ConfigError::CellCountMismatch {
                rows,
                columns,
                expected,
                actual: flat_cells.len(),
            });
        }
        if geometry.step <= 0.0 {
            return Err(ConfigError::NonPositive {
                what: "cell step",
                value: geometry.step,
            });
        }

        let cells: Vec<Cell> = flat_cells.iter().copied().map(Cell::from_value).collect();
        if !cells.iter().any(|c| c.is_walkable()) {
            return Err(ConfigError::NoRoadCells);
        }

        let positions = (0..expected)
            .map(|i| {
                let (row, col) = (i / columns, i % columns);
                geometry.origin + Vec3::new(col as f32 * geometry.step, 0.0, row as f32 * geometry.step)
            })
            .collect();

        let mut grid = Self {
            rows,
            columns,
            cells,
            positions,
            origin: geometry.origin,
            step: geometry.step,
            waypoints: Vec::with_capacity(geometry.waypoints.len()),
            tunnel: geometry.tunnel,
            regions: Vec::new(),
            main_region: 0,
        };

        if let Some(tunnel) = geometry.tunnel {
            for col in [
                tunnel.left_column,
                tunnel.right_column,
                tunnel.left_interior,
                tunnel.right_interior,
            ] {
                grid.check_walkable("tunnel", CellCoord::new(tunnel.row, col))?;
            }
        }

        let (regions, main_region) = grid.label_regions();
        grid.regions = regions;
        grid.main_region = main_region;

        if geometry.waypoints.is_empty() {
            return Err(ConfigError::NoWaypoints);
        }
        for &waypoint in &geometry.waypoints {
            let index = grid.check_reachable("waypoint", waypoint)?;
            grid.waypoints.push(index);
        }

        Ok(grid)
    }

    /// Flood-fill walkable cells into connected regions; returns the labels
    /// and the label of the largest region
    fn label_regions(&self) -> (Vec<Option<usize>>, usize) {
        let mut labels = vec![None; self.cells.len()];
        let mut sizes: Vec<usize> = Vec::new();
        for start in 0..self.cells.len() {
            if labels[start].is_some() || !self.cells[start].is_walkable() {
                continue;
            }
            let label = sizes.len();
            labels[start] = Some(label);
            let mut size = 0;
            let mut stack = vec![start];
            while let Some(index) = stack.pop() {
                size += 1;
                for next in self.neighbours(index) {
                    if labels[next].is_none() && self.cells[next].is_walkable() {
                        labels[next] = Some(label);
                        stack.push(next);
                    }
                }
            }
            sizes.push(size);
        }
        let main = sizes
            .iter()
            .enumerate()
            .max_by_key(|&(label, &size)| (size, std::cmp::Reverse(label)))
            .map_or(0, |(label, _)| label);
        (labels, main)
    }

    /// Orthogonal neighbours inside the maze, plus the tunnel landing cell
    fn neighbours(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let (row, col) = self.row_col(index);
        let wrapped = self.resolve_tunnel(row, col);
        [
            row.checked_sub(1).map(|r| (r, col)),
            Some((row + 1, col)),
            col.checked_sub(1).map(|c| (row, c)),
            Some((row, col + 1)),
            (wrapped != (row, col)).then_some(wrapped),
        ]
        .into_iter()
        .flatten()
        .filter_map(move |(r, c)| self.index_of(r, c))
    }

    /// Ensure a coordinate is inside the maze and not a wall; returns its index
    pub fn check_walkable(&self, what: &'static str, coord: CellCoord) -> Result<usize, ConfigError> {
        let index = self.index_of(coord.row, coord.col).ok_or(ConfigError::CellOutOfBounds {
            what,
            row: coord.row,
            column: coord.col,
            rows: self.rows,
            columns: self.columns,
        })?;
        if !self.cells[index].is_walkable() {
            return Err(ConfigError::CellIsWall {
                what,
                row: coord.row,
                column: coord.col,
            });
        }
        Ok(index)
    }

    /// Like [`Self::check_walkable`], but the cell must also be connected to
    /// the main body of the maze
    pub fn check_reachable(&self, what: &'static str, coord: CellCoord) -> Result<usize, ConfigError> {
        let index = self.check_walkable(what, coord)?;
        if !self.is_reachable(index) {
            return Err(ConfigError::Unreachable {
                what,
                row: coord.row,
                column: coord.col,
            });
        }
        Ok(index)
    }

    /// Whether a cell belongs to the largest connected walkable region
    pub fn is_reachable(&self, index: usize) -> bool {
        self.regions.get(index).copied().flatten() == Some(self.main_region)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn tunnel(&self) -> Option<TunnelConfig> {
        self.tunnel
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn waypoints(&self) -> &[usize] {
        &self.waypoints
    }

    pub fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.columns).then(|| row * self.columns + col)
    }

    pub fn row_col(&self, index: usize) -> (usize, usize) {
        (index / self.columns, index % self.columns)
    }

    /// Map a world position to the nearest cell.
    ///
    /// Positions beyond the maze clamp to the closest border cell instead of
    /// failing.
    pub fn world_to_cell(&self, x: f32, z: f32) -> usize {
        let row = clamp_axis((z - self.origin.z) / self.step, self.rows);
        let col = clamp_axis((x - self.origin.x) / self.step, self.columns);
        row * self.columns + col
    }

    /// Apply the tunnel wrap: the end columns of the tunnel row map to the
    /// opposite interior column; every other cell passes through
    pub fn resolve_tunnel(&self, row: usize, col: usize) -> (usize, usize) {
        match self.tunnel {
            Some(t) if row == t.row && col == t.left_column => (row, t.right_interior),
            Some(t) if row == t.row && col == t.right_column => (row, t.left_interior),
            _ => (row, col),
        }
    }

    /// World position of a cell centre
    pub fn cell_world_position(&self, index: usize) -> Option<Vec3> {
        self.positions.get(index).copied()
    }

    /// World position of a cell that can be used as a movement destination
    pub fn walkable_position(&self, index: usize) -> Option<Vec3> {
        self.cell(index)
            .filter(|c| c.is_walkable())
            .and_then(|_| self.cell_world_position(index))
    }
}

fn clamp_axis(scaled: f32, count: usize) -> usize {
    let max = count as i64 - 1;
    (scaled.round() as i64).clamp(0, max) as usize
}
