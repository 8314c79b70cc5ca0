use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Square board of cells. Every in-bounds coordinate always holds a defined
/// `Cell`; `Empty` is itself a cell state, never an absent entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<Cell>,
}

impl Grid {
    pub fn new(size: Coord) -> Self {
        Self {
            cells: Array2::default((size, size).to_nd_index()),
        }
    }

    pub fn size(&self) -> Coord {
        // square by construction
        self.cells.dim().0.try_into().unwrap()
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len().try_into().unwrap()
    }

    pub fn is_in_bounds(&self, coords: Coord2) -> bool {
        let size = self.cells.dim().0;
        (coords.0 as usize) < size && (coords.1 as usize) < size
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.is_in_bounds(coords) {
            Ok(coords)
        } else {
            Err(SwapError::OutOfBounds)
        }
    }

    pub fn get(&self, coords: Coord2) -> Cell {
        self.cells[coords.to_nd_index()]
    }

    pub fn set(&mut self, coords: Coord2, cell: Cell) {
        self.cells[coords.to_nd_index()] = cell;
    }

    /// Category resolved through specials and hidden obstacles.
    pub fn category_at(&self, coords: Coord2) -> Option<Category> {
        self.get(coords).resolved_category()
    }

    /// Category visible to match detection at this coordinate.
    pub(crate) fn match_category_at(&self, coords: Coord2) -> Option<Category> {
        self.get(coords).match_category()
    }

    pub fn swap_cells(&mut self, a: Coord2, b: Coord2) {
        let cell_a = self.get(a);
        self.set(a, self.get(b));
        self.set(b, cell_a);
    }
}

impl core::ops::Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, (x, y): Coord2) -> &Self::Output {
        &self.cells[(x as usize, y as usize)]
    }
}

impl core::ops::IndexMut<Coord2> for Grid {
    fn index_mut(&mut self, (x, y): Coord2) -> &mut Self::Output {
        &mut self.cells[(x as usize, y as usize)]
    }
}

/// Builds a grid from rows written top-down, so boards in tests read the way
/// they look on screen. Digits are piece categories, `#` an obstacle, `L` a
/// locked piece of category 0, `*` a special of category 0, `.` empty.
#[cfg(test)]
pub(crate) fn grid_from_rows(rows: &[&str]) -> Grid {
    let size = rows.len() as Coord;
    let mut grid = Grid::new(size);
    for (row_idx, row) in rows.iter().enumerate() {
        let y = size - 1 - row_idx as Coord;
        for (x, ch) in row.chars().enumerate() {
            let cell = match ch {
                '#' => Cell::Obstacle {
                    hits_taken: 0,
                    hits_to_break: 1,
                    hidden: None,
                },
                'L' => Cell::Piece {
                    category: Category(0),
                    locked: true,
                },
                '*' => Cell::Special(Category(0)),
                '.' => Cell::Empty,
                digit => Cell::piece(Category(digit.to_digit(10).unwrap() as u8)),
            };
            grid.set((x as Coord, y), cell);
        }
    }
    grid
}
