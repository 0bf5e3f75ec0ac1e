use serde::{Serialize, Serializer};

use crate::types::{Cell, Color, GridSize, Orientation, Placement};

/// Row-major labeled cell array. Never mutated once handed out; `place`
/// returns a fresh copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: GridSize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn empty(size: GridSize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size.cells()],
        }
    }

    /// Builds a grid from label rows. Returns `None` when rows are ragged.
    pub fn from_rows<R: AsRef<[char]>>(rows: &[R]) -> Option<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        if rows.iter().any(|r| r.as_ref().len() != cols) {
            return None;
        }
        let cells = rows
            .iter()
            .flat_map(|r| r.as_ref().iter().map(|&c| Cell::from_label(c)))
            .collect();
        Some(Self {
            size: GridSize::new(rows.len(), cols),
            cells,
        })
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn rows(&self) -> usize {
        self.size.rows
    }

    pub fn cols(&self) -> usize {
        self.size.cols
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.size.cols + col]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.size.cols;
        &self.cells[start..start + self.size.cols]
    }

    /// Bounds-only check for anchoring `orientation` at (`row`, `col`).
    pub fn fits(&self, row: usize, col: usize, orientation: Orientation) -> bool {
        row + orientation.height <= self.size.rows && col + orientation.width <= self.size.cols
    }

    /// True iff every footprint cell is empty. Callers check `fits` first.
    pub fn is_clear(&self, row: usize, col: usize, orientation: Orientation) -> bool {
        (row..row + orientation.height).all(|r| {
            self.row(r)[col..col + orientation.width]
                .iter()
                .all(|&c| c == Cell::Empty)
        })
    }

    pub fn contains_color(&self, color: Color) -> bool {
        self.cells.contains(&Cell::Filled(color))
    }

    pub fn place(&self, placement: &Placement) -> Grid {
        let mut next = self.clone();
        let cols = self.size.cols;
        for r in placement.row..placement.row_end() {
            let start = r * cols;
            next.cells[start + placement.col..start + placement.col_end()]
                .fill(Cell::Filled(placement.color));
        }
        next
    }

    pub fn labels(&self) -> impl Iterator<Item = char> + '_ {
        self.cells.iter().map(Cell::label)
    }

    pub fn row_strings(&self) -> Vec<String> {
        (0..self.size.rows)
            .map(|r| self.row(r).iter().map(Cell::label).collect())
            .collect()
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in self.row_strings() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.row_strings())
    }
}
