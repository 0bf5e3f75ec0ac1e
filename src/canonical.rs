use std::collections::HashMap;

use itertools::Itertools;

use crate::catalog;
use crate::grid::Grid;
use crate::types::{CanonicalMode, Cell, Color, EMPTY_LABEL, MAX_SHAPES, Orientation, Shape};

/// Substitute symbols handed out by catalog position. None of them is the
/// empty label, so renaming stays a bijection.
const SUBSTITUTES: [char; MAX_SHAPES] = ['X', 'Y', 'Z', 'W', 'V', 'U', 'T', 'S'];

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pure function of cell contents. Built once per run from the shape
/// catalog because the renaming modes need to know every color.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    mode: CanonicalMode,
    /// One color-to-symbol table per relabeling considered. `Exact` has none,
    /// `Renamed` has exactly one.
    relabelings: Vec<HashMap<Color, char>>,
}

impl Canonicalizer {
    /// # Panics
    ///
    /// The renaming modes hand out one substitute symbol per shape and panic
    /// on more than `MAX_SHAPES` shapes. `catalog::validate` rejects such a
    /// catalog first.
    pub fn new(mode: CanonicalMode, shapes: &[Shape]) -> Self {
        if mode != CanonicalMode::Exact {
            assert!(
                shapes.len() <= SUBSTITUTES.len(),
                "{} shapes given, renaming supports at most {}",
                shapes.len(),
                SUBSTITUTES.len()
            );
        }
        let relabelings = match mode {
            CanonicalMode::Exact => Vec::new(),
            CanonicalMode::Renamed => vec![identity_relabeling(shapes)],
            CanonicalMode::Symmetric => symmetric_relabelings(shapes),
        };
        Self { mode, relabelings }
    }

    pub fn mode(&self) -> CanonicalMode {
        self.mode
    }

    pub fn key(&self, grid: &Grid) -> CanonicalKey {
        if self.relabelings.is_empty() {
            return CanonicalKey(grid.labels().collect());
        }
        self.relabelings
            .iter()
            .map(|table| relabel(grid, table))
            .min()
            .map(CanonicalKey)
            .unwrap_or_else(|| CanonicalKey(grid.labels().collect()))
    }
}

fn identity_relabeling(shapes: &[Shape]) -> HashMap<Color, char> {
    shapes
        .iter()
        .zip(SUBSTITUTES)
        .map(|(shape, symbol)| (shape.color, symbol))
        .collect()
}

/// Shapes with the same orientation set are interchangeable; every
/// permutation of substitute symbols inside such a class is a candidate.
fn symmetric_relabelings(shapes: &[Shape]) -> Vec<HashMap<Color, char>> {
    let mut classes: Vec<(Vec<Orientation>, Vec<usize>)> = Vec::new();
    for (i, shape) in shapes.iter().enumerate() {
        let mut key = catalog::orientations(shape);
        key.sort();
        match classes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(i),
            None => classes.push((key, vec![i])),
        }
    }

    let per_class: Vec<Vec<Vec<(usize, usize)>>> = classes
        .iter()
        .map(|(_, members)| {
            members
                .iter()
                .copied()
                .permutations(members.len())
                .map(|perm| members.iter().copied().zip(perm).collect())
                .collect()
        })
        .collect();

    per_class
        .into_iter()
        .multi_cartesian_product()
        .map(|choice| {
            choice
                .into_iter()
                .flatten()
                .map(|(shape_idx, symbol_idx)| {
                    (shapes[shape_idx].color, SUBSTITUTES[symbol_idx])
                })
                .collect()
        })
        .collect()
}

fn relabel(grid: &Grid, table: &HashMap<Color, char>) -> String {
    grid.cells()
        .iter()
        .map(|cell| match cell {
            Cell::Empty => EMPTY_LABEL,
            Cell::Filled(color) => table.get(color).copied().unwrap_or(color.label()),
        })
        .collect()
}
