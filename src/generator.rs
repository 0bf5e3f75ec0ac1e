use itertools::Itertools;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::catalog;
use crate::enumerator;
use crate::error::ValidationError;
use crate::grid::Grid;
use crate::types::{GridSize, OverlapPolicy, Shape, VisibilityMode};
use crate::visibility;

/// Drives placement across every insertion order of the shapes.
pub struct Generator {
    size: GridSize,
    shapes: Vec<Shape>,
    overlap: OverlapPolicy,
    visibility: VisibilityMode,
}

impl Generator {
    /// Validates the inputs once; a generator that exists can always run.
    pub fn new(
        size: GridSize,
        shapes: Vec<Shape>,
        overlap: OverlapPolicy,
        visibility: VisibilityMode,
    ) -> Result<Self, ValidationError> {
        catalog::validate(size, &shapes)?;
        Ok(Self {
            size,
            shapes,
            overlap,
            visibility,
        })
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Permutations of shape indices in lexicographic order.
    pub fn orders(&self) -> Vec<Vec<usize>> {
        let k = self.shapes.len();
        (0..k).permutations(k).collect()
    }

    /// The raw pattern stream, duplicates included, in canonical order:
    /// permutation order first, then per-step enumeration order. Only one
    /// insertion order is expanded at a time.
    pub fn stream(&self) -> impl Iterator<Item = Grid> + '_ {
        let k = self.shapes.len();
        info!(grid = %self.size, shapes = k, "streaming patterns");
        (0..k)
            .permutations(k)
            .flat_map(move |order| self.expand_order(&order))
    }

    /// Same stream as `stream`. Orders are expanded on the rayon pool one
    /// batch of `current_num_threads()` at a time and yielded in order.
    pub fn stream_parallel(&self) -> impl Iterator<Item = Grid> + '_ {
        let orders = self.orders();
        let batch = rayon::current_num_threads().max(1);
        info!(
            grid = %self.size,
            shapes = self.shapes.len(),
            orders = orders.len(),
            batch,
            "streaming patterns in parallel"
        );
        (0..orders.len()).step_by(batch).flat_map(move |start| {
            let end = (start + batch).min(orders.len());
            let expanded: Vec<Vec<Grid>> = orders[start..end]
                .par_iter()
                .map(|order| self.expand_order(order))
                .collect();
            expanded.into_iter().flatten()
        })
    }

    /// The whole raw stream in memory.
    pub fn generate(&self) -> Vec<Grid> {
        self.stream().collect()
    }

    pub fn generate_parallel(&self) -> Vec<Grid> {
        self.stream_parallel().collect()
    }

    /// All final grids for one insertion order, after the visibility filter.
    pub fn expand_order(&self, order: &[usize]) -> Vec<Grid> {
        let placed: Vec<&Shape> = order.iter().map(|&i| &self.shapes[i]).collect();

        let mut working = vec![Grid::empty(self.size)];
        for shape in &placed {
            working = working
                .iter()
                .flat_map(|grid| enumerator::enumerate(grid, shape, self.overlap))
                .collect();
            if working.is_empty() {
                break;
            }
        }

        let built = working.len();
        working.retain(|grid| visibility::retains(self.visibility, grid, &placed));
        debug!(?order, built, kept = working.len(), "expanded order");
        working
    }
}
