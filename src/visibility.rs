use crate::grid::Grid;
use crate::types::{Shape, VisibilityMode};

/// Decides whether a fully built grid survives. `placed` lists the shapes in
/// the order they were placed.
pub fn retains(mode: VisibilityMode, grid: &Grid, placed: &[&Shape]) -> bool {
    match mode {
        VisibilityMode::None => true,
        VisibilityMode::AllVisible => placed.iter().all(|s| grid.contains_color(s.color)),
        VisibilityMode::FirstOnly => placed
            .first()
            .is_none_or(|s| grid.contains_color(s.color)),
    }
}
