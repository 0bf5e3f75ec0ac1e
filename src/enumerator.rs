use crate::catalog;
use crate::grid::Grid;
use crate::types::{OverlapPolicy, Placement, Shape};

/// Every legal placement of `shape` on `grid`, as new grids.
///
/// Order: orientation (catalog order), then anchor row, then anchor column,
/// all ascending. Dedup "first occurrence" results depend on it.
pub fn enumerate<'a>(
    grid: &'a Grid,
    shape: &Shape,
    policy: OverlapPolicy,
) -> impl Iterator<Item = Grid> + use<'a> {
    let color = shape.color;
    let rows = grid.rows();
    let cols = grid.cols();
    catalog::orientations(shape)
        .into_iter()
        .flat_map(move |orientation| {
            (0..rows).flat_map(move |row| {
                (0..cols).map(move |col| Placement {
                    orientation,
                    row,
                    col,
                    color,
                })
            })
        })
        .filter(move |p| grid.fits(p.row, p.col, p.orientation))
        .filter(move |p| match policy {
            OverlapPolicy::OverlapForbidden => grid.is_clear(p.row, p.col, p.orientation),
            OverlapPolicy::OverlapAllowed => true,
        })
        .map(move |p| grid.place(&p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, GridSize, Orientation};

    #[test]
    fn test_unit_shape_on_empty_grid() {
        let grid = Grid::empty(GridSize::new(2, 2));
        let out: Vec<Grid> =
            enumerate(&grid, &Shape::new(1, 1, 'R'), OverlapPolicy::OverlapForbidden).collect();
        assert_eq!(out.len(), 4);
        let firsts: Vec<String> = out.iter().map(|g| g.labels().collect()).collect();
        assert_eq!(firsts, vec!["REEE", "EREE", "EERE", "EEER"]);
    }

    #[test]
    fn test_orientation_order_before_anchor_order() {
        let grid = Grid::empty(GridSize::new(2, 2));
        let out: Vec<String> =
            enumerate(&grid, &Shape::new(1, 2, 'G'), OverlapPolicy::OverlapForbidden)
                .map(|g| g.labels().collect())
                .collect();
        // Horizontal anchors first, then vertical.
        assert_eq!(out, vec!["GGEE", "EEGG", "GEGE", "EGEG"]);
    }

    #[test]
    fn test_overlap_forbidden_skips_occupied_anchors() {
        let grid = Grid::empty(GridSize::new(2, 2)).place(&Placement {
            orientation: Orientation::new(1, 1),
            row: 0,
            col: 0,
            color: Color('R'),
        });
        let forbidden =
            enumerate(&grid, &Shape::new(1, 1, 'G'), OverlapPolicy::OverlapForbidden).count();
        let allowed =
            enumerate(&grid, &Shape::new(1, 1, 'G'), OverlapPolicy::OverlapAllowed).count();
        assert_eq!(forbidden, 3);
        assert_eq!(allowed, 4);
    }

    #[test]
    fn test_exhausted_branch_yields_nothing() {
        let grid = Grid::empty(GridSize::new(2, 2)).place(&Placement {
            orientation: Orientation::new(2, 2),
            row: 0,
            col: 0,
            color: Color('R'),
        });
        let out =
            enumerate(&grid, &Shape::new(1, 1, 'G'), OverlapPolicy::OverlapForbidden).count();
        assert_eq!(out, 0);
    }

    #[test]
    fn test_rotated_orientation_only_where_it_fits() {
        let grid = Grid::empty(GridSize::new(3, 9));
        let out =
            enumerate(&grid, &Shape::new(2, 5, 'G'), OverlapPolicy::OverlapForbidden).count();
        // 2x5: 2 rows x 5 cols of anchors; 5x2 never fits in 3 rows.
        assert_eq!(out, 10);
    }
}
