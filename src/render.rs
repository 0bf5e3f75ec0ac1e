use crate::grid::Grid;

/// Boxed ASCII drawing of a pattern, one labeled cell per box.
///
/// ```text
/// +---+---+
/// | R | G |
/// +---+---+
/// ```
pub fn render_pattern(grid: &Grid) -> String {
    let cols = grid.cols();
    if grid.rows() == 0 || cols == 0 {
        return String::new();
    }

    let border = format!("+{}\n", "---+".repeat(cols));
    let mut result = border.clone();
    for r in 0..grid.rows() {
        result.push('|');
        for cell in grid.row(r) {
            result.push(' ');
            result.push(cell.label());
            result.push_str(" |");
        }
        result.push('\n');
        result.push_str(&border);
    }
    result
}
