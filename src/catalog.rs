use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::{Color, EMPTY_LABEL, GridSize, MAX_CELLS, MAX_SHAPES, Orientation, Shape};

/// Characters the pattern file format uses as delimiters.
const RESERVED_LABELS: [char; 5] = ['[', ']', ',', '\'', '"'];

/// Orientations in catalog order: primary first, then the 90° flip when the
/// shape is a rotatable non-square. The order drives first-occurrence
/// tie-breaks downstream.
pub fn orientations(shape: &Shape) -> Vec<Orientation> {
    let primary = shape.primary();
    if shape.allow_rotate && !primary.is_square() {
        vec![primary, primary.rotated()]
    } else {
        vec![primary]
    }
}

pub fn is_reserved(color: Color) -> bool {
    let c = color.label();
    c == EMPTY_LABEL || c.is_whitespace() || c.is_control() || RESERVED_LABELS.contains(&c)
}

/// Checks the whole run up front; the first failure halts before any
/// enumeration starts.
pub fn validate(size: GridSize, shapes: &[Shape]) -> Result<(), ValidationError> {
    if size.rows == 0 || size.cols == 0 {
        return Err(ValidationError::EmptyGrid(size));
    }
    if size.checked_cells().is_none_or(|cells| cells > MAX_CELLS) {
        return Err(ValidationError::GridTooLarge {
            grid: size,
            max: MAX_CELLS,
        });
    }
    if shapes.is_empty() {
        return Err(ValidationError::NoShapes);
    }
    if shapes.len() > MAX_SHAPES {
        return Err(ValidationError::TooManyShapes {
            count: shapes.len(),
            max: MAX_SHAPES,
        });
    }

    let mut seen = HashSet::new();
    for shape in shapes {
        if shape.height == 0 || shape.width == 0 {
            return Err(ValidationError::ZeroSizedShape(*shape));
        }
        if is_reserved(shape.color) {
            return Err(ValidationError::ReservedColor(shape.color));
        }
        if !seen.insert(shape.color) {
            return Err(ValidationError::DuplicateColor(shape.color));
        }
        if !orientations(shape).iter().any(|o| o.fits_in(size)) {
            return Err(ValidationError::ShapeTooLarge {
                shape: *shape,
                grid: size,
            });
        }
    }
    Ok(())
}
