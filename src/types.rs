use serde::{Deserialize, Deserializer, Serialize};

/// Label written into an empty cell.
pub const EMPTY_LABEL: char = 'E';

/// Upper bound on shapes per run; the driver walks all K! insertion orders.
pub const MAX_SHAPES: usize = 8;

/// Upper bound on `rows * cols`. Every placement clones the whole grid.
pub const MAX_CELLS: usize = 1 << 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridSize {
    #[serde(deserialize_with = "deserialize_usize_from_number")]
    pub rows: usize,
    #[serde(deserialize_with = "deserialize_usize_from_number")]
    pub cols: usize,
}

impl GridSize {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Cell count of a validated size.
    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }

    /// Cell count, or `None` when `rows * cols` overflows.
    pub fn checked_cells(&self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }
}

impl std::fmt::Display for GridSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub char);

impl Color {
    pub fn label(&self) -> char {
        self.0
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cell {
    Empty,
    Filled(Color),
}

impl Cell {
    pub fn label(&self) -> char {
        match self {
            Cell::Empty => EMPTY_LABEL,
            Cell::Filled(color) => color.label(),
        }
    }

    pub fn from_label(label: char) -> Self {
        if label == EMPTY_LABEL {
            Cell::Empty
        } else {
            Cell::Filled(Color(label))
        }
    }
}

/// A dimension pair, either a shape's primary orientation or its 90° flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Orientation {
    pub height: usize,
    pub width: usize,
}

impl Orientation {
    pub fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    pub fn area(&self) -> usize {
        self.height * self.width
    }

    pub fn rotated(&self) -> Self {
        Self {
            height: self.width,
            width: self.height,
        }
    }

    pub fn is_square(&self) -> bool {
        self.height == self.width
    }

    pub fn fits_in(&self, size: GridSize) -> bool {
        self.height <= size.rows && self.width <= size.cols
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.height, self.width)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    #[serde(deserialize_with = "deserialize_usize_from_number")]
    pub height: usize,
    #[serde(deserialize_with = "deserialize_usize_from_number")]
    pub width: usize,
    pub color: Color,
    #[serde(default = "default_true")]
    pub allow_rotate: bool,
}

impl Shape {
    pub fn new(height: usize, width: usize, color: char) -> Self {
        Self {
            height,
            width,
            color: Color(color),
            allow_rotate: true,
        }
    }

    pub fn fixed(height: usize, width: usize, color: char) -> Self {
        Self {
            allow_rotate: false,
            ..Self::new(height, width, color)
        }
    }

    pub fn primary(&self) -> Orientation {
        Orientation::new(self.height, self.width)
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} ({})", self.height, self.width, self.color)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub orientation: Orientation,
    pub row: usize,
    pub col: usize,
    pub color: Color,
}

impl Placement {
    pub fn row_end(&self) -> usize {
        self.row + self.orientation.height
    }

    pub fn col_end(&self) -> usize {
        self.col + self.orientation.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapPolicy {
    /// A placement may only cover empty cells.
    #[default]
    OverlapForbidden,
    /// Later placements paint over earlier ones.
    OverlapAllowed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisibilityMode {
    #[default]
    None,
    AllVisible,
    FirstOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CanonicalMode {
    #[default]
    Exact,
    Renamed,
    Symmetric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnumerationConfig {
    #[serde(default)]
    pub overlap: OverlapPolicy,
    #[serde(default)]
    pub visibility: VisibilityMode,
    #[serde(default)]
    pub canonical: CanonicalMode,
}

fn default_true() -> bool {
    true
}

/// Accepts both integer and float JSON numbers (e.g. `3` or `3.0`).
pub fn deserialize_usize_from_number<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Number::deserialize(deserializer)?;
    if let Some(n) = value.as_u64() {
        return usize::try_from(n).map_err(serde::de::Error::custom);
    }
    match value.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f < usize::MAX as f64 => Ok(f as usize),
        _ => Err(serde::de::Error::custom(format!(
            "expected a non-negative whole number, got {value}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_rotated_swaps_dimensions() {
        let o = Orientation::new(2, 5);
        assert_eq!(o.rotated(), Orientation::new(5, 2));
        assert!(!o.is_square());
        assert!(Orientation::new(3, 3).is_square());
    }

    #[test]
    fn test_orientation_fits_in() {
        let size = GridSize::new(3, 9);
        assert!(Orientation::new(2, 5).fits_in(size));
        assert!(!Orientation::new(5, 2).fits_in(size));
    }

    #[test]
    fn test_cell_labels() {
        assert_eq!(Cell::Empty.label(), 'E');
        assert_eq!(Cell::Filled(Color('R')).label(), 'R');
        assert_eq!(Cell::from_label('E'), Cell::Empty);
        assert_eq!(Cell::from_label('G'), Cell::Filled(Color('G')));
    }

    #[test]
    fn test_shape_deserializes_float_dimensions() {
        let shape: Shape =
            serde_json::from_str(r#"{"height": 2.0, "width": 5, "color": "G"}"#).unwrap();
        assert_eq!(shape, Shape::new(2, 5, 'G'));
        assert!(shape.allow_rotate);
    }

    #[test]
    fn test_shape_rejects_fractional_dimensions() {
        let err = serde_json::from_str::<Shape>(r#"{"height": 2.5, "width": 5, "color": "G"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_grid_size_rejects_out_of_range_floats() {
        // 2^64 would saturate to usize::MAX through `as`.
        let err =
            serde_json::from_str::<GridSize>(r#"{"rows": 18446744073709551616.0, "cols": 1}"#);
        assert!(err.is_err());
        let err = serde_json::from_str::<GridSize>(r#"{"rows": -1.0, "cols": 1}"#);
        assert!(err.is_err());
        let size: GridSize = serde_json::from_str(r#"{"rows": 3.0, "cols": 9}"#).unwrap();
        assert_eq!(size, GridSize::new(3, 9));
    }

    #[test]
    fn test_checked_cells_detects_overflow() {
        assert_eq!(GridSize::new(3, 9).checked_cells(), Some(27));
        assert_eq!(GridSize::new(usize::MAX, 2).checked_cells(), None);
    }

    #[test]
    fn test_config_defaults_and_kebab_case() {
        let config: EnumerationConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EnumerationConfig::default());
        assert_eq!(config.overlap, OverlapPolicy::OverlapForbidden);

        let config: EnumerationConfig = serde_json::from_str(
            r#"{"overlap": "overlap-allowed", "visibility": "first-only", "canonical": "symmetric"}"#,
        )
        .unwrap();
        assert_eq!(config.overlap, OverlapPolicy::OverlapAllowed);
        assert_eq!(config.visibility, VisibilityMode::FirstOnly);
        assert_eq!(config.canonical, CanonicalMode::Symmetric);
    }
}
