use thiserror::Error;

use crate::types::{Color, GridSize, Shape};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("grid {0} has no cells")]
    EmptyGrid(GridSize),
    #[error("grid {grid} exceeds the limit of {max} cells")]
    GridTooLarge { grid: GridSize, max: usize },
    #[error("no shapes given")]
    NoShapes,
    #[error("{count} shapes given, at most {max} are supported")]
    TooManyShapes { count: usize, max: usize },
    #[error("shape {0} has a zero dimension")]
    ZeroSizedShape(Shape),
    #[error("color '{0}' is reserved and cannot be assigned to a shape")]
    ReservedColor(Color),
    #[error("color '{0}' is assigned to more than one shape")]
    DuplicateColor(Color),
    #[error("shape {shape} does not fit in grid {grid}")]
    ShapeTooLarge { shape: Shape, grid: GridSize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("text found before the first 'Pattern <N>:' header")]
    MissingHeader,
    #[error("invalid header '{0}', expected 'Pattern <N>:'")]
    BadHeader(String),
    #[error("block has no rows")]
    EmptyBlock,
    #[error("unexpected character '{0}' in row literal")]
    UnexpectedChar(char),
    #[error("token '{0}' is not a single quoted character")]
    BadToken(String),
    #[error("unterminated quoted token")]
    UnterminatedToken,
    #[error("unbalanced brackets")]
    UnbalancedBrackets,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// A malformed block in a serialized pattern file. `block` is 1-based;
/// block 0 is the preamble before the first header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("pattern block {block}: {kind}")]
pub struct PatternParseError {
    pub block: usize,
    pub kind: ParseErrorKind,
}

impl PatternParseError {
    pub fn new(block: usize, kind: ParseErrorKind) -> Self {
        Self { block, kind }
    }
}
