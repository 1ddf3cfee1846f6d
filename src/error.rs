use crate::types::Rect;

pub type Result<T> = std::result::Result<T, LayoutError>;

/// Input rejected before any packing happens.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("board dimensions must be non-zero, got {0}")]
    InvalidBoard(Rect),

    #[error("kerf must be a finite non-negative number, got {0}")]
    InvalidKerf(f64),

    #[error("piece #{index} has a zero dimension ({piece})")]
    InvalidPiece { index: usize, piece: Rect },
}
