//! Sheet layout for panel cutting.
//!
//! Given a board size, an optional kerf and a list of rectangular pieces,
//! [`pack_demand`] assigns every piece to a board, positions it and reports
//! how much of each board is used. Known piece sizes are laid out from fixed
//! templates; everything else goes through a greedy corner packer.

pub mod allocator;
pub mod error;
pub mod geometry;
pub mod kerf;
pub mod packer;
pub mod solver;
pub mod templates;
pub mod types;

pub use error::{LayoutError, Result};
pub use solver::Solver;
pub use types::{Demand, Placement, Rect, SheetKind, SheetLayout, SheetSpec, Solution};

/// Lays out `pieces` on boards of size `board`, each piece inflated by `kerf`.
///
/// Fails on a zero board dimension, a negative or non-finite kerf, or a piece
/// with a zero dimension. A piece too large for the board in both
/// orientations still comes back, alone on a `fallback` sheet that overflows
/// the board.
pub fn pack_demand(pieces: &[Rect], board: Rect, kerf: f64) -> Result<Vec<SheetLayout>> {
    let spec = SheetSpec::new(board, kerf)?;
    Ok(Solver::new(spec, pieces.to_vec())?.solve().sheets)
}

/// Percentage of `board` covered by true piece area.
///
/// Placements carry their demanded size, so the kerf the layout was packed
/// with does not enter the figure.
pub fn compute_efficiency(layout: &SheetLayout, board: Rect) -> f64 {
    geometry::efficiency(&layout.placements, board.area() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_demand_rejects_bad_board() {
        assert_eq!(
            pack_demand(&[Rect::new(10, 10)], Rect::new(0, 10), 0.0),
            Err(LayoutError::InvalidBoard(Rect::new(0, 10)))
        );
        assert!(pack_demand(&[Rect::new(10, 10)], Rect::new(10, 10), -0.5).is_err());
    }

    #[test]
    fn test_pack_demand_default_order() {
        let pieces = [
            Rect::new(1200, 800),
            Rect::new(504, 769),
            Rect::new(1200, 800),
            Rect::new(1200, 800),
            Rect::new(1200, 800),
            Rect::new(1200, 800),
        ];
        let sheets = pack_demand(&pieces, types::STANDARD_BOARD, 0.0).unwrap();
        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0].kind, SheetKind::Optimal(Rect::new(1200, 800)));
        assert_eq!(sheets[1].kind, SheetKind::Standard);
        assert_eq!(sheets[1].placements.len(), 1);
    }

    #[test]
    fn test_compute_efficiency_matches_layout() {
        let sheets = pack_demand(&[Rect::new(1400, 1035)], types::STANDARD_BOARD, 2.0).unwrap();
        let eff = compute_efficiency(&sheets[0], types::STANDARD_BOARD);
        assert!((eff - 25.0).abs() < 1e-9);
        assert_eq!(eff, sheets[0].efficiency);
    }
}
