use crate::allocator;
use crate::error::{LayoutError, Result};
use crate::packer;
use crate::types::{Rect, SheetSpec, Solution};

pub struct Solver {
    spec: SheetSpec,
    pieces: Vec<Rect>,
}

impl Solver {
    /// Rejects pieces with a zero dimension. `spec` is already validated.
    pub fn new(spec: SheetSpec, pieces: Vec<Rect>) -> Result<Self> {
        if let Some((index, &piece)) = pieces.iter().enumerate().find(|(_, p)| p.is_empty()) {
            return Err(LayoutError::InvalidPiece { index, piece });
        }
        Ok(Self { spec, pieces })
    }

    pub fn solve(&self) -> Solution {
        if self.pieces.is_empty() {
            return Solution {
                sheets: vec![],
                spec: self.spec,
            };
        }

        // Template phase: whole sheets for known sizes
        let allocation = allocator::allocate(&self.pieces, &self.spec);
        let mut sheets = allocation.sheets;

        // Greedy phase: template remainders and everything else
        sheets.extend(packer::pack(allocation.residual, &self.spec));

        let solution = Solution {
            sheets,
            spec: self.spec,
        };
        tracing::debug!(
            board = %self.spec.board,
            kerf = self.spec.kerf,
            pieces = self.pieces.len(),
            sheets = solution.sheet_count(),
            efficiency = solution.overall_efficiency(),
            "layout finished"
        );
        solution
    }
}
