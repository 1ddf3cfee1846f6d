use std::cmp::Reverse;

use crate::geometry::overlaps;
use crate::kerf;
use crate::types::{Placement, Rect, SheetKind, SheetLayout, SheetSpec};

/// A sheet under construction for the corner-candidate heuristic.
#[derive(Debug, Clone)]
pub struct SheetBuilder {
    spec: SheetSpec,
    pub placements: Vec<Placement>,
}

impl SheetBuilder {
    pub fn new(spec: SheetSpec) -> Self {
        Self {
            spec,
            placements: Vec::new(),
        }
    }

    /// The origin plus the right and top anchor of every placed piece.
    pub fn anchors(&self) -> Vec<(f64, f64)> {
        let mut anchors = Vec::with_capacity(1 + 2 * self.placements.len());
        anchors.push((0.0, 0.0));
        for p in &self.placements {
            anchors.push((p.right(), p.y));
            anchors.push((p.x, p.top()));
        }
        anchors
    }

    /// First anchor and orientation that fit, trying upright before rotated at each anchor.
    pub fn find_position(&self, piece: Rect) -> Option<Placement> {
        let (w, h) = kerf::inflate(piece, self.spec.kerf);
        let orientations: &[bool] = if piece.w != piece.h {
            &[false, true]
        } else {
            &[false]
        };

        for (x, y) in self.anchors() {
            for &rotated in orientations {
                let (cw, ch) = if rotated { (h, w) } else { (w, h) };
                let candidate = Placement {
                    x,
                    y,
                    w: cw,
                    h: ch,
                    piece,
                    rotated,
                };
                if self.accepts(&candidate) {
                    return Some(candidate);
                }
            }
        }
        None
    }

    fn accepts(&self, candidate: &Placement) -> bool {
        candidate.fits_in(self.spec.board)
            && !self.placements.iter().any(|p| overlaps(p, candidate))
    }

    pub fn try_place(&mut self, piece: Rect) -> bool {
        match self.find_position(piece) {
            Some(placement) => {
                self.placements.push(placement);
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn finish(self) -> SheetLayout {
        SheetLayout::new(SheetKind::Standard, self.placements, &self.spec)
    }
}

/// A sheet holding only `piece` at the origin, unrotated and unchecked.
pub fn fallback_sheet(piece: Rect, spec: &SheetSpec) -> SheetLayout {
    let (w, h) = kerf::inflate(piece, spec.kerf);
    let placement = Placement {
        x: 0.0,
        y: 0.0,
        w,
        h,
        piece,
        rotated: false,
    };
    SheetLayout::new(SheetKind::Fallback, vec![placement], spec)
}

/// Packs `pieces` one sheet at a time, largest true area first.
///
/// Each pass fills a fresh sheet with whatever fits. A pass that places
/// nothing forces the first remaining piece onto a fallback sheet, so the
/// loop ends after at most `pieces.len()` sheets.
pub fn pack(pieces: Vec<Rect>, spec: &SheetSpec) -> Vec<SheetLayout> {
    let mut sheets = Vec::new();
    let mut residual = pieces;

    while !residual.is_empty() {
        // Stable: equal areas keep their relative order.
        residual.sort_by_key(|r| Reverse(r.area()));

        let mut sheet = SheetBuilder::new(*spec);
        let mut leftover = Vec::with_capacity(residual.len());
        for piece in residual.drain(..) {
            if !sheet.try_place(piece) {
                leftover.push(piece);
            }
        }

        if sheet.is_empty() {
            let first = leftover.remove(0);
            let layout = fallback_sheet(first, spec);
            tracing::debug!(piece = %first, "no piece fits a fresh sheet, forcing fallback");
            if layout.exceeds_board(spec.board) {
                tracing::warn!(piece = %first, board = %spec.board, "piece exceeds the board");
            }
            sheets.push(layout);
        } else {
            let layout = sheet.finish();
            tracing::debug!(
                pieces = layout.placements.len(),
                efficiency = layout.efficiency,
                remaining = leftover.len(),
                "standard sheet finished"
            );
            sheets.push(layout);
        }

        residual = leftover;
    }

    sheets
}
