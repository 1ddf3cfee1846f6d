use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{LayoutError, Result};
use crate::geometry;

/// Standard particle board, 2800x2070 mm.
pub const STANDARD_BOARD: Rect = Rect::new(2800, 2070);
/// Large format board, 3050x1830 mm.
pub const LARGE_BOARD: Rect = Rect::new(3050, 1830);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub w: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub h: u32,
}

impl Rect {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    pub fn rotated(&self) -> Self {
        Self {
            w: self.h,
            h: self.w,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

/// Accepts any JSON number that holds a non-negative whole value (`3` or `3.0`).
pub fn deserialize_u32_from_number<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let v = f64::deserialize(deserializer)?;
    if v.fract() != 0.0 || v < 0.0 || v > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "expected a non-negative integer, got {v}"
        )));
    }
    Ok(v as u32)
}

/// A piece size together with how many copies are wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Demand {
    pub rect: Rect,
    pub qty: u32,
}

/// Flattens quantities into the multiset of individual pieces, keeping input order.
pub fn expand_demands(demands: &[Demand]) -> Vec<Rect> {
    demands
        .iter()
        .flat_map(|d| std::iter::repeat_n(d.rect, d.qty as usize))
        .collect()
}

/// Board size plus the blade allowance added to every piece.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SheetSpec {
    pub board: Rect,
    pub kerf: f64,
}

impl SheetSpec {
    pub fn new(board: Rect, kerf: f64) -> Result<Self> {
        if board.is_empty() {
            return Err(LayoutError::InvalidBoard(board));
        }
        if !kerf.is_finite() || kerf < 0.0 {
            return Err(LayoutError::InvalidKerf(kerf));
        }
        Ok(Self { board, kerf })
    }

    pub fn area(&self) -> f64 {
        self.board.area() as f64
    }
}

/// A piece on a sheet. `w`/`h` are the footprint including kerf; `piece` is
/// the demanded size, in demand orientation, without kerf.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub piece: Rect,
    pub rotated: bool,
}

impl Placement {
    /// Size of the piece cut from this footprint, in placed orientation.
    pub fn true_size(&self) -> Rect {
        if self.rotated {
            self.piece.rotated()
        } else {
            self.piece
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn top(&self) -> f64 {
        self.y + self.h
    }

    pub fn fits_in(&self, board: Rect) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.right() <= board.w as f64 && self.top() <= board.h as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FreeRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// How a sheet was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetKind {
    /// A full copy of the template for this piece size.
    Optimal(Rect),
    Standard,
    /// One piece forced onto its own sheet without a size check.
    Fallback,
}

impl std::fmt::Display for SheetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetKind::Optimal(key) => write!(f, "optimal:{key}"),
            SheetKind::Standard => f.write_str("standard"),
            SheetKind::Fallback => f.write_str("fallback"),
        }
    }
}

impl Serialize for SheetKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetLayout {
    pub kind: SheetKind,
    pub placements: Vec<Placement>,
    pub free_rects: Vec<FreeRect>,
    pub efficiency: f64,
}

impl SheetLayout {
    /// Finalizes a sheet, deriving its leftover band and efficiency.
    pub fn new(kind: SheetKind, placements: Vec<Placement>, spec: &SheetSpec) -> Self {
        let free_rects = geometry::free_rectangles(&placements, spec.board, spec.kerf);
        let efficiency = geometry::efficiency(&placements, spec.area());
        Self {
            kind,
            placements,
            free_rects,
            efficiency,
        }
    }

    pub fn used_area(&self) -> u64 {
        geometry::used_area(&self.placements)
    }

    /// True piece sizes in placement order, as drawn on the sheet.
    pub fn true_sizes(&self) -> Vec<Rect> {
        self.placements.iter().map(Placement::true_size).collect()
    }

    /// True when some placement sticks out of the board. Only fallback sheets can do this.
    pub fn exceeds_board(&self, board: Rect) -> bool {
        self.placements.iter().any(|p| !p.fits_in(board))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    pub sheets: Vec<SheetLayout>,
    pub spec: SheetSpec,
}

impl Solution {
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn piece_count(&self) -> usize {
        self.sheets.iter().map(|s| s.placements.len()).sum()
    }

    /// True used area over the area of every emitted board, as a percentage.
    pub fn overall_efficiency(&self) -> f64 {
        let total_area = self.spec.area() * self.sheets.len() as f64;
        if total_area == 0.0 {
            return 0.0;
        }
        let used: u64 = self.sheets.iter().map(SheetLayout::used_area).sum();
        used as f64 / total_area * 100.0
    }

    /// Indices of sheets holding a piece that does not fit the board.
    pub fn overflowing_sheets(&self) -> Vec<usize> {
        self.sheets
            .iter()
            .enumerate()
            .filter(|(_, s)| s.exceeds_board(self.spec.board))
            .map(|(i, _)| i)
            .collect()
    }
}
