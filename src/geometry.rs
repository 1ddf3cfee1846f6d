use crate::types::{FreeRect, Placement, Rect};

/// Interiors intersect on both axes. Shared edges do not count.
pub fn overlaps(a: &Placement, b: &Placement) -> bool {
    a.x < b.right() && b.x < a.right() && a.y < b.top() && b.y < a.top()
}

/// Sum of the true piece areas, kerf excluded.
pub fn used_area(placements: &[Placement]) -> u64 {
    placements.iter().map(|p| p.piece.area()).sum()
}

/// True used area as a percentage of `board_area`.
///
/// Stays within 0..=100 for in-bounds layouts; an oversized fallback piece can
/// push it past 100.
pub fn efficiency(placements: &[Placement], board_area: f64) -> f64 {
    if placements.is_empty() || board_area <= 0.0 {
        return 0.0;
    }
    used_area(placements) as f64 / board_area * 100.0
}

/// Full-width band above the highest placement.
///
/// This is a display approximation, not a free-space decomposition: gaps
/// beside or between pieces are ignored and the packer never reads it.
/// The kerf offset of the band is the one already inside each footprint: the
/// band starts at the highest top edge, which includes the cut above the
/// highest piece, and a band no taller than the kerf holds no usable material
/// and is dropped.
pub fn free_rectangles(placements: &[Placement], board: Rect, kerf: f64) -> Vec<FreeRect> {
    let board_w = board.w as f64;
    let board_h = board.h as f64;
    let Some(max_top) = placements.iter().map(Placement::top).reduce(f64::max) else {
        return vec![FreeRect {
            x: 0.0,
            y: 0.0,
            w: board_w,
            h: board_h,
        }];
    };

    let band = board_h - max_top;
    if band > kerf {
        vec![FreeRect {
            x: 0.0,
            y: max_top,
            w: board_w,
            h: band,
        }]
    } else {
        vec![]
    }
}
