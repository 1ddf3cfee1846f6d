//! Hand-tuned arrangements for piece sizes that recur often enough to beat
//! the greedy packer.
//!
//! Lookup is by the exact, unrotated piece size. The 1200x800 and 800x1200
//! entries are authored independently; neither is derived from the other.

use crate::kerf;
use crate::types::{Placement, Rect, SheetSpec};

/// One slot of a template, in true (uninflated) units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    pub rotated: bool,
}

impl Slot {
    const fn new(x: u32, y: u32, w: u32, h: u32, rotated: bool) -> Self {
        Self { x, y, w, h, rotated }
    }
}

#[derive(Debug)]
pub struct Template {
    pub key: Rect,
    pub slots: &'static [Slot],
}

// Three upright pieces across, two lying pieces above: 2400x2000.
static LANDSCAPE_1200X800: Template = Template {
    key: Rect::new(1200, 800),
    slots: &[
        Slot::new(0, 0, 800, 1200, true),
        Slot::new(800, 0, 800, 1200, true),
        Slot::new(1600, 0, 800, 1200, true),
        Slot::new(0, 1200, 1200, 800, false),
        Slot::new(1200, 1200, 1200, 800, false),
    ],
};

// Two lying pieces across, three upright pieces above: 2400x2000.
static PORTRAIT_800X1200: Template = Template {
    key: Rect::new(800, 1200),
    slots: &[
        Slot::new(0, 0, 1200, 800, true),
        Slot::new(1200, 0, 1200, 800, true),
        Slot::new(0, 800, 800, 1200, false),
        Slot::new(800, 800, 800, 1200, false),
        Slot::new(1600, 800, 800, 1200, false),
    ],
};

/// Template for exactly this piece size, if one exists.
pub fn lookup(piece: Rect) -> Option<&'static Template> {
    match (piece.w, piece.h) {
        (1200, 800) => Some(&LANDSCAPE_1200X800),
        (800, 1200) => Some(&PORTRAIT_800X1200),
        _ => None,
    }
}

impl Template {
    /// Pieces consumed by one full sheet.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots inflated by `kerf`, origins spread so inflated slots stay disjoint.
    pub fn placements(&self, kerf: f64) -> Vec<Placement> {
        let right_edges = distinct(self.slots.iter().map(|s| s.x + s.w));
        let top_edges = distinct(self.slots.iter().map(|s| s.y + s.h));

        self.slots
            .iter()
            .map(|s| {
                let (w, h) = kerf::inflate(Rect::new(s.w, s.h), kerf);
                Placement {
                    x: kerf::spread_origin(s.x, &right_edges, kerf),
                    y: kerf::spread_origin(s.y, &top_edges, kerf),
                    w,
                    h,
                    piece: self.key,
                    rotated: s.rotated,
                }
            })
            .collect()
    }

    /// Whether the kerf-adjusted template lies entirely on the board.
    pub fn fits(&self, spec: &SheetSpec) -> bool {
        self.placements(spec.kerf)
            .iter()
            .all(|p| p.fits_in(spec.board))
    }
}

fn distinct(values: impl Iterator<Item = u32>) -> Vec<u32> {
    let mut out: Vec<u32> = values.collect();
    out.sort_unstable();
    out.dedup();
    out
}
