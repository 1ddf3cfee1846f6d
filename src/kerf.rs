//! Blade allowance.
//!
//! Every piece is inflated by the full kerf on both axes before it is placed,
//! including pieces that touch the board edge. This over-reserves material
//! along the board boundary; it is a known approximation, not a physical cut
//! model. Reported sizes and areas come from the demanded piece carried by
//! each placement, never from subtracting the kerf off the footprint.

use crate::types::Rect;

/// Working footprint of a piece: true size plus kerf on each axis.
pub fn inflate(piece: Rect, kerf: f64) -> (f64, f64) {
    (piece.w as f64 + kerf, piece.h as f64 + kerf)
}

/// Moves a fixed-layout origin so inflated neighbours stay disjoint.
///
/// `far_edges` are the distinct right (or top) edges of the uninflated layout
/// on the same axis. Each edge at or before `origin` lies between this slot
/// and a slot it must clear, so it adds one kerf of offset.
pub fn spread_origin(origin: u32, far_edges: &[u32], kerf: f64) -> f64 {
    let crossed = far_edges.iter().filter(|&&edge| edge <= origin).count();
    origin as f64 + kerf * crossed as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Placement;

    #[test]
    fn test_inflate_adds_kerf_on_both_axes() {
        let (w, h) = inflate(Rect::new(504, 769), 3.5);
        assert_eq!((w, h), (507.5, 772.5));
    }

    #[test]
    fn test_fractional_kerf_reports_exact_size() {
        let piece = Rect::new(1024, 500);
        let (w, h) = inflate(piece, 0.1);
        let placement = Placement {
            x: 0.0,
            y: 0.0,
            w: h,
            h: w,
            piece,
            rotated: true,
        };
        assert_eq!(placement.true_size(), Rect::new(500, 1024));
    }

    #[test]
    fn test_zero_kerf_is_identity() {
        assert_eq!(inflate(Rect::new(10, 20), 0.0), (10.0, 20.0));
        assert_eq!(spread_origin(800, &[800, 1600, 2400], 0.0), 800.0);
    }

    #[test]
    fn test_spread_origin_counts_crossed_edges() {
        let edges = [800, 1600, 2400];
        assert_eq!(spread_origin(0, &edges, 4.0), 0.0);
        assert_eq!(spread_origin(800, &edges, 4.0), 804.0);
        assert_eq!(spread_origin(1200, &edges, 4.0), 1204.0);
        assert_eq!(spread_origin(1600, &edges, 4.0), 1608.0);
    }
}
