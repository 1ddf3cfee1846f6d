use crate::templates::{self, Template};
use crate::types::{Rect, SheetKind, SheetLayout, SheetSpec};

/// Outcome of the template pass: full template sheets, plus the pieces left
/// for the greedy packer.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub sheets: Vec<SheetLayout>,
    pub residual: Vec<Rect>,
}

/// Consumes templated piece sizes in whole-sheet batches.
///
/// Keys are visited in order of first appearance. The residual holds each
/// key's remainder in that order, then every non-templated piece in input
/// order. A template that does not fit the board with kerf applied is
/// ignored and its pieces are treated as non-templated.
pub fn allocate(pieces: &[Rect], spec: &SheetSpec) -> Allocation {
    let mut groups: Vec<(&'static Template, usize)> = Vec::new();
    let mut generic = Vec::new();

    for &piece in pieces {
        let template = templates::lookup(piece).filter(|t| !t.is_empty() && t.fits(spec));
        match template {
            Some(t) => match groups.iter_mut().find(|(g, _)| g.key == piece) {
                Some((_, count)) => *count += 1,
                None => groups.push((t, 1)),
            },
            None => generic.push(piece),
        }
    }

    let mut sheets = Vec::new();
    let mut residual = Vec::new();
    for (template, count) in groups {
        let full = count / template.len();
        let remainder = count % template.len();
        if full > 0 {
            let placements = template.placements(spec.kerf);
            for _ in 0..full {
                sheets.push(SheetLayout::new(
                    SheetKind::Optimal(template.key),
                    placements.clone(),
                    spec,
                ));
            }
        }
        tracing::debug!(
            key = %template.key,
            full_sheets = full,
            remainder,
            "template allocation"
        );
        residual.extend(std::iter::repeat_n(template.key, remainder));
    }
    residual.extend(generic);

    Allocation { sheets, residual }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::STANDARD_BOARD;

    fn standard(kerf: f64) -> SheetSpec {
        SheetSpec::new(STANDARD_BOARD, kerf).unwrap()
    }

    #[test]
    fn test_exact_batch() {
        let alloc = allocate(&[Rect::new(1200, 800); 5], &standard(0.0));
        assert_eq!(alloc.sheets.len(), 1);
        assert!(alloc.residual.is_empty());
        assert_eq!(alloc.sheets[0].kind, SheetKind::Optimal(Rect::new(1200, 800)));
        assert_eq!(
            alloc.sheets[0].placements,
            templates::lookup(Rect::new(1200, 800)).unwrap().placements(0.0)
        );
    }

    #[test]
    fn test_remainder_and_generic_order() {
        let pieces = [
            Rect::new(300, 200),
            Rect::new(800, 1200),
            Rect::new(1200, 800),
            Rect::new(500, 500),
            Rect::new(1200, 800),
            Rect::new(800, 1200),
        ];
        let alloc = allocate(&pieces, &standard(0.0));
        assert!(alloc.sheets.is_empty());
        assert_eq!(
            alloc.residual,
            vec![
                Rect::new(800, 1200),
                Rect::new(800, 1200),
                Rect::new(1200, 800),
                Rect::new(1200, 800),
                Rect::new(300, 200),
                Rect::new(500, 500),
            ]
        );
    }

    #[test]
    fn test_multiple_full_sheets_per_key() {
        let mut pieces = vec![Rect::new(800, 1200); 11];
        pieces.push(Rect::new(100, 100));
        let alloc = allocate(&pieces, &standard(3.0));
        assert_eq!(alloc.sheets.len(), 2);
        assert!(alloc
            .sheets
            .iter()
            .all(|s| s.kind == SheetKind::Optimal(Rect::new(800, 1200))));
        assert_eq!(alloc.residual, vec![Rect::new(800, 1200), Rect::new(100, 100)]);
    }

    #[test]
    fn test_template_skipped_when_board_too_small() {
        let spec = SheetSpec::new(Rect::new(2000, 2000), 0.0).unwrap();
        let alloc = allocate(&[Rect::new(1200, 800); 5], &spec);
        assert!(alloc.sheets.is_empty());
        assert_eq!(alloc.residual.len(), 5);
    }

    #[test]
    fn test_optimal_sheet_efficiency() {
        let alloc = allocate(&[Rect::new(1200, 800); 5], &standard(2.0));
        let expected = 5.0 * 1200.0 * 800.0 / (2800.0 * 2070.0) * 100.0;
        assert!((alloc.sheets[0].efficiency - expected).abs() < 1e-9);
    }
}
