//! Landing resolution and trim geometry
//!
//! The scoring driver of the whole game: intersecting the falling block's
//! footprint with the tower top, keeping the overlap and splitting the
//! overhang off as debris. Everything here is exact fixed-point integer
//! math; no float ever participates.

use crate::fixed::FixedValue;

use super::state::{Block, TrimPiece};

/// Outward debris velocity per unit of displacement from the overlap
/// center, in units per second. Purely a seed value for renderers.
const DEBRIS_KICK_PER_UNIT: i64 = 3;

/// Result of resolving a landing that found some overlap
#[derive(Debug, Clone)]
pub struct TrimResult {
    /// The surviving block, resized and repositioned to the overlap
    pub kept: Block,
    /// The full footprint survived; `pieces` is empty
    pub no_trim: bool,
    /// Overhang remainders, at most one per side
    pub pieces: Vec<TrimPiece>,
}

/// Intersect the falling block with the tower top on the x axis
///
/// Returns `None` when the overlap is empty (a total miss). Otherwise the
/// kept block is exactly the overlap rectangle: its `y` is the landing
/// surface the caller already assigned to `falling`, and its depth axis is
/// carried through unchanged since the modes only ever move blocks along x.
pub fn resolve_trim(falling: &Block, top: &Block) -> Option<TrimResult> {
    let overlap_min = falling.min_x().max(top.min_x());
    let overlap_max = falling.max_x().min(top.max_x());

    // Strict: edge-to-edge contact counts as a miss
    if overlap_max <= overlap_min {
        return None;
    }

    let no_trim = overlap_min == falling.min_x() && overlap_max == falling.max_x();

    let mut kept = *falling;
    kept.width = overlap_max - overlap_min;
    // Center derived from the min edge so the kept footprint reproduces the
    // overlap exactly, whatever the raw parity
    kept.x = overlap_min + kept.width.mul_frac(1, 2);
    kept.is_falling = false;
    kept.velocity_x = FixedValue::ZERO;
    kept.velocity_y = FixedValue::ZERO;
    kept.rotation_vel_millideg = 0;

    let mut pieces = Vec::new();
    if falling.min_x() < overlap_min {
        pieces.push(overhang_piece(falling, falling.min_x(), overlap_min, kept.x));
    }
    if falling.max_x() > overlap_max {
        pieces.push(overhang_piece(falling, overlap_max, falling.max_x(), kept.x));
    }
    debug_assert_eq!(no_trim, pieces.is_empty());

    Some(TrimResult {
        kept,
        no_trim,
        pieces,
    })
}

/// Build one overhang remainder spanning `[min_x, max_x)`
///
/// The outward velocity is proportional to how far the piece's center sits
/// from the overlap center; vertical seed velocity is zero, debris gravity
/// belongs to the renderer.
fn overhang_piece(
    falling: &Block,
    min_x: FixedValue,
    max_x: FixedValue,
    overlap_center: FixedValue,
) -> TrimPiece {
    let width = max_x - min_x;
    let center = min_x + width.mul_frac(1, 2);
    let displacement = center - overlap_center;
    TrimPiece {
        x: center,
        y: falling.y,
        z: falling.z,
        width,
        height: falling.height,
        depth: falling.depth,
        velocity_x: displacement.mul_frac(DEBRIS_KICK_PER_UNIT, 1),
        velocity_y: FixedValue::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(x_millis: i64, width_millis: i64) -> Block {
        Block {
            x: FixedValue::from_millis(x_millis),
            y: FixedValue::from_millis(500),
            z: FixedValue::ZERO,
            width: FixedValue::from_millis(width_millis),
            height: FixedValue::from_millis(500),
            depth: FixedValue::from_units(4),
            rotation_millideg: 0,
            is_falling: true,
            velocity_x: FixedValue::from_units(2),
            velocity_y: FixedValue::from_units(6),
            rotation_vel_millideg: 0,
        }
    }

    #[test]
    fn test_exact_overlap_is_perfect() {
        let top = block(0, 4000);
        let falling = block(0, 4000);
        let result = resolve_trim(&falling, &top).unwrap();
        assert!(result.no_trim);
        assert!(result.pieces.is_empty());
        assert_eq!(result.kept.width, falling.width);
        assert_eq!(result.kept.x, falling.x);
        assert!(!result.kept.is_falling);
        assert_eq!(result.kept.velocity_y, FixedValue::ZERO);
    }

    #[test]
    fn test_narrower_block_inside_is_no_trim() {
        let top = block(0, 4000);
        let falling = block(500, 2000);
        let result = resolve_trim(&falling, &top).unwrap();
        assert!(result.no_trim);
        assert_eq!(result.kept.width, falling.width);
        assert_eq!(result.kept.x, falling.x);
    }

    #[test]
    fn test_right_overhang_trims_one_piece() {
        let top = block(0, 4000);
        let falling = block(1000, 4000);
        let result = resolve_trim(&falling, &top).unwrap();
        assert!(!result.no_trim);
        // Kept: [-1.0, 2.0], center 0.5, width 3.0
        assert_eq!(result.kept.x, FixedValue::from_millis(500));
        assert_eq!(result.kept.width, FixedValue::from_millis(3000));
        // One piece: [2.0, 3.0] kicked rightward
        assert_eq!(result.pieces.len(), 1);
        let piece = &result.pieces[0];
        assert_eq!(piece.x, FixedValue::from_millis(2500));
        assert_eq!(piece.width, FixedValue::from_millis(1000));
        assert!(piece.velocity_x.is_positive());
        assert_eq!(piece.velocity_y, FixedValue::ZERO);
    }

    #[test]
    fn test_left_overhang_kicks_left() {
        let top = block(0, 4000);
        let falling = block(-1500, 4000);
        let result = resolve_trim(&falling, &top).unwrap();
        assert_eq!(result.pieces.len(), 1);
        assert!(result.pieces[0].velocity_x < FixedValue::ZERO);
    }

    #[test]
    fn test_wider_block_trims_both_sides() {
        let top = block(0, 2000);
        let falling = block(0, 4000);
        let result = resolve_trim(&falling, &top).unwrap();
        assert!(!result.no_trim);
        assert_eq!(result.kept.width, top.width);
        assert_eq!(result.kept.x, FixedValue::ZERO);
        assert_eq!(result.pieces.len(), 2);
        // Left piece flies left, right piece flies right
        assert!(result.pieces[0].velocity_x < FixedValue::ZERO);
        assert!(result.pieces[1].velocity_x.is_positive());
        // Remainders partition the overhang exactly
        let total = result.kept.width + result.pieces[0].width + result.pieces[1].width;
        assert_eq!(total, falling.width);
    }

    #[test]
    fn test_no_overlap_is_miss() {
        let top = block(0, 4000);
        let falling = block(5000, 4000);
        assert!(resolve_trim(&falling, &top).is_none());
    }

    #[test]
    fn test_edge_contact_is_miss() {
        let top = block(0, 4000);
        // Falling min edge exactly at the top's max edge
        let falling = block(4000, 4000);
        assert!(resolve_trim(&falling, &top).is_none());
    }

    #[test]
    fn test_kept_plus_piece_partitions_footprint() {
        let top = block(0, 4000);
        let falling = block(1300, 4000);
        let result = resolve_trim(&falling, &top).unwrap();
        let piece = &result.pieces[0];
        assert_eq!(result.kept.width + piece.width, falling.width);
        // Kept rectangle is exactly the overlap
        assert_eq!(result.kept.min_x(), falling.min_x().max(top.min_x()));
        assert_eq!(result.kept.max_x(), falling.max_x().min(top.max_x()));
    }
}
