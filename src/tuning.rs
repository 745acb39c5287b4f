//! Data-driven game balance
//!
//! Every game-design constant lives here as configuration: the state machine
//! never hard-codes a speed, threshold or score value. Tables deserialize
//! from JSON so balance changes never touch simulation code.

use serde::{Deserialize, Serialize};

use crate::fixed::FixedValue;

/// Motion and geometry tunables for one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the seeded base block
    pub base_width: FixedValue,
    /// Height of every block
    pub block_height: FixedValue,
    /// Depth of every block (carried for renderers that draw in 3D)
    pub block_depth: FixedValue,
    /// How far above the tower top a new block spawns
    pub spawn_height: FixedValue,
    /// Horizontal slide speed, units per second
    pub slide_speed: FixedValue,
    /// Slide bound: block centers reflect at +/- this world x
    pub slide_limit: FixedValue,
    /// Initial downward velocity when a drop is triggered, units per second
    pub drop_speed: FixedValue,
    /// Downward acceleration while falling, units per second squared
    pub gravity: FixedValue,
    /// Horizontal offsets within this distance snap to exact alignment
    pub snap_tolerance: FixedValue,
    /// Kept widths at or below this end the game
    pub min_width: FixedValue,
    /// Rotating mode: spawn width as per-mille of the tower top, inclusive
    pub spawn_width_permille: (i64, i64),
    /// Rotating mode: slide speed multiplier range in per-mille, inclusive
    pub slide_mult_permille: (i64, i64),
    /// Rotating mode: rotation rate range in millidegrees per tick, inclusive
    pub rotation_rate_millideg: (i64, i64),
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            base_width: FixedValue::from_units(4),
            block_height: FixedValue::from_millis(500),
            block_depth: FixedValue::from_units(4),
            spawn_height: FixedValue::from_units(3),
            slide_speed: FixedValue::from_units(2),
            slide_limit: FixedValue::from_units(6),
            drop_speed: FixedValue::from_units(6),
            gravity: FixedValue::from_units(20),
            snap_tolerance: FixedValue::from_millis(150),
            min_width: FixedValue::from_millis(250),
            spawn_width_permille: (700, 1000),
            slide_mult_permille: (800, 1500),
            rotation_rate_millideg: (0, 1500),
        }
    }
}

/// Score awards per landing
///
/// Swappable as a whole: the tick module only ever calls [`perfect_award`]
/// and [`partial_award`].
///
/// [`perfect_award`]: ScoringTable::perfect_award
/// [`partial_award`]: ScoringTable::partial_award
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringTable {
    /// Award for the Nth consecutive perfect placement; plateaus at the
    /// last entry
    pub perfect_tiers: Vec<u64>,
    /// Base award for a trimmed placement, scaled by the kept fraction
    pub partial_base: u64,
}

impl Default for ScoringTable {
    fn default() -> Self {
        Self {
            perfect_tiers: vec![50, 75, 100, 150, 200, 300, 400, 500],
            partial_base: 25,
        }
    }
}

impl ScoringTable {
    /// Award for a no-trim landing given the combo count after it
    pub fn perfect_award(&self, combo: u32) -> u64 {
        debug_assert!(combo > 0, "perfect award requires a running combo");
        let idx = (combo as usize).min(self.perfect_tiers.len()).max(1) - 1;
        self.perfect_tiers.get(idx).copied().unwrap_or(0)
    }

    /// Award for a trimmed landing, proportional to the kept width
    ///
    /// Integer math on raw fixed-point widths; any successful landing is
    /// worth at least one point.
    pub fn partial_award(&self, kept_width: FixedValue, pre_trim_width: FixedValue) -> u64 {
        debug_assert!(pre_trim_width.is_positive());
        let scaled =
            self.partial_base as i64 * kept_width.raw() / pre_trim_width.raw();
        (scaled as u64).max(1)
    }
}
