//! Fixed-point spatial scalar
//!
//! Every position, size and velocity in the simulation is a `FixedValue`:
//! an `i64` scaled by a single global constant. Only integer math touches
//! these values, so the same inputs produce bit-identical state on every
//! platform. Conversion to `f32` exists for the render boundary and is
//! never fed back into simulation state.

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Scale factor: raw units per logical unit
pub const SCALE: i64 = 1000;

/// A spatial scalar stored as a scaled integer
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FixedValue(i64);

impl FixedValue {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(SCALE);

    /// Construct from a raw scaled integer
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Construct from whole logical units
    pub const fn from_units(units: i64) -> Self {
        Self(units * SCALE)
    }

    /// Construct from thousandths of a logical unit
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Raw scaled integer value
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Convert a float to fixed point (config and test construction only)
    pub fn from_f32(value: f32) -> Self {
        Self((value * SCALE as f32).round() as i64)
    }

    /// Convert to a float display unit
    ///
    /// One-directional: the result is for rendering and must never re-enter
    /// simulation state.
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / SCALE as f32
    }

    /// Scale by a rational `num / den`, rounding toward zero
    ///
    /// The intermediate product is widened to i128 so the only failure mode
    /// is a result outside the i64 range, which is fatal.
    pub fn mul_frac(self, num: i64, den: i64) -> Self {
        debug_assert!(den != 0, "mul_frac by zero denominator");
        let wide = self.0 as i128 * num as i128 / den as i128;
        Self(i64::try_from(wide).unwrap_or_else(|_| overflow()))
    }

    /// Divide by the tick rate: one tick's worth of a per-second rate
    pub fn per_tick(self) -> Self {
        self.mul_frac(1, crate::consts::TICKS_PER_SECOND)
    }

    pub fn abs(self) -> Self {
        Self(self.0.checked_abs().unwrap_or_else(|| overflow()))
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl Add for FixedValue {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.checked_add(rhs.0).unwrap_or_else(|| overflow()))
    }
}

impl Sub for FixedValue {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.checked_sub(rhs.0).unwrap_or_else(|| overflow()))
    }
}

impl Neg for FixedValue {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.checked_neg().unwrap_or_else(|| overflow()))
    }
}

impl AddAssign for FixedValue {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for FixedValue {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl fmt::Display for FixedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(
            f,
            "{sign}{}.{:03}",
            abs / SCALE as u64,
            abs % SCALE as u64
        )
    }
}

/// Overflow is a configuration or mode-parameter bug, never a recoverable
/// runtime condition; wrapping silently would corrupt replay verification.
#[cold]
fn overflow() -> ! {
    panic!("FixedValue arithmetic overflow")
}
