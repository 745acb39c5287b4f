//! Drop Tower - a deterministic stacking-tower game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tick transition, trim geometry, state)
//! - `fixed`: Fixed-point arithmetic backing every spatial quantity
//! - `replay`: Compact codec for per-session drop-input lists
//! - `tuning`: Data-driven game balance
//!
//! The crate is the single source of truth for session outcomes: renderers
//! consume read-only snapshots once per frame and convert fixed-point
//! coordinates to float display units at the boundary, while servers re-run
//! [`simulate`](sim::simulate) against a submitted replay to reject results
//! that do not reproduce. The same seed and inputs produce bit-identical
//! results regardless of frame rate, platform or float implementation.

pub mod fixed;
pub mod replay;
pub mod sim;
pub mod tuning;

pub use fixed::FixedValue;
pub use replay::DecodeError;
pub use sim::{
    Block, DropInput, GameMode, GameOverReason, GameState, SimulationResult,
    create_initial_state, simulate, step,
};
pub use tuning::{GameConfig, ScoringTable};

/// Game timing constants
pub mod consts {
    /// Logical ticks per second of real time
    pub const TICKS_PER_SECOND: i64 = 60;

    /// Tick duration in seconds, for the caller's pacing accumulator only;
    /// the core never reads a clock
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;

    /// Extra ticks `simulate` allows past the final input so the last
    /// block can land
    pub const SETTLE_MARGIN_TICKS: u64 = 240;

    /// Suggested debris lifetime for render-side pruning of trim effects
    pub const TRIM_EFFECT_WINDOW_TICKS: u64 = 90;
}
