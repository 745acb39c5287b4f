//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed-point integer arithmetic only
//! - Seeded RNG only, consulted only at block-spawn time
//! - One logical tick per `step` call, no wall-clock dependence
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{TrimResult, resolve_trim};
pub use state::{
    Block, DropInput, GameMode, GameOverReason, GameState, LastPlacement, SimRng,
    SimulationResult, TrimEffect, TrimPiece,
};
pub use tick::{create_initial_state, simulate, step};
