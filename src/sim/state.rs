//! Game state and core simulation types
//!
//! Everything that must be persisted for replay/verification determinism
//! lives here. All spatial quantities are [`FixedValue`]s; floats appear
//! only in the display helpers consumed by renderers.

use glam::Vec3;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::fixed::FixedValue;
use crate::tuning::{GameConfig, ScoringTable};

/// Game mode selected at session start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Constant slide speed, no rotation, widths inherited from the tower top
    Classic,
    /// Seeded per-spawn width, slide speed and rotation rate
    Rotating,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    /// The kept width collapsed to or below the configured minimum
    Width,
    /// The dropped block missed the tower entirely
    Fall,
    /// External reset/abort, recorded by the caller, never set internally
    Manual,
}

/// Seeded deterministic generator
///
/// A PCG32 advanced only by explicit calls. Serializes as `(seed, draws)`
/// and reconstructs by replaying the advances, so a deserialized state
/// continues the exact sequence. Consulted only at block-spawn time; physics
/// outcomes never depend on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RngSnapshot", into = "RngSnapshot")]
pub struct SimRng {
    seed: u64,
    draws: u64,
    rng: Pcg32,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            draws: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Advance the generator and return the next value
    pub fn next_u64(&mut self) -> u64 {
        self.draws += 1;
        self.rng.next_u64()
    }

    /// Uniform draw in `lo..=hi`
    ///
    /// Modulo reduction: the slight bias is acceptable for spawn parameters
    /// and keeps the draw a single generator advance.
    pub fn next_range(&mut self, lo: i64, hi: i64) -> i64 {
        debug_assert!(lo <= hi);
        let span = (hi - lo) as u64 + 1;
        lo + (self.next_u64() % span) as i64
    }

    /// Number of advances since creation
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

/// Serialized form of [`SimRng`]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RngSnapshot {
    seed: u64,
    draws: u64,
}

impl From<RngSnapshot> for SimRng {
    fn from(snap: RngSnapshot) -> Self {
        let mut rng = SimRng::new(snap.seed);
        for _ in 0..snap.draws {
            rng.next_u64();
        }
        rng
    }
}

impl From<SimRng> for RngSnapshot {
    fn from(rng: SimRng) -> Self {
        Self {
            seed: rng.seed,
            draws: rng.draws,
        }
    }
}

/// A placed or falling block
///
/// `x`/`z` are centers, `y` is the bottom edge. Rotation is stored as
/// integer thousandths of a degree; it is display-only and never enters
/// trim geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub x: FixedValue,
    pub y: FixedValue,
    pub z: FixedValue,
    pub width: FixedValue,
    pub height: FixedValue,
    pub depth: FixedValue,
    pub rotation_millideg: i64,
    /// Transition flag: false while sliding, true after the drop triggers
    pub is_falling: bool,
    /// Signed horizontal slide velocity, units per second
    pub velocity_x: FixedValue,
    /// Downward velocity while falling, units per second
    pub velocity_y: FixedValue,
    /// Rotation rate in millidegrees per tick (rotating mode only)
    pub rotation_vel_millideg: i64,
}

impl Block {
    pub fn min_x(&self) -> FixedValue {
        self.x - self.width.mul_frac(1, 2)
    }

    /// Derived from `min_x` so the footprint spans exactly `width` even
    /// when the raw width is odd
    pub fn max_x(&self) -> FixedValue {
        self.min_x() + self.width
    }

    /// Upper surface: where the next block lands
    pub fn top(&self) -> FixedValue {
        self.y + self.height
    }

    /// Center position in float display units (render boundary only)
    pub fn display_center(&self) -> Vec3 {
        Vec3::new(
            self.x.to_f32(),
            self.y.to_f32() + self.height.to_f32() / 2.0,
            self.z.to_f32(),
        )
    }

    /// Extents in float display units (render boundary only)
    pub fn display_size(&self) -> Vec3 {
        Vec3::new(
            self.width.to_f32(),
            self.height.to_f32(),
            self.depth.to_f32(),
        )
    }

    /// Rotation in float degrees (render boundary only)
    pub fn display_rotation_degrees(&self) -> f32 {
        self.rotation_millideg as f32 / 1000.0
    }
}

/// A trimmed-off remainder handed to renderers as debris
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimPiece {
    pub x: FixedValue,
    pub y: FixedValue,
    pub z: FixedValue,
    pub width: FixedValue,
    pub height: FixedValue,
    pub depth: FixedValue,
    /// Outward seed velocity; gravity and animation are the renderer's job
    pub velocity_x: FixedValue,
    pub velocity_y: FixedValue,
}

/// Debris emitted by one partial placement, tagged with its creation tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimEffect {
    pub tick: u64,
    pub pieces: Vec<TrimPiece>,
}

/// The single tick at which a player drop registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropInput {
    pub tick: u64,
}

/// Outcome of the most recent landing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastPlacement {
    /// The block snapped to exact alignment with the tower top
    pub is_position_perfect: bool,
    /// The full footprint survived (no trim)
    pub no_trim: bool,
    /// Combo counter after this landing
    pub combo_after: u32,
}

/// Aggregate result of a full session, for leaderboard submission and
/// independent verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub final_score: u64,
    pub block_count: u32,
    pub max_combo: u32,
    pub game_over_reason: Option<GameOverReason>,
}

/// Complete world snapshot (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub mode: GameMode,
    pub config: GameConfig,
    pub scoring: ScoringTable,
    /// Spawn-parameter generator, owned exclusively by this state
    pub rng: SimRng,
    /// Simulation tick counter, +1 per `step` call
    pub tick: u64,
    pub score: u64,
    /// Consecutive perfect placements
    pub combo: u32,
    pub max_combo: u32,
    pub perfect_block_count: u32,
    pub total_placements: u32,
    /// Placed blocks, base first; append-only for the whole session
    pub blocks: Vec<Block>,
    /// The active sliding/falling block, absent after game over
    pub current_block: Option<Block>,
    /// Preview of the next spawn; width is clamped to the tower top at
    /// promotion time
    pub next_block: Block,
    pub is_game_over: bool,
    pub game_over_reason: Option<GameOverReason>,
    pub last_placement: Option<LastPlacement>,
    /// Debris records for renderers; callers prune by age
    pub recent_trim_effects: Vec<TrimEffect>,
}

impl GameState {
    /// The block the active block will land on
    pub fn tower_top(&self) -> &Block {
        self.blocks.last().expect("tower always has a base block")
    }

    /// Drop trim effects older than `window_ticks`
    ///
    /// The core only tags effects with their creation tick; pruning cadence
    /// belongs to the caller.
    pub fn prune_trim_effects(&mut self, window_ticks: u64) {
        let now = self.tick;
        self.recent_trim_effects
            .retain(|e| now.saturating_sub(e.tick) <= window_ticks);
    }

    /// Aggregate result so far
    pub fn result(&self) -> SimulationResult {
        SimulationResult {
            final_score: self.score,
            block_count: self.total_placements,
            max_combo: self.max_combo,
            game_over_reason: self.game_over_reason,
        }
    }
}
