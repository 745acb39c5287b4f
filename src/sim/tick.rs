//! Fixed timestep simulation tick
//!
//! The single-tick state transition and the batch replay entry point.
//! `step` is pure: it never mutates its input and returns a new state, so a
//! verifier can thread states through a tight loop and trust bit-identical
//! results on any platform.

use crate::consts::SETTLE_MARGIN_TICKS;
use crate::fixed::FixedValue;
use crate::tuning::{GameConfig, ScoringTable};

use super::collision::resolve_trim;
use super::state::{
    Block, DropInput, GameMode, GameOverReason, GameState, LastPlacement, SimRng, SimulationResult,
    TrimEffect,
};

/// Full rotation in millidegrees
const FULL_TURN_MILLIDEG: i64 = 360_000;

/// Create the deterministic initial snapshot for a session
///
/// Same seed + mode + config always yields the identical state: a seeded
/// base block, the first active block sliding above it, and a pre-rolled
/// preview block.
pub fn create_initial_state(
    seed: u64,
    mode: GameMode,
    config: GameConfig,
    scoring: ScoringTable,
) -> GameState {
    let base = base_block(&config);
    let mut rng = SimRng::new(seed);

    let mut current = roll_block(&mut rng, mode, &config, &base);
    position_spawn(&mut current, &base, &config, 0);
    let next = roll_block(&mut rng, mode, &config, &base);

    log::debug!("session start: seed={seed} mode={mode:?}");

    GameState {
        seed,
        mode,
        config,
        scoring,
        rng,
        tick: 0,
        score: 0,
        combo: 0,
        max_combo: 0,
        perfect_block_count: 0,
        total_placements: 0,
        blocks: vec![base],
        current_block: Some(current),
        next_block: next,
        is_game_over: false,
        game_over_reason: None,
        last_placement: None,
        recent_trim_effects: Vec::new(),
    }
}

/// Advance the game by one logical tick
///
/// The returned state's `tick` is exactly one greater than the input's on
/// every branch, including after game over. A drop input must carry the
/// state's current tick; anything else is a driver bug and fails fast.
pub fn step(state: &GameState, input: Option<DropInput>) -> GameState {
    if let Some(drop) = input {
        assert!(
            drop.tick == state.tick,
            "drop input tick {} does not match current tick {}",
            drop.tick,
            state.tick
        );
    }

    let mut next = state.clone();
    advance(&mut next, input.is_some());
    next.tick = state.tick + 1;
    next
}

/// Replay an entire input list from a fresh initial state
///
/// This is what a server calls to independently re-derive a claimed score:
/// the returned aggregates must match the original client-side run exactly.
/// Uses the default config and scoring table; the input list is assumed to
/// be validated (strictly increasing ticks).
pub fn simulate(seed: u64, inputs: &[DropInput], mode: GameMode) -> SimulationResult {
    debug_assert!(
        inputs.windows(2).all(|w| w[0].tick < w[1].tick),
        "replay inputs must be strictly increasing by tick"
    );

    let mut state = create_initial_state(seed, mode, GameConfig::default(), ScoringTable::default());
    let mut pending = inputs.iter().copied().peekable();
    let mut settle = 0u64;

    while !state.is_game_over {
        let input = pending.next_if(|i| i.tick == state.tick);
        let falling = state
            .current_block
            .as_ref()
            .is_some_and(|b| b.is_falling);

        if pending.peek().is_none() && input.is_none() {
            // Past the last input: only the trailing landing remains
            if !falling {
                break;
            }
            settle += 1;
            if settle > SETTLE_MARGIN_TICKS {
                log::warn!("settle margin exhausted at tick {}", state.tick);
                break;
            }
        }

        state = step(&state, input);
    }

    state.result()
}

/// Mutate one cloned state forward by a tick (callers go through `step`)
fn advance(state: &mut GameState, dropped: bool) {
    if state.is_game_over {
        return;
    }
    let Some(mut block) = state.current_block.take() else {
        return;
    };

    // Drop trigger: sliding -> falling
    if dropped && !block.is_falling {
        block.is_falling = true;
        block.velocity_y = state.config.drop_speed;
        log::debug!("drop at tick {} x={}", state.tick, block.x);
    }

    if block.is_falling {
        block.velocity_y += state.config.gravity.per_tick();
        block.y -= block.velocity_y.per_tick();
    } else {
        // Bounded oscillation: reflect at the slide limits
        block.x += block.velocity_x.per_tick();
        let limit = state.config.slide_limit;
        if block.x > limit {
            block.x = limit;
            block.velocity_x = -block.velocity_x.abs();
        } else if block.x < -limit {
            block.x = -limit;
            block.velocity_x = block.velocity_x.abs();
        }
    }

    block.rotation_millideg =
        (block.rotation_millideg + block.rotation_vel_millideg).rem_euclid(FULL_TURN_MILLIDEG);

    let surface = state.tower_top().top();
    if block.is_falling && block.y <= surface {
        block.y = surface;
        land(state, block);
    } else {
        state.current_block = Some(block);
    }
}

/// Resolve a landed block: snap, trim, score, append, respawn or end
fn land(state: &mut GameState, mut block: Block) {
    let top = *state.tower_top();

    // Near-perfect placements snap to exact alignment before trimming
    let is_position_perfect = (block.x - top.x).abs() <= state.config.snap_tolerance;
    if is_position_perfect {
        block.x = top.x;
    }

    let Some(result) = resolve_trim(&block, &top) else {
        state.is_game_over = true;
        state.game_over_reason = Some(GameOverReason::Fall);
        state.current_block = None;
        log::info!(
            "game over at tick {}: total miss, score {}",
            state.tick,
            state.score
        );
        return;
    };

    state.total_placements += 1;
    if result.no_trim {
        state.combo += 1;
        state.perfect_block_count += 1;
        state.score += state.scoring.perfect_award(state.combo);
    } else {
        state.score += state.scoring.partial_award(result.kept.width, block.width);
        state.combo = 0;
        state.recent_trim_effects.push(TrimEffect {
            tick: state.tick,
            pieces: result.pieces,
        });
    }
    state.max_combo = state.max_combo.max(state.combo);
    state.last_placement = Some(LastPlacement {
        is_position_perfect,
        no_trim: result.no_trim,
        combo_after: state.combo,
    });

    log::debug!(
        "placement {} at tick {}: no_trim={} width={} combo={}",
        state.total_placements,
        state.tick,
        result.no_trim,
        result.kept.width,
        state.combo
    );

    state.blocks.push(result.kept);

    if result.kept.width <= state.config.min_width {
        state.is_game_over = true;
        state.game_over_reason = Some(GameOverReason::Width);
        state.current_block = None;
        log::info!(
            "game over at tick {}: width collapsed to {}",
            state.tick,
            result.kept.width
        );
    } else {
        promote_next(state);
    }
}

/// Promote the preview block to active and roll a fresh preview
fn promote_next(state: &mut GameState) {
    let top = *state.tower_top();
    let mut promoted = state.next_block;

    // A trim may have narrowed the tower below the pre-rolled width; the
    // clamp also makes classic mode inherit the kept width exactly
    promoted.width = promoted.width.min(top.width);
    position_spawn(&mut promoted, &top, &state.config, state.total_placements);

    state.current_block = Some(promoted);
    state.next_block = roll_block(&mut state.rng, state.mode, &state.config, &top);
}

/// Seeded base block the first drop lands on
fn base_block(config: &GameConfig) -> Block {
    Block {
        x: FixedValue::ZERO,
        y: FixedValue::ZERO,
        z: FixedValue::ZERO,
        width: config.base_width,
        height: config.block_height,
        depth: config.block_depth,
        rotation_millideg: 0,
        is_falling: false,
        velocity_x: FixedValue::ZERO,
        velocity_y: FixedValue::ZERO,
        rotation_vel_millideg: 0,
    }
}

/// Roll the mode-randomized parameters for a future spawn
///
/// The only place the generator is consulted. Classic draws nothing;
/// rotating draws width fraction, slide-speed multiplier and rotation rate,
/// in that order, always.
fn roll_block(rng: &mut SimRng, mode: GameMode, config: &GameConfig, top: &Block) -> Block {
    let mut block = base_block(config);
    match mode {
        GameMode::Classic => {
            block.width = top.width;
            block.velocity_x = config.slide_speed;
        }
        GameMode::Rotating => {
            let (w_lo, w_hi) = config.spawn_width_permille;
            let (s_lo, s_hi) = config.slide_mult_permille;
            let (r_lo, r_hi) = config.rotation_rate_millideg;
            block.width = top.width.mul_frac(rng.next_range(w_lo, w_hi), 1000);
            block.velocity_x = config.slide_speed.mul_frac(rng.next_range(s_lo, s_hi), 1000);
            block.rotation_vel_millideg = rng.next_range(r_lo, r_hi);
        }
    }
    block
}

/// Place a rolled block above the tower top, ready to slide
///
/// Spawn side alternates per placement; the center starts over the tower
/// top, clamped into the slide bounds.
fn position_spawn(block: &mut Block, top: &Block, config: &GameConfig, placements: u32) {
    block.x = top.x.min(config.slide_limit).max(-config.slide_limit);
    block.y = top.top() + config.spawn_height;
    block.z = top.z;
    block.is_falling = false;
    block.velocity_y = FixedValue::ZERO;
    let speed = block.velocity_x.abs();
    block.velocity_x = if placements % 2 == 0 { speed } else { -speed };
}
