//! Replay verifier entry point
//!
//! Recomputes a submitted session from its seed and replay bytes and
//! compares against the claimed result. This is the server-side half of the
//! anti-tamper contract: honest replays are bit-exact, so any mismatch means
//! the submission does not reproduce and should be rejected.

use std::process::ExitCode;

use serde::{Deserialize, Serialize};

use drop_tower::replay;
use drop_tower::sim::{GameMode, SimulationResult, simulate};

/// A submitted session: what a leaderboard stores per entry
#[derive(Debug, Serialize, Deserialize)]
struct SessionRecord {
    seed: u64,
    mode: GameMode,
    /// Encoded drop-input list (replay codec bytes)
    replay: Vec<u8>,
    claimed: SimulationResult,
}

fn main() -> ExitCode {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: drop-tower-verify <session.json>");
        return ExitCode::from(2);
    };

    match verify(&path) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            log::error!("could not verify {path}: {err}");
            ExitCode::from(2)
        }
    }
}

fn verify(path: &str) -> Result<bool, Box<dyn std::error::Error>> {
    let data = std::fs::read_to_string(path)?;
    let record: SessionRecord = serde_json::from_str(&data)?;
    let inputs = replay::decode(&record.replay)?;
    log::info!(
        "replaying {} input(s), seed {}, mode {:?}",
        inputs.len(),
        record.seed,
        record.mode
    );

    let result = simulate(record.seed, &inputs, record.mode);
    if result == record.claimed {
        log::info!(
            "session verified: score {} over {} block(s)",
            result.final_score,
            result.block_count
        );
        Ok(true)
    } else {
        log::warn!(
            "verification mismatch: claimed {:?}, recomputed {:?}",
            record.claimed,
            result
        );
        Ok(false)
    }
}
