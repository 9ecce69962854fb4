//! Headless Runs
//!
//! Drives the engine for a fixed number of ticks without a terminal and
//! reports where everything ended up. Handy for reproducing a seed or for
//! smoke-testing a config file.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;

use companion_core::{Engine, EngineConfig, EngineSnapshot, SeededRandom};

use crate::host::TerminalHost;

/// Outcome of a headless run
#[derive(Debug, Serialize)]
pub struct HeadlessReport {
    /// Seed the run used
    pub seed: u64,
    /// Ticks run
    pub ticks: u64,
    /// Engine state after the last tick
    pub snapshot: EngineSnapshot,
    /// Last diagnostic the engine reported, if any
    pub last_diagnostic: Option<String>,
}

/// Run `ticks` ticks of `dt` on a virtual `cols` x `rows` terminal
///
/// # Errors
///
/// Fails if the engine can't start.
pub fn run_headless(
    config: EngineConfig,
    seed: u64,
    size: (u16, u16),
    ticks: u64,
    dt: Duration,
) -> anyhow::Result<HeadlessReport> {
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut host = TerminalHost::new(size.0, size.1, true, tx);
    let mut engine = Engine::new(config, Box::new(SeededRandom::from_seed(seed)), &mut host)?;

    for _ in 0..ticks {
        engine.tick(dt, &mut host);
    }
    tracing::info!(seed, ticks, "Headless run finished");

    Ok(HeadlessReport {
        seed,
        ticks,
        snapshot: engine.snapshot(),
        last_diagnostic: host.last_diagnostic().map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_same_seed_same_report() {
        let run = || {
            run_headless(
                EngineConfig::default(),
                42,
                (120, 40),
                300,
                Duration::from_millis(16),
            )
            .unwrap()
        };
        let (a, b) = (run(), run());
        assert_eq!(a.snapshot, b.snapshot);
        assert_eq!(a.snapshot.tick, 300);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = run_headless(
            EngineConfig::default(),
            1,
            (120, 40),
            10,
            Duration::from_millis(16),
        )
        .unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["seed"], 1);
        assert_eq!(json["snapshot"]["roam_mode"], "full");
    }

    #[test]
    fn test_tiny_terminal_is_rejected() {
        let result = run_headless(
            EngineConfig::default(),
            1,
            (0, 1),
            10,
            Duration::from_millis(16),
        );
        assert!(result.is_err());
    }
}
