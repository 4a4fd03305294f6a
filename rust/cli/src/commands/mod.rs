//! One module per subcommand.
//!
//! Each exposes `handle_<name>_command(..., out, err) -> Result<(), CliError>`
//! taking its output streams as parameters so tests can capture them.

mod cfg;
mod play;
mod sim;

pub use cfg::handle_cfg_command;
pub use play::handle_play_command;
pub use sim::handle_sim_command;

use crate::config::{self, Config};
use crate::error::CliError;

/// Loads the layered configuration and applies command-line overrides,
/// which win over file and environment values. The returned config always
/// carries a seed so the session can be replayed.
pub(crate) fn resolve_config(
    seed: Option<u64>,
    seats: Option<usize>,
    policy: Option<String>,
) -> Result<Config, CliError> {
    let mut cfg = config::load_with_sources()?.config;
    if seed.is_some() {
        cfg.seed = seed;
    }
    if let Some(seats) = seats {
        cfg.seats = seats;
    }
    if let Some(policy) = policy {
        cfg.policy = policy;
    }
    cfg.table_config()
        .validate()
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;
    if cfg.seed.is_none() {
        let seed: u64 = rand::random();
        tracing::debug!(seed, "no seed configured, picked one");
        cfg.seed = Some(seed);
    }
    if !dojo_ai::POLICY_NAMES.contains(&cfg.policy.as_str()) {
        return Err(CliError::InvalidInput(format!(
            "unknown policy '{}' (expected one of {})",
            cfg.policy,
            dojo_ai::POLICY_NAMES.join(", ")
        )));
    }
    Ok(cfg)
}
