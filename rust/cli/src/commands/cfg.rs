//! `dojo cfg`: the resolved configuration as pretty JSON, each value next
//! to where it came from.
//!
//! ```json
//! {
//!   "seats": { "value": 6, "source": "default" },
//!   "seed": { "value": 42, "source": "env" },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use crate::ui;
use std::io::Write;

/// # Errors
///
/// `CliError::Config` if the file or an environment override is invalid.
pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = match config::load_with_sources() {
        Ok(r) => r,
        Err(e) => {
            ui::display_warning(err, "fix DOJO_CONFIG or the DOJO_* variables")?;
            return Err(e.into());
        }
    };

    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "seats": {
            "value": config.seats,
            "source": sources.seats,
        },
        "starting_stack": {
            "value": config.starting_stack,
            "source": sources.starting_stack,
        },
        "blinds": {
            "value": format!("{}/{}", config.small_blind, config.big_blind),
            "source": sources.blinds,
        },
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "opponent_delay_ms": {
            "value": config.opponent_delay_ms,
            "source": sources.opponent_delay_ms,
        },
        "policy": {
            "value": config.policy,
            "source": sources.policy,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
