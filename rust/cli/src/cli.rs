//! Command-line surface of the `dojo` binary.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "dojo")]
#[command(about = "Practice No-Limit Hold'em against scripted opponents")]
#[command(version)]
pub struct DojoCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sit at seat 0 and play hands from the terminal
    Play {
        /// Stop after this many hands
        #[arg(long, default_value_t = 10)]
        hands: u32,
        /// RNG seed for a reproducible session
        #[arg(long)]
        seed: Option<u64>,
        /// Table size including you (3-10)
        #[arg(long)]
        seats: Option<usize>,
        /// Pause before each opponent action, in milliseconds
        #[arg(long = "delay-ms")]
        delay_ms: Option<u64>,
        /// Opponent policy: scripted or passive
        #[arg(long)]
        policy: Option<String>,
    },
    /// Play hands with every seat, including seat 0, driven by the policy
    Sim {
        #[arg(long, default_value_t = 100)]
        hands: u32,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        seats: Option<usize>,
        #[arg(long)]
        policy: Option<String>,
    },
    /// Print the resolved configuration and where each value came from
    Cfg,
}
