//! # Dojo CLI Library
//!
//! Command-line front end for the practice table: play hands from the
//! terminal at seat 0, run headless simulations, inspect configuration.
//!
//! The entry point is [`run`], which parses arguments and writes to the
//! given streams, so the whole CLI can be driven from tests.
//!
//! ```no_run
//! use std::io;
//! let args = vec!["dojo", "sim", "--hands", "20", "--seed", "7"];
//! let code = dojo_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `play`: interactive session against scripted opponents
//! - `sim`: every seat driven by a policy, with chip conservation checks
//! - `cfg`: resolved configuration and value sources

use clap::Parser;
use std::io::{BufRead, Write};
pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
pub mod ui;
pub mod validation;

use cli::{Commands, DojoCli};
use commands::{handle_cfg_command, handle_play_command, handle_sim_command};

pub use error::CliError;

const COMMANDS: &[&str] = &["play", "sim", "cfg"];

/// Parses `args` and runs the chosen subcommand.
///
/// Returns the process exit code: [`exit_code::SUCCESS`] or
/// [`exit_code::ERROR`]. The `play` command reads actions from the
/// process's stdin; see [`run_with_input`] to supply them.
///
/// ```
/// let mut out = Vec::new();
/// let mut err = Vec::new();
/// let code = dojo_cli::run(["dojo", "sim", "--hands", "3", "--seed", "42"], &mut out, &mut err);
/// assert_eq!(code, 0);
/// assert!(String::from_utf8_lossy(&out).contains("Simulated: 3 hands"));
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let stdin = std::io::stdin();
    let mut stdin_lock = stdin.lock();
    run_with_input(args, &mut stdin_lock, out, err)
}

/// Same as [`run`], with `play` reading its actions from `input`.
///
/// ```
/// use std::io::Cursor;
/// let mut out = Vec::new();
/// let mut err = Vec::new();
/// let args = ["dojo", "play", "--hands", "1", "--seed", "42", "--delay-ms", "0"];
/// let code = dojo_cli::run_with_input(args, &mut Cursor::new("q\n"), &mut out, &mut err);
/// assert_eq!(code, 0);
/// ```
pub fn run_with_input<I, S>(
    args: I,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match DojoCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return usage_error(e, out, err),
    };

    let result = match cli.cmd {
        Commands::Play {
            hands,
            seed,
            seats,
            delay_ms,
            policy,
        } => handle_play_command(hands, seed, seats, delay_ms, policy, out, err, input),
        Commands::Sim {
            hands,
            seed,
            seats,
            policy,
        } => handle_sim_command(hands, seed, seats, policy, out, err),
        Commands::Cfg => handle_cfg_command(out, err),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            let _ = ui::write_error(err, &e.to_string());
            exit_code::ERROR
        }
    }
}

fn usage_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version should print to stdout and exit 0
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        return match write!(out, "{}", e) {
            Ok(()) => exit_code::SUCCESS,
            Err(_) => exit_code::ERROR,
        };
    }
    let _ = writeln!(err, "{}", e);
    let _ = writeln!(err);
    let _ = writeln!(err, "Poker Dojo CLI");
    let _ = writeln!(err, "Usage: dojo <command> [options]\n");
    let _ = writeln!(err, "Commands:");
    for c in COMMANDS {
        let _ = writeln!(err, "  {}", c);
    }
    let _ = writeln!(err, "\nFor full help, run: dojo --help");
    exit_code::ERROR
}
