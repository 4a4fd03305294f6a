//! Process exit codes returned by [`crate::run`].

/// The command completed.
pub const SUCCESS: i32 = 0;

/// Usage, configuration or engine failure.
pub const ERROR: i32 = 2;
