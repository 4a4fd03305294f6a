//! Async host for a practice table: one actor task owns the engine, paces
//! the scripted seats with timers and publishes a snapshot after every
//! transition.

pub mod actor;
pub mod errors;
pub mod events;
pub mod logging;
pub mod settings;

pub use actor::{spawn_table, TableActor, TableCommand, TableHandle};
pub use errors::RuntimeError;
pub use events::{EventReceiver, SnapshotBus, TableEvent, Transition};
pub use logging::{init_logging, LogEntry, LogFormat, TestLogSubscriber, DEFAULT_FILTER};
pub use settings::Pacing;
