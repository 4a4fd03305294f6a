use std::marker::PhantomData;
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Filter used when `RUST_LOG` is unset. The terminal table shares stderr
/// with warnings, so only problems are shown by default.
pub const DEFAULT_FILTER: &str = "warn";

/// A captured log event.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

/// Collects log events in memory so tests can assert on them.
#[derive(Debug, Clone)]
pub struct TestLogSubscriber {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl Default for TestLogSubscriber {
    fn default() -> Self {
        Self::new()
    }
}

impl TestLogSubscriber {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Entries whose message contains `needle`.
    pub fn matching(&self, needle: &str) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.message.contains(needle))
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.clear();
        }
    }

    pub fn into_layer<S>(self) -> TestLayer<S>
    where
        S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    {
        TestLayer {
            subscriber: self,
            _phantom: PhantomData,
        }
    }
}

pub struct TestLayer<S> {
    subscriber: TestLogSubscriber,
    _phantom: PhantomData<S>,
}

impl<S> Layer<S> for TestLayer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let entry = LogEntry {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.message.unwrap_or_default(),
            fields: visitor.fields,
        };

        if let Ok(mut guard) = self.subscriber.entries.lock() {
            guard.push(entry);
        }
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let value_str = format!("{:?}", value);
        if field.name() == "message" {
            self.message = Some(value_str);
        } else {
            self.fields.push((field.name().to_string(), value_str));
        }
    }
}

/// Output layout for [`init_logging`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// Reads `DOJO_LOG_FORMAT`; anything but `json` means pretty.
    pub fn from_env() -> Self {
        match std::env::var("DOJO_LOG_FORMAT") {
            Ok(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides `default_filter`.
///
/// Logs go to stderr so they never interleave with table output. Returns
/// `false` if a global subscriber was already installed.
pub fn init_logging(format: LogFormat, default_filter: &str) -> bool {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    let installed = match format {
        LogFormat::Pretty => builder.with_line_number(true).try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dojo_engine::engine::Engine;
    use dojo_engine::rules::Action;
    use dojo_engine::table::TableConfig;
    use tracing::Level;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    fn capture<F: FnOnce()>(f: F) -> TestLogSubscriber {
        let subscriber = TestLogSubscriber::new();
        let registry = Registry::default().with(subscriber.clone().into_layer::<Registry>());
        tracing::subscriber::with_default(registry, f);
        subscriber
    }

    #[test]
    fn default_filter_parses() {
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn captures_engine_hand_start() {
        let logs = capture(|| {
            let mut engine = Engine::new(TableConfig {
                seed: Some(3),
                ..TableConfig::default()
            })
            .unwrap();
            engine.start_new_hand();
        });
        let started = logs.matching("hand started");
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].level, Level::INFO);
        assert!(started[0]
            .fields
            .iter()
            .any(|(k, v)| k == "hand_id" && v == "1"));
        assert!(!logs.matching("blinds posted").is_empty());
    }

    #[test]
    fn rejected_human_action_is_a_warning() {
        let logs = capture(|| {
            let mut engine = Engine::new(TableConfig {
                seats: 3,
                seed: Some(3),
                ..TableConfig::default()
            })
            .unwrap();
            engine.start_new_hand();
            // three-handed the button (human) opens; 30 is below a full raise
            engine.submit_action(Action::Raise(30));
        });
        let rejected = logs.matching("human action rejected");
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].level, Level::WARN);
    }

    #[test]
    fn stale_continuation_is_logged_and_dropped() {
        let logs = capture(|| {
            let mut engine = Engine::new(TableConfig {
                seed: Some(4),
                ..TableConfig::default()
            })
            .unwrap();
            engine.start_new_hand();
            let cont = engine.pending().unwrap();
            engine.start_new_hand();
            let res = engine.resume(&cont, |_, _| Action::Call);
            assert_eq!(res, Err(dojo_engine::errors::GameError::StaleContinuation));
        });
        let dropped = logs.matching("continuation dropped");
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].level, Level::DEBUG);
    }

    #[test]
    fn clear_drops_entries() {
        let logs = capture(|| tracing::info!("first"));
        assert_eq!(logs.entries().len(), 1);
        logs.clear();
        assert!(logs.entries().is_empty());
    }

    #[test]
    fn log_format_defaults_to_pretty() {
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }
}
