use dojo_engine::table::TableConfig;
use serde::{Deserialize, Serialize};
use std::fs;

/// Session settings resolved from defaults, an optional TOML file
/// (`DOJO_CONFIG`) and `DOJO_*` environment variables, in that order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seats: usize,
    pub starting_stack: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    pub seed: Option<u64>,
    pub opponent_delay_ms: u64,
    pub policy: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seats: ValueSource,
    pub starting_stack: ValueSource,
    pub blinds: ValueSource,
    pub seed: ValueSource,
    pub opponent_delay_ms: ValueSource,
    pub policy: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seats: ValueSource::Default,
            starting_stack: ValueSource::Default,
            blinds: ValueSource::Default,
            seed: ValueSource::Default,
            opponent_delay_ms: ValueSource::Default,
            policy: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        let table = TableConfig::default();
        Self {
            seats: table.seats,
            starting_stack: table.starting_stack,
            small_blind: table.small_blind,
            big_blind: table.big_blind,
            seed: None,
            opponent_delay_ms: 1_000,
            policy: "scripted".into(),
        }
    }
}

impl Config {
    pub fn table_config(&self) -> TableConfig {
        TableConfig {
            seats: self.seats,
            starting_stack: self.starting_stack,
            small_blind: self.small_blind,
            big_blind: self.big_blind,
            seed: self.seed,
            ..TableConfig::default()
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("DOJO_CONFIG")
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seats {
            cfg.seats = v;
            sources.seats = ValueSource::File;
        }
        if let Some(v) = f.starting_stack {
            cfg.starting_stack = v;
            sources.starting_stack = ValueSource::File;
        }
        if let Some(v) = f.small_blind {
            cfg.small_blind = v;
            sources.blinds = ValueSource::File;
        }
        if let Some(v) = f.big_blind {
            cfg.big_blind = v;
            sources.blinds = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.opponent_delay_ms {
            cfg.opponent_delay_ms = v;
            sources.opponent_delay_ms = ValueSource::File;
        }
        if let Some(v) = f.policy {
            cfg.policy = v;
            sources.policy = ValueSource::File;
        }
    }

    if let Some(seed) = env_value("DOJO_SEED") {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid(format!("Invalid DOJO_SEED: {seed}")))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Some(seats) = env_value("DOJO_SEATS") {
        cfg.seats = seats
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid DOJO_SEATS: {seats}")))?;
        sources.seats = ValueSource::Env;
    }
    if let Some(stack) = env_value("DOJO_STACK") {
        cfg.starting_stack = stack
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid DOJO_STACK: {stack}")))?;
        sources.starting_stack = ValueSource::Env;
    }
    if let Some(blinds) = env_value("DOJO_BLINDS") {
        let (sb, bb) = parse_blinds(&blinds)
            .ok_or_else(|| ConfigError::Invalid(format!("Invalid DOJO_BLINDS: {blinds}")))?;
        cfg.small_blind = sb;
        cfg.big_blind = bb;
        sources.blinds = ValueSource::Env;
    }
    if let Some(delay) = env_value("DOJO_OPPONENT_DELAY_MS") {
        cfg.opponent_delay_ms = delay.parse().map_err(|_| {
            ConfigError::Invalid(format!("Invalid DOJO_OPPONENT_DELAY_MS: {delay}"))
        })?;
        sources.opponent_delay_ms = ValueSource::Env;
    }
    if let Some(policy) = env_value("DOJO_POLICY") {
        cfg.policy = policy;
        sources.policy = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    seats: Option<usize>,
    #[serde(default)]
    starting_stack: Option<u32>,
    #[serde(default)]
    small_blind: Option<u32>,
    #[serde(default)]
    big_blind: Option<u32>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    opponent_delay_ms: Option<u64>,
    #[serde(default)]
    policy: Option<String>,
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Parses `"10/20"` into small and big blind.
pub fn parse_blinds(s: &str) -> Option<(u32, u32)> {
    let (sb, bb) = s.split_once('/')?;
    Some((sb.trim().parse().ok()?, bb.trim().parse().ok()?))
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    cfg.table_config()
        .validate()
        .map_err(|e| ConfigError::Invalid(format!("Invalid configuration: {e}")))?;
    if !dojo_ai::POLICY_NAMES.contains(&cfg.policy.as_str()) {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: unknown policy '{}' (expected one of {})",
            cfg.policy,
            dojo_ai::POLICY_NAMES.join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blinds_parse_with_slash() {
        assert_eq!(parse_blinds("10/20"), Some((10, 20)));
        assert_eq!(parse_blinds(" 25 / 50 "), Some((25, 50)));
        assert_eq!(parse_blinds("20"), None);
        assert_eq!(parse_blinds("a/b"), None);
    }

    #[test]
    fn defaults_match_table_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.table_config(), TableConfig::default());
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn unknown_policy_is_invalid() {
        let cfg = Config {
            policy: "shark".into(),
            ..Config::default()
        };
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn heads_up_is_invalid() {
        let cfg = Config {
            seats: 2,
            ..Config::default()
        };
        let err = validate(&cfg).unwrap_err();
        assert!(err.to_string().contains("seats"));
    }
}
