use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Severity used for runtime step instrumentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
  #[default]
  Trace,
  Debug,
  Info,
  Warn,
  Error,
}

impl LogLevel {
  pub fn as_str(&self) -> &'static str {
    match self {
      LogLevel::Trace => "trace",
      LogLevel::Debug => "debug",
      LogLevel::Info => "info",
      LogLevel::Warn => "warn",
      LogLevel::Error => "error",
    }
  }
}

impl std::fmt::Display for LogLevel {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Instrumentation settings for a compiled flow or sequence.
///
/// A schedule without a name is never instrumented, regardless of level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,

  /// Level used when no override matches.
  #[serde(default)]
  pub log_level: LogLevel,

  /// Per-name overrides, keyed by schedule or step name.
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub levels: BTreeMap<String, LogLevel>,
}

impl ScheduleConfig {
  /// Level for the schedule's own start/end events: an override for the
  /// schedule name, else `log_level`.
  pub fn schedule_level(&self) -> LogLevel {
    self
      .name
      .as_deref()
      .and_then(|name| self.levels.get(name))
      .copied()
      .unwrap_or(self.log_level)
  }

  /// Level for one step: an override for the step name, else the schedule
  /// level.
  pub fn step_level(&self, step: &str) -> LogLevel {
    self
      .levels
      .get(step)
      .copied()
      .unwrap_or_else(|| self.schedule_level())
  }
}

/// Log output settings for the command line tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
  #[serde(default = "default_logging_enabled")]
  pub enabled: bool,

  /// EnvFilter string, e.g. "warn" or "stagehand_graph=debug".
  #[serde(default = "default_logging_level")]
  pub level: String,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      enabled: default_logging_enabled(),
      level: default_logging_level(),
    }
  }
}

fn default_logging_enabled() -> bool {
  true
}

fn default_logging_level() -> String {
  "warn".to_string()
}
