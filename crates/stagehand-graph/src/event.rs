//! Runtime instrumentation shared by the renderers.

use stagehand_config::LogLevel;
use tracing::{debug, error, info, trace, warn};

/// Emit `<event>(<subject>)` at `level`, tagged with the schedule name.
pub fn emit(level: LogLevel, schedule: &str, event: &str, subject: &str) {
  match level {
    LogLevel::Trace => trace!(schedule, "{}({})", event, subject),
    LogLevel::Debug => debug!(schedule, "{}({})", event, subject),
    LogLevel::Info => info!(schedule, "{}({})", event, subject),
    LogLevel::Warn => warn!(schedule, "{}({})", event, subject),
    LogLevel::Error => error!(schedule, "{}({})", event, subject),
  }
}
