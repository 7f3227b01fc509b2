//! Stagehand Config
//!
//! This crate contains the serializable configuration types for stagehand.
//! These types describe schedules and instrumentation before they are handed
//! to the graph assembler and the renderers.
//!
//! Configuration can be loaded from:
//! - JSON files (via CLI with `stagehand order schedule.json`)
//! - Embedded JSON strings (for tests and build scripts)
//!
//! Nothing here knows about callables. A `ScheduleDef` is a name-only picture
//! of the contributions that components make, which is enough for offline
//! ordering and visualization.

mod error;
mod logging;
mod schedule;

pub use error::ConfigError;
pub use logging::{LogLevel, LoggingConfig, ScheduleConfig};
pub use schedule::{ComponentDef, ExprDef, ScheduleDef};
