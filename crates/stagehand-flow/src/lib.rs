//! Stagehand Flow
//!
//! Renders an ordered schedule into a [`Flow`]: a fixed array of steps run
//! front to back, each exactly once.
//!
//! ```ignore
//! let flow = FlowBuilder::named("boot")
//!   .add(action("power", power_on) >> milestone("ready"))
//!   .build()?;
//! flow.run();
//! ```

mod builder;
mod flow;

pub use builder::{FlowBuilder, action, milestone};
pub use flow::{Action, Flow, FlowStep};
