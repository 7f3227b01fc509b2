//! Stagehand Seq
//!
//! Renders an ordered schedule into a [`Sequence`]: a stepper that can be
//! driven forward (bring-up) and backward (tear-down). Any step may report
//! [`Status::NotDone`], which pauses the sequence at that step; the next call
//! retries it.

mod builder;
mod sequence;
mod step;

pub use builder::SeqBuilder;
pub use sequence::Sequence;
pub use step::{Direction, Status, StepFn, StepFns, milestone, step};
