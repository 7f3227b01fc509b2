use stagehand_config::{LogLevel, ScheduleConfig};
use stagehand_graph::{BuildError, Condition, Fragment, GraphBuilder, Name, NodeKind};
use tracing::debug;

use crate::sequence::Sequence;
use crate::step::{StepFn, StepFns, done};

/// Collects step contributions and compiles them into a [`Sequence`].
#[derive(Clone, Default)]
pub struct SeqBuilder {
  graph: GraphBuilder<StepFns>,
  config: ScheduleConfig,
}

impl SeqBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// A builder whose sequence logs under `name`.
  pub fn named(name: impl Into<String>) -> Self {
    Self::new().with_config(&ScheduleConfig {
      name: Some(name.into()),
      ..Default::default()
    })
  }

  /// Replace the runtime configuration (name, level and per-name levels).
  pub fn with_config(mut self, config: &ScheduleConfig) -> Self {
    self.config = config.clone();
    self
  }

  /// Set the level used by steps without an override.
  pub fn with_log_level(mut self, level: LogLevel) -> Self {
    self.config.log_level = level;
    self
  }

  /// Contribute a fragment. Order of contributions does not matter.
  pub fn add(mut self, fragment: impl Into<Fragment<StepFns>>) -> Self {
    self.graph = self.graph.add(fragment);
    self
  }

  pub fn graph(&self) -> &GraphBuilder<StepFns> {
    &self.graph
  }

  /// Sort the contributions and lay them out as parallel step arrays.
  ///
  /// Backward functions sit at the same index as their forward partners;
  /// the stepper walks the array in reverse when going backward. Each
  /// step's log level is resolved here from the configuration.
  pub fn build(&self) -> Result<Sequence, BuildError> {
    let steps = self.graph.build()?.topo_sort()?;

    let mut names: Vec<Name> = Vec::with_capacity(steps.len());
    let mut levels: Vec<LogLevel> = Vec::with_capacity(steps.len());
    let mut conditions: Vec<Condition> = Vec::with_capacity(steps.len());
    let mut forward: Vec<StepFn> = Vec::with_capacity(steps.len());
    let mut backward: Vec<StepFn> = Vec::with_capacity(steps.len());
    for (node, condition) in steps.gated() {
      let fns = match node.kind() {
        NodeKind::Action(fns) => *fns,
        NodeKind::Milestone => StepFns {
          forward: done,
          backward: done,
        },
      };
      names.push(node.name().clone());
      levels.push(self.config.step_level(node.name().as_str()));
      conditions.push(condition.clone());
      forward.push(fns.forward);
      backward.push(fns.backward);
    }

    debug!(
      seq = self.config.name.as_deref().unwrap_or("<unnamed>"),
      steps = names.len(),
      "sequence compiled"
    );
    Ok(Sequence::new(
      self.config.name.as_deref().map(Name::from),
      names.into(),
      levels.into(),
      conditions.into(),
      forward.into(),
      backward.into(),
    ))
  }
}
