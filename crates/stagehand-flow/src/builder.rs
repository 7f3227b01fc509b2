use stagehand_config::{LogLevel, ScheduleConfig};
use stagehand_graph::{BuildError, Fragment, GraphBuilder, Name, Node, NodeKind};
use tracing::debug;

use crate::flow::{Action, Flow, FlowStep};

/// A node that runs `run` when the flow reaches it.
pub fn action(name: impl Into<Name>, run: Action) -> Node<Action> {
  Node::action(name, run)
}

/// A synchronization point with no behavior of its own.
pub fn milestone(name: impl Into<Name>) -> Node<Action> {
  Node::milestone(name)
}

/// Collects flow contributions and compiles them into a [`Flow`].
#[derive(Clone, Default)]
pub struct FlowBuilder {
  graph: GraphBuilder<Action>,
  config: ScheduleConfig,
}

impl FlowBuilder {
  /// An unnamed builder. Flows built from it are never instrumented.
  pub fn new() -> Self {
    Self::default()
  }

  /// A builder whose flows log their steps under `name`.
  pub fn named(name: impl Into<String>) -> Self {
    Self::new().with_config(&ScheduleConfig {
      name: Some(name.into()),
      ..Default::default()
    })
  }

  /// Replace the name and log levels wholesale.
  pub fn with_config(mut self, config: &ScheduleConfig) -> Self {
    self.config = config.clone();
    self
  }

  /// Level for every event without a per-name override.
  pub fn with_log_level(mut self, level: LogLevel) -> Self {
    self.config.log_level = level;
    self
  }

  /// Contribute a fragment. Order of contributions does not matter.
  pub fn add(mut self, fragment: impl Into<Fragment<Action>>) -> Self {
    self.graph = self.graph.add(fragment);
    self
  }

  /// Contributions collected so far.
  pub fn graph(&self) -> &GraphBuilder<Action> {
    &self.graph
  }

  /// Sort the contributions and fix each step's callable, condition and
  /// log level.
  pub fn build(&self) -> Result<Flow, BuildError> {
    let steps = self.graph.build()?.topo_sort()?;
    let steps: Box<[FlowStep]> = steps
      .gated()
      .map(|(node, condition)| FlowStep {
        name: node.name().clone(),
        run: match node.kind() {
          NodeKind::Action(run) => Some(*run),
          NodeKind::Milestone => None,
        },
        condition: condition.clone(),
        log_level: self.config.step_level(node.name().as_str()),
      })
      .collect();

    debug!(
      flow = self.config.name.as_deref().unwrap_or("<unnamed>"),
      steps = steps.len(),
      "flow compiled"
    );
    Ok(Flow::new(
      self.config.name.as_deref().map(Name::from),
      self.config.schedule_level(),
      steps,
    ))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use stagehand_graph::reference;
  use std::cell::RefCell;

  thread_local! {
    static ACTUAL: RefCell<String> = const { RefCell::new(String::new()) };
  }

  fn record(s: &str) {
    ACTUAL.with(|a| a.borrow_mut().push_str(s));
  }

  fn take() -> String {
    ACTUAL.with(|a| std::mem::take(&mut *a.borrow_mut()))
  }

  fn a() {
    record("a");
  }
  fn b() {
    record("b");
  }
  fn c() {
    record("c");
  }

  #[test]
  fn test_empty_flow() {
    let flow = FlowBuilder::new().build().unwrap();
    assert!(flow.is_empty());
    flow.run();
    assert_eq!(take(), "");
  }

  #[test]
  fn test_single_action() {
    take();
    let flow = FlowBuilder::new().add(action("a", a)).build().unwrap();
    flow.run();
    assert_eq!(take(), "a");
  }

  #[test]
  fn test_actions_run_once() {
    take();
    let a = action("a", a);
    let (m0, m1) = (milestone("m0"), milestone("m1"));
    let flow = FlowBuilder::new()
      .add(&a >> &m0)
      .add(&a >> &m1)
      .add(&m0 >> &m1)
      .build()
      .unwrap();
    flow.run();
    assert_eq!(take(), "a");
    assert_eq!(flow.len(), 3);
  }

  #[test]
  fn test_insert_between_actions() {
    take();
    let (a, b, c) = (action("a", a), action("b", b), action("c", c));
    let flow = FlowBuilder::new()
      .add(&a >> &c)
      .add(&a >> &b >> &c)
      .build()
      .unwrap();
    flow.run();
    assert_eq!(take(), "abc");
  }

  #[test]
  fn test_later_dependency_orders_parallel_actions() {
    take();
    let (a, b, c) = (action("a", a), action("b", b), action("c", c));
    let flow = FlowBuilder::new()
      .add(&a & &b & &c)
      .add(&c >> &a)
      .build()
      .unwrap();
    flow.run();
    let actual = take();
    assert_eq!(actual.len(), 3);
    assert!(actual.find('c') < actual.find('a'));
  }

  #[test]
  fn test_cycle_fails_build() {
    let (a, b) = (action("a", a), action("b", b));
    let result = FlowBuilder::new().add(&a >> &b).add(&b >> &a).build();
    assert!(matches!(result, Err(BuildError::CycleDetected { .. })));
  }

  fn enabled() -> bool {
    true
  }

  fn disabled() -> bool {
    false
  }

  #[test]
  fn test_gated_actions_skip_when_condition_fails() {
    take();
    let (a, b, c) = (action("a", a), action("b", b), action("c", c));
    let m = milestone("m");
    let flow = FlowBuilder::new()
      .add(&a >> &m >> &c)
      .add((reference("m") >> &b).when("feature_b", disabled))
      .build()
      .unwrap();
    assert_eq!(flow.len(), 4);
    flow.run();
    assert_eq!(take(), "ac");
  }

  #[test]
  fn test_gated_actions_run_when_condition_holds() {
    take();
    let (a, b) = (action("a", a), action("b", b));
    let flow = FlowBuilder::new()
      .add(&a)
      .add((reference("a") >> &b).when("feature_b", enabled))
      .build()
      .unwrap();
    flow.run();
    assert_eq!(take(), "ab");
  }

  #[test]
  fn test_ungated_sequence_over_gated_action_fails_build() {
    let (a, b) = (action("a", a), action("b", b));
    let result = FlowBuilder::new()
      .add(Fragment::from(&a).when("feature_a", enabled))
      .add(reference("a") >> &b)
      .build();
    assert!(matches!(
      result,
      Err(BuildError::MismatchedCondition { .. })
    ));
  }

  #[test]
  fn test_step_levels_resolved_at_build() {
    let mut config = ScheduleConfig {
      name: Some("boot".to_string()),
      ..Default::default()
    };
    config.levels.insert("boot".to_string(), LogLevel::Info);
    config.levels.insert("m".to_string(), LogLevel::Warn);
    let flow = FlowBuilder::new()
      .with_config(&config)
      .add(action("a", a) >> milestone("m"))
      .build()
      .unwrap();
    assert_eq!(flow.log_level(), LogLevel::Info);
    let levels: Vec<LogLevel> = flow.steps().iter().map(|s| s.log_level).collect();
    assert_eq!(levels, vec![LogLevel::Info, LogLevel::Warn]);
  }

  #[test]
  fn test_named_carries_config() {
    let flow = FlowBuilder::named("boot")
      .with_log_level(LogLevel::Debug)
      .build()
      .unwrap();
    assert_eq!(flow.name().map(Name::as_str), Some("boot"));
    assert_eq!(flow.log_level(), LogLevel::Debug);
  }
}
