use stagehand_config::LogLevel;
use stagehand_graph::{Condition, Name, emit};

/// Callable carried by an action.
pub type Action = fn();

/// One entry of a compiled flow.
#[derive(Debug, Clone)]
pub struct FlowStep {
  pub name: Name,
  /// `None` for milestones.
  pub run: Option<Action>,
  /// Checked every time the flow reaches this step.
  pub condition: Condition,
  /// Level of this step's event, fixed at build time.
  pub log_level: LogLevel,
}

impl FlowStep {
  pub fn is_milestone(&self) -> bool {
    self.run.is_none()
  }

  fn event(&self) -> &'static str {
    if self.is_milestone() {
      "flow.milestone"
    } else {
      "flow.action"
    }
  }
}

/// A compiled, immutable linear schedule.
#[derive(Debug, Clone)]
pub struct Flow {
  name: Option<Name>,
  log_level: LogLevel,
  steps: Box<[FlowStep]>,
}

impl Flow {
  pub(crate) fn new(name: Option<Name>, log_level: LogLevel, steps: Box<[FlowStep]>) -> Self {
    Self {
      name,
      log_level,
      steps,
    }
  }

  /// Run every step in order, skipping steps whose condition does not hold.
  ///
  /// Named flows log `flow.start`, each `flow.action`/`flow.milestone` that
  /// is reached, and `flow.end`. Unnamed flows only call actions.
  pub fn run(&self) {
    let schedule = self.name.as_ref().map(Name::as_str);
    if let Some(schedule) = schedule {
      emit(self.log_level, schedule, "flow.start", schedule);
    }

    for step in self.steps.iter() {
      if !step.condition.is_met() {
        continue;
      }
      if let Some(schedule) = schedule {
        emit(step.log_level, schedule, step.event(), step.name.as_str());
      }
      if let Some(run) = step.run {
        run();
      }
    }

    if let Some(schedule) = schedule {
      emit(self.log_level, schedule, "flow.end", schedule);
    }
  }

  pub fn name(&self) -> Option<&Name> {
    self.name.as_ref()
  }

  /// Level of the `flow.start`/`flow.end` events.
  pub fn log_level(&self) -> LogLevel {
    self.log_level
  }

  pub fn steps(&self) -> &[FlowStep] {
    &self.steps
  }

  pub fn len(&self) -> usize {
    self.steps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }

  /// Step names in execution order.
  pub fn names(&self) -> Vec<&Name> {
    self.steps.iter().map(|step| &step.name).collect()
  }
}
