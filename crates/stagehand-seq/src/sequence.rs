use stagehand_config::LogLevel;
use stagehand_graph::{Condition, Name, emit};

use crate::step::{Direction, Status, StepFn};

/// A compiled, resumable bidirectional stepper.
///
/// `cursor` counts completed forward steps: forward runs `forward[cursor]`
/// and advances, backward runs `backward[cursor - 1]` and retreats. A step
/// that reports [`Status::NotDone`] leaves the cursor where it is. A step
/// whose condition does not hold counts as done in either direction.
#[derive(Debug, Clone)]
pub struct Sequence {
  name: Option<Name>,
  names: Box<[Name]>,
  levels: Box<[LogLevel]>,
  conditions: Box<[Condition]>,
  forward: Box<[StepFn]>,
  backward: Box<[StepFn]>,
  cursor: usize,
  prev_status: Status,
  prev_direction: Direction,
}

impl Sequence {
  pub(crate) fn new(
    name: Option<Name>,
    names: Box<[Name]>,
    levels: Box<[LogLevel]>,
    conditions: Box<[Condition]>,
    forward: Box<[StepFn]>,
    backward: Box<[StepFn]>,
  ) -> Self {
    Self {
      name,
      names,
      levels,
      conditions,
      forward,
      backward,
      cursor: 0,
      prev_status: Status::Done,
      prev_direction: Direction::Backward,
    }
  }

  /// An unnamed sequence over explicit step arrays.
  ///
  /// Returns `None` when the arrays differ in length. Steps are labelled
  /// `step0`, `step1`, ... in [`names`](Sequence::names).
  pub fn from_fns(forward: &[StepFn], backward: &[StepFn]) -> Option<Self> {
    if forward.len() != backward.len() {
      return None;
    }
    let names = (0..forward.len())
      .map(|i| Name::from(format!("step{}", i)))
      .collect();
    Some(Self::new(
      None,
      names,
      vec![LogLevel::default(); forward.len()].into(),
      vec![Condition::always(); forward.len()].into(),
      forward.into(),
      backward.into(),
    ))
  }

  /// Run forward steps until the end or until one reports `NotDone`.
  pub fn forward(&mut self) -> Status {
    self.go(Direction::Forward)
  }

  /// Run backward steps until the start or until one reports `NotDone`.
  pub fn backward(&mut self) -> Status {
    self.go(Direction::Backward)
  }

  fn go(&mut self, direction: Direction) -> Status {
    let opposite = direction.opposite();

    // An unfinished step from the other direction must complete first.
    if self.prev_direction == opposite
      && self.prev_status == Status::NotDone
      && self.step(opposite) == Status::NotDone
    {
      return Status::NotDone;
    }

    self.prev_direction = direction;
    while self.can_continue(direction) {
      if self.step(direction) == Status::NotDone {
        self.prev_status = Status::NotDone;
        return Status::NotDone;
      }
    }

    self.prev_status = Status::Done;
    Status::Done
  }

  fn can_continue(&self, direction: Direction) -> bool {
    match direction {
      Direction::Forward => self.cursor < self.forward.len(),
      Direction::Backward => self.cursor > 0,
    }
  }

  fn step(&mut self, direction: Direction) -> Status {
    let (index, run) = match direction {
      Direction::Forward => match self.forward.get(self.cursor) {
        Some(&run) => (self.cursor, run),
        None => return Status::Done,
      },
      Direction::Backward => match self.cursor.checked_sub(1) {
        Some(index) => (index, self.backward[index]),
        None => return Status::Done,
      },
    };

    let status = if self.conditions[index].is_met() {
      if let Some(schedule) = &self.name {
        emit(
          self.levels[index],
          schedule.as_str(),
          "seq.step",
          self.names[index].as_str(),
        );
      }
      run()
    } else {
      Status::Done
    };
    if status == Status::Done {
      self.cursor = match direction {
        Direction::Forward => index + 1,
        Direction::Backward => index,
      };
    }
    status
  }

  /// Number of forward steps completed.
  pub fn cursor(&self) -> usize {
    self.cursor
  }

  pub fn prev_status(&self) -> Status {
    self.prev_status
  }

  pub fn prev_direction(&self) -> Direction {
    self.prev_direction
  }

  pub fn name(&self) -> Option<&Name> {
    self.name.as_ref()
  }

  /// Step names in forward order.
  pub fn names(&self) -> &[Name] {
    &self.names
  }

  /// Level of each step's `seq.step` event, parallel to [`names`](Sequence::names).
  pub fn levels(&self) -> &[LogLevel] {
    &self.levels
  }

  pub fn conditions(&self) -> &[Condition] {
    &self.conditions
  }

  pub fn len(&self) -> usize {
    self.forward.len()
  }

  pub fn is_empty(&self) -> bool {
    self.forward.is_empty()
  }
}
