use stagehand_graph::{Name, Node};

/// Outcome of a single step invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
  Done,
  NotDone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
  Forward,
  Backward,
}

impl Direction {
  pub fn opposite(self) -> Self {
    match self {
      Direction::Forward => Direction::Backward,
      Direction::Backward => Direction::Forward,
    }
  }
}

pub type StepFn = fn() -> Status;

/// The forward and backward halves of one step.
#[derive(Debug, Clone, Copy)]
pub struct StepFns {
  pub forward: StepFn,
  pub backward: StepFn,
}

/// A step that runs `forward` on the way up and `backward` on the way down.
pub fn step(name: impl Into<Name>, forward: StepFn, backward: StepFn) -> Node<StepFns> {
  Node::action(name, StepFns { forward, backward })
}

/// An ordering point that completes immediately in both directions.
pub fn milestone(name: impl Into<Name>) -> Node<StepFns> {
  Node::milestone(name)
}

pub(crate) fn done() -> Status {
  Status::Done
}
