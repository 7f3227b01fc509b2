use thiserror::Error;

use crate::name::Name;

/// Contradictions between contributions, detected while building.
///
/// Every variant is terminal: the whole build fails rather than dropping or
/// reordering a node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
  /// A name is used in the graph but no contribution declares it.
  #[error("nodes referenced but never declared: {}", join(.names))]
  DanglingReference { names: Vec<Name> },

  /// Two contributions declare different nodes under one name.
  #[error("nodes explicitly declared more than once: {}", join(.names))]
  ExplicitDuplicate { names: Vec<Name> },

  /// Not every node can be placed; `cycle` lists one cycle in edge order.
  #[error("cycle detected: {}", render_cycle(.cycle))]
  CycleDetected { cycle: Vec<Name> },

  /// A sequence joins nodes gated by conditions it does not itself carry.
  #[error(
    "conditions on sequence {from} -> {to} are weaker than the conditions on its nodes"
  )]
  MismatchedCondition { from: Name, to: Name },

  /// A lookup named a node that is not in the graph.
  #[error("node not found: {0}")]
  UnknownNode(Name),
}

fn join(names: &[Name]) -> String {
  names
    .iter()
    .map(Name::as_str)
    .collect::<Vec<_>>()
    .join(", ")
}

fn render_cycle(cycle: &[Name]) -> String {
  match cycle.first() {
    Some(first) => format!("{} -> {}", join_arrows(cycle), first),
    None => String::new(),
  }
}

fn join_arrows(names: &[Name]) -> String {
  names
    .iter()
    .map(Name::as_str)
    .collect::<Vec<_>>()
    .join(" -> ")
}
