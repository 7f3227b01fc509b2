use std::fmt;
use std::sync::Arc;

use crate::name::Name;

/// What a node does when the schedule reaches it.
pub enum NodeKind<A> {
  /// Unit of work carrying a callable payload.
  Action(A),
  /// Pure synchronization point.
  Milestone,
}

struct NodeDef<A> {
  name: Name,
  kind: NodeKind<A>,
}

/// A named action or milestone.
///
/// `Node` is a shared handle: cloning it reuses the same definition, which is
/// how one node is mentioned from several fragments without being declared
/// twice.
pub struct Node<A> {
  def: Arc<NodeDef<A>>,
}

impl<A> Node<A> {
  /// Create an action when a callable is given, a milestone otherwise.
  pub fn new(name: impl Into<Name>, action: Option<A>) -> Self {
    let kind = match action {
      Some(action) => NodeKind::Action(action),
      None => NodeKind::Milestone,
    };
    Self {
      def: Arc::new(NodeDef {
        name: name.into(),
        kind,
      }),
    }
  }

  /// A node that carries `action`.
  pub fn action(name: impl Into<Name>, action: A) -> Self {
    Self::new(name, Some(action))
  }

  /// A node with no behavior that only orders its neighbors.
  pub fn milestone(name: impl Into<Name>) -> Self {
    Self::new(name, None)
  }

  /// The node's identity.
  pub fn name(&self) -> &Name {
    &self.def.name
  }

  /// Whether this is an action or a milestone.
  pub fn kind(&self) -> &NodeKind<A> {
    &self.def.kind
  }

  /// The callable payload, if this node is an action.
  pub fn payload(&self) -> Option<&A> {
    match &self.def.kind {
      NodeKind::Action(action) => Some(action),
      NodeKind::Milestone => None,
    }
  }

  /// True for nodes without a payload.
  pub fn is_milestone(&self) -> bool {
    matches!(self.def.kind, NodeKind::Milestone)
  }

  /// Whether two nodes describe one definition.
  ///
  /// Clones of the same handle always match. Milestones carry no behavior, so
  /// two milestones with equal names match even when declared separately.
  /// Separately constructed actions never match.
  pub fn same_definition(&self, other: &Node<A>) -> bool {
    Arc::ptr_eq(&self.def, &other.def)
      || (self.is_milestone() && other.is_milestone() && self.name() == other.name())
  }
}

impl<A> Clone for Node<A> {
  fn clone(&self) -> Self {
    Self {
      def: Arc::clone(&self.def),
    }
  }
}

impl<A> fmt::Debug for Node<A> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.kind() {
      NodeKind::Action(_) => write!(f, "Action({})", self.name()),
      NodeKind::Milestone => write!(f, "Milestone({})", self.name()),
    }
  }
}

/// Precedence constraint: `source` completes before `dest` begins.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
  pub source: Name,
  pub dest: Name,
}

impl Edge {
  pub fn new(source: impl Into<Name>, dest: impl Into<Name>) -> Self {
    Self {
      source: source.into(),
      dest: dest.into(),
    }
  }
}

impl fmt::Display for Edge {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} -> {}", self.source, self.dest)
  }
}
