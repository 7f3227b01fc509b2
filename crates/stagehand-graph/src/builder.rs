use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::condition::Condition;
use crate::error::BuildError;
use crate::fragment::{Fragment, Leaf};
use crate::graph::Graph;
use crate::name::Name;
use crate::node::{Edge, Node};
use crate::viz;

/// Accumulates contributions from independent components.
///
/// Each [`add`](GraphBuilder::add) consumes the builder and returns one that
/// also holds the new fragment. All state is keyed by name in ordered
/// collections, so the merged result does not depend on the order in which
/// contributions arrive.
///
/// ```ignore
/// let graph = GraphBuilder::new()
///   .add(a >> b >> d)
///   .add(a >> c >> d)
///   .build()?;
/// ```
///
/// Here both `b` and `c` run between `a` and `d`, with no ordering between
/// `b` and `c`.
pub struct GraphBuilder<A> {
  defined: BTreeMap<Name, (Node<A>, Condition)>,
  duplicates: BTreeSet<Name>,
  referenced: BTreeSet<Name>,
  /// each contributed edge with the condition it was declared under
  edges: BTreeSet<(Edge, Condition)>,
}

impl<A> GraphBuilder<A> {
  pub fn new() -> Self {
    Self {
      defined: BTreeMap::new(),
      duplicates: BTreeSet::new(),
      referenced: BTreeSet::new(),
      edges: BTreeSet::new(),
    }
  }

  /// Merge a fragment's nodes and edges into the builder.
  ///
  /// A node declared again under a different condition counts as a second
  /// declaration.
  pub fn add(mut self, fragment: impl Into<Fragment<A>>) -> Self {
    let fragment = fragment.into();
    let (leaves, edges) = fragment.gated();
    for (leaf, condition) in leaves {
      match leaf {
        Leaf::Defined(node) => match self.defined.get(node.name()) {
          Some((existing, existing_condition))
            if !existing.same_definition(node) || *existing_condition != condition =>
          {
            self.duplicates.insert(node.name().clone());
          }
          Some(_) => {}
          None => {
            self
              .defined
              .insert(node.name().clone(), (node.clone(), condition));
          }
        },
        Leaf::Reference(name) => {
          self.referenced.insert(name.clone());
        }
      }
    }
    self.edges.extend(edges);
    self
  }

  /// Number of distinct names mentioned so far, declared or not.
  pub fn node_count(&self) -> usize {
    self.mentioned().len()
  }

  fn mentioned(&self) -> BTreeSet<&Name> {
    let mut names: BTreeSet<&Name> = self.defined.keys().collect();
    names.extend(self.referenced.iter());
    for (edge, _) in &self.edges {
      names.insert(&edge.source);
      names.insert(&edge.dest);
    }
    names
  }

  /// Validate the contributions and produce the merged graph.
  pub fn build(&self) -> Result<Graph<A>, BuildError> {
    if !self.duplicates.is_empty() {
      return Err(BuildError::ExplicitDuplicate {
        names: self.duplicates.iter().cloned().collect(),
      });
    }

    let dangling: Vec<Name> = self
      .mentioned()
      .into_iter()
      .filter(|name| !self.defined.contains_key(*name))
      .cloned()
      .collect();
    if !dangling.is_empty() {
      return Err(BuildError::DanglingReference { names: dangling });
    }

    self.check_conditions()?;

    let graph = Graph::from_parts(
      self.defined.values().cloned().collect(),
      self.unique_edges(),
    );
    debug!(
      nodes = graph.len(),
      edges = graph.edges().len(),
      "graph assembled"
    );
    Ok(graph)
  }

  /// Every edge must carry at least the conditions of both its nodes, so
  /// that a gated node is never ordered by an ungated sequence.
  fn check_conditions(&self) -> Result<(), BuildError> {
    let always = Condition::always();
    let condition_of = |name: &Name| {
      self
        .defined
        .get(name)
        .map(|(_, condition)| condition)
        .unwrap_or(&always)
    };
    for (edge, condition) in &self.edges {
      if !condition.implies(condition_of(&edge.source))
        || !condition.implies(condition_of(&edge.dest))
      {
        return Err(BuildError::MismatchedCondition {
          from: edge.source.clone(),
          to: edge.dest.clone(),
        });
      }
    }
    Ok(())
  }

  fn unique_edges(&self) -> Vec<Edge> {
    let mut edges: Vec<Edge> = self.edges.iter().map(|(edge, _)| edge.clone()).collect();
    edges.dedup();
    edges
  }

  /// DOT rendering of everything added so far, without validation.
  pub fn to_dot(&self, name: &str) -> String {
    viz::dot_with_terminals(name, self.mentioned(), &self.unique_edges())
  }
}

impl<A> Default for GraphBuilder<A> {
  fn default() -> Self {
    Self::new()
  }
}

impl<A> Clone for GraphBuilder<A> {
  fn clone(&self) -> Self {
    Self {
      defined: self.defined.clone(),
      duplicates: self.duplicates.clone(),
      referenced: self.referenced.clone(),
      edges: self.edges.clone(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::fragment::reference;

  fn action(name: &str) -> Node<()> {
    Node::action(name, ())
  }

  #[test]
  fn test_empty_builder() {
    let graph = GraphBuilder::<()>::new().build().unwrap();
    assert!(graph.is_empty());
  }

  #[test]
  fn test_milestone_from_two_contributors_is_one_node() {
    let graph = GraphBuilder::<()>::new()
      .add(Node::milestone("m"))
      .add(Node::milestone("m"))
      .build()
      .unwrap();
    assert_eq!(graph.len(), 1);
    assert!(graph.node("m").is_some());
  }

  #[test]
  fn test_identical_edges_collapse() {
    let (a, b) = (action("a"), action("b"));
    let graph = GraphBuilder::new()
      .add(&a >> &b)
      .add(&a >> &b)
      .build()
      .unwrap();
    assert_eq!(graph.edges(), &[Edge::new("a", "b")]);
  }

  #[test]
  fn test_separately_declared_actions_are_duplicates() {
    let result = GraphBuilder::new().add(action("a")).add(action("a")).build();
    assert_eq!(
      result.unwrap_err(),
      BuildError::ExplicitDuplicate {
        names: vec![Name::from("a")]
      }
    );
  }

  #[test]
  fn test_action_and_milestone_sharing_a_name_are_duplicates() {
    let result = GraphBuilder::new()
      .add(action("x"))
      .add(Node::milestone("x"))
      .build();
    assert!(matches!(result, Err(BuildError::ExplicitDuplicate { .. })));
  }

  #[test]
  fn test_reused_node_value_is_not_a_duplicate() {
    let a = action("a");
    let graph = GraphBuilder::new()
      .add(&a)
      .add(&a >> action("b"))
      .build()
      .unwrap();
    assert_eq!(graph.len(), 2);
  }

  #[test]
  fn test_reference_without_declaration_is_dangling() {
    let result = GraphBuilder::new()
      .add(reference("ready") >> action("a"))
      .build();
    assert_eq!(
      result.unwrap_err(),
      BuildError::DanglingReference {
        names: vec![Name::from("ready")]
      }
    );
  }

  #[test]
  fn test_reference_resolves_to_declaration_from_other_contribution() {
    let graph = GraphBuilder::new()
      .add(reference("ready") >> action("a"))
      .add(Node::milestone("ready"))
      .build()
      .unwrap();
    assert_eq!(graph.len(), 2);
    assert!(graph.node("ready").unwrap().is_milestone());
  }

  #[test]
  fn test_node_count_includes_undeclared_names() {
    let builder = GraphBuilder::new().add(reference("m") >> action("a") >> action("b"));
    assert_eq!(builder.node_count(), 3);
  }

  #[test]
  fn test_duplicates_reported_before_dangling() {
    let result = GraphBuilder::new()
      .add(action("a"))
      .add(action("a") >> reference("missing"))
      .build();
    assert!(matches!(result, Err(BuildError::ExplicitDuplicate { .. })));
  }

  #[test]
  fn test_partial_dot_export() {
    let builder = GraphBuilder::new().add(reference("m") >> action("a"));
    assert_eq!(
      builder.to_dot("partial"),
      "digraph partial {\nstart -> m\nm -> a\na -> end\n}"
    );
  }

  fn enabled() -> bool {
    true
  }

  #[test]
  fn test_gated_node_ordered_by_gated_sequence() {
    let graph = GraphBuilder::new()
      .add(Node::milestone("ready"))
      .add((reference("ready") >> action("usb")).when("usb_enabled", enabled))
      .build()
      .unwrap();
    assert!(graph.condition("ready").unwrap().is_always());
    assert_eq!(graph.condition("usb").unwrap().to_string(), "usb_enabled");
  }

  #[test]
  fn test_ungated_sequence_over_gated_node_is_rejected() {
    let a = Node::<()>::milestone("a");
    let result = GraphBuilder::new()
      .add(Fragment::from(&a).when("feature_a", enabled))
      .add(reference("a") >> Node::milestone("b"))
      .build();
    assert_eq!(
      result.unwrap_err(),
      BuildError::MismatchedCondition {
        from: Name::from("a"),
        to: Name::from("b"),
      }
    );
  }

  #[test]
  fn test_same_node_under_two_conditions_is_duplicate() {
    let a = action("a");
    let result = GraphBuilder::new()
      .add(&a)
      .add(Fragment::from(&a).when("feature", enabled))
      .build();
    assert!(matches!(result, Err(BuildError::ExplicitDuplicate { .. })));
  }
}
