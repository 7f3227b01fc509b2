//! Debug export of assembled graphs.
//!
//! Output is meant for people and offline tooling; the exact formatting
//! carries no compatibility guarantee.

use std::collections::BTreeSet;

use crate::graph::Graph;
use crate::name::Name;
use crate::node::{Edge, Node};

/// A text format for rendering nodes and edges.
pub trait Visualizer {
  fn prologue(title: &str) -> String;
  fn node<A>(node: &Node<A>) -> String;
  fn edge(edge: &Edge) -> String;
  fn epilogue() -> String;
}

/// Graphviz `digraph` syntax.
pub struct Graphviz;

impl Visualizer for Graphviz {
  fn prologue(title: &str) -> String {
    format!("digraph {} {{", title)
  }

  fn node<A>(node: &Node<A>) -> String {
    format!("  {}", node.name())
  }

  fn edge(edge: &Edge) -> String {
    format!("  {} -> {}", edge.source, edge.dest)
  }

  fn epilogue() -> String {
    "}".to_string()
  }
}

/// Mermaid flowchart syntax. Actions are drawn rounded, milestones square.
pub struct Mermaid;

impl Mermaid {
  fn id(name: &Name) -> String {
    format!("_{}", name.as_str().replace(' ', "_"))
  }
}

impl Visualizer for Mermaid {
  fn prologue(title: &str) -> String {
    format!("---\ntitle: {}\n---\nflowchart TD", title)
  }

  fn node<A>(node: &Node<A>) -> String {
    if node.is_milestone() {
      format!("  {}[{}]", Self::id(node.name()), node.name())
    } else {
      format!("  {}({})", Self::id(node.name()), node.name())
    }
  }

  fn edge(edge: &Edge) -> String {
    format!("  {} --> {}", Self::id(&edge.source), Self::id(&edge.dest))
  }

  fn epilogue() -> String {
    String::new()
  }
}

impl<A> Graph<A> {
  /// Render every node and edge with the given visualizer.
  pub fn render<V: Visualizer>(&self, title: &str) -> String {
    let mut lines = vec![V::prologue(title)];
    lines.extend(self.nodes().iter().map(V::node));
    lines.extend(self.edges().iter().map(V::edge));
    let epilogue = V::epilogue();
    if !epilogue.is_empty() {
      lines.push(epilogue);
    }
    lines.join("\n")
  }

  /// DOT text with synthetic `start`/`end` nodes attached to every source
  /// and sink.
  pub fn to_dot(&self, name: &str) -> String {
    dot_with_terminals(name, self.nodes().iter().map(Node::name), self.edges())
  }
}

pub(crate) fn dot_with_terminals<'a>(
  name: &str,
  nodes: impl IntoIterator<Item = &'a Name>,
  edges: &[Edge],
) -> String {
  let mut sources: BTreeSet<&Name> = BTreeSet::new();
  let mut sinks: BTreeSet<&Name> = BTreeSet::new();
  for node in nodes {
    sources.insert(node);
    sinks.insert(node);
  }
  for edge in edges {
    sinks.remove(&edge.source);
    sources.remove(&edge.dest);
  }

  let mut output = format!("digraph {} {{\n", name);
  for node in &sources {
    output.push_str(&format!("start -> {}\n", node));
  }
  for edge in edges {
    output.push_str(&format!("{} -> {}\n", edge.source, edge.dest));
  }
  for node in &sinks {
    output.push_str(&format!("{} -> end\n", node));
  }
  output.push('}');
  output
}
