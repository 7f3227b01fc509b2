use std::collections::{HashMap, HashSet, VecDeque};

use crate::condition::Condition;
use crate::error::BuildError;
use crate::name::Name;
use crate::node::{Edge, Node};

/// Validated union of every contribution.
///
/// Nodes live in an arena sorted by name and are addressed by index
/// internally; adjacency lists hold indices in ascending order.
pub struct Graph<A> {
  nodes: Vec<Node<A>>,
  /// node index -> runtime condition gating the node
  conditions: Vec<Condition>,
  index: HashMap<Name, usize>,
  edges: Vec<Edge>,
  /// node index -> downstream node indices
  adjacency: Vec<Vec<usize>>,
  /// node index -> upstream node indices
  reverse_adjacency: Vec<Vec<usize>>,
}

impl<A> Graph<A> {
  /// Build the arena. `nodes` must be sorted by name and unique; edges whose
  /// endpoints are missing are ignored.
  pub(crate) fn from_parts(nodes: Vec<(Node<A>, Condition)>, mut edges: Vec<Edge>) -> Self {
    let (nodes, conditions): (Vec<Node<A>>, Vec<Condition>) = nodes.into_iter().unzip();
    let index: HashMap<Name, usize> = nodes
      .iter()
      .enumerate()
      .map(|(i, node)| (node.name().clone(), i))
      .collect();

    edges.retain(|edge| index.contains_key(&edge.source) && index.contains_key(&edge.dest));
    edges.sort();
    edges.dedup();

    let mut adjacency = vec![Vec::new(); nodes.len()];
    let mut reverse_adjacency = vec![Vec::new(); nodes.len()];
    for edge in &edges {
      let (from, to) = (index[&edge.source], index[&edge.dest]);
      adjacency[from].push(to);
      reverse_adjacency[to].push(from);
    }
    for list in adjacency.iter_mut().chain(reverse_adjacency.iter_mut()) {
      list.sort_unstable();
    }

    Self {
      nodes,
      conditions,
      index,
      edges,
      adjacency,
      reverse_adjacency,
    }
  }

  /// Number of nodes.
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  /// True when the graph has no nodes.
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// All nodes, sorted by name.
  pub fn nodes(&self) -> &[Node<A>] {
    &self.nodes
  }

  /// All edges, sorted by (source, dest).
  pub fn edges(&self) -> &[Edge] {
    &self.edges
  }

  /// Look up a node by name.
  pub fn node(&self, name: &str) -> Option<&Node<A>> {
    self.index.get(name).map(|&i| &self.nodes[i])
  }

  /// The runtime condition a node was declared under.
  pub fn condition(&self, name: &str) -> Option<&Condition> {
    self.index.get(name).map(|&i| &self.conditions[i])
  }

  pub(crate) fn condition_at(&self, index: usize) -> &Condition {
    &self.conditions[index]
  }

  pub fn contains(&self, name: &str) -> bool {
    self.index.contains_key(name)
  }

  /// Get downstream nodes for a given node.
  pub fn successors(&self, name: &str) -> Vec<&Name> {
    self.neighbors(name, &self.adjacency)
  }

  /// Get upstream nodes for a given node.
  pub fn predecessors(&self, name: &str) -> Vec<&Name> {
    self.neighbors(name, &self.reverse_adjacency)
  }

  fn neighbors<'a>(&'a self, name: &str, lists: &'a [Vec<usize>]) -> Vec<&'a Name> {
    self
      .index
      .get(name)
      .map(|&i| lists[i].iter().map(|&j| self.nodes[j].name()).collect())
      .unwrap_or_default()
  }

  /// Nodes with no incoming edges.
  pub fn entry_points(&self) -> Vec<&Name> {
    self.names_where(|i| self.reverse_adjacency[i].is_empty())
  }

  /// Nodes with no outgoing edges.
  pub fn exit_points(&self) -> Vec<&Name> {
    self.names_where(|i| self.adjacency[i].is_empty())
  }

  fn names_where(&self, keep: impl Fn(usize) -> bool) -> Vec<&Name> {
    (0..self.nodes.len())
      .filter(|&i| keep(i))
      .map(|i| self.nodes[i].name())
      .collect()
  }

  /// The part of the graph that lies on some path from `start` to `end`.
  ///
  /// Useful for inspecting why two nodes are ordered the way they are.
  pub fn subgraph_between(&self, start: &str, end: &str) -> Result<Graph<A>, BuildError> {
    let start = self.lookup(start)?;
    let end = self.lookup(end)?;

    let downstream = reachable(start, &self.adjacency);
    let upstream = reachable(end, &self.reverse_adjacency);

    let nodes: Vec<(Node<A>, Condition)> = (0..self.nodes.len())
      .filter(|i| downstream.contains(i) && upstream.contains(i))
      .map(|i| (self.nodes[i].clone(), self.conditions[i].clone()))
      .collect();

    Ok(Graph::from_parts(nodes, self.edges.clone()))
  }

  fn lookup(&self, name: &str) -> Result<usize, BuildError> {
    self
      .index
      .get(name)
      .copied()
      .ok_or_else(|| BuildError::UnknownNode(Name::from(name)))
  }

  pub(crate) fn adjacency(&self) -> &[Vec<usize>] {
    &self.adjacency
  }

  pub(crate) fn reverse_adjacency(&self) -> &[Vec<usize>] {
    &self.reverse_adjacency
  }
}

fn reachable(from: usize, lists: &[Vec<usize>]) -> HashSet<usize> {
  let mut seen = HashSet::from([from]);
  let mut queue = VecDeque::from([from]);
  while let Some(i) = queue.pop_front() {
    for &j in &lists[i] {
      if seen.insert(j) {
        queue.push_back(j);
      }
    }
  }
  seen
}

impl<A> Clone for Graph<A> {
  fn clone(&self) -> Self {
    Self {
      nodes: self.nodes.clone(),
      conditions: self.conditions.clone(),
      index: self.index.clone(),
      edges: self.edges.clone(),
      adjacency: self.adjacency.clone(),
      reverse_adjacency: self.reverse_adjacency.clone(),
    }
  }
}

impl<A> std::fmt::Debug for Graph<A> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Graph")
      .field("nodes", &self.nodes)
      .field("edges", &self.edges)
      .finish()
  }
}
