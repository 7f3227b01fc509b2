use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::condition::Condition;
use crate::error::BuildError;
use crate::graph::Graph;
use crate::name::Name;
use crate::node::Node;

/// Nodes in one total order consistent with every edge.
///
/// Produced once by [`Graph::topo_sort`] and immutable afterwards.
pub struct StepList<A> {
  steps: Box<[Node<A>]>,
  conditions: Box<[Condition]>,
}

impl<A> StepList<A> {
  /// Number of steps.
  pub fn len(&self) -> usize {
    self.steps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Node<A>> {
    self.steps.iter()
  }

  pub fn as_slice(&self) -> &[Node<A>] {
    &self.steps
  }

  /// Steps paired with the runtime condition that gates each one.
  pub fn gated(&self) -> impl Iterator<Item = (&Node<A>, &Condition)> {
    self.steps.iter().zip(self.conditions.iter())
  }

  /// Step names in order.
  pub fn names(&self) -> Vec<&Name> {
    self.steps.iter().map(Node::name).collect()
  }

  /// Index of `name` in the order.
  pub fn position(&self, name: &str) -> Option<usize> {
    self.steps.iter().position(|node| node.name().as_str() == name)
  }
}

impl<'a, A> IntoIterator for &'a StepList<A> {
  type Item = &'a Node<A>;
  type IntoIter = std::slice::Iter<'a, Node<A>>;

  fn into_iter(self) -> Self::IntoIter {
    self.steps.iter()
  }
}

impl<A> std::fmt::Debug for StepList<A> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_list().entries(self.steps.iter()).finish()
  }
}

impl<A> Graph<A> {
  /// Linearize the graph with Kahn's algorithm.
  ///
  /// When several nodes are ready at once, the one with the smallest name is
  /// placed first. The result is therefore a function of the merged graph
  /// alone, independent of contribution order.
  pub fn topo_sort(&self) -> Result<StepList<A>, BuildError> {
    let mut in_degree: Vec<usize> = self.reverse_adjacency().iter().map(Vec::len).collect();

    // Node indices follow name order, so the smallest index is the smallest name.
    let mut ready: BTreeSet<usize> = (0..self.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(self.len());

    while let Some(n) = ready.pop_first() {
      order.push(n);
      for &m in &self.adjacency()[n] {
        in_degree[m] -= 1;
        if in_degree[m] == 0 {
          ready.insert(m);
        }
      }
    }

    if order.len() < self.len() {
      let cycle = self.find_cycle(&in_degree);
      debug!(
        placed = order.len(),
        total = self.len(),
        "topological sort left nodes unplaced"
      );
      return Err(BuildError::CycleDetected { cycle });
    }

    let steps = order.iter().map(|&i| self.nodes()[i].clone()).collect();
    let conditions = order
      .iter()
      .map(|&i| self.condition_at(i).clone())
      .collect();
    Ok(StepList { steps, conditions })
  }

  /// Extract one cycle from the nodes Kahn's algorithm could not place.
  ///
  /// Every unplaced node still has an unplaced predecessor, so walking
  /// predecessors from any of them must revisit a node.
  fn find_cycle(&self, in_degree: &[usize]) -> Vec<Name> {
    let unplaced = |i: usize| in_degree[i] > 0;
    let Some(mut current) = (0..self.len()).find(|&i| unplaced(i)) else {
      return Vec::new();
    };

    let mut path = Vec::new();
    let mut seen: HashMap<usize, usize> = HashMap::new();
    while !seen.contains_key(&current) {
      seen.insert(current, path.len());
      path.push(current);
      match self.reverse_adjacency()[current]
        .iter()
        .copied()
        .find(|&p| unplaced(p))
      {
        Some(prev) => current = prev,
        None => break,
      }
    }

    let start = seen.get(&current).copied().unwrap_or(0);
    let mut cycle: Vec<usize> = path[start..].iter().rev().copied().collect();
    if let Some(min) = cycle.iter().enumerate().min_by_key(|&(_, &i)| i).map(|(pos, _)| pos) {
      cycle.rotate_left(min);
    }
    cycle
      .into_iter()
      .map(|i| self.nodes()[i].name().clone())
      .collect()
  }
}
