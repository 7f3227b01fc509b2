//! Builds name-only graphs from a [`ScheduleDef`].

use std::collections::HashMap;

use stagehand_config::{ComponentDef, ExprDef, ScheduleDef};

use crate::builder::GraphBuilder;
use crate::fragment::{Fragment, par, reference, seq};
use crate::node::Node;

/// Add every component of `def` to a fresh builder.
///
/// Declared nodes carry no callable; they exist for ordering and
/// visualization only.
pub fn builder_from_def(def: &ScheduleDef) -> GraphBuilder<()> {
  def
    .components
    .iter()
    .fold(GraphBuilder::new(), add_component)
}

fn add_component(mut builder: GraphBuilder<()>, component: &ComponentDef) -> GraphBuilder<()> {
  let mut declared: HashMap<&str, Node<()>> = HashMap::new();

  let actions = component
    .actions
    .iter()
    .map(|name| (name, Node::action(name.as_str(), ())));
  let milestones = component
    .milestones
    .iter()
    .map(|name| (name, Node::milestone(name.as_str())));

  for (name, node) in actions.chain(milestones) {
    builder = builder.add(&node);
    declared.entry(name.as_str()).or_insert(node);
  }

  for expr in &component.flows {
    if let Some(fragment) = to_fragment(expr, &declared) {
      builder = builder.add(fragment);
    }
  }
  builder
}

fn to_fragment(expr: &ExprDef, declared: &HashMap<&str, Node<()>>) -> Option<Fragment<()>> {
  match expr {
    ExprDef::Node(name) => Some(match declared.get(name.as_str()) {
      Some(node) => node.into(),
      None => reference(name.as_str()),
    }),
    ExprDef::Seq { seq: operands } => operands
      .iter()
      .filter_map(|e| to_fragment(e, declared))
      .reduce(seq),
    ExprDef::Par { par: operands } => operands
      .iter()
      .filter_map(|e| to_fragment(e, declared))
      .reduce(par),
  }
}
