//! Stagehand Graph
//!
//! Build-phase machinery shared by the stagehand renderers:
//! - [`Node`] and [`Edge`]: named actions/milestones and precedence constraints
//! - [`Fragment`]: the composition DSL (`seq`/`>>`, `par`/`&`, `when`)
//! - [`Condition`]: named runtime predicates gating parts of a schedule
//! - [`GraphBuilder`]: order-independent union of many contributions
//! - [`Graph::topo_sort`]: deterministic linearization into a [`StepList`]
//! - [`emit`]: the step events renderers log for named schedules
//!
//! Apart from [`emit`], nothing in this crate runs at schedule execution time. The renderers turn
//! a [`StepList`] into a flat, fixed-size step array once, and the graph is
//! discarded.

mod builder;
mod condition;
mod error;
mod event;
mod fragment;
mod graph;
mod load;
mod name;
mod node;
mod sort;
mod viz;

pub use builder::GraphBuilder;
pub use condition::{Condition, Predicate};
pub use error::BuildError;
pub use event::emit;
pub use fragment::{Fragment, Leaf, leaf, par, reference, seq};
pub use graph::Graph;
pub use load::builder_from_def;
pub use name::Name;
pub use node::{Edge, Node, NodeKind};
pub use sort::StepList;
pub use viz::{Graphviz, Mermaid, Visualizer};
