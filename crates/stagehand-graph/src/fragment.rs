//! Composition DSL.
//!
//! Fragments are immutable expression trees built from leaves with two
//! combinators: [`seq`] (also `lhs >> rhs`) and [`par`] (also `lhs & rhs`).
//! Every fragment exposes its mentioned nodes, implied edges, and the
//! `initials`/`finals` boundary sets used to splice it into larger fragments.
//!
//! ```ignore
//! let boot = power_on >> (clocks & memory) >> ready;
//! let usb = (reference("ready") >> usb_init).when("usb_enabled", usb_enabled);
//! ```

use std::ops::{BitAnd, Shr};
use std::sync::Arc;

use crate::condition::{Condition, Predicate};
use crate::name::Name;
use crate::node::{Edge, Node};

/// A single position in a fragment.
pub enum Leaf<A> {
  /// Declares the node.
  Defined(Node<A>),
  /// Names a node that some contribution must declare.
  Reference(Name),
}

impl<A> Leaf<A> {
  pub fn name(&self) -> &Name {
    match self {
      Leaf::Defined(node) => node.name(),
      Leaf::Reference(name) => name,
    }
  }
}

enum Expr<A> {
  Leaf(Leaf<A>),
  Seq(Fragment<A>, Fragment<A>),
  Par(Fragment<A>, Fragment<A>),
  When(Condition, Fragment<A>),
}

/// A partial ordering over some nodes.
pub struct Fragment<A> {
  expr: Arc<Expr<A>>,
}

/// A fragment declaring one node; an action when `action` is present.
pub fn leaf<A>(name: impl Into<Name>, action: Option<A>) -> Fragment<A> {
  Node::new(name, action).into()
}

/// A fragment naming a node declared elsewhere.
pub fn reference<A>(name: impl Into<Name>) -> Fragment<A> {
  Fragment::from_expr(Expr::Leaf(Leaf::Reference(name.into())))
}

/// Every final of `lhs` precedes every initial of `rhs`.
pub fn seq<A>(lhs: impl Into<Fragment<A>>, rhs: impl Into<Fragment<A>>) -> Fragment<A> {
  Fragment::from_expr(Expr::Seq(lhs.into(), rhs.into()))
}

/// No ordering between `lhs` and `rhs`.
pub fn par<A>(lhs: impl Into<Fragment<A>>, rhs: impl Into<Fragment<A>>) -> Fragment<A> {
  Fragment::from_expr(Expr::Par(lhs.into(), rhs.into()))
}

impl<A> Fragment<A> {
  fn from_expr(expr: Expr<A>) -> Self {
    Self {
      expr: Arc::new(expr),
    }
  }

  /// Gate this fragment on a named runtime predicate.
  ///
  /// Nodes declared inside run only while the predicate holds; references
  /// are left to their own declaration. Nested gates combine with `and`.
  pub fn when(self, name: impl Into<Name>, predicate: Predicate) -> Fragment<A> {
    self.under(&Condition::new(name, predicate))
  }

  /// Gate this fragment on an existing condition.
  pub fn under(self, condition: &Condition) -> Fragment<A> {
    Fragment::from_expr(Expr::When(condition.clone(), self))
  }

  /// Every leaf occurrence, in order of mention.
  pub fn leaves(&self) -> Vec<&Leaf<A>> {
    let mut out = Vec::new();
    self.collect_leaves(&mut out);
    out
  }

  fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Leaf<A>>) {
    match &*self.expr {
      Expr::Leaf(leaf) => out.push(leaf),
      Expr::Seq(lhs, rhs) | Expr::Par(lhs, rhs) => {
        lhs.collect_leaves(out);
        rhs.collect_leaves(out);
      }
      Expr::When(_, inner) => inner.collect_leaves(out),
    }
  }

  /// Leaves and edges paired with the condition in force where they occur.
  pub(crate) fn gated(&self) -> (Vec<(&Leaf<A>, Condition)>, Vec<(Edge, Condition)>) {
    let mut leaves = Vec::new();
    let mut edges = Vec::new();
    self.collect_gated(&Condition::always(), &mut leaves, &mut edges);
    (leaves, edges)
  }

  fn collect_gated<'a>(
    &'a self,
    condition: &Condition,
    leaves: &mut Vec<(&'a Leaf<A>, Condition)>,
    edges: &mut Vec<(Edge, Condition)>,
  ) {
    match &*self.expr {
      Expr::Leaf(leaf) => leaves.push((leaf, condition.clone())),
      Expr::Par(lhs, rhs) => {
        lhs.collect_gated(condition, leaves, edges);
        rhs.collect_gated(condition, leaves, edges);
      }
      Expr::Seq(lhs, rhs) => {
        lhs.collect_gated(condition, leaves, edges);
        rhs.collect_gated(condition, leaves, edges);
        let initials = rhs.initials();
        for source in lhs.finals() {
          for dest in &initials {
            push_unique(
              edges,
              (Edge::new(source.clone(), dest.clone()), condition.clone()),
            );
          }
        }
      }
      Expr::When(inner_condition, inner) => {
        inner.collect_gated(&condition.and(inner_condition), leaves, edges);
      }
    }
  }

  /// Distinct node names, in order of first mention.
  pub fn names(&self) -> Vec<Name> {
    let mut out = Vec::new();
    for leaf in self.leaves() {
      push_unique(&mut out, leaf.name().clone());
    }
    out
  }

  /// Nodes with no predecessor inside this fragment.
  pub fn initials(&self) -> Vec<Name> {
    match &*self.expr {
      Expr::Leaf(leaf) => vec![leaf.name().clone()],
      Expr::Seq(lhs, _) => lhs.initials(),
      Expr::Par(lhs, rhs) => union(lhs.initials(), rhs.initials()),
      Expr::When(_, inner) => inner.initials(),
    }
  }

  /// Nodes with no successor inside this fragment.
  pub fn finals(&self) -> Vec<Name> {
    match &*self.expr {
      Expr::Leaf(leaf) => vec![leaf.name().clone()],
      Expr::Seq(_, rhs) => rhs.finals(),
      Expr::Par(lhs, rhs) => union(lhs.finals(), rhs.finals()),
      Expr::When(_, inner) => inner.finals(),
    }
  }

  /// Distinct edges implied by this fragment, in order of first mention.
  pub fn edges(&self) -> Vec<Edge> {
    match &*self.expr {
      Expr::Leaf(_) => Vec::new(),
      Expr::Par(lhs, rhs) => union(lhs.edges(), rhs.edges()),
      Expr::When(_, inner) => inner.edges(),
      Expr::Seq(lhs, rhs) => {
        let mut out = union(lhs.edges(), rhs.edges());
        let initials = rhs.initials();
        for source in lhs.finals() {
          for dest in &initials {
            push_unique(&mut out, Edge::new(source.clone(), dest.clone()));
          }
        }
        out
      }
    }
  }
}

fn push_unique<T: PartialEq>(out: &mut Vec<T>, item: T) {
  if !out.contains(&item) {
    out.push(item);
  }
}

fn union<T: PartialEq>(mut lhs: Vec<T>, rhs: Vec<T>) -> Vec<T> {
  for item in rhs {
    push_unique(&mut lhs, item);
  }
  lhs
}

impl<A> Clone for Fragment<A> {
  fn clone(&self) -> Self {
    Self {
      expr: Arc::clone(&self.expr),
    }
  }
}

impl<A> From<Node<A>> for Fragment<A> {
  fn from(node: Node<A>) -> Self {
    Fragment::from_expr(Expr::Leaf(Leaf::Defined(node)))
  }
}

impl<A> From<&Node<A>> for Fragment<A> {
  fn from(node: &Node<A>) -> Self {
    node.clone().into()
  }
}

impl<A> From<&Fragment<A>> for Fragment<A> {
  fn from(fragment: &Fragment<A>) -> Self {
    fragment.clone()
  }
}

impl<A> std::fmt::Debug for Fragment<A> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match &*self.expr {
      Expr::Leaf(Leaf::Defined(node)) => write!(f, "{}", node.name()),
      Expr::Leaf(Leaf::Reference(name)) => write!(f, "&{}", name),
      Expr::Seq(lhs, rhs) => write!(f, "({:?} >> {:?})", lhs, rhs),
      Expr::Par(lhs, rhs) => write!(f, "({:?} & {:?})", lhs, rhs),
      Expr::When(condition, inner) => write!(f, "({:?} when {})", inner, condition),
    }
  }
}

impl<A, R: Into<Fragment<A>>> Shr<R> for Fragment<A> {
  type Output = Fragment<A>;

  fn shr(self, rhs: R) -> Fragment<A> {
    seq(self, rhs)
  }
}

impl<A, R: Into<Fragment<A>>> Shr<R> for Node<A> {
  type Output = Fragment<A>;

  fn shr(self, rhs: R) -> Fragment<A> {
    seq(self, rhs)
  }
}

impl<A, R: Into<Fragment<A>>> BitAnd<R> for Fragment<A> {
  type Output = Fragment<A>;

  fn bitand(self, rhs: R) -> Fragment<A> {
    par(self, rhs)
  }
}

impl<A, R: Into<Fragment<A>>> BitAnd<R> for Node<A> {
  type Output = Fragment<A>;

  fn bitand(self, rhs: R) -> Fragment<A> {
    par(self, rhs)
  }
}

impl<A, R: Into<Fragment<A>>> Shr<R> for &Node<A> {
  type Output = Fragment<A>;

  fn shr(self, rhs: R) -> Fragment<A> {
    seq(self, rhs)
  }
}

impl<A, R: Into<Fragment<A>>> Shr<R> for &Fragment<A> {
  type Output = Fragment<A>;

  fn shr(self, rhs: R) -> Fragment<A> {
    seq(self, rhs)
  }
}

impl<A, R: Into<Fragment<A>>> BitAnd<R> for &Node<A> {
  type Output = Fragment<A>;

  fn bitand(self, rhs: R) -> Fragment<A> {
    par(self, rhs)
  }
}

impl<A, R: Into<Fragment<A>>> BitAnd<R> for &Fragment<A> {
  type Output = Fragment<A>;

  fn bitand(self, rhs: R) -> Fragment<A> {
    par(self, rhs)
  }
}
