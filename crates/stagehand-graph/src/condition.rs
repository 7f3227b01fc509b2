//! Runtime conditions that gate contributions.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::name::Name;

/// Checked each time a gated step is reached.
pub type Predicate = fn() -> bool;

/// A conjunction of named predicates.
///
/// Terms are identified by name: two conditions are equal when they name the
/// same predicates. The empty conjunction is [`Condition::always`].
#[derive(Clone, Default)]
pub struct Condition {
  terms: BTreeMap<Name, Predicate>,
}

impl Condition {
  pub fn always() -> Self {
    Self::default()
  }

  pub fn new(name: impl Into<Name>, predicate: Predicate) -> Self {
    Self {
      terms: BTreeMap::from([(name.into(), predicate)]),
    }
  }

  /// Both `self` and `other` must hold. A name already present keeps its
  /// first predicate.
  pub fn and(&self, other: &Condition) -> Condition {
    let mut terms = self.terms.clone();
    for (name, predicate) in &other.terms {
      terms.entry(name.clone()).or_insert(*predicate);
    }
    Condition { terms }
  }

  pub fn is_always(&self) -> bool {
    self.terms.is_empty()
  }

  /// Evaluate every predicate.
  pub fn is_met(&self) -> bool {
    self.terms.values().all(|predicate| predicate())
  }

  /// Whether `self` is at least as strict as `other`, i.e. names every term
  /// `other` names.
  pub fn implies(&self, other: &Condition) -> bool {
    other.terms.keys().all(|name| self.terms.contains_key(name))
  }

  pub fn names(&self) -> impl Iterator<Item = &Name> {
    self.terms.keys()
  }
}

impl PartialEq for Condition {
  fn eq(&self, other: &Self) -> bool {
    self.terms.keys().eq(other.terms.keys())
  }
}

impl Eq for Condition {}

impl PartialOrd for Condition {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Condition {
  fn cmp(&self, other: &Self) -> Ordering {
    self.terms.keys().cmp(other.terms.keys())
  }
}

impl fmt::Display for Condition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.terms.is_empty() {
      return f.write_str("always");
    }
    let names: Vec<&str> = self.terms.keys().map(Name::as_str).collect();
    f.write_str(&names.join(" and "))
  }
}

impl fmt::Debug for Condition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Condition({})", self)
  }
}
