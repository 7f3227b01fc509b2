use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Stable, human-readable identity of a node.
///
/// Two nodes with equal names are the same logical node no matter which
/// contribution declared them.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(Arc<str>);

impl Name {
  /// Wrap a string as a node name.
  pub fn new(name: impl Into<Arc<str>>) -> Self {
    Self(name.into())
  }

  /// The name as written.
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl Borrow<str> for Name {
  fn borrow(&self) -> &str {
    &self.0
  }
}

impl AsRef<str> for Name {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

impl From<&str> for Name {
  fn from(name: &str) -> Self {
    Self::new(name)
  }
}

impl From<String> for Name {
  fn from(name: String) -> Self {
    Self::new(name)
  }
}

impl From<&Name> for Name {
  fn from(name: &Name) -> Self {
    name.clone()
  }
}

impl fmt::Display for Name {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl fmt::Debug for Name {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Debug::fmt(&*self.0, f)
  }
}
