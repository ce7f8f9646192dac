//! Property paths from the validated root to a violating value.

use std::borrow::Cow;
use std::fmt;

use smallvec::SmallVec;

/// One step of a [`PropertyPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathNode {
    /// Bean property.
    Property(Cow<'static, str>),
    /// Constructor or method being validated.
    Executable(Cow<'static, str>),
    /// Executable parameter.
    Parameter(Cow<'static, str>),
    /// Executable return value.
    ReturnValue,
    /// All parameters of an executable taken together.
    CrossParameter,
    /// Element of a list.
    Index(usize),
    /// Entry of a map, rendered by key.
    Key(String),
    /// The key itself of a map entry.
    MapKey,
}

/// Path from the root object to a value, e.g. `address.street`,
/// `items[2].name` or `rent.arg0`.
///
/// # Example
///
/// ```
/// use validforge_core::{PathNode, PropertyPath};
///
/// let path = PropertyPath::root()
///     .append(PathNode::Property("owners".into()))
///     .append(PathNode::Index(1))
///     .append(PathNode::Property("name".into()));
/// assert_eq!(path.to_string(), "owners[1].name");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    nodes: SmallVec<[PathNode; 4]>,
}

impl PropertyPath {
    /// The empty path denoting the root object.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a copy of this path extended by one node.
    pub fn append(&self, node: PathNode) -> Self {
        let mut nodes = self.nodes.clone();
        nodes.push(node);
        Self { nodes }
    }

    pub fn property(&self, name: impl Into<Cow<'static, str>>) -> Self {
        self.append(PathNode::Property(name.into()))
    }

    pub fn index(&self, index: usize) -> Self {
        self.append(PathNode::Index(index))
    }

    pub fn key(&self, key: impl Into<String>) -> Self {
        self.append(PathNode::Key(key.into()))
    }

    pub fn is_root(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    pub fn leaf(&self) -> Option<&PathNode> {
        self.nodes.last()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                PathNode::Index(index) => write!(f, "[{}]", index)?,
                PathNode::Key(key) => write!(f, "[{}]", key)?,
                other => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    match other {
                        PathNode::Property(name)
                        | PathNode::Executable(name)
                        | PathNode::Parameter(name) => f.write_str(name)?,
                        PathNode::ReturnValue => f.write_str("<return value>")?,
                        PathNode::CrossParameter => f.write_str("<cross-parameter>")?,
                        PathNode::MapKey => f.write_str("<map key>")?,
                        PathNode::Index(_) | PathNode::Key(_) => unreachable!(),
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_renders_empty() {
        assert_eq!(PropertyPath::root().to_string(), "");
        assert!(PropertyPath::root().is_root());
    }

    #[test]
    fn test_nested_property() {
        let path = PropertyPath::root().property("address").property("street");
        assert_eq!(path.to_string(), "address.street");
        assert_eq!(path.leaf(), Some(&PathNode::Property("street".into())));
    }

    #[test]
    fn test_map_entries() {
        let base = PropertyPath::root().property("scores").key("alice");
        assert_eq!(base.to_string(), "scores[alice]");
        assert_eq!(base.append(PathNode::MapKey).to_string(), "scores[alice].<map key>");
    }

    #[test]
    fn test_executable_nodes() {
        let exec = PropertyPath::root().append(PathNode::Executable("rent".into()));
        assert_eq!(exec.append(PathNode::Parameter("arg0".into())).to_string(), "rent.arg0");
        assert_eq!(exec.append(PathNode::ReturnValue).to_string(), "rent.<return value>");
        assert_eq!(
            exec.append(PathNode::CrossParameter).to_string(),
            "rent.<cross-parameter>"
        );
    }

    #[test]
    fn test_append_leaves_original_untouched() {
        let base = PropertyPath::root().property("items");
        let _child = base.index(0);
        assert_eq!(base.len(), 1);
    }
}
