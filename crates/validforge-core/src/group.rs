//! Validation groups and group sequences.

use std::borrow::Cow;
use std::fmt;

/// Name of a validation group.
///
/// Constraints declare the groups that activate them; a constraint without
/// explicit groups belongs to the [`Default`](GroupId::DEFAULT) group.
///
/// # Example
///
/// ```
/// use validforge_core::GroupId;
///
/// let group = GroupId::new("Billing");
/// assert_eq!(group.name(), "Billing");
/// assert!(!group.is_default());
/// assert!(GroupId::default().is_default());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(Cow<'static, str>);

impl GroupId {
    /// Name of the implicit default group.
    pub const DEFAULT: &'static str = "Default";

    /// Creates a group identifier.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Returns the implicit default group.
    pub const fn default_group() -> Self {
        Self(Cow::Borrowed(Self::DEFAULT))
    }

    /// Returns the group name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Returns true for the implicit default group.
    pub fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::default_group()
    }
}

impl fmt::Debug for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupId({})", self.0)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for GroupId {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl From<String> for GroupId {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// An ordered list of groups evaluated with fail-fast short-circuiting.
///
/// Requesting the sequence's name validates its groups one after another;
/// once a group produces violations the remaining groups are skipped.
/// Sequence members may name other sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSequence {
    /// Name under which the sequence is requested.
    pub name: GroupId,
    /// Member groups in evaluation order.
    pub groups: Vec<GroupId>,
}

impl GroupSequence {
    /// Creates a new group sequence.
    pub fn new<I, G>(name: impl Into<GroupId>, groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: Into<GroupId>,
    {
        Self {
            name: name.into(),
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }
}
