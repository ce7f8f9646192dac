//! Constraints bound to the element they constrain.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexSet;
use validforge_core::{ConfigurationError, ConstraintDescriptor, GroupId};

use crate::location::ElementLocation;
use crate::tree::ConstraintTree;

/// One constraint declaration bound to its location.
///
/// Equality and hashing use the descriptor's declared parameters and the
/// location; the evaluable tree is derived from the descriptor.
#[derive(Clone)]
pub struct MetaConstraint {
    descriptor: Arc<ConstraintDescriptor>,
    location: ElementLocation,
    tree: Arc<ConstraintTree>,
}

impl MetaConstraint {
    /// Binds `descriptor` to `location`, building its constraint tree.
    ///
    /// # Errors
    ///
    /// Fails if the descriptor, or one of its composing descriptors, has
    /// neither a validator nor composing constraints.
    pub fn new(
        descriptor: impl Into<Arc<ConstraintDescriptor>>,
        location: ElementLocation,
    ) -> Result<Self, ConfigurationError> {
        let descriptor = descriptor.into();
        let tree = ConstraintTree::build(&descriptor)?;
        Ok(Self {
            descriptor,
            location,
            tree: Arc::new(tree),
        })
    }

    pub fn descriptor(&self) -> &Arc<ConstraintDescriptor> {
        &self.descriptor
    }

    pub fn location(&self) -> &ElementLocation {
        &self.location
    }

    pub fn tree(&self) -> &ConstraintTree {
        &self.tree
    }

    /// Returns true if the constraint is active in `group`.
    pub fn applies_to(&self, group: &GroupId) -> bool {
        self.descriptor.applies_to(group)
    }
}

impl PartialEq for MetaConstraint {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location && self.descriptor == other.descriptor
    }
}

impl Eq for MetaConstraint {}

impl Hash for MetaConstraint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.descriptor.hash(state);
        self.location.hash(state);
    }
}

impl fmt::Debug for MetaConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetaConstraint")
            .field("constraint", &self.descriptor.name())
            .field("location", &self.location.to_string())
            .finish()
    }
}

impl fmt::Display for MetaConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.descriptor, self.location)
    }
}

/// Insertion-ordered, content-unique set of constraints.
pub type ConstraintSet = IndexSet<MetaConstraint>;

#[cfg(test)]
mod tests {
    use super::*;
    use validforge_core::{predicate, BeanType, Value};

    struct Person;

    fn not_null() -> ConstraintDescriptor {
        ConstraintDescriptor::new("NotNull").with_validator(predicate(|v: &Value<'_>| !v.is_null()))
    }

    #[test]
    fn test_identity_by_descriptor_and_location() {
        let name = ElementLocation::field(BeanType::of::<Person>(), "name");
        let email = ElementLocation::field(BeanType::of::<Person>(), "email");

        let a = MetaConstraint::new(not_null(), name.clone()).unwrap();
        let b = MetaConstraint::new(not_null(), name).unwrap();
        let c = MetaConstraint::new(not_null(), email).unwrap();

        let mut set = ConstraintSet::new();
        assert!(set.insert(a));
        assert!(!set.insert(b));
        assert!(set.insert(c));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_missing_validator_is_rejected() {
        let location = ElementLocation::Type(BeanType::of::<Person>());
        let err = MetaConstraint::new(ConstraintDescriptor::new("Bare"), location).unwrap_err();
        assert_eq!(err, ConfigurationError::MissingValidator("Bare".to_string()));
    }
}
