//! Constraint violation types.

use std::sync::Arc;

use crate::descriptor::ConstraintDescriptor;
use crate::path::PropertyPath;
use crate::types::BeanType;

/// A failed constraint at one location of the validated graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The constraint that was violated.
    pub descriptor: Arc<ConstraintDescriptor>,
    /// Path from the root to the invalid value.
    pub path: PropertyPath,
    /// Rendered invalid value; `None` for null.
    pub invalid_value: Option<String>,
    /// Type of the validated root. For a list or map root, the type of its
    /// first bean element, or `Value` if it holds no bean.
    pub root_type: BeanType,
    /// Type of the bean holding the invalid value.
    pub leaf_type: BeanType,
}

impl Violation {
    pub fn new(
        descriptor: Arc<ConstraintDescriptor>,
        path: PropertyPath,
        invalid_value: Option<String>,
        root_type: BeanType,
        leaf_type: BeanType,
    ) -> Self {
        Self {
            descriptor,
            path,
            invalid_value,
            root_type,
            leaf_type,
        }
    }

    pub fn constraint_name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn message_template(&self) -> Option<&str> {
        self.descriptor.message_template()
    }
}

/// Collection of violations in evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations {
    violations: Vec<Violation>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Get all violations.
    pub fn all(&self) -> &[Violation] {
        &self.violations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    /// Violations of the named constraint type.
    pub fn by_constraint<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations
            .iter()
            .filter(move |v| v.constraint_name() == name)
    }

    /// Violations whose rendered path equals `path`.
    pub fn at_path<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations
            .iter()
            .filter(move |v| v.path.to_string() == path)
    }

    /// Rendered paths of all violations, in order.
    pub fn paths(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.path.to_string()).collect()
    }

    /// Merge another violations collection.
    pub fn merge(&mut self, other: Violations) {
        self.violations.extend(other.violations);
    }

    /// Keeps only the first `len` violations.
    pub fn truncate(&mut self, len: usize) {
        self.violations.truncate(len);
    }
}

impl Extend<Violation> for Violations {
    fn extend<I: IntoIterator<Item = Violation>>(&mut self, iter: I) {
        self.violations.extend(iter);
    }
}

impl FromIterator<Violation> for Violations {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        Self {
            violations: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}
