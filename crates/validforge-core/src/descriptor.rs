//! Constraint descriptors.
//!
//! A descriptor carries the declared parameters of one constraint: its
//! name, attributes, groups, message template and composing constraints,
//! plus the validator capability that evaluates it. Descriptor identity is
//! value identity of the declared parameters; the capability object takes
//! no part in equality or hashing.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::group::GroupId;
use crate::validator::ConstraintValidator;

/// A declared constraint attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<AttributeValue>),
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<i32> for AttributeValue {
    fn from(v: i32) -> Self {
        AttributeValue::Int(i64::from(v))
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Str(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::Str(v)
    }
}

/// Declared parameters of one constraint.
///
/// # Example
///
/// ```
/// use validforge_core::{predicate, AttributeValue, ConstraintDescriptor, GroupId, Value};
///
/// let size = ConstraintDescriptor::new("Size")
///     .with_attribute("min", 2)
///     .with_attribute("max", 10)
///     .with_group("Registration")
///     .with_validator(predicate(|_v: &Value<'_>| true));
///
/// assert_eq!(size.attribute("min"), Some(&AttributeValue::Int(2)));
/// assert!(size.applies_to(&GroupId::new("Registration")));
/// assert!(!size.applies_to(&GroupId::default()));
/// ```
#[derive(Clone)]
pub struct ConstraintDescriptor {
    name: String,
    attributes: BTreeMap<String, AttributeValue>,
    groups: BTreeSet<GroupId>,
    message_template: Option<String>,
    report_as_single: bool,
    composing: Vec<Arc<ConstraintDescriptor>>,
    validator: Option<Arc<dyn ConstraintValidator>>,
}

impl ConstraintDescriptor {
    /// Creates a descriptor for the named constraint type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            groups: BTreeSet::new(),
            message_template: None,
            report_as_single: false,
            composing: Vec::new(),
            validator: None,
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Adds a group; without groups the constraint belongs to `Default`.
    pub fn with_group(mut self, group: impl Into<GroupId>) -> Self {
        self.groups.insert(group.into());
        self
    }

    pub fn with_message_template(mut self, template: impl Into<String>) -> Self {
        self.message_template = Some(template.into());
        self
    }

    /// Collapses all composing violations into one for this constraint.
    pub fn report_as_single(mut self) -> Self {
        self.report_as_single = true;
        self
    }

    /// Adds a composing constraint, AND-combined with the others.
    pub fn with_composing(mut self, descriptor: impl Into<Arc<ConstraintDescriptor>>) -> Self {
        self.composing.push(descriptor.into());
        self
    }

    pub fn with_validator(mut self, validator: impl ConstraintValidator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub fn with_shared_validator(mut self, validator: Arc<dyn ConstraintValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Constraint type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn attributes(&self) -> &BTreeMap<String, AttributeValue> {
        &self.attributes
    }

    /// Declared groups; empty means `Default` only.
    pub fn declared_groups(&self) -> &BTreeSet<GroupId> {
        &self.groups
    }

    /// Effective groups, with the implicit `Default` filled in.
    pub fn groups(&self) -> Vec<GroupId> {
        if self.groups.is_empty() {
            vec![GroupId::default_group()]
        } else {
            self.groups.iter().cloned().collect()
        }
    }

    /// Returns true if the constraint is active in `group`.
    pub fn applies_to(&self, group: &GroupId) -> bool {
        if self.groups.is_empty() {
            group.is_default()
        } else {
            self.groups.contains(group)
        }
    }

    pub fn message_template(&self) -> Option<&str> {
        self.message_template.as_deref()
    }

    pub fn is_report_as_single(&self) -> bool {
        self.report_as_single
    }

    pub fn composing(&self) -> &[Arc<ConstraintDescriptor>] {
        &self.composing
    }

    pub fn is_composed(&self) -> bool {
        !self.composing.is_empty()
    }

    pub fn validator(&self) -> Option<&Arc<dyn ConstraintValidator>> {
        self.validator.as_ref()
    }
}

impl PartialEq for ConstraintDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.attributes == other.attributes
            && self.groups == other.groups
            && self.message_template == other.message_template
            && self.report_as_single == other.report_as_single
            && self.composing == other.composing
    }
}

impl Eq for ConstraintDescriptor {}

impl Hash for ConstraintDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.attributes.hash(state);
        self.groups.hash(state);
        self.message_template.hash(state);
        self.report_as_single.hash(state);
        self.composing.hash(state);
    }
}

impl fmt::Debug for ConstraintDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("ConstraintDescriptor");
        s.field("name", &self.name);
        if !self.attributes.is_empty() {
            s.field("attributes", &self.attributes);
        }
        s.field("groups", &self.groups);
        if self.report_as_single {
            s.field("report_as_single", &true);
        }
        if !self.composing.is_empty() {
            s.field("composing", &self.composing);
        }
        s.field("has_validator", &self.validator.is_some());
        s.finish()
    }
}

impl fmt::Display for ConstraintDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
