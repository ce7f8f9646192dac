//! Unmerged per-element metadata as delivered by configuration sources.

mod merge;

use std::sync::Arc;

use validforge_core::{
    BeanType, ConfigurationError, ConfigurationSource, ConstraintDescriptor, Executable,
};

use crate::cascading::CascadingMetaDataBuilder;
use crate::constraint::{ConstraintSet, MetaConstraint};
use crate::location::{ContainerElement, ElementKind, ElementLocation};

pub use merge::merge_all;

/// Metadata of one declared element from one configuration source.
///
/// # Example
///
/// ```
/// use validforge_core::{predicate, BeanType, ConfigurationSource, ConstraintDescriptor, Value};
/// use validforge_metadata::{CascadingMetaDataBuilder, ConstrainedElement, ContainerElement};
///
/// struct Building;
///
/// let not_null = ConstraintDescriptor::new("NotNull")
///     .with_validator(predicate(|v: &Value<'_>| !v.is_null()));
///
/// let apartments = ConstrainedElement::field(
///     ConfigurationSource::Annotation,
///     BeanType::of::<Building>(),
///     "apartments",
/// )
/// .constrain_element(ContainerElement::Element, not_null)
/// .unwrap()
/// .with_cascading(CascadingMetaDataBuilder::cascading());
///
/// assert!(apartments.constraints().is_empty());
/// assert_eq!(apartments.type_argument_constraints().len(), 1);
/// assert!(apartments.cascading().is_cascading());
/// ```
#[derive(Debug, Clone)]
pub struct ConstrainedElement {
    source: ConfigurationSource,
    location: ElementLocation,
    constraints: ConstraintSet,
    type_argument_constraints: ConstraintSet,
    cascading: CascadingMetaDataBuilder,
}

impl ConstrainedElement {
    pub fn new(source: ConfigurationSource, location: ElementLocation) -> Self {
        Self {
            source,
            location,
            constraints: ConstraintSet::new(),
            type_argument_constraints: ConstraintSet::new(),
            cascading: CascadingMetaDataBuilder::non_cascading(),
        }
    }

    /// Class-level element of `bean`.
    pub fn bean_type(source: ConfigurationSource, bean: BeanType) -> Self {
        Self::new(source, ElementLocation::Type(bean))
    }

    pub fn field(source: ConfigurationSource, bean: BeanType, name: &'static str) -> Self {
        Self::new(source, ElementLocation::field(bean, name))
    }

    /// Constructor or method element carrying cross-parameter constraints.
    pub fn executable(source: ConfigurationSource, executable: Executable) -> Self {
        Self::new(source, ElementLocation::Executable(executable))
    }

    pub fn parameter(source: ConfigurationSource, executable: Executable, index: usize) -> Self {
        Self::new(source, ElementLocation::parameter(executable, index))
    }

    pub fn return_value(source: ConfigurationSource, executable: Executable) -> Self {
        Self::new(source, ElementLocation::ReturnValue(executable))
    }

    /// Standalone element for a type argument of `parent`.
    pub fn type_argument(source: ConfigurationSource, parent: ElementLocation, element: ContainerElement) -> Self {
        Self::new(source, parent.type_argument(element))
    }

    /// Adds a constraint on the element's own value.
    pub fn constrain(
        mut self,
        descriptor: impl Into<Arc<ConstraintDescriptor>>,
    ) -> Result<Self, ConfigurationError> {
        let constraint = MetaConstraint::new(descriptor, self.location.clone())?;
        self.constraints.insert(constraint);
        Ok(self)
    }

    /// Adds a constraint on one type argument of the element's container value.
    pub fn constrain_element(
        self,
        element: ContainerElement,
        descriptor: impl Into<Arc<ConstraintDescriptor>>,
    ) -> Result<Self, ConfigurationError> {
        self.constrain_nested(&[element], descriptor)
    }

    /// Adds a constraint on a nested type argument, outermost element first.
    pub fn constrain_nested(
        mut self,
        path: &[ContainerElement],
        descriptor: impl Into<Arc<ConstraintDescriptor>>,
    ) -> Result<Self, ConfigurationError> {
        let location = path
            .iter()
            .fold(self.location.clone(), |location, element| location.type_argument(*element));
        let constraint = MetaConstraint::new(descriptor, location)?;
        self.type_argument_constraints.insert(constraint);
        Ok(self)
    }

    /// Marks the element's own value as cascading.
    pub fn cascade(mut self) -> Self {
        self.cascading = self.cascading.mark_cascading();
        self
    }

    pub fn with_cascading(mut self, cascading: CascadingMetaDataBuilder) -> Self {
        self.cascading = cascading;
        self
    }

    pub fn source(&self) -> ConfigurationSource {
        self.source
    }

    pub fn location(&self) -> &ElementLocation {
        &self.location
    }

    pub fn kind(&self) -> ElementKind {
        self.location.kind()
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    pub fn type_argument_constraints(&self) -> &ConstraintSet {
        &self.type_argument_constraints
    }

    pub fn cascading(&self) -> &CascadingMetaDataBuilder {
        &self.cascading
    }

    /// Returns true if the element carries constraints or cascades.
    pub fn is_constrained(&self) -> bool {
        !self.constraints.is_empty()
            || !self.type_argument_constraints.is_empty()
            || self.cascading.has_cascades()
    }
}

#[cfg(test)]
mod tests;
