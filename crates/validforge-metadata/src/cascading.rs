//! Cascading metadata.
//!
//! Describes whether the value of an element, or the elements of its
//! container, are validated recursively, and which group conversions apply
//! on the way down.

use std::collections::BTreeMap;

use validforge_core::{ConfigurationError, GroupId};

use crate::location::ContainerElement;

/// Mutable cascading description collected while reading declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadingMetaDataBuilder {
    cascading: bool,
    group_conversions: BTreeMap<GroupId, GroupId>,
    container_elements: BTreeMap<ContainerElement, CascadingMetaDataBuilder>,
}

impl CascadingMetaDataBuilder {
    pub fn non_cascading() -> Self {
        Self::default()
    }

    /// Marks the element's own value as cascading.
    pub fn cascading() -> Self {
        Self {
            cascading: true,
            ..Self::default()
        }
    }

    pub(crate) fn mark_cascading(mut self) -> Self {
        self.cascading = true;
        self
    }

    /// Converts `from` into `to` when cascading.
    pub fn with_group_conversion(mut self, from: impl Into<GroupId>, to: impl Into<GroupId>) -> Self {
        self.group_conversions.insert(from.into(), to.into());
        self
    }

    /// Sets the cascading description of one container element.
    pub fn with_container_element(mut self, element: ContainerElement, builder: CascadingMetaDataBuilder) -> Self {
        self.container_elements.insert(element, builder);
        self
    }

    /// Wraps this builder into the container elements along `path`.
    pub(crate) fn nested_in(self, path: &[ContainerElement]) -> Self {
        path.iter().rev().fold(self, |inner, element| {
            CascadingMetaDataBuilder::non_cascading().with_container_element(*element, inner)
        })
    }

    pub fn is_cascading(&self) -> bool {
        self.cascading
    }

    pub fn group_conversions(&self) -> &BTreeMap<GroupId, GroupId> {
        &self.group_conversions
    }

    pub fn container_element(&self, element: ContainerElement) -> Option<&CascadingMetaDataBuilder> {
        self.container_elements.get(&element)
    }

    /// Returns true if the value or any nested container element cascades.
    pub fn has_cascades(&self) -> bool {
        self.cascading || self.container_elements.values().any(Self::has_cascades)
    }

    /// Combines two descriptions of the same element.
    ///
    /// The result cascades if either side does. Group conversions are
    /// unioned; the same source group mapped to two different targets is a
    /// configuration error.
    pub fn merge(&self, other: &Self) -> Result<Self, ConfigurationError> {
        let mut group_conversions = self.group_conversions.clone();
        for (from, to) in &other.group_conversions {
            match group_conversions.get(from) {
                Some(existing) if existing != to => {
                    return Err(ConfigurationError::ConflictingGroupConversion {
                        from: from.clone(),
                        first: existing.clone(),
                        second: to.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    group_conversions.insert(from.clone(), to.clone());
                }
            }
        }

        let mut container_elements = self.container_elements.clone();
        for (element, builder) in &other.container_elements {
            let merged = match container_elements.get(element) {
                Some(existing) => existing.merge(builder)?,
                None => builder.clone(),
            };
            container_elements.insert(*element, merged);
        }

        Ok(Self {
            cascading: self.cascading || other.cascading,
            group_conversions,
            container_elements,
        })
    }

    pub fn build(&self) -> CascadingMetaData {
        CascadingMetaData {
            cascading: self.cascading,
            group_conversions: self.group_conversions.clone(),
            container_elements: self
                .container_elements
                .iter()
                .map(|(element, builder)| (*element, builder.build()))
                .collect(),
        }
    }
}

/// Immutable cascading metadata used during validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadingMetaData {
    cascading: bool,
    group_conversions: BTreeMap<GroupId, GroupId>,
    container_elements: BTreeMap<ContainerElement, CascadingMetaData>,
}

impl CascadingMetaData {
    /// Whether the element's own value is validated recursively.
    pub fn is_cascading(&self) -> bool {
        self.cascading
    }

    /// Whether anything below this element is validated recursively.
    pub fn is_active(&self) -> bool {
        self.cascading || self.container_elements.values().any(Self::is_active)
    }

    /// Applies the group conversion for `group`, if any.
    pub fn convert_group(&self, group: &GroupId) -> GroupId {
        self.group_conversions
            .get(group)
            .cloned()
            .unwrap_or_else(|| group.clone())
    }

    pub fn container_element(&self, element: ContainerElement) -> Option<&CascadingMetaData> {
        self.container_elements.get(&element)
    }
}
