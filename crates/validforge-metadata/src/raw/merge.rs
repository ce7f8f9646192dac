//! Merging metadata of one logical element from several sources.

use indexmap::IndexMap;
use tracing::trace;
use validforge_core::ConfigurationError;

use super::ConstrainedElement;
use crate::location::{ElementKind, ElementLocation};

impl ConstrainedElement {
    /// Combines two descriptions of the same logical element.
    ///
    /// Constraints and type-argument constraints are unioned, the source is
    /// raised to the higher-priority one and cascading metadata is merged.
    ///
    /// # Errors
    ///
    /// Fails if the locations differ or the cascading metadata declares
    /// conflicting group conversions.
    pub fn merge(&self, other: &ConstrainedElement) -> Result<ConstrainedElement, ConfigurationError> {
        if self.location != other.location {
            return Err(mismatch(&self.location, &other.location));
        }

        let mut constraints = self.constraints.clone();
        constraints.extend(other.constraints.iter().cloned());

        let mut type_argument_constraints = self.type_argument_constraints.clone();
        type_argument_constraints.extend(other.type_argument_constraints.iter().cloned());

        Ok(ConstrainedElement {
            source: self.source.max(other.source),
            location: self.location.clone(),
            constraints,
            type_argument_constraints,
            cascading: self.cascading.merge(&other.cascading)?,
        })
    }

    /// Moves a standalone type-argument element onto its root element.
    fn into_root(self) -> ConstrainedElement {
        if self.location.kind() != ElementKind::TypeArgument {
            return self;
        }
        let path = self.location.container_path();
        let mut type_argument_constraints = self.constraints;
        type_argument_constraints.extend(self.type_argument_constraints);

        ConstrainedElement {
            source: self.source,
            location: self.location.root().clone(),
            constraints: Default::default(),
            type_argument_constraints,
            cascading: self.cascading.nested_in(&path),
        }
    }
}

fn mismatch(left: &ElementLocation, right: &ElementLocation) -> ConfigurationError {
    let is_parameter = |l: &ElementLocation| l.kind() == ElementKind::Parameter;
    if is_parameter(left) || is_parameter(right) {
        ConfigurationError::ParameterMismatch {
            left: left.to_string(),
            right: right.to_string(),
        }
    } else {
        ConfigurationError::ElementMismatch {
            left: left.to_string(),
            right: right.to_string(),
        }
    }
}

/// Groups elements by location and merges each group.
///
/// Standalone type-argument elements are first folded into their root
/// element. Groups keep the order in which their locations were first seen.
pub fn merge_all<I>(elements: I) -> Result<Vec<ConstrainedElement>, ConfigurationError>
where
    I: IntoIterator<Item = ConstrainedElement>,
{
    let mut merged: IndexMap<ElementLocation, ConstrainedElement> = IndexMap::new();
    for element in elements {
        let element = element.into_root();
        match merged.get_mut(&element.location) {
            Some(existing) => {
                trace!(
                    event = "element_merged",
                    location = %element.location,
                    source = %element.source,
                );
                *existing = existing.merge(&element)?;
            }
            None => {
                merged.insert(element.location.clone(), element);
            }
        }
    }
    Ok(merged.into_values().collect())
}
