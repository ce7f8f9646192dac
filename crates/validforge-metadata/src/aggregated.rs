//! Merged metadata per bean type and per executable.
//!
//! Built once from the merged [`ConstrainedElement`]s of a type and
//! immutable afterwards.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use validforge_core::{BeanType, ConfigurationError, Executable, GroupId, Value};

use crate::bean::{BeanDescriptor, PropertyAccessor};
use crate::cascading::CascadingMetaData;
use crate::constraint::MetaConstraint;
use crate::location::ElementLocation;
use crate::raw::ConstrainedElement;

/// Constraints and cascading metadata of one value-holding element.
#[derive(Debug, Clone, Default)]
pub struct ElementMetaData {
    constraints: Vec<MetaConstraint>,
    container_constraints: Vec<MetaConstraint>,
    cascading: CascadingMetaData,
}

impl ElementMetaData {
    fn from_element(element: &ConstrainedElement) -> Self {
        Self {
            constraints: element.constraints().iter().cloned().collect(),
            container_constraints: element.type_argument_constraints().iter().cloned().collect(),
            cascading: element.cascading().build(),
        }
    }

    /// Constraints on the value itself.
    pub fn constraints(&self) -> &[MetaConstraint] {
        &self.constraints
    }

    /// Constraints on the elements of a container value.
    pub fn container_constraints(&self) -> &[MetaConstraint] {
        &self.container_constraints
    }

    pub fn cascading(&self) -> &CascadingMetaData {
        &self.cascading
    }

    /// Returns true if nothing is checked for this element.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty() && self.container_constraints.is_empty() && !self.cascading.is_active()
    }
}

/// A constrained or cascading property.
#[derive(Clone)]
pub struct PropertyMetaData {
    name: &'static str,
    accessor: Arc<dyn PropertyAccessor>,
    element: ElementMetaData,
}

impl PropertyMetaData {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Reads the property from `bean`; a bean of the wrong type reads as null.
    pub fn value<'a>(&self, bean: &'a dyn Any) -> Value<'a> {
        self.accessor.get(bean).unwrap_or(Value::Null)
    }

    pub fn element(&self) -> &ElementMetaData {
        &self.element
    }
}

impl fmt::Debug for PropertyMetaData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMetaData")
            .field("name", &self.name)
            .field("element", &self.element)
            .finish()
    }
}

/// One parameter of an executable.
#[derive(Debug, Clone)]
pub struct ParameterMetaData {
    index: usize,
    name: String,
    element: ElementMetaData,
}

impl ParameterMetaData {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Parameter name used in property paths, `arg{index}`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn element(&self) -> &ElementMetaData {
        &self.element
    }
}

/// Merged metadata of a constructor or method.
#[derive(Debug, Clone)]
pub struct ExecutableMetaData {
    executable: Executable,
    parameters: Vec<ParameterMetaData>,
    cross_parameter_constraints: Vec<MetaConstraint>,
    return_value: ElementMetaData,
}

impl ExecutableMetaData {
    fn new(executable: Executable) -> Self {
        let parameters = (0..executable.parameter_count())
            .map(|index| ParameterMetaData {
                index,
                name: format!("arg{}", index),
                element: ElementMetaData::default(),
            })
            .collect();
        Self {
            executable,
            parameters,
            cross_parameter_constraints: Vec::new(),
            return_value: ElementMetaData::default(),
        }
    }

    pub fn executable(&self) -> &Executable {
        &self.executable
    }

    pub fn parameters(&self) -> &[ParameterMetaData] {
        &self.parameters
    }

    /// Constraints on the argument list as a whole.
    pub fn cross_parameter_constraints(&self) -> &[MetaConstraint] {
        &self.cross_parameter_constraints
    }

    pub fn return_value(&self) -> &ElementMetaData {
        &self.return_value
    }
}

/// Merged metadata of a bean type.
#[derive(Debug, Clone)]
pub struct BeanMetaData {
    bean_type: BeanType,
    class_constraints: Vec<MetaConstraint>,
    properties: Vec<PropertyMetaData>,
    executables: IndexMap<Executable, Arc<ExecutableMetaData>>,
    default_group_sequence: Option<Vec<GroupId>>,
}

impl BeanMetaData {
    /// Metadata of a type without any constraints or cascades.
    pub fn empty(bean_type: BeanType) -> Self {
        Self {
            bean_type,
            class_constraints: Vec::new(),
            properties: Vec::new(),
            executables: IndexMap::new(),
            default_group_sequence: None,
        }
    }

    /// Aggregates merged elements of `bean_type`.
    ///
    /// # Errors
    ///
    /// Fails if a field element has no registered accessor or a parameter
    /// index exceeds its executable's arity.
    pub fn build(
        bean_type: BeanType,
        descriptor: Option<&BeanDescriptor>,
        elements: &[ConstrainedElement],
        default_group_sequence: Option<Vec<GroupId>>,
    ) -> Result<Self, ConfigurationError> {
        let mut meta = Self::empty(bean_type);
        meta.default_group_sequence = default_group_sequence;

        let mut executables: IndexMap<Executable, ExecutableMetaData> = IndexMap::new();

        for element in elements {
            match element.location() {
                ElementLocation::Type(_) => {
                    meta.class_constraints
                        .extend(element.constraints().iter().cloned());
                }
                ElementLocation::Field { name, .. } => {
                    let accessor = descriptor
                        .and_then(|d| d.find_property(name))
                        .map(|p| Arc::clone(&p.accessor))
                        .ok_or_else(|| ConfigurationError::UnknownProperty {
                            bean: bean_type.to_string(),
                            property: name.to_string(),
                        })?;
                    meta.properties.push(PropertyMetaData {
                        name: *name,
                        accessor,
                        element: ElementMetaData::from_element(element),
                    });
                }
                ElementLocation::Executable(executable) => {
                    executables
                        .entry(executable.clone())
                        .or_insert_with(|| ExecutableMetaData::new(executable.clone()))
                        .cross_parameter_constraints
                        .extend(element.constraints().iter().cloned());
                }
                ElementLocation::Parameter { executable, index } => {
                    let exec_meta = executables
                        .entry(executable.clone())
                        .or_insert_with(|| ExecutableMetaData::new(executable.clone()));
                    let parameter = exec_meta.parameters.get_mut(*index).ok_or_else(|| {
                        ConfigurationError::ParameterOutOfRange {
                            executable: executable.to_string(),
                            index: *index,
                        }
                    })?;
                    parameter.element = ElementMetaData::from_element(element);
                }
                ElementLocation::ReturnValue(executable) => {
                    executables
                        .entry(executable.clone())
                        .or_insert_with(|| ExecutableMetaData::new(executable.clone()))
                        .return_value = ElementMetaData::from_element(element);
                }
                // merge_all folds these into their root element
                ElementLocation::TypeArgument { .. } => {
                    return Err(ConfigurationError::ElementMismatch {
                        left: element.location().to_string(),
                        right: element.location().root().to_string(),
                    });
                }
            }
        }

        meta.executables = executables
            .into_iter()
            .map(|(executable, exec_meta)| (executable, Arc::new(exec_meta)))
            .collect();
        Ok(meta)
    }

    pub fn bean_type(&self) -> BeanType {
        self.bean_type
    }

    pub fn class_constraints(&self) -> &[MetaConstraint] {
        &self.class_constraints
    }

    /// Constrained or cascading properties in declaration order.
    pub fn properties(&self) -> &[PropertyMetaData] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyMetaData> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn executable(&self, executable: &Executable) -> Option<&Arc<ExecutableMetaData>> {
        self.executables.get(executable)
    }

    pub fn executables(&self) -> impl Iterator<Item = &Arc<ExecutableMetaData>> {
        self.executables.values()
    }

    /// The redefined default group sequence, if any.
    pub fn default_group_sequence(&self) -> Option<&[GroupId]> {
        self.default_group_sequence.as_deref()
    }

    /// Returns true if the type has nothing to validate.
    pub fn is_empty(&self) -> bool {
        self.class_constraints.is_empty() && self.properties.is_empty() && self.executables.is_empty()
    }
}
