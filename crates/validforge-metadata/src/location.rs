//! Locations of constrained elements.

use std::fmt;

use validforge_core::{BeanType, Executable, ExecutableKind};

/// Type argument of a container that carries constraints or cascades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContainerElement {
    /// Element of a list or set.
    Element,
    /// Key of a map.
    MapKey,
    /// Value of a map.
    MapValue,
}

impl fmt::Display for ContainerElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerElement::Element => f.write_str("[]"),
            ContainerElement::MapKey => f.write_str("<K>[]"),
            ContainerElement::MapValue => f.write_str("<V>[]"),
        }
    }
}

/// Kind of a constrained element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Type,
    Field,
    Constructor,
    Method,
    Parameter,
    ReturnValue,
    TypeArgument,
}

/// Where a constraint is declared.
///
/// Two elements denote the same logical element iff their locations are
/// equal.
///
/// # Example
///
/// ```
/// use validforge_core::BeanType;
/// use validforge_metadata::{ContainerElement, ElementKind, ElementLocation};
///
/// struct Building;
///
/// let apartments = ElementLocation::field(BeanType::of::<Building>(), "apartments");
/// let element = apartments.type_argument(ContainerElement::Element);
/// assert_eq!(element.kind(), ElementKind::TypeArgument);
/// assert_eq!(element.root(), &apartments);
/// assert_eq!(element.to_string(), "Building.apartments[]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementLocation {
    /// The bean type itself (class-level constraints).
    Type(BeanType),
    /// A property of a bean.
    Field { bean: BeanType, name: &'static str },
    /// A constructor or method (cross-parameter constraints).
    Executable(Executable),
    /// One parameter of a constructor or method.
    Parameter { executable: Executable, index: usize },
    /// The return value of a constructor or method.
    ReturnValue(Executable),
    /// A type argument of a container-typed element.
    TypeArgument {
        parent: Box<ElementLocation>,
        element: ContainerElement,
    },
}

impl ElementLocation {
    pub fn field(bean: BeanType, name: &'static str) -> Self {
        ElementLocation::Field { bean, name }
    }

    pub fn parameter(executable: Executable, index: usize) -> Self {
        ElementLocation::Parameter { executable, index }
    }

    /// Location of a type argument of this element.
    pub fn type_argument(&self, element: ContainerElement) -> Self {
        ElementLocation::TypeArgument {
            parent: Box::new(self.clone()),
            element,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            ElementLocation::Type(_) => ElementKind::Type,
            ElementLocation::Field { .. } => ElementKind::Field,
            ElementLocation::Executable(executable) => match executable.kind() {
                ExecutableKind::Constructor => ElementKind::Constructor,
                ExecutableKind::Method => ElementKind::Method,
            },
            ElementLocation::Parameter { .. } => ElementKind::Parameter,
            ElementLocation::ReturnValue(_) => ElementKind::ReturnValue,
            ElementLocation::TypeArgument { .. } => ElementKind::TypeArgument,
        }
    }

    /// The type declaring this element.
    pub fn declaring_type(&self) -> BeanType {
        match self {
            ElementLocation::Type(bean) | ElementLocation::Field { bean, .. } => *bean,
            ElementLocation::Executable(executable)
            | ElementLocation::Parameter { executable, .. }
            | ElementLocation::ReturnValue(executable) => executable.declaring_type(),
            ElementLocation::TypeArgument { parent, .. } => parent.declaring_type(),
        }
    }

    /// The executable this element belongs to, if any.
    pub fn executable(&self) -> Option<&Executable> {
        match self {
            ElementLocation::Executable(executable)
            | ElementLocation::Parameter { executable, .. }
            | ElementLocation::ReturnValue(executable) => Some(executable),
            ElementLocation::TypeArgument { parent, .. } => parent.executable(),
            _ => None,
        }
    }

    /// The outermost non-type-argument location.
    pub fn root(&self) -> &ElementLocation {
        match self {
            ElementLocation::TypeArgument { parent, .. } => parent.root(),
            other => other,
        }
    }

    /// Container elements from the root outwards; empty for non type arguments.
    pub fn container_path(&self) -> Vec<ContainerElement> {
        let mut path = Vec::new();
        let mut current = self;
        while let ElementLocation::TypeArgument { parent, element } = current {
            path.push(*element);
            current = parent;
        }
        path.reverse();
        path
    }
}

impl fmt::Display for ElementLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementLocation::Type(bean) => write!(f, "{}", bean),
            ElementLocation::Field { bean, name } => write!(f, "{}.{}", bean, name),
            ElementLocation::Executable(executable) => write!(f, "{}", executable),
            ElementLocation::Parameter { executable, index } => {
                write!(f, "{}.arg{}", executable, index)
            }
            ElementLocation::ReturnValue(executable) => {
                write!(f, "{}.<return value>", executable)
            }
            ElementLocation::TypeArgument { parent, element } => write!(f, "{}{}", parent, element),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Car;

    #[test]
    fn test_kind_follows_payload() {
        let rent = Executable::method::<Car>("rent", 2);
        assert_eq!(ElementLocation::Executable(rent.clone()).kind(), ElementKind::Method);
        assert_eq!(
            ElementLocation::Executable(Executable::constructor::<Car>(1)).kind(),
            ElementKind::Constructor
        );
        assert_eq!(ElementLocation::parameter(rent.clone(), 1).kind(), ElementKind::Parameter);
        assert_eq!(ElementLocation::ReturnValue(rent).kind(), ElementKind::ReturnValue);
    }

    #[test]
    fn test_parameter_identity_is_executable_and_index() {
        let rent = Executable::method::<Car>("rent", 2);
        assert_eq!(
            ElementLocation::parameter(rent.clone(), 0),
            ElementLocation::parameter(rent.clone(), 0)
        );
        assert_ne!(
            ElementLocation::parameter(rent.clone(), 0),
            ElementLocation::parameter(rent, 1)
        );
    }

    #[test]
    fn test_nested_container_path() {
        let parts = ElementLocation::field(BeanType::of::<Car>(), "parts");
        let nested = parts
            .type_argument(ContainerElement::MapValue)
            .type_argument(ContainerElement::Element);
        assert_eq!(
            nested.container_path(),
            vec![ContainerElement::MapValue, ContainerElement::Element]
        );
        assert_eq!(nested.root(), &parts);
        assert_eq!(nested.declaring_type(), BeanType::of::<Car>());
        assert!(parts.container_path().is_empty());
    }
}
