//! Runtime type and executable identifiers.

use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifies a bean type at runtime.
///
/// Equality, ordering and hashing use the [`TypeId`] only; the name is kept
/// for display.
#[derive(Clone, Copy)]
pub struct BeanType {
    name: &'static str,
    id: TypeId,
}

impl BeanType {
    /// Creates a bean type from its parts.
    pub fn new(name: &'static str, id: TypeId) -> Self {
        Self { name, id }
    }

    /// Returns the bean type of `T`.
    pub fn of<T: Any>() -> Self {
        Self {
            name: std::any::type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    /// Full type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without module path.
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for BeanType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BeanType {}

impl Hash for BeanType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for BeanType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BeanType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Debug for BeanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BeanType({})", self.short_name())
    }
}

impl fmt::Display for BeanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Kind of executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExecutableKind {
    Constructor,
    Method,
}

/// Identifies a constructor or method of a bean type.
///
/// # Example
///
/// ```
/// use validforge_core::Executable;
///
/// struct Car;
///
/// let rent = Executable::method::<Car>("rent", 2);
/// assert_eq!(rent.to_string(), "Car#rent(2)");
/// assert_eq!(rent.name(), "rent");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Executable {
    declaring_type: BeanType,
    kind: ExecutableKind,
    name: &'static str,
    parameter_count: usize,
}

impl Executable {
    /// Creates a method identifier.
    pub fn method<T: Any>(name: &'static str, parameter_count: usize) -> Self {
        Self {
            declaring_type: BeanType::of::<T>(),
            kind: ExecutableKind::Method,
            name,
            parameter_count,
        }
    }

    /// Creates a constructor identifier.
    pub fn constructor<T: Any>(parameter_count: usize) -> Self {
        let declaring_type = BeanType::of::<T>();
        Self {
            declaring_type,
            kind: ExecutableKind::Constructor,
            name: declaring_type.short_name(),
            parameter_count,
        }
    }

    pub fn declaring_type(&self) -> BeanType {
        self.declaring_type
    }

    pub fn kind(&self) -> ExecutableKind {
        self.kind
    }

    /// Method name, or the short type name for constructors.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn parameter_count(&self) -> usize {
        self.parameter_count
    }
}

impl fmt::Debug for Executable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Executable({})", self)
    }
}

impl fmt::Display for Executable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ExecutableKind::Constructor => {
                write!(f, "{}({})", self.declaring_type, self.parameter_count)
            }
            ExecutableKind::Method => write!(
                f,
                "{}#{}({})",
                self.declaring_type, self.name, self.parameter_count
            ),
        }
    }
}
