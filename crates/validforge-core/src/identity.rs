//! Reference-identity tracking for graph traversal.
//!
//! Cascading validation must recognise an object it has already visited
//! without consulting the object's own `PartialEq`/`Hash`, which may be
//! missing, expensive or unrelated to graph identity.

use std::any::{Any, TypeId};
use std::collections::HashSet;

/// Identity token of an object: its address plus its runtime type.
///
/// The type id distinguishes a struct from its first field, which share an
/// address. Zero-sized values have no meaningful address; all values of a
/// zero-sized type share one identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity {
    address: usize,
    type_id: TypeId,
}

impl Identity {
    /// Computes the identity of a live object.
    pub fn of(value: &dyn Any) -> Self {
        let address = if std::mem::size_of_val(value) == 0 {
            0
        } else {
            value as *const dyn Any as *const () as usize
        };
        Self {
            address,
            type_id: value.type_id(),
        }
    }

    pub fn address(&self) -> usize {
        self.address
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }
}

/// A set keyed by object identity.
///
/// Objects must stay alive while the set is in use; the engine guarantees
/// this by scoping every set to a single validation call.
///
/// # Example
///
/// ```
/// use validforge_core::IdentitySet;
///
/// #[derive(PartialEq)]
/// struct Point { x: i32 }
///
/// let a = Point { x: 1 };
/// let b = Point { x: 1 };
/// assert!(a == b);
///
/// let mut set = IdentitySet::new();
/// assert!(set.insert(&a));
/// assert!(!set.insert(&a));
/// assert!(set.insert(&b));
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Debug, Default, Clone)]
pub struct IdentitySet {
    entries: HashSet<Identity>,
}

impl IdentitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object. Returns false if it was already present.
    pub fn insert(&mut self, value: &dyn Any) -> bool {
        self.insert_identity(Identity::of(value))
    }

    /// Adds an identity. Returns false if it was already present.
    pub fn insert_identity(&mut self, identity: Identity) -> bool {
        self.entries.insert(identity)
    }

    pub fn contains(&self, value: &dyn Any) -> bool {
        self.contains_identity(&Identity::of(value))
    }

    pub fn contains_identity(&self, identity: &Identity) -> bool {
        self.entries.contains(identity)
    }

    pub fn remove(&mut self, value: &dyn Any) -> bool {
        self.entries.remove(&Identity::of(value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
