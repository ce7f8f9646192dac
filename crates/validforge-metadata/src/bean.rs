//! Runtime bean introspection.
//!
//! Bean types are registered up front with a [`BeanDescriptor`] listing the
//! accessors of their properties. The engine reads property values through
//! these accessors on type-erased beans.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use validforge_core::{BeanType, Value};

/// Reads one property from a type-erased bean.
pub trait PropertyAccessor: Send + Sync {
    /// Returns the property value, or `None` if `bean` is not of the
    /// accessor's bean type.
    fn get<'a>(&self, bean: &'a dyn Any) -> Option<Value<'a>>;
}

/// A property accessor for bean type `B` backed by a getter function.
pub struct TypedPropertyAccessor<B> {
    getter: fn(&B) -> Value<'_>,
}

impl<B: 'static> TypedPropertyAccessor<B> {
    pub fn new(getter: fn(&B) -> Value<'_>) -> Self {
        Self { getter }
    }
}

impl<B: Any> PropertyAccessor for TypedPropertyAccessor<B> {
    fn get<'a>(&self, bean: &'a dyn Any) -> Option<Value<'a>> {
        let bean = bean.downcast_ref::<B>()?;
        Some((self.getter)(bean))
    }
}

impl<B> fmt::Debug for TypedPropertyAccessor<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedPropertyAccessor")
            .field("bean", &std::any::type_name::<B>())
            .finish()
    }
}

/// A named property of a bean type.
#[derive(Clone)]
pub struct PropertyDescriptor {
    pub name: &'static str,
    pub accessor: Arc<dyn PropertyAccessor>,
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .finish()
    }
}

/// Describes a bean type at runtime.
///
/// # Example
///
/// ```
/// use validforge_core::Value;
/// use validforge_metadata::BeanDescriptor;
///
/// struct Person {
///     name: Option<String>,
/// }
///
/// let descriptor = BeanDescriptor::of::<Person>()
///     .property("name", |p: &Person| Value::option(p.name.as_ref()));
///
/// let ada = Person { name: Some("Ada".to_string()) };
/// let value = descriptor.read(&ada, "name").unwrap();
/// assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("Ada"));
/// ```
#[derive(Debug, Clone)]
pub struct BeanDescriptor {
    bean_type: BeanType,
    properties: Vec<PropertyDescriptor>,
}

impl BeanDescriptor {
    pub fn new(bean_type: BeanType) -> Self {
        Self {
            bean_type,
            properties: Vec::new(),
        }
    }

    /// Creates a descriptor for `B`.
    pub fn of<B: Any>() -> Self {
        Self::new(BeanType::of::<B>())
    }

    /// Adds a property read by `getter`.
    pub fn property<B: Any>(self, name: &'static str, getter: fn(&B) -> Value<'_>) -> Self {
        self.with_accessor(name, TypedPropertyAccessor::new(getter))
    }

    /// Adds a property read by a custom accessor.
    pub fn with_accessor(mut self, name: &'static str, accessor: impl PropertyAccessor + 'static) -> Self {
        self.properties.push(PropertyDescriptor {
            name,
            accessor: Arc::new(accessor),
        });
        self
    }

    pub fn bean_type(&self) -> BeanType {
        self.bean_type
    }

    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    pub fn find_property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Reads a property by name.
    pub fn read<'a>(&self, bean: &'a dyn Any, name: &str) -> Option<Value<'a>> {
        self.find_property(name)?.accessor.get(bean)
    }
}

/// Registered bean descriptors keyed by type id.
#[derive(Debug, Clone, Default)]
pub struct BeanRegistry {
    beans: HashMap<TypeId, Arc<BeanDescriptor>>,
}

impl BeanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a descriptor, replacing any previous one for the same type.
    pub fn register(&mut self, descriptor: BeanDescriptor) {
        self.beans
            .insert(descriptor.bean_type().type_id(), Arc::new(descriptor));
    }

    pub fn with_bean(mut self, descriptor: BeanDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    pub fn get(&self, type_id: TypeId) -> Option<&Arc<BeanDescriptor>> {
        self.beans.get(&type_id)
    }

    pub fn contains(&self, type_id: TypeId) -> bool {
        self.beans.contains_key(&type_id)
    }

    pub fn len(&self) -> usize {
        self.beans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Address {
        city: String,
    }

    struct Company {
        offices: Vec<Address>,
    }

    fn registry() -> BeanRegistry {
        BeanRegistry::new()
            .with_bean(BeanDescriptor::of::<Address>().property("city", |a: &Address| Value::of(&a.city)))
            .with_bean(
                BeanDescriptor::of::<Company>()
                    .property("offices", |c: &Company| Value::list_of(&c.offices)),
            )
    }

    #[test]
    fn test_lookup_by_type_id() {
        let registry = registry();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains(TypeId::of::<Address>()));
        assert!(registry.get(TypeId::of::<String>()).is_none());
    }

    #[test]
    fn test_accessor_reads_through_any() {
        let registry = registry();
        let company = Company {
            offices: vec![
                Address {
                    city: "Lyon".to_string(),
                },
                Address {
                    city: "Graz".to_string(),
                },
            ],
        };
        let descriptor = registry.get(TypeId::of::<Company>()).unwrap();
        let offices = descriptor.read(&company, "offices").unwrap();
        assert_eq!(offices.len(), Some(2));
    }

    #[test]
    fn test_accessor_rejects_other_types() {
        let registry = registry();
        let descriptor = registry.get(TypeId::of::<Address>()).unwrap();
        let not_an_address = 42_u32;
        assert!(descriptor.read(&not_an_address, "city").is_none());
        assert!(descriptor.read(&not_an_address, "missing").is_none());
    }
}
