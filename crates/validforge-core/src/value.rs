//! Type-erased values flowing through validation.
//!
//! Property accessors hand the engine a [`Value`]: either null, a single
//! object (borrowed from the bean or shared through an `Arc`), or a
//! container whose elements are themselves values.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::identity::Identity;
use crate::types::BeanType;

/// A value read from a bean, parameter list or return value.
#[derive(Clone)]
pub enum Value<'a> {
    /// Absent value.
    Null,
    /// A single object.
    Object(ObjectRef<'a>),
    /// Ordered container; elements are addressed by index.
    List(Vec<Value<'a>>),
    /// Keyed container as `(key, value)` pairs in iteration order.
    Map(Vec<(Value<'a>, Value<'a>)>),
}

impl<'a> Value<'a> {
    /// Borrows an object.
    pub fn of<T: Any>(value: &'a T) -> Self {
        Value::Object(ObjectRef::borrowed(value))
    }

    /// Wraps a shared object.
    ///
    /// Accessors return shared values for references they cannot lend out,
    /// such as upgraded weak back-references.
    pub fn shared<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Value::Object(ObjectRef::shared(value))
    }

    /// Maps `None` to [`Value::Null`].
    pub fn option<T: Any>(value: Option<&'a T>) -> Self {
        match value {
            Some(v) => Value::of(v),
            None => Value::Null,
        }
    }

    /// Builds a list of borrowed elements.
    pub fn list_of<T: Any>(items: impl IntoIterator<Item = &'a T>) -> Self {
        Value::List(items.into_iter().map(Value::of).collect())
    }

    /// Builds a map of borrowed keys and values.
    pub fn map_of<K: Any, V: Any>(entries: impl IntoIterator<Item = (&'a K, &'a V)>) -> Self {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (Value::of(k), Value::of(v)))
                .collect(),
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true for list and map values.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_))
    }

    pub fn as_object(&self) -> Option<&ObjectRef<'a>> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Downcasts a single object to `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_object()?.downcast_ref::<T>()
    }

    /// Number of elements for containers, `None` otherwise.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::List(items) => Some(items.len()),
            Value::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Renders the value for violation reports.
    ///
    /// Common scalar types are rendered by value, other objects by their
    /// short type name. Returns `None` for null.
    pub fn describe(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Object(obj) => Some(obj.describe()),
            Value::List(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .map(|v| v.describe().unwrap_or_else(|| "null".to_string()))
                    .collect();
                Some(format!("[{}]", parts.join(", ")))
            }
            Value::Map(entries) => {
                let parts: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| {
                        format!(
                            "{}={}",
                            k.describe().unwrap_or_else(|| "null".to_string()),
                            v.describe().unwrap_or_else(|| "null".to_string())
                        )
                    })
                    .collect();
                Some(format!("{{{}}}", parts.join(", ")))
            }
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Object(obj) => write!(f, "Object({})", obj.describe()),
            Value::List(items) => f.debug_list().entries(items).finish(),
            Value::Map(entries) => f
                .debug_map()
                .entries(entries.iter().map(|(k, v)| (k, v)))
                .finish(),
        }
    }
}

#[derive(Clone)]
enum Handle<'a> {
    Borrowed(&'a dyn Any),
    Shared(Arc<dyn Any + Send + Sync>),
}

/// A reference to a single object with its static type name.
#[derive(Clone)]
pub struct ObjectRef<'a> {
    handle: Handle<'a>,
    type_name: &'static str,
}

impl<'a> ObjectRef<'a> {
    pub fn borrowed<T: Any>(value: &'a T) -> Self {
        Self {
            handle: Handle::Borrowed(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn shared<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            handle: Handle::Shared(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// The referenced object.
    pub fn as_any(&self) -> &dyn Any {
        match &self.handle {
            Handle::Borrowed(value) => *value,
            Handle::Shared(value) => &**value,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Full type name of the referenced object.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn short_type_name(&self) -> &'static str {
        self.type_name.rsplit("::").next().unwrap_or(self.type_name)
    }

    /// Runtime type of the referenced object.
    pub fn bean_type(&self) -> BeanType {
        BeanType::new(self.type_name, self.as_any().type_id())
    }

    /// Identity of the referenced object.
    pub fn identity(&self) -> Identity {
        Identity::of(self.as_any())
    }

    /// The owning handle of a shared object, if any.
    pub fn shared_handle(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        match &self.handle {
            Handle::Borrowed(_) => None,
            Handle::Shared(value) => Some(Arc::clone(value)),
        }
    }

    fn describe(&self) -> String {
        let any = self.as_any();
        if let Some(s) = any.downcast_ref::<String>() {
            return s.clone();
        }
        if let Some(s) = any.downcast_ref::<&'static str>() {
            return (*s).to_string();
        }
        macro_rules! render {
            ($($ty:ty),*) => {
                $(
                    if let Some(v) = any.downcast_ref::<$ty>() {
                        return v.to_string();
                    }
                )*
            };
        }
        render!(bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);
        format!("<{}>", self.short_type_name())
    }
}

impl fmt::Debug for ObjectRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRef")
            .field("type", &self.short_type_name())
            .field("value", &self.describe())
            .finish()
    }
}
