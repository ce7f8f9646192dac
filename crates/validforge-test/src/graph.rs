//! Linked node fixtures for cyclic graphs.
//!
//! Nodes link to each other through weak references, so cycles do not leak.
//! The `next` accessor upgrades the link and hands it to the engine as a
//! shared value.
//!
//! # Example
//!
//! ```
//! use validforge_test::graph::Node;
//!
//! let a = Node::self_loop("a");
//! assert!(std::sync::Arc::ptr_eq(&a.next().unwrap(), &a));
//! ```

use std::sync::{Arc, OnceLock, Weak};

use validforge_core::{BeanType, ConfigurationSource, Value};
use validforge_metadata::{BeanDescriptor, ConstrainedElement, StaticMetaDataProvider};

use crate::constraints::{counting, not_blank, Counter};

#[derive(Debug)]
pub struct Node {
    pub label: String,
    next: OnceLock<Weak<Node>>,
}

impl Node {
    pub fn new(label: &str) -> Arc<Self> {
        Arc::new(Self {
            label: label.to_string(),
            next: OnceLock::new(),
        })
    }

    /// A node whose `next` is itself.
    pub fn self_loop(label: &str) -> Arc<Self> {
        Arc::new_cyclic(|me| {
            let next = OnceLock::new();
            let _ = next.set(me.clone());
            Self {
                label: label.to_string(),
                next,
            }
        })
    }

    /// Sets `next`; returns false if it was already set.
    pub fn link(&self, next: &Arc<Node>) -> bool {
        self.next.set(Arc::downgrade(next)).is_ok()
    }

    pub fn next(&self) -> Option<Arc<Node>> {
        self.next.get().and_then(Weak::upgrade)
    }
}

pub fn node_descriptor() -> BeanDescriptor {
    BeanDescriptor::of::<Node>()
        .property("label", |n: &Node| Value::of(&n.label))
        .property("next", |n: &Node| n.next().map(Value::shared).unwrap_or(Value::Null))
}

/// Provider declaring `Node.label` NotBlank, a class-level constraint
/// counting visits, and a cascading `next`.
pub fn node_provider(visits: &Counter) -> StaticMetaDataProvider {
    let node = BeanType::of::<Node>();
    let source = ConfigurationSource::Annotation;
    StaticMetaDataProvider::new(source)
        .with_element(
            ConstrainedElement::bean_type(source, node)
                .constrain(counting("Visited", visits, true))
                .unwrap(),
        )
        .with_element(
            ConstrainedElement::field(source, node, "label")
                .constrain(not_blank())
                .unwrap(),
        )
        .with_element(ConstrainedElement::field(source, node, "next").cascade())
}
