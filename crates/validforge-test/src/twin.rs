//! Beans whose equality cannot be trusted.
//!
//! Every [`Twin`] equals every other and all hash alike, so any traversal
//! that tracks visited beans by equality would skip the second one.

use std::hash::{Hash, Hasher};

use validforge_core::{BeanType, ConfigurationSource, Value};
use validforge_metadata::{BeanDescriptor, BeanRegistry, ConstrainedElement, StaticMetaDataProvider};

use crate::constraints::{counting, Counter};

#[derive(Debug, Clone)]
pub struct Twin {
    pub tag: u32,
}

impl PartialEq for Twin {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for Twin {}

impl Hash for Twin {
    fn hash<H: Hasher>(&self, state: &mut H) {
        0_u8.hash(state);
    }
}

/// Two distinct but equal twins.
#[derive(Debug, Clone)]
pub struct Pair {
    pub left: Twin,
    pub right: Twin,
}

impl Pair {
    pub fn new() -> Self {
        Self {
            left: Twin { tag: 1 },
            right: Twin { tag: 2 },
        }
    }
}

impl Default for Pair {
    fn default() -> Self {
        Self::new()
    }
}

pub fn registry() -> BeanRegistry {
    BeanRegistry::new()
        .with_bean(BeanDescriptor::of::<Twin>().property("tag", |t: &Twin| Value::of(&t.tag)))
        .with_bean(
            BeanDescriptor::of::<Pair>()
                .property("left", |p: &Pair| Value::of(&p.left))
                .property("right", |p: &Pair| Value::of(&p.right)),
        )
}

/// Provider cascading into both twins, each counting its validation.
pub fn pair_provider(visits: &Counter) -> StaticMetaDataProvider {
    let source = ConfigurationSource::Annotation;
    let pair = BeanType::of::<Pair>();
    StaticMetaDataProvider::new(source)
        .with_element(
            ConstrainedElement::bean_type(source, BeanType::of::<Twin>())
                .constrain(counting("Visited", visits, true))
                .unwrap(),
        )
        .with_element(ConstrainedElement::field(source, pair, "left").cascade())
        .with_element(ConstrainedElement::field(source, pair, "right").cascade())
}
