//! Person and address fixtures.
//!
//! The default provider declares:
//! - `Person.name`: NotNull
//! - `Person.address`: cascading
//! - `Person.nicknames[]`: NotBlank
//! - `Person.scores<K>[]`: NotBlank, `Person.scores<V>[]`: NotNull
//! - `Address.street`: NotNull
//!
//! # Example
//!
//! ```
//! use validforge_test::person::{Address, Person};
//!
//! let person = Person::named("Ada").with_address(Address::new(None, "London"));
//! assert!(person.address.is_some());
//! ```

use std::collections::BTreeMap;

use validforge_core::{BeanType, ConfigurationSource, Value};
use validforge_metadata::{
    BeanDescriptor, BeanRegistry, ConstrainedElement, ContainerElement, StaticMetaDataProvider,
};

use crate::constraints::{not_blank, not_null};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Person {
    pub name: Option<String>,
    pub address: Option<Address>,
    pub nicknames: Vec<String>,
    pub scores: BTreeMap<String, u32>,
}

impl Person {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    pub fn named(name: &str) -> Self {
        Self::new(Some(name.to_string()))
    }

    pub fn anonymous() -> Self {
        Self::new(None)
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    pub fn with_nickname(mut self, nickname: &str) -> Self {
        self.nicknames.push(nickname.to_string());
        self
    }

    pub fn with_score(mut self, key: &str, score: u32) -> Self {
        self.scores.insert(key.to_string(), score);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Address {
    pub street: Option<String>,
    pub city: String,
}

impl Address {
    pub fn new(street: Option<&str>, city: &str) -> Self {
        Self {
            street: street.map(str::to_string),
            city: city.to_string(),
        }
    }
}

pub fn person_descriptor() -> BeanDescriptor {
    BeanDescriptor::of::<Person>()
        .property("name", |p: &Person| Value::option(p.name.as_ref()))
        .property("address", |p: &Person| Value::option(p.address.as_ref()))
        .property("nicknames", |p: &Person| Value::list_of(&p.nicknames))
        .property("scores", |p: &Person| Value::map_of(&p.scores))
}

pub fn address_descriptor() -> BeanDescriptor {
    BeanDescriptor::of::<Address>()
        .property("street", |a: &Address| Value::option(a.street.as_ref()))
        .property("city", |a: &Address| Value::of(&a.city))
}

/// Registry with [`Person`] and [`Address`].
pub fn registry() -> BeanRegistry {
    BeanRegistry::new()
        .with_bean(person_descriptor())
        .with_bean(address_descriptor())
}

/// Declared elements of the person fixture from `source`.
pub fn person_elements(source: ConfigurationSource) -> Vec<ConstrainedElement> {
    let person = BeanType::of::<Person>();
    let address = BeanType::of::<Address>();
    // fixtures are static, failures here are bugs in the fixture
    vec![
        ConstrainedElement::field(source, person, "name")
            .constrain(not_null())
            .unwrap(),
        ConstrainedElement::field(source, person, "address").cascade(),
        ConstrainedElement::field(source, person, "nicknames")
            .constrain_element(ContainerElement::Element, not_blank())
            .unwrap(),
        ConstrainedElement::field(source, person, "scores")
            .constrain_element(ContainerElement::MapKey, not_blank())
            .unwrap()
            .constrain_element(ContainerElement::MapValue, not_null())
            .unwrap(),
        ConstrainedElement::field(source, address, "street")
            .constrain(not_null())
            .unwrap(),
    ]
}

/// Annotation provider declaring the person fixture.
pub fn person_provider() -> StaticMetaDataProvider {
    StaticMetaDataProvider::new(ConfigurationSource::Annotation)
        .with_elements(person_elements(ConfigurationSource::Annotation))
}
