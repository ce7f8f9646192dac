//! ValidForge - Constraint-based validation of object graphs
//!
//! Register your beans, declare constraints through a metadata provider and
//! validate.
//!
//! # Example
//!
//! ```rust
//! use validforge::prelude::*;
//!
//! struct Account {
//!     owner: Option<String>,
//! }
//!
//! let provider = StaticMetaDataProvider::new(ConfigurationSource::Api).with_element(
//!     ConstrainedElement::field(ConfigurationSource::Api, BeanType::of::<Account>(), "owner")
//!         .constrain(
//!             ConstraintDescriptor::new("NotNull")
//!                 .with_validator(predicate(|v: &Value<'_>| !v.is_null())),
//!         )
//!         .unwrap(),
//! );
//!
//! let validator = ValidatorFactory::configure()
//!     .with_bean(
//!         BeanDescriptor::of::<Account>()
//!             .property("owner", |a: &Account| Value::option(a.owner.as_ref())),
//!     )
//!     .with_provider(provider)
//!     .build()
//!     .unwrap();
//!
//! let violations = validator.validate(&Account { owner: None }, &[]).unwrap();
//! assert_eq!(violations.len(), 1);
//! ```

mod factory;
mod logging;

pub use factory::{ValidatorFactory, DEFAULT_CONFIG_FILE};
pub use logging::init_tracing;

// Core model
pub use validforge_core::{
    predicate, validator_fn, AttributeValue, BeanType, ConfigurationError, ConfigurationSource,
    ConstraintDescriptor, ConstraintValidator, Executable, ExecutableKind, GroupId, GroupSequence,
    Identity, IdentitySet, ObjectRef, PathNode, PropertyPath, Result, ValidationError,
    ValidatorContext, ValidatorFault, Value, Violation, Violations,
};

// Metadata model
pub use validforge_metadata::{
    BeanDescriptor, BeanRegistry, CascadingMetaDataBuilder, ConstrainedElement, ContainerElement,
    ElementKind, ElementLocation, MetaDataProvider, StaticMetaDataProvider,
};

// Engine
pub use validforge_engine::{GroupSequences, OrderStep, ValidationOrder, Validator, ValidatorBuilder};

// Configuration
pub use validforge_config::{ConfigError, GroupSequenceConfig, NullRootPolicy, ValidatorConfig};

pub mod prelude {
    pub use super::{init_tracing, ValidatorFactory};
    pub use super::{predicate, validator_fn, ConstraintDescriptor, ConstraintValidator};
    pub use super::{BeanDescriptor, BeanType, ConfigurationSource, ConstrainedElement, ContainerElement};
    pub use super::{CascadingMetaDataBuilder, StaticMetaDataProvider};
    pub use super::{Executable, GroupId, GroupSequence, Value, Violations};
    pub use super::{NullRootPolicy, ValidatorConfig};
    pub use super::{Validator, ValidatorBuilder};
}
