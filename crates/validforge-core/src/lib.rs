//! ValidForge Core - Core types and traits for object graph validation
//!
//! This crate provides the fundamental abstractions for ValidForge:
//! - Type-erased values and object identity for graph traversal
//! - Groups, group sequences and configuration sources
//! - Constraint descriptors and the validator capability trait
//! - Property paths and violations

pub mod descriptor;
pub mod error;
pub mod group;
pub mod identity;
pub mod path;
pub mod source;
pub mod types;
pub mod validator;
pub mod value;
pub mod violation;

pub use descriptor::{AttributeValue, ConstraintDescriptor};
pub use error::{ConfigurationError, Result, ValidationError, ValidatorFault};
pub use group::{GroupId, GroupSequence};
pub use identity::{Identity, IdentitySet};
pub use path::{PathNode, PropertyPath};
pub use source::ConfigurationSource;
pub use types::{BeanType, Executable, ExecutableKind};
pub use validator::{
    predicate, validator_fn, ConstraintValidator, FnValidator, PredicateValidator, ValidatorContext,
};
pub use value::{ObjectRef, Value};
pub use violation::{Violation, Violations};
