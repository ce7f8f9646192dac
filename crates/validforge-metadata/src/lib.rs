//! ValidForge Metadata - Constraint metadata model
//!
//! This crate turns constraint declarations into evaluable metadata:
//! - `MetaConstraint` binding a descriptor to its element location
//! - `ConstrainedElement` per declared element and the metadata merger
//! - `CascadingMetaDataBuilder` for recursive validation and group conversion
//! - `ConstraintTree` composition and evaluation
//! - Bean introspection, aggregated bean metadata and the metadata cache

pub mod aggregated;
pub mod bean;
pub mod cascading;
pub mod constraint;
pub mod location;
pub mod manager;
pub mod provider;
pub mod raw;
pub mod tree;

pub use aggregated::{
    BeanMetaData, ElementMetaData, ExecutableMetaData, ParameterMetaData, PropertyMetaData,
};
pub use bean::{
    BeanDescriptor, BeanRegistry, PropertyAccessor, PropertyDescriptor, TypedPropertyAccessor,
};
pub use cascading::{CascadingMetaData, CascadingMetaDataBuilder};
pub use constraint::{ConstraintSet, MetaConstraint};
pub use location::{ContainerElement, ElementKind, ElementLocation};
pub use manager::BeanMetaDataManager;
pub use provider::{MetaDataProvider, StaticMetaDataProvider};
pub use raw::{merge_all, ConstrainedElement};
pub use tree::{ConstraintTree, EvaluationScope};
