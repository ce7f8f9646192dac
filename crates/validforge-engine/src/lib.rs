//! ValidForge Engine - Validation execution
//!
//! This crate executes constraint metadata against object graphs:
//! - `GroupSequences` and `ValidationOrder` resolving requested groups
//! - `ValidationContext` holding per-call traversal state
//! - `Validator` entry points for beans, properties and executables

pub mod context;
pub mod order;
pub mod traversal;
pub mod validator;

pub use context::ValidationContext;
pub use order::{GroupSequences, OrderStep, ValidationOrder};
pub use traversal::ValueContext;
pub use validator::{Validator, ValidatorBuilder};
