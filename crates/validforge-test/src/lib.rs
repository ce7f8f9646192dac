//! Shared test fixtures for ValidForge crates.
//!
//! This crate provides beans, constraint descriptors and metadata providers
//! for testing. It does NOT depend on `validforge-engine` so that the engine
//! can use it as a dev-dependency.
//!
//! - [`constraints`] - Common constraint descriptors and counting validators
//! - [`person`] - Person/address beans for end-to-end and container tests
//! - [`graph`] - Linked nodes for cycle tests
//! - [`twin`] - Beans with hostile equality for identity tests
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! validforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use validforge_test::person::{person_provider, registry, Address, Person};
//! use validforge_test::constraints::{not_null, Counter};
//! ```

pub mod constraints;
pub mod graph;
pub mod person;
pub mod twin;

// Re-export commonly used types at crate root for convenience
pub use constraints::Counter;
pub use graph::Node;
pub use person::{Address, Person};
pub use twin::{Pair, Twin};
