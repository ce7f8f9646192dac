//! Common constraint descriptors.
//!
//! # Example
//!
//! ```
//! use validforge_test::constraints::{counting, Counter};
//!
//! let counter = Counter::new();
//! let descriptor = counting("Counted", &counter, true);
//! assert_eq!(descriptor.name(), "Counted");
//! assert_eq!(counter.count(), 0);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use validforge_core::{predicate, validator_fn, ConstraintDescriptor, ValidatorFault, Value};

/// Value must not be null.
pub fn not_null() -> ConstraintDescriptor {
    ConstraintDescriptor::new("NotNull").with_validator(predicate(|v: &Value<'_>| !v.is_null()))
}

/// String must contain a non-whitespace character. Null passes.
pub fn not_blank() -> ConstraintDescriptor {
    ConstraintDescriptor::new("NotBlank").with_validator(predicate(|v: &Value<'_>| {
        if v.is_null() {
            return true;
        }
        v.downcast_ref::<String>()
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false)
    }))
}

/// String must have at least `min` characters. Null passes.
pub fn min_len(min: usize) -> ConstraintDescriptor {
    ConstraintDescriptor::new("MinLength")
        .with_attribute("min", min as i64)
        .with_validator(predicate(move |v: &Value<'_>| {
            if v.is_null() {
                return true;
            }
            v.downcast_ref::<String>()
                .map(|s| s.chars().count() >= min)
                .unwrap_or(false)
        }))
}

/// Always fails.
pub fn always_invalid(name: &'static str) -> ConstraintDescriptor {
    ConstraintDescriptor::new(name).with_validator(predicate(|_v: &Value<'_>| false))
}

/// Fails with a [`ValidatorFault`] whenever evaluated.
pub fn faulting(name: &'static str) -> ConstraintDescriptor {
    ConstraintDescriptor::new(name).with_validator(validator_fn(|_v, ctx| {
        Err(ValidatorFault::new(format!("validator exploded at '{}'", ctx.path())))
    }))
}

/// Counts evaluations and answers `result`.
pub fn counting(name: &'static str, counter: &Counter, result: bool) -> ConstraintDescriptor {
    let counter = counter.clone();
    ConstraintDescriptor::new(name).with_validator(predicate(move |_v: &Value<'_>| {
        counter.increment();
        result
    }))
}

/// Shared evaluation counter.
#[derive(Debug, Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}
