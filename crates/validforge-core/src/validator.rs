//! The validator capability.
//!
//! The engine never inspects constraint implementations; every constraint is
//! reduced to an object answering `is_valid(value, context)`.

use std::fmt;

use crate::descriptor::ConstraintDescriptor;
use crate::error::ValidatorFault;
use crate::group::GroupId;
use crate::path::PropertyPath;
use crate::value::Value;

/// Evaluates one constraint against one value.
///
/// Implementations must be side-effect free with respect to the validated
/// graph. Returning `Err` signals an unexpected failure and aborts the whole
/// validation call.
pub trait ConstraintValidator: Send + Sync {
    fn is_valid(
        &self,
        value: &Value<'_>,
        context: &ValidatorContext<'_>,
    ) -> Result<bool, ValidatorFault>;
}

/// Information available to a validator during evaluation.
pub struct ValidatorContext<'a> {
    descriptor: &'a ConstraintDescriptor,
    path: &'a PropertyPath,
    group: &'a GroupId,
}

impl<'a> ValidatorContext<'a> {
    pub fn new(
        descriptor: &'a ConstraintDescriptor,
        path: &'a PropertyPath,
        group: &'a GroupId,
    ) -> Self {
        Self {
            descriptor,
            path,
            group,
        }
    }

    /// Descriptor of the constraint being evaluated.
    pub fn descriptor(&self) -> &ConstraintDescriptor {
        self.descriptor
    }

    /// Path of the value being evaluated.
    pub fn path(&self) -> &PropertyPath {
        self.path
    }

    /// Group currently being validated.
    pub fn group(&self) -> &GroupId {
        self.group
    }
}

/// Validator backed by a closure that may fail.
pub struct FnValidator<F> {
    f: F,
}

impl<F> ConstraintValidator for FnValidator<F>
where
    F: Fn(&Value<'_>, &ValidatorContext<'_>) -> Result<bool, ValidatorFault> + Send + Sync,
{
    fn is_valid(
        &self,
        value: &Value<'_>,
        context: &ValidatorContext<'_>,
    ) -> Result<bool, ValidatorFault> {
        (self.f)(value, context)
    }
}

impl<F> fmt::Debug for FnValidator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnValidator")
    }
}

/// Creates a validator from a fallible closure.
pub fn validator_fn<F>(f: F) -> FnValidator<F>
where
    F: Fn(&Value<'_>, &ValidatorContext<'_>) -> Result<bool, ValidatorFault> + Send + Sync,
{
    FnValidator { f }
}

/// Validator backed by an infallible predicate on the value.
pub struct PredicateValidator<F> {
    f: F,
}

impl<F> ConstraintValidator for PredicateValidator<F>
where
    F: Fn(&Value<'_>) -> bool + Send + Sync,
{
    fn is_valid(
        &self,
        value: &Value<'_>,
        _context: &ValidatorContext<'_>,
    ) -> Result<bool, ValidatorFault> {
        Ok((self.f)(value))
    }
}

impl<F> fmt::Debug for PredicateValidator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PredicateValidator")
    }
}

/// Creates a validator from a predicate.
///
/// # Example
///
/// ```
/// use validforge_core::{predicate, ConstraintDescriptor, ConstraintValidator, GroupId};
/// use validforge_core::{PropertyPath, ValidatorContext, Value};
///
/// let not_null = predicate(|v: &Value<'_>| !v.is_null());
///
/// let descriptor = ConstraintDescriptor::new("NotNull");
/// let path = PropertyPath::root();
/// let group = GroupId::default();
/// let ctx = ValidatorContext::new(&descriptor, &path, &group);
/// assert_eq!(not_null.is_valid(&Value::Null, &ctx), Ok(false));
/// assert_eq!(not_null.is_valid(&Value::of(&1), &ctx), Ok(true));
/// ```
pub fn predicate<F>(f: F) -> PredicateValidator<F>
where
    F: Fn(&Value<'_>) -> bool + Send + Sync,
{
    PredicateValidator { f }
}
