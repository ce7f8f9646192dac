//! Evaluable constraint trees.
//!
//! A descriptor without composing constraints becomes a [`ConstraintTree::Simple`]
//! leaf wrapping its validator. A composed descriptor becomes a
//! [`ConstraintTree::Composing`] node that AND-combines its children and
//! optionally collapses their violations into one.

use std::fmt;
use std::sync::Arc;

use validforge_core::{
    BeanType, ConfigurationError, ConstraintDescriptor, ConstraintValidator, GroupId,
    PropertyPath, ValidationError, ValidatorContext, Value, Violation,
};

/// Where and for which group a tree is evaluated.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationScope<'a> {
    pub path: &'a PropertyPath,
    pub group: &'a GroupId,
    pub root_type: BeanType,
    pub leaf_type: BeanType,
}

/// A constraint ready for evaluation.
pub enum ConstraintTree {
    Simple {
        descriptor: Arc<ConstraintDescriptor>,
        validator: Arc<dyn ConstraintValidator>,
    },
    Composing {
        descriptor: Arc<ConstraintDescriptor>,
        validator: Option<Arc<dyn ConstraintValidator>>,
        children: Vec<ConstraintTree>,
        report_as_single: bool,
    },
}

impl ConstraintTree {
    /// Builds the tree for a descriptor and its composing descriptors.
    pub fn build(descriptor: &Arc<ConstraintDescriptor>) -> Result<Self, ConfigurationError> {
        if !descriptor.is_composed() {
            let validator = descriptor
                .validator()
                .cloned()
                .ok_or_else(|| ConfigurationError::MissingValidator(descriptor.name().to_string()))?;
            return Ok(ConstraintTree::Simple {
                descriptor: Arc::clone(descriptor),
                validator,
            });
        }

        let children = descriptor
            .composing()
            .iter()
            .map(ConstraintTree::build)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ConstraintTree::Composing {
            descriptor: Arc::clone(descriptor),
            validator: descriptor.validator().cloned(),
            children,
            report_as_single: descriptor.is_report_as_single(),
        })
    }

    pub fn descriptor(&self) -> &Arc<ConstraintDescriptor> {
        match self {
            ConstraintTree::Simple { descriptor, .. } | ConstraintTree::Composing { descriptor, .. } => {
                descriptor
            }
        }
    }

    pub fn children(&self) -> &[ConstraintTree] {
        match self {
            ConstraintTree::Simple { .. } => &[],
            ConstraintTree::Composing { children, .. } => children,
        }
    }

    /// Evaluates the tree against `value`.
    ///
    /// Children of a composing tree are never skipped after a failure. A
    /// validator fault aborts evaluation.
    pub fn evaluate(
        &self,
        value: &Value<'_>,
        scope: &EvaluationScope<'_>,
    ) -> Result<Vec<Violation>, ValidationError> {
        match self {
            ConstraintTree::Simple {
                descriptor,
                validator,
            } => {
                let mut violations = Vec::new();
                if !check(descriptor, validator.as_ref(), value, scope)? {
                    violations.push(violation(descriptor, value, scope));
                }
                Ok(violations)
            }
            ConstraintTree::Composing {
                descriptor,
                validator,
                children,
                report_as_single,
            } => {
                let mut violations = Vec::new();
                if let Some(validator) = validator {
                    if !check(descriptor, validator.as_ref(), value, scope)? {
                        violations.push(violation(descriptor, value, scope));
                    }
                }
                for child in children {
                    violations.extend(child.evaluate(value, scope)?);
                }
                if *report_as_single && !violations.is_empty() {
                    return Ok(vec![violation(descriptor, value, scope)]);
                }
                Ok(violations)
            }
        }
    }
}

fn check(
    descriptor: &ConstraintDescriptor,
    validator: &dyn ConstraintValidator,
    value: &Value<'_>,
    scope: &EvaluationScope<'_>,
) -> Result<bool, ValidationError> {
    let context = ValidatorContext::new(descriptor, scope.path, scope.group);
    validator
        .is_valid(value, &context)
        .map_err(|source| ValidationError::ValidatorFault {
            constraint: descriptor.name().to_string(),
            path: scope.path.to_string(),
            source,
        })
}

fn violation(
    descriptor: &Arc<ConstraintDescriptor>,
    value: &Value<'_>,
    scope: &EvaluationScope<'_>,
) -> Violation {
    Violation::new(
        Arc::clone(descriptor),
        scope.path.clone(),
        value.describe(),
        scope.root_type,
        scope.leaf_type,
    )
}

impl fmt::Debug for ConstraintTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintTree::Simple { descriptor, .. } => {
                f.debug_tuple("Simple").field(&descriptor.name()).finish()
            }
            ConstraintTree::Composing {
                descriptor,
                children,
                report_as_single,
                ..
            } => f
                .debug_struct("Composing")
                .field("constraint", &descriptor.name())
                .field("children", children)
                .field("report_as_single", report_as_single)
                .finish(),
        }
    }
}
