//! The validator entry points.

use std::any::Any;
use std::sync::Arc;

use tracing::{debug, info};
use validforge_config::{NullRootPolicy, ValidatorConfig};
use validforge_core::{
    BeanType, ConfigurationError, Executable, GroupId, GroupSequence, Identity, ObjectRef, PathNode,
    PropertyPath, Result, ValidationError, Value, Violations,
};
use validforge_metadata::{
    BeanDescriptor, BeanMetaDataManager, BeanRegistry, CascadingMetaDataBuilder, MetaDataProvider,
};

use crate::context::ValidationContext;
use crate::order::{GroupSequences, ValidationOrder};
use crate::traversal::{Traversal, ValueContext};

/// Validates object graphs against merged constraint metadata.
///
/// A validator is immutable and may be shared between threads; every call
/// owns its own traversal state.
///
/// # Example
///
/// ```
/// use validforge_core::{predicate, BeanType, ConfigurationSource, ConstraintDescriptor, Value};
/// use validforge_engine::Validator;
/// use validforge_metadata::{BeanDescriptor, ConstrainedElement, StaticMetaDataProvider};
///
/// struct User {
///     email: String,
/// }
///
/// let not_blank = ConstraintDescriptor::new("NotBlank").with_validator(predicate(|v: &Value<'_>| {
///     v.downcast_ref::<String>().map(|s| !s.trim().is_empty()).unwrap_or(false)
/// }));
/// let provider = StaticMetaDataProvider::new(ConfigurationSource::Api).with_element(
///     ConstrainedElement::field(ConfigurationSource::Api, BeanType::of::<User>(), "email")
///         .constrain(not_blank)
///         .unwrap(),
/// );
///
/// let validator = Validator::builder()
///     .with_bean(BeanDescriptor::of::<User>().property("email", |u: &User| Value::of(&u.email)))
///     .with_provider(provider)
///     .build()
///     .unwrap();
///
/// let violations = validator.validate(&User { email: " ".into() }, &[]).unwrap();
/// assert_eq!(violations.paths(), vec!["email".to_string()]);
/// ```
pub struct Validator {
    manager: Arc<BeanMetaDataManager>,
    sequences: Arc<GroupSequences>,
    config: ValidatorConfig,
}

impl Validator {
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn metadata(&self) -> &BeanMetaDataManager {
        &self.manager
    }

    pub fn group_sequences(&self) -> &GroupSequences {
        &self.sequences
    }

    /// Resolves requested groups against the registered sequences.
    pub fn validation_order(&self, groups: &[GroupId]) -> Result<ValidationOrder> {
        Ok(self.sequences.validation_order(groups)?)
    }

    /// Validates `root` and everything reachable through cascading elements.
    ///
    /// No groups means the `Default` group.
    pub fn validate<T: Any>(&self, root: &T, groups: &[GroupId]) -> Result<Violations> {
        self.validate_value(Value::of(root), groups)
    }

    /// Validates an optional root; `None` follows the null root policy.
    pub fn validate_option<T: Any>(&self, root: Option<&T>, groups: &[GroupId]) -> Result<Violations> {
        self.validate_value(Value::option(root), groups)
    }

    /// Validates a type-erased root value.
    ///
    /// A container root cascades into its elements.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NullRoot`] for a null root unless the
    /// configuration tolerates it, configuration errors discovered while
    /// building metadata, and validator faults.
    pub fn validate_value(&self, root: Value<'_>, groups: &[GroupId]) -> Result<Violations> {
        let root_type = match &root {
            Value::Null => {
                return match self.config.null_root {
                    NullRootPolicy::Reject => Err(ValidationError::NullRoot),
                    NullRootPolicy::Tolerate => Ok(Violations::new()),
                };
            }
            Value::Object(obj) => obj.bean_type(),
            Value::List(_) | Value::Map(_) => container_root_type(&root),
        };

        let order = self.validation_order(groups)?;
        self.execute(root_type, groups, |traversal| {
            traversal.run(&order, |t, group| match &root {
                Value::Object(obj) => t.validate_bean(obj, &PropertyPath::root(), group),
                container => {
                    let elements = CascadingMetaDataBuilder::cascading().build();
                    t.cascade(container, &PropertyPath::root(), &elements, group)
                }
            })
        })
    }

    /// Validates the constraints of one property of `root`, without cascading.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownProperty`] if `root` has no
    /// constrained property called `name`.
    pub fn validate_property<T: Any>(&self, root: &T, name: &str, groups: &[GroupId]) -> Result<Violations> {
        let bean_type = BeanType::of::<T>();
        let meta = self.manager.bean_metadata(bean_type)?;
        let property = meta
            .property(name)
            .ok_or_else(|| ValidationError::UnknownProperty {
                bean: bean_type.to_string(),
                property: name.to_string(),
            })?;
        let value = property.value(root);
        let at = ValueContext::new(
            PropertyPath::root().property(property.name()),
            Some(Identity::of(root)),
            bean_type,
        );

        let order = self.validation_order(groups)?;
        self.execute(bean_type, groups, |traversal| {
            traversal.run(&order, |t, group| {
                let Some(members) = t.redefined_default(&meta, group)? else {
                    return t.validate_element(property.element(), &value, &at, group);
                };
                let before = t.violation_count();
                for member in &members {
                    if t.is_stopped() || t.violation_count() > before {
                        break;
                    }
                    t.validate_element(property.element(), &value, &at, member)?;
                }
                Ok(())
            })
        })
    }

    /// Validates the arguments of a constructor or method call.
    ///
    /// Parameters are validated in order, including their container
    /// elements and cascades, followed by the cross-parameter constraints
    /// which see the whole argument list.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownExecutable`] if nothing is declared
    /// for `executable` and [`ValidationError::ArgumentCount`] if `args` does
    /// not match its arity.
    pub fn validate_parameters(
        &self,
        executable: &Executable,
        args: &[Value<'_>],
        groups: &[GroupId],
    ) -> Result<Violations> {
        let meta = self
            .manager
            .executable_metadata(executable)?
            .ok_or_else(|| ValidationError::UnknownExecutable(executable.to_string()))?;
        if args.len() != executable.parameter_count() {
            return Err(ValidationError::ArgumentCount {
                executable: executable.to_string(),
                expected: executable.parameter_count(),
                actual: args.len(),
            });
        }

        let declaring = executable.declaring_type();
        let base = ValueContext::new(executable_path(executable), None, declaring);
        let cross = base.child(PathNode::CrossParameter);
        let all_args = Value::List(args.to_vec());

        let order = self.validation_order(groups)?;
        self.execute(declaring, groups, |traversal| {
            traversal.run(&order, |t, group| {
                for (parameter, arg) in meta.parameters().iter().zip(args) {
                    let at = base.child(PathNode::Parameter(parameter.name().to_string().into()));
                    t.validate_element(parameter.element(), arg, &at, group)?;
                    let cascading = parameter.element().cascading();
                    if cascading.is_active() {
                        t.cascade(arg, &at.path, cascading, group)?;
                    }
                }
                t.evaluate(meta.cross_parameter_constraints(), &all_args, &cross, group)
            })
        })
    }

    /// Validates the value returned by a constructor or method call.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownExecutable`] if nothing is declared
    /// for `executable`.
    pub fn validate_return_value(
        &self,
        executable: &Executable,
        value: Value<'_>,
        groups: &[GroupId],
    ) -> Result<Violations> {
        let meta = self
            .manager
            .executable_metadata(executable)?
            .ok_or_else(|| ValidationError::UnknownExecutable(executable.to_string()))?;

        let declaring = executable.declaring_type();
        let at = ValueContext::new(executable_path(executable), None, declaring).child(PathNode::ReturnValue);
        let element = meta.return_value();

        let order = self.validation_order(groups)?;
        self.execute(declaring, groups, |traversal| {
            traversal.run(&order, |t, group| {
                t.validate_element(element, &value, &at, group)?;
                if element.cascading().is_active() {
                    t.cascade(&value, &at.path, element.cascading(), group)?;
                }
                Ok(())
            })
        })
    }

    fn execute<F>(&self, root_type: BeanType, groups: &[GroupId], body: F) -> Result<Violations>
    where
        F: FnOnce(&mut Traversal<'_>) -> std::result::Result<(), ValidationError>,
    {
        debug!(event = "validate_start", root = %root_type, groups = ?groups, fail_fast = self.config.fail_fast);
        let ctx = ValidationContext::new(root_type, self.config.fail_fast);
        let mut traversal = Traversal::new(&self.manager, &self.sequences, ctx);
        body(&mut traversal)?;
        let violations = traversal.into_violations();
        debug!(event = "validate_end", root = %root_type, violations = violations.len());
        Ok(violations)
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("metadata", &self.manager)
            .field("group_sequences", &self.sequences.len())
            .field("config", &self.config)
            .finish()
    }
}

/// Type of the first bean held by a container root, or `Value` if it holds none.
fn container_root_type(root: &Value<'_>) -> BeanType {
    let first = match root {
        Value::List(items) => items.iter().find_map(Value::as_object),
        Value::Map(entries) => entries.iter().find_map(|(_, value)| value.as_object()),
        Value::Null | Value::Object(_) => None,
    };
    first
        .map(ObjectRef::bean_type)
        .unwrap_or_else(BeanType::of::<Value<'static>>)
}

fn executable_path(executable: &Executable) -> PropertyPath {
    PropertyPath::root().append(PathNode::Executable(executable.name().into()))
}

/// Assembles a [`Validator`] from bean registrations, metadata providers,
/// group sequences and configuration.
#[derive(Default)]
pub struct ValidatorBuilder {
    registry: BeanRegistry,
    providers: Vec<Arc<dyn MetaDataProvider>>,
    sequences: Vec<GroupSequence>,
    config: ValidatorConfig,
}

impl ValidatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bean(mut self, descriptor: BeanDescriptor) -> Self {
        self.registry.register(descriptor);
        self
    }

    pub fn with_registry(mut self, registry: BeanRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_provider(mut self, provider: impl MetaDataProvider + 'static) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    pub fn with_shared_provider(mut self, provider: Arc<dyn MetaDataProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn with_group_sequence(mut self, sequence: GroupSequence) -> Self {
        self.sequences.push(sequence);
        self
    }

    /// Sets the configuration; its group sequences are registered as well.
    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the validator.
    ///
    /// # Errors
    ///
    /// Fails on empty, duplicate or cyclic group sequences.
    pub fn build(self) -> std::result::Result<Validator, ConfigurationError> {
        let mut sequences = GroupSequences::new();
        for sequence in self.config.sequences().into_iter().chain(self.sequences) {
            sequences.register(sequence)?;
        }
        sequences.check()?;

        info!(
            event = "validator_built",
            beans = self.registry.len(),
            providers = self.providers.len(),
            group_sequences = sequences.len(),
            fail_fast = self.config.fail_fast,
        );

        Ok(Validator {
            manager: Arc::new(BeanMetaDataManager::new(self.registry, self.providers)),
            sequences: Arc::new(sequences),
            config: self.config,
        })
    }
}
