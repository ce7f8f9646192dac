//! Graph traversal: constraint evaluation and cascading descent.

use tracing::trace;
use validforge_core::{
    BeanType, GroupId, Identity, ObjectRef, PathNode, PropertyPath, ValidationError, Value,
    Violations,
};
use validforge_metadata::{
    BeanMetaData, BeanMetaDataManager, CascadingMetaData, ContainerElement, ElementMetaData,
    EvaluationScope, MetaConstraint,
};

use crate::context::ValidationContext;
use crate::order::{GroupSequences, OrderStep, ValidationOrder};

/// Position of the value currently being validated.
#[derive(Debug, Clone)]
pub struct ValueContext {
    /// Path from the root to the value.
    pub path: PropertyPath,
    /// Bean holding the value; `None` for executable arguments.
    pub holder: Option<Identity>,
    /// Type of the bean holding the value.
    pub leaf_type: BeanType,
}

impl ValueContext {
    pub fn new(path: PropertyPath, holder: Option<Identity>, leaf_type: BeanType) -> Self {
        Self {
            path,
            holder,
            leaf_type,
        }
    }

    /// Same holder, path extended by `node`.
    pub fn child(&self, node: PathNode) -> Self {
        Self {
            path: self.path.append(node),
            holder: self.holder,
            leaf_type: self.leaf_type,
        }
    }
}

/// Walks one object graph for one validation call.
pub(crate) struct Traversal<'e> {
    manager: &'e BeanMetaDataManager,
    sequences: &'e GroupSequences,
    ctx: ValidationContext,
}

impl<'e> Traversal<'e> {
    pub(crate) fn new(
        manager: &'e BeanMetaDataManager,
        sequences: &'e GroupSequences,
        ctx: ValidationContext,
    ) -> Self {
        Self {
            manager,
            sequences,
            ctx,
        }
    }

    pub(crate) fn into_violations(self) -> Violations {
        self.ctx.into_violations()
    }

    /// Runs `step` for every group of `order`.
    ///
    /// Sequence steps stop at the first group that adds violations.
    pub(crate) fn run<F>(&mut self, order: &ValidationOrder, mut step: F) -> Result<(), ValidationError>
    where
        F: FnMut(&mut Self, &GroupId) -> Result<(), ValidationError>,
    {
        for order_step in order.steps() {
            if self.ctx.is_stopped() {
                break;
            }
            match order_step {
                OrderStep::Group(group) => step(self, group)?,
                OrderStep::Sequence { name, groups } => {
                    let before = self.ctx.violation_count();
                    for group in groups {
                        if self.ctx.is_stopped() {
                            break;
                        }
                        step(self, group)?;
                        if self.ctx.violation_count() > before {
                            trace!(event = "sequence_short_circuit", sequence = %name, group = %group);
                            break;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Groups to validate on `meta` when `group` is requested.
    ///
    /// `Default` on a bean with a redefined default sequence yields that
    /// sequence, expanded.
    pub(crate) fn redefined_default(
        &self,
        meta: &BeanMetaData,
        group: &GroupId,
    ) -> Result<Option<Vec<GroupId>>, ValidationError> {
        match meta.default_group_sequence() {
            Some(sequence) if group.is_default() => Ok(Some(self.sequences.expand_all(sequence)?)),
            _ => Ok(None),
        }
    }

    /// Validates a bean reached at `path` in `group`: its own constraints,
    /// then its cascades.
    ///
    /// A redefined default sequence orders the bean's own constraints only.
    /// Cascaded beans see `group`, changed only by group conversion.
    pub(crate) fn validate_bean(
        &mut self,
        obj: &ObjectRef<'_>,
        path: &PropertyPath,
        group: &GroupId,
    ) -> Result<(), ValidationError> {
        if self.ctx.is_stopped() {
            return Ok(());
        }
        let identity = obj.identity();
        if !self.ctx.mark_visited(group, identity) {
            trace!(event = "cycle_truncated", bean = %obj.bean_type(), path = %path, group = %group);
            return Ok(());
        }
        if let Some(handle) = obj.shared_handle() {
            self.ctx.anchor(handle);
        }

        let meta = self.manager.bean_metadata(obj.bean_type())?;
        let at = ValueContext::new(path.clone(), Some(identity), meta.bean_type());
        let bean = obj.as_any();
        let values: Vec<Value<'_>> = meta.properties().iter().map(|p| p.value(bean)).collect();

        match self.redefined_default(&meta, group)? {
            None => self.validate_bean_constraints(obj, &meta, &values, &at, group)?,
            Some(members) => {
                let before = self.ctx.violation_count();
                for member in &members {
                    if self.ctx.is_stopped() || self.ctx.violation_count() > before {
                        break;
                    }
                    if member != group && !self.ctx.mark_visited(member, identity) {
                        continue;
                    }
                    self.validate_bean_constraints(obj, &meta, &values, &at, member)?;
                }
            }
        }

        for (property, value) in meta.properties().iter().zip(&values) {
            let cascading = property.element().cascading();
            if cascading.is_active() {
                self.cascade(value, &path.property(property.name()), cascading, group)?;
            }
        }
        Ok(())
    }

    /// Class constraints, then properties in declaration order.
    fn validate_bean_constraints(
        &mut self,
        obj: &ObjectRef<'_>,
        meta: &BeanMetaData,
        values: &[Value<'_>],
        at: &ValueContext,
        group: &GroupId,
    ) -> Result<(), ValidationError> {
        self.evaluate(meta.class_constraints(), &Value::Object(obj.clone()), at, group)?;
        for (property, value) in meta.properties().iter().zip(values) {
            let at = at.child(PathNode::Property(property.name().into()));
            self.validate_element(property.element(), value, &at, group)?;
        }
        Ok(())
    }

    /// Constraints on a value and on its container elements; no cascading.
    pub(crate) fn validate_element(
        &mut self,
        element: &ElementMetaData,
        value: &Value<'_>,
        at: &ValueContext,
        group: &GroupId,
    ) -> Result<(), ValidationError> {
        self.evaluate(element.constraints(), value, at, group)?;
        let container: Vec<&MetaConstraint> = element.container_constraints().iter().collect();
        self.validate_container(&container, 0, value, at, group)
    }

    /// Evaluates type-argument constraints whose container path continues
    /// at `depth` against the elements of `value`.
    fn validate_container(
        &mut self,
        constraints: &[&MetaConstraint],
        depth: usize,
        value: &Value<'_>,
        at: &ValueContext,
        group: &GroupId,
    ) -> Result<(), ValidationError> {
        if constraints.is_empty() {
            return Ok(());
        }
        match value {
            Value::List(items) => {
                let elements = select(constraints, depth, ContainerElement::Element);
                for (index, item) in items.iter().enumerate() {
                    let at = at.child(PathNode::Index(index));
                    self.validate_container_level(&elements, depth, item, &at, group)?;
                }
            }
            Value::Map(entries) => {
                let values = select(constraints, depth, ContainerElement::MapValue);
                let keys = select(constraints, depth, ContainerElement::MapKey);
                for (key, item) in entries {
                    let entry = at.child(PathNode::Key(map_key(key)));
                    self.validate_container_level(&values, depth, item, &entry, group)?;
                    let key_at = entry.child(PathNode::MapKey);
                    self.validate_container_level(&keys, depth, key, &key_at, group)?;
                }
            }
            Value::Null | Value::Object(_) => {}
        }
        Ok(())
    }

    fn validate_container_level(
        &mut self,
        constraints: &[&MetaConstraint],
        depth: usize,
        value: &Value<'_>,
        at: &ValueContext,
        group: &GroupId,
    ) -> Result<(), ValidationError> {
        let (here, deeper): (Vec<&MetaConstraint>, Vec<&MetaConstraint>) = constraints
            .iter()
            .copied()
            .partition(|mc| mc.location().container_path().len() == depth + 1);
        self.evaluate(here, value, at, group)?;
        self.validate_container(&deeper, depth + 1, value, at, group)
    }

    /// Descends into a cascading value.
    ///
    /// Lists and maps without container-element metadata cascade into their
    /// elements (map values only) when the element itself is cascading.
    pub(crate) fn cascade(
        &mut self,
        value: &Value<'_>,
        path: &PropertyPath,
        meta: &CascadingMetaData,
        group: &GroupId,
    ) -> Result<(), ValidationError> {
        if self.ctx.is_stopped() {
            return Ok(());
        }
        match value {
            Value::Null => {}
            Value::Object(obj) => {
                if meta.is_cascading() {
                    let converted = meta.convert_group(group);
                    trace!(event = "cascade", path = %path, group = %converted);
                    self.validate_bean(obj, path, &converted)?;
                }
            }
            Value::List(items) => {
                if let Some(element) = element_cascading(meta, ContainerElement::Element) {
                    for (index, item) in items.iter().enumerate() {
                        self.cascade(item, &path.index(index), element, group)?;
                    }
                }
            }
            Value::Map(entries) => {
                let values = element_cascading(meta, ContainerElement::MapValue);
                let keys = meta.container_element(ContainerElement::MapKey);
                for (key, item) in entries {
                    let entry = path.key(map_key(key));
                    if let Some(values) = values {
                        self.cascade(item, &entry, values, group)?;
                    }
                    if let Some(keys) = keys {
                        self.cascade(key, &entry.append(PathNode::MapKey), keys, group)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Evaluates the constraints of `group` on one value.
    ///
    /// A constraint runs at most once per holder and path within a call.
    pub(crate) fn evaluate<'c>(
        &mut self,
        constraints: impl IntoIterator<Item = &'c MetaConstraint>,
        value: &Value<'_>,
        at: &ValueContext,
        group: &GroupId,
    ) -> Result<(), ValidationError> {
        for constraint in constraints {
            if self.ctx.is_stopped() {
                break;
            }
            if !constraint.applies_to(group) {
                continue;
            }
            if !self.ctx.mark_evaluated(at.holder, constraint, &at.path) {
                continue;
            }
            let scope = EvaluationScope {
                path: &at.path,
                group,
                root_type: self.ctx.root_type(),
                leaf_type: at.leaf_type,
            };
            let violations = constraint.tree().evaluate(value, &scope)?;
            self.ctx.add_violations(violations);
        }
        Ok(())
    }

    pub(crate) fn violation_count(&self) -> usize {
        self.ctx.violation_count()
    }

    pub(crate) fn is_stopped(&self) -> bool {
        self.ctx.is_stopped()
    }
}

fn select<'c>(
    constraints: &[&'c MetaConstraint],
    depth: usize,
    element: ContainerElement,
) -> Vec<&'c MetaConstraint> {
    constraints
        .iter()
        .copied()
        .filter(|mc| mc.location().container_path().get(depth) == Some(&element))
        .collect()
}

fn element_cascading(meta: &CascadingMetaData, element: ContainerElement) -> Option<&CascadingMetaData> {
    meta.container_element(element)
        .or_else(|| meta.is_cascading().then_some(meta))
}

fn map_key(key: &Value<'_>) -> String {
    key.describe().unwrap_or_else(|| "null".to_string())
}

#[cfg(test)]
mod tests;
