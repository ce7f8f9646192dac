//! Per-call validation state.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use validforge_core::{BeanType, GroupId, Identity, IdentitySet, PropertyPath, Violation, Violations};
use validforge_metadata::MetaConstraint;

type EvaluationKey = (Option<Identity>, usize, PropertyPath);

/// State owned by one top-level validation call.
///
/// Visited beans are tracked per group by identity. Shared values handed out
/// by accessors are kept alive until the call ends so that their addresses
/// cannot be reused by later allocations of the same call.
pub struct ValidationContext {
    root_type: BeanType,
    fail_fast: bool,
    visited: HashMap<GroupId, IdentitySet>,
    evaluated: HashSet<EvaluationKey>,
    anchors: Vec<Arc<dyn Any + Send + Sync>>,
    violations: Violations,
    stopped: bool,
}

impl ValidationContext {
    pub fn new(root_type: BeanType, fail_fast: bool) -> Self {
        Self {
            root_type,
            fail_fast,
            visited: HashMap::new(),
            evaluated: HashSet::new(),
            anchors: Vec::new(),
            violations: Violations::new(),
            stopped: false,
        }
    }

    pub fn root_type(&self) -> BeanType {
        self.root_type
    }

    /// Marks a bean as visited in `group`. Returns false if it already was.
    pub fn mark_visited(&mut self, group: &GroupId, identity: Identity) -> bool {
        self.visited
            .entry(group.clone())
            .or_default()
            .insert_identity(identity)
    }

    /// Number of beans visited in `group`.
    pub fn visited_count(&self, group: &GroupId) -> usize {
        self.visited.get(group).map(IdentitySet::len).unwrap_or(0)
    }

    /// Records that `constraint` ran at `path` on the bean `holder`.
    /// Returns false if it already ran.
    pub fn mark_evaluated(
        &mut self,
        holder: Option<Identity>,
        constraint: &MetaConstraint,
        path: &PropertyPath,
    ) -> bool {
        let key = (holder, constraint as *const MetaConstraint as usize, path.clone());
        self.evaluated.insert(key)
    }

    /// Keeps a shared value alive until the call ends.
    pub fn anchor(&mut self, handle: Arc<dyn Any + Send + Sync>) {
        self.anchors.push(handle);
    }

    pub fn add_violations(&mut self, violations: Vec<Violation>) {
        if violations.is_empty() {
            return;
        }
        self.violations.extend(violations);
        if self.fail_fast {
            self.stopped = true;
        }
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    /// Returns true once fail-fast mode has seen a violation.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn into_violations(self) -> Violations {
        let mut violations = self.violations;
        if self.fail_fast {
            violations.truncate(1);
        }
        violations
    }
}
