//! Group sequence registry and validation order.

use std::collections::HashMap;

use validforge_core::{ConfigurationError, GroupId, GroupSequence};

/// One step of a validation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderStep {
    /// An independently requested group.
    Group(GroupId),
    /// An expanded sequence; later groups are skipped once one fails.
    Sequence { name: GroupId, groups: Vec<GroupId> },
}

/// Resolved order in which groups are validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOrder {
    steps: Vec<OrderStep>,
}

impl ValidationOrder {
    pub fn steps(&self) -> &[OrderStep] {
        &self.steps
    }
}

/// Registered group sequences by name.
#[derive(Debug, Clone, Default)]
pub struct GroupSequences {
    sequences: HashMap<GroupId, Vec<GroupId>>,
}

impl GroupSequences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a sequence.
    ///
    /// # Errors
    ///
    /// Fails for empty sequences and for names registered twice. Cycles are
    /// reported by [`GroupSequences::check`].
    pub fn register(&mut self, sequence: GroupSequence) -> Result<(), ConfigurationError> {
        if sequence.groups.is_empty() {
            return Err(ConfigurationError::EmptyGroupSequence(sequence.name));
        }
        if self.sequences.contains_key(&sequence.name) {
            return Err(ConfigurationError::DuplicateGroupSequence(sequence.name));
        }
        self.sequences.insert(sequence.name, sequence.groups);
        Ok(())
    }

    /// Verifies that no sequence reaches itself.
    pub fn check(&self) -> Result<(), ConfigurationError> {
        let mut names: Vec<&GroupId> = self.sequences.keys().collect();
        names.sort();
        for name in names {
            self.expand(name)?;
        }
        Ok(())
    }

    pub fn is_sequence(&self, group: &GroupId) -> bool {
        self.sequences.contains_key(group)
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Flattens a sequence into plain groups, expanding nested sequences.
    ///
    /// A name that is not a registered sequence expands to itself.
    pub fn expand(&self, name: &GroupId) -> Result<Vec<GroupId>, ConfigurationError> {
        let mut out = Vec::new();
        let mut stack = Vec::new();
        self.expand_into(name, &mut stack, &mut out)?;
        Ok(out)
    }

    /// Expands every member of `groups`, keeping the first occurrence of
    /// each resulting group.
    pub fn expand_all(&self, groups: &[GroupId]) -> Result<Vec<GroupId>, ConfigurationError> {
        let mut out: Vec<GroupId> = Vec::new();
        for group in groups {
            for expanded in self.expand(group)? {
                if !out.contains(&expanded) {
                    out.push(expanded);
                }
            }
        }
        Ok(out)
    }

    fn expand_into(
        &self,
        name: &GroupId,
        stack: &mut Vec<GroupId>,
        out: &mut Vec<GroupId>,
    ) -> Result<(), ConfigurationError> {
        let Some(members) = self.sequences.get(name) else {
            if !out.contains(name) {
                out.push(name.clone());
            }
            return Ok(());
        };
        if let Some(start) = stack.iter().position(|g| g == name) {
            let mut cycle: Vec<&str> = stack[start..].iter().map(GroupId::name).collect();
            cycle.push(name.name());
            return Err(ConfigurationError::CyclicGroupSequence {
                name: stack[start].clone(),
                cycle: cycle.join(" -> "),
            });
        }
        stack.push(name.clone());
        for member in members {
            self.expand_into(member, stack, out)?;
        }
        stack.pop();
        Ok(())
    }

    /// Resolves requested groups into a validation order.
    ///
    /// No requested groups means the `Default` group.
    pub fn validation_order(&self, requested: &[GroupId]) -> Result<ValidationOrder, ConfigurationError> {
        let default = [GroupId::default_group()];
        let requested = if requested.is_empty() {
            &default[..]
        } else {
            requested
        };

        let mut steps = Vec::with_capacity(requested.len());
        for group in requested {
            if self.is_sequence(group) {
                steps.push(OrderStep::Sequence {
                    name: group.clone(),
                    groups: self.expand(group)?,
                });
            } else {
                let step = OrderStep::Group(group.clone());
                if !steps.contains(&step) {
                    steps.push(step);
                }
            }
        }
        Ok(ValidationOrder { steps })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(name: &'static str) -> GroupId {
        GroupId::new(name)
    }

    #[test]
    fn test_empty_request_means_default() {
        let order = GroupSequences::new().validation_order(&[]).unwrap();
        assert_eq!(order.steps(), &[OrderStep::Group(GroupId::default())]);
    }

    #[test]
    fn test_sequences_expand_nested_members() {
        let mut sequences = GroupSequences::new();
        sequences
            .register(GroupSequence::new("Inner", ["B", "C"]))
            .unwrap();
        sequences
            .register(GroupSequence::new("Outer", ["A", "Inner", "D"]))
            .unwrap();
        sequences.check().unwrap();

        assert_eq!(
            sequences.expand(&g("Outer")).unwrap(),
            vec![g("A"), g("B"), g("C"), g("D")]
        );
        let order = sequences.validation_order(&[g("Outer"), g("Extra")]).unwrap();
        assert_eq!(order.steps().len(), 2);
        assert_eq!(order.steps()[1], OrderStep::Group(g("Extra")));
    }

    #[test]
    fn test_cycles_are_rejected() {
        let mut sequences = GroupSequences::new();
        sequences.register(GroupSequence::new("A", ["B"])).unwrap();
        sequences.register(GroupSequence::new("B", ["C", "A"])).unwrap();

        let err = sequences.check().unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::CyclicGroupSequence {
                name: g("A"),
                cycle: "A -> B -> A".to_string(),
            }
        );
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let mut sequences = GroupSequences::new();
        sequences.register(GroupSequence::new("Loop", ["Loop"])).unwrap();
        assert!(matches!(
            sequences.validation_order(&[g("Loop")]),
            Err(ConfigurationError::CyclicGroupSequence { .. })
        ));
    }

    #[test]
    fn test_empty_and_duplicate_sequences_are_rejected() {
        let mut sequences = GroupSequences::new();
        let empty: [&'static str; 0] = [];
        assert_eq!(
            sequences.register(GroupSequence::new("Nothing", empty)),
            Err(ConfigurationError::EmptyGroupSequence(g("Nothing")))
        );
        sequences.register(GroupSequence::new("Seq", ["A"])).unwrap();
        assert_eq!(
            sequences.register(GroupSequence::new("Seq", ["B"])),
            Err(ConfigurationError::DuplicateGroupSequence(g("Seq")))
        );
    }

    #[test]
    fn test_expand_all_deduplicates() {
        let mut sequences = GroupSequences::new();
        sequences.register(GroupSequence::new("Both", ["A", "B"])).unwrap();
        assert_eq!(
            sequences.expand_all(&[g("A"), g("Both"), GroupId::default()]).unwrap(),
            vec![g("A"), g("B"), GroupId::default()]
        );
    }
}
