//! Sources of raw constraint metadata.

use std::collections::HashMap;

use validforge_core::{BeanType, ConfigurationSource, GroupId};

use crate::raw::ConstrainedElement;

/// Delivers unmerged metadata for bean types from one configuration source.
pub trait MetaDataProvider: Send + Sync {
    /// The configuration source this provider reads.
    fn source(&self) -> ConfigurationSource;

    /// Declared elements of `bean`, in declaration order.
    fn constrained_elements(&self, bean: BeanType) -> Vec<ConstrainedElement>;

    /// A redefined default group sequence for `bean`, if declared.
    fn default_group_sequence(&self, _bean: BeanType) -> Option<Vec<GroupId>> {
        None
    }
}

/// Provider backed by elements registered up front.
///
/// Used for programmatic declarations and in tests.
#[derive(Debug, Default)]
pub struct StaticMetaDataProvider {
    source: ConfigurationSource,
    elements: HashMap<BeanType, Vec<ConstrainedElement>>,
    default_sequences: HashMap<BeanType, Vec<GroupId>>,
}

impl StaticMetaDataProvider {
    pub fn new(source: ConfigurationSource) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }

    /// Registers an element under its declaring type.
    pub fn add_element(&mut self, element: ConstrainedElement) {
        let bean = element.location().declaring_type();
        self.elements.entry(bean).or_default().push(element);
    }

    pub fn with_element(mut self, element: ConstrainedElement) -> Self {
        self.add_element(element);
        self
    }

    pub fn with_elements(mut self, elements: impl IntoIterator<Item = ConstrainedElement>) -> Self {
        for element in elements {
            self.add_element(element);
        }
        self
    }

    /// Redefines the default group sequence of `bean`.
    pub fn with_default_group_sequence<I, G>(mut self, bean: BeanType, groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: Into<GroupId>,
    {
        self.default_sequences
            .insert(bean, groups.into_iter().map(Into::into).collect());
        self
    }

    /// Number of bean types with registered elements.
    pub fn bean_count(&self) -> usize {
        self.elements.len()
    }
}

impl MetaDataProvider for StaticMetaDataProvider {
    fn source(&self) -> ConfigurationSource {
        self.source
    }

    fn constrained_elements(&self, bean: BeanType) -> Vec<ConstrainedElement> {
        self.elements.get(&bean).cloned().unwrap_or_default()
    }

    fn default_group_sequence(&self, bean: BeanType) -> Option<Vec<GroupId>> {
        self.default_sequences.get(&bean).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validforge_core::Executable;

    struct Order;
    struct Customer;

    #[test]
    fn test_elements_are_keyed_by_declaring_type() {
        let provider = StaticMetaDataProvider::new(ConfigurationSource::Api)
            .with_element(ConstrainedElement::field(
                ConfigurationSource::Api,
                BeanType::of::<Order>(),
                "total",
            ))
            .with_element(ConstrainedElement::parameter(
                ConfigurationSource::Api,
                Executable::method::<Order>("ship", 1),
                0,
            ))
            .with_element(ConstrainedElement::field(
                ConfigurationSource::Api,
                BeanType::of::<Customer>(),
                "name",
            ));

        assert_eq!(provider.source(), ConfigurationSource::Api);
        assert_eq!(provider.bean_count(), 2);
        assert_eq!(provider.constrained_elements(BeanType::of::<Order>()).len(), 2);
        assert!(provider.default_group_sequence(BeanType::of::<Order>()).is_none());
    }

    #[test]
    fn test_default_group_sequence() {
        let provider = StaticMetaDataProvider::new(ConfigurationSource::Annotation)
            .with_default_group_sequence(BeanType::of::<Order>(), ["Basic", "Default"]);
        assert_eq!(
            provider.default_group_sequence(BeanType::of::<Order>()),
            Some(vec![GroupId::new("Basic"), GroupId::default()])
        );
    }
}
