//! Cached access to merged bean metadata.

use std::any::TypeId;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;
use validforge_core::{BeanType, ConfigurationError, Executable, GroupId};

use crate::aggregated::{BeanMetaData, ExecutableMetaData};
use crate::bean::BeanRegistry;
use crate::provider::MetaDataProvider;
use crate::raw::merge_all;

/// Builds and caches [`BeanMetaData`] per type.
///
/// Entries are computed on first use and never invalidated. Builds run
/// outside the map's locks; when two threads build the same type at once the
/// first insert wins.
pub struct BeanMetaDataManager {
    registry: BeanRegistry,
    providers: Vec<Arc<dyn MetaDataProvider>>,
    beans: DashMap<TypeId, Arc<BeanMetaData>>,
    executables: DashMap<Executable, Arc<ExecutableMetaData>>,
}

impl BeanMetaDataManager {
    /// Creates a manager; providers are consulted lowest priority first.
    pub fn new(registry: BeanRegistry, mut providers: Vec<Arc<dyn MetaDataProvider>>) -> Self {
        providers.sort_by_key(|p| p.source());
        Self {
            registry,
            providers,
            beans: DashMap::new(),
            executables: DashMap::new(),
        }
    }

    pub fn registry(&self) -> &BeanRegistry {
        &self.registry
    }

    /// Merged metadata of `bean`.
    ///
    /// A type without registration and without declared elements resolves
    /// to empty metadata.
    pub fn bean_metadata(&self, bean: BeanType) -> Result<Arc<BeanMetaData>, ConfigurationError> {
        if let Some(meta) = self.beans.get(&bean.type_id()) {
            return Ok(Arc::clone(meta.value()));
        }

        let built = Arc::new(self.build(bean)?);
        let entry = self
            .beans
            .entry(bean.type_id())
            .or_insert_with(|| Arc::clone(&built));
        Ok(Arc::clone(entry.value()))
    }

    /// Merged metadata of a constructor or method, if it has any.
    pub fn executable_metadata(
        &self,
        executable: &Executable,
    ) -> Result<Option<Arc<ExecutableMetaData>>, ConfigurationError> {
        if let Some(meta) = self.executables.get(executable) {
            return Ok(Some(Arc::clone(meta.value())));
        }

        let bean = self.bean_metadata(executable.declaring_type())?;
        let Some(meta) = bean.executable(executable) else {
            return Ok(None);
        };
        let entry = self
            .executables
            .entry(executable.clone())
            .or_insert_with(|| Arc::clone(meta));
        Ok(Some(Arc::clone(entry.value())))
    }

    /// Number of cached bean types.
    pub fn cached_count(&self) -> usize {
        self.beans.len()
    }

    fn build(&self, bean: BeanType) -> Result<BeanMetaData, ConfigurationError> {
        let descriptor = self.registry.get(bean.type_id());
        let elements: Vec<_> = self
            .providers
            .iter()
            .flat_map(|p| p.constrained_elements(bean))
            .collect();

        if descriptor.is_none() && elements.is_empty() {
            debug!(event = "bean_unregistered", bean = %bean);
            return Ok(BeanMetaData::empty(bean));
        }

        let merged = merge_all(elements)?;
        let default_sequence: Option<Vec<GroupId>> = self
            .providers
            .iter()
            .rev()
            .find_map(|p| p.default_group_sequence(bean));

        let meta = BeanMetaData::build(bean, descriptor.map(|d| &**d), &merged, default_sequence)?;
        debug!(
            event = "bean_metadata_built",
            bean = %bean,
            class_constraints = meta.class_constraints().len(),
            properties = meta.properties().len(),
            executables = meta.executables().count(),
            redefined_default = meta.default_group_sequence().is_some(),
        );
        Ok(meta)
    }
}

impl std::fmt::Debug for BeanMetaDataManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanMetaDataManager")
            .field("registered", &self.registry.len())
            .field("providers", &self.providers.len())
            .field("cached", &self.beans.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::bean::BeanDescriptor;
    use crate::provider::StaticMetaDataProvider;
    use crate::raw::ConstrainedElement;
    use validforge_core::{predicate, ConfigurationSource, ConstraintDescriptor, Value};

    struct Invoice {
        number: String,
    }

    struct Unregistered;

    struct CountingProvider {
        inner: StaticMetaDataProvider,
        calls: AtomicUsize,
    }

    impl MetaDataProvider for CountingProvider {
        fn source(&self) -> ConfigurationSource {
            self.inner.source()
        }

        fn constrained_elements(&self, bean: BeanType) -> Vec<ConstrainedElement> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.constrained_elements(bean)
        }
    }

    fn not_blank() -> ConstraintDescriptor {
        ConstraintDescriptor::new("NotBlank").with_validator(predicate(|v: &Value<'_>| {
            v.downcast_ref::<String>().map(|s| !s.trim().is_empty()).unwrap_or(false)
        }))
    }

    fn registry() -> BeanRegistry {
        BeanRegistry::new().with_bean(
            BeanDescriptor::of::<Invoice>().property("number", |i: &Invoice| Value::of(&i.number)),
        )
    }

    fn field(source: ConfigurationSource) -> ConstrainedElement {
        ConstrainedElement::field(source, BeanType::of::<Invoice>(), "number")
            .constrain(not_blank())
            .unwrap()
    }

    #[test]
    fn test_metadata_is_built_once() {
        let provider = Arc::new(CountingProvider {
            inner: StaticMetaDataProvider::new(ConfigurationSource::Annotation)
                .with_element(field(ConfigurationSource::Annotation)),
            calls: AtomicUsize::new(0),
        });
        let shared: Arc<dyn MetaDataProvider> = provider.clone();
        let manager = BeanMetaDataManager::new(registry(), vec![shared]);

        let first = manager.bean_metadata(BeanType::of::<Invoice>()).unwrap();
        let second = manager.bean_metadata(BeanType::of::<Invoice>()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(manager.cached_count(), 1);
    }

    #[test]
    fn test_sources_are_merged() {
        let annotation: Arc<dyn MetaDataProvider> = Arc::new(
            StaticMetaDataProvider::new(ConfigurationSource::Annotation)
                .with_element(field(ConfigurationSource::Annotation)),
        );
        let api: Arc<dyn MetaDataProvider> = Arc::new(
            StaticMetaDataProvider::new(ConfigurationSource::Api).with_element(field(ConfigurationSource::Api)),
        );
        let manager = BeanMetaDataManager::new(registry(), vec![api, annotation]);

        let meta = manager.bean_metadata(BeanType::of::<Invoice>()).unwrap();
        assert_eq!(meta.properties().len(), 1);
        assert_eq!(meta.properties()[0].element().constraints().len(), 1);
    }

    #[test]
    fn test_highest_priority_default_sequence_wins() {
        let bean = BeanType::of::<Invoice>();
        let annotation: Arc<dyn MetaDataProvider> = Arc::new(
            StaticMetaDataProvider::new(ConfigurationSource::Annotation)
                .with_default_group_sequence(bean, ["A", "Default"]),
        );
        let xml: Arc<dyn MetaDataProvider> = Arc::new(
            StaticMetaDataProvider::new(ConfigurationSource::XmlOverriding)
                .with_default_group_sequence(bean, ["B", "Default"]),
        );
        let manager = BeanMetaDataManager::new(registry(), vec![xml, annotation]);
        let meta = manager.bean_metadata(bean).unwrap();
        assert_eq!(
            meta.default_group_sequence(),
            Some(&[GroupId::new("B"), GroupId::default()][..])
        );
    }

    #[test]
    fn test_unregistered_type_resolves_to_empty_metadata() {
        let manager = BeanMetaDataManager::new(BeanRegistry::new(), Vec::new());
        let meta = manager.bean_metadata(BeanType::of::<Unregistered>()).unwrap();
        assert!(meta.is_empty());
    }

    #[test]
    fn test_executable_metadata_lookup() {
        let pay = Executable::method::<Invoice>("pay", 1);
        let provider: Arc<dyn MetaDataProvider> = Arc::new(
            StaticMetaDataProvider::new(ConfigurationSource::Annotation).with_element(
                ConstrainedElement::parameter(ConfigurationSource::Annotation, pay.clone(), 0)
                    .constrain(not_blank())
                    .unwrap(),
            ),
        );
        let manager = BeanMetaDataManager::new(registry(), vec![provider]);

        let exec = manager.executable_metadata(&pay).unwrap().unwrap();
        assert_eq!(exec.parameters().len(), 1);
        let again = manager.executable_metadata(&pay).unwrap().unwrap();
        assert!(Arc::ptr_eq(&exec, &again));

        let unknown = Executable::method::<Invoice>("void", 0);
        assert!(manager.executable_metadata(&unknown).unwrap().is_none());
    }
}
