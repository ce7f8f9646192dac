use std::sync::Arc;

use validforge_core::{BeanType, ConfigurationSource, GroupId, PropertyPath, Value, Violations};
use validforge_metadata::{
    BeanMetaDataManager, CascadingMetaDataBuilder, ConstrainedElement, MetaDataProvider,
    StaticMetaDataProvider,
};
use validforge_test::constraints::{counting, not_null, Counter};
use validforge_test::person::{person_provider, registry, Address, Person};

use super::*;
use crate::context::ValidationContext;
use crate::order::GroupSequences;

fn manager(provider: impl MetaDataProvider + 'static) -> BeanMetaDataManager {
    let provider: Arc<dyn MetaDataProvider> = Arc::new(provider);
    BeanMetaDataManager::new(registry(), vec![provider])
}

fn run_bean(manager: &BeanMetaDataManager, person: &Person, group: &GroupId) -> Violations {
    let sequences = GroupSequences::new();
    let ctx = ValidationContext::new(BeanType::of::<Person>(), false);
    let mut traversal = Traversal::new(manager, &sequences, ctx);
    let root = Value::of(person);
    let obj = root.as_object().unwrap();
    traversal.validate_bean(obj, &PropertyPath::root(), group).unwrap();
    traversal.into_violations()
}

#[test]
fn test_container_element_paths() {
    let manager = manager(person_provider());
    let person = Person::named("Ada")
        .with_nickname("Countess")
        .with_nickname("  ")
        .with_score(" ", 3);

    let violations = run_bean(&manager, &person, &GroupId::default());
    assert_eq!(
        violations.paths(),
        vec!["nicknames[1]".to_string(), "scores[ ].<map key>".to_string()]
    );
    assert_eq!(violations.by_constraint("NotBlank").count(), 2);
}

#[test]
fn test_cascade_skips_null_values() {
    let manager = manager(person_provider());
    let violations = run_bean(&manager, &Person::named("Ada"), &GroupId::default());
    assert!(violations.is_empty());
}

#[test]
fn test_constraints_of_other_groups_are_skipped() {
    let counter = Counter::new();
    let provider = StaticMetaDataProvider::new(ConfigurationSource::Api).with_element(
        ConstrainedElement::field(ConfigurationSource::Api, BeanType::of::<Person>(), "name")
            .constrain(counting("Strict", &counter, false).with_group("Strict"))
            .unwrap(),
    );
    let manager = manager(provider);

    assert!(run_bean(&manager, &Person::named("Ada"), &GroupId::default()).is_empty());
    assert_eq!(counter.count(), 0);

    let violations = run_bean(&manager, &Person::named("Ada"), &GroupId::new("Strict"));
    assert_eq!(violations.len(), 1);
    assert_eq!(counter.count(), 1);
}

#[test]
fn test_constraint_in_several_groups_runs_once_per_bean() {
    let counter = Counter::new();
    let provider = StaticMetaDataProvider::new(ConfigurationSource::Api).with_element(
        ConstrainedElement::field(ConfigurationSource::Api, BeanType::of::<Person>(), "name")
            .constrain(
                counting("Shared", &counter, false)
                    .with_group("A")
                    .with_group("B"),
            )
            .unwrap(),
    );
    let manager = manager(provider);
    let sequences = GroupSequences::new();
    let order = sequences
        .validation_order(&[GroupId::new("A"), GroupId::new("B")])
        .unwrap();

    let person = Person::named("Ada");
    let root = Value::of(&person);
    let ctx = ValidationContext::new(BeanType::of::<Person>(), false);
    let mut traversal = Traversal::new(&manager, &sequences, ctx);
    traversal
        .run(&order, |t, group| {
            t.validate_bean(root.as_object().unwrap(), &PropertyPath::root(), group)
        })
        .unwrap();

    assert_eq!(traversal.into_violations().len(), 1);
    assert_eq!(counter.count(), 1);
}

#[test]
fn test_group_conversion_on_cascade() {
    let person_type = BeanType::of::<Person>();
    let address_type = BeanType::of::<Address>();
    let source = ConfigurationSource::Api;
    let provider = StaticMetaDataProvider::new(source)
        .with_element(
            ConstrainedElement::field(source, person_type, "address")
                .with_cascading(CascadingMetaDataBuilder::cascading().with_group_conversion("Default", "Postal")),
        )
        .with_element(
            ConstrainedElement::field(source, address_type, "street")
                .constrain(not_null().with_group("Postal"))
                .unwrap(),
        );
    let manager = manager(provider);
    let person = Person::named("Ada").with_address(Address::new(None, "London"));

    let violations = run_bean(&manager, &person, &GroupId::default());
    assert_eq!(violations.paths(), vec!["address.street".to_string()]);
}

#[test]
fn test_list_cascade_uses_container_element_metadata() {
    struct Team {
        members: Vec<Address>,
    }

    let team_type = BeanType::of::<Team>();
    let source = ConfigurationSource::Api;
    let provider = StaticMetaDataProvider::new(source)
        .with_element(
            ConstrainedElement::field(source, team_type, "members").with_cascading(
                CascadingMetaDataBuilder::non_cascading()
                    .with_container_element(ContainerElement::Element, CascadingMetaDataBuilder::cascading()),
            ),
        )
        .with_element(
            ConstrainedElement::field(source, BeanType::of::<Address>(), "street")
                .constrain(not_null())
                .unwrap(),
        );
    let registry = registry().with_bean(
        validforge_metadata::BeanDescriptor::of::<Team>()
            .property("members", |t: &Team| Value::list_of(&t.members)),
    );
    let provider: Arc<dyn MetaDataProvider> = Arc::new(provider);
    let manager = BeanMetaDataManager::new(registry, vec![provider]);
    let team = Team {
        members: vec![Address::new(Some("Main St"), "Oslo"), Address::new(None, "Oslo")],
    };

    let sequences = GroupSequences::new();
    let ctx = ValidationContext::new(team_type, false);
    let mut traversal = Traversal::new(&manager, &sequences, ctx);
    let root = Value::of(&team);
    traversal
        .validate_bean(root.as_object().unwrap(), &PropertyPath::root(), &GroupId::default())
        .unwrap();

    let violations = traversal.into_violations();
    assert_eq!(violations.paths(), vec!["members[1].street".to_string()]);
    let violation = violations.iter().next().unwrap();
    assert_eq!(violation.root_type, team_type);
    assert_eq!(violation.leaf_type, BeanType::of::<Address>());
}
