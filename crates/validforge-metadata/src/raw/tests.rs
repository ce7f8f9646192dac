//! Tests for constrained elements and the metadata merger.

use std::collections::HashSet;

use proptest::prelude::*;
use proptest::test_runner::Config;
use validforge_core::{predicate, GroupId, Value};

use super::*;

struct Person;
struct Car;

fn descriptor(name: &str) -> ConstraintDescriptor {
    ConstraintDescriptor::new(name).with_validator(predicate(|v: &Value<'_>| !v.is_null()))
}

fn name_field(source: ConfigurationSource) -> ConstrainedElement {
    ConstrainedElement::field(source, BeanType::of::<Person>(), "name")
}

fn constraint_names(element: &ConstrainedElement) -> Vec<String> {
    element
        .constraints()
        .iter()
        .map(|c| c.descriptor().name().to_string())
        .collect()
}

#[test]
fn test_merge_unions_constraints_and_raises_source() {
    let annotated = name_field(ConfigurationSource::Annotation)
        .constrain(descriptor("NotNull"))
        .unwrap();
    let programmatic = name_field(ConfigurationSource::Api)
        .constrain(descriptor("NotNull"))
        .unwrap()
        .constrain(descriptor("Size"))
        .unwrap();

    let merged = annotated.merge(&programmatic).unwrap();
    assert_eq!(merged.source(), ConfigurationSource::Api);
    assert_eq!(constraint_names(&merged), vec!["NotNull", "Size"]);

    let reversed = programmatic.merge(&annotated).unwrap();
    assert_eq!(reversed.source(), ConfigurationSource::Api);
}

#[test]
fn test_merge_keeps_distinct_groups_apart() {
    let basic = name_field(ConfigurationSource::Annotation)
        .constrain(descriptor("NotNull").with_group("Basic"))
        .unwrap();
    let full = name_field(ConfigurationSource::XmlConstraint)
        .constrain(descriptor("NotNull").with_group("Full"))
        .unwrap();
    let merged = basic.merge(&full).unwrap();
    assert_eq!(merged.constraints().len(), 2);
    assert!(merged
        .constraints()
        .iter()
        .any(|c| c.applies_to(&GroupId::new("Full"))));
}

#[test]
fn test_merge_of_different_fields_fails() {
    let name = name_field(ConfigurationSource::Annotation);
    let email = ConstrainedElement::field(ConfigurationSource::Annotation, BeanType::of::<Person>(), "email");
    let err = name.merge(&email).unwrap_err();
    assert!(matches!(err, ConfigurationError::ElementMismatch { .. }));
}

#[test]
fn test_merge_of_parameters_of_different_executables_fails() {
    let rent = Executable::method::<Car>("rent", 1);
    let sell = Executable::method::<Car>("sell", 1);
    let a = ConstrainedElement::parameter(ConfigurationSource::Annotation, rent.clone(), 0);
    let b = ConstrainedElement::parameter(ConfigurationSource::Annotation, sell, 0);

    let err = a.merge(&b).unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::ParameterMismatch {
            left: "Car#rent(1).arg0".to_string(),
            right: "Car#sell(1).arg0".to_string(),
        }
    );
    assert!(err.to_string().contains("cannot merge parameters of different executables"));

    let other_index = ConstrainedElement::parameter(ConfigurationSource::Annotation, rent, 1);
    let c = ConstrainedElement::parameter(
        ConfigurationSource::Annotation,
        Executable::method::<Car>("rent", 1),
        0,
    );
    assert!(matches!(
        c.merge(&other_index),
        Err(ConfigurationError::ParameterMismatch { .. })
    ));
}

#[test]
fn test_merge_of_same_parameter_unions() {
    let rent = Executable::method::<Car>("rent", 1);
    let a = ConstrainedElement::parameter(ConfigurationSource::Annotation, rent.clone(), 0)
        .constrain(descriptor("NotNull"))
        .unwrap();
    let b = ConstrainedElement::parameter(ConfigurationSource::XmlOverriding, rent, 0)
        .constrain(descriptor("Positive"))
        .unwrap()
        .cascade();
    let merged = a.merge(&b).unwrap();
    assert_eq!(merged.source(), ConfigurationSource::XmlOverriding);
    assert_eq!(merged.constraints().len(), 2);
    assert!(merged.cascading().is_cascading());
    assert_eq!(merged.kind(), ElementKind::Parameter);
}

#[test]
fn test_merge_all_groups_by_location_in_first_seen_order() {
    let email = || ConstrainedElement::field(ConfigurationSource::Annotation, BeanType::of::<Person>(), "email");
    let elements = vec![
        name_field(ConfigurationSource::Annotation)
            .constrain(descriptor("NotNull"))
            .unwrap(),
        email().constrain(descriptor("Email")).unwrap(),
        name_field(ConfigurationSource::Api)
            .constrain(descriptor("Size"))
            .unwrap(),
    ];

    let merged = merge_all(elements).unwrap();
    assert_eq!(merged.len(), 2);
    assert_eq!(constraint_names(&merged[0]), vec!["NotNull", "Size"]);
    assert_eq!(merged[0].source(), ConfigurationSource::Api);
    assert_eq!(constraint_names(&merged[1]), vec!["Email"]);
}

#[test]
fn test_merge_all_folds_type_argument_elements_into_root() {
    let parent = ElementLocation::field(BeanType::of::<Person>(), "nicknames");
    let elements = vec![
        ConstrainedElement::new(ConfigurationSource::Annotation, parent.clone())
            .constrain(descriptor("NotEmpty"))
            .unwrap(),
        ConstrainedElement::type_argument(ConfigurationSource::XmlConstraint, parent.clone(), ContainerElement::Element)
            .constrain(descriptor("NotBlank"))
            .unwrap()
            .cascade(),
    ];

    let merged = merge_all(elements).unwrap();
    assert_eq!(merged.len(), 1);
    let nicknames = &merged[0];
    assert_eq!(nicknames.location(), &parent);
    assert_eq!(nicknames.constraints().len(), 1);
    assert_eq!(nicknames.type_argument_constraints().len(), 1);
    let element_constraint = &nicknames.type_argument_constraints()[0];
    assert_eq!(element_constraint.location().container_path(), vec![ContainerElement::Element]);
    assert!(!nicknames.cascading().is_cascading());
    assert!(nicknames
        .cascading()
        .container_element(ContainerElement::Element)
        .map(CascadingMetaDataBuilder::is_cascading)
        .unwrap_or(false));
}

#[test]
fn test_merge_all_surfaces_conversion_conflicts() {
    let a = name_field(ConfigurationSource::Annotation)
        .with_cascading(CascadingMetaDataBuilder::cascading().with_group_conversion("Default", "A"));
    let b = name_field(ConfigurationSource::Api)
        .with_cascading(CascadingMetaDataBuilder::cascading().with_group_conversion("Default", "B"));
    assert!(matches!(
        merge_all(vec![a, b]),
        Err(ConfigurationError::ConflictingGroupConversion { .. })
    ));
}

const POOL: [&str; 6] = ["NotNull", "NotBlank", "Size", "Email", "Pattern", "Past"];

fn arb_element() -> impl Strategy<Value = ConstrainedElement> {
    (
        prop::sample::select(ConfigurationSource::ALL.to_vec()),
        prop::collection::vec((0..POOL.len(), any::<bool>()), 0..5),
        any::<bool>(),
    )
        .prop_map(|(source, picks, cascades)| {
            let mut element = name_field(source);
            for (index, grouped) in picks {
                let mut d = descriptor(POOL[index]);
                if grouped {
                    d = d.with_group("Extended");
                }
                element = element.constrain(d).unwrap();
            }
            if cascades {
                element = element.cascade();
            }
            element
        })
}

fn constraint_set(element: &ConstrainedElement) -> HashSet<MetaConstraint> {
    element.constraints().iter().cloned().collect()
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn merge_is_associative(a in arb_element(), b in arb_element(), c in arb_element()) {
        let left = a.merge(&b).unwrap().merge(&c).unwrap();
        let right = a.merge(&b.merge(&c).unwrap()).unwrap();
        prop_assert_eq!(constraint_set(&left), constraint_set(&right));
        prop_assert_eq!(left.source(), right.source());
        prop_assert_eq!(left.cascading(), right.cascading());
    }

    #[test]
    fn merge_is_commutative(a in arb_element(), b in arb_element()) {
        let ab = a.merge(&b).unwrap();
        let ba = b.merge(&a).unwrap();
        prop_assert_eq!(constraint_set(&ab), constraint_set(&ba));
        prop_assert_eq!(ab.source(), ba.source());
    }

    #[test]
    fn merge_is_idempotent(a in arb_element()) {
        let aa = a.merge(&a).unwrap();
        prop_assert_eq!(constraint_set(&aa), constraint_set(&a));
        prop_assert_eq!(aa.constraints().len(), a.constraints().len());
        prop_assert_eq!(aa.source(), a.source());
    }

    #[test]
    fn merged_source_is_maximum(a in arb_element(), b in arb_element()) {
        let merged = a.merge(&b).unwrap();
        prop_assert_eq!(merged.source(), std::cmp::max(a.source(), b.source()));
    }
}
