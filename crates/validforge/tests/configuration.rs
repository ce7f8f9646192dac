//! Integration tests for configuration-driven validators.

use std::io::Write;

use validforge::prelude::*;
use validforge_test::constraints::{always_invalid, counting, Counter};
use validforge_test::person::{person_provider, registry, Address, Person};

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

#[test]
fn test_sequence_declared_in_config_file() {
    let file = write_config(
        r#"
        [[group_sequences]]
        name = "Checkout"
        groups = ["Basic", "Payment"]
        "#,
    );

    let payment = Counter::new();
    let source = ConfigurationSource::Api;
    let provider = StaticMetaDataProvider::new(source).with_element(
        ConstrainedElement::field(source, BeanType::of::<Person>(), "name")
            .constrain(always_invalid("BasicCheck").with_group("Basic"))
            .unwrap()
            .constrain(counting("PaymentCheck", &payment, true).with_group("Payment"))
            .unwrap(),
    );

    let validator = ValidatorFactory::from_file(file.path())
        .unwrap()
        .with_registry(registry())
        .with_provider(provider)
        .build()
        .unwrap();

    let violations = validator
        .validate(&Person::named("Ada"), &[GroupId::new("Checkout")])
        .unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(payment.count(), 0);
}

#[test]
fn test_fail_fast_from_config_file() {
    let file = write_config("fail_fast = true\n");
    let validator = ValidatorFactory::configure_from(file.path())
        .with_registry(registry())
        .with_provider(person_provider())
        .build()
        .unwrap();

    let person = Person::anonymous().with_address(Address::new(None, "Lyon"));
    let violations = validator.validate(&person, &[]).unwrap();
    assert_eq!(violations.len(), 1);
}

#[test]
fn test_cyclic_sequence_in_config_is_rejected() {
    let file = write_config(
        r#"
        [[group_sequences]]
        name = "A"
        groups = ["B"]

        [[group_sequences]]
        name = "B"
        groups = ["A"]
        "#,
    );
    let result = ValidatorFactory::from_file(file.path()).unwrap().build();
    assert!(matches!(
        result,
        Err(validforge::ConfigurationError::CyclicGroupSequence { .. })
    ));
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
}
