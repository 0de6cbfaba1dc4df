use pretty_assertions::assert_eq;
use refined::prelude::*;
use serde_json::json;

fn credentials() -> Tuple {
    tuple_of([("login", email().or(phone()).shared()), ("password", ascii().shared())]).unwrap()
}

#[test]
fn positional_and_named_inputs_are_equivalent() {
    let tuple = credentials();
    let positional = tuple.call(&json!(["admin@example.com", "secret"])).unwrap();
    let named = tuple
        .call(&json!({"password": "secret", "login": "admin@example.com"}))
        .unwrap();

    assert_eq!(tuple.unpack(&positional).unwrap(), tuple.unpack(&named).unwrap());
}

#[test]
fn nested_outcomes_are_recorded_per_attribute() {
    let tuple = credentials();
    let mut ctx = Context::new();
    tuple
        .match_value(&json!(["8 (999) 123-33-12", "secret"]), &mut ctx)
        .unwrap();

    let login = ctx.attribute("login").unwrap();
    assert_eq!(login.validator(), "Phone");
    assert!(ctx.attribute("password").unwrap().is_valid());
}

#[test]
fn all_attributes_fail_independently() {
    let outcome = credentials().call(&json!(["?", "Пароль"])).unwrap();
    let failure = outcome.as_failure().unwrap();

    let merged = failure.errors_by_validator();
    let validators: Vec<_> = merged.keys().copied().collect();
    assert_eq!(
        validators,
        ["Email", "Phone", "Sum(Email,Phone)", "Ascii", "Tuple(login,password)"]
    );
}

#[test]
fn arity_mismatch_is_an_error_not_a_failure() {
    let err = credentials().call(&json!(["admin@example.com"])).unwrap_err();
    assert!(matches!(err, ContractError::Arity { expected: 2, given: 1, .. }));
}

#[test]
fn unpack_on_failed_tuple_is_misuse() {
    let tuple = credentials();
    let outcome = tuple.call(&json!(["?", "ok"])).unwrap();
    assert!(matches!(
        tuple.unpack(&outcome),
        Err(ContractError::UnpackOnInvalid { .. })
    ));
}

#[test]
fn nested_tuple_extends_outer_attributes() {
    let address = tuple_of([("city", ascii().shared()), ("street", ascii().shared())]).unwrap();
    let person = tuple_of([("email", email().shared()), ("address", address.shared())]).unwrap();

    let mut ctx = Context::new();
    let input = json!({
        "email": "admin@example.com",
        "address": {"city": "Москва", "street": "Tverskaya"},
    });
    let outcome = person.match_value(&input, &mut ctx).unwrap();

    let recorded: Vec<_> = ctx.attributes().keys().map(String::as_str).collect();
    assert_eq!(recorded, ["email", "address.city", "address.street", "address"]);
    assert!(ctx.attribute("email").unwrap().is_valid());
    assert!(ctx.attribute("address.city").unwrap().is_invalid());
    assert!(ctx.attribute("address.street").unwrap().is_valid());

    let failure = outcome.as_failure().unwrap();
    let failing: Vec<_> = failure.attribute_errors().keys().copied().collect();
    assert_eq!(failing, ["address"]);
}

fn wide_tuple(width: usize) -> Tuple {
    Tuple::new((0..width).map(|i| (format!("field_{i}"), ascii().shared()))).unwrap()
}

fn serialized_len(width: usize, value: &str) -> usize {
    let outcome = wide_tuple(width).call(&json!(vec![value; width])).unwrap();
    for recorded in outcome.context().attributes().values() {
        assert!(recorded.context().is_empty());
    }
    serde_json::to_string(&outcome).unwrap().len()
}

#[test]
fn wide_tuple_outcome_grows_linearly() {
    for value in ["ok", "Пароль"] {
        let narrow = serialized_len(15, value);
        let wide = serialized_len(30, value);
        assert!(wide < narrow * 3, "{value}: 15 fields = {narrow} bytes, 30 fields = {wide} bytes");
    }
}

#[test]
fn thirty_failing_attributes_are_all_reported() {
    let outcome = wide_tuple(30).call(&json!(vec!["Пароль"; 30])).unwrap();
    let failure = outcome.as_failure().unwrap();

    assert_eq!(failure.attribute_errors().len(), 30);
    assert_eq!(failure.errors().len(), 31);
    assert!(failure.attribute_errors().values().all(|o| o.context().is_empty()));
}
