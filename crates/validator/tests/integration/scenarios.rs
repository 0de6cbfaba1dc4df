//! End-to-end login and registration flows.

use pretty_assertions::assert_eq;
use refined::prelude::*;
use serde_json::json;

fn registration() -> Pipe {
    json().and_then(
        tuple_of([
            ("login", email().or(phone()).shared()),
            ("password", ascii().shared()),
        ])
        .unwrap(),
    )
}

#[test]
fn email_login_keeps_phone_diagnostics() {
    let login = email().or(phone());
    let outcome = login.call(&json!("admin@example.com")).unwrap();

    assert!(outcome.is_valid());
    assert_eq!(login.unpack(&outcome).unwrap(), json!("admin@example.com"));

    let records = outcome.context().errors();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].validator, "Phone");
}

#[test]
fn unknown_login_reports_every_alternative() {
    let login = email().or(phone());
    let outcome = login.call(&json!("not a login")).unwrap();

    assert!(outcome.is_invalid());
    let validators: Vec<_> = outcome.errors().iter().map(|r| r.validator.as_str()).collect();
    assert_eq!(validators, ["Email", "Phone", "Sum(Email,Phone)"]);
    assert!(outcome.as_failure().unwrap().has_tag(NO_MATCHES));
}

#[test]
fn broken_payload_stops_at_parse_step() {
    let pipe = registration();
    let mut ctx = Context::new();
    let outcome = pipe.match_value(&json!("<xml>"), &mut ctx).unwrap();

    assert!(outcome.is_invalid());
    assert_eq!(outcome.validator(), "Json");
    assert_eq!(ctx.steps().len(), 1);
    assert_eq!(ctx.step(0usize), Some(&json!("<xml>")));
    assert!(ctx.attributes().is_empty());
}

#[test]
fn bad_password_is_the_only_attribute_error() {
    let tuple = tuple_of([("email", email().shared()), ("password", ascii().shared())]).unwrap();
    let outcome = tuple.call(&json!(["admin@example.com", "Пароль"])).unwrap();

    let failure = outcome.as_failure().unwrap();
    let failing: Vec<_> = failure.attribute_errors().keys().copied().collect();
    assert_eq!(failing, ["password"]);

    let unpacked = failure.unpack_attributes();
    assert!(!unpacked.contains_key("email"));
    assert_eq!(unpacked["password"], json!({"Ascii": ["Not ASCII"]}));
}

#[test]
fn phone_registration_is_normalized() {
    let pipe = registration();
    let outcome = pipe
        .call(&json!(r#"{"login":"8 (999) 123-33-12","password":"111"}"#))
        .unwrap();

    assert!(outcome.is_valid());
    assert_eq!(pipe.unpack(&outcome).unwrap(), json!(["89991233312", "111"]));
}

#[test]
fn registration_with_messy_keys() {
    let pipe = pipe_of(
        [
            json().shared(),
            normalize_keys_step().shared(),
            tuple_of([("mail_to", email().shared())]).unwrap().shared(),
        ],
        &["parse", "normalize", "fields"],
    )
    .unwrap();

    let mut ctx = Context::new();
    let outcome = pipe
        .match_value(&json!(r#"{" Mail-To ": "admin@example.com"}"#), &mut ctx)
        .unwrap();

    assert!(outcome.is_valid());
    assert_eq!(ctx.step("fields"), Some(&json!({"mail_to": "admin@example.com"})));
    assert_eq!(ctx.trail(), ["Json", "NormalizeKeys", "Tuple(mail_to)"]);
}

#[test]
fn validate_value_surfaces_failure_messages() {
    let err = validate_value(&registration(), &json!(r#"{"login":"?","password":"Пароль"}"#))
        .unwrap_err();
    let ValidationFailure::Invalid(failure) = err else {
        panic!("expected a validation failure");
    };
    assert_eq!(failure.validator(), "Tuple(login,password)");
    assert!(failure.has_tag(INVALID_ATTRIBUTES));
}
