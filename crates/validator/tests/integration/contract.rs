use pretty_assertions::assert_eq;
use refined::prelude::*;
use serde_json::{Value, json};

fn domestic() -> SharedValidator {
    from_fn("Domestic", |parcel: &Value, _: &mut Context| {
        Ok(if parcel["to"] == "RU" {
            Verdict::AcceptAs(json!({"mass": parcel["weight"], "mail-to": parcel["to"]}))
        } else {
            Verdict::Reject(ValidationError::structured("non_domestic_parcel"))
        })
    })
    .shared()
}

fn international() -> SharedValidator {
    from_fn("International", |parcel: &Value, _: &mut Context| {
        Ok(if parcel["to"] == "RU" {
            Verdict::Reject(ValidationError::structured("parcel_is_not_international"))
        } else {
            Verdict::AcceptAs(json!({"mass": parcel["weight"], "mail-direct": parcel["to"]}))
        })
    })
    .shared()
}

fn rate() -> SharedValidator {
    from_fn("Rate", |response: &Value, _: &mut Context| {
        Ok(response.get("total-rate").is_some_and(Value::is_number))
    })
    .shared()
}

fn tariffs() -> Contract {
    contract_of([(domestic(), rate()), (international(), rate())]).unwrap()
}

#[test]
fn domestic_parcel_is_priced_with_domestic_request() {
    let mut ctx = Context::new();
    let outcome = tariffs()
        .match_with(&json!({"to": "RU", "weight": 250}), &mut ctx, |request| {
            assert_eq!(request, &json!({"mass": 250, "mail-to": "RU"}));
            Ok(json!({"total-rate": 120}))
        })
        .unwrap();

    assert!(outcome.is_valid());
    assert_eq!(ctx.step(INPUT_STEP), Some(&json!({"to": "RU", "weight": 250})));
    assert_eq!(ctx.step(OUTPUT_STEP), Some(&json!({"total-rate": 120})));
}

#[test]
fn service_error_becomes_a_failure() {
    let outcome = tariffs()
        .call(&json!({"to": "DE", "weight": 1}), |_| Err("503 Service Unavailable".into()))
        .unwrap();

    assert!(outcome.is_invalid());
    let reason = &outcome.errors()[0].errors[0];
    assert!(reason.is_exception());
    assert_eq!(reason.message, "503 Service Unavailable");
}

#[test]
fn malformed_response_fails_output_step() {
    let outcome = tariffs()
        .call(&json!({"to": "DE", "weight": 1}), |_| Ok(json!({"total-rate": "n/a"})))
        .unwrap();
    assert!(outcome.is_invalid());
    assert_eq!(outcome.validator(), "Rate");
}

#[test]
fn bound_contract_composes_like_a_validator() {
    let lookup = Contract::new(email().shared(), json().shared())
        .named("UserLookup")
        .bind(|email| Ok(json!(format!(r#"{{"id": 7, "email": {email}}}"#))));

    let pipe = ascii().and_then(lookup);
    let outcome = pipe.call(&json!("admin@example.com")).unwrap();

    assert_eq!(pipe.unpack(&outcome).unwrap(), json!({"id": 7, "email": "admin@example.com"}));
}
