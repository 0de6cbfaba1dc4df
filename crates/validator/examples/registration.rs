//! Validating a registration payload with refined.
//!
//! Run: `cargo run -p refined --example registration`

use refined::prelude::*;
use serde_json::{Value, json};

fn main() {
    login_alternatives();
    registration_payloads();
    tariff_contract();
}

/// A login is either an email or a phone number.
fn login_alternatives() {
    println!("=== Login Alternatives ===\n");

    let login = email().or(phone());
    for input in ["admin@example.com", "8 (999) 123-33-12", "not a login"] {
        let outcome = login.call(&json!(input)).unwrap_or_else(|e| panic!("misuse: {e}"));
        match login.unpack(&outcome) {
            Ok(value) => println!("{input:>20} -> {} {value}", outcome.validator()),
            Err(_) => println!("{input:>20} -> {}", report(&outcome)),
        }
    }
    println!();
}

/// JSON text parsed, then checked attribute by attribute.
fn registration_payloads() {
    println!("=== Registration Payloads ===\n");

    let registration = json().and_then(
        tuple_of([
            ("login", email().or(phone()).shared()),
            ("password", ascii().shared()),
        ])
        .unwrap_or_else(|e| panic!("bad tuple: {e}")),
    );

    let payloads = [
        r#"{"login":"8 (999) 123-33-12","password":"111"}"#,
        r#"{"login":"admin@example.com","password":"Пароль"}"#,
        "<xml>",
    ];
    for payload in payloads {
        match validate_value(&registration, &json!(payload)) {
            Ok(value) => println!("valid:   {value}"),
            Err(error) => println!("invalid: {error}"),
        }
    }
    println!();
}

/// The response is checked by the validator paired with the matching input.
fn tariff_contract() {
    println!("=== Tariff Contract ===\n");

    let domestic = from_fn("Domestic", |parcel: &Value, _: &mut Context| {
        Ok(if parcel["to"] == "RU" {
            Verdict::AcceptAs(json!({"mass": parcel["weight"], "mail-to": parcel["to"]}))
        } else {
            Verdict::Reject(ValidationError::structured("non_domestic_parcel"))
        })
    });
    let international = from_fn("International", |parcel: &Value, _: &mut Context| {
        Ok(Verdict::AcceptAs(json!({"mass": parcel["weight"], "mail-direct": parcel["to"]})))
    });
    let rate = from_fn("Rate", |response: &Value, _: &mut Context| {
        Ok(response.get("total-rate").is_some())
    })
    .shared();

    let tariffs = contract_of([
        (domestic.shared(), rate.clone()),
        (international.shared(), rate),
    ])
    .unwrap_or_else(|e| panic!("bad contract: {e}"));

    for parcel in [json!({"to": "RU", "weight": 250}), json!({"to": "DE", "weight": 40})] {
        let outcome = tariffs
            .call(&parcel, |request| {
                println!("request: {request}");
                Ok(json!({"total-rate": 100}))
            })
            .unwrap_or_else(|e| panic!("misuse: {e}"));
        println!("{parcel} -> {}", if outcome.is_valid() { "priced" } else { "rejected" });
    }
}

fn report(outcome: &Outcome) -> Value {
    outcome.as_failure().map_or(Value::Null, Failure::to_value)
}
