use pretty_assertions::assert_eq;
use refined::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn every_member_is_evaluated_even_after_a_match() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let counted = from_fn("Counted", move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    });

    let sum = anything().or(counted);
    let outcome = sum.call(&json!("x")).unwrap();

    assert_eq!(outcome.validator(), "Anything");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn winner_entries_reach_the_caller_context() {
    let sum = email().or(phone());
    let mut ctx = ContextBuilder::new().with("request_id", "42").build();
    sum.match_value(&json!("8 (999) 123-33-12"), &mut ctx).unwrap();

    assert_eq!(ctx.get_str("phone"), Some("89991233312"));
    assert_eq!(ctx.get_str("request_id"), Some("42"));
    assert!(!ctx.contains("email"));
}

#[test]
fn members_see_outer_entries() {
    let strict = from_fn("Strict", |_, ctx| Ok(ctx.get("strict") == Some(&json!(true))));
    let sum = strict.or(from_fn("Never", |_, _| Ok(false)));

    let mut ctx = ContextBuilder::new().with("strict", true).build();
    let outcome = sum.match_value(&json!(null), &mut ctx).unwrap();
    assert_eq!(outcome.validator(), "Strict");
}

#[test]
fn same_input_gives_same_winner() {
    let sum = sum_of([email().shared(), phone().shared(), ascii().shared()]).unwrap();
    for input in ["admin@example.com", "+7 999 123 33 12", "plain"] {
        let first = sum.call(&json!(input)).unwrap();
        let second = sum.call(&json!(input)).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn shared_members_are_not_duplicated_across_nesting() {
    let email = email().shared();
    let inner = Sum::new([email.clone(), phone().shared()]).unwrap();
    let outer = Sum::new([email, inner.shared()]).unwrap();

    let names: Vec<_> = outer.members().iter().map(|m| m.name().into_owned()).collect();
    assert_eq!(names, ["Email", "Phone"]);
}

#[test]
fn failure_projection_groups_messages_by_validator() {
    let outcome = email().or(ascii()).call(&json!("Пароль")).unwrap();
    let projection = outcome.as_failure().unwrap().to_value();

    assert_eq!(
        projection,
        json!({
            "Email": ["Not an email"],
            "Ascii": ["Not ASCII"],
            "Sum(Email,Ascii)": ["no_matches"],
        })
    );
}
