use pretty_assertions::assert_eq;
use refined::prelude::*;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn later_steps_do_not_run_after_a_failure() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let pipe = email().and_then(from_fn("Counted", move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }));

    let outcome = pipe.call(&json!("nope")).unwrap();
    assert!(outcome.is_invalid());
    assert_eq!(outcome.validator(), "Email");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn steps_shape_exposes_failed_step_input() {
    let pipe = pipe_of([json().shared(), email().shared()], &["parse", "email"])
        .unwrap()
        .with_failure_shape(FailureShape::Steps);

    let outcome = pipe.call(&json!(r#""not an email""#)).unwrap();
    let failure = outcome.as_failure().unwrap();

    assert_eq!(failure.failed_step(), Some(&StepKey::name("email")));
    assert_eq!(failure.failed_step_input(), Some(&json!("not an email")));
}

#[test]
fn fluent_and_then_extends_unnamed_pipe() {
    let pipe = json().and_then(normalize_keys_step()).and_then(anything());
    assert_eq!(pipe.steps().len(), 3);
    assert_eq!(pipe.name(), "Pipe(Json,NormalizeKeys,Anything)");
}

#[test]
fn named_pipe_is_nested_as_a_single_step() {
    let parse = json().and_then(normalize_keys_step()).named("Parse");
    let pipe = parse.and_then(anything());
    assert_eq!(pipe.steps().len(), 2);
    assert_eq!(pipe.name(), "Pipe(Parse,Anything)");
}

#[test]
fn transform_reshapes_values_between_steps() {
    let pipe = email().and_then(from_fn("Wrapped", |value, _| Ok(value.get("user").is_some())));
    let mut ctx = Context::new();

    let outcome = pipe
        .match_with(&json!("admin@example.com"), &mut ctx, |email| {
            Ok(json!({"user": email}))
        })
        .unwrap();

    assert!(outcome.is_valid());
    assert_eq!(ctx.step(1usize), Some(&json!({"user": "admin@example.com"})));
}

#[test]
fn empty_pipe_is_rejected() {
    let err = pipe_of(Vec::new(), &[]).unwrap_err();
    assert!(err.is_construction_error());
}

fn suffix(tag: &'static str) -> SharedValidator {
    from_fn(tag, move |value: &Value, _: &mut Context| {
        let text = value.as_str().unwrap_or_default();
        Ok(Verdict::AcceptAs(json!(format!("{text}>{tag}"))))
    })
    .shared()
}

#[test]
fn nested_pipe_extends_outer_steps() {
    let inner = pipe_of([suffix("i0"), suffix("i1"), email().shared()], &[]).unwrap();
    let outer = pipe_of([suffix("o0"), suffix("o1"), inner.shared()], &[])
        .unwrap()
        .with_failure_shape(FailureShape::Steps);

    let mut ctx = Context::new();
    let outcome = outer.match_value(&json!("raw"), &mut ctx).unwrap();
    let failure = outcome.as_failure().unwrap();

    assert_eq!(failure.failed_step(), Some(&StepKey::Index(2)));
    assert_eq!(failure.failed_step_input(), Some(&json!("raw>o0>o1")));

    assert_eq!(ctx.step(0usize), Some(&json!("raw")));
    assert_eq!(ctx.step(1usize), Some(&json!("raw>o0")));
    assert_eq!(ctx.step(2usize), Some(&json!("raw>o0>o1")));
    assert_eq!(ctx.step("2.0"), Some(&json!("raw>o0>o1")));
    assert_eq!(ctx.step("2.1"), Some(&json!("raw>o0>o1>i0")));
    assert_eq!(ctx.step("2.2"), Some(&json!("raw>o0>o1>i0>i1")));
    assert_eq!(ctx.steps().len(), 6);
}

#[test]
fn inner_steps_shape_points_at_scoped_key() {
    let inner = pipe_of([suffix("i0"), email().shared()], &["wrap", "email"])
        .unwrap()
        .with_failure_shape(FailureShape::Steps);
    let outer = pipe_of([suffix("o0"), inner.shared()], &["prepare", "check"]).unwrap();

    let outcome = outer.call(&json!("raw")).unwrap();
    let failure = outcome.as_failure().unwrap();

    assert_eq!(failure.failed_step(), Some(&StepKey::name("check.email")));
    assert_eq!(failure.failed_step_input(), Some(&json!("raw>o0>i0")));
    assert_eq!(outcome.context().step("prepare"), Some(&json!("raw")));
}
