//! Tests for the fluent composer.

use pretty_assertions::assert_eq;

use crate::{
    Error, Feature, Scope, Value,
    builder::HookDescriptor,
    compose,
    values::method::method,
};

fn echo_base() -> crate::ComposedType {
    compose([
        Feature::new()
            .instance("ping", |_, args| Ok(args.first().cloned().unwrap_or(Value::Null)))
            .class("ping", |_, args| Ok(args.first().cloned().unwrap_or(Value::Null)))
            .into(),
    ])
    .unwrap()
}

#[test]
fn finalizing_without_staging_returns_the_base() {
    let base = compose([]).unwrap();
    let mut composer = base.composer();
    assert!(composer.get_composed().unwrap().same(&base));
}

#[test]
fn finalizing_drains_the_stack() {
    let base = compose([]).unwrap();
    let mut composer = base.composer();
    composer
        .use_features(Feature::new().class("extra", |_, _| Ok(Value::Null)))
        .unwrap();

    let first = composer.get_composed().unwrap();
    assert!(first.static_surface().contains_key("extra"));

    // The stack is already consumed: the base comes back unchanged.
    let second = composer.get_composed().unwrap();
    assert!(second.same(&base));
}

#[test]
fn get_extended_is_an_alias() {
    let base = compose([]).unwrap();
    let ty = base
        .use_features(Feature::new().class("extra", |_, _| Ok(Value::Null)))
        .unwrap()
        .get_extended()
        .unwrap();
    assert!(ty.static_surface().contains_key("extra"));
}

#[test]
fn staging_after_finalization_starts_a_fresh_stack() {
    let base = compose([]).unwrap();
    let mut composer = base.composer();

    composer
        .use_features(Feature::new().class("one", |_, _| Ok(Value::Null)))
        .unwrap();
    let first = composer.get_composed().unwrap();

    composer
        .use_features(Feature::new().class("two", |_, _| Ok(Value::Null)))
        .unwrap();
    let second = composer.get_composed().unwrap();

    assert!(first.static_surface().contains_key("one"));
    assert!(!second.static_surface().contains_key("one"));
    assert!(second.static_surface().contains_key("two"));
}

#[test]
fn hooks_register_on_every_matching_surface() {
    let mut composer = echo_base().composer();
    let ty = composer
        .post(
            "ping",
            |_, args| Ok(Value::from(args[0].as_int().unwrap() + 1)),
            None,
        )
        .unwrap()
        .get_composed()
        .unwrap();

    assert_eq!(
        ty.call_static("ping", &[Value::from(1)]).unwrap(),
        Value::from(2)
    );
    let instance = ty.construct(&[]).unwrap();
    assert_eq!(
        instance.call("ping", &[Value::from(1)]).unwrap(),
        Value::from(2)
    );
}

#[test]
fn a_scope_hint_restricts_registration_to_one_surface() {
    let mut composer = echo_base().composer();
    let ty = composer
        .post(
            "ping",
            |_, args| Ok(Value::from(args[0].as_int().unwrap() + 1)),
            Some(Scope::Class),
        )
        .unwrap()
        .get_composed()
        .unwrap();

    assert_eq!(
        ty.call_static("ping", &[Value::from(1)]).unwrap(),
        Value::from(2)
    );
    // The instance surface keeps the unhooked operation.
    let instance = ty.construct(&[]).unwrap();
    assert_eq!(
        instance.call("ping", &[Value::from(1)]).unwrap(),
        Value::from(1)
    );
}

#[test]
fn the_constructor_slot_resolves_on_the_instance_surface() {
    let base = compose([]).unwrap();
    let mut composer = base.composer();
    let ty = composer
        .post(
            "constructor",
            |_, args| {
                if let Some(instance) = args[0].as_instance() {
                    instance.set("hooked", Value::from(true));
                }
                Ok(args[0].clone())
            },
            Some(Scope::Instance),
        )
        .unwrap()
        .get_composed()
        .unwrap();

    let instance = ty.construct(&[]).unwrap();
    assert_eq!(instance.get("hooked"), Some(Value::from(true)));
}

#[test]
fn an_unknown_hook_target_identifies_method_and_scope() {
    let base = compose([]).unwrap();
    let mut composer = base.composer();

    let err = composer
        .pre(
            "vanish",
            |_, args| Ok(args.first().cloned().unwrap_or(Value::Null)),
            Some(Scope::Instance),
        )
        .unwrap_err();
    assert_eq!(
        err,
        Error::InvalidInput("pre: no such instance method `vanish`".to_string())
    );

    // The failed registration staged nothing.
    assert!(composer.get_composed().unwrap().same(&base));
}

#[test]
fn an_unhinted_miss_names_both_scopes() {
    let base = compose([]).unwrap();
    let mut composer = base.composer();
    let err = composer.post("vanish", |_, args| Ok(args[0].clone()), None);
    let Error::InvalidInput(message) = err.map(|_| ()).unwrap_err();
    assert_eq!(message, "post: no such instance or class method `vanish`");
}

#[test]
fn the_descriptor_form_matches_the_positional_form() {
    let mut positional = echo_base().composer();
    let a = positional
        .post(
            "ping",
            |_, args| Ok(Value::from(args[0].as_int().unwrap() + 1)),
            Some(Scope::Class),
        )
        .unwrap()
        .get_composed()
        .unwrap();

    let mut descriptor = echo_base().composer();
    let b = descriptor
        .post_with(HookDescriptor {
            name: "ping".to_string(),
            handle: method(|_, args| Ok(Value::from(args[0].as_int().unwrap() + 1))),
            scope: Some(Scope::Class),
        })
        .unwrap()
        .get_composed()
        .unwrap();

    assert_eq!(
        a.call_static("ping", &[Value::from(1)]).unwrap(),
        b.call_static("ping", &[Value::from(1)]).unwrap()
    );
}
