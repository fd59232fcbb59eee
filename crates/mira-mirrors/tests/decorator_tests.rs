//! Integration tests for decorator dispatch and the application pipeline
//!
//! Covers request routing, the finalize contract, and the abort-on-error
//! ordering of the decoration pipeline.

use mira_mirrors::{
    apply_decorator, decorate, finalize, Decoration, DecorationRequest, MemberKey, Mirror,
    MirrorError, MirrorKind, MirrorRegistry,
};
use mira_object::{Function, PropertySlot, Value};
use std::cell::RefCell;
use std::rc::Rc;

fn service_class() -> Value {
    let ctor = Function::native("Service", 1, |this, args| {
        if let Value::Object(obj) = &this {
            obj.set("config", args.first().cloned().unwrap_or(Value::Null));
        }
        Value::Null
    });
    let handle = Function::native("handle", 2, |_, _| Value::str("handled"));
    ctor.prototype()
        .define_property("handle", PropertySlot::data(Value::Function(handle)));
    let create = Function::native("create", 0, |_, _| Value::Null);
    ctor.define_own_property("create", PropertySlot::data(Value::Function(create)));
    Value::Function(ctor)
}

#[test]
fn test_class_request_resolves_the_class_mirror() {
    let mut registry = MirrorRegistry::new();
    let service = service_class();

    let seen = Rc::new(RefCell::new(None));
    let record = Rc::clone(&seen);
    apply_decorator(&mut registry, &service, &DecorationRequest::Class, |mirror| {
        *record.borrow_mut() = Some(mirror.kind());
        Ok(())
    })
    .unwrap();

    assert_eq!(*seen.borrow(), Some(MirrorKind::Class));
}

#[test]
fn test_member_request_resolves_the_named_member() {
    let mut registry = MirrorRegistry::new();
    let service = service_class();

    apply_decorator(
        &mut registry,
        &service,
        &DecorationRequest::Member(MemberKey::instance("handle")),
        |mirror| {
            let property = mirror.as_property().expect("expected a member mirror");
            assert_eq!(property.name(), "handle");
            assert_eq!(property.kind(), MirrorKind::Method);
            Ok(())
        },
    )
    .unwrap();
}

#[test]
fn test_member_scopes_are_distinct() {
    // "create" only exists on the static side; the instance-side key does
    // not resolve to it
    let mut registry = MirrorRegistry::new();
    let service = service_class();

    apply_decorator(
        &mut registry,
        &service,
        &DecorationRequest::Member(MemberKey::static_member("create")),
        |mirror| {
            let property = mirror.as_property().expect("expected a member mirror");
            assert!(property.is_static());
            Ok(())
        },
    )
    .unwrap();

    let err = apply_decorator(
        &mut registry,
        &service,
        &DecorationRequest::Member(MemberKey::instance("create")),
        |_| Ok(()),
    )
    .unwrap_err();
    assert!(matches!(err, MirrorError::InvalidArgument { .. }));
}

#[test]
fn test_unknown_member_is_an_invalid_argument() {
    let mut registry = MirrorRegistry::new();
    let service = service_class();

    let err = apply_decorator(
        &mut registry,
        &service,
        &DecorationRequest::Member(MemberKey::instance("missing")),
        |_| Ok(()),
    )
    .unwrap_err();
    assert!(matches!(err, MirrorError::InvalidArgument { .. }));
}

#[test]
fn test_member_parameter_request_targets_the_parameter() {
    // The request shape (member "handle", index 1) decorates parameter 1
    // of that member, not the member itself
    let mut registry = MirrorRegistry::new();
    let service = service_class();

    apply_decorator(
        &mut registry,
        &service,
        &DecorationRequest::Parameter {
            member: Some(MemberKey::instance("handle")),
            index: 1,
        },
        |mirror| {
            let parameter = mirror.as_parameter().expect("expected a parameter mirror");
            assert_eq!(parameter.kind(), MirrorKind::Parameter);
            assert_eq!(parameter.index(), 1);
            let owner = parameter.owner_member().expect("owner should be alive");
            assert_eq!(owner.name(), "handle");
            Ok(())
        },
    )
    .unwrap();
}

#[test]
fn test_constructor_parameter_request_uses_the_class_list() {
    let mut registry = MirrorRegistry::new();
    let service = service_class();

    apply_decorator(
        &mut registry,
        &service,
        &DecorationRequest::Parameter {
            member: None,
            index: 0,
        },
        |mirror| {
            let parameter = mirror.as_parameter().expect("expected a parameter mirror");
            assert_eq!(parameter.index(), 0);
            assert!(parameter.owner_member().is_none());
            assert!(parameter.owner_class().is_some());
            Ok(())
        },
    )
    .unwrap();
}

#[test]
fn test_parameter_index_out_of_range() {
    let mut registry = MirrorRegistry::new();
    let service = service_class();

    let err = apply_decorator(
        &mut registry,
        &service,
        &DecorationRequest::Parameter {
            member: Some(MemberKey::instance("handle")),
            index: 5,
        },
        |_| Ok(()),
    )
    .unwrap_err();
    assert!(matches!(err, MirrorError::InvalidArgument { .. }));
}

#[test]
fn test_field_request_is_a_reserved_no_op() {
    let mut registry = MirrorRegistry::new();
    let service = service_class();

    let ran = Rc::new(RefCell::new(false));
    let flag = Rc::clone(&ran);
    apply_decorator(
        &mut registry,
        &service,
        &DecorationRequest::Field(MemberKey::instance("config")),
        move |_| {
            *flag.borrow_mut() = true;
            Ok(())
        },
    )
    .unwrap();

    assert!(!*ran.borrow());
}

#[test]
fn test_finalize_freezes_and_returns_the_constructor() {
    let mut registry = MirrorRegistry::new();
    let service = service_class();

    let exported = finalize(&mut registry, &service).unwrap();
    assert_eq!(exported.type_of(), "function");

    // The mirror is frozen: a second finalize fails
    let err = finalize(&mut registry, &service).unwrap_err();
    assert!(matches!(err, MirrorError::InvalidState { .. }));

    // So does any mutating decoration after it
    let err = apply_decorator(&mut registry, &service, &DecorationRequest::Class, |_| Ok(()))
        .unwrap_err();
    assert!(matches!(err, MirrorError::InvalidState { .. }));
}

#[test]
fn test_constructor_replacement_survives_finalize() {
    // Replacing construct and freezing exports a function that keeps the
    // original identity surface but runs the replacement's logic
    let mut registry = MirrorRegistry::new();
    let service = service_class();

    let replacement = Function::native("Replacement", 1, |this, _| {
        if let Value::Object(obj) = &this {
            obj.set("replaced", Value::Bool(true));
        }
        Value::Null
    });
    apply_decorator(&mut registry, &service, &DecorationRequest::Class, |mirror| {
        mirror
            .as_class()
            .unwrap()
            .set_construct(Value::Function(replacement.clone()))
    })
    .unwrap();

    let exported = finalize(&mut registry, &service).unwrap();
    assert_eq!(exported.type_of(), "function");

    let constructor = exported.as_function().unwrap();
    assert_eq!(constructor.name(), "Service");

    let Value::Object(instance) = constructor.construct(&[Value::Null]) else {
        panic!("expected an instance object");
    };
    assert_eq!(instance.get("replaced"), Value::Bool(true));
    // Prototype members still resolve: the wrapper shares the original's
    // prototype
    assert_eq!(instance.invoke("handle", &[]), Value::str("handled"));
}

#[test]
fn test_pipeline_applies_in_order_and_aborts_on_error() {
    let mut registry = MirrorRegistry::new();
    let service = service_class();

    let trace: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
    let first = Rc::clone(&trace);
    let second = Rc::clone(&trace);
    let third = Rc::clone(&trace);

    let decorations = vec![
        Decoration::member(MemberKey::instance("handle"), move |_| {
            first.borrow_mut().push("first");
            Ok(())
        }),
        Decoration::class(move |_| {
            second.borrow_mut().push("second");
            Err(MirrorError::invalid_argument("deliberate failure"))
        }),
        Decoration::class(move |_| {
            third.borrow_mut().push("third");
            Ok(())
        }),
    ];

    let err = decorate(&mut registry, &service, &decorations).unwrap_err();
    assert!(matches!(err, MirrorError::InvalidArgument { .. }));
    assert_eq!(*trace.borrow(), vec!["first", "second"]);

    // No rollback, no freeze: the mirror is still initializing and keeps
    // the partial mutations it had reached
    let mirror = registry.get_or_create(&service, true).unwrap();
    assert_eq!(mirror.state(), mira_mirrors::MirrorState::Initializing);
}

#[test]
fn test_decorate_runs_the_whole_sequence_then_freezes() {
    let mut registry = MirrorRegistry::new();
    let service = service_class();

    let decorations = vec![Decoration::member(
        MemberKey::instance("handle"),
        |mirror| {
            let method = mirror.as_property().unwrap();
            method.as_method().unwrap().set_writable(true)
        },
    )];

    let exported = decorate(&mut registry, &service, &decorations).unwrap();
    assert_eq!(exported.type_of(), "function");

    let mirror = registry.get_or_create(&service, false).unwrap();
    assert_eq!(mirror.state(), mira_mirrors::MirrorState::Initialized);
}
