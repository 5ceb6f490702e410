//! Shared fixtures for unit tests.

use crate::typesystem::{
    ClassFlags, ClassRegistry, PrimitiveKind, TypeDef, TypeDescriptor,
};

// Registry with the builtins plus a small service model:
//
// - svc.Item { id: int, name: String }
// - svc.SpecialItem extends svc.Item { discount: double }
// - svc.Node { value: int, next: svc.Node }
// - svc.Api (interface), svc.Store (class)
// - svc.QuotaExceededException, svc.AbstractFailure (abstract)
pub fn fixture_registry() -> ClassRegistry {
    let registry = ClassRegistry::with_builtins();

    registry.register(
        TypeDef::class("svc.Item")
            .with_field("id", TypeDescriptor::primitive_of(PrimitiveKind::Int))
            .with_field("name", TypeDescriptor::string()),
    );
    registry.register(
        TypeDef::class("svc.SpecialItem")
            .with_super("svc.Item")
            .with_field("discount", TypeDescriptor::primitive_of(PrimitiveKind::Double)),
    );
    registry.register(
        TypeDef::class("svc.Node")
            .with_field("value", TypeDescriptor::primitive_of(PrimitiveKind::Int))
            .with_field("next", TypeDescriptor::named("svc.Node")),
    );
    registry.register(TypeDef::interface("svc.Api"));
    registry.register(TypeDef::class("svc.Store"));
    registry.register(TypeDef::exception(
        "svc.QuotaExceededException",
        "java.lang.RuntimeException",
    ));
    registry.register(
        TypeDef::exception("svc.AbstractFailure", "java.lang.RuntimeException")
            .with_flags(ClassFlags::PUBLIC | ClassFlags::ABSTRACT),
    );

    registry
}

// Helper function to build an item object as coercion produces it
pub fn item(id: i32, name: &str) -> crate::Value {
    crate::Value::Object(
        crate::Object::new("svc.Item")
            .with_field("id", id)
            .with_field("name", name),
    )
}

#[test]
fn fixture_item_matches_coercion() {
    let registry = fixture_registry();
    let value = crate::coercion::coerce(
        Some(r#"{"id": 1, "name": "a"}"#),
        "svc.Item",
        &registry,
    );
    assert_eq!(value, Ok(item(1, "a")));
}
