use cause_ir::Name;
use cause_patterns::{AssignError, Mutability, Value};
use pretty_assertions::assert_eq;

use super::Environment;

fn name(raw: u32) -> Name {
    Name::new(0, raw)
}

#[test]
fn test_push_pop_restores_visibility() {
    let mut env = Environment::new();
    env.define(name(1), Value::number(1.0), Mutability::Immutable);
    env.push_scope();
    env.define(name(2), Value::number(2.0), Mutability::Immutable);
    assert_eq!(env.depth(), 2);
    assert_eq!(env.lookup(name(1)), Some(Value::number(1.0)));
    env.pop_scope();
    assert_eq!(env.lookup(name(2)), None);
}

#[test]
fn test_base_scope_is_never_popped() {
    let mut env = Environment::new();
    env.pop_scope();
    env.pop_scope();
    assert_eq!(env.depth(), 1);
}

#[test]
fn test_child_sees_captured_scope_by_reference() {
    let mut env = Environment::new();
    env.push_scope();
    env.define(name(1), Value::number(1.0), Mutability::Mutable);
    let captured = env.current_scope();

    let child = env.child_of(captured);
    assert_eq!(child.lookup(name(1)), Some(Value::number(1.0)));

    // A later `set` in the defining scope is visible through the child.
    assert_eq!(env.assign(name(1), Value::number(5.0)), Ok(()));
    assert_eq!(child.lookup(name(1)), Some(Value::number(5.0)));
}

#[test]
fn test_globals_are_immutable() {
    let mut env = Environment::new();
    env.define_global(name(3), Value::Action);
    assert_eq!(
        env.assign(name(3), Value::number(1.0)),
        Err(AssignError::Immutable)
    );
}
