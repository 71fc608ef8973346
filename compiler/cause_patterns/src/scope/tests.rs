use cause_ir::Name;
use pretty_assertions::assert_eq;

use super::*;

fn name(raw: u32) -> Name {
    Name::new(0, raw)
}

#[test]
fn test_lookup_walks_parents() {
    let outer = LocalScope::new(Scope::new());
    outer
        .borrow_mut()
        .define(name(1), Value::number(1.0), Mutability::Immutable);
    let inner = Scope::with_parent(outer.clone());
    assert_eq!(inner.lookup(name(1)), Some(Value::number(1.0)));
    assert_eq!(inner.lookup(name(2)), None);
    assert!(!inner.defines_locally(name(1)));
}

#[test]
fn test_shadowing_does_not_touch_parent() {
    let outer = LocalScope::new(Scope::new());
    outer
        .borrow_mut()
        .define(name(1), Value::number(1.0), Mutability::Immutable);
    let mut inner = Scope::with_parent(outer.clone());
    inner.define(name(1), Value::string("inner"), Mutability::Immutable);
    assert_eq!(inner.lookup(name(1)), Some(Value::string("inner")));
    assert_eq!(outer.borrow().lookup(name(1)), Some(Value::number(1.0)));
}

#[test]
fn test_assign_reaches_mutable_parent_binding() {
    let outer = LocalScope::new(Scope::new());
    outer
        .borrow_mut()
        .define(name(1), Value::number(1.0), Mutability::Mutable);
    let mut inner = Scope::with_parent(outer.clone());
    assert_eq!(inner.assign(name(1), Value::number(2.0)), Ok(()));
    assert_eq!(outer.borrow().lookup(name(1)), Some(Value::number(2.0)));
}

#[test]
fn test_assign_errors() {
    let mut scope = Scope::new();
    scope.define(name(1), Value::number(1.0), Mutability::Immutable);
    assert_eq!(
        scope.assign(name(1), Value::number(2.0)),
        Err(AssignError::Immutable)
    );
    assert_eq!(
        scope.assign(name(9), Value::number(2.0)),
        Err(AssignError::Undefined)
    );
}

#[test]
fn test_shared_cell_is_shared() {
    let a = LocalScope::new(Scope::new());
    let b = a.clone();
    b.borrow_mut()
        .define(name(3), Value::Action, Mutability::Mutable);
    assert!(a.ptr_eq(&b));
    assert_eq!(a.borrow().lookup(name(3)), Some(Value::Action));
}
