//! Runtime values.
//!
//! All heap values go through factory methods on [`Value`]; `Heap::new` is
//! crate-private.
//!
//! ```text
//! let s = Value::string("hello");            // OK
//! let t = Value::boolean(true);              // `True` instance
//! let s = Value::String(Heap::new(..));      // ERROR: Heap::new is pub(crate)
//! ```

mod heap;

use std::fmt;

use cause_ir::ast::Param;
use cause_ir::{ExprId, Name, StringInterner, TypeRefId};
use cause_types::{TypeId, TypeTable};

use crate::{EvalError, LocalScope, Scope};

pub use heap::Heap;

/// Signature of a native (host-implemented) function.
pub type NativeFn = fn(&[Value]) -> Result<Value, EvalError>;

/// Runtime value in the Cause interpreter.
#[derive(Clone, Debug)]
pub enum Value {
    Number(f64),
    String(Heap<String>),
    /// The unit value, of type `Action`.
    Action,
    /// Instance of an `object` type (including `True` and `False`).
    Object(Heap<Instance>),
    /// Instance of a `signal` type.
    Signal(Heap<Instance>),
    /// Closure from a `fn` literal or a `function` declaration.
    Function(Heap<FunctionValue>),
    /// Host-implemented function.
    Native(NativeFunction),
    /// Constructor of an object or signal type with fields.
    Constructor(TypeId),
}

impl Value {
    #[inline]
    pub fn number(n: f64) -> Self {
        Value::Number(n)
    }

    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Heap::new(s.into()))
    }

    pub fn object(type_id: TypeId, fields: Vec<(Name, Value)>) -> Self {
        Value::Object(Heap::new(Instance { type_id, fields }))
    }

    pub fn signal(type_id: TypeId, fields: Vec<(Name, Value)>) -> Self {
        Value::Signal(Heap::new(Instance { type_id, fields }))
    }

    /// `True` or `False`.
    pub fn boolean(b: bool) -> Self {
        let id = if b { TypeId::TRUE } else { TypeId::FALSE };
        Value::object(id, Vec::new())
    }

    pub fn function(function: FunctionValue) -> Self {
        Value::Function(Heap::new(function))
    }

    pub fn native(name: &'static str, arity: usize, func: NativeFn) -> Self {
        Value::Native(NativeFunction { name, arity, func })
    }

    /// `Some(b)` for `True`/`False`, `None` for anything else.
    pub fn as_bool(&self) -> Option<bool> {
        match self.instance() {
            Some(inst) if inst.type_id == TypeId::TRUE => Some(true),
            Some(inst) if inst.type_id == TypeId::FALSE => Some(false),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Object or signal payload.
    pub fn instance(&self) -> Option<&Instance> {
        match self {
            Value::Object(inst) | Value::Signal(inst) => Some(inst),
            _ => None,
        }
    }

    pub fn is_signal(&self) -> bool {
        matches!(self, Value::Signal(_))
    }

    /// Nominal type of the value. Callables have structural types only.
    pub fn type_id(&self) -> Option<TypeId> {
        match self {
            Value::Number(_) => Some(TypeId::NUMBER),
            Value::String(_) => Some(TypeId::STRING),
            Value::Action => Some(TypeId::ACTION),
            Value::Object(inst) | Value::Signal(inst) => Some(inst.type_id),
            Value::Function(_) | Value::Native(_) | Value::Constructor(_) => None,
        }
    }

    /// Coarse kind, for messages where no type table is at hand.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::Action => "Action",
            Value::Object(_) => "object",
            Value::Signal(_) => "signal",
            Value::Function(_) | Value::Native(_) | Value::Constructor(_) => "Function",
        }
    }

    /// Number of arguments a callable takes.
    pub fn callable_arity(&self, table: &TypeTable) -> Option<usize> {
        match self {
            Value::Function(f) => Some(f.params.len()),
            Value::Native(n) => Some(n.arity),
            Value::Constructor(id) => Some(table.fields(*id).len()),
            _ => None,
        }
    }

    /// Type name for diagnostics, e.g. `Dog` or `Function`.
    pub fn type_name(&self, table: &TypeTable, interner: &StringInterner) -> String {
        match self.type_id() {
            Some(id) => interner.lookup(table.get(id).name).to_owned(),
            None => "Function".to_owned(),
        }
    }

    /// User-facing rendering, used for `Debug` output and results.
    pub fn display(&self, table: &TypeTable, interner: &StringInterner) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::String(s) => (**s).clone(),
            Value::Action => "Action".to_owned(),
            Value::Object(inst) | Value::Signal(inst) => {
                let name = interner.lookup(table.get(inst.type_id).name);
                if inst.fields.is_empty() {
                    return name.to_owned();
                }
                let fields: Vec<String> = inst
                    .fields
                    .iter()
                    .map(|(field, value)| {
                        format!("{}: {}", interner.lookup(*field), value.display(table, interner))
                    })
                    .collect();
                format!("{name}({})", fields.join(", "))
            }
            Value::Function(f) => match f.name {
                Some(name) => format!("<function {}>", interner.lookup(name)),
                None => "<function>".to_owned(),
            },
            Value::Native(n) => format!("<function {}>", n.name),
            Value::Constructor(id) => {
                format!("<constructor {}>", interner.lookup(table.get(*id).name))
            }
        }
    }
}

/// Integers render without a fractional part: `42`, `-3`, `0.5`.
pub fn format_number(n: f64) -> String {
    n.to_string()
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Action, Value::Action) => true,
            (Value::Object(a), Value::Object(b)) | (Value::Signal(a), Value::Signal(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Heap::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => a.name == b.name,
            (Value::Constructor(a), Value::Constructor(b)) => a == b,
            _ => false,
        }
    }
}

/// Payload of an object or signal value. Fields are kept in declaration
/// order.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub type_id: TypeId,
    pub fields: Vec<(Name, Value)>,
}

impl Instance {
    pub fn field(&self, name: Name) -> Option<&Value> {
        self.fields
            .iter()
            .find_map(|(field, value)| (*field == name).then_some(value))
    }
}

/// A closure: parameters, body and the scope it was created in.
#[derive(Clone)]
pub struct FunctionValue {
    /// Declared name; `None` for `fn` literals.
    pub name: Option<Name>,
    pub params: Vec<Param>,
    pub return_type: Option<TypeRefId>,
    pub body: ExprId,
    /// Defining scope, shared by reference.
    pub captured: LocalScope<Scope>,
}

// The captured scope may contain this function; printing it would recurse.
impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionValue")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

/// Host-implemented function with a fixed arity.
#[derive(Clone, Copy)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub func: NativeFn,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({}/{})", self.name, self.arity)
    }
}
