//! Native functions: the always-present prelude and the `core/*` modules.
//!
//! One table drives both sides: the resolver sees each entry's signature
//! through [`ImportProvider`], the interpreter binds its native function.

use cause_patterns::{
    arity_mismatch, format_number, type_mismatch, EvalError, NativeFunction, Value,
};
use cause_types::{FunctionType, ImportProvider, ResolvedType, TypeId};

/// Path of the entries that are in scope without an import.
const PRELUDE: &str = "";

struct NativeEntry {
    path: &'static str,
    name: &'static str,
    params: &'static [TypeId],
    ret: TypeId,
    func: fn(&[Value]) -> Result<Value, EvalError>,
}

impl NativeEntry {
    fn signature(&self) -> FunctionType {
        FunctionType {
            params: self.params.iter().map(|p| ResolvedType::Named(*p)).collect(),
            ret: ResolvedType::Named(self.ret),
        }
    }

    fn native(&self) -> NativeFunction {
        NativeFunction {
            name: self.name,
            arity: self.params.len(),
            func: self.func,
        }
    }
}

const NUMBER_PAIR: &[TypeId] = &[TypeId::NUMBER, TypeId::NUMBER];

static NATIVES: &[NativeEntry] = &[
    NativeEntry {
        path: PRELUDE,
        name: "equals",
        params: &[TypeId::ANYTHING, TypeId::ANYTHING],
        ret: TypeId::BINARY_ANSWER,
        func: equals,
    },
    NativeEntry {
        path: "core/math",
        name: "add",
        params: NUMBER_PAIR,
        ret: TypeId::NUMBER,
        func: add,
    },
    NativeEntry {
        path: "core/math",
        name: "subtract",
        params: NUMBER_PAIR,
        ret: TypeId::NUMBER,
        func: subtract,
    },
    NativeEntry {
        path: "core/math",
        name: "multiply",
        params: NUMBER_PAIR,
        ret: TypeId::NUMBER,
        func: multiply,
    },
    NativeEntry {
        path: "core/math",
        name: "at_least",
        params: NUMBER_PAIR,
        ret: TypeId::BINARY_ANSWER,
        func: at_least,
    },
    NativeEntry {
        path: "core/string",
        name: "append",
        params: &[TypeId::STRING, TypeId::STRING],
        ret: TypeId::STRING,
        func: append,
    },
    NativeEntry {
        path: "core/string",
        name: "number_to_string",
        params: &[TypeId::NUMBER],
        ret: TypeId::STRING,
        func: number_to_string,
    },
];

/// The natives shipped with the interpreter.
#[derive(Copy, Clone, Debug, Default)]
pub struct CoreLibrary;

impl CoreLibrary {
    /// Native bound by `import path (name)`.
    pub fn native(&self, path: &str, name: &str) -> Option<NativeFunction> {
        find(path, name).map(NativeEntry::native)
    }

    /// Natives in scope everywhere.
    pub fn prelude_natives(&self) -> Vec<NativeFunction> {
        NATIVES
            .iter()
            .filter(|e| e.path == PRELUDE)
            .map(NativeEntry::native)
            .collect()
    }
}

impl ImportProvider for CoreLibrary {
    fn lookup(&self, path: &str, name: &str) -> Option<FunctionType> {
        if path == PRELUDE {
            return None;
        }
        find(path, name).map(NativeEntry::signature)
    }

    fn prelude(&self) -> Vec<(&'static str, FunctionType)> {
        NATIVES
            .iter()
            .filter(|e| e.path == PRELUDE)
            .map(|e| (e.name, e.signature()))
            .collect()
    }
}

fn find(path: &str, name: &str) -> Option<&'static NativeEntry> {
    NATIVES.iter().find(|e| e.path == path && e.name == name)
}

fn number(value: &Value) -> Result<f64, EvalError> {
    value
        .as_number()
        .ok_or_else(|| type_mismatch("Number", value.kind_name()))
}

fn string(value: &Value) -> Result<&str, EvalError> {
    value
        .as_str()
        .ok_or_else(|| type_mismatch("String", value.kind_name()))
}

fn numbers(name: &str, args: &[Value]) -> Result<(f64, f64), EvalError> {
    let [a, b] = args else {
        return Err(arity_mismatch(name, 2, args.len()));
    };
    Ok((number(a)?, number(b)?))
}

fn equals(args: &[Value]) -> Result<Value, EvalError> {
    let [a, b] = args else {
        return Err(arity_mismatch("equals", 2, args.len()));
    };
    Ok(Value::boolean(a == b))
}

fn add(args: &[Value]) -> Result<Value, EvalError> {
    let (a, b) = numbers("add", args)?;
    Ok(Value::number(a + b))
}

fn subtract(args: &[Value]) -> Result<Value, EvalError> {
    let (a, b) = numbers("subtract", args)?;
    Ok(Value::number(a - b))
}

fn multiply(args: &[Value]) -> Result<Value, EvalError> {
    let (a, b) = numbers("multiply", args)?;
    Ok(Value::number(a * b))
}

fn at_least(args: &[Value]) -> Result<Value, EvalError> {
    let (a, b) = numbers("at_least", args)?;
    Ok(Value::boolean(a >= b))
}

fn append(args: &[Value]) -> Result<Value, EvalError> {
    let [a, b] = args else {
        return Err(arity_mismatch("append", 2, args.len()));
    };
    let mut joined = string(a)?.to_owned();
    joined.push_str(string(b)?);
    Ok(Value::string(joined))
}

fn number_to_string(args: &[Value]) -> Result<Value, EvalError> {
    let [n] = args else {
        return Err(arity_mismatch("number_to_string", 1, args.len()));
    };
    Ok(Value::string(format_number(number(n)?)))
}
