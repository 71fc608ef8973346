//! Function call evaluation methods for the Interpreter.

use cause_ir::Span;
use cause_patterns::{
    arity_mismatch, not_callable, type_mismatch, value_matches, ControlAction, EvalError,
    EvalResult, FunctionValue, Heap, Mutability, NativeFunction, Value,
};
use cause_types::{ResolvedType, TypeId};

use super::Interpreter;
use crate::diagnostics::CallFrame;

impl Interpreter<'_> {
    /// Call any callable value with already evaluated arguments.
    pub(crate) fn call_value(&mut self, callee: &Value, args: Vec<Value>, span: Span) -> EvalResult {
        match callee {
            Value::Function(f) => self.call_closure(f, args, span),
            Value::Native(native) => call_native(*native, &args),
            Value::Constructor(id) => self.construct(*id, args),
            // A fieldless type name is bound to its instance; `Dog()` still works.
            Value::Object(inst) | Value::Signal(inst) if inst.fields.is_empty() && args.is_empty() => {
                Ok(callee.clone())
            }
            _ => Err(not_callable(&callee.type_name(self.types, self.interner)).into()),
        }
    }

    #[tracing::instrument(level = "trace", skip_all, fields(arity = args.len()))]
    fn call_closure(&mut self, f: &Heap<FunctionValue>, args: Vec<Value>, span: Span) -> EvalResult {
        let name = f.name.unwrap_or(self.names.anonymous);
        if args.len() != f.params.len() {
            return Err(arity_mismatch(self.interner.lookup(name), f.params.len(), args.len()).into());
        }
        for (param, arg) in f.params.iter().zip(&args) {
            if let Some(expected) = param.ty.and_then(|ty| self.types.resolved(ty)) {
                self.check_value(arg, expected)?;
            }
        }

        self.call_stack.push(CallFrame {
            name,
            call_span: Some(span),
        })?;
        let frame = self.fresh_frame();
        let env = self.env.child_of(f.captured.clone());
        let result = {
            let mut call = self.enter_context(env, None, Some(frame));
            for (param, arg) in f.params.iter().zip(args) {
                call.env.define(param.name, arg, Mutability::Immutable);
            }
            call.eval(f.body)
        };
        let result = match result {
            Err(ControlAction::Return { target, value }) if target == frame => Ok(value),
            Err(ControlAction::Error(e)) => Err(ControlAction::Error(Box::new(
                self.call_stack.attach_backtrace(*e, self.interner),
            ))),
            other => other,
        };
        self.call_stack.pop();
        result
    }

    /// Build an object or signal instance, one argument per field.
    fn construct(&self, id: TypeId, args: Vec<Value>) -> EvalResult {
        let fields = self.types.fields(id);
        if args.len() != fields.len() {
            let name = self.interner.lookup(self.types.get(id).name);
            return Err(arity_mismatch(name, fields.len(), args.len()).into());
        }
        let mut values = Vec::with_capacity(fields.len());
        for (field, arg) in fields.iter().zip(args) {
            self.check_value(&arg, &field.ty)?;
            values.push((field.name, arg));
        }
        Ok(if self.types.is_signal(id) {
            Value::signal(id, values)
        } else {
            Value::object(id, values)
        })
    }

    /// `TypeMismatch` unless `value` has type `expected`.
    pub(crate) fn check_value(&self, value: &Value, expected: &ResolvedType) -> Result<(), EvalError> {
        if value_matches(value, expected, self.types) {
            return Ok(());
        }
        Err(type_mismatch(
            &self.types.display(expected, self.interner),
            &value.type_name(self.types, self.interner),
        ))
    }
}

fn call_native(native: NativeFunction, args: &[Value]) -> EvalResult {
    if args.len() != native.arity {
        return Err(arity_mismatch(native.name, native.arity, args.len()).into());
    }
    (native.func)(args).map_err(ControlAction::from)
}
