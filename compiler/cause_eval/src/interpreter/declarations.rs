//! Binding of declarations into the current scope.
//!
//! Types, functions and imports are hoisted: they are bound before any
//! statement of their block (or module) runs, so they may refer to each
//! other. `let` values are bound in order as the statements run.

use cause_ir::ast::{DeclKind, FunctionDecl, ImportDecl, NamedValueDecl};
use cause_ir::DeclId;
use cause_patterns::{
    type_mismatch, unbound_name, ControlAction, EvalError, FunctionValue, Mutability, Value,
    value_matches,
};

use super::Interpreter;

impl Interpreter<'_> {
    /// Module-level binding: hoisted declarations first, then values.
    pub(super) fn bind_declarations(&mut self, decls: &[DeclId]) -> Result<(), ControlAction> {
        let arena = self.arena;
        let (hoisted, values): (Vec<DeclId>, Vec<DeclId>) = decls
            .iter()
            .copied()
            .partition(|id| arena.decl(*id).kind.is_hoisted());
        for decl in hoisted {
            self.bind_hoisted(decl)?;
        }
        for decl in values {
            self.bind_named_value(decl)?;
        }
        Ok(())
    }

    pub(super) fn bind_hoisted(&mut self, id: DeclId) -> Result<(), EvalError> {
        let arena = self.arena;
        let decl = arena.decl(id);
        match &decl.kind {
            DeclKind::Import(import) => self.bind_import(import),
            DeclKind::Function(function) => {
                let value = self.function_value(function);
                self.env.define(function.name, value, Mutability::Immutable);
                Ok(())
            }
            DeclKind::Object(object) => {
                let value = self.type_value(id, object.fields.is_empty(), false)?;
                self.env.define(object.name, value, Mutability::Immutable);
                Ok(())
            }
            DeclKind::Signal(signal) => {
                let value = self.type_value(id, signal.fields.is_empty(), true)?;
                self.env.define(signal.name, value, Mutability::Immutable);
                Ok(())
            }
            // Options name types only.
            DeclKind::Option(_) => Ok(()),
            DeclKind::NamedValue(_) => {
                Err(EvalError::new("`let` bound as a hoisted declaration").with_span(decl.span))
            }
        }
    }

    fn bind_import(&mut self, import: &ImportDecl) -> Result<(), EvalError> {
        for mapping in &import.mappings {
            let name = self.interner.lookup(mapping.name);
            let native = self
                .library
                .native(&import.path, name)
                .ok_or_else(|| unbound_name(&format!("{}/{name}", import.path)).with_span(mapping.span))?;
            self.env
                .define(mapping.local_name(), Value::Native(native), Mutability::Immutable);
        }
        Ok(())
    }

    fn function_value(&self, function: &FunctionDecl) -> Value {
        Value::function(FunctionValue {
            name: Some(function.name),
            params: function.params.clone(),
            return_type: function.return_type,
            body: function.body,
            captured: self.env.current_scope(),
        })
    }

    /// Constructor for a declared object or signal; the single instance when
    /// it has no fields.
    fn type_value(&self, decl: DeclId, fieldless: bool, signal: bool) -> Result<Value, EvalError> {
        let type_id = self.types.decl_type(decl).ok_or_else(|| {
            EvalError::new("type declaration was not resolved").with_span(self.arena.decl(decl).span)
        })?;
        Ok(match (fieldless, signal) {
            (false, _) => Value::Constructor(type_id),
            (true, true) => Value::signal(type_id, Vec::new()),
            (true, false) => Value::object(type_id, Vec::new()),
        })
    }

    pub(super) fn bind_named_value(&mut self, id: DeclId) -> Result<(), ControlAction> {
        let arena = self.arena;
        let decl = arena.decl(id);
        let DeclKind::NamedValue(named) = &decl.kind else {
            return self.bind_hoisted(id).map_err(ControlAction::from);
        };
        let NamedValueDecl {
            name,
            mutable,
            declared_type,
            init,
        } = named;
        let value = self.eval(*init)?;
        if let Some(expected) = (*declared_type).and_then(|ty| self.types.resolved(ty)) {
            if !value_matches(&value, expected, self.types) {
                let expected = self.types.display(expected, self.interner);
                let got = value.type_name(self.types, self.interner);
                return Err(type_mismatch(&expected, &got).with_span(decl.span).into());
            }
        }
        let mutability = if *mutable {
            Mutability::Mutable
        } else {
            Mutability::Immutable
        };
        self.env.define(*name, value, mutability);
        Ok(())
    }
}
