//! Registration of hoisted declarations: imports, types and function
//! signatures. Runs before any statement of the scope is checked.

use cause_ir::ast::{DeclKind, Field};
use cause_ir::DeclId;

use super::{ModuleChecker, ValueInfo, ValueKind};
use crate::table::{FieldDef, TypeDef, TypeKind};
use crate::{FunctionType, ResolvedType, TypeError};

impl ModuleChecker<'_> {
    /// Register every hoisted declaration among `decls` in the current scope.
    pub(super) fn register_hoisted(&mut self, decls: &[DeclId]) {
        self.register_imports(decls);
        self.register_types(decls);
        self.register_functions(decls);
    }

    fn register_imports(&mut self, decls: &[DeclId]) {
        let arena = self.arena;
        for &id in decls {
            let DeclKind::Import(import) = &arena.decl(id).kind else {
                continue;
            };
            for mapping in &import.mappings {
                let local = mapping.local_name();
                self.declare_name(local, mapping.span);

                let exported = self.interner.lookup(mapping.name);
                let ty = match self.imports.lookup(&import.path, exported) {
                    Some(sig) => ResolvedType::Function(std::rc::Rc::new(sig)),
                    None => {
                        self.errors.push(TypeError::UnknownImport {
                            path: import.path.clone(),
                            name: mapping.name,
                            span: mapping.span,
                        });
                        ResolvedType::UNKNOWN
                    }
                };
                self.define_value(
                    local,
                    ValueInfo {
                        kind: ValueKind::Native,
                        ty: Some(ty),
                    },
                );
            }
        }
    }

    /// Two passes: allocate an id for every type first so declarations can
    /// refer to each other (and to themselves), then resolve their contents.
    fn register_types(&mut self, decls: &[DeclId]) {
        let arena = self.arena;
        let mut pending = Vec::new();

        for &id in decls {
            let decl = arena.decl(id);
            let name = match &decl.kind {
                DeclKind::Object(d) => d.name,
                DeclKind::Signal(d) => d.name,
                DeclKind::Option(d) => d.name,
                _ => continue,
            };
            self.declare_name(name, decl.span);
            let ty = self.table.push(TypeDef {
                name,
                kind: TypeKind::Unknown,
                decl: Some(id),
            });
            self.current_scope().types.insert(name, ty);
            pending.push((id, ty));
        }

        for (id, ty) in pending {
            let (kind, fields) = match &arena.decl(id).kind {
                DeclKind::Object(d) => {
                    let fields = self.resolve_fields(&d.fields);
                    (
                        TypeKind::Object {
                            fields: fields.clone(),
                        },
                        Some((d.name, fields)),
                    )
                }
                DeclKind::Signal(d) => {
                    let fields = self.resolve_fields(&d.fields);
                    let result = d
                        .result
                        .map_or(ResolvedType::ACTION, |r| self.resolve_type_ref(r));
                    (
                        TypeKind::Signal {
                            fields: fields.clone(),
                            result,
                        },
                        Some((d.name, fields)),
                    )
                }
                DeclKind::Option(d) => {
                    let members = d.members.iter().map(|m| self.resolve_type_ref(*m)).collect();
                    (TypeKind::Option { members }, None)
                }
                _ => continue,
            };
            self.table.set_kind(ty, kind);

            // Objects and signals are also values: an instance when they have
            // no fields, a constructor otherwise.
            if let Some((name, fields)) = fields {
                let info = if fields.is_empty() {
                    ValueInfo {
                        kind: ValueKind::Constant,
                        ty: Some(ResolvedType::Named(ty)),
                    }
                } else {
                    ValueInfo {
                        kind: ValueKind::Constructor,
                        ty: Some(ResolvedType::function(
                            fields.into_iter().map(|f| f.ty).collect(),
                            ResolvedType::Named(ty),
                        )),
                    }
                };
                self.define_value(name, info);
            }
        }
    }

    fn resolve_fields(&mut self, fields: &[Field]) -> Vec<FieldDef> {
        let mut seen: Vec<&Field> = Vec::with_capacity(fields.len());
        let mut resolved = Vec::with_capacity(fields.len());
        for field in fields {
            if let Some(previous) = seen.iter().find(|f| f.name == field.name) {
                self.errors.push(TypeError::DuplicateDeclaration {
                    name: field.name,
                    span: field.span,
                    previous: previous.span,
                });
            }
            seen.push(field);
            resolved.push(FieldDef {
                name: field.name,
                ty: self.resolve_type_ref(field.ty),
            });
        }
        resolved
    }

    fn register_functions(&mut self, decls: &[DeclId]) {
        let arena = self.arena;
        for &id in decls {
            let decl = arena.decl(id);
            let DeclKind::Function(function) = &decl.kind else {
                continue;
            };
            self.declare_name(function.name, decl.span);
            let sig = FunctionType {
                params: function
                    .params
                    .iter()
                    .map(|p| self.resolve_optional(p.ty))
                    .collect(),
                ret: self.resolve_optional(function.return_type),
            };
            self.table.record_function(id, sig.clone());
            self.define_value(
                function.name,
                ValueInfo {
                    kind: ValueKind::Function,
                    ty: Some(ResolvedType::Function(std::rc::Rc::new(sig))),
                },
            );
        }
    }
}
