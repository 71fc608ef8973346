//! AST builder: parse tree to arena AST.
//!
//! Lowering is a direct structural translation. Identifiers are interned,
//! literal tokens are decoded, and suffix chains are folded into nested
//! expressions. Name and type checking belong to the resolver.

use std::fmt;

use cause_stack::ensure_sufficient_stack;

use crate::ast::{
    BranchExpr, BranchOption, BranchOptionKind, Decl, DeclKind, Expr, ExprKind, Field,
    FunctionDecl, FunctionExpr, ImportDecl, ImportMapping, Module, NamedValueDecl, ObjectDecl,
    OptionDecl, Param, Pattern, PatternKind, SignalDecl, Stmt, StmtKind, TypeRef, TypeRefKind,
};
use crate::parse_tree::{
    BranchOptionNode, BranchOptionNodeKind, DeclNode, DeclNodeKind, ExprNode, FieldNode, Ident,
    ParamNode, ParsedFile, PatternNode, PatternNodeKind, PrimaryNode, StmtNode, StmtNodeKind,
    SuffixKind, TypeRefNode, TypeRefNodeKind,
};
use crate::{DeclId, ExprArena, ExprId, Name, Span, StringInterner, TypeRefId};

/// Malformed literal token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildError {
    InvalidStringLiteral { raw: String, span: Span },
    InvalidNumberLiteral { raw: String, span: Span },
}

impl BuildError {
    pub fn span(&self) -> Span {
        match self {
            BuildError::InvalidStringLiteral { span, .. }
            | BuildError::InvalidNumberLiteral { span, .. } => *span,
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::InvalidStringLiteral { raw, .. } => {
                write!(f, "invalid string literal {raw}")
            }
            BuildError::InvalidNumberLiteral { raw, .. } => {
                write!(f, "invalid number literal `{raw}`")
            }
        }
    }
}

impl std::error::Error for BuildError {}

/// Lower one parsed file. All literal errors are collected before failing.
#[tracing::instrument(level = "debug", skip_all, fields(path = %file.path))]
pub fn lower(file: &ParsedFile, interner: &StringInterner) -> Result<Module, Vec<BuildError>> {
    let mut builder = AstBuilder {
        interner,
        arena: ExprArena::new(),
        errors: Vec::new(),
    };
    let declarations = file
        .declarations
        .iter()
        .map(|decl| builder.lower_decl(decl))
        .collect();

    if !builder.errors.is_empty() {
        tracing::debug!(errors = builder.errors.len(), "lowering failed");
        return Err(builder.errors);
    }

    tracing::debug!(
        exprs = builder.arena.expr_count(),
        decls = builder.arena.decl_count(),
        "lowered module"
    );
    Ok(Module {
        path: file.path.clone(),
        declarations,
        arena: builder.arena,
    })
}

struct AstBuilder<'a> {
    interner: &'a StringInterner,
    arena: ExprArena,
    errors: Vec<BuildError>,
}

impl AstBuilder<'_> {
    fn name(&self, ident: &Ident) -> Name {
        self.interner.intern(&ident.text)
    }

    fn lower_decl(&mut self, node: &DeclNode) -> DeclId {
        let kind = match &node.kind {
            DeclNodeKind::Import { path, mappings } => DeclKind::Import(ImportDecl {
                path: path.clone(),
                mappings: mappings
                    .iter()
                    .map(|m| ImportMapping {
                        name: self.name(&m.name),
                        alias: m.alias.as_ref().map(|alias| self.name(alias)),
                        span: m
                            .alias
                            .as_ref()
                            .map_or(m.name.span, |alias| m.name.span.merge(alias.span)),
                    })
                    .collect(),
            }),
            DeclNodeKind::Function {
                name,
                params,
                return_type,
                body,
            } => DeclKind::Function(FunctionDecl {
                name: self.name(name),
                params: self.lower_params(params),
                return_type: return_type.as_ref().map(|ty| self.lower_type_ref(ty)),
                body: self.lower_expr(body),
            }),
            DeclNodeKind::NamedValue {
                name,
                variable,
                declared_type,
                value,
            } => DeclKind::NamedValue(NamedValueDecl {
                name: self.name(name),
                mutable: *variable,
                declared_type: declared_type.as_ref().map(|ty| self.lower_type_ref(ty)),
                init: self.lower_expr(value),
            }),
            DeclNodeKind::Object { name, fields } => DeclKind::Object(ObjectDecl {
                name: self.name(name),
                fields: self.lower_fields(fields),
            }),
            DeclNodeKind::Signal {
                name,
                fields,
                result,
            } => DeclKind::Signal(SignalDecl {
                name: self.name(name),
                fields: self.lower_fields(fields),
                result: result.as_ref().map(|ty| self.lower_type_ref(ty)),
            }),
            DeclNodeKind::Option { name, members } => DeclKind::Option(OptionDecl {
                name: self.name(name),
                members: members.iter().map(|ty| self.lower_type_ref(ty)).collect(),
            }),
        };
        self.arena.alloc_decl(Decl {
            kind,
            span: node.span,
        })
    }

    fn lower_params(&mut self, params: &[ParamNode]) -> Vec<Param> {
        params
            .iter()
            .map(|p| Param {
                name: self.name(&p.name),
                ty: p.ty.as_ref().map(|ty| self.lower_type_ref(ty)),
                span: p.name.span,
            })
            .collect()
    }

    fn lower_fields(&mut self, fields: &[FieldNode]) -> Vec<Field> {
        fields
            .iter()
            .map(|f| Field {
                name: self.name(&f.name),
                ty: self.lower_type_ref(&f.ty),
                span: f.name.span.merge(f.ty.span),
            })
            .collect()
    }

    fn lower_type_ref(&mut self, node: &TypeRefNode) -> TypeRefId {
        let kind = match &node.kind {
            TypeRefNodeKind::Identifier(ident) => TypeRefKind::Identifier(self.name(ident)),
            TypeRefNodeKind::Function {
                params,
                return_type,
            } => TypeRefKind::Function {
                params: params.iter().map(|p| self.lower_type_ref(p)).collect(),
                return_type: self.lower_type_ref(return_type),
            },
        };
        self.arena.alloc_type_ref(TypeRef {
            kind,
            span: node.span,
        })
    }

    fn lower_pattern(&mut self, node: &PatternNode) -> Pattern {
        let kind = match &node.kind {
            PatternNodeKind::CaptureValue { ty, name } => PatternKind::CaptureValue {
                ty: self.lower_type_ref(ty),
                binding: self.name(name),
            },
            PatternNodeKind::TypeReferenceOnly { ty } => PatternKind::TypeReferenceOnly {
                ty: self.lower_type_ref(ty),
            },
        };
        Pattern {
            kind,
            span: node.span,
        }
    }

    fn lower_expr(&mut self, node: &ExprNode) -> ExprId {
        ensure_sufficient_stack(|| self.lower_expr_inner(node))
    }

    fn lower_expr_inner(&mut self, node: &ExprNode) -> ExprId {
        let start = node.span.start;
        let primary_span = match node.suffixes.first() {
            Some(first) => Span::new(start, first.span.start.max(start)),
            None => node.span,
        };
        let mut current = self.lower_primary(&node.primary, primary_span);

        let last = node.suffixes.len().saturating_sub(1);
        for (i, suffix) in node.suffixes.iter().enumerate() {
            let span = if i == last {
                node.span
            } else {
                Span::new(start, suffix.span.end.max(start))
            };
            let kind = match &suffix.kind {
                SuffixKind::Call { args } => ExprKind::Call {
                    callee: current,
                    args: args.iter().map(|a| self.lower_expr(a)).collect(),
                },
                SuffixKind::Member { name } => ExprKind::Member {
                    receiver: current,
                    field: self.name(name),
                },
                SuffixKind::PipeCall { callee, args } => ExprKind::PipeCall {
                    subject: current,
                    callee: self.lower_expr(callee),
                    args: args.iter().map(|a| self.lower_expr(a)).collect(),
                },
            };
            current = self.arena.alloc_expr(Expr { kind, span });
        }
        current
    }

    fn lower_primary(&mut self, node: &PrimaryNode, span: Span) -> ExprId {
        let kind = match node {
            PrimaryNode::Group(inner) => ExprKind::Group(self.lower_expr(inner)),
            PrimaryNode::Block(statements) => {
                ExprKind::Block(statements.iter().map(|s| self.lower_stmt(s)).collect())
            }
            PrimaryNode::Function {
                params,
                return_type,
                body,
            } => ExprKind::Function(FunctionExpr {
                params: self.lower_params(params),
                return_type: return_type.as_ref().map(|ty| self.lower_type_ref(ty)),
                body: self.lower_expr(body),
            }),
            PrimaryNode::Branch { subject, options } => ExprKind::Branch(BranchExpr {
                subject: subject.as_ref().map(|s| self.lower_expr(s)),
                options: options.iter().map(|o| self.lower_option(o)).collect(),
            }),
            PrimaryNode::Loop(body) => ExprKind::Loop(self.lower_expr(body)),
            PrimaryNode::Cause(payload) => ExprKind::Cause(self.lower_expr(payload)),
            PrimaryNode::Return(value) => {
                ExprKind::Return(value.as_ref().map(|v| self.lower_expr(v)))
            }
            PrimaryNode::Break(value) => {
                ExprKind::Break(value.as_ref().map(|v| self.lower_expr(v)))
            }
            PrimaryNode::StringLiteral(raw) => match decode_string(raw) {
                Some(text) => ExprKind::String(self.interner.intern(&text)),
                None => {
                    self.errors.push(BuildError::InvalidStringLiteral {
                        raw: raw.clone(),
                        span,
                    });
                    ExprKind::String(Name::EMPTY)
                }
            },
            PrimaryNode::NumberLiteral(raw) => match decode_number(raw) {
                Some(n) => ExprKind::Number(n),
                None => {
                    self.errors.push(BuildError::InvalidNumberLiteral {
                        raw: raw.clone(),
                        span,
                    });
                    ExprKind::Number(0.0)
                }
            },
            PrimaryNode::Identifier(text) => ExprKind::Ident(self.interner.intern(text)),
        };
        self.arena.alloc_expr(Expr { kind, span })
    }

    fn lower_option(&mut self, node: &BranchOptionNode) -> BranchOption {
        let kind = match &node.kind {
            BranchOptionNodeKind::If { condition, body } => BranchOptionKind::If {
                condition: self.lower_expr(condition),
                body: self.lower_expr(body),
            },
            BranchOptionNodeKind::Is { pattern, body } => BranchOptionKind::Is {
                pattern: self.lower_pattern(pattern),
                body: self.lower_expr(body),
            },
            BranchOptionNodeKind::Else { body } => BranchOptionKind::Else {
                body: self.lower_expr(body),
            },
        };
        BranchOption {
            kind,
            span: node.span,
        }
    }

    fn lower_stmt(&mut self, node: &StmtNode) -> Stmt {
        let kind = match &node.kind {
            StmtNodeKind::Expression(expr) => StmtKind::Expr(self.lower_expr(expr)),
            StmtNodeKind::Declaration(decl) => StmtKind::Decl(self.lower_decl(decl)),
            StmtNodeKind::Effect { pattern, body } => StmtKind::Effect {
                pattern: self.lower_pattern(pattern),
                body: self.lower_expr(body),
            },
            StmtNodeKind::Set { name, value } => StmtKind::Set {
                target: self.name(name),
                value: self.lower_expr(value),
            },
        };
        Stmt {
            kind,
            span: node.span,
        }
    }
}

/// Strip the quotes of a `STRING_LITERAL` token and decode its escapes.
/// Unknown escapes such as `\d` are kept as written.
fn decode_string(raw: &str) -> Option<String> {
    let inner = raw.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    Some(out)
}

/// Parse a number token. `_` separators are dropped first.
fn decode_number(raw: &str) -> Option<f64> {
    let digits = raw.replace('_', "");
    let starts_numeric = digits
        .trim_start_matches('-')
        .starts_with(|c: char| c.is_ascii_digit());
    if !starts_numeric {
        return None;
    }
    digits.parse::<f64>().ok().filter(|n| n.is_finite())
}
