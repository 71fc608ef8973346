//! Parse-tree input contract.
//!
//! The parser is an external collaborator. It hands over one [`ParsedFile`]
//! per source file: owned nodes whose kinds map one-to-one onto the grammar
//! categories, with raw token text and byte spans. Newlines and comments are
//! already gone.
//!
//! The constructor helpers at the bottom build nodes with dummy spans. Hosts
//! without a parser and the test suites use them to write programs directly.

use crate::Span;

/// Identifier token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ident {
    pub text: String,
    pub span: Span,
}

/// One parsed source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedFile {
    /// Opaque `PATH` of the file.
    pub path: String,
    pub declarations: Vec<DeclNode>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclNode {
    pub kind: DeclNodeKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclNodeKind {
    /// `import PATH (mapping, ...)`
    Import {
        path: String,
        mappings: Vec<MappingNode>,
    },
    /// `function name(params): Ret body`
    Function {
        name: Ident,
        params: Vec<ParamNode>,
        return_type: Option<TypeRefNode>,
        body: ExprNode,
    },
    /// `let [variable] name[: Type] = value`
    NamedValue {
        name: Ident,
        variable: bool,
        declared_type: Option<TypeRefNode>,
        value: ExprNode,
    },
    Object {
        name: Ident,
        fields: Vec<FieldNode>,
    },
    Signal {
        name: Ident,
        fields: Vec<FieldNode>,
        result: Option<TypeRefNode>,
    },
    Option {
        name: Ident,
        members: Vec<TypeRefNode>,
    },
}

/// `name` or `name as alias` inside an import.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappingNode {
    pub name: Ident,
    pub alias: Option<Ident>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamNode {
    pub name: Ident,
    pub ty: Option<TypeRefNode>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldNode {
    pub name: Ident,
    pub ty: TypeRefNode,
}

/// A primary expression followed by its suffix chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExprNode {
    pub primary: PrimaryNode,
    pub suffixes: Vec<SuffixNode>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrimaryNode {
    Group(Box<ExprNode>),
    Block(Vec<StmtNode>),
    /// `fn(params): Ret body`
    Function {
        params: Vec<ParamNode>,
        return_type: Option<TypeRefNode>,
        body: Box<ExprNode>,
    },
    /// `branch [with subject] { options }`
    Branch {
        subject: Option<Box<ExprNode>>,
        options: Vec<BranchOptionNode>,
    },
    Loop(Box<ExprNode>),
    Cause(Box<ExprNode>),
    Return(Option<Box<ExprNode>>),
    Break(Option<Box<ExprNode>>),
    /// Raw `STRING_LITERAL` token, quotes included.
    StringLiteral(String),
    /// Raw `NUMBER_LITERAL` token.
    NumberLiteral(String),
    Identifier(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuffixNode {
    pub kind: SuffixKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SuffixKind {
    /// `(args)`
    Call { args: Vec<ExprNode> },
    /// `.name`
    Member { name: Ident },
    /// `>> callee(args)`
    PipeCall {
        callee: Box<ExprNode>,
        args: Vec<ExprNode>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BranchOptionNode {
    pub kind: BranchOptionNodeKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BranchOptionNodeKind {
    If { condition: ExprNode, body: ExprNode },
    Is { pattern: PatternNode, body: ExprNode },
    Else { body: ExprNode },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StmtNode {
    pub kind: StmtNodeKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StmtNodeKind {
    Expression(ExprNode),
    Declaration(DeclNode),
    /// `effect for pattern body`
    Effect { pattern: PatternNode, body: ExprNode },
    /// `set name = value`
    Set { name: Ident, value: ExprNode },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternNode {
    pub kind: PatternNodeKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatternNodeKind {
    CaptureValue { ty: TypeRefNode, name: Ident },
    TypeReferenceOnly { ty: TypeRefNode },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeRefNode {
    pub kind: TypeRefNodeKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRefNodeKind {
    Identifier(Ident),
    /// `Function(params): Ret`
    Function {
        params: Vec<TypeRefNode>,
        return_type: Box<TypeRefNode>,
    },
}

// Constructors

impl Ident {
    pub fn new(text: impl Into<String>) -> Self {
        Ident {
            text: text.into(),
            span: Span::DUMMY,
        }
    }
}

impl From<&str> for Ident {
    fn from(text: &str) -> Self {
        Ident::new(text)
    }
}

impl ParsedFile {
    pub fn new(path: impl Into<String>, declarations: Vec<DeclNode>) -> Self {
        ParsedFile {
            path: path.into(),
            declarations,
        }
    }
}

impl DeclNode {
    fn from_kind(kind: DeclNodeKind) -> Self {
        DeclNode {
            kind,
            span: Span::DUMMY,
        }
    }

    /// `import path (name, name as alias)`
    pub fn import(path: &str, mappings: &[(&str, Option<&str>)]) -> Self {
        Self::from_kind(DeclNodeKind::Import {
            path: path.to_owned(),
            mappings: mappings
                .iter()
                .map(|(name, alias)| MappingNode {
                    name: Ident::new(*name),
                    alias: alias.map(Ident::new),
                })
                .collect(),
        })
    }

    pub fn function(
        name: &str,
        params: Vec<ParamNode>,
        return_type: Option<TypeRefNode>,
        body: ExprNode,
    ) -> Self {
        Self::from_kind(DeclNodeKind::Function {
            name: Ident::new(name),
            params,
            return_type,
            body,
        })
    }

    /// `let name = value`
    pub fn let_value(name: &str, value: ExprNode) -> Self {
        Self::named_value(name, false, None, value)
    }

    /// `let variable name = value`
    pub fn let_variable(name: &str, value: ExprNode) -> Self {
        Self::named_value(name, true, None, value)
    }

    pub fn named_value(
        name: &str,
        variable: bool,
        declared_type: Option<TypeRefNode>,
        value: ExprNode,
    ) -> Self {
        Self::from_kind(DeclNodeKind::NamedValue {
            name: Ident::new(name),
            variable,
            declared_type,
            value,
        })
    }

    pub fn object(name: &str, fields: Vec<FieldNode>) -> Self {
        Self::from_kind(DeclNodeKind::Object {
            name: Ident::new(name),
            fields,
        })
    }

    pub fn signal(name: &str, fields: Vec<FieldNode>, result: Option<TypeRefNode>) -> Self {
        Self::from_kind(DeclNodeKind::Signal {
            name: Ident::new(name),
            fields,
            result,
        })
    }

    pub fn option(name: &str, members: Vec<TypeRefNode>) -> Self {
        Self::from_kind(DeclNodeKind::Option {
            name: Ident::new(name),
            members,
        })
    }
}

impl FieldNode {
    pub fn new(name: &str, ty: TypeRefNode) -> Self {
        FieldNode {
            name: Ident::new(name),
            ty,
        }
    }
}

impl ParamNode {
    pub fn typed(name: &str, ty: TypeRefNode) -> Self {
        ParamNode {
            name: Ident::new(name),
            ty: Some(ty),
        }
    }

    pub fn untyped(name: &str) -> Self {
        ParamNode {
            name: Ident::new(name),
            ty: None,
        }
    }
}

impl TypeRefNode {
    pub fn named(name: &str) -> Self {
        TypeRefNode {
            kind: TypeRefNodeKind::Identifier(Ident::new(name)),
            span: Span::DUMMY,
        }
    }

    pub fn function(params: Vec<TypeRefNode>, return_type: TypeRefNode) -> Self {
        TypeRefNode {
            kind: TypeRefNodeKind::Function {
                params,
                return_type: Box::new(return_type),
            },
            span: Span::DUMMY,
        }
    }
}

impl PatternNode {
    /// `Type as name`
    pub fn capture(ty: TypeRefNode, name: &str) -> Self {
        PatternNode {
            kind: PatternNodeKind::CaptureValue {
                ty,
                name: Ident::new(name),
            },
            span: Span::DUMMY,
        }
    }

    pub fn type_only(ty: TypeRefNode) -> Self {
        PatternNode {
            kind: PatternNodeKind::TypeReferenceOnly { ty },
            span: Span::DUMMY,
        }
    }
}

impl BranchOptionNode {
    fn from_kind(kind: BranchOptionNodeKind) -> Self {
        BranchOptionNode {
            kind,
            span: Span::DUMMY,
        }
    }

    pub fn if_arm(condition: ExprNode, body: ExprNode) -> Self {
        Self::from_kind(BranchOptionNodeKind::If { condition, body })
    }

    pub fn is_arm(pattern: PatternNode, body: ExprNode) -> Self {
        Self::from_kind(BranchOptionNodeKind::Is { pattern, body })
    }

    pub fn else_arm(body: ExprNode) -> Self {
        Self::from_kind(BranchOptionNodeKind::Else { body })
    }
}

impl StmtNode {
    fn from_kind(kind: StmtNodeKind) -> Self {
        StmtNode {
            kind,
            span: Span::DUMMY,
        }
    }

    pub fn expr(expr: ExprNode) -> Self {
        Self::from_kind(StmtNodeKind::Expression(expr))
    }

    pub fn decl(decl: DeclNode) -> Self {
        Self::from_kind(StmtNodeKind::Declaration(decl))
    }

    pub fn effect(pattern: PatternNode, body: ExprNode) -> Self {
        Self::from_kind(StmtNodeKind::Effect { pattern, body })
    }

    pub fn set(name: &str, value: ExprNode) -> Self {
        Self::from_kind(StmtNodeKind::Set {
            name: Ident::new(name),
            value,
        })
    }
}

impl ExprNode {
    pub fn primary(primary: PrimaryNode) -> Self {
        ExprNode {
            primary,
            suffixes: Vec::new(),
            span: Span::DUMMY,
        }
    }

    pub fn ident(name: &str) -> Self {
        Self::primary(PrimaryNode::Identifier(name.to_owned()))
    }

    /// String literal from its decoded value; quotes and escapes are added.
    pub fn string(value: &str) -> Self {
        let mut raw = String::with_capacity(value.len() + 2);
        raw.push('"');
        for c in value.chars() {
            match c {
                '"' => raw.push_str("\\\""),
                '\\' => raw.push_str("\\\\"),
                '\n' => raw.push_str("\\n"),
                '\t' => raw.push_str("\\t"),
                c => raw.push(c),
            }
        }
        raw.push('"');
        Self::primary(PrimaryNode::StringLiteral(raw))
    }

    pub fn number(text: &str) -> Self {
        Self::primary(PrimaryNode::NumberLiteral(text.to_owned()))
    }

    pub fn group(inner: ExprNode) -> Self {
        Self::primary(PrimaryNode::Group(Box::new(inner)))
    }

    pub fn block(statements: Vec<StmtNode>) -> Self {
        Self::primary(PrimaryNode::Block(statements))
    }

    pub fn function(
        params: Vec<ParamNode>,
        return_type: Option<TypeRefNode>,
        body: ExprNode,
    ) -> Self {
        Self::primary(PrimaryNode::Function {
            params,
            return_type,
            body: Box::new(body),
        })
    }

    pub fn branch(subject: Option<ExprNode>, options: Vec<BranchOptionNode>) -> Self {
        Self::primary(PrimaryNode::Branch {
            subject: subject.map(Box::new),
            options,
        })
    }

    pub fn loop_of(body: ExprNode) -> Self {
        Self::primary(PrimaryNode::Loop(Box::new(body)))
    }

    pub fn cause(payload: ExprNode) -> Self {
        Self::primary(PrimaryNode::Cause(Box::new(payload)))
    }

    pub fn return_with(value: Option<ExprNode>) -> Self {
        Self::primary(PrimaryNode::Return(value.map(Box::new)))
    }

    pub fn break_with(value: Option<ExprNode>) -> Self {
        Self::primary(PrimaryNode::Break(value.map(Box::new)))
    }

    fn with_suffix(mut self, kind: SuffixKind) -> Self {
        self.suffixes.push(SuffixNode {
            kind,
            span: Span::DUMMY,
        });
        self
    }

    /// Append a `(args)` suffix.
    #[must_use]
    pub fn call(self, args: Vec<ExprNode>) -> Self {
        self.with_suffix(SuffixKind::Call { args })
    }

    /// Append a `.name` suffix.
    #[must_use]
    pub fn member(self, name: &str) -> Self {
        self.with_suffix(SuffixKind::Member {
            name: Ident::new(name),
        })
    }

    /// Append a `>> callee(args)` suffix.
    #[must_use]
    pub fn pipe(self, callee: ExprNode, args: Vec<ExprNode>) -> Self {
        self.with_suffix(SuffixKind::PipeCall {
            callee: Box::new(callee),
            args,
        })
    }
}
