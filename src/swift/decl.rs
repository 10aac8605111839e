//! Swift declaration tree for code generation.
//!
//! This module defines the generated-Swift representation:
//! - SwiftTypeRef: type references (named, generic, optional, array,
//!   placeholder)
//! - Decl: declarations (import, typealias, property, type block, function)
//! - Expr/Stmt: the small expression/statement subset test bodies need

/// Reference to a Swift type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwiftTypeRef {
    /// Bare name: `String`, `Widgets`
    Named(String),
    /// Generic instantiation: `Attribute<String>`
    Generic {
        base: String,
        args: Vec<SwiftTypeRef>,
    },
    /// Optional wrapper: `T?`
    Optional(Box<SwiftTypeRef>),
    /// Array sugar: `[T]`
    Array(Box<SwiftTypeRef>),
    /// A stand-in emitted when no concrete mapping could be determined,
    /// carrying a human-readable hint for manual completion. Rendered as an
    /// Xcode editor placeholder so the generated file will not compile until
    /// someone fills it in.
    Placeholder { hint: String },
}

impl SwiftTypeRef {
    pub fn named(name: &str) -> Self {
        SwiftTypeRef::Named(name.to_string())
    }

    pub fn generic(base: &str, args: Vec<SwiftTypeRef>) -> Self {
        SwiftTypeRef::Generic {
            base: base.to_string(),
            args,
        }
    }

    pub fn optional(self) -> Self {
        SwiftTypeRef::Optional(Box::new(self))
    }

    pub fn array_of(self) -> Self {
        SwiftTypeRef::Array(Box::new(self))
    }

    pub fn placeholder(hint: &str) -> Self {
        SwiftTypeRef::Placeholder {
            hint: hint.to_string(),
        }
    }

    /// Whether this reference (or anything it wraps) is a placeholder.
    pub fn contains_placeholder(&self) -> bool {
        match self {
            SwiftTypeRef::Placeholder { .. } => true,
            SwiftTypeRef::Named(_) => false,
            SwiftTypeRef::Optional(inner) | SwiftTypeRef::Array(inner) => {
                inner.contains_placeholder()
            }
            SwiftTypeRef::Generic { args, .. } => args.iter().any(Self::contains_placeholder),
        }
    }
}

/// Kind of a type block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Struct,
    Enum,
    Extension,
}

/// A stored property declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub name: String,
    /// Omitted when the initializer fixes the type.
    pub type_ref: Option<SwiftTypeRef>,
    pub value: Option<Expr>,
    pub is_static: bool,
    pub is_public: bool,
}

/// A struct/enum/extension block with nested declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeBlock {
    pub kind: BlockKind,
    pub name: String,
    pub conformances: Vec<String>,
    pub decls: Vec<Decl>,
    pub is_public: bool,
}

/// A function declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub generic_params: Vec<String>,
    /// `where` clause constraints as (parameter, requirement) pairs.
    pub generic_constraints: Vec<(String, String)>,
    pub params: Vec<FunctionParam>,
    pub body: Vec<Stmt>,
}

/// One function parameter; `label` is the external argument label.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionParam {
    pub label: Option<String>,
    pub name: String,
    pub type_ref: SwiftTypeRef,
}

/// One node of the declaration forest.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Import { module: String },
    Typealias {
        name: String,
        target: SwiftTypeRef,
        is_public: bool,
    },
    Property(PropertyDecl),
    TypeBlock(TypeBlock),
    Function(FunctionDecl),
    /// Literal source that does not fit the tree.
    Raw(String),
}

impl Decl {
    /// The name this declaration binds at its scope, used for global
    /// deduplication. Imports and raw blocks are unnamed.
    pub fn name(&self) -> Option<&str> {
        match self {
            Decl::Typealias { name, .. } => Some(name),
            Decl::Property(p) => Some(&p.name),
            Decl::TypeBlock(b) => Some(&b.name),
            Decl::Function(f) => Some(&f.name),
            Decl::Import { .. } | Decl::Raw(_) => None,
        }
    }

    pub fn typealias(name: &str, target: SwiftTypeRef) -> Self {
        Decl::Typealias {
            name: name.to_string(),
            target,
            is_public: true,
        }
    }

    /// `public let name: Type`
    pub fn let_property(name: &str, type_ref: SwiftTypeRef) -> Self {
        Decl::Property(PropertyDecl {
            name: name.to_string(),
            type_ref: Some(type_ref),
            value: None,
            is_static: false,
            is_public: true,
        })
    }

    /// `public static let name: Type = value`
    pub fn static_property(name: &str, type_ref: SwiftTypeRef, value: Expr) -> Self {
        Decl::Property(PropertyDecl {
            name: name.to_string(),
            type_ref: Some(type_ref),
            value: Some(value),
            is_static: true,
            is_public: true,
        })
    }

    pub fn block(kind: BlockKind, name: &str, conformances: &[&str], decls: Vec<Decl>) -> Self {
        Decl::TypeBlock(TypeBlock {
            kind,
            name: name.to_string(),
            conformances: conformances.iter().map(ToString::to_string).collect(),
            decls,
            is_public: true,
        })
    }
}

/// Part of a string interpolation.
#[derive(Debug, Clone, PartialEq)]
pub enum InterpPart {
    Literal(String),
    Expr(Expr),
}

/// A Swift expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    Str(String),
    Int(i64),
    Bool(bool),
    /// Function call with optionally labeled arguments.
    Call {
        callee: Box<Expr>,
        args: Vec<(Option<String>, Expr)>,
    },
    Member {
        base: Box<Expr>,
        name: String,
    },
    /// `"\(a)/b"` string interpolation.
    StringInterp(Vec<InterpPart>),
    ArrayLit(Vec<Expr>),
    DictLit(Vec<(Expr, Expr)>),
    /// Source that does not fit the expression tree.
    Raw(String),
}

impl Expr {
    pub fn ident(name: &str) -> Self {
        Expr::Ident(name.to_string())
    }

    /// A string literal; escaping happens at emission time.
    pub fn str(value: &str) -> Self {
        Expr::Str(value.to_string())
    }

    pub fn call(callee: Expr, args: Vec<(Option<String>, Expr)>) -> Self {
        Expr::Call {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn member(base: Expr, name: &str) -> Self {
        Expr::Member {
            base: Box::new(base),
            name: name.to_string(),
        }
    }
}

/// A statement in a function body.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Let {
        name: String,
        type_ref: Option<SwiftTypeRef>,
        value: Expr,
    },
    Expr(Expr),
    Raw(String),
}
