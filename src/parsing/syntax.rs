//! Syntax tree
//!
//! The untyped tree produced by the parser. It mirrors the source closely and carries a [Span]
//! on every node, so later stages can point at the offending code. Names are not resolved and
//! types are not checked yet; see [crate::resolve] for that.

use std::fmt;

use crate::typ::Type;
use crate::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub decls: Vec<Declaration>,
    pub stmts: Vec<Statement>,
    pub span: Span,
}

/// `int[10][5] a;` has basic type `int` and dimensions `[10, 5]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub basic: BasicType,
    pub dims: Vec<usize>,
    pub name: String,
    pub span: Span,
}

impl Declaration {
    /// The declared type, e.g. `[10][5]int` for `int[10][5]`
    ///
    /// `None` if the total width overflows.
    pub fn typ(&self) -> Option<Type> {
        self.dims
            .iter()
            .rev()
            .try_fold(self.basic.typ(), |of, &size| Type::array(size, of))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicType {
    Char,
    Int,
    Float,
    Bool,
}

impl BasicType {
    pub fn typ(self) -> Type {
        match self {
            BasicType::Char => Type::Char,
            BasicType::Int => Type::Int,
            BasicType::Float => Type::Float,
            BasicType::Bool => Type::Bool,
        }
    }
}

impl fmt::Display for BasicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.typ().fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    Empty,

    If {
        cond: Expression,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
    },

    While {
        cond: Expression,
        body: Box<Statement>,
    },

    DoWhile {
        body: Box<Statement>,
        cond: Expression,
    },

    Break,

    Block(Block),

    Assign {
        target: Location,
        value: Expression,
    },
}

/// A variable, optionally indexed: `a`, `a[i]`, `a[i][j + 1]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub name: String,
    pub indices: Vec<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

impl Expression {
    pub fn binary(op: BinaryOperator, lhs: Expression, rhs: Expression) -> Self {
        Self {
            span: lhs.span.to(rhs.span),
            kind: ExpressionKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpressionKind {
    Int(usize),

    /// Kept as written, e.g. `3.14`
    Real(String),

    Bool(bool),

    Location(Location),

    Unary {
        op: UnaryOperator,
        inner: Box<Expression>,
    },

    Binary {
        op: BinaryOperator,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Or,
    And,
    Eq,
    Ne,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Add,
    Sub,
    Mul,
    Div,
}
