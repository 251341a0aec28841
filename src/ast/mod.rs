//! Typed AST
//!
//! All nodes of a program live in one arena, the [Ast], and refer to each other by index
//! ([ExprId], [StmtId]). This includes the non-owning references of the tree: an array access
//! points at the identifier it indexes, and a `break` points at the loop it leaves.
//!
//! Nodes are only created through the [AstBuilder], which checks types as each node is
//! constructed. Once built, nodes never change, with one exception: a loop records its exit label
//! while it is being translated, so that the `break` statements inside it can jump there.

use std::fmt;
use std::ops::Index;

use crate::typ::Type;
use crate::util::{Label, Temp};

mod builder;
mod tree;

pub use builder::{AstBuilder, ControlFlowError, TypeError};
pub use tree::TreeNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StmtId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelOp {
    Eq,
    Ne,
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    Or,
    And,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub typ: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Constant(String),
    Ident {
        name: String,
        offset: usize,
    },
    Access {
        array: ExprId,
        index: ExprId,
    },
    Arith {
        op: ArithOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },

    /// Only ever created during translation
    Temp(Temp),

    Or {
        lhs: ExprId,
        rhs: ExprId,
    },
    And {
        lhs: ExprId,
        rhs: ExprId,
    },
    Not(ExprId),
    Rel {
        op: RelOp,
        lhs: ExprId,
        rhs: ExprId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stmt {
    Empty,
    Assign {
        target: ExprId,
        value: ExprId,
    },
    AssignElem {
        array: ExprId,
        index: ExprId,
        value: ExprId,
    },
    Seq {
        first: StmtId,
        second: StmtId,
    },
    If {
        cond: ExprId,
        body: StmtId,
    },
    IfElse {
        cond: ExprId,
        then_branch: StmtId,
        else_branch: StmtId,
    },
    While {
        cond: ExprId,
        body: StmtId,
        after: Option<Label>,
    },
    DoWhile {
        body: StmtId,
        cond: ExprId,
        after: Option<Label>,
    },
    Break {
        enclosing: StmtId,
    },

    /// A loop whose condition and body are still being built
    OpenLoop,
}

/// The node arena
#[derive(Debug, Clone)]
pub struct Ast {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
}

impl Ast {
    /// The `true` constant; branches on it are decided at compile time
    pub const TRUE: ExprId = ExprId(0);

    /// The `false` constant; branches on it are decided at compile time
    pub const FALSE: ExprId = ExprId(1);

    /// The empty statement
    pub const EMPTY: StmtId = StmtId(0);

    pub fn new() -> Self {
        let constant = |literal: &str| Expr {
            kind: ExprKind::Constant(String::from(literal)),
            typ: Type::Bool,
        };

        Self {
            exprs: vec![constant("true"), constant("false")],
            stmts: vec![Stmt::Empty],
        }
    }

    pub(crate) fn push_expr(&mut self, expr: Expr) -> ExprId {
        self.exprs.push(expr);
        ExprId(self.exprs.len() - 1)
    }

    pub(crate) fn push_stmt(&mut self, stmt: Stmt) -> StmtId {
        self.stmts.push(stmt);
        StmtId(self.stmts.len() - 1)
    }

    pub(crate) fn replace_stmt(&mut self, id: StmtId, stmt: Stmt) {
        self.stmts[id.0] = stmt;
    }

    /// Record the exit label of a loop
    ///
    /// Returns `false` if `id` is not a loop.
    pub fn set_loop_exit(&mut self, id: StmtId, label: Label) -> bool {
        match &mut self.stmts[id.0] {
            Stmt::While { after, .. } | Stmt::DoWhile { after, .. } => {
                *after = Some(label);
                true
            }
            _ => false,
        }
    }

    /// Whether the expression is a name, a temporary or a constant
    pub fn is_simple(&self, id: ExprId) -> bool {
        matches!(
            self[id].kind,
            ExprKind::Constant(_) | ExprKind::Ident { .. } | ExprKind::Temp(_)
        )
    }

    /// The textual form of an expression as it appears in the emitted code
    pub fn text(&self, id: ExprId) -> String {
        match &self[id].kind {
            ExprKind::Constant(literal) => literal.clone(),
            ExprKind::Ident { name, .. } => name.clone(),
            ExprKind::Temp(temp) => temp.to_string(),
            ExprKind::Access { array, index } => {
                format!("{} [ {} ]", self.text(*array), self.text(*index))
            }
            ExprKind::Arith { op, lhs, rhs } => {
                format!("{} {op} {}", self.text(*lhs), self.text(*rhs))
            }
            ExprKind::Unary { op, operand } => format!("{op} {}", self.text(*operand)),
            ExprKind::Or { lhs, rhs } => {
                format!("{} {} {}", self.text(*lhs), LogicalOp::Or, self.text(*rhs))
            }
            ExprKind::And { lhs, rhs } => {
                format!("{} {} {}", self.text(*lhs), LogicalOp::And, self.text(*rhs))
            }
            ExprKind::Not(operand) => format!("{} {}", LogicalOp::Not, self.text(*operand)),
            ExprKind::Rel { op, lhs, rhs } => {
                format!("{} {op} {}", self.text(*lhs), self.text(*rhs))
            }
        }
    }
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<ExprId> for Ast {
    type Output = Expr;

    fn index(&self, id: ExprId) -> &Self::Output {
        &self.exprs[id.0]
    }
}

impl Index<StmtId> for Ast {
    type Output = Stmt;

    fn index(&self, id: StmtId) -> &Self::Output {
        &self.stmts[id.0]
    }
}

/// A fully built and type checked program, ready for translation
#[derive(Debug, Clone)]
pub struct TypedProgram {
    pub ast: Ast,
    pub root: StmtId,
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithOp::Add => write!(f, "+"),
            ArithOp::Sub => write!(f, "-"),
            ArithOp::Mul => write!(f, "*"),
            ArithOp::Div => write!(f, "/"),
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Minus => write!(f, "minus"),
        }
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelOp::Eq => write!(f, "=="),
            RelOp::Ne => write!(f, "!="),
            RelOp::Less => write!(f, "<"),
            RelOp::LessEq => write!(f, "<="),
            RelOp::Greater => write!(f, ">"),
            RelOp::GreaterEq => write!(f, ">="),
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOp::Or => write!(f, "||"),
            LogicalOp::And => write!(f, "&&"),
            LogicalOp::Not => write!(f, "!"),
        }
    }
}
