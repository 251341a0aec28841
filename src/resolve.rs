//! Name resolution
//!
//! Turns the syntax tree into a [TypedProgram]. Every name is looked up in the enclosing scopes,
//! every declaration gets a storage offset, and every node is built through the [AstBuilder],
//! which checks its type. The first error stops resolution.

use std::collections::HashMap;

use miette::Diagnostic;
use thiserror::Error;
use tracing::debug;

use crate::ast::{
    ArithOp, Ast, AstBuilder, ControlFlowError, ExprId, RelOp, StmtId, TypeError, TypedProgram,
    UnaryOp,
};
use crate::parsing::syntax::{
    BinaryOperator, Block, Declaration, Expression, ExpressionKind, Location, Statement,
    StatementKind, UnaryOperator,
};
use crate::Span;

#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum ResolveError {
    #[error("Use of undeclared variable {name}")]
    #[diagnostic(help("Variables must be declared at the start of this block or an enclosing one"))]
    Undeclared {
        name: String,

        #[label("not declared")]
        span: Span,
    },

    #[error("Variable {name} is declared twice in the same block")]
    Redeclared {
        name: String,

        #[label("declared again here")]
        span: Span,

        #[label("first declared here")]
        first: Span,
    },

    #[error("The type of {name} is too large")]
    TooLarge {
        name: String,

        #[label("declared here")]
        span: Span,
    },

    #[error("Not enough storage left for {name}")]
    #[diagnostic(help("The variables declared before it already fill the address space"))]
    StorageOverflow {
        name: String,

        #[label("declared here")]
        span: Span,
    },

    #[error("{error}")]
    Type {
        error: TypeError,

        #[help]
        help: Option<String>,

        #[label("here")]
        span: Span,
    },

    #[error("{error}")]
    ControlFlow {
        error: ControlFlowError,

        #[help]
        help: Option<String>,

        #[label("here")]
        span: Span,
    },
}

impl ResolveError {
    fn typ(error: TypeError, span: Span) -> Self {
        let help = error.help().map(|help| help.to_string());
        ResolveError::Type { error, help, span }
    }

    fn control_flow(error: ControlFlowError, span: Span) -> Self {
        let help = error.help().map(|help| help.to_string());
        ResolveError::ControlFlow { error, help, span }
    }
}

type Result<T> = std::result::Result<T, ResolveError>;

/// Resolve names and check types of a parsed program
pub fn resolve(program: &Block) -> Result<TypedProgram> {
    let mut resolver = Resolver::default();
    let root = resolver.block(program)?;
    debug!(storage = resolver.offset, "resolution finished");
    Ok(resolver.builder.finish(root))
}

/// A declared variable
#[derive(Debug, Clone, Copy)]
struct Symbol {
    id: ExprId,
    span: Span,
}

#[derive(Debug, Default)]
struct Resolver {
    builder: AstBuilder,

    /// Enclosing blocks, innermost last
    scopes: Vec<HashMap<String, Symbol>>,

    /// Next free storage offset in bytes
    offset: usize,
}

impl Resolver {
    fn block(&mut self, block: &Block) -> Result<StmtId> {
        let mut scope = HashMap::new();
        for decl in &block.decls {
            if let Some(first) = scope.get(&decl.name) {
                let Symbol { span: first, .. } = *first;
                return Err(ResolveError::Redeclared {
                    name: decl.name.clone(),
                    span: decl.span,
                    first,
                });
            }
            let id = self.declare(decl)?;
            scope.insert(decl.name.clone(), Symbol { id, span: decl.span });
        }

        self.scopes.push(scope);
        let stmts: Result<Vec<_>> = block.stmts.iter().map(|stmt| self.stmt(stmt)).collect();
        self.scopes.pop();

        Ok(stmts?
            .into_iter()
            .rev()
            .fold(Ast::EMPTY, |rest, stmt| self.builder.seq(stmt, rest)))
    }

    fn declare(&mut self, decl: &Declaration) -> Result<ExprId> {
        let typ = decl.typ().ok_or_else(|| ResolveError::TooLarge {
            name: decl.name.clone(),
            span: decl.span,
        })?;
        let offset = self.offset;
        self.offset = offset
            .checked_add(typ.width())
            .ok_or_else(|| ResolveError::StorageOverflow {
                name: decl.name.clone(),
                span: decl.span,
            })?;

        debug!(name = %decl.name, %typ, offset, "declared");
        Ok(self.builder.ident(decl.name.clone(), typ, offset))
    }

    fn lookup(&self, name: &str, span: Span) -> Result<ExprId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .map(|symbol| symbol.id)
            .ok_or_else(|| ResolveError::Undeclared {
                name: name.to_string(),
                span,
            })
    }

    fn stmt(&mut self, stmt: &Statement) -> Result<StmtId> {
        match &stmt.kind {
            StatementKind::Empty => Ok(self.builder.empty()),
            StatementKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let cond_id = self.expr(cond)?;
                let then_branch = self.stmt(then_branch)?;
                match else_branch {
                    Some(else_branch) => {
                        let else_branch = self.stmt(else_branch)?;
                        self.builder.if_else(cond_id, then_branch, else_branch)
                    }
                    None => self.builder.if_then(cond_id, then_branch),
                }
                .map_err(|error| ResolveError::typ(error, cond.span))
            }
            StatementKind::While { cond, body } => {
                // `break` in the condition or body must find this loop
                let id = self.builder.open_loop();
                let cond_id = self.expr(cond)?;
                let body = self.stmt(body)?;
                self.builder
                    .close_while(id, cond_id, body)
                    .map_err(|error| ResolveError::typ(error, cond.span))
            }
            StatementKind::DoWhile { body, cond } => {
                let id = self.builder.open_loop();
                let body = self.stmt(body)?;
                let cond_id = self.expr(cond)?;
                self.builder
                    .close_do_while(id, body, cond_id)
                    .map_err(|error| ResolveError::typ(error, cond.span))
            }
            StatementKind::Break => self
                .builder
                .break_loop()
                .map_err(|error| ResolveError::control_flow(error, stmt.span)),
            StatementKind::Block(block) => self.block(block),
            StatementKind::Assign { target, value } => {
                let target_id = self.location(target)?;
                let value = self.expr(value)?;
                if target.indices.is_empty() {
                    self.builder.assign(target_id, value)
                } else {
                    self.builder.assign_elem(target_id, value)
                }
                .map_err(|error| ResolveError::typ(error, stmt.span))
            }
        }
    }

    fn location(&mut self, location: &Location) -> Result<ExprId> {
        let var = self.lookup(&location.name, location.span)?;
        if location.indices.is_empty() {
            return Ok(var);
        }

        let indices: Vec<_> = location
            .indices
            .iter()
            .map(|index| self.expr(index))
            .collect::<Result<_>>()?;

        self.builder
            .access(var, &indices)
            .map_err(|error| ResolveError::typ(error, location.span))
    }

    fn expr(&mut self, expr: &Expression) -> Result<ExprId> {
        let type_error = |error| ResolveError::typ(error, expr.span);

        match &expr.kind {
            ExpressionKind::Int(n) => Ok(self.builder.int(*n)),
            ExpressionKind::Real(r) => Ok(self.builder.real(r.clone())),
            ExpressionKind::Bool(b) => Ok(self.builder.boolean(*b)),
            ExpressionKind::Location(location) => self.location(location),
            ExpressionKind::Unary { op, inner } => {
                let inner = self.expr(inner)?;
                match op {
                    UnaryOperator::Neg => self.builder.unary(UnaryOp::Minus, inner),
                    UnaryOperator::Not => self.builder.not(inner),
                }
                .map_err(type_error)
            }
            ExpressionKind::Binary { op, lhs, rhs } => {
                let lhs = self.expr(lhs)?;
                let rhs = self.expr(rhs)?;
                let b = &mut self.builder;
                match op {
                    BinaryOperator::Or => b.or(lhs, rhs),
                    BinaryOperator::And => b.and(lhs, rhs),
                    BinaryOperator::Eq => b.rel(RelOp::Eq, lhs, rhs),
                    BinaryOperator::Ne => b.rel(RelOp::Ne, lhs, rhs),
                    BinaryOperator::Less => b.rel(RelOp::Less, lhs, rhs),
                    BinaryOperator::LessEq => b.rel(RelOp::LessEq, lhs, rhs),
                    BinaryOperator::Greater => b.rel(RelOp::Greater, lhs, rhs),
                    BinaryOperator::GreaterEq => b.rel(RelOp::GreaterEq, lhs, rhs),
                    BinaryOperator::Add => b.arith(ArithOp::Add, lhs, rhs),
                    BinaryOperator::Sub => b.arith(ArithOp::Sub, lhs, rhs),
                    BinaryOperator::Mul => b.arith(ArithOp::Mul, lhs, rhs),
                    BinaryOperator::Div => b.arith(ArithOp::Div, lhs, rhs),
                }
                .map_err(type_error)
            }
        }
    }
}
