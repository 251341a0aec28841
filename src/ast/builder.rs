//! Construction of the typed AST
//!
//! Every constructor checks the types of its operands and fails right away if they do not fit.
//! The builder also keeps track of the loops that are currently being built, which is how a
//! `break` finds the loop it belongs to.

use miette::Diagnostic;
use thiserror::Error;

use super::*;

#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum TypeError {
    #[error("The operator {op} cannot be applied to {lhs} and {rhs}")]
    #[diagnostic(help("Arithmetic needs numeric operands: char, int or float"))]
    Arithmetic { op: ArithOp, lhs: Type, rhs: Type },

    #[error("The operator {op} cannot be applied to {operand}")]
    #[diagnostic(help("Negation needs a numeric operand: char, int or float"))]
    Unary { op: UnaryOp, operand: Type },

    #[error("The operator {op} cannot be applied to {lhs} and {rhs}")]
    #[diagnostic(help("Logical operators need boolean operands"))]
    Logical { op: LogicalOp, lhs: Type, rhs: Type },

    #[error("The operator ! cannot be applied to {operand}")]
    #[diagnostic(help("Logical operators need boolean operands"))]
    Not { operand: Type },

    #[error("Cannot compare {lhs} with {rhs} using {op}")]
    #[diagnostic(help("Numbers compare with numbers and booleans with booleans, arrays not at all"))]
    Relational { op: RelOp, lhs: Type, rhs: Type },

    #[error("Cannot assign a value of type {value} to a location of type {target}")]
    Assignment { target: Type, value: Type },

    #[error("Boolean required in {construct}, found {found}")]
    BooleanRequired { construct: &'static str, found: Type },

    #[error("A value of type {typ} cannot be indexed")]
    NotIndexable { typ: Type },

    #[error("Array access without an index")]
    MissingIndex,

    #[error("Only variables and array elements can be assigned to or indexed")]
    InvalidTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ControlFlowError {
    #[error("break used outside of a loop")]
    #[diagnostic(help("break can only appear inside a while or do-while loop"))]
    UnenclosedBreak,
}

type Result<T> = std::result::Result<T, TypeError>;

/// Checked constructors for all node kinds
#[derive(Debug, Default)]
pub struct AstBuilder {
    ast: Ast,

    /// Loops whose body is being built, innermost last
    loops: Vec<StmtId>,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn finish(self, root: StmtId) -> TypedProgram {
        TypedProgram {
            ast: self.ast,
            root,
        }
    }

    fn push(&mut self, kind: ExprKind, typ: Type) -> ExprId {
        self.ast.push_expr(Expr { kind, typ })
    }

    fn typ(&self, id: ExprId) -> &Type {
        &self.ast[id].typ
    }

    // expressions

    fn constant(&mut self, literal: String, typ: Type) -> ExprId {
        self.push(ExprKind::Constant(literal), typ)
    }

    pub fn int(&mut self, value: usize) -> ExprId {
        self.constant(value.to_string(), Type::Int)
    }

    /// A float literal, kept as written
    pub fn real(&mut self, literal: impl Into<String>) -> ExprId {
        self.constant(literal.into(), Type::Float)
    }

    /// Boolean constants are always the shared [Ast::TRUE] and [Ast::FALSE] nodes
    pub fn boolean(&self, value: bool) -> ExprId {
        if value {
            Ast::TRUE
        } else {
            Ast::FALSE
        }
    }

    pub fn ident(&mut self, name: impl Into<String>, typ: Type, offset: usize) -> ExprId {
        let name = name.into();
        self.push(ExprKind::Ident { name, offset }, typ)
    }

    /// Access an element of the array `array`
    ///
    /// Each index is scaled by the width of the element type it selects, and the scaled indices
    /// are summed into a single byte offset.
    pub fn access(&mut self, array: ExprId, indices: &[ExprId]) -> Result<ExprId> {
        if !matches!(self.ast[array].kind, ExprKind::Ident { .. }) {
            return Err(TypeError::InvalidTarget);
        }

        let mut typ = self.typ(array).clone();
        let mut offset = None;
        for &index in indices {
            typ = match typ {
                Type::Array(elements) => elements.into_element(),
                other => return Err(TypeError::NotIndexable { typ: other }),
            };

            let width = self.int(typ.width());
            let scaled = self.arith(ArithOp::Mul, index, width)?;
            offset = Some(match offset {
                None => scaled,
                Some(loc) => self.arith(ArithOp::Add, loc, scaled)?,
            });
        }

        let index = offset.ok_or(TypeError::MissingIndex)?;
        Ok(self.push(ExprKind::Access { array, index }, typ))
    }

    pub fn arith(&mut self, op: ArithOp, lhs: ExprId, rhs: ExprId) -> Result<ExprId> {
        let typ = Type::max(self.typ(lhs), self.typ(rhs)).ok_or_else(|| TypeError::Arithmetic {
            op,
            lhs: self.typ(lhs).clone(),
            rhs: self.typ(rhs).clone(),
        })?;
        Ok(self.push(ExprKind::Arith { op, lhs, rhs }, typ))
    }

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId) -> Result<ExprId> {
        let typ = Type::max(&Type::Int, self.typ(operand)).ok_or_else(|| TypeError::Unary {
            op,
            operand: self.typ(operand).clone(),
        })?;
        Ok(self.push(ExprKind::Unary { op, operand }, typ))
    }

    fn check_logical(&self, op: LogicalOp, lhs: ExprId, rhs: ExprId) -> Result<()> {
        match (self.typ(lhs), self.typ(rhs)) {
            (Type::Bool, Type::Bool) => Ok(()),
            (lhs, rhs) => Err(TypeError::Logical {
                op,
                lhs: lhs.clone(),
                rhs: rhs.clone(),
            }),
        }
    }

    pub fn or(&mut self, lhs: ExprId, rhs: ExprId) -> Result<ExprId> {
        self.check_logical(LogicalOp::Or, lhs, rhs)?;
        Ok(self.push(ExprKind::Or { lhs, rhs }, Type::Bool))
    }

    pub fn and(&mut self, lhs: ExprId, rhs: ExprId) -> Result<ExprId> {
        self.check_logical(LogicalOp::And, lhs, rhs)?;
        Ok(self.push(ExprKind::And { lhs, rhs }, Type::Bool))
    }

    pub fn not(&mut self, operand: ExprId) -> Result<ExprId> {
        if *self.typ(operand) != Type::Bool {
            return Err(TypeError::Not {
                operand: self.typ(operand).clone(),
            });
        }
        Ok(self.push(ExprKind::Not(operand), Type::Bool))
    }

    pub fn rel(&mut self, op: RelOp, lhs: ExprId, rhs: ExprId) -> Result<ExprId> {
        if !Type::comparable(self.typ(lhs), self.typ(rhs)) {
            return Err(TypeError::Relational {
                op,
                lhs: self.typ(lhs).clone(),
                rhs: self.typ(rhs).clone(),
            });
        }
        Ok(self.push(ExprKind::Rel { op, lhs, rhs }, Type::Bool))
    }

    // statements

    fn require_bool(&self, cond: ExprId, construct: &'static str) -> Result<()> {
        match self.typ(cond) {
            Type::Bool => Ok(()),
            found => Err(TypeError::BooleanRequired {
                construct,
                found: found.clone(),
            }),
        }
    }

    fn check_assign(&self, target: &Type, value: ExprId) -> Result<()> {
        Type::assign(target, self.typ(value))
            .map(|_| ())
            .ok_or_else(|| TypeError::Assignment {
                target: target.clone(),
                value: self.typ(value).clone(),
            })
    }

    pub fn empty(&self) -> StmtId {
        Ast::EMPTY
    }

    pub fn assign(&mut self, target: ExprId, value: ExprId) -> Result<StmtId> {
        if !matches!(self.ast[target].kind, ExprKind::Ident { .. }) {
            return Err(TypeError::InvalidTarget);
        }
        self.check_assign(self.typ(target), value)?;
        Ok(self.ast.push_stmt(Stmt::Assign { target, value }))
    }

    /// Assign to the array element denoted by `access`
    pub fn assign_elem(&mut self, access: ExprId, value: ExprId) -> Result<StmtId> {
        let ExprKind::Access { array, index } = self.ast[access].kind else {
            return Err(TypeError::InvalidTarget);
        };
        self.check_assign(self.typ(access), value)?;
        Ok(self.ast.push_stmt(Stmt::AssignElem {
            array,
            index,
            value,
        }))
    }

    pub fn seq(&mut self, first: StmtId, second: StmtId) -> StmtId {
        self.ast.push_stmt(Stmt::Seq { first, second })
    }

    pub fn if_then(&mut self, cond: ExprId, body: StmtId) -> Result<StmtId> {
        self.require_bool(cond, "If")?;
        Ok(self.ast.push_stmt(Stmt::If { cond, body }))
    }

    pub fn if_else(
        &mut self,
        cond: ExprId,
        then_branch: StmtId,
        else_branch: StmtId,
    ) -> Result<StmtId> {
        self.require_bool(cond, "If-Else")?;
        Ok(self.ast.push_stmt(Stmt::IfElse {
            cond,
            then_branch,
            else_branch,
        }))
    }

    /// Reserve a loop node and make it the target of `break` until it is closed
    ///
    /// The loop must be completed with [AstBuilder::close_while] or [AstBuilder::close_do_while]
    /// once its condition and body are built.
    pub fn open_loop(&mut self) -> StmtId {
        let id = self.ast.push_stmt(Stmt::OpenLoop);
        self.loops.push(id);
        id
    }

    fn close_loop(&mut self, id: StmtId, stmt: Stmt) {
        debug_assert_eq!(self.ast[id], Stmt::OpenLoop);
        if let Some(pos) = self.loops.iter().rposition(|&open| open == id) {
            self.loops.truncate(pos);
        }
        self.ast.replace_stmt(id, stmt);
    }

    pub fn close_while(&mut self, id: StmtId, cond: ExprId, body: StmtId) -> Result<StmtId> {
        self.require_bool(cond, "While")?;
        let after = None;
        self.close_loop(id, Stmt::While { cond, body, after });
        Ok(id)
    }

    pub fn close_do_while(&mut self, id: StmtId, body: StmtId, cond: ExprId) -> Result<StmtId> {
        self.require_bool(cond, "Do-While")?;
        let after = None;
        self.close_loop(id, Stmt::DoWhile { body, cond, after });
        Ok(id)
    }

    /// A `break` out of the innermost loop that is still open
    pub fn break_loop(&mut self) -> std::result::Result<StmtId, ControlFlowError> {
        let enclosing = *self.loops.last().ok_or(ControlFlowError::UnenclosedBreak)?;
        Ok(self.ast.push_stmt(Stmt::Break { enclosing }))
    }
}
