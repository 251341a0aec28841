//! Expressions
//!
//! Three operations are defined on every expression:
//! - [Translator::reduce] emits code for the whole expression and returns something simple
//!   (a name, a temporary or a constant) holding its value
//! - [Translator::gen] reduces the operands but leaves the top operator in place, so the caller
//!   can use it on the right hand side of an assignment
//! - [Translator::jumping] never produces a value; it emits jumps to the given labels depending
//!   on the truth of the expression. `None` means "fall through" for that outcome.
//!
//! Boolean operators are only ever translated through jumps. When their value is needed, e.g. in
//! `b = x < y;`, the jumps select between storing `true` or `false` into a temporary.

use super::*;

impl Translator<'_> {
    pub(super) fn reduce(&mut self, id: ExprId) -> Result<ExprId> {
        match self.ast[id].kind {
            ExprKind::Constant(_) | ExprKind::Ident { .. } | ExprKind::Temp(_) => Ok(id),
            ExprKind::Arith { .. } | ExprKind::Unary { .. } | ExprKind::Access { .. } => {
                let value = self.gen(id)?;
                let typ = self.ast[id].typ.clone();
                let temp = self.fresh_temp(typ);

                let dest = self.text(temp);
                let value = self.text(value);
                self.emit(Instruction::Assign { dest, value });
                Ok(temp)
            }
            ExprKind::Or { .. } | ExprKind::And { .. } | ExprKind::Not(_) | ExprKind::Rel { .. } => {
                self.gen(id)
            }
        }
    }

    pub(super) fn gen(&mut self, id: ExprId) -> Result<ExprId> {
        match self.ast[id].kind {
            ExprKind::Constant(_) | ExprKind::Ident { .. } | ExprKind::Temp(_) => Ok(id),
            ExprKind::Arith { op, lhs, rhs } => {
                let lhs = self.reduce(lhs)?;
                let rhs = self.reduce(rhs)?;
                Ok(self.rebuild(id, ExprKind::Arith { op, lhs, rhs }))
            }
            ExprKind::Unary { op, operand } => {
                let operand = self.reduce(operand)?;
                Ok(self.rebuild(id, ExprKind::Unary { op, operand }))
            }
            ExprKind::Access { array, index } => {
                let index = self.reduce(index)?;
                Ok(self.rebuild(id, ExprKind::Access { array, index }))
            }
            ExprKind::Or { .. } | ExprKind::And { .. } | ExprKind::Not(_) | ExprKind::Rel { .. } => {
                self.gen_boolean(id)
            }
        }
    }

    /// A copy of node `id` with different operands
    fn rebuild(&mut self, id: ExprId, kind: ExprKind) -> ExprId {
        let typ = self.ast[id].typ.clone();
        self.ast.push_expr(Expr { kind, typ })
    }

    /// Materialize the value of a boolean operator in a temporary
    fn gen_boolean(&mut self, id: ExprId) -> Result<ExprId> {
        let falsy = self.fresh_label();
        let after = self.fresh_label();
        let typ = self.ast[id].typ.clone();
        let temp = self.fresh_temp(typ);
        let dest = self.text(temp);

        self.jumping(id, None, Some(falsy))?;
        self.emit(Instruction::Assign {
            dest: dest.clone(),
            value: String::from("true"),
        });
        self.emit(Instruction::Goto(after));
        self.emit_label(falsy);
        self.emit(Instruction::Assign {
            dest,
            value: String::from("false"),
        });
        self.emit_label(after);

        Ok(temp)
    }

    pub(super) fn jumping(
        &mut self,
        id: ExprId,
        truthy: Option<Label>,
        falsy: Option<Label>,
    ) -> Result<()> {
        // the two constants decide the branch at compile time
        if id == Ast::TRUE {
            if let Some(target) = truthy {
                self.emit(Instruction::Goto(target));
            }
            return Ok(());
        }
        if id == Ast::FALSE {
            if let Some(target) = falsy {
                self.emit(Instruction::Goto(target));
            }
            return Ok(());
        }

        match self.ast[id].kind {
            ExprKind::Or { lhs, rhs } => {
                let label = truthy.unwrap_or_else(|| self.fresh_label());
                self.jumping(lhs, Some(label), None)?;
                self.jumping(rhs, truthy, falsy)?;
                if truthy.is_none() {
                    self.emit_label(label);
                }
                Ok(())
            }
            ExprKind::And { lhs, rhs } => {
                let label = falsy.unwrap_or_else(|| self.fresh_label());
                self.jumping(lhs, None, Some(label))?;
                self.jumping(rhs, truthy, falsy)?;
                if falsy.is_none() {
                    self.emit_label(label);
                }
                Ok(())
            }
            ExprKind::Not(operand) => self.jumping(operand, falsy, truthy),
            ExprKind::Rel { op, lhs, rhs } => {
                let lhs = self.reduce(lhs)?;
                let rhs = self.reduce(rhs)?;
                let test = format!("{} {op} {}", self.text(lhs), self.text(rhs));
                self.emit_jumps(test, truthy, falsy);
                Ok(())
            }
            ExprKind::Access { .. } => {
                // an array element cannot be tested directly
                let value = self.reduce(id)?;
                let test = self.text(value);
                self.emit_jumps(test, truthy, falsy);
                Ok(())
            }
            ExprKind::Constant(_)
            | ExprKind::Ident { .. }
            | ExprKind::Temp(_)
            | ExprKind::Arith { .. }
            | ExprKind::Unary { .. } => {
                let test = self.text(id);
                self.emit_jumps(test, truthy, falsy);
                Ok(())
            }
        }
    }

    fn emit_jumps(&mut self, test: String, truthy: Option<Label>, falsy: Option<Label>) {
        match (truthy, falsy) {
            (Some(truthy), Some(falsy)) => {
                self.emit(Instruction::If {
                    test,
                    target: truthy,
                });
                self.emit(Instruction::Goto(falsy));
            }
            (Some(target), None) => self.emit(Instruction::If { test, target }),
            (None, Some(target)) => self.emit(Instruction::IfFalse { test, target }),
            (None, None) => {}
        }
    }
}
