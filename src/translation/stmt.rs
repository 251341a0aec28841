//! Statements
//!
//! [Translator::gen_stmt] translates a statement that is entered at label `begin` and must
//! continue at label `after` when it completes. Compound statements pick labels for their
//! children so that every jump target is known when the jump is emitted.

use crate::ast::{Stmt, StmtId};

use super::*;

impl Translator<'_> {
    pub(super) fn gen_stmt(&mut self, id: StmtId, begin: Label, after: Label) -> Result<()> {
        match self.ast[id] {
            Stmt::Empty => Ok(()),
            Stmt::Assign { target, value } => {
                let dest = match &self.ast[target].kind {
                    ExprKind::Ident { name, .. } => name.clone(),
                    _ => return Err(TranslationError::InvalidTarget),
                };
                let value = self.gen(value)?;
                let value = self.text(value);
                self.emit(Instruction::Assign { dest, value });
                Ok(())
            }
            Stmt::AssignElem {
                array,
                index,
                value,
            } => {
                let index = self.reduce(index)?;
                let value = self.reduce(value)?;
                let (array, index, value) = (self.text(array), self.text(index), self.text(value));
                self.emit(Instruction::AssignElem {
                    array,
                    index,
                    value,
                });
                Ok(())
            }
            Stmt::Seq { first, second } => {
                if matches!(self.ast[first], Stmt::Empty) {
                    self.gen_stmt(second, begin, after)
                } else if matches!(self.ast[second], Stmt::Empty) {
                    self.gen_stmt(first, begin, after)
                } else {
                    let mid = self.fresh_label();
                    self.gen_stmt(first, begin, mid)?;
                    self.emit_label(mid);
                    self.gen_stmt(second, mid, after)
                }
            }
            Stmt::If { cond, body } => {
                let label = self.fresh_label();
                self.jumping(cond, None, Some(after))?;
                self.emit_label(label);
                self.gen_stmt(body, label, after)
            }
            Stmt::IfElse {
                cond,
                then_branch,
                else_branch,
            } => {
                let then_label = self.fresh_label();
                let else_label = self.fresh_label();
                self.jumping(cond, None, Some(else_label))?;
                self.emit_label(then_label);
                self.gen_stmt(then_branch, then_label, after)?;
                self.emit(Instruction::Goto(after));
                self.emit_label(else_label);
                self.gen_stmt(else_branch, else_label, after)
            }
            Stmt::While { cond, body, .. } => {
                self.set_loop_exit(id, after);
                self.jumping(cond, None, Some(after))?;
                let label = self.fresh_label();
                self.emit_label(label);
                // the body continues at the loop's own begin label, which re-tests the condition
                self.gen_stmt(body, label, begin)?;
                self.emit(Instruction::Goto(begin));
                Ok(())
            }
            Stmt::DoWhile { body, cond, .. } => {
                self.set_loop_exit(id, after);
                let label = self.fresh_label();
                self.gen_stmt(body, begin, label)?;
                self.emit_label(label);
                self.jumping(cond, Some(begin), None)
            }
            Stmt::Break { enclosing } => match self.ast[enclosing] {
                Stmt::While {
                    after: Some(exit), ..
                }
                | Stmt::DoWhile {
                    after: Some(exit), ..
                } => {
                    self.emit(Instruction::Goto(exit));
                    Ok(())
                }
                _ => Err(TranslationError::LoopExitUnknown),
            },
            Stmt::OpenLoop => Err(TranslationError::UnfinishedLoop),
        }
    }

    /// Must happen before the loop body is translated, so `break` can read it
    fn set_loop_exit(&mut self, id: StmtId, after: Label) {
        let is_loop = self.ast.set_loop_exit(id, after);
        debug_assert!(is_loop, "exit label set on a statement that is not a loop");
        debug!(%after, "loop exit");
    }
}
