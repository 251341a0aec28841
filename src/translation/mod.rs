//! Translation
//!
//! This module turns a [TypedProgram] into three-address code ([ir]). The main interface is the
//! [translate] function.
//!
//! Translation is a single depth-first walk over the statement tree. Statements receive the label
//! at which control enters them and the label at which control must continue afterwards, and
//! emit their code directly into the instruction log:
//! - [expr] implements the expression side: reducing expressions to simple names, and turning
//!   boolean expressions into conditional jumps
//! - [stmt] implements the statement side on top of that
//!
//! Type checking already happened while the tree was built, so any error coming out of here
//! is a violation of the builder's guarantees, not a problem with the source program.

use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, trace};

use crate::ast::{Ast, Expr, ExprId, ExprKind, TypedProgram};
use crate::ir::{self, Instruction};
use crate::typ::Type;
use crate::util::{Allocator, Label};

mod expr;
mod stmt;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum TranslationError {
    #[error("Internal error: a loop reached translation before it was completed")]
    UnfinishedLoop,

    #[error("Internal error: break refers to a loop without an exit label")]
    LoopExitUnknown,

    #[error("Internal error: assignment target is not a variable")]
    InvalidTarget,
}

type Result<T> = std::result::Result<T, TranslationError>;

/// Turn a typed program into three-address code, numbering labels and temporaries from 1
pub fn translate(program: &mut TypedProgram) -> Result<ir::Program> {
    translate_with(program, &mut Allocator::new())
}

/// Turn a typed program into three-address code, drawing names from `fresh`
pub fn translate_with(program: &mut TypedProgram, fresh: &mut Allocator) -> Result<ir::Program> {
    let mut translator = Translator::new(&mut program.ast, fresh);

    let begin = translator.fresh_label();
    let after = translator.fresh_label();
    translator.emit_label(begin);
    translator.gen_stmt(program.root, begin, after)?;
    translator.emit_label(after);

    let code = translator.finish();
    debug!(instructions = code.len(), "translation finished");
    Ok(code)
}

/// The state during translation
///
/// Temporaries created along the way are added to the arena, so the translator needs mutable
/// access to it.
struct Translator<'a> {
    ast: &'a mut Ast,
    fresh: &'a mut Allocator,
    code: ir::Program,
}

impl<'a> Translator<'a> {
    fn new(ast: &'a mut Ast, fresh: &'a mut Allocator) -> Self {
        Self {
            ast,
            fresh,
            code: ir::Program::default(),
        }
    }

    fn finish(self) -> ir::Program {
        self.code
    }

    fn fresh_label(&mut self) -> Label {
        self.fresh.fresh_label()
    }

    fn fresh_temp(&mut self, typ: Type) -> ExprId {
        let temp = self.fresh.fresh_temp();
        self.ast.push_expr(Expr {
            kind: ExprKind::Temp(temp),
            typ,
        })
    }

    fn text(&self, id: ExprId) -> String {
        self.ast.text(id)
    }

    fn emit(&mut self, instruction: Instruction) {
        trace!("{instruction}");
        self.code.emit(instruction);
    }

    fn emit_label(&mut self, label: Label) {
        self.emit(Instruction::Label(label));
    }
}
