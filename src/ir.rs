//! Three-address code
//!
//! The output of translation: an ordered list of instructions, in the order they were emitted.
//! The order is the control flow order of the program and must not be changed.

use std::fmt;

use crate::util::Label;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `L<n>:`
    Label(Label),

    /// `<dest> = <value>`
    Assign { dest: String, value: String },

    /// `<array> [ <index> ] = <value>`
    AssignElem {
        array: String,
        index: String,
        value: String,
    },

    /// `goto L<n>`
    Goto(Label),

    /// `if <test> goto L<n>`
    If { test: String, target: Label },

    /// `iffalse <test> goto L<n>`
    IfFalse { test: String, target: Label },
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Label(label) => write!(f, "{label}:"),
            Instruction::Assign { dest, value } => write!(f, "{dest} = {value}"),
            Instruction::AssignElem {
                array,
                index,
                value,
            } => write!(f, "{array} [ {index} ] = {value}"),
            Instruction::Goto(target) => write!(f, "goto {target}"),
            Instruction::If { test, target } => write!(f, "if {test} goto {target}"),
            Instruction::IfFalse { test, target } => write!(f, "iffalse {test} goto {target}"),
        }
    }
}

/// The instruction log
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Program {
    pub instructions: Vec<Instruction>,
}

impl Program {
    pub fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }

    /// The instructions rendered one per line
    pub fn lines(&self) -> Vec<String> {
        self.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in &self.instructions {
            writeln!(f, "{instruction}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_grammar() {
        let l3 = Label::new(3);
        let cases = [
            (Instruction::Label(l3), "L3:"),
            (
                Instruction::Assign {
                    dest: String::from("t1"),
                    value: String::from("i + 1"),
                },
                "t1 = i + 1",
            ),
            (
                Instruction::AssignElem {
                    array: String::from("a"),
                    index: String::from("t2"),
                    value: String::from("x"),
                },
                "a [ t2 ] = x",
            ),
            (Instruction::Goto(l3), "goto L3"),
            (
                Instruction::If {
                    test: String::from("i < 10"),
                    target: l3,
                },
                "if i < 10 goto L3",
            ),
            (
                Instruction::IfFalse {
                    test: String::from("b"),
                    target: l3,
                },
                "iffalse b goto L3",
            ),
        ];

        for (instruction, text) in cases {
            assert_eq!(instruction.to_string(), text);
        }
    }

    #[test]
    fn program_keeps_emission_order() {
        let mut program = Program::default();
        program.emit(Instruction::Label(Label::new(1)));
        program.emit(Instruction::Goto(Label::new(2)));
        program.emit(Instruction::Label(Label::new(2)));

        assert_eq!(program.len(), 3);
        assert_eq!(program.to_string(), "L1:\ngoto L2\nL2:\n");
    }
}
