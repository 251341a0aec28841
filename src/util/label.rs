use std::fmt;

/// A control-flow label in the emitted code
///
/// Labels are numbered from 1; the default value is the "no label yet" counter state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(u32);

impl Label {
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    pub fn number(&self) -> u32 {
        self.0
    }

    /// Advance internal counter to next label
    pub fn advance(&mut self) {
        self.0 += 1;
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}
