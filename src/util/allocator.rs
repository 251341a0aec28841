use super::{Label, Temp};

/// Source of fresh labels and temporaries for one compilation
///
/// Both counters only ever grow, so every name handed out is unique for as long as the same
/// allocator is used.
#[derive(Debug, Default)]
pub struct Allocator {
    last_label: Label,
    last_temp: Temp,
}

impl Allocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh_label(&mut self) -> Label {
        self.last_label.advance();
        self.last_label
    }

    pub fn fresh_temp(&mut self) -> Temp {
        self.last_temp.advance();
        self.last_temp
    }
}
