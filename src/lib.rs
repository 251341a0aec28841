pub mod ast;
pub mod ir;
pub mod parsing;
pub mod resolve;
pub mod translation;
pub mod typ;
pub mod util;

pub use ast::TypedProgram;
pub use parsing::{parse, ParsingError};
pub use resolve::{resolve, ResolveError};
pub use translation::{translate, translate_with, TranslationError};
pub use typ::Type;
pub use util::{Allocator, Label, Span, Temp};
