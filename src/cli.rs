use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(version, about = None, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Source code input file
    pub input_file: PathBuf,

    /// Path to the output file; prints to stdout if omitted
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,

    /// Execution mode
    #[arg(value_enum)]
    #[arg(short, long)]
    #[arg(default_value_t = Mode::Tac)]
    pub mode: Mode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Translate the source code to three-address code
    Tac,

    /// Inspect the typed AST of the resolved source code
    Tree,
}
