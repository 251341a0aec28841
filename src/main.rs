use std::fs;
use std::io::Write;

use miette::{bail, Diagnostic, IntoDiagnostic, Report, Result};

use clap::Parser;

use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use tacli::{parse, resolve, translate, ParsingError};

mod cli;

use cli::{Args, Mode};

#[derive(Debug, Error, Diagnostic)]
#[error("Oops, something went wrong")]
struct AppError {
    #[related]
    errs: Vec<ParsingError>,

    #[source_code]
    code: String,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().without_time())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();

    let args = Args::parse();

    if !args.input_file.is_file() {
        bail!("No proper input file: {:?}", args.input_file);
    }

    let source = fs::read_to_string(&args.input_file).into_diagnostic()?;
    let syntax = match parse(&source) {
        Ok(syntax) => {
            info!("Parsing successful");
            syntax
        }
        Err(reports) => {
            return Err(AppError {
                errs: reports,
                code: source,
            }
            .into())
        }
    };

    let mut program = match resolve(&syntax) {
        Ok(program) => {
            info!("Resolution successful");
            program
        }
        Err(err) => return Err(Report::new(err).with_source_code(source)),
    };

    let mut output = Vec::new();
    match args.mode {
        Mode::Tree => program.write_tree(&mut output).into_diagnostic()?,
        Mode::Tac => {
            let code = translate(&mut program)?;
            info!(instructions = code.len(), "Translation successful");
            write!(output, "{code}").into_diagnostic()?;
        }
    }

    match args.output_file {
        Some(out) => {
            if out.exists() {
                warn!("{:?} already exists and will be overridden", &out);
            }
            fs::write(&out, output).into_diagnostic()?;
        }
        None => std::io::stdout().write_all(&output).into_diagnostic()?,
    }

    Ok(())
}
