//! sqmgen CLI - SQM function signatures and expression generation

use sqmgen_cli::cli;
use sqmgen_cli::input;
use sqmgen_cli::output;
use sqmgen_cli::report;

use anyhow::{bail, Context, Result};
use clap::Parser;
use sqmgen_core::ColumnTypes;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use cli::{Args, OutputFormat};
use output::{format_json, format_reports, format_signatures};
use report::{generate_reports, list_signatures, GenerateOptions};

/// An invocation failed to parse, validate or resolve.
const EXIT_FAILURE: u8 = 1;
/// Bad arguments or unreadable input.
const EXIT_CONFIG_ERROR: u8 = 66;

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(EXIT_FAILURE)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("sqmgen: error: {e:#}");
            ExitCode::from(EXIT_CONFIG_ERROR)
        }
    }
}

fn run(args: Args) -> Result<bool> {
    if args.list {
        let entries = list_signatures(args.kind.map(Into::into));
        let output_str = match args.format {
            OutputFormat::Json => format_json(&entries, args.compact),
            OutputFormat::Table => format_signatures(&entries, !args.quiet),
        };
        write_output(&args.output, &output_str)?;
        return Ok(false);
    }

    let options = build_options(&args)?;
    let expressions = input::read_expressions(&args.expressions, args.input.as_deref())?;
    if expressions.is_empty() {
        bail!("no invocations to process");
    }

    let reports = generate_reports(&expressions, &options);
    let output_str = match args.format {
        OutputFormat::Json => format_json(&reports, args.compact),
        OutputFormat::Table => format_reports(&reports, args.quiet, !args.quiet),
    };
    write_output(&args.output, &output_str)?;

    Ok(reports.iter().any(|report| report.is_error()))
}

fn build_options(args: &Args) -> Result<GenerateOptions> {
    let columns = args
        .columns
        .iter()
        .map(|spec| cli::parse_column(spec.as_str()))
        .collect::<Result<ColumnTypes>>()?;
    let implied_type = args
        .implied_type
        .as_deref()
        .map(cli::parse_type)
        .transpose()
        .context("invalid --implied-type")?;

    Ok(GenerateOptions {
        dialect: args.dialect.into(),
        columns,
        implied_type,
        strict: args.strict,
    })
}

fn write_output(path: &Option<PathBuf>, content: &str) -> Result<()> {
    if let Some(path) = path {
        fs::write(path, content)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
    } else {
        io::stdout()
            .write_all(content.as_bytes())
            .context("Failed to write to stdout")?;
        if !content.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}
