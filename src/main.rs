use crate::args::Cli;
use crate::engine::Report;
use crate::model::{Config, Job};
use anyhow::Context;
use clap::Parser;
use log::error;
use std::process::exit;

mod args;
mod document;
mod encoding;
mod engine;
mod errors;
mod lookup;
mod model;

fn main() {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            exit(1);
        }
    };
    config.set_logging();

    let result = Job::resolve(&cli, config)
        .map_err(anyhow::Error::from)
        .and_then(|job| run(&job));

    match result {
        Ok(report) => report.log(),
        Err(err) => {
            error!("{err:#}");
            exit(1);
        }
    }
}

/// Loads both tables and the input, converts, and writes the output.
/// Nothing is written unless every step before it succeeded.
fn run(job: &Job) -> anyhow::Result<Report> {
    let emoji = lookup::load(&job.emoji_table, &job.table_delimiter)
        .context("loading emoji table")?;
    let standard = lookup::load(&job.standard_table, &job.table_delimiter)
        .context("loading standard table")?;

    let mut document =
        document::read_document(&job.input, job.input_encoding).context("reading input")?;

    let report = engine::convert(&mut document, &emoji, &standard, &job.delimiters)
        .context("compiling lookup tables")?;

    document::write_document(&job.output, &document, job.output_encoding)
        .context("writing output")?;

    Ok(report)
}
