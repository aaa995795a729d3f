use std::process::ExitCode;
use std::time::Instant;

use clap::ArgGroup;
use clap::Parser;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(target_env = "msvc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use cppmodel::{CppModelOptions, OutputFormat, ProcessingOptions, run_main};
use cppmodel_error::Result;

#[derive(Parser, Debug)]
#[command(
    name = "cppmodel",
    about = "cppmodel: bind C++ sources and dump their symbols",
    version,
    group = ArgGroup::new("inputs").required(true).multiple(true).args(["files", "dirs"])
)]
pub struct Cli {
    /// Individual files to bind
    #[arg(value_name = "FILE")]
    files: Vec<String>,

    /// Directories to scan recursively (repeatable)
    #[arg(
        short = 'd',
        long = "dir",
        value_name = "DIR",
        num_args = 1..,
        action = clap::ArgAction::Append
    )]
    dirs: Vec<String>,

    /// Output layout
    #[arg(long, value_enum, default_value_t = OutputFormat::Tree)]
    format: OutputFormat,

    #[command(flatten)]
    processing: ProcessingOptions,

    /// Output file path (writes to file instead of stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<String>,
}

pub fn run(args: Cli) -> Result<()> {
    let total_start = Instant::now();

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let opts = CppModelOptions {
        files: args.files,
        dirs: args.dirs,
        output: args.output,
        format: args.format,
        processing: args.processing,
    };

    if let Some(output) = run_main(&opts)? {
        if let Some(ref path) = opts.output {
            std::fs::write(path, &output)?;
            tracing::info!(path, "output written");
        } else {
            print!("{output}");
        }
    }

    tracing::info!(total_secs = total_start.elapsed().as_secs_f64(), "complete");
    Ok(())
}

pub fn main() -> ExitCode {
    let args = Cli::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            tracing::error!(error = %e, "execution failed");
            ExitCode::FAILURE
        }
    }
}
