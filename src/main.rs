use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use goose::{
    config::{BuildConfig, Emit},
    eval, source, toolchain,
};

/// Compile a Goose (.gs) program to a native executable.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Source file, must end in `.gs`.
    input: PathBuf,
    /// Output path without extension (defaults to the input's stem).
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Stop after writing this artifact.
    #[arg(long, value_enum, default_value_t = Emit::Exe)]
    emit: Emit,
    /// Execute the program in-process and print its globals instead of building.
    #[arg(long)]
    run: bool,
    /// Raise log verbosity (-v info, -vv debug). `GOOSE_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("GOOSE_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> anyhow::Result<()> {
    let src = source::read(&args.input)?;
    let module = goose::compile(&src).map_err(|e| {
        debug!(stage = e.stage(), "compilation failed");
        e
    })?;

    if args.run {
        let globals = eval::run(&module).context("program faulted")?;
        for (name, value) in globals {
            println!("{name} = {value}");
        }
        return Ok(());
    }

    let stem = args
        .output
        .unwrap_or_else(|| BuildConfig::default_stem(&args.input));
    let config = BuildConfig::new(stem, args.emit);
    let artifacts = toolchain::build(&module, &config)
        .with_context(|| format!("building {:?}", args.input))?;
    info!(?artifacts, "build finished");
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    if let Err(e) = run(args) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
