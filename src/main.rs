//! Unify CLI
//!
//! Entry point for the `unify` command-line tool.

use clap::{ArgAction, CommandFactory, Parser};
use env_logger::Env;
use log::debug;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;
use unify::{CliOverrides, FileReport, FsLineSource, Merger, UnifyConfig};

/// Exit status when at least one file could not be expanded.
const EXIT_FILE_FAILED: i32 = 1;
/// Exit status for configuration or output errors.
const EXIT_FATAL: i32 = 2;

#[derive(Parser)]
#[command(name = "unify")]
#[command(about = "Inline local #include headers into a single stream", version)]
struct Cli {
    /// Source files to merge, in order
    files: Vec<PathBuf>,

    /// Write merged output to this file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Path to config file (default: ./unify.toml if present)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Only write a file's output once it expanded completely
    #[arg(long)]
    buffered: bool,

    /// Maximum include nesting depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Report how each directive line is classified instead of merging
    #[arg(long)]
    explain: bool,

    /// Human-readable --explain output instead of JSON
    #[arg(long, requires = "explain")]
    human: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.files.is_empty() {
        if let Err(e) = Cli::command().print_help() {
            eprintln!("Error writing usage: {}", e);
            process::exit(EXIT_FATAL);
        }
        println!();
        process::exit(0);
    }

    if cli.explain {
        run_explain(&cli.files, cli.human);
    } else {
        run_merge(&cli);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();
}

fn run_merge(cli: &Cli) {
    let overrides = CliOverrides {
        buffered: cli.buffered,
        max_depth: cli.max_depth,
    };
    let config = match UnifyConfig::load(cli.config.as_deref())
        .and_then(|c| c.with_overrides(&overrides))
    {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(EXIT_FATAL);
        }
    };
    debug!("effective config: {:?}", config);

    let mut dest: Box<dyn Write> = match &cli.output {
        Some(path) => match File::create(path) {
            Ok(file) => Box::new(BufWriter::new(file)),
            Err(e) => {
                eprintln!("Unable to create {}: {}", path.display(), e);
                process::exit(EXIT_FATAL);
            }
        },
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let mut diagnostics = io::stderr().lock();

    let source = FsLineSource;
    let merger = Merger::from_config(&source, &config);

    match merger.merge(&mut dest, &mut diagnostics, cli.files.as_slice()) {
        Ok(report) if report.all_succeeded() => process::exit(0),
        Ok(_) => process::exit(EXIT_FILE_FAILED),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(EXIT_FATAL);
        }
    }
}

fn run_explain(files: &[PathBuf], human: bool) {
    let source = FsLineSource;
    let mut reports = Vec::new();
    let mut failed = false;

    for path in files {
        match FileReport::build(&source, path) {
            Ok(report) => reports.push(report),
            Err(e) => {
                eprintln!("[ERROR] Unable to explain {}: {}", path.display(), e);
                failed = true;
            }
        }
    }

    if human {
        let text: Vec<String> = reports.iter().map(FileReport::to_human).collect();
        println!("{}", text.join("\n\n"));
    } else {
        match serde_json::to_string_pretty(&reports) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(EXIT_FATAL);
            }
        }
    }

    process::exit(if failed { EXIT_FILE_FAILED } else { 0 });
}
