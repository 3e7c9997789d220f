//! `confjson` CLI: normalize, dump, query and check lenient configuration files.
//!
//! ## Usage
//!
//! ```sh
//! # Lenient config → strict JSON (stdin → stdout)
//! echo '{ particle: e-, energy: .5 }' | confjson normalize
//!
//! # Pretty-printed, file to file
//! confjson normalize --pretty -i run.cfg -o run.json
//!
//! # Indented dump of the whole document
//! confjson dump -i run.cfg
//!
//! # Typed query by path (non-zero exit if missing or mistyped)
//! confjson get Primary/energy --as double -i run.cfg
//! confjson get Primary/position --as double-array -i run.cfg
//!
//! # Validate several files
//! confjson check run.cfg alt.cfg
//! ```
//!
//! Logging goes to stderr. `-v` / `-vv` / `-vvv` raise the level; the
//! `CONFJSON_LOG` environment variable (an `EnvFilter` directive) overrides it.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use confjson_core::{Accessor, Registry, DEFAULT_DOCUMENT};
use std::collections::HashSet;
use std::fmt::Display;
use std::io::{self, Read};
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "confjson",
    version,
    about = "Lenient configuration files: normalize, dump and query"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert lenient configuration text to strict JSON
    Normalize {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Pretty-print the JSON instead of emitting it compactly
        #[arg(long)]
        pretty: bool,
    },
    /// Load a configuration and print its indented tree
    Dump {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long, env = "CONFJSON_FILE")]
        input: Option<String>,
        /// Input is already strict JSON; skip normalization
        #[arg(long)]
        raw: bool,
    },
    /// Read one value by `/`-separated path
    Get {
        /// Path such as `Primary/energy`
        path: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long, env = "CONFJSON_FILE")]
        input: Option<String>,
        /// Input is already strict JSON; skip normalization
        #[arg(long)]
        raw: bool,
        /// Expected type of the value
        #[arg(long = "as", value_enum, default_value_t = ValueKind::Json)]
        kind: ValueKind,
    },
    /// Load every file and report which ones fail
    Check {
        /// Configuration files to load
        #[arg(required = true)]
        files: Vec<String>,
        /// Inputs are already strict JSON; skip normalization
        #[arg(long)]
        raw: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ValueKind {
    Bool,
    Int,
    Long,
    Float,
    Double,
    String,
    BoolArray,
    IntArray,
    LongArray,
    FloatArray,
    DoubleArray,
    StringArray,
    /// Whatever is at the path, as pretty JSON
    Json,
}

/// Maps a `-v` count to a tracing directive: 0 → warn, 1 → info, 2 → debug, 3+ → trace.
fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_env("CONFJSON_LOG")
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Normalize {
            input,
            output,
            pretty,
        } => {
            let text = read_input(input.as_deref())?;
            let json = confjson_core::normalize(&text).context("Failed to normalize input")?;
            let json = if pretty {
                let value: serde_json::Value = serde_json::from_str(&json)
                    .context("Normalized text is not valid JSON")?;
                serde_json::to_string_pretty(&value)?
            } else {
                json
            };
            write_output(output.as_deref(), &json)?;
        }
        Commands::Dump { input, raw } => {
            let registry = load_registry(input.as_deref(), raw)?;
            let dump = registry.accessor().render_tree()?;
            print!("{}", dump);
        }
        Commands::Get {
            path,
            input,
            raw,
            kind,
        } => {
            let registry = load_registry(input.as_deref(), raw)?;
            print_value(&registry.accessor(), &path, kind)?;
        }
        Commands::Check { files, raw } => {
            let mut registry = Registry::new();
            let mut used = HashSet::new();
            let mut failures = 0usize;
            for file in &files {
                let name = document_name(&used, file);
                used.insert(name.clone());
                match registry.load_file(&name, file, raw) {
                    Ok(()) => println!("ok    {} ({})", file, name),
                    Err(err) => {
                        failures += 1;
                        println!("FAIL  {}: {}", file, err);
                    }
                }
            }
            if failures > 0 {
                bail!("{} of {} file(s) failed to load", failures, files.len());
            }
        }
    }

    Ok(())
}

/// The first checked file is loaded as "default", the rest under their file
/// stem. A stem that is already taken falls back to the path as given.
fn document_name(used: &HashSet<String>, file: &str) -> String {
    if used.is_empty() {
        return DEFAULT_DOCUMENT.to_string();
    }
    match Path::new(file).file_stem() {
        Some(stem) if !used.contains(stem.to_string_lossy().as_ref()) => {
            stem.to_string_lossy().into_owned()
        }
        _ => file.to_string(),
    }
}

fn load_registry(input: Option<&str>, raw: bool) -> Result<Registry> {
    let mut registry = Registry::new();
    match input {
        Some(path) => registry
            .load_file(DEFAULT_DOCUMENT, path, raw)
            .with_context(|| format!("Failed to load configuration: {}", path))?,
        None => {
            let text = read_input(None)?;
            registry
                .load_text(DEFAULT_DOCUMENT, &text, raw)
                .context("Failed to load configuration from stdin")?;
        }
    }
    Ok(registry)
}

fn print_value(config: &Accessor<'_>, path: &str, kind: ValueKind) -> Result<()> {
    match kind {
        ValueKind::Bool => println!("{}", config.get_bool(path)?),
        ValueKind::Int => println!("{}", config.get_int(path)?),
        ValueKind::Long => println!("{}", config.get_long(path)?),
        ValueKind::Float => println!("{}", config.get_float(path)?),
        ValueKind::Double => println!("{}", config.get_double(path)?),
        ValueKind::String => println!("{}", config.get_string(path)?),
        ValueKind::BoolArray => {
            let mut out = Vec::new();
            let n = config.get_bool_array(path, &mut out)?;
            print_array(config, path, &out, n)?;
        }
        ValueKind::IntArray => {
            let mut out = Vec::new();
            let n = config.get_int_array(path, &mut out)?;
            print_array(config, path, &out, n)?;
        }
        ValueKind::LongArray => {
            let mut out = Vec::new();
            let n = config.get_long_array(path, &mut out)?;
            print_array(config, path, &out, n)?;
        }
        ValueKind::FloatArray => {
            let mut out = Vec::new();
            let n = config.get_float_array(path, &mut out)?;
            print_array(config, path, &out, n)?;
        }
        ValueKind::DoubleArray => {
            let mut out = Vec::new();
            let n = config.get_double_array(path, &mut out)?;
            print_array(config, path, &out, n)?;
        }
        ValueKind::StringArray => {
            let mut out = Vec::new();
            let n = config.get_string_array(path, &mut out)?;
            print_array(config, path, &out, n)?;
        }
        ValueKind::Json => {
            let value = config
                .resolve(path)
                .with_context(|| format!("key not found: {}", path))?;
            println!("{}", serde_json::to_string_pretty(value)?);
        }
    }
    Ok(())
}

/// Print one element per line; a short count means the fill stopped at a
/// mistyped element.
fn print_array<T: Display>(config: &Accessor<'_>, path: &str, items: &[T], count: usize) -> Result<()> {
    let expected = config
        .resolve(path)
        .and_then(|v| v.as_array())
        .map_or(0, |a| a.len());
    if count != expected {
        bail!(
            "array at {} has a mistyped element at index {} ({} of {} read)",
            path,
            items.len(),
            items.len(),
            expected
        );
    }
    for item in items {
        println!("{}", item);
    }
    Ok(())
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
