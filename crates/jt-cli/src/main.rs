//! Command-line front end for `jt-core`.
//!
//! `jt` answers the same questions the library answers inside tests: what
//! is stored at a property path, whether a set of paths exists, and how two
//! collections differ when order is ignored. Exit status is `0` when the
//! check passes, `1` when it fails and `2` for usage or input errors.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use jt_core::{
    diff, equals_ordered, AccessError, DecodeOptions, Document, NumberMode, Value, ValueKind,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const EXIT_PASS: i32 = 0;
const EXIT_FAIL: i32 = 1;
const EXIT_ERROR: i32 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "jt",
    version,
    about = "Query and compare JSON and YAML documents.",
    after_help = "Examples:\n  jt get payload.json user.name --as string\n  jt has payload.json user.id user.tags\n  jt diff expected.json actual.json --path items\n  cat payload.json | jt get - user"
)]
struct Cli {
    /// Read input as YAML instead of JSON.
    #[arg(long = "yaml", global = true, action = ArgAction::SetTrue)]
    yaml: bool,

    /// Decode integral numbers as int64 instead of float64.
    #[arg(long = "exact-integers", global = true, action = ArgAction::SetTrue)]
    exact_integers: bool,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the value stored at PATH.
    Get {
        /// Document to read, or `-` for STDIN.
        file: PathBuf,
        /// Dotted property path, e.g. `user.address.city`.
        path: String,
        /// Require the value to have this type.
        #[arg(long = "as", value_enum)]
        kind: Option<KindArg>,
    },
    /// Check that every PATH exists.
    Has {
        /// Document to read, or `-` for STDIN.
        file: PathBuf,
        /// Dotted property paths.
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Compare two arrays, ignoring element order unless --ordered is set.
    Diff {
        /// First document (side A), or `-` for STDIN.
        lhs: PathBuf,
        /// Second document (side B), or `-` for STDIN.
        rhs: PathBuf,
        /// Compare the arrays found at PATH inside object documents.
        #[arg(long = "path")]
        path: Option<String>,
        /// Also require elements to appear at the same positions.
        #[arg(long = "ordered", action = ArgAction::SetTrue)]
        ordered: bool,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum KindArg {
    String,
    Bool,
    #[value(name = "int64")]
    Int64,
    #[value(name = "float64")]
    Float64,
    Array,
    Object,
}

impl From<KindArg> for ValueKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::String => ValueKind::String,
            KindArg::Bool => ValueKind::Bool,
            KindArg::Int64 => ValueKind::Int64,
            KindArg::Float64 => ValueKind::Float64,
            KindArg::Array => ValueKind::Array,
            KindArg::Object => ValueKind::Object,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match try_main(&cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            let _ = writeln!(io::stderr(), "{err:#}");
            std::process::exit(EXIT_ERROR);
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn try_main(cli: &Cli) -> Result<i32> {
    let options = decode_options(cli);
    debug!(number_mode = %options.number_mode(), yaml = cli.yaml, "decoding inputs");

    match &cli.command {
        Command::Get { file, path, kind } => {
            let doc = load_document(file, cli.yaml, &options)?;
            run_get(&doc, path, *kind)
        }
        Command::Has { file, paths } => {
            let doc = load_document(file, cli.yaml, &options)?;
            run_has(&doc, paths)
        }
        Command::Diff { lhs, rhs, path, ordered } => {
            if is_stdin(lhs) && is_stdin(rhs) {
                bail!("only one input can be read from STDIN");
            }
            let a = load_array(lhs, path.as_deref(), cli.yaml, &options)
                .context("failed to load side A")?;
            let b = load_array(rhs, path.as_deref(), cli.yaml, &options)
                .context("failed to load side B")?;
            run_diff(&a, &b, *ordered)
        }
    }
}

fn decode_options(cli: &Cli) -> DecodeOptions {
    let mode = if cli.exact_integers { NumberMode::Exact } else { NumberMode::Float };
    DecodeOptions::default().with_number_mode(mode)
}

fn run_get(doc: &Document, path: &str, kind: Option<KindArg>) -> Result<i32> {
    let found = match kind {
        Some(kind) => typed_value(doc, path, kind),
        None => doc.get(path).cloned(),
    };
    match found {
        Ok(value) => {
            let rendered = serde_json::to_string(&value.to_json_value())
                .context("failed to serialize value")?;
            println!("{rendered}");
            Ok(EXIT_PASS)
        }
        Err(err) => {
            eprintln!("{path}: {err}");
            Ok(EXIT_FAIL)
        }
    }
}

fn typed_value(doc: &Document, path: &str, kind: KindArg) -> Result<Value, AccessError> {
    debug!(path, wanted = %ValueKind::from(kind), "typed lookup");
    Ok(match kind {
        KindArg::String => Value::from(doc.get_str(path)?),
        KindArg::Bool => Value::Bool(doc.get_bool(path)?),
        KindArg::Int64 => Value::Int64(doc.get_int64(path)?),
        KindArg::Float64 => Value::Float64(doc.get_float64(path)?),
        KindArg::Array => Value::Array(doc.get_array(path)?.to_vec()),
        KindArg::Object => Value::Object(doc.get_object(path)?.clone()),
    })
}

fn run_has(doc: &Document, paths: &[String]) -> Result<i32> {
    match doc.has_all_keys(paths) {
        Ok(()) => Ok(EXIT_PASS),
        Err(missing) => {
            info!(failed = missing.len(), checked = paths.len(), "paths missing");
            eprintln!("{missing}");
            Ok(EXIT_FAIL)
        }
    }
}

fn run_diff(a: &[Value], b: &[Value], ordered: bool) -> Result<i32> {
    if let Err(report) = diff(a, b) {
        println!("{report}");
        return Ok(EXIT_FAIL);
    }
    if ordered && !equals_ordered(a, b) {
        println!("same values in a different order");
        return Ok(EXIT_FAIL);
    }
    Ok(EXIT_PASS)
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn read_input(path: &Path) -> Result<String> {
    if is_stdin(path) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).context("failed to read STDIN")?;
        return Ok(buffer);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn load_value(path: &Path, yaml: bool, options: &DecodeOptions) -> Result<Value> {
    let text = read_input(path)?;
    let value = if yaml {
        Value::from_yaml_str(&text, options)
    } else {
        Value::from_json_str(&text, options)
    };
    value.with_context(|| format!("failed to parse {}", path.display()))
}

fn load_document(path: &Path, yaml: bool, options: &DecodeOptions) -> Result<Document> {
    let text = read_input(path)?;
    let doc = if yaml {
        Document::from_yaml_str_with(&text, options)
    } else {
        Document::from_json_str_with(&text, options)
    };
    doc.with_context(|| format!("failed to parse {}", path.display()))
}

fn load_array(
    path: &Path,
    property: Option<&str>,
    yaml: bool,
    options: &DecodeOptions,
) -> Result<Vec<Value>> {
    let Some(property) = property else {
        return match load_value(path, yaml, options)? {
            Value::Array(items) => Ok(items),
            other => bail!("{}: expected an array, found {}", path.display(), other.kind()),
        };
    };
    let doc = load_document(path, yaml, options)?;
    let items = doc
        .get_array(property)
        .with_context(|| format!("{}: {property}", path.display()))?;
    Ok(items.to_vec())
}
