// SPDX-License-Identifier: MIT OR Apache-2.0
//! jqpath CLI binary - query, update and flatten JSON with path expressions

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use jqpath::{
    ApplyOptions, ExtractOptions, FlattenOptions, MergeOptions, Operation, PathError, apply,
    extract, flatten, merge_many, normalize, unflatten,
};
use jqpath_cli::{OutputOptions, logging, output};
use serde_json::Value;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jqpath")]
#[command(version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
struct Args {
    /// Separator between path keys
    #[arg(long, global = true, default_value_t = '.', env = "JQPATH_SEPARATOR")]
    separator: char,

    /// Compact single-line JSON output
    #[arg(short, long, global = true)]
    compact: bool,

    /// Print strings without quotes, one result per line
    #[arg(short, long, global = true)]
    raw: bool,

    /// Indentation width for pretty output
    #[arg(long, global = true, default_value_t = 2)]
    indent: usize,

    /// More diagnostics on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for jqpath CLI
#[derive(Subcommand)]
enum Commands {
    /// Read the values a path reaches
    Get {
        /// Path expression
        path: String,
        /// JSON file (reads from stdin if not provided)
        file: Option<PathBuf>,
        /// Stop after the first match
        #[arg(long)]
        first: bool,
        /// Stop after N matches
        #[arg(long, value_name = "N")]
        max: Option<usize>,
        /// Include the concrete path of every match
        #[arg(long)]
        paths: bool,
        /// JSON value printed when a single-valued path matches nothing
        #[arg(long, value_name = "JSON")]
        default: Option<String>,
    },
    /// Set a value at every location a path reaches
    Set {
        /// Path expression
        path: String,
        /// JSON value to write
        value: String,
        /// JSON file (reads from stdin if not provided)
        file: Option<PathBuf>,
        /// Create missing maps and sequences
        #[arg(long)]
        create: bool,
    },
    /// Delete every location a path reaches
    Delete {
        /// Path expression
        path: String,
        /// JSON file (reads from stdin if not provided)
        file: Option<PathBuf>,
        /// Treat missing targets as a no-op
        #[arg(long)]
        create: bool,
    },
    /// Flatten a document into a path-keyed map
    Flatten {
        /// JSON file (reads from stdin if not provided)
        file: Option<PathBuf>,
        /// Keep empty maps and sequences
        #[arg(long)]
        keep_empty: bool,
    },
    /// Rebuild a document from a path-keyed map
    Unflatten {
        /// JSON file (reads from stdin if not provided)
        file: Option<PathBuf>,
    },
    /// Deep merge JSON files left to right
    Merge {
        /// JSON files to merge
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Concatenate arrays instead of replacing them
        #[arg(long)]
        concat: bool,
    },
    /// Check a path expression
    Validate {
        /// Path expression
        path: String,
    },
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    let result = match &args.command {
        Commands::Get {
            path,
            file,
            first,
            max,
            paths,
            default,
        } => run_get(
            &args,
            path,
            file.as_ref(),
            *first,
            *max,
            *paths,
            default.as_deref(),
        ),
        Commands::Set {
            path,
            value,
            file,
            create,
        } => serde_json::from_str(value)
            .context("VALUE is not valid JSON")
            .and_then(|value| {
                run_apply(&args, path, Operation::Set(value), file.as_ref(), *create)
            }),
        Commands::Delete { path, file, create } => {
            run_apply(&args, path, Operation::Delete, file.as_ref(), *create)
        }
        Commands::Flatten { file, keep_empty } => run_flatten(&args, file.as_ref(), *keep_empty),
        Commands::Unflatten { file } => run_unflatten(&args, file.as_ref()),
        Commands::Merge { files, concat } => run_merge(&args, files, *concat),
        Commands::Validate { path } => run_validate(&args, path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        let syntax = e
            .downcast_ref::<PathError>()
            .is_some_and(PathError::is_syntax);
        std::process::exit(if syntax { 2 } else { 1 });
    }
}

const fn output_options(args: &Args) -> OutputOptions {
    OutputOptions {
        compact: args.compact,
        raw: args.raw,
        indent: args.indent,
    }
}

fn run_get(
    args: &Args,
    path: &str,
    file: Option<&PathBuf>,
    first: bool,
    max: Option<usize>,
    paths: bool,
    default: Option<&str>,
) -> Result<()> {
    let document = read_document(file)?;
    let mut options = ExtractOptions::default().with_separator(args.separator);
    if first {
        options = options.first();
    }
    if let Some(n) = max {
        options = options.max_results(n);
    }
    if paths {
        options = options.with_paths();
    }
    if let Some(text) = default {
        let value = serde_json::from_str(text).context("--default is not valid JSON")?;
        options = options.default_value(value);
    }

    let extracted = extract(&document, path, &options)?;
    tracing::info!(results = extracted.len(), "get");
    write_output(
        &output::render_extracted(extracted, &output_options(args))?,
        args,
    )
}

fn run_apply(
    args: &Args,
    path: &str,
    operation: Operation,
    file: Option<&PathBuf>,
    create: bool,
) -> Result<()> {
    let mut document = read_document(file)?;
    let path = normalize(path, args.separator)?;
    let mut options = ApplyOptions::default();
    if create {
        options = options.create_missing();
    }
    let written = apply(&mut document, &path, operation, &options)?;
    tracing::info!(written, "apply");
    write_output(&output::render(&document, &output_options(args))?, args)
}

fn run_flatten(args: &Args, file: Option<&PathBuf>, keep_empty: bool) -> Result<()> {
    let document = read_document(file)?;
    let mut options = FlattenOptions::default().with_separator(args.separator);
    if keep_empty {
        options = options.keep_empty();
    }
    let flat = flatten(&document, &options);
    write_output(&output::render_flat(flat, &output_options(args))?, args)
}

fn run_unflatten(args: &Args, file: Option<&PathBuf>) -> Result<()> {
    let Value::Object(flat) = read_document(file)? else {
        bail!("unflatten expects a JSON object of path keys");
    };
    let options = FlattenOptions::default().with_separator(args.separator);
    let document = unflatten(&flat, &options)?;
    write_output(&output::render(&document, &output_options(args))?, args)
}

fn run_merge(args: &Args, files: &[PathBuf], concat: bool) -> Result<()> {
    let documents = files
        .iter()
        .map(|file| read_document(Some(file)))
        .collect::<Result<Vec<_>>>()?;
    let mut options = MergeOptions::default();
    if concat {
        options = options.concat();
    }
    let merged = merge_many(&documents, &options);
    write_output(&output::render(&merged, &output_options(args))?, args)
}

fn run_validate(args: &Args, path: &str) -> Result<()> {
    let parsed = normalize(path, args.separator)?;
    let kind = if parsed.has_fan_out() {
        "fan-out"
    } else {
        "concrete"
    };
    let report = format!(
        "{}\t{kind}\t{} steps",
        parsed.to_string_with(args.separator),
        parsed.len()
    );
    write_output(&report, args)
}

fn read_document(path: Option<&PathBuf>) -> Result<Value> {
    let input = if let Some(p) = path {
        fs::read_to_string(p).with_context(|| format!("failed to read {}", p.display()))?
    } else {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        input
    };
    let source = path.map_or_else(|| "stdin".to_owned(), |p| p.display().to_string());
    serde_json::from_str(&input).with_context(|| format!("{source} is not valid JSON"))
}

fn write_output(output: &str, args: &Args) -> Result<()> {
    if let Some(path) = &args.output {
        let mut contents = output.to_owned();
        contents.push('\n');
        fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
        return Ok(());
    }
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(output.as_bytes())?;
    handle.write_all(b"\n")?;
    Ok(())
}
