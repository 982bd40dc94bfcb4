//! Command-line front end: run the loader over one stylesheet on disk.

use std::fs;
use std::io::{self, Write as _};
use std::path::PathBuf;

use anyhow::{Context as _, Error, anyhow};
use log::{error, info};

use crate::{CollectingContext, run_loader_bytes};

/// Usage line printed with argument errors.
pub const USAGE: &str = "usage: scoped-rem <file.css> [--query=<query>] [--rootval=<value>] \
                         [--varname=<name>] [--scope=<selector>] [--precision=<n>] [--out=<file>]";

/// Flags that map one-to-one onto query keys.
const QUERY_FLAGS: [(&str, &str); 4] = [
    ("rootval", "rootval"),
    ("varname", "varname"),
    ("scope", "varselector"),
    ("precision", "precision"),
];

/// Parsed command line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CliArgs {
    /// Stylesheet to transform.
    pub input: PathBuf,
    /// Raw resource query, `?` optional.
    pub query: Option<String>,
    /// `(query key, value)` pairs from the option flags, in command-line order.
    pub options: Vec<(&'static str, String)>,
    /// Output file; stdout when absent.
    pub out: Option<PathBuf>,
}

/// Parse arguments (without the program name). Flags accept `--key=value` and `--key value`.
///
/// # Errors
/// Returns an error for unknown flags, a flag without a value, or a missing or repeated input.
pub fn parse_args<I>(args: I) -> Result<CliArgs, Error>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = CliArgs::default();
    let mut input: Option<PathBuf> = None;
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let Some(flag) = arg.strip_prefix("--") else {
            if let Some(previous) = input.replace(PathBuf::from(&arg)) {
                return Err(anyhow!("unexpected extra input `{arg}` after `{}`", previous.display()));
            }
            continue;
        };
        let (name, value) = match flag.split_once('=') {
            Some((name, value)) => (name.to_owned(), value.to_owned()),
            None => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("flag `--{flag}` needs a value"))?;
                (flag.to_owned(), value)
            }
        };
        match name.as_str() {
            "query" => parsed.query = Some(value),
            "out" => parsed.out = Some(PathBuf::from(value)),
            other => {
                let &(_, key) = QUERY_FLAGS
                    .iter()
                    .find(|(flag_name, _)| *flag_name == other)
                    .ok_or_else(|| anyhow!("unknown flag `--{other}`"))?;
                parsed.options.push((key, value));
            }
        }
    }
    parsed.input = input.ok_or_else(|| anyhow!("missing input file"))?;
    Ok(parsed)
}

/// Build the resource query handed to the loader.
///
/// Option flags imply the activation key. Without `--query` the transform is always on.
pub fn build_query(args: &CliArgs) -> String {
    let mut query = String::from("?");
    if let Some(raw) = &args.query {
        query.push_str(raw.strip_prefix('?').unwrap_or(raw));
    }
    let mut append = |pair: &str| {
        if query.len() > 1 {
            query.push('&');
        }
        query.push_str(pair);
    };
    if args.query.is_none() || !args.options.is_empty() {
        append("rem-scoped");
    }
    for (key, value) in &args.options {
        append(&format!("{key}={}", urlencoding::encode(value)));
    }
    query
}

/// Transform the input file and write the result.
///
/// Returns the number of loader errors. The output is written even when errors were reported,
/// in which case it is the unchanged input.
///
/// # Errors
/// Returns an error when the input cannot be read or the output cannot be written.
pub fn run(args: &CliArgs) -> Result<usize, Error> {
    let source = fs::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let query = build_query(args);
    info!("[SCOPED-REM] {} with query {query}", args.input.display());

    let mut ctx = CollectingContext::new(args.input.display().to_string(), query);
    let output = run_loader_bytes(&source, &mut ctx);

    match &args.out {
        Some(path) => {
            fs::write(path, &output).with_context(|| format!("writing {}", path.display()))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&output).context("writing to stdout")?;
            stdout.flush().context("flushing stdout")?;
        }
    }

    for err in &ctx.errors {
        error!("{err}");
    }
    Ok(ctx.errors.len())
}
