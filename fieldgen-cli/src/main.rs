use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fieldgen_core::catalog::default_catalog_root;
use fieldgen_core::{ConstructStyle, DiagnosticLog, Diagnostics, GeneratorOptions, generate};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Emit field declarations in dependency order.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Field manifest to read (defaults to stdin)
    #[arg(short, long)]
    input: Option<String>,

    #[arg(short, long)]
    output: String,

    #[arg(
        long,
        value_name = "PATH",
        help = "Directory of *.types files (defaults to the bundled catalog)"
    )]
    catalog: Option<String>,

    #[arg(
        long,
        value_name = "TOKEN",
        help = "Construct defaults as `(T) TOKEN(T)` instead of GWT.create"
    )]
    construct_token: Option<String>,

    #[arg(long, default_value_t = 2, help = "Spaces per indentation level")]
    indent: usize,

    #[arg(
        long,
        value_name = "SIGNATURE",
        help = "Wrap the declarations in a block opened by this header"
    )]
    enclosing: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    execute(cli)
}

fn execute(cli: Cli) -> Result<()> {
    let catalog_root = cli
        .catalog
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(default_catalog_root);

    let source = match &cli.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {path}"))?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let options = GeneratorOptions {
        indent_width: cli.indent,
        construct: match cli.construct_token {
            Some(token) => ConstructStyle::Macro(token),
            None => ConstructStyle::GwtCreate,
        },
        enclosing: cli.enclosing,
    };
    debug!(catalog = %catalog_root.display(), ?options, "generating");

    let mut diagnostics = DiagnosticLog::new();
    let unit = match generate(&source, &catalog_root, &options, &mut diagnostics) {
        Ok(unit) => unit,
        Err(err) if diagnostics.has_fatal() => {
            return Err(anyhow::Error::new(err).context(format!(
                "generation failed with {} fatal diagnostic(s)",
                diagnostics.len()
            )));
        }
        Err(err) => return Err(err.into()),
    };
    write_output(&cli.output, unit.source.as_bytes())?;
    Ok(())
}

fn write_output(path: &str, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = PathBuf::from(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {parent:?}"))?;
        }
    }
    fs::write(path, bytes).with_context(|| format!("failed to write output file {path}"))?;
    Ok(())
}
