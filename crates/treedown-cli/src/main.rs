use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use std::{fs, io};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use treedown_config::{CompileDefaults, Config};
use treedown_engine::{CompileFlags, Document};

/// Compile a markdown document and print its block tree
#[derive(Parser, Debug)]
#[command(name = "treedown")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Markdown file to compile (stdin when omitted or `-`)
    input: Option<PathBuf>,

    /// Heading line for the dump (defaults to the file name)
    #[arg(long, value_name = "TITLE")]
    title: Option<String>,

    /// Compile without pipe-table support
    #[arg(long)]
    no_tables: bool,

    /// Compile without code fences
    #[arg(long)]
    no_fenced_code: bool,

    /// Compile without `%class%` div quotes
    #[arg(long)]
    no_div_quotes: bool,

    /// Enable `=term=` definition lists
    #[arg(long)]
    definition_lists: bool,

    /// Derive anchors for headings
    #[arg(long)]
    anchors: bool,

    /// Treat the input as one preformatted block
    #[arg(long)]
    plain_source: bool,

    /// Alternate config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Config gives the baseline dialect; flags override it per invocation.
fn resolve_flags(defaults: &CompileDefaults, cli: &Cli) -> CompileFlags {
    let mut flags = CompileFlags::empty();
    flags.set(CompileFlags::TABLES, defaults.tables && !cli.no_tables);
    flags.set(
        CompileFlags::FENCED_CODE,
        defaults.fenced_code && !cli.no_fenced_code,
    );
    flags.set(
        CompileFlags::DIV_QUOTES,
        defaults.div_quotes && !cli.no_div_quotes,
    );
    flags.set(
        CompileFlags::DEFINITION_LISTS,
        defaults.definition_lists || cli.definition_lists,
    );
    flags.set(CompileFlags::ANCHORS, defaults.anchors || cli.anchors);
    flags.set(CompileFlags::PLAIN_SOURCE, cli.plain_source);
    flags
}

fn read_input(cli: &Cli) -> Result<(Vec<u8>, String)> {
    match &cli.input {
        Some(path) if path.as_os_str() != "-" => {
            let bytes =
                fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
            Ok((bytes, path.display().to_string()))
        }
        _ => {
            let mut bytes = Vec::new();
            io::stdin()
                .read_to_end(&mut bytes)
                .context("failed to read stdin")?;
            Ok((bytes, "stdin".to_string()))
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?
            .with_context(|| format!("config file not found: {}", path.display()))?,
        None => Config::load()?.unwrap_or_default(),
    };
    let flags = resolve_flags(&config.compile, &cli);
    debug!(?flags, "resolved dialect");

    let (bytes, fallback_title) = read_input(&cli)?;
    let title = cli.title.as_deref().unwrap_or(&fallback_title);

    let mut doc = Document::from_bytes(&bytes)?;
    let dump = doc.dump_to_string(flags, title)?;
    print!("{dump}");

    Ok(())
}
