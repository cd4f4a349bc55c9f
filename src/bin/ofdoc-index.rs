//! ofdoc-index — build the keyword index from the openFrameworks documentation sources.
//!
//! `ofdoc-index --docs ofSite/_documentation --index-dir ~/.ofdoc/index`
//!
//! Each `.markdown` page is converted with pandoc into `<index-dir>/html/`
//! (skipped when the HTML is already newer), then its table of contents is
//! read for class, function and method names.

use anyhow::{Context, Result};
use clap::Parser;
use ofdoc::config::Config;
use ofdoc::convert::Pandoc;
use ofdoc::indexer::Indexer;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ofdoc-index",
    about = "Index the openFrameworks documentation for ofdoc-open"
)]
struct Cli {
    /// Documentation source directory (ofSite/_documentation)
    #[arg(short = 'd', long)]
    docs: Option<PathBuf>,

    /// Directory receiving the index files
    #[arg(short = 'i', long, env = "OFDOC_INDEX_DIR")]
    index_dir: Option<PathBuf>,

    /// Converter executable (pandoc)
    #[arg(long)]
    converter: Option<PathBuf>,

    /// Extension of the source documents
    #[arg(long)]
    extension: Option<String>,

    /// TOML configuration file
    #[arg(short = 'c', long, env = "OFDOC_CONFIG")]
    config: Option<PathBuf>,

    /// Debug output
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    ofdoc::logging::init(cli.verbose)?;

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(docs) = cli.docs {
        config.docs_root = Some(docs);
    }
    if let Some(dir) = cli.index_dir {
        config.index_dir = dir;
    }
    if let Some(converter) = cli.converter {
        config.converter = converter;
    }
    if let Some(ext) = cli.extension {
        config.source_extension = ext.trim_start_matches('.').to_string();
    }

    let docs_root = config
        .docs_root
        .context("--docs is required (or set docs_root in the configuration file)")?;

    let converter = Pandoc::new(config.converter);
    let indexer = Indexer {
        docs_root,
        index_dir: config.index_dir,
        extension: config.source_extension,
        converter: &converter,
    };
    indexer.run().context("indexing failed")?;
    Ok(())
}
