//! ofdoc-open — open the documentation page of an openFrameworks keyword.
//!
//! `ofdoc-open ofVec3f` opens the class page, `ofdoc-open ofBackground` the
//! function block, and `ofdoc-open draw` asks which class's `draw` to show.
//! Unknown keywords open the documentation home page.

use anyhow::{bail, Result};
use clap::Parser;
use ofdoc::config::{self, Config};
use ofdoc::picker::TerminalPicker;
use ofdoc::resolver::{Resolution, Resolver};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "ofdoc-open",
    about = "Open the openFrameworks documentation of a class, function or method"
)]
struct Cli {
    /// Class, function or method name
    keyword: Option<String>,

    /// Directory holding the index files
    #[arg(short = 'i', long, env = "OFDOC_INDEX_DIR")]
    index_dir: Option<PathBuf>,

    /// Documentation base URL
    #[arg(short = 'u', long, env = "OFDOC_BASE_URL")]
    base_url: Option<String>,

    /// TOML configuration file
    #[arg(short = 'c', long, env = "OFDOC_CONFIG")]
    config: Option<PathBuf>,

    /// Print the URL instead of launching a browser
    #[arg(long)]
    print_only: bool,

    /// Debug output
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    ofdoc::logging::init(cli.verbose)?;

    let Some(keyword) = cli.keyword else {
        bail!("ofdoc-open must be called with an item name to search in the documentation");
    };

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.index_dir {
        config.index_dir = dir;
    }
    if let Some(url) = cli.base_url {
        config.base_url = config::normalize_base_url(&url);
    }

    let resolver = Resolver::new(config.index_dir, config.base_url);
    let resolution = resolver.resolve(&keyword, &mut TerminalPicker::new())?;

    if let Resolution::NotFound { .. } = resolution {
        println!("Item not found in the documentation");
    }
    if let Some(url) = resolution.url() {
        println!("Opening {}", url);
        if !cli.print_only {
            ofdoc::browser::open(url)?;
        }
    } else {
        info!("Nothing selected");
    }
    Ok(())
}
