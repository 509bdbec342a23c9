//! plugin-catalog: build an HTML catalog from Python plugin docstrings.
//!
//! `plugin-catalog [options] dir1 [dir2 ...] output.html`

use anyhow::Result;
use clap::Parser;
use plugin_catalog::config::{self, Config, DEFAULT_TITLE};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "plugin-catalog",
    about = "Generate an HTML catalog of the module docstrings in Python plugin directories"
)]
struct Cli {
    /// Directories to search (glob patterns supported), then the output file
    /// when --output is not given.
    paths: Vec<String>,

    /// Add a location to the list to search. Can be repeated.
    #[arg(long)]
    location: Vec<String>,

    /// Stylesheet linked from the HTML output
    #[arg(long)]
    css_file: Option<String>,

    /// Stop after this many files
    #[arg(long)]
    max_files: Option<usize>,

    /// Include a table of contents
    #[arg(long)]
    include_contents: bool,

    /// Don't generate the summary
    #[arg(long)]
    no_summary: bool,

    /// Print the path of each processed file
    #[arg(long)]
    show_paths: bool,

    /// HTML output file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Optional indented XML export of the same document
    #[arg(long)]
    xml_output: Option<PathBuf>,

    /// Title prefix; the generation time is appended
    #[arg(long, default_value = DEFAULT_TITLE)]
    title: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = build_config(cli)?;
    plugin_catalog::run(&config)
}

fn build_config(cli: Cli) -> Result<Config> {
    let (patterns, output) = config::resolve_paths(&cli.location, &cli.paths, cli.output)?;
    let locations = config::expand_locations(&patterns)?;

    let mut config = Config::new(locations, output);
    config.xml_output = cli.xml_output;
    config.css_file = cli.css_file;
    config.max_files = cli.max_files;
    config.include_contents = cli.include_contents;
    config.summary = !cli.no_summary;
    config.show_paths = cli.show_paths;
    config.title = cli.title;
    Ok(config)
}
