//! Run the stages in order: discover, extract, parse, merge, render.

use crate::config::Config;
use crate::discover::Discovery;
use crate::extract;
use crate::fragment::parse_fragment;
use crate::markup::{CommonMark, MarkupEngine};
use crate::merge::{MergeOptions, Merger};
use crate::model::{Entry, Node};
use crate::render;
use anyhow::{Context, Result};
use std::fs;
use tracing::info;

/// Generate the catalog described by `config` with the bundled engine.
pub fn run(config: &Config) -> Result<()> {
    run_with(config, &CommonMark)
}

pub fn run_with(config: &Config, engine: &dyn MarkupEngine) -> Result<()> {
    let entries = collect_entries(config, engine)?;
    info!(entries = entries.len(), "collected documentation");
    let doc = build_document(&entries, config)?;
    render::write_outputs(&doc, engine, config)
}

/// Read every discovered unit into an entry, in discovery order.
///
/// Stops consuming discovery once `max_files` entries exist, so later
/// locations are never listed. A cap of zero means no cap.
pub fn collect_entries(config: &Config, engine: &dyn MarkupEngine) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for unit in Discovery::new(&config.locations) {
        if config
            .max_files
            .is_some_and(|max| max > 0 && entries.len() >= max)
        {
            break;
        }
        let unit = unit?;

        let bytes = fs::read(&unit.full_path)
            .with_context(|| format!("failed to read {}", unit.full_path.display()))?;
        let raw = String::from_utf8_lossy(&bytes);

        // Package initializers without a docstring are left out.
        let Some(text) = extract::doc_text(&unit, &raw) else {
            continue;
        };

        if config.show_paths {
            eprintln!("Processing: '{}'", unit.full_path.display());
        }
        let fragment = parse_fragment(engine, &text, &unit.full_path);
        entries.push(Entry { unit, fragment });
    }
    Ok(entries)
}

/// Merge `entries` under a title stamped with the current local time.
pub fn build_document(entries: &[Entry], config: &Config) -> Result<Node> {
    let options = MergeOptions {
        title: format!("{} {}", config.title, timestamp()),
        contents: config.include_contents,
        summary: config.summary,
    };
    Ok(Merger::new(options).merge(entries)?)
}

/// Current local time, `Thu Jan  1 00:00:00 1970` style.
fn timestamp() -> String {
    chrono::Local::now().format("%a %b %e %H:%M:%S %Y").to_string()
}
