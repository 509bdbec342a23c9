//! Output stage: HTML first, then the optional XML export.

use crate::config::Config;
use crate::markup::{Format, MarkupEngine, RenderOptions};
use crate::model::Node;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Write the configured outputs for `doc`.
///
/// The HTML output is fatal on failure. A failing XML export only warns.
pub fn write_outputs(doc: &Node, engine: &dyn MarkupEngine, config: &Config) -> Result<()> {
    let options = RenderOptions {
        stylesheet: config.css_file.clone(),
        indent: false,
    };
    write_one(doc, engine, Format::Html, &options, &config.output)?;
    eprintln!("Wrote '{}'", config.output.display());

    if let Some(ref xml_path) = config.xml_output {
        let options = RenderOptions {
            stylesheet: None,
            indent: true,
        };
        match write_one(doc, engine, Format::Xml, &options, xml_path) {
            Ok(()) => eprintln!("Wrote '{}'", xml_path.display()),
            Err(e) => eprintln!(
                "warning: failed to write '{}': {:#}",
                xml_path.display(),
                e
            ),
        }
    }
    Ok(())
}

fn write_one(
    doc: &Node,
    engine: &dyn MarkupEngine,
    format: Format,
    options: &RenderOptions,
    path: &Path,
) -> Result<()> {
    let bytes = engine
        .render(doc, format, options)
        .with_context(|| format!("failed to render {:?} output", format))?;
    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}
