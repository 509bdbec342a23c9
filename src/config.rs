//! Resolved run configuration.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Default prefix of the generated document title.
pub const DEFAULT_TITLE: &str = "Plugins listing generated";

#[derive(Debug, Clone)]
pub struct Config {
    /// Search locations, in the order they are scanned
    pub locations: Vec<PathBuf>,
    /// Primary (HTML) output
    pub output: PathBuf,
    /// Optional indented XML export
    pub xml_output: Option<PathBuf>,
    /// Stylesheet linked from the HTML output
    pub css_file: Option<String>,
    /// Stop after this many entries in total; zero means no cap
    pub max_files: Option<usize>,
    pub include_contents: bool,
    pub summary: bool,
    pub show_paths: bool,
    /// Title prefix; the generation timestamp is appended
    pub title: String,
}

impl Config {
    /// Config with `locations` and `output` and every option at its default.
    pub fn new(locations: Vec<PathBuf>, output: PathBuf) -> Self {
        Config {
            locations,
            output,
            xml_output: None,
            css_file: None,
            max_files: None,
            include_contents: false,
            summary: true,
            show_paths: false,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

/// Split command-line paths into search locations and the output path.
///
/// `--location` values come first, then positionals. Without `--output` the
/// last positional is the output.
pub fn resolve_paths(
    locations: &[String],
    positionals: &[String],
    output: Option<PathBuf>,
) -> Result<(Vec<String>, PathBuf)> {
    let mut positionals = positionals.to_vec();
    let output = match output {
        Some(path) => path,
        None => match positionals.pop() {
            Some(last) => PathBuf::from(last),
            None => bail!("--output is required"),
        },
    };

    let mut all = locations.to_vec();
    all.extend(positionals);
    if all.is_empty() {
        bail!("no search locations given");
    }
    Ok((all, output))
}

/// Expand glob patterns into directories.
///
/// A pattern that matches no directory is kept as given, so discovery
/// reports it as an unreadable location.
pub fn expand_locations(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_dir() {
            dirs.push(path.to_path_buf());
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_dir())
            .collect();
        if matches.is_empty() {
            dirs.push(path.to_path_buf());
        } else {
            dirs.extend(matches);
        }
    }
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn last_positional_is_output() {
        let (locations, output) =
            resolve_paths(&[], &strings(&["plugins", "extra", "out.html"]), None).unwrap();
        assert_eq!(locations, ["plugins", "extra"]);
        assert_eq!(output, PathBuf::from("out.html"));
    }

    #[test]
    fn explicit_output_keeps_all_positionals() {
        let (locations, output) = resolve_paths(
            &strings(&["first"]),
            &strings(&["plugins", "extra"]),
            Some(PathBuf::from("o.html")),
        )
        .unwrap();
        assert_eq!(locations, ["first", "plugins", "extra"]);
        assert_eq!(output, PathBuf::from("o.html"));
    }

    #[test]
    fn output_required() {
        let err = resolve_paths(&strings(&["plugins"]), &[], None).unwrap_err();
        assert_eq!(err.to_string(), "--output is required");
    }

    #[test]
    fn locations_required() {
        let err = resolve_paths(&[], &strings(&["out.html"]), None).unwrap_err();
        assert_eq!(err.to_string(), "no search locations given");
    }

    #[test]
    fn globs_expand_to_directories() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("plugins_a")).unwrap();
        fs::create_dir(tmp.path().join("plugins_b")).unwrap();
        fs::write(tmp.path().join("plugins_c"), "not a dir").unwrap();

        let pattern = format!("{}/plugins_*", tmp.path().display());
        let dirs = expand_locations(&[pattern]).unwrap();
        assert_eq!(
            dirs,
            [tmp.path().join("plugins_a"), tmp.path().join("plugins_b")]
        );
    }

    #[test]
    fn unmatched_pattern_is_kept() {
        let dirs = expand_locations(&strings(&["/no/such/place"])).unwrap();
        assert_eq!(dirs, [PathBuf::from("/no/such/place")]);
    }

    #[test]
    fn defaults() {
        let config = Config::new(vec![PathBuf::from("p")], PathBuf::from("o.html"));
        assert!(config.summary);
        assert!(!config.include_contents);
        assert_eq!(config.title, DEFAULT_TITLE);
    }
}
