//! Source file discovery.
//!
//! Lists the direct children of each search location, keeps the ones carrying
//! the source extension and yields them sorted case-insensitively, one
//! location at a time. Locations are read lazily, so a consumer that stops
//! early never touches the remaining ones.

use crate::error::CatalogError;
use crate::model::SourceUnit;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File extension recognized as a source file (compared case-insensitively).
pub const SOURCE_EXTENSION: &str = ".py";

/// Lazy, ordered walk over the search locations.
pub struct Discovery {
    locations: VecDeque<PathBuf>,
    pending: VecDeque<SourceUnit>,
}

impl Discovery {
    pub fn new(locations: &[PathBuf]) -> Self {
        Discovery {
            locations: locations.iter().cloned().collect(),
            pending: VecDeque::new(),
        }
    }
}

impl Iterator for Discovery {
    type Item = Result<SourceUnit, CatalogError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(unit) = self.pending.pop_front() {
                return Some(Ok(unit));
            }
            let location = self.locations.pop_front()?;
            match list_location(&location) {
                Ok(units) => self.pending.extend(units),
                Err(e) => {
                    // Stop after the first unreadable location.
                    self.locations.clear();
                    return Some(Err(e));
                }
            }
        }
    }
}

/// List the source files directly inside `location`, sorted by lowercased name.
pub fn list_location(location: &Path) -> Result<Vec<SourceUnit>, CatalogError> {
    let entries = fs::read_dir(location).map_err(|source| CatalogError::Discovery {
        path: location.to_path_buf(),
        source,
    })?;

    let mut units = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| CatalogError::Discovery {
            path: location.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if !is_source_name(&name) {
            continue;
        }
        units.push(SourceUnit {
            display_name: name,
            full_path: path,
        });
    }

    units.sort_by_key(|u| u.display_name.to_lowercase());
    debug!(
        location = %location.display(),
        count = units.len(),
        "listed source files"
    );
    Ok(units)
}

fn is_source_name(name: &str) -> bool {
    name.to_lowercase().ends_with(SOURCE_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "").unwrap();
    }

    fn names(units: &[SourceUnit]) -> Vec<&str> {
        units.iter().map(|u| u.display_name.as_str()).collect()
    }

    #[test]
    fn source_name_is_case_insensitive() {
        assert!(is_source_name("a.py"));
        assert!(is_source_name("B.PY"));
        assert!(!is_source_name("c.pyc"));
        assert!(!is_source_name("README"));
    }

    #[test]
    fn lists_sorted_ignoring_case() {
        let dir = TempDir::new().unwrap();
        for name in ["zeta.py", "Alpha.py", "beta.py", "notes.txt"] {
            touch(dir.path(), name);
        }
        let units = list_location(dir.path()).unwrap();
        assert_eq!(names(&units), ["Alpha.py", "beta.py", "zeta.py"]);
    }

    #[test]
    fn skips_subdirectories() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "top.py");
        fs::create_dir(dir.path().join("pkg.py")).unwrap();
        let nested = dir.path().join("sub");
        fs::create_dir(&nested).unwrap();
        touch(&nested, "deep.py");

        let units = list_location(dir.path()).unwrap();
        assert_eq!(names(&units), ["top.py"]);
    }

    #[test]
    fn walks_locations_in_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        touch(first.path(), "b.py");
        touch(second.path(), "a.py");

        let units: Vec<SourceUnit> = Discovery::new(&[
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ])
        .collect::<Result<_, _>>()
        .unwrap();
        assert_eq!(names(&units), ["b.py", "a.py"]);
    }

    #[test]
    fn missing_location_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let mut walk = Discovery::new(&[missing.clone(), dir.path().to_path_buf()]);
        match walk.next() {
            Some(Err(CatalogError::Discovery { path, .. })) => assert_eq!(path, missing),
            other => panic!("expected discovery error, got {:?}", other),
        }
        assert!(walk.next().is_none());
    }

    #[test]
    fn stops_reading_when_consumer_stops() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.py");
        touch(dir.path(), "b.py");
        let missing = dir.path().join("never-read");

        let taken: Vec<_> = Discovery::new(&[dir.path().to_path_buf(), missing])
            .take(1)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(names(&taken), ["a.py"]);
    }
}
