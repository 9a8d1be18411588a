//! Table files on disk
//!
//! One JSON table per file; a directory load skips files that fail to parse
//! and logs a warning for each.

use super::{ConstantTable, LoadError, LoadResult};
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// Load a single table from a JSON file
pub fn load_table<P: AsRef<Path>>(path: P) -> LoadResult<ConstantTable> {
    let path = path.as_ref();

    let contents = fs::read_to_string(path)
        .map_err(|e| LoadError::FileNotFound(format!("{}: {}", path.display(), e)))?;

    let table: ConstantTable = serde_json::from_str(&contents)
        .map_err(|e| LoadError::ParseError(format!("{}: {}", path.display(), e)))?;

    debug!(
        "loaded table {} ({} constants) from {}",
        table.id(),
        table.len(),
        path.display()
    );
    Ok(table)
}

/// Load every `*.json` table in a directory, sorted by file name
pub fn load_tables<P: AsRef<Path>>(dir: P) -> LoadResult<Vec<ConstantTable>> {
    let dir = dir.as_ref();

    if !dir.is_dir() {
        return Err(LoadError::FileNotFound(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)
        .map_err(|e| LoadError::FileNotFound(format!("{}: {}", dir.display(), e)))?
    {
        let entry = entry.map_err(|e| LoadError::FileNotFound(e.to_string()))?;
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut tables = Vec::new();
    for path in paths {
        match load_table(&path) {
            Ok(table) => tables.push(table),
            Err(e) => warn!("Failed to load {}: {}", path.display(), e),
        }
    }

    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let result = load_table("definitely/not/here.json");
        assert!(matches!(result, Err(LoadError::FileNotFound(_))));
    }

    #[test]
    fn test_not_a_directory() {
        let result = load_tables("definitely/not/here");
        assert!(matches!(result, Err(LoadError::FileNotFound(_))));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let path = std::env::temp_dir().join("symbolic_discovery_invalid_table.json");
        fs::write(&path, "{ not json").unwrap();

        let result = load_table(&path);
        assert!(matches!(result, Err(LoadError::ParseError(_))));

        fs::remove_file(&path).ok();
    }
}
