//! JSON record files read and written by the commands.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use treequote_engine::{CostLibrary, QuoteRequest};
use treequote_models::{EquipmentId, Loadout};

use crate::error::{CliError, Result};

/// A loadout together with the library it draws costs from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadoutFile {
    pub library: CostLibrary,
    pub loadout: Loadout,
}

/// A loadout, its library and the job to quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteFile {
    pub library: CostLibrary,
    pub loadout: Loadout,
    pub request: QuoteRequest,
}

/// Loadouts and library machines to rank against each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareFile {
    pub library: CostLibrary,
    #[serde(default)]
    pub loadouts: Vec<Loadout>,
    #[serde(default)]
    pub equipment: Vec<EquipmentId>,
}

/// Reads and deserializes JSON from a file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&data)?)
}

/// Reads JSON from a file, returning None if the file doesn't exist.
pub fn read_json_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    read_json(path).map(Some)
}

/// Replaces a file with pretty JSON atomically.
///
/// The data goes to a temporary sibling first and is renamed over the target,
/// so the file is never left partially written.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let write_err = |source| CliError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp_file = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    temp_file.write_all(json.as_bytes()).map_err(write_err)?;
    temp_file.flush().map_err(write_err)?;
    temp_file.persist(path).map_err(|e| write_err(e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use treequote_models::EquipmentBuilder;

    #[test]
    fn test_write_then_read() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mulcher.json");
        let mulcher = EquipmentBuilder::new("Mulcher", 100_000.0, 10_000.0)
            .id("eq-mulcher")
            .build();

        write_json_atomic(&path, &mulcher).unwrap();
        let loaded: treequote_models::Equipment = read_json(&path).unwrap();

        assert_eq!(loaded, mulcher);
    }

    #[test]
    fn test_overwrite_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("record.json");

        write_json_atomic(&path, &serde_json::json!({"v": 1})).unwrap();
        write_json_atomic(&path, &serde_json::json!({"v": 2})).unwrap();

        let value: serde_json::Value = read_json(&path).unwrap();
        assert_eq!(value["v"], 2);
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.json");

        assert!(matches!(
            read_json::<serde_json::Value>(&path),
            Err(CliError::Read { .. })
        ));
        assert!(read_json_optional::<serde_json::Value>(&path)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_malformed_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            read_json::<serde_json::Value>(&path),
            Err(CliError::Json(_))
        ));
    }

    #[test]
    fn test_compare_file_lists_default_empty() {
        let file: CompareFile =
            serde_json::from_str(r#"{"library": {"equipment": [], "crew": []}}"#).unwrap();
        assert!(file.loadouts.is_empty());
        assert!(file.equipment.is_empty());
    }
}
