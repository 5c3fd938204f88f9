//! Import configuration
//!
//! Every parameter of a profile import, loadable from a RON file. The
//! defaults reproduce the stock airfoil import: sketch on XOY, wire
//! translated by (10, 0, 0).

use std::path::{Path, PathBuf};

use glam::DVec3;
use serde::{Deserialize, Serialize};
use wk_cad::{SketchError, SketchPlane};

use crate::constants::{
    DEFAULT_CSV_PATH, DEFAULT_OFFSET, DEFAULT_PLANE, DEFAULT_SKETCH_NAME,
    DEFAULT_TRANSLATION_NAME, DEFAULT_WIRE_NAME,
};
use crate::import::ImportOptions;

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(char),
}

/// Parameters of one CSV profile import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// CSV file to read
    pub csv_path: PathBuf,
    /// Field delimiter of the CSV
    pub delimiter: char,
    /// Default plane the sketch is drawn on (XOY, XOZ or YOZ)
    pub plane: String,
    /// Name for the created part; generated when absent
    pub part_name: Option<String>,
    /// Name for the sketch holding the segments
    pub sketch_name: String,
    /// Name for the assembled wire
    pub wire_name: String,
    /// Name for the translated wire
    pub translation_name: String,
    /// Translation offset
    pub offset: [f64; 3],
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            delimiter: ',',
            plane: DEFAULT_PLANE.to_string(),
            part_name: None,
            sketch_name: DEFAULT_SKETCH_NAME.to_string(),
            wire_name: DEFAULT_WIRE_NAME.to_string(),
            translation_name: DEFAULT_TRANSLATION_NAME.to_string(),
            offset: DEFAULT_OFFSET,
        }
    }
}

impl ImportConfig {
    /// Default config reading the given CSV
    pub fn for_csv(path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: path.into(),
            ..Self::default()
        }
    }

    /// Load config from a RON file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_ron(&content)
    }

    /// Parse config from RON text
    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Translation offset as a vector
    pub fn offset(&self) -> DVec3 {
        DVec3::from_array(self.offset)
    }

    /// Resolve the configured sketch plane
    pub fn sketch_plane(&self) -> Result<SketchPlane, SketchError> {
        SketchPlane::default_plane(&self.plane)
    }

    /// CSV reader options derived from this config
    pub fn import_options(&self) -> Result<ImportOptions, ConfigError> {
        if !self.delimiter.is_ascii() {
            return Err(ConfigError::InvalidDelimiter(self.delimiter));
        }
        Ok(ImportOptions::default().with_delimiter(self.delimiter as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ImportConfig::default();
        assert_eq!(config.offset(), DVec3::new(10.0, 0.0, 0.0));
        assert_eq!(config.sketch_plane().unwrap(), SketchPlane::xoy());
        assert_eq!(config.wire_name, "Airfoil_Wire");
        assert_eq!(config.import_options().unwrap().delimiter, b',');
    }

    #[test]
    fn test_partial_ron() {
        let config = ImportConfig::from_ron(
            r#"(csv_path: "naca.csv", plane: "XOZ", offset: (0.0, 0.0, -5.0))"#,
        )
        .unwrap();

        assert_eq!(config.csv_path, PathBuf::from("naca.csv"));
        assert_eq!(config.offset(), DVec3::new(0.0, 0.0, -5.0));
        assert_eq!(config.sketch_name, "Airfoil_Sketch");
        assert_eq!(config.sketch_plane().unwrap().normal, -DVec3::Y);
    }

    #[test]
    fn test_bad_values() {
        assert!(matches!(
            ImportConfig::from_ron("(offset: \"x\")"),
            Err(ConfigError::Parse(_))
        ));

        let config = ImportConfig {
            delimiter: 'é',
            plane: "ABC".into(),
            ..ImportConfig::default()
        };
        assert!(config.import_options().is_err());
        assert!(config.sketch_plane().is_err());
    }

    #[test]
    fn test_round_trip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("import.ron");
        let config = ImportConfig {
            part_name: Some("Wing".into()),
            ..ImportConfig::for_csv("wing.csv")
        };
        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        std::fs::write(&path, text).unwrap();

        assert_eq!(ImportConfig::load(&path).unwrap(), config);
    }
}
