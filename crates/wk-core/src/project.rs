//! Project file serialization

use std::path::Path;

use serde::{Deserialize, Serialize};
use wk_cad::{CadKernel, Document, DocumentError};

use crate::constants::PROJECT_VERSION;

/// Project file holding a document
///
/// Kernel shapes are not stored; call [`Project::rebuild`] after loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// File format version
    pub version: u32,
    /// Project name
    pub name: String,
    /// The CAD document
    pub document: Document,
}

impl Default for Project {
    fn default() -> Self {
        Self::new("New Project")
    }
}

impl Project {
    /// Create a new empty project
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: PROJECT_VERSION,
            name: name.into(),
            document: Document::new(),
        }
    }

    /// Save project to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ProjectError> {
        let path = path.as_ref();
        let content = self.to_bytes()?;
        std::fs::write(path, content).map_err(|e| ProjectError::Io(e.to_string()))?;
        Ok(())
    }

    /// Serialize project to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProjectError> {
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ProjectError::Serialize(e.to_string()))?;
        Ok(content.into_bytes())
    }

    /// Load project from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ProjectError::Io(e.to_string()))?;
        Self::load_from_str(&content)
    }

    /// Load project from RON text
    pub fn load_from_str(content: &str) -> Result<Self, ProjectError> {
        let project: Project =
            ron::from_str(content).map_err(|e| ProjectError::Deserialize(e.to_string()))?;
        if project.version > PROJECT_VERSION {
            return Err(ProjectError::UnsupportedVersion(project.version));
        }
        Ok(project)
    }

    /// Rebuild kernel shapes for every part of the document
    ///
    /// See [`Document::rebuild`] for which kernel to pass.
    pub fn rebuild(&mut self, kernel: &dyn CadKernel) -> Result<(), ProjectError> {
        let summary = self.document.rebuild(kernel)?;
        tracing::debug!(
            "Rebuilt project '{}': {} edges, {} features",
            self.name,
            summary.edges,
            summary.features
        );
        Ok(())
    }
}

/// Project-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProjectError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
    #[error("Unsupported project version: {0}")]
    UnsupportedVersion(u32),
    #[error("Rebuild failed: {0}")]
    Rebuild(#[from] DocumentError),
}
