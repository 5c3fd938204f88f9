//! Feature Operations
//!
//! Named features that combine or transform previously built geometry.
//! Inputs are referenced through [`Selection`]s rather than shape handles so
//! that a feature can be rebuilt after the document is reloaded.

use std::fmt;
use std::str::FromStr;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::kernel::{CadKernel, Shape, ShapeKind};

/// Feature-related errors
#[derive(Debug, Clone, Error)]
pub enum FeatureError {
    #[error("Sketch error: {0}")]
    SketchError(#[from] crate::sketch::SketchError),

    #[error("CAD kernel error: {0}")]
    CadError(#[from] crate::kernel::CadError),

    #[error("Invalid feature: {0}")]
    InvalidFeature(String),

    #[error("Feature not found: {0}")]
    FeatureNotFound(Uuid),

    #[error("Unknown selection type: {0}")]
    UnknownSelectionKind(String),

    #[error("Nothing named '{name}' can be selected as {kind}")]
    SelectionNotFound { kind: SelectionKind, name: String },

    #[error("Selection {kind} '{name}' has not been built yet")]
    SelectionNotBuilt { kind: SelectionKind, name: String },
}

/// Result type for feature operations
pub type FeatureResult<T> = Result<T, FeatureError>;

/// Type of entity a selection refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionKind {
    /// A sketch line, selected by its feature name
    Edge,
    /// The wire produced by a feature, selected by the feature name
    Wire,
}

impl SelectionKind {
    /// Shape kind a selection of this type resolves to
    pub fn shape_kind(self) -> ShapeKind {
        match self {
            SelectionKind::Edge => ShapeKind::Edge,
            SelectionKind::Wire => ShapeKind::Wire,
        }
    }
}

impl fmt::Display for SelectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionKind::Edge => f.write_str("EDGE"),
            SelectionKind::Wire => f.write_str("WIRE"),
        }
    }
}

impl FromStr for SelectionKind {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EDGE" => Ok(SelectionKind::Edge),
            "WIRE" => Ok(SelectionKind::Wire),
            _ => Err(FeatureError::UnknownSelectionKind(s.to_string())),
        }
    }
}

/// Reference to a previously created entity by type and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub kind: SelectionKind,
    pub name: String,
}

impl Selection {
    pub fn new(kind: SelectionKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Select a sketch line
    pub fn edge(name: impl Into<String>) -> Self {
        Self::new(SelectionKind::Edge, name)
    }

    /// Select the wire produced by a feature
    pub fn wire(name: impl Into<String>) -> Self {
        Self::new(SelectionKind::Wire, name)
    }

    /// Build a selection from a type string such as `"EDGE"`
    pub fn parse(kind: &str, name: impl Into<String>) -> FeatureResult<Self> {
        Ok(Self::new(kind.parse()?, name))
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.name)
    }
}

/// A named feature that produces a shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Feature {
    /// Join edges into a single wire
    Wire {
        /// Unique identifier
        id: Uuid,
        /// Name of the feature
        name: String,
        /// Edges in traversal order
        edges: Vec<Selection>,
        /// Whether the wire must be closed
        closed: bool,
    },

    /// Translate selected shapes by a fixed offset
    Translation {
        /// Unique identifier
        id: Uuid,
        /// Name of the feature
        name: String,
        /// Objects to move
        objects: Vec<Selection>,
        /// Offset vector
        offset: DVec3,
    },
}

impl Feature {
    /// Get the unique ID of this feature
    pub fn id(&self) -> Uuid {
        match self {
            Feature::Wire { id, .. } => *id,
            Feature::Translation { id, .. } => *id,
        }
    }

    /// Get the name of this feature
    pub fn name(&self) -> &str {
        match self {
            Feature::Wire { name, .. } => name,
            Feature::Translation { name, .. } => name,
        }
    }

    /// Rename the feature
    pub fn set_name(&mut self, value: impl Into<String>) {
        match self {
            Feature::Wire { name, .. } => *name = value.into(),
            Feature::Translation { name, .. } => *name = value.into(),
        }
    }

    /// Get the type name of this feature
    pub fn type_name(&self) -> &'static str {
        match self {
            Feature::Wire { .. } => "Wire",
            Feature::Translation { .. } => "Translation",
        }
    }

    /// Create a new wire feature
    pub fn wire(name: impl Into<String>, edges: Vec<Selection>, closed: bool) -> Self {
        Feature::Wire {
            id: Uuid::new_v4(),
            name: name.into(),
            edges,
            closed,
        }
    }

    /// Create a new translation feature
    pub fn translation(name: impl Into<String>, objects: Vec<Selection>, offset: DVec3) -> Self {
        Feature::Translation {
            id: Uuid::new_v4(),
            name: name.into(),
            objects,
            offset,
        }
    }

    /// Execute this feature to produce a shape
    ///
    /// `resolve` maps each input selection to an already built shape.
    pub fn execute(
        &self,
        kernel: &dyn CadKernel,
        resolve: &dyn Fn(&Selection) -> FeatureResult<Shape>,
    ) -> FeatureResult<Shape> {
        match self {
            Feature::Wire { edges, closed, .. } => {
                if let Some(sel) = edges.iter().find(|s| s.kind != SelectionKind::Edge) {
                    return Err(FeatureError::InvalidFeature(format!(
                        "Wire expects edge selections, got {}",
                        sel
                    )));
                }

                let shapes = edges.iter().map(resolve).collect::<FeatureResult<Vec<_>>>()?;
                kernel.make_wire(&shapes, *closed).map_err(|e| e.into())
            }

            Feature::Translation {
                objects, offset, ..
            } => {
                // One result shape per feature; several objects are not combined
                let [object] = objects.as_slice() else {
                    return Err(FeatureError::InvalidFeature(format!(
                        "Translation expects exactly one object, got {}",
                        objects.len()
                    )));
                };

                let shape = resolve(object)?;
                kernel.translate(&shape, *offset).map_err(|e| e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{CadError, MemoryKernel};

    #[test]
    fn test_feature_rename() {
        let mut feature = Feature::wire("Wire_1", vec![Selection::edge("SketchLine_1")], true);
        let id = feature.id();
        feature.set_name("Airfoil_Wire");
        assert_eq!(feature.name(), "Airfoil_Wire");
        assert_eq!(feature.id(), id);
        assert_eq!(feature.type_name(), "Wire");
    }

    #[test]
    fn test_selection_parse() {
        let sel = Selection::parse("EDGE", "SketchLine_1").unwrap();
        assert_eq!(sel, Selection::edge("SketchLine_1"));
        assert_eq!(sel.to_string(), "EDGE 'SketchLine_1'");
        assert!(matches!(
            Selection::parse("VERTEX", "x"),
            Err(FeatureError::UnknownSelectionKind(_))
        ));
    }

    #[test]
    fn test_wire_rejects_wire_selection() {
        let kernel = MemoryKernel::new();
        let feature = Feature::wire("W", vec![Selection::wire("Other")], false);
        let resolve = |_: &Selection| -> FeatureResult<Shape> { unreachable!() };
        assert!(matches!(
            feature.execute(&kernel, &resolve),
            Err(FeatureError::InvalidFeature(_))
        ));
    }

    #[test]
    fn test_translation_requires_single_object() {
        let kernel = MemoryKernel::new();
        let feature = Feature::translation("T", Vec::new(), DVec3::X);
        let resolve = |_: &Selection| -> FeatureResult<Shape> { unreachable!() };
        assert!(matches!(
            feature.execute(&kernel, &resolve),
            Err(FeatureError::InvalidFeature(_))
        ));
    }

    #[test]
    fn test_wire_propagates_kernel_error() {
        let kernel = MemoryKernel::new();
        let a = kernel.make_edge(DVec3::ZERO, DVec3::X).unwrap();
        let b = kernel.make_edge(DVec3::Y, DVec3::ONE).unwrap();
        let feature = Feature::wire(
            "W",
            vec![Selection::edge("a"), Selection::edge("b")],
            false,
        );
        let resolve = |sel: &Selection| -> FeatureResult<Shape> {
            Ok(if sel.name == "a" { a.clone() } else { b.clone() })
        };
        assert!(matches!(
            feature.execute(&kernel, &resolve),
            Err(FeatureError::CadError(CadError::InvalidProfile(_)))
        ));
    }
}
