//! 2D Sketches
//!
//! A sketch is a named set of line entities drawn on a construction plane.
//! Coordinates are stored in plane-local 2D space and mapped to 3D when the
//! kernel builds edges.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Sketch-related errors
#[derive(Debug, Clone, Error)]
pub enum SketchError {
    #[error("Unknown sketch plane: {0} (expected XOY, XOZ or YOZ)")]
    UnknownPlane(String),

    #[error("Line not found: {0}")]
    LineNotFound(Uuid),
}

/// A construction plane for a sketch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SketchPlane {
    /// Plane name (e.g. "XOY")
    pub name: String,
    /// Origin of the plane in world space
    pub origin: DVec3,
    /// Local X direction
    pub x_axis: DVec3,
    /// Local Y direction
    pub y_axis: DVec3,
    /// Plane normal
    pub normal: DVec3,
}

impl SketchPlane {
    fn new(name: &str, x_axis: DVec3, y_axis: DVec3) -> Self {
        Self {
            name: name.to_string(),
            origin: DVec3::ZERO,
            x_axis,
            y_axis,
            normal: x_axis.cross(y_axis),
        }
    }

    /// The XY plane at the origin
    pub fn xoy() -> Self {
        Self::new("XOY", DVec3::X, DVec3::Y)
    }

    /// The XZ plane at the origin
    pub fn xoz() -> Self {
        Self::new("XOZ", DVec3::X, DVec3::Z)
    }

    /// The YZ plane at the origin
    pub fn yoz() -> Self {
        Self::new("YOZ", DVec3::Y, DVec3::Z)
    }

    /// Look up one of the default planes by name (case-insensitive)
    pub fn default_plane(name: &str) -> Result<Self, SketchError> {
        match name.to_ascii_uppercase().as_str() {
            "XOY" => Ok(Self::xoy()),
            "XOZ" => Ok(Self::xoz()),
            "YOZ" => Ok(Self::yoz()),
            _ => Err(SketchError::UnknownPlane(name.to_string())),
        }
    }

    /// Map a plane-local point to world space
    pub fn to_world(&self, point: DVec2) -> DVec3 {
        self.origin + self.x_axis * point.x + self.y_axis * point.y
    }
}

impl Default for SketchPlane {
    fn default() -> Self {
        Self::xoy()
    }
}

/// A straight line in a sketch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SketchLine {
    /// Unique identifier
    pub id: Uuid,
    /// Feature name assigned by the document
    pub name: String,
    /// Start point (plane-local)
    pub start: DVec2,
    /// End point (plane-local)
    pub end: DVec2,
}

/// A 2D sketch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sketch {
    /// Unique identifier
    pub id: Uuid,
    /// Name of the sketch
    pub name: String,
    /// Construction plane
    pub plane: SketchPlane,
    /// Lines in creation order
    lines: Vec<SketchLine>,
}

impl Sketch {
    /// Create an empty sketch on a plane
    pub fn new(name: impl Into<String>, plane: SketchPlane) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            plane,
            lines: Vec::new(),
        }
    }

    /// Add a line and return its ID
    pub fn add_line(&mut self, name: impl Into<String>, start: DVec2, end: DVec2) -> Uuid {
        let line = SketchLine {
            id: Uuid::new_v4(),
            name: name.into(),
            start,
            end,
        };
        let id = line.id;
        self.lines.push(line);
        id
    }

    /// Get a line by ID
    pub fn get_line(&self, id: Uuid) -> Result<&SketchLine, SketchError> {
        self.lines
            .iter()
            .find(|l| l.id == id)
            .ok_or(SketchError::LineNotFound(id))
    }

    /// Find a line by its feature name
    pub fn find_line(&self, name: &str) -> Option<&SketchLine> {
        self.lines.iter().find(|l| l.name == name)
    }

    /// All lines in creation order
    pub fn lines(&self) -> &[SketchLine] {
        &self.lines
    }

    /// World-space endpoints of a line
    pub fn line_endpoints(&self, line: &SketchLine) -> (DVec3, DVec3) {
        (self.plane.to_world(line.start), self.plane.to_world(line.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_planes() {
        assert_eq!(SketchPlane::default_plane("XOY").unwrap().normal, DVec3::Z);
        assert_eq!(SketchPlane::default_plane("xoz").unwrap().normal, -DVec3::Y);
        assert_eq!(SketchPlane::default_plane("YOZ").unwrap().normal, DVec3::X);
        assert!(matches!(
            SketchPlane::default_plane("ABC"),
            Err(SketchError::UnknownPlane(_))
        ));
    }

    #[test]
    fn test_to_world() {
        let p = DVec2::new(2.0, 3.0);
        assert_eq!(SketchPlane::xoy().to_world(p), DVec3::new(2.0, 3.0, 0.0));
        assert_eq!(SketchPlane::xoz().to_world(p), DVec3::new(2.0, 0.0, 3.0));
        assert_eq!(SketchPlane::yoz().to_world(p), DVec3::new(0.0, 2.0, 3.0));
    }

    #[test]
    fn test_lines() {
        let mut sketch = Sketch::new("Sketch_1", SketchPlane::xoy());
        let id = sketch.add_line("SketchLine_1", DVec2::ZERO, DVec2::X);
        sketch.add_line("SketchLine_2", DVec2::X, DVec2::ONE);

        assert_eq!(sketch.lines().len(), 2);
        assert_eq!(sketch.get_line(id).unwrap().name, "SketchLine_1");
        assert_eq!(sketch.find_line("SketchLine_2").unwrap().end, DVec2::ONE);
        assert!(sketch.find_line("SketchLine_3").is_none());
        assert!(sketch.get_line(Uuid::new_v4()).is_err());
    }
}
