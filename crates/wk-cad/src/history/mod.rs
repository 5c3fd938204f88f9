//! Feature History
//!
//! Holds the sketches and the ordered feature list of one part, plus the
//! kernel shapes built from them. Shapes are not serialized; a reloaded
//! history is brought back with [`FeatureHistory::rebuild`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::feature::{Feature, FeatureError, FeatureResult, Selection, SelectionKind};
use crate::kernel::{CadKernel, Shape};
use crate::sketch::Sketch;

/// An entry in the feature history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The feature
    pub feature: Feature,
    /// Shape produced by the feature, once built
    #[serde(skip)]
    pub shape: Option<Shape>,
}

impl HistoryEntry {
    /// Create a new, unbuilt history entry
    pub fn new(feature: Feature) -> Self {
        Self {
            feature,
            shape: None,
        }
    }
}

/// Counts of what a build pass created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Sketch lines turned into edges
    pub edges: usize,
    /// Features executed
    pub features: usize,
}

/// Manages the sketches and features of a part
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureHistory {
    /// Ordered list of features
    entries: Vec<HistoryEntry>,
    /// Sketches in creation order
    sketches: Vec<Sketch>,
    /// Edge shapes built from sketch lines (keyed by line ID)
    #[serde(skip)]
    edges: HashMap<Uuid, Shape>,
}

impl FeatureHistory {
    /// Create a new empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of features
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get a feature by ID
    pub fn get_by_id(&self, id: Uuid) -> Option<&Feature> {
        self.entries
            .iter()
            .find(|e| e.feature.id() == id)
            .map(|e| &e.feature)
    }

    /// Get a mutable feature by ID
    pub fn get_by_id_mut(&mut self, id: Uuid) -> Option<&mut Feature> {
        self.entries
            .iter_mut()
            .find(|e| e.feature.id() == id)
            .map(|e| &mut e.feature)
    }

    /// Add a feature to the history
    pub fn add_feature(&mut self, feature: Feature) {
        self.entries.push(HistoryEntry::new(feature));
    }

    /// Shape built for a feature
    pub fn feature_shape(&self, id: Uuid) -> Option<&Shape> {
        self.entries
            .iter()
            .find(|e| e.feature.id() == id)
            .and_then(|e| e.shape.as_ref())
    }

    /// Edge shape built for a sketch line
    pub fn line_shape(&self, line_id: Uuid) -> Option<&Shape> {
        self.edges.get(&line_id)
    }

    /// Every shape currently held by this history
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.edges
            .values()
            .chain(self.entries.iter().filter_map(|e| e.shape.as_ref()))
    }

    // ============== Sketch Management ==============

    /// Add a sketch
    pub fn add_sketch(&mut self, sketch: Sketch) -> Uuid {
        let id = sketch.id;
        self.sketches.push(sketch);
        id
    }

    /// Get a sketch by ID
    pub fn get_sketch(&self, id: Uuid) -> Option<&Sketch> {
        self.sketches.iter().find(|s| s.id == id)
    }

    /// Get a mutable sketch by ID
    pub fn get_sketch_mut(&mut self, id: Uuid) -> Option<&mut Sketch> {
        self.sketches.iter_mut().find(|s| s.id == id)
    }

    /// Get all sketches
    pub fn sketches(&self) -> &[Sketch] {
        &self.sketches
    }

    // ============== Build ==============

    /// Resolve a selection against built geometry
    ///
    /// Later features shadow earlier ones with the same name.
    pub fn resolve(&self, selection: &Selection) -> FeatureResult<Shape> {
        resolve_in(&self.sketches, &self.edges, &self.entries, selection)
    }

    /// Build every sketch line and feature that has no shape yet
    ///
    /// Stops at the first failure; shapes built before it are kept.
    pub fn build_pending(&mut self, kernel: &dyn CadKernel) -> FeatureResult<BuildSummary> {
        let mut summary = BuildSummary::default();

        for sketch in &self.sketches {
            for line in sketch.lines() {
                if self.edges.contains_key(&line.id) {
                    continue;
                }
                let (start, end) = sketch.line_endpoints(line);
                let shape = kernel.make_edge(start, end)?;
                self.edges.insert(line.id, shape);
                summary.edges += 1;
            }
        }

        for index in 0..self.entries.len() {
            if self.entries[index].shape.is_some() {
                continue;
            }

            let (built, pending) = self.entries.split_at_mut(index);
            let built: &[HistoryEntry] = built;
            let entry = &mut pending[0];
            let resolve =
                |sel: &Selection| resolve_in(&self.sketches, &self.edges, built, sel);

            match entry.feature.execute(kernel, &resolve) {
                Ok(shape) => {
                    tracing::debug!(
                        "Built {} '{}'",
                        entry.feature.type_name(),
                        entry.feature.name()
                    );
                    entry.shape = Some(shape);
                    summary.features += 1;
                }
                Err(e) => {
                    tracing::warn!("Feature {} failed: {}", entry.feature.name(), e);
                    return Err(e);
                }
            }
        }

        Ok(summary)
    }

    /// Drop all shapes and rebuild everything from the sketches and features
    ///
    /// Current shapes are released on `kernel`, so it must be the kernel that
    /// built them. A freshly loaded history has no shapes and can be rebuilt
    /// on any kernel.
    pub fn rebuild(&mut self, kernel: &dyn CadKernel) -> FeatureResult<BuildSummary> {
        for shape in self.edges.values() {
            kernel.release(shape);
        }
        self.edges.clear();

        for entry in &mut self.entries {
            if let Some(shape) = entry.shape.take() {
                kernel.release(&shape);
            }
        }

        self.build_pending(kernel)
    }
}

/// Selection lookup over borrowed parts of a history
fn resolve_in(
    sketches: &[Sketch],
    edges: &HashMap<Uuid, Shape>,
    entries: &[HistoryEntry],
    selection: &Selection,
) -> FeatureResult<Shape> {
    let not_built = || FeatureError::SelectionNotBuilt {
        kind: selection.kind,
        name: selection.name.clone(),
    };

    match selection.kind {
        SelectionKind::Edge => {
            let line = sketches
                .iter()
                .rev()
                .find_map(|s| s.find_line(&selection.name))
                .ok_or_else(|| FeatureError::SelectionNotFound {
                    kind: selection.kind,
                    name: selection.name.clone(),
                })?;
            edges.get(&line.id).cloned().ok_or_else(not_built)
        }
        SelectionKind::Wire => {
            let entry = entries
                .iter()
                .rev()
                .find(|e| e.feature.name() == selection.name)
                .ok_or_else(|| FeatureError::SelectionNotFound {
                    kind: selection.kind,
                    name: selection.name.clone(),
                })?;
            let shape = entry.shape.clone().ok_or_else(not_built)?;
            if shape.kind != selection.kind.shape_kind() {
                return Err(FeatureError::SelectionNotFound {
                    kind: selection.kind,
                    name: selection.name.clone(),
                });
            }
            Ok(shape)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::MemoryKernel;
    use crate::sketch::SketchPlane;
    use glam::{DVec2, DVec3};

    fn triangle_history() -> FeatureHistory {
        let mut history = FeatureHistory::new();
        let mut sketch = Sketch::new("Sketch_1", SketchPlane::xoy());
        sketch.add_line("L1", DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0));
        sketch.add_line("L2", DVec2::new(1.0, 0.0), DVec2::new(1.0, 1.0));
        sketch.add_line("L3", DVec2::new(1.0, 1.0), DVec2::new(0.0, 0.0));
        history.add_sketch(sketch);
        history
    }

    #[test]
    fn test_add_feature() {
        let mut history = FeatureHistory::new();
        let feature = Feature::wire("Wire_1", Vec::new(), true);
        let id = feature.id();

        history.add_feature(feature);

        assert_eq!(history.len(), 1);
        assert!(history.get_by_id(id).is_some());
        assert!(history.feature_shape(id).is_none());
    }

    #[test]
    fn test_build_wire_and_translation() {
        let kernel = MemoryKernel::new();
        let mut history = triangle_history();
        let edges = ["L1", "L2", "L3"].map(Selection::edge).to_vec();
        let wire = Feature::wire("Tri", edges, true);
        let wire_id = wire.id();
        let moved = Feature::translation("Moved", vec![Selection::wire("Tri")], DVec3::Z);
        let moved_id = moved.id();
        history.add_feature(wire);
        history.add_feature(moved);

        let summary = history.build_pending(&kernel).unwrap();
        assert_eq!(summary, BuildSummary { edges: 3, features: 2 });

        let shape = history.feature_shape(moved_id).unwrap();
        let vertices = kernel.get_vertices(shape).unwrap();
        assert_eq!(vertices[0], DVec3::new(0.0, 0.0, 1.0));
        assert!(history.feature_shape(wire_id).is_some());

        // Nothing left to build
        let summary = history.build_pending(&kernel).unwrap();
        assert_eq!(summary, BuildSummary::default());
    }

    #[test]
    fn test_unknown_selection() {
        let kernel = MemoryKernel::new();
        let mut history = triangle_history();
        history.add_feature(Feature::wire("W", vec![Selection::edge("Nope")], false));

        assert!(matches!(
            history.build_pending(&kernel),
            Err(FeatureError::SelectionNotFound { .. })
        ));
    }

    #[test]
    fn test_wire_selection_of_edge_feature_name() {
        let kernel = MemoryKernel::new();
        let mut history = triangle_history();
        history.build_pending(&kernel).unwrap();

        assert!(history.resolve(&Selection::edge("L1")).is_ok());
        assert!(matches!(
            history.resolve(&Selection::wire("L1")),
            Err(FeatureError::SelectionNotFound { .. })
        ));
    }

    #[test]
    fn test_rebuild_releases_old_shapes() {
        let kernel = MemoryKernel::new();
        let mut history = triangle_history();
        history.build_pending(&kernel).unwrap();
        assert_eq!(kernel.shape_count(), 3);

        let summary = history.rebuild(&kernel).unwrap();
        assert_eq!(summary.edges, 3);
        assert_eq!(kernel.shape_count(), 3);
    }
}
