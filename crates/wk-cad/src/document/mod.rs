//! Documents and Transactions
//!
//! A [`Document`] owns parts, each with its own [`FeatureHistory`]. All
//! modifications go through a [`Transaction`], which borrows the document
//! exclusively. A transaction that is dropped without [`Transaction::commit`]
//! restores the document to its state at [`Document::begin`] and releases
//! any kernel shapes created in between.

use std::collections::{HashMap, HashSet};

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::feature::{Feature, FeatureError, Selection};
use crate::history::{BuildSummary, FeatureHistory};
use crate::kernel::{CadKernel, Shape};
use crate::sketch::{Sketch, SketchError, SketchPlane};

/// Document-related errors
#[derive(Debug, Clone, Error)]
pub enum DocumentError {
    #[error("Part not found: {0}")]
    PartNotFound(Uuid),

    #[error("Sketch not found: {0}")]
    SketchNotFound(Uuid),

    #[error("Feature not found: {0}")]
    FeatureNotFound(Uuid),

    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error(transparent)]
    Sketch(#[from] SketchError),
}

/// Result type for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// A part: one independent feature history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    /// Unique identifier
    pub id: Uuid,
    /// Name of the part
    pub name: String,
    /// Sketches and features of the part
    pub history: FeatureHistory,
}

impl Part {
    fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            history: FeatureHistory::new(),
        }
    }
}

/// Reference to a sketch inside a part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SketchHandle {
    pub part: Uuid,
    pub sketch: Uuid,
}

/// Reference to a sketch line, carrying its generated feature name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineHandle {
    pub id: Uuid,
    pub name: String,
}

impl LineHandle {
    /// Edge selection for this line
    pub fn selection(&self) -> Selection {
        Selection::edge(&self.name)
    }
}

/// Reference to a feature, carrying its current name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureHandle {
    pub part: Uuid,
    pub id: Uuid,
    pub name: String,
}

impl FeatureHandle {
    /// Wire selection for the shape this feature produces
    pub fn wire_selection(&self) -> Selection {
        Selection::wire(&self.name)
    }
}

/// The root document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Parts in creation order
    parts: Vec<Part>,
    /// Next index per auto-generated name prefix
    name_counters: HashMap<String, u32>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all parts
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Get a part by ID
    pub fn part(&self, id: Uuid) -> Option<&Part> {
        self.parts.iter().find(|p| p.id == id)
    }

    /// Get a part by name
    pub fn part_by_name(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.name == name)
    }

    /// Get a feature through its handle
    pub fn feature(&self, handle: &FeatureHandle) -> Option<&Feature> {
        self.part(handle.part)?.history.get_by_id(handle.id)
    }

    /// Shape built for a feature
    pub fn feature_shape(&self, handle: &FeatureHandle) -> Option<&Shape> {
        self.part(handle.part)?.history.feature_shape(handle.id)
    }

    /// Edge shape built for a sketch line
    pub fn line_shape(&self, part: Uuid, line: &LineHandle) -> Option<&Shape> {
        self.part(part)?.history.line_shape(line.id)
    }

    /// Open a transaction on this document
    pub fn begin<'a>(&'a mut self, kernel: &'a dyn CadKernel) -> Transaction<'a> {
        tracing::debug!("Transaction started (kernel: {})", kernel.name());
        let snapshot = self.clone();
        Transaction {
            document: self,
            kernel,
            snapshot: Some(snapshot),
        }
    }

    /// Rebuild all kernel shapes, e.g. after loading from disk
    ///
    /// Existing shapes are released on `kernel`; pass the kernel that built
    /// them. A loaded document holds no shapes yet.
    pub fn rebuild(&mut self, kernel: &dyn CadKernel) -> DocumentResult<BuildSummary> {
        let mut total = BuildSummary::default();
        for part in &mut self.parts {
            let summary = part.history.rebuild(kernel)?;
            total.edges += summary.edges;
            total.features += summary.features;
        }
        Ok(total)
    }

    fn part_mut(&mut self, id: Uuid) -> DocumentResult<&mut Part> {
        self.parts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(DocumentError::PartNotFound(id))
    }

    fn sketch_mut(&mut self, handle: &SketchHandle) -> DocumentResult<&mut Sketch> {
        self.part_mut(handle.part)?
            .history
            .get_sketch_mut(handle.sketch)
            .ok_or(DocumentError::SketchNotFound(handle.sketch))
    }

    fn next_name(&mut self, prefix: &str) -> String {
        let counter = self.name_counters.entry(prefix.to_string()).or_insert(0);
        *counter += 1;
        format!("{}_{}", prefix, counter)
    }

    fn shape_ids(&self) -> HashSet<Uuid> {
        self.parts
            .iter()
            .flat_map(|p| p.history.shapes())
            .map(|s| s.id)
            .collect()
    }
}

/// An open unit of work on a document
///
/// Construction calls stage entities; [`Transaction::execute`] builds them
/// through the kernel; [`Transaction::commit`] ends the transaction.
pub struct Transaction<'a> {
    document: &'a mut Document,
    kernel: &'a dyn CadKernel,
    /// State at begin; `None` once committed
    snapshot: Option<Document>,
}

impl Transaction<'_> {
    /// Read access to the document being modified
    pub fn document(&self) -> &Document {
        &*self.document
    }

    /// Add an empty part with a generated name
    pub fn add_part(&mut self) -> Uuid {
        let name = self.document.next_name("Part");
        let part = Part::new(name);
        let id = part.id;
        self.document.parts.push(part);
        id
    }

    /// Rename a part
    pub fn set_part_name(&mut self, part: Uuid, name: impl Into<String>) -> DocumentResult<()> {
        self.document.part_mut(part)?.name = name.into();
        Ok(())
    }

    /// Add an empty sketch on a plane
    pub fn add_sketch(&mut self, part: Uuid, plane: SketchPlane) -> DocumentResult<SketchHandle> {
        // Fail before consuming a name
        self.document.part_mut(part)?;
        let name = self.document.next_name("Sketch");
        let sketch = Sketch::new(name, plane);
        let id = self.document.part_mut(part)?.history.add_sketch(sketch);
        Ok(SketchHandle { part, sketch: id })
    }

    /// Rename a sketch
    pub fn set_sketch_name(
        &mut self,
        sketch: &SketchHandle,
        name: impl Into<String>,
    ) -> DocumentResult<()> {
        self.document.sketch_mut(sketch)?.name = name.into();
        Ok(())
    }

    /// Add a line to a sketch from explicit coordinates
    pub fn add_line(
        &mut self,
        sketch: &SketchHandle,
        start: DVec2,
        end: DVec2,
    ) -> DocumentResult<LineHandle> {
        self.document.sketch_mut(sketch)?;
        let name = self.document.next_name("SketchLine");
        let id = self
            .document
            .sketch_mut(sketch)?
            .add_line(name.clone(), start, end);
        Ok(LineHandle { id, name })
    }

    /// Add a wire feature joining the selected edges in order
    pub fn add_wire(
        &mut self,
        part: Uuid,
        edges: Vec<Selection>,
        closed: bool,
    ) -> DocumentResult<FeatureHandle> {
        self.add_feature(part, "Wire", |name| Feature::wire(name, edges, closed))
    }

    /// Add a translation feature moving the selected objects by `offset`
    pub fn add_translation(
        &mut self,
        part: Uuid,
        objects: Vec<Selection>,
        offset: DVec3,
    ) -> DocumentResult<FeatureHandle> {
        self.add_feature(part, "Translation", |name| {
            Feature::translation(name, objects, offset)
        })
    }

    fn add_feature(
        &mut self,
        part: Uuid,
        prefix: &str,
        make: impl FnOnce(String) -> Feature,
    ) -> DocumentResult<FeatureHandle> {
        self.document.part_mut(part)?;
        let name = self.document.next_name(prefix);
        let feature = make(name.clone());
        let id = feature.id();
        self.document.part_mut(part)?.history.add_feature(feature);
        Ok(FeatureHandle { part, id, name })
    }

    /// Rename a feature; the handle is updated to the new name
    pub fn set_feature_name(
        &mut self,
        handle: &mut FeatureHandle,
        name: impl Into<String>,
    ) -> DocumentResult<()> {
        let name = name.into();
        let feature = self
            .document
            .part_mut(handle.part)?
            .history
            .get_by_id_mut(handle.id)
            .ok_or(DocumentError::FeatureNotFound(handle.id))?;
        feature.set_name(name.clone());
        handle.name = name;
        Ok(())
    }

    /// Build everything staged so far
    pub fn execute(&mut self) -> DocumentResult<BuildSummary> {
        let mut total = BuildSummary::default();
        for part in &mut self.document.parts {
            let summary = part.history.build_pending(self.kernel)?;
            total.edges += summary.edges;
            total.features += summary.features;
        }
        tracing::debug!(
            "Executed transaction step: {} edges, {} features",
            total.edges,
            total.features
        );
        Ok(total)
    }

    /// Build any remaining staged entities and end the transaction
    pub fn commit(mut self) -> DocumentResult<()> {
        self.execute()?;
        self.snapshot = None;
        tracing::info!(
            "Transaction committed ({} parts)",
            self.document.parts.len()
        );
        Ok(())
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        let Some(snapshot) = self.snapshot.take() else {
            return;
        };

        let keep = snapshot.shape_ids();
        for part in &self.document.parts {
            for shape in part.history.shapes() {
                if !keep.contains(&shape.id) {
                    self.kernel.release(shape);
                }
            }
        }

        *self.document = snapshot;
        tracing::warn!("Transaction aborted, document rolled back");
    }
}
