//! CAD Kernel trait definitions
//!
//! These traits define the interface that all CAD kernels must implement.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Distance below which two points are treated as coincident by the kernels
pub const LINEAR_TOLERANCE: f64 = 1e-7;

/// Unique identifier for an edge within a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId {
    /// ID of the shape this edge belongs to
    pub shape_id: Uuid,
    /// Index of the edge within the shape
    pub index: u32,
}

impl EdgeId {
    /// Create a new edge ID
    pub fn new(shape_id: Uuid, index: u32) -> Self {
        Self { shape_id, index }
    }
}

/// Information about an edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeInfo {
    /// Unique identifier for this edge
    pub id: EdgeId,
    /// Start point of the edge
    pub start: DVec3,
    /// End point of the edge
    pub end: DVec3,
    /// Midpoint of the edge
    pub midpoint: DVec3,
    /// Length of the edge
    pub length: f64,
}

impl EdgeInfo {
    /// Create a new edge info
    pub fn new(id: EdgeId, start: DVec3, end: DVec3) -> Self {
        let midpoint = (start + end) * 0.5;
        let length = (end - start).length();
        Self {
            id,
            start,
            end,
            midpoint,
            length,
        }
    }
}

/// Error type for CAD kernel operations
#[derive(Debug, Clone, Error)]
pub enum CadError {
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Shape not found: {0}")]
    ShapeNotFound(Uuid),

    #[error("Kernel not available: {0}")]
    KernelNotAvailable(String),
}

/// Result type for CAD operations
pub type CadResult<T> = Result<T, CadError>;

/// Topological kind of a kernel shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    /// A single straight edge
    Edge,
    /// A connected chain of edges
    Wire,
}

/// Handle to geometry stored inside a kernel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    /// Unique identifier
    pub id: Uuid,
    /// Topological kind
    pub kind: ShapeKind,
    /// Internal marker for kernel data (actual data stored in kernel)
    #[serde(skip)]
    has_kernel_data: bool,
}

impl Shape {
    /// Create a new shape handle with the given ID
    pub fn new(id: Uuid, kind: ShapeKind) -> Self {
        Self {
            id,
            kind,
            has_kernel_data: false,
        }
    }

    /// Mark that this shape has kernel data
    pub fn with_kernel_data(mut self) -> Self {
        self.has_kernel_data = true;
        self
    }

    /// Check if this shape has kernel data
    pub fn has_kernel_data(&self) -> bool {
        self.has_kernel_data
    }
}

/// The main CAD kernel trait
///
/// Implementations of this trait own the actual geometry; callers only ever
/// hold [`Shape`] handles.
pub trait CadKernel: Send + Sync {
    /// Get the name of this kernel
    fn name(&self) -> &str;

    /// Check if the kernel is available
    fn is_available(&self) -> bool;

    /// Create a straight edge between two points
    ///
    /// Fails with [`CadError::DegenerateGeometry`] when the points coincide.
    fn make_edge(&self, start: DVec3, end: DVec3) -> CadResult<Shape>;

    /// Join edges into a single wire
    ///
    /// # Arguments
    /// * `edges` - Edge shapes in traversal order
    /// * `closed` - Whether the last edge must end where the first one starts
    fn make_wire(&self, edges: &[Shape], closed: bool) -> CadResult<Shape>;

    /// Translate a shape, producing a new shape
    fn translate(&self, shape: &Shape, offset: DVec3) -> CadResult<Shape>;

    /// Get all edges of a shape in traversal order
    fn get_edges(&self, shape: &Shape) -> CadResult<Vec<EdgeInfo>>;

    /// Get the distinct vertices of a shape in traversal order
    ///
    /// A closed wire of `n` edges has `n` vertices; an open one has `n + 1`.
    fn get_vertices(&self, shape: &Shape) -> CadResult<Vec<DVec3>>;

    /// Drop the kernel data behind a shape handle
    fn release(&self, shape: &Shape);
}

/// Check that consecutive edges share endpoints, and that a closed chain
/// returns to its start
pub(crate) fn ensure_chain(edges: &[(DVec3, DVec3)], closed: bool) -> CadResult<()> {
    if edges.is_empty() {
        return Err(CadError::InvalidProfile(
            "Wire requires at least one edge".into(),
        ));
    }

    for (i, pair) in edges.windows(2).enumerate() {
        let (_, end) = pair[0];
        let (start, _) = pair[1];
        if end.distance(start) > LINEAR_TOLERANCE {
            return Err(CadError::InvalidProfile(format!(
                "Edge {} ends at {} but edge {} starts at {}",
                i,
                end,
                i + 1,
                start
            )));
        }
    }

    if closed {
        let (first_start, _) = edges[0];
        let (_, last_end) = edges[edges.len() - 1];
        if last_end.distance(first_start) > LINEAR_TOLERANCE {
            return Err(CadError::InvalidProfile(format!(
                "Wire is not closed: ends at {} instead of {}",
                last_end, first_start
            )));
        }
    }

    Ok(())
}

/// A null kernel that always returns errors (used when no kernel is available)
#[derive(Debug, Default)]
pub struct NullKernel;

impl CadKernel for NullKernel {
    fn name(&self) -> &str {
        "null"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn make_edge(&self, _start: DVec3, _end: DVec3) -> CadResult<Shape> {
        Err(CadError::KernelNotAvailable(
            "No CAD kernel available".into(),
        ))
    }

    fn make_wire(&self, _edges: &[Shape], _closed: bool) -> CadResult<Shape> {
        Err(CadError::KernelNotAvailable(
            "No CAD kernel available".into(),
        ))
    }

    fn translate(&self, _shape: &Shape, _offset: DVec3) -> CadResult<Shape> {
        Err(CadError::KernelNotAvailable(
            "No CAD kernel available".into(),
        ))
    }

    fn get_edges(&self, _shape: &Shape) -> CadResult<Vec<EdgeInfo>> {
        Err(CadError::KernelNotAvailable(
            "No CAD kernel available".into(),
        ))
    }

    fn get_vertices(&self, _shape: &Shape) -> CadResult<Vec<DVec3>> {
        Err(CadError::KernelNotAvailable(
            "No CAD kernel available".into(),
        ))
    }

    fn release(&self, _shape: &Shape) {}
}

/// Get the default CAD kernel based on available features
pub fn default_kernel() -> Box<dyn CadKernel> {
    #[cfg(feature = "truck")]
    {
        Box::new(super::TruckKernel::new())
    }

    #[cfg(not(feature = "truck"))]
    {
        Box::new(super::MemoryKernel::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_accepts_closed_triangle() {
        let a = DVec3::ZERO;
        let b = DVec3::X;
        let c = DVec3::Y;
        assert!(ensure_chain(&[(a, b), (b, c), (c, a)], true).is_ok());
    }

    #[test]
    fn test_chain_rejects_gap() {
        let edges = [
            (DVec3::ZERO, DVec3::X),
            (DVec3::new(2.0, 0.0, 0.0), DVec3::Y),
        ];
        assert!(matches!(
            ensure_chain(&edges, false),
            Err(CadError::InvalidProfile(_))
        ));
    }

    #[test]
    fn test_chain_rejects_open_loop_when_closed() {
        let edges = [(DVec3::ZERO, DVec3::X), (DVec3::X, DVec3::Y)];
        assert!(ensure_chain(&edges, false).is_ok());
        assert!(ensure_chain(&edges, true).is_err());
    }

    #[test]
    fn test_chain_rejects_empty() {
        assert!(ensure_chain(&[], true).is_err());
    }

    #[test]
    fn test_null_kernel() {
        let kernel = NullKernel;
        assert!(!kernel.is_available());
        assert!(matches!(
            kernel.make_edge(DVec3::ZERO, DVec3::X),
            Err(CadError::KernelNotAvailable(_))
        ));
    }
}
