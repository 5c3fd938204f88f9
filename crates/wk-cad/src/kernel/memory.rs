//! In-memory CAD Kernel Backend
//!
//! Stores polyline geometry directly as endpoint pairs. Enough for
//! edges, wires and rigid transforms without a B-Rep library.

use std::collections::HashMap;

use glam::DVec3;
use parking_lot::Mutex;
use uuid::Uuid;

use super::traits::ensure_chain;
use super::{CadError, CadKernel, CadResult, EdgeId, EdgeInfo, LINEAR_TOLERANCE, Shape, ShapeKind};

/// Geometry held for one shape
#[derive(Debug, Clone)]
enum ShapeData {
    Edge { start: DVec3, end: DVec3 },
    Wire {
        edges: Vec<(DVec3, DVec3)>,
        closed: bool,
    },
}

impl ShapeData {
    fn kind(&self) -> ShapeKind {
        match self {
            ShapeData::Edge { .. } => ShapeKind::Edge,
            ShapeData::Wire { .. } => ShapeKind::Wire,
        }
    }

    fn edges(&self) -> Vec<(DVec3, DVec3)> {
        match self {
            ShapeData::Edge { start, end } => vec![(*start, *end)],
            ShapeData::Wire { edges, .. } => edges.clone(),
        }
    }

    fn translated(&self, offset: DVec3) -> Self {
        match self {
            ShapeData::Edge { start, end } => ShapeData::Edge {
                start: *start + offset,
                end: *end + offset,
            },
            ShapeData::Wire { edges, closed } => ShapeData::Wire {
                edges: edges
                    .iter()
                    .map(|(s, e)| (*s + offset, *e + offset))
                    .collect(),
                closed: *closed,
            },
        }
    }
}

/// Pure Rust kernel that keeps shapes in memory
#[derive(Debug, Default)]
pub struct MemoryKernel {
    /// Storage for shape data (keyed by UUID)
    shapes: Mutex<HashMap<Uuid, ShapeData>>,
}

impl MemoryKernel {
    /// Create a new in-memory kernel
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of shapes currently stored
    pub fn shape_count(&self) -> usize {
        self.shapes.lock().len()
    }

    /// Store shape data and return a Shape reference
    fn store(&self, data: ShapeData) -> Shape {
        let id = Uuid::new_v4();
        let kind = data.kind();
        self.shapes.lock().insert(id, data);
        Shape::new(id, kind).with_kernel_data()
    }

    /// Get a copy of stored shape data
    fn get(&self, shape: &Shape) -> CadResult<ShapeData> {
        self.shapes
            .lock()
            .get(&shape.id)
            .cloned()
            .ok_or(CadError::ShapeNotFound(shape.id))
    }
}

impl CadKernel for MemoryKernel {
    fn name(&self) -> &str {
        "memory"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn make_edge(&self, start: DVec3, end: DVec3) -> CadResult<Shape> {
        if start.distance(end) <= LINEAR_TOLERANCE {
            return Err(CadError::DegenerateGeometry(format!(
                "Edge from {} to {} has zero length",
                start, end
            )));
        }

        Ok(self.store(ShapeData::Edge { start, end }))
    }

    fn make_wire(&self, edges: &[Shape], closed: bool) -> CadResult<Shape> {
        let mut chain = Vec::with_capacity(edges.len());
        for shape in edges {
            match self.get(shape)? {
                ShapeData::Edge { start, end } => chain.push((start, end)),
                ShapeData::Wire { .. } => {
                    return Err(CadError::InvalidProfile(format!(
                        "Shape {} is a wire, expected an edge",
                        shape.id
                    )));
                }
            }
        }

        ensure_chain(&chain, closed)?;

        Ok(self.store(ShapeData::Wire {
            edges: chain,
            closed,
        }))
    }

    fn translate(&self, shape: &Shape, offset: DVec3) -> CadResult<Shape> {
        let data = self.get(shape)?;
        Ok(self.store(data.translated(offset)))
    }

    fn get_edges(&self, shape: &Shape) -> CadResult<Vec<EdgeInfo>> {
        let data = self.get(shape)?;
        Ok(data
            .edges()
            .into_iter()
            .enumerate()
            .map(|(i, (start, end))| EdgeInfo::new(EdgeId::new(shape.id, i as u32), start, end))
            .collect())
    }

    fn get_vertices(&self, shape: &Shape) -> CadResult<Vec<DVec3>> {
        let data = self.get(shape)?;
        let edges = data.edges();
        let mut vertices: Vec<DVec3> = edges.iter().map(|(start, _)| *start).collect();

        let closed = matches!(data, ShapeData::Wire { closed: true, .. });
        if !closed && let Some((_, end)) = edges.last() {
            vertices.push(*end);
        }

        Ok(vertices)
    }

    fn release(&self, shape: &Shape) {
        self.shapes.lock().remove(&shape.id);
    }
}
