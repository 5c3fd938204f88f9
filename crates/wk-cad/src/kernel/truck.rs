//! Truck CAD Kernel Backend
//!
//! Pure Rust B-Rep kernel using the Truck library.
//!
//! Note: edges are created independently, so a wire is rebuilt on shared
//! vertices once the chain has been validated geometrically.

use std::collections::HashMap;

use glam::DVec3;
use parking_lot::Mutex;
use uuid::Uuid;

use truck_modeling::{Edge, Point3, Vector3, Vertex, Wire, builder};

use super::traits::ensure_chain;
use super::{CadError, CadKernel, CadResult, EdgeId, EdgeInfo, LINEAR_TOLERANCE, Shape, ShapeKind};

#[derive(Clone)]
enum TruckShape {
    Edge(Edge),
    Wire { wire: Wire, closed: bool },
}

/// Truck-based CAD kernel
pub struct TruckKernel {
    /// Storage for shape data (keyed by UUID)
    shapes: Mutex<HashMap<Uuid, TruckShape>>,
}

fn to_point(p: DVec3) -> Point3 {
    Point3::new(p.x, p.y, p.z)
}

fn from_point(p: Point3) -> DVec3 {
    DVec3::new(p.x, p.y, p.z)
}

fn endpoints(edge: &Edge) -> (DVec3, DVec3) {
    (from_point(edge.front().point()), from_point(edge.back().point()))
}

impl TruckKernel {
    /// Create a new Truck kernel
    pub fn new() -> Self {
        Self {
            shapes: Mutex::new(HashMap::new()),
        }
    }

    fn store(&self, shape: TruckShape) -> Shape {
        let id = Uuid::new_v4();
        let kind = match shape {
            TruckShape::Edge(_) => ShapeKind::Edge,
            TruckShape::Wire { .. } => ShapeKind::Wire,
        };
        self.shapes.lock().insert(id, shape);
        Shape::new(id, kind).with_kernel_data()
    }

    fn get(&self, shape: &Shape) -> CadResult<TruckShape> {
        self.shapes
            .lock()
            .get(&shape.id)
            .cloned()
            .ok_or(CadError::ShapeNotFound(shape.id))
    }

    /// Build a wire whose consecutive edges share vertices
    fn build_wire(points: &[DVec3], closed: bool) -> Wire {
        let vertices: Vec<Vertex> = points.iter().map(|p| builder::vertex(to_point(*p))).collect();

        let n = vertices.len();
        let count = if closed { n } else { n - 1 };
        let edges: Vec<Edge> = (0..count)
            .map(|i| builder::line(&vertices[i], &vertices[(i + 1) % n]))
            .collect();

        edges.into()
    }
}

impl Default for TruckKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl CadKernel for TruckKernel {
    fn name(&self) -> &str {
        "truck"
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

        let v0 = builder::vertex(to_point(start));
        let v1 = builder::vertex(to_point(end));
        Ok(self.store(TruckShape::Edge(builder::line(&v0, &v1))))
    }

    fn make_wire(&self, edges: &[Shape], closed: bool) -> CadResult<Shape> {
        let mut chain = Vec::with_capacity(edges.len());
        for shape in edges {
            match self.get(shape)? {
                TruckShape::Edge(edge) => chain.push(endpoints(&edge)),
                TruckShape::Wire { .. } => {
                    return Err(CadError::InvalidProfile(format!(
                        "Shape {} is a wire, expected an edge",
                        shape.id
                    )));
                }
            }
        }

        ensure_chain(&chain, closed)?;

        let mut points: Vec<DVec3> = chain.iter().map(|(start, _)| *start).collect();
        if !closed && let Some((_, end)) = chain.last() {
            points.push(*end);
        }

        let wire = Self::build_wire(&points, closed);
        Ok(self.store(TruckShape::Wire { wire, closed }))
    }

    fn translate(&self, shape: &Shape, offset: DVec3) -> CadResult<Shape> {
        let vector = Vector3::new(offset.x, offset.y, offset.z);
        let moved = match self.get(shape)? {
            TruckShape::Edge(edge) => TruckShape::Edge(builder::translated(&edge, vector)),
            TruckShape::Wire { wire, closed } => TruckShape::Wire {
                wire: builder::translated(&wire, vector),
                closed,
            },
        };
        Ok(self.store(moved))
    }

    fn get_edges(&self, shape: &Shape) -> CadResult<Vec<EdgeInfo>> {
        let pairs: Vec<(DVec3, DVec3)> = match self.get(shape)? {
            TruckShape::Edge(edge) => vec![endpoints(&edge)],
            TruckShape::Wire { wire, .. } => wire.edge_iter().map(endpoints).collect(),
        };

        Ok(pairs
            .into_iter()
            .enumerate()
            .map(|(i, (start, end))| EdgeInfo::new(EdgeId::new(shape.id, i as u32), start, end))
            .collect())
    }

    fn get_vertices(&self, shape: &Shape) -> CadResult<Vec<DVec3>> {
        let closed = matches!(self.get(shape)?, TruckShape::Wire { closed: true, .. });
        let edges = self.get_edges(shape)?;

        let mut vertices: Vec<DVec3> = edges.iter().map(|e| e.start).collect();
        if !closed && let Some(last) = edges.last() {
            vertices.push(last.end);
        }
        Ok(vertices)
    }

    fn release(&self, shape: &Shape) {
        self.shapes.lock().remove(&shape.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(kernel: &TruckKernel) -> Vec<Shape> {
        let corners = [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(2.0, 2.0, 0.0),
            DVec3::new(0.0, 2.0, 0.0),
        ];
        (0..4)
            .map(|i| kernel.make_edge(corners[i], corners[(i + 1) % 4]).unwrap())
            .collect()
    }

    #[test]
    fn test_closed_wire_shares_vertices() {
        let kernel = TruckKernel::new();
        let edges = square(&kernel);
        let shape = kernel.make_wire(&edges, true).unwrap();

        let TruckShape::Wire { wire, closed } = kernel.get(&shape).unwrap() else {
            panic!("expected a wire");
        };
        assert!(closed);
        assert!(wire.is_continuous());
        assert!(wire.is_closed());
        assert_eq!(kernel.get_vertices(&shape).unwrap().len(), 4);
    }

    #[test]
    fn test_open_wire() {
        let kernel = TruckKernel::new();
        let edges = square(&kernel);
        let shape = kernel.make_wire(&edges[..2], false).unwrap();

        let vertices = kernel.get_vertices(&shape).unwrap();
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[2], DVec3::new(2.0, 2.0, 0.0));
    }

    #[test]
    fn test_translate_wire() {
        let kernel = TruckKernel::new();
        let edges = square(&kernel);
        let wire = kernel.make_wire(&edges, true).unwrap();
        let moved = kernel.translate(&wire, DVec3::new(10.0, 0.0, 0.0)).unwrap();

        assert_ne!(moved.id, wire.id);
        assert_eq!(moved.kind, ShapeKind::Wire);

        let before = kernel.get_vertices(&wire).unwrap();
        let after = kernel.get_vertices(&moved).unwrap();
        assert_eq!(before.len(), after.len());
        for (a, b) in before.iter().zip(&after) {
            assert_relative_eq!(b.x - a.x, 10.0);
            assert_relative_eq!(b.y, a.y);
            assert_relative_eq!(b.z, a.z);
        }
    }

    #[test]
    fn test_rejects_gaps_and_degenerate_edges() {
        let kernel = TruckKernel::new();
        assert!(matches!(
            kernel.make_edge(DVec3::ONE, DVec3::ONE),
            Err(CadError::DegenerateGeometry(_))
        ));

        let edges = square(&kernel);
        assert!(matches!(
            kernel.make_wire(&[edges[0].clone(), edges[2].clone()], false),
            Err(CadError::InvalidProfile(_))
        ));
    }

    #[test]
    fn test_release() {
        let kernel = TruckKernel::new();
        let edge = kernel.make_edge(DVec3::ZERO, DVec3::X).unwrap();
        kernel.release(&edge);
        assert!(matches!(
            kernel.get_edges(&edge),
            Err(CadError::ShapeNotFound(_))
        ));
    }
}
