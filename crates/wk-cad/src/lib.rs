//! CAD Kernel Abstraction and Document Model
//!
//! This crate provides:
//! - Abstract CAD kernel traits for edge, wire and transform operations
//! - 2D sketches on named construction planes
//! - Named features (wire assembly, translation) resolved through selections
//! - Transactional documents with commit/rollback semantics

pub mod document;
pub mod feature;
pub mod history;
pub mod kernel;
pub mod sketch;

// Re-exports for convenience
pub use document::{
    Document, DocumentError, DocumentResult, FeatureHandle, LineHandle, Part, SketchHandle,
    Transaction,
};
pub use feature::{Feature, FeatureError, FeatureResult, Selection, SelectionKind};
pub use history::{FeatureHistory, HistoryEntry};
pub use kernel::{
    CadError, CadKernel, CadResult, EdgeId, EdgeInfo, LINEAR_TOLERANCE, MemoryKernel, NullKernel,
    Shape, ShapeKind, default_kernel,
};
pub use sketch::{Sketch, SketchError, SketchLine, SketchPlane};
