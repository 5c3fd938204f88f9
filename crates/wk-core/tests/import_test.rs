//! End-to-end tests for CSV profile import

use std::io::Write;

use glam::DVec3;
use tempfile::NamedTempFile;
use wk_cad::{CadKernel, Document, MemoryKernel};
use wk_core::{ImportConfig, PipelineError, Project, run_import};

fn write_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write CSV");
    file
}

#[test]
fn test_import_square_with_bad_row() {
    let csv = write_csv("0,0\n2,0\nx,y\n2,2\n0,2\n");
    let kernel = MemoryKernel::new();
    let mut document = Document::new();

    let report = run_import(&ImportConfig::for_csv(csv.path()), &kernel, &mut document).unwrap();

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].line, 3);
    assert_eq!(report.points.len(), 5);
    assert_eq!(report.points.first(), report.points.last());
    assert_eq!(report.segments.len(), 4);

    let part = document.part(report.part).unwrap();
    assert_eq!(part.history.sketches()[0].name, "Airfoil_Sketch");
    assert_eq!(part.history.sketches()[0].lines().len(), 4);

    let wire = document.feature_shape(&report.wire).unwrap();
    let moved = document.feature_shape(&report.translation).unwrap();
    let before = kernel.get_vertices(wire).unwrap();
    let after = kernel.get_vertices(moved).unwrap();

    assert_eq!(before.len(), 4);
    for (a, b) in before.iter().zip(&after) {
        assert_eq!(*b - *a, DVec3::new(10.0, 0.0, 0.0));
    }
}

#[test]
fn test_wire_edges_follow_segments() {
    let csv = write_csv("0,0\n1,0\n1,1\n");
    let kernel = MemoryKernel::new();
    let mut document = Document::new();

    let report = run_import(&ImportConfig::for_csv(csv.path()), &kernel, &mut document).unwrap();

    let wire = document.feature_shape(&report.wire).unwrap();
    let wire_edges = kernel.get_edges(wire).unwrap();
    assert_eq!(wire_edges.len(), report.segments.len());

    for (segment, edge) in report.segments.iter().zip(&wire_edges) {
        let line = document.line_shape(report.part, segment).unwrap();
        let line_edge = &kernel.get_edges(line).unwrap()[0];
        assert_eq!(line_edge.start, edge.start);
        assert_eq!(line_edge.end, edge.end);
    }
}

#[test]
fn test_missing_csv_leaves_document_untouched() {
    let kernel = MemoryKernel::new();
    let mut document = Document::new();
    let config = ImportConfig::for_csv("/nonexistent/profile.csv");

    let result = run_import(&config, &kernel, &mut document);

    assert!(matches!(result, Err(PipelineError::Import(_))));
    assert!(document.parts().is_empty());
}

#[test]
fn test_only_bad_rows_is_empty_profile() {
    let csv = write_csv("a,b\nc,d\n");
    let kernel = MemoryKernel::new();
    let mut document = Document::new();

    let result = run_import(&ImportConfig::for_csv(csv.path()), &kernel, &mut document);

    assert!(matches!(result, Err(PipelineError::Profile(_))));
    assert!(document.parts().is_empty());
}

#[test]
fn test_project_round_trip_rebuilds_wire() {
    let csv = write_csv("0,0\n3,0\n3,1\n0,1\n0,0\n");
    let kernel = MemoryKernel::new();
    let mut project = Project::new("Profile");

    let report = run_import(
        &ImportConfig::for_csv(csv.path()),
        &kernel,
        &mut project.document,
    )
    .unwrap();
    let original = kernel
        .get_vertices(project.document.feature_shape(&report.translation).unwrap())
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profile.ron");
    project.save(&path).unwrap();

    let mut loaded = Project::load(&path).unwrap();
    assert!(loaded.document.feature_shape(&report.translation).is_none());

    let fresh = MemoryKernel::new();
    loaded.rebuild(&fresh).unwrap();
    let rebuilt = fresh
        .get_vertices(loaded.document.feature_shape(&report.translation).unwrap())
        .unwrap();

    assert_eq!(original, rebuilt);
    assert_eq!(
        loaded.document.feature(&report.wire).unwrap().name(),
        "Airfoil_Wire"
    );
}
