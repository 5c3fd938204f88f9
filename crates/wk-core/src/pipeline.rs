//! CSV profile import pipeline
//!
//! Runs the whole import inside one document transaction:
//!
//! 1. add a part and a named sketch on the configured plane
//! 2. load points from the CSV and close the loop
//! 3. add one sketch line per consecutive point pair, then build them
//! 4. join the lines into a closed, named wire, then build it
//! 5. translate the wire into a new named shape, then build it
//! 6. commit
//!
//! Any error drops the transaction, which rolls the document back.

use glam::DVec2;
use uuid::Uuid;
use wk_cad::{
    CadKernel, Document, DocumentError, FeatureHandle, LineHandle, SketchError, SketchHandle,
    SketchPlane, Transaction,
};

use crate::config::{ConfigError, ImportConfig};
use crate::import::{ImportError, PointLoad, SkippedRow, load_points};
use crate::profile::{ProfileError, close_profile};

/// Errors raised by the import pipeline
#[derive(Debug, Clone, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Sketch(#[from] SketchError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// What an import created
#[derive(Debug, Clone)]
pub struct ImportReport {
    /// Part holding the geometry
    pub part: Uuid,
    /// Points after closing the loop
    pub points: Vec<DVec2>,
    /// Rows skipped by the loader
    pub skipped: Vec<SkippedRow>,
    /// Sketch lines in creation order
    pub segments: Vec<LineHandle>,
    /// The closed wire
    pub wire: FeatureHandle,
    /// The translated wire
    pub translation: FeatureHandle,
}

/// Load the configured CSV and build its profile into `document`
pub fn run_import(
    config: &ImportConfig,
    kernel: &dyn CadKernel,
    document: &mut Document,
) -> Result<ImportReport, PipelineError> {
    let options = config.import_options()?;
    let plane = config.sketch_plane()?;

    let mut tx = document.begin(kernel);
    let (part, sketch) = open_sketch(&mut tx, config, plane)?;

    let load = load_points(&config.csv_path, &options)?;
    let report = build_in(&mut tx, part, sketch, config, load)?;

    tx.commit()?;
    tracing::info!(
        "Imported {} segments from {} as '{}' and '{}'",
        report.segments.len(),
        config.csv_path.display(),
        report.wire.name,
        report.translation.name
    );
    Ok(report)
}

/// Build already loaded points into `document`
///
/// Same steps as [`run_import`] without reading the CSV.
pub fn build_profile(
    config: &ImportConfig,
    load: PointLoad,
    kernel: &dyn CadKernel,
    document: &mut Document,
) -> Result<ImportReport, PipelineError> {
    let plane = config.sketch_plane()?;

    let mut tx = document.begin(kernel);
    let (part, sketch) = open_sketch(&mut tx, config, plane)?;
    let report = build_in(&mut tx, part, sketch, config, load)?;
    tx.commit()?;
    Ok(report)
}

/// Add the part and the named sketch the profile is drawn on
fn open_sketch(
    tx: &mut Transaction<'_>,
    config: &ImportConfig,
    plane: SketchPlane,
) -> Result<(Uuid, SketchHandle), PipelineError> {
    let part = tx.add_part();
    if let Some(name) = &config.part_name {
        tx.set_part_name(part, name)?;
    }
    let sketch = tx.add_sketch(part, plane)?;
    tx.set_sketch_name(&sketch, &config.sketch_name)?;
    Ok((part, sketch))
}

fn build_in(
    tx: &mut Transaction<'_>,
    part: Uuid,
    sketch: SketchHandle,
    config: &ImportConfig,
    load: PointLoad,
) -> Result<ImportReport, PipelineError> {
    let PointLoad { points, skipped } = load;
    let points = close_profile(points)?;

    let segments = points
        .windows(2)
        .map(|pair| tx.add_line(&sketch, pair[0], pair[1]))
        .collect::<Result<Vec<_>, _>>()?;
    tx.execute()?;
    tracing::debug!("Created {} segments", segments.len());

    let selections = segments.iter().map(LineHandle::selection).collect();
    let mut wire = tx.add_wire(part, selections, true)?;
    tx.set_feature_name(&mut wire, &config.wire_name)?;
    tx.execute()?;

    let mut translation = tx.add_translation(part, vec![wire.wire_selection()], config.offset())?;
    tx.set_feature_name(&mut translation, &config.translation_name)?;
    tx.execute()?;

    Ok(ImportReport {
        part,
        points,
        skipped,
        segments,
        wire,
        translation,
    })
}
