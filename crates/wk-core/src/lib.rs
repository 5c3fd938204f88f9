//! Wirekit core
//!
//! Turns a headerless two-column CSV of (x, y) points into a closed wire in a
//! [`wk_cad::Document`] and translates it.

pub mod config;
pub mod constants;
pub mod import;
pub mod pipeline;
pub mod profile;
pub mod project;

pub use config::{ConfigError, ImportConfig};
pub use import::{
    ImportError, ImportOptions, PointLoad, SkippedRow, load_points, load_points_from_reader,
};
pub use pipeline::{ImportReport, PipelineError, build_profile, run_import};
pub use profile::{ProfileError, close_profile, is_closed, segment_count};
pub use project::{Project, ProjectError};
