//! Global constants for wk-core

/// CSV file read when no path is configured
pub const DEFAULT_CSV_PATH: &str = "path/to/file/Naca0015_150_clean.csv";

/// Default construction plane for the profile sketch
pub const DEFAULT_PLANE: &str = "XOY";

/// Default sketch name
pub const DEFAULT_SKETCH_NAME: &str = "Airfoil_Sketch";

/// Default name of the assembled wire
pub const DEFAULT_WIRE_NAME: &str = "Airfoil_Wire";

/// Default name of the translated wire
pub const DEFAULT_TRANSLATION_NAME: &str = "Translated_Airfoil_Wire";

/// Default translation offset (x, y, z)
pub const DEFAULT_OFFSET: [f64; 3] = [10.0, 0.0, 0.0];

/// Project file format version
pub const PROJECT_VERSION: u32 = 1;
