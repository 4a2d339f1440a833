// error taxonomy for the generation core
// validation errors fail fast before any mutation and propagate to the caller

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenError>;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("{typology} expects {expected} volumes, got {got}")]
    Cardinality {
        typology: &'static str,
        expected: &'static str,
        got: usize,
    },

    #[error("invalid numeric input for {what}: {value}")]
    MalformedInput { what: &'static str, value: f32 },

    #[error("grid applier needs either a grid or a step parameter")]
    MissingGridSpec,

    #[error("module must be connected to a volume before tiling")]
    UnconnectedModule,

    #[error("bounding box must have 4 elements, got {got}")]
    BadBoundingBox { got: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
