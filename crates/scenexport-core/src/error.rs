//! Error types for scenexport

use thiserror::Error;

/// Result type alias using scenexport's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while exporting a scene
#[derive(Error, Debug)]
pub enum Error {
    /// An attribute or index stream with no elements was submitted
    #[error("Accessors can not have a count of 0 ({0})")]
    EmptyAccessor(&'static str),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Entity handle does not exist in the scene
    #[error("Unknown entity {0}")]
    UnknownEntity(u32),

    /// Geometry handle does not exist in the scene
    #[error("Unknown geometry {0}")]
    UnknownGeometry(u32),

    /// Material handle does not exist in the scene
    #[error("Unknown material {0}")]
    UnknownMaterial(u32),

    /// Texture handle does not exist in the scene
    #[error("Unknown texture {0}")]
    UnknownTexture(u32),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Whole-scene or whole-entity export did not complete
    #[error("Export of '{name}' failed: {source}")]
    ExportFailed {
        name: String,
        #[source]
        source: Box<Error>,
    },
}
