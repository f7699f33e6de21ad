//! Scene error types.

use thiserror::Error;

/// Errors that can occur while building or loading a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("OBJ load error: {0}")]
    Load(#[from] tobj::LoadError),

    #[error("No geometry found in {0}")]
    NoGeometry(String),

    #[error("Invalid material index {index} (scene has {count} materials)")]
    InvalidMaterial { index: usize, count: usize },
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;
