//! Lux Core - scene description for the Lux ray tracer.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `Triangle`, `Material`
//! - **OBJ support**: Wavefront OBJ/MTL loading into a `Scene`
//!
//! # Example
//!
//! ```ignore
//! use lux_core::{load_obj, ObjOptions};
//!
//! let scene = load_obj("cornell-box.obj", &ObjOptions::default())?;
//! println!("Loaded {} triangles, light at {:?}",
//!     scene.triangle_count(),
//!     scene.light);
//! ```

pub mod error;
pub mod obj;
pub mod scene;

// Re-export commonly used types
pub use error::{SceneError, SceneResult};
pub use obj::{load_obj, ObjOptions};
pub use scene::{Material, Scene, Triangle};
