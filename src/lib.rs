pub mod app;
pub mod camera;
pub mod cli;
pub mod core;
pub mod error;
pub mod math;
pub mod mesh;
pub mod scene;

pub use app::{AppConfig, FrameReport, MarkerApp};
pub use error::{MeshError, SelectionError};
pub use mesh::{ArrowMeshParameters, Mesh};
