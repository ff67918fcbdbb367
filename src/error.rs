//! Error types shared by the mesh builders and the picker.
//!
//! Nothing here is fatal to a host: every variant describes a caller input
//! that can be corrected, and the operation that produced it leaves state
//! untouched.

use thiserror::Error;

use crate::core::picker::SelectionUnit;

/// Mesh construction failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// An arrow parameter is outside its contract range.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f32,
        reason: &'static str,
    },

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },
}

/// Selection state machine failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// The unit does not resolve to any entity in the scene.
    #[error("cannot select {0:?}: it has no members in the scene")]
    NullTarget(SelectionUnit),
}
