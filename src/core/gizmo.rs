//! Transform gizmo seam.
//!
//! The picker drives a gizmo through [`Gizmo`] and never learns how it is
//! drawn. [`HeadlessGizmo`] records what it was told, which is all the CLI
//! and the tests need.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::picker::SelectionUnit;
use crate::scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformMode {
    #[default]
    Translate,
    Rotate,
}

impl TransformMode {
    pub fn toggled(self) -> Self {
        match self {
            TransformMode::Translate => TransformMode::Rotate,
            TransformMode::Rotate => TransformMode::Translate,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransformMode::Translate => "translate",
            TransformMode::Rotate => "rotate",
        }
    }
}

pub trait Gizmo {
    fn attach(&mut self, unit: SelectionUnit);
    fn detach(&mut self);
    fn set_mode(&mut self, mode: TransformMode);
    fn attached(&self) -> Option<SelectionUnit>;
    fn mode(&self) -> TransformMode;
}

/// Gizmo without a visual; tracks attachment and mode only
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlessGizmo {
    attached: Option<SelectionUnit>,
    mode: TransformMode,
    attach_count: usize,
}

impl HeadlessGizmo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `attach` calls so far
    pub fn attach_count(&self) -> usize {
        self.attach_count
    }
}

impl Gizmo for HeadlessGizmo {
    fn attach(&mut self, unit: SelectionUnit) {
        log::debug!("gizmo attached to {:?} in {} mode", unit, self.mode.as_str());
        self.attached = Some(unit);
        self.attach_count += 1;
    }

    fn detach(&mut self) {
        if let Some(unit) = self.attached.take() {
            log::debug!("gizmo detached from {:?}", unit);
        }
    }

    fn set_mode(&mut self, mode: TransformMode) {
        self.mode = mode;
    }

    fn attached(&self) -> Option<SelectionUnit> {
        self.attached
    }

    fn mode(&self) -> TransformMode {
        self.mode
    }
}

/// Apply a gizmo drag to a unit: `delta` is a translation in translate mode
/// and XYZ euler radians in rotate mode. Returns false for unknown units.
pub fn apply_drag(scene: &mut Scene, unit: SelectionUnit, mode: TransformMode, delta: Vec3) -> bool {
    match mode {
        TransformMode::Translate => scene.translate_unit(unit, delta),
        TransformMode::Rotate => scene.rotate_unit(unit, delta),
    }
}
