//! Ray picking and the selection state machine.
//!
//! Picking runs in two phases: the octree narrows the scene to entities
//! whose world boxes the ray touches, then each candidate's triangles are
//! tested exactly and the nearest hit wins. A hit on a grouped entity
//! selects the whole group.
//!
//! Selection swaps every member's material for the highlight material and
//! keeps the replaced ones in the state. Unselect puts them back one-to-one,
//! for lone entities and groups alike.

use glam::Vec3;
use serde::Serialize;

use crate::core::gizmo::{Gizmo, TransformMode};
use crate::core::octree::{Octree, OctreeConfig, OctreeStats};
use crate::error::SelectionError;
use crate::math::Ray;
use crate::scene::{EntityId, GroupId, MaterialId, Scene};

/// Highlight colour applied to selected members
pub const HIGHLIGHT_COLOR: u32 = 0x00ffff;

/// What a click selects: a lone entity or a whole group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionUnit {
    Entity(EntityId),
    Group(GroupId),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Selected {
        unit: SelectionUnit,
        /// Original material of each member, in member order
        saved: Vec<(EntityId, MaterialId)>,
    },
}

impl SelectionState {
    pub fn unit(&self) -> Option<SelectionUnit> {
        match self {
            SelectionState::Idle => None,
            SelectionState::Selected { unit, .. } => Some(*unit),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, SelectionState::Idle)
    }
}

/// Nearest exact hit of a pick ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub entity: EntityId,
    pub unit: SelectionUnit,
    pub distance: f32,
    pub point: Vec3,
}

pub struct SpatialPicker<G: Gizmo> {
    index: Octree,
    state: SelectionState,
    gizmo: G,
    mode: TransformMode,
    highlight: MaterialId,
}

impl<G: Gizmo> SpatialPicker<G> {
    pub fn new(gizmo: G, highlight: MaterialId) -> Self {
        Self::with_config(gizmo, highlight, OctreeConfig::default())
    }

    pub fn with_config(gizmo: G, highlight: MaterialId, config: OctreeConfig) -> Self {
        Self {
            index: Octree::new(config),
            state: SelectionState::Idle,
            gizmo,
            mode: TransformMode::default(),
            highlight,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn selected(&self) -> Option<SelectionUnit> {
        self.state.unit()
    }

    pub fn gizmo(&self) -> &G {
        &self.gizmo
    }

    pub fn transform_mode(&self) -> TransformMode {
        self.mode
    }

    pub fn highlight(&self) -> MaterialId {
        self.highlight
    }

    pub fn index(&self) -> &Octree {
        &self.index
    }

    pub fn index_stats(&self) -> OctreeStats {
        self.index.stats()
    }

    /// Register an entity as pickable using its current world bounds
    pub fn insert(&mut self, scene: &Scene, id: EntityId) -> bool {
        match scene.world_bounds(id) {
            Some(bounds) => {
                self.index.insert(id, bounds);
                true
            }
            None => {
                log::warn!("cannot index {:?}: not in the scene", id);
                false
            }
        }
    }

    /// Register every entity currently in the scene
    pub fn insert_all(&mut self, scene: &Scene) {
        for id in scene.entity_ids() {
            self.insert(scene, id);
        }
    }

    /// Re-index moved entities and apply deferred inserts
    pub fn refresh(&mut self, scene: &mut Scene) {
        let dirty = scene.take_dirty();
        let mut moved = 0;
        for id in dirty {
            if let Some(bounds) = scene.world_bounds(id) {
                if self.index.update(id, bounds) {
                    moved += 1;
                }
            }
        }
        if moved > 0 {
            log::trace!("re-indexed {} moved entities", moved);
        }
        self.index.flush();
    }

    /// Nearest exact hit, or None when nothing is struck
    pub fn pick_hit(&self, scene: &Scene, ray: &Ray) -> Option<PickHit> {
        let candidates = self.index.search_ray(ray);
        if candidates.is_empty() {
            log::trace!("pick ray touched no bounds");
            return None;
        }

        candidates
            .into_iter()
            .filter_map(|id| scene.intersect_entity(id, ray).map(|t| (id, t)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(entity, distance)| PickHit {
                entity,
                unit: scene.unit_of(entity),
                distance,
                point: ray.at(distance),
            })
    }

    pub fn pick(&self, scene: &Scene, ray: &Ray) -> Option<SelectionUnit> {
        self.pick_hit(scene, ray).map(|hit| hit.unit)
    }

    /// Highlight `unit` and attach the gizmo, restoring any previous selection
    /// first. Selecting the current unit again changes nothing.
    pub fn select(&mut self, scene: &mut Scene, unit: SelectionUnit) -> Result<(), SelectionError> {
        let members = scene.members(unit);
        if members.is_empty() {
            log::warn!("ignoring selection of {:?}: no members", unit);
            return Err(SelectionError::NullTarget(unit));
        }
        if self.state.unit() == Some(unit) {
            return Ok(());
        }

        self.unselect(scene);

        let saved: Vec<_> = members
            .iter()
            .filter_map(|&m| scene.material_of(m).map(|mat| (m, mat)))
            .collect();
        for &(member, _) in &saved {
            scene.set_material(member, self.highlight);
        }

        self.gizmo.set_mode(self.mode);
        self.gizmo.attach(unit);
        log::info!("selected {:?} ({} members)", unit, saved.len());
        self.state = SelectionState::Selected { unit, saved };
        Ok(())
    }

    /// Restore saved materials and detach the gizmo. Returns false when
    /// nothing was selected.
    pub fn unselect(&mut self, scene: &mut Scene) -> bool {
        match std::mem::take(&mut self.state) {
            SelectionState::Idle => {
                log::debug!("unselect with nothing selected");
                false
            }
            SelectionState::Selected { unit, saved } => {
                for (member, material) in saved {
                    scene.set_material(member, material);
                }
                self.gizmo.detach();
                log::info!("unselected {:?}", unit);
                true
            }
        }
    }

    /// Takes effect on the gizmo immediately when something is selected
    pub fn set_transform_mode(&mut self, mode: TransformMode) {
        self.mode = mode;
        if !self.state.is_idle() {
            self.gizmo.set_mode(mode);
        }
    }

    pub fn toggle_mode(&mut self) -> TransformMode {
        self.set_transform_mode(self.mode.toggled());
        self.mode
    }

    /// Select-mode click: select what the ray hits, or clear on a miss
    pub fn click(&mut self, scene: &mut Scene, ray: &Ray) -> Option<SelectionUnit> {
        self.refresh(scene);
        match self.pick(scene, ray) {
            Some(unit) => {
                if let Err(e) = self.select(scene, unit) {
                    log::warn!("{}", e);
                }
                Some(unit)
            }
            None => {
                self.unselect(scene);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gizmo::HeadlessGizmo;
    use crate::mesh::cuboid;
    use crate::scene::{Material, Transform};
    use std::sync::Arc;

    struct Fixture {
        scene: Scene,
        picker: SpatialPicker<HeadlessGizmo>,
        red: MaterialId,
        lone: EntityId,
        group: GroupId,
    }

    fn fixture() -> Fixture {
        let mut scene = Scene::new();
        let red = scene.add_material(Material::from_hex("red", 0xff0000));
        let highlight = scene.add_material(Material::from_hex("selected", HIGHLIGHT_COLOR));
        let cube = Arc::new(cuboid::cube(1.0));

        let lone = scene.add_entity(cube.clone(), Transform::from_translation(Vec3::new(0.0, 0.0, -10.0)), red);
        let group = scene.add_group(Transform::from_translation(Vec3::new(5.0, 0.0, -10.0)));
        scene.add_group_member(group, cube.clone(), Transform::IDENTITY, red);
        scene.add_group_member(group, cube, Transform::from_translation(Vec3::Y * 2.0), red);

        let mut picker = SpatialPicker::new(HeadlessGizmo::new(), highlight);
        picker.insert_all(&scene);
        picker.refresh(&mut scene);
        Fixture { scene, picker, red, lone, group }
    }

    fn ray_at(x: f32, y: f32) -> Ray {
        Ray::new(Vec3::new(x, y, 0.0), Vec3::NEG_Z)
    }

    #[test]
    fn test_pick_nearest_face() {
        let f = fixture();
        let hit = f.picker.pick_hit(&f.scene, &ray_at(0.1, 0.2)).unwrap();
        assert_eq!(hit.entity, f.lone);
        assert!((hit.distance - 9.5).abs() < 1e-4);
    }

    #[test]
    fn test_group_hit_resolves_to_group() {
        let f = fixture();
        assert_eq!(f.picker.pick(&f.scene, &ray_at(5.1, 2.2)), Some(SelectionUnit::Group(f.group)));
    }

    #[test]
    fn test_select_highlights_and_unselect_restores() {
        let mut f = fixture();
        let unit = SelectionUnit::Group(f.group);
        f.picker.select(&mut f.scene, unit).unwrap();
        for m in f.scene.members(unit) {
            assert_eq!(f.scene.material_of(m), Some(f.picker.highlight()));
        }
        assert_eq!(f.picker.gizmo().attached(), Some(unit));

        assert!(f.picker.unselect(&mut f.scene));
        for m in f.scene.members(unit) {
            assert_eq!(f.scene.material_of(m), Some(f.red));
        }
        assert!(!f.picker.unselect(&mut f.scene));
    }

    #[test]
    fn test_reselect_is_noop() {
        let mut f = fixture();
        let unit = SelectionUnit::Entity(f.lone);
        f.picker.select(&mut f.scene, unit).unwrap();
        f.picker.select(&mut f.scene, unit).unwrap();
        assert_eq!(f.picker.gizmo().attach_count(), 1);
    }

    #[test]
    fn test_mode_change_reaches_attached_gizmo() {
        let mut f = fixture();
        f.picker.select(&mut f.scene, SelectionUnit::Entity(f.lone)).unwrap();
        assert_eq!(f.picker.toggle_mode(), TransformMode::Rotate);
        assert_eq!(f.picker.gizmo().mode(), TransformMode::Rotate);
    }
}
