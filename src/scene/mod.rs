//! Entity, group and material tables.
//!
//! The scene owns everything; other components refer to it through ids.
//! Grouping is an explicit two-way table (entity → group, group → ordered
//! members) instead of parent/child pointers. Every transform write records
//! the affected entities so a spatial index can catch up on its next refresh.

pub mod marker;

use std::collections::BTreeSet;
use std::sync::Arc;

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::Serialize;

use crate::core::picker::SelectionUnit;
use crate::math::{Ray, AABB};
use crate::mesh::Mesh;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EntityId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GroupId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaterialId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Rotation from XYZ euler angles in radians
    pub fn from_translation_euler(translation: Vec3, euler: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z),
            scale: Vec3::ONE,
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub color: [f32; 3],
}

impl Material {
    pub fn new(name: impl Into<String>, color: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }

    /// Material from a 0xRRGGBB literal
    pub fn from_hex(name: impl Into<String>, hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::new(name, [channel(16), channel(8), channel(0)])
    }
}

#[derive(Debug, Clone)]
struct Entity {
    mesh: Arc<Mesh>,
    transform: Transform,
    material: MaterialId,
    group: Option<GroupId>,
}

#[derive(Debug, Clone)]
struct Group {
    transform: Transform,
    members: Vec<EntityId>,
}

#[derive(Debug, Default)]
pub struct Scene {
    entities: Vec<Entity>,
    groups: Vec<Group>,
    materials: Vec<Material>,
    dirty: BTreeSet<EntityId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    // === Materials ===

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() as u32 - 1)
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    pub fn material_of(&self, entity: EntityId) -> Option<MaterialId> {
        self.entity(entity).map(|e| e.material)
    }

    /// Returns false when the entity does not exist
    pub fn set_material(&mut self, entity: EntityId, material: MaterialId) -> bool {
        match self.entities.get_mut(entity.0 as usize) {
            Some(e) => {
                e.material = material;
                true
            }
            None => false,
        }
    }

    // === Entities and groups ===

    pub fn add_group(&mut self, transform: Transform) -> GroupId {
        self.groups.push(Group {
            transform,
            members: Vec::new(),
        });
        GroupId(self.groups.len() as u32 - 1)
    }

    pub fn add_entity(&mut self, mesh: Arc<Mesh>, transform: Transform, material: MaterialId) -> EntityId {
        self.push_entity(mesh, transform, material, None)
    }

    /// Adds an entity as the last member of `group`; `None` if the group is unknown
    pub fn add_group_member(
        &mut self,
        group: GroupId,
        mesh: Arc<Mesh>,
        transform: Transform,
        material: MaterialId,
    ) -> Option<EntityId> {
        self.groups.get(group.0 as usize)?;
        let id = self.push_entity(mesh, transform, material, Some(group));
        self.groups[group.0 as usize].members.push(id);
        Some(id)
    }

    fn push_entity(
        &mut self,
        mesh: Arc<Mesh>,
        transform: Transform,
        material: MaterialId,
        group: Option<GroupId>,
    ) -> EntityId {
        self.entities.push(Entity {
            mesh,
            transform,
            material,
            group,
        });
        EntityId(self.entities.len() as u32 - 1)
    }

    fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0 as usize)
    }

    pub fn contains_entity(&self, id: EntityId) -> bool {
        self.entity(id).is_some()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = EntityId> {
        (0..self.entities.len() as u32).map(EntityId)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn mesh(&self, id: EntityId) -> Option<&Arc<Mesh>> {
        self.entity(id).map(|e| &e.mesh)
    }

    pub fn group_of(&self, id: EntityId) -> Option<GroupId> {
        self.entity(id).and_then(|e| e.group)
    }

    /// The unit a hit on `id` selects: its group when grouped
    pub fn unit_of(&self, id: EntityId) -> SelectionUnit {
        match self.group_of(id) {
            Some(group) => SelectionUnit::Group(group),
            None => SelectionUnit::Entity(id),
        }
    }

    /// Members of a unit in insertion order; empty when the unit is unknown
    pub fn members(&self, unit: SelectionUnit) -> Vec<EntityId> {
        match unit {
            SelectionUnit::Entity(id) if self.contains_entity(id) => vec![id],
            SelectionUnit::Entity(_) => Vec::new(),
            SelectionUnit::Group(group) => self
                .groups
                .get(group.0 as usize)
                .map(|g| g.members.clone())
                .unwrap_or_default(),
        }
    }

    // === Transforms ===

    pub fn entity_transform(&self, id: EntityId) -> Option<Transform> {
        self.entity(id).map(|e| e.transform)
    }

    pub fn group_transform(&self, group: GroupId) -> Option<Transform> {
        self.groups.get(group.0 as usize).map(|g| g.transform)
    }

    pub fn set_entity_transform(&mut self, id: EntityId, transform: Transform) -> bool {
        match self.entities.get_mut(id.0 as usize) {
            Some(e) => {
                e.transform = transform;
                self.dirty.insert(id);
                true
            }
            None => false,
        }
    }

    pub fn set_group_transform(&mut self, group: GroupId, transform: Transform) -> bool {
        match self.groups.get_mut(group.0 as usize) {
            Some(g) => {
                g.transform = transform;
                self.dirty.extend(g.members.iter().copied());
                true
            }
            None => false,
        }
    }

    fn update_unit_transform(&mut self, unit: SelectionUnit, f: impl FnOnce(&mut Transform)) -> bool {
        match unit {
            SelectionUnit::Entity(id) => match self.entity_transform(id) {
                Some(mut t) => {
                    f(&mut t);
                    self.set_entity_transform(id, t)
                }
                None => false,
            },
            SelectionUnit::Group(group) => match self.group_transform(group) {
                Some(mut t) => {
                    f(&mut t);
                    self.set_group_transform(group, t)
                }
                None => false,
            },
        }
    }

    pub fn translate_unit(&mut self, unit: SelectionUnit, delta: Vec3) -> bool {
        self.update_unit_transform(unit, |t| t.translation += delta)
    }

    /// Applies XYZ euler angles on top of the current rotation
    pub fn rotate_unit(&mut self, unit: SelectionUnit, euler: Vec3) -> bool {
        let delta = Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z);
        self.update_unit_transform(unit, |t| t.rotation = (t.rotation * delta).normalize())
    }

    pub fn world_matrix(&self, id: EntityId) -> Option<Mat4> {
        let entity = self.entity(id)?;
        let local = entity.transform.matrix();
        Some(match entity.group {
            Some(group) => self.groups[group.0 as usize].transform.matrix() * local,
            None => local,
        })
    }

    pub fn world_bounds(&self, id: EntityId) -> Option<AABB> {
        let matrix = self.world_matrix(id)?;
        self.entity(id).map(|e| e.mesh.bounds().transformed(&matrix))
    }

    /// Exact hit distance of a world-space ray against the entity's triangles
    pub fn intersect_entity(&self, id: EntityId, ray: &Ray) -> Option<f32> {
        let matrix = self.world_matrix(id)?;
        let local_ray = ray.transformed(&matrix.inverse());
        self.entity(id)?.mesh.intersect_ray(&local_ray)
    }

    // === Change tracking ===

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Entities whose world bounds changed since the last call
    pub fn take_dirty(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.dirty).into_iter().collect()
    }
}
