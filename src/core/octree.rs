use std::collections::HashMap;

use glam::Vec3;

use crate::math::{ray_hits_aabb, Ray, AABB};
use crate::scene::EntityId;

/// Root growth attempts before an object is parked at the root as-is
const MAX_GROW_STEPS: usize = 32;

/// Smallest half-size of a freshly created root
const MIN_ROOT_HALF_SIZE: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OctreeConfig {
    /// Objects a leaf may hold before it splits
    pub objects_threshold: usize,
    /// Fraction of a node's half-size added on every side of its cube
    pub overlap_pct: f32,
    pub depth_max: usize,
    /// Queue inserts until the next `flush`
    pub deferred: bool,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            objects_threshold: 8,
            overlap_pct: 0.15,
            depth_max: 16,
            deferred: true,
        }
    }
}

/// Octree build statistics
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OctreeStats {
    pub num_nodes: usize,
    pub num_leaves: usize,
    pub max_depth: usize,
    pub total_objects: usize,
}

#[derive(Debug, Clone)]
struct OctreeNode {
    center: Vec3,
    half_size: f32,
    depth: usize,
    loose: AABB,
    objects: Vec<(EntityId, AABB)>,
    children: Option<Box<[OctreeNode; 8]>>,
}

impl OctreeNode {
    fn new(center: Vec3, half_size: f32, depth: usize, overlap_pct: f32) -> Self {
        let extent = Vec3::splat(half_size * (1.0 + overlap_pct));
        Self {
            center,
            half_size,
            depth,
            loose: AABB::new(center - extent, center + extent),
            objects: Vec::new(),
            children: None,
        }
    }

    fn octant(&self, bounds: &AABB) -> usize {
        let c = bounds.center();
        (c.x >= self.center.x) as usize
            | ((c.y >= self.center.y) as usize) << 1
            | ((c.z >= self.center.z) as usize) << 2
    }

    fn child_center(&self, octant: usize) -> Vec3 {
        let quarter = self.half_size * 0.5;
        let sign = |bit: usize| if octant & bit != 0 { quarter } else { -quarter };
        self.center + Vec3::new(sign(1), sign(2), sign(4))
    }

    fn insert(&mut self, id: EntityId, bounds: AABB, config: &OctreeConfig) {
        let octant = self.octant(&bounds);
        if let Some(children) = self.children.as_mut() {
            let child = &mut children[octant];
            if child.loose.contains(&bounds) {
                child.insert(id, bounds, config);
                return;
            }
            self.objects.push((id, bounds));
            return;
        }

        self.objects.push((id, bounds));
        if self.objects.len() > config.objects_threshold && self.depth < config.depth_max {
            self.split(config);
        }
    }

    fn split(&mut self, config: &OctreeConfig) {
        let half = self.half_size * 0.5;
        let depth = self.depth + 1;
        let children: [OctreeNode; 8] = std::array::from_fn(|i| {
            OctreeNode::new(self.child_center(i), half, depth, config.overlap_pct)
        });
        self.children = Some(Box::new(children));

        for (id, bounds) in std::mem::take(&mut self.objects) {
            self.insert(id, bounds, config);
        }
    }

    fn remove(&mut self, id: EntityId, bounds: &AABB, config: &OctreeConfig) -> bool {
        if let Some(pos) = self.objects.iter().position(|(oid, _)| *oid == id) {
            self.objects.swap_remove(pos);
            return true;
        }

        let removed = match self.children.as_mut() {
            Some(children) => children
                .iter_mut()
                .filter(|c| c.loose.contains(bounds))
                .any(|c| c.remove(id, bounds, config)),
            None => false,
        };

        if removed {
            self.try_merge(config);
        }
        removed
    }

    /// Collapse leaf children back into this node once they hold few objects
    fn try_merge(&mut self, config: &OctreeConfig) {
        let Some(children) = self.children.as_ref() else {
            return;
        };
        if children.iter().any(|c| c.children.is_some()) {
            return;
        }
        let total = self.objects.len() + children.iter().map(|c| c.objects.len()).sum::<usize>();
        if total > config.objects_threshold {
            return;
        }
        if let Some(children) = self.children.take() {
            for child in *children {
                self.objects.extend(child.objects);
            }
        }
    }

    fn search_ray(&self, ray: &Ray, out: &mut Vec<EntityId>) {
        if ray_hits_aabb(ray, self.loose.min, self.loose.max).is_none() {
            return;
        }
        out.extend(
            self.objects
                .iter()
                .filter(|(_, b)| ray_hits_aabb(ray, b.min, b.max).is_some())
                .map(|(id, _)| *id),
        );
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.search_ray(ray, out);
            }
        }
    }

    fn search_aabb(&self, region: &AABB, out: &mut Vec<EntityId>) {
        if !self.loose.intersects(region) {
            return;
        }
        out.extend(
            self.objects
                .iter()
                .filter(|(_, b)| b.intersects(region))
                .map(|(id, _)| *id),
        );
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.search_aabb(region, out);
            }
        }
    }

    fn collect_objects(self, out: &mut Vec<(EntityId, AABB)>) {
        out.extend(self.objects);
        if let Some(children) = self.children {
            for child in *children {
                child.collect_objects(out);
            }
        }
    }

    fn gather_stats(&self, stats: &mut OctreeStats) {
        stats.num_nodes += 1;
        stats.max_depth = stats.max_depth.max(self.depth);
        stats.total_objects += self.objects.len();

        match &self.children {
            Some(children) => {
                for child in children.iter() {
                    child.gather_stats(stats);
                }
            }
            None => stats.num_leaves += 1,
        }
    }
}

/// Loose octree over entity bounding boxes.
///
/// Queries are a coarse filter: they return every entity whose box the ray
/// or region touches, which is a superset of exact geometric hits. The tree
/// stores copies of the boxes, so callers must `update` after an entity moves.
#[derive(Debug, Clone, Default)]
pub struct Octree {
    config: OctreeConfig,
    root: Option<OctreeNode>,
    entries: HashMap<EntityId, AABB>,
    pending: Vec<(EntityId, AABB)>,
}

impl Octree {
    pub fn new(config: OctreeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// Indexed objects, excluding inserts still pending
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Known to the tree, either indexed or pending
    pub fn contains(&self, id: EntityId) -> bool {
        self.entries.contains_key(&id) || self.pending.iter().any(|(pid, _)| *pid == id)
    }

    pub fn insert(&mut self, id: EntityId, bounds: AABB) {
        if self.config.deferred {
            self.pending.push((id, bounds));
        } else {
            self.insert_now(id, bounds);
        }
    }

    /// Apply every pending insert
    pub fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        log::trace!("octree flushing {} pending inserts", self.pending.len());
        for (id, bounds) in std::mem::take(&mut self.pending) {
            self.insert_now(id, bounds);
        }
    }

    /// Re-index an object under new bounds. Returns false for unknown ids.
    pub fn update(&mut self, id: EntityId, bounds: AABB) -> bool {
        if let Some(entry) = self.pending.iter_mut().find(|(pid, _)| *pid == id) {
            entry.1 = bounds;
            return true;
        }
        if !self.remove_indexed(id) {
            return false;
        }
        self.insert_now(id, bounds);
        true
    }

    pub fn remove(&mut self, id: EntityId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(pid, _)| *pid != id);
        let was_pending = self.pending.len() != before;
        self.remove_indexed(id) || was_pending
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.entries.clear();
        self.pending.clear();
    }

    pub fn search_ray(&self, ray: &Ray) -> Vec<EntityId> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            root.search_ray(ray, &mut out);
        }
        out
    }

    pub fn search_aabb(&self, region: &AABB) -> Vec<EntityId> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            root.search_aabb(region, &mut out);
        }
        out
    }

    pub fn stats(&self) -> OctreeStats {
        let mut stats = OctreeStats::default();
        if let Some(root) = &self.root {
            root.gather_stats(&mut stats);
        }
        stats
    }

    /// Bounds of the root cube including overlap
    pub fn root_bounds(&self) -> Option<AABB> {
        self.root.as_ref().map(|r| r.loose)
    }

    fn insert_now(&mut self, id: EntityId, bounds: AABB) {
        if self.entries.contains_key(&id) {
            log::warn!("{:?} inserted twice into octree; treating as update", id);
            self.remove_indexed(id);
        }

        let config = self.config;
        let root = self.root.get_or_insert_with(|| {
            let half = (bounds.size().max_element() * 0.5).max(MIN_ROOT_HALF_SIZE);
            OctreeNode::new(bounds.center(), half, 0, config.overlap_pct)
        });

        if !root.loose.contains(&bounds) {
            self.grow_to_fit(&bounds);
        }

        self.entries.insert(id, bounds);
        if let Some(root) = self.root.as_mut() {
            root.insert(id, bounds, &config);
        }
    }

    fn remove_indexed(&mut self, id: EntityId) -> bool {
        let Some(bounds) = self.entries.remove(&id) else {
            return false;
        };
        let config = self.config;
        let removed = self
            .root
            .as_mut()
            .is_some_and(|root| root.remove(id, &bounds, &config));
        if !removed {
            log::warn!("{:?} was tracked but missing from octree nodes", id);
        }
        removed
    }

    /// Double the root towards `bounds` until it fits, then re-insert everything
    fn grow_to_fit(&mut self, bounds: &AABB) {
        let Some(old_root) = self.root.take() else {
            return;
        };
        let config = self.config;

        let mut center = old_root.center;
        let mut half = old_root.half_size;
        let target = bounds.center();
        let mut fits = false;
        for _ in 0..MAX_GROW_STEPS {
            let step = Vec3::new(
                if target.x >= center.x { half } else { -half },
                if target.y >= center.y { half } else { -half },
                if target.z >= center.z { half } else { -half },
            );
            center += step;
            half *= 2.0;
            if OctreeNode::new(center, half, 0, config.overlap_pct).loose.contains(bounds) {
                fits = true;
                break;
            }
        }
        if !fits {
            log::warn!("octree could not grow around {:?}; keeping it at the root", bounds);
        }

        let mut objects = Vec::with_capacity(self.entries.len());
        old_root.collect_objects(&mut objects);

        let mut root = OctreeNode::new(center, half, 0, config.overlap_pct);
        for (id, b) in objects {
            root.insert(id, b, &config);
        }
        log::debug!("octree root grown to half-size {}", half);
        self.root = Some(root);
    }
}
