//! Frame-driven marker application.
//!
//! [`MarkerApp`] owns the scene, the picker and the camera. Input arrives
//! through its queue and is applied only inside [`MarkerApp::tick`], which
//! makes the tick the single point where selection and transforms change.

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::camera::Camera;
use crate::core::clock::FrameClock;
use crate::core::gizmo::{apply_drag, Gizmo, HeadlessGizmo, TransformMode};
use crate::core::input::{InputEvent, InputQueue};
use crate::core::octree::OctreeConfig;
use crate::core::picker::{SelectionUnit, SpatialPicker, HIGHLIGHT_COLOR};
use crate::mesh::ArrowMeshParameters;
use crate::scene::marker::{self, MarkerAssets, DEFAULT_MARKER_COUNT, DEFAULT_SCATTER_RADIUS};
use crate::scene::{GroupId, Material, Scene};

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub marker_count: usize,
    pub scatter_radius: f32,
    pub seed: u64,
    pub arrow: ArrowMeshParameters,
    pub octree: OctreeConfig,
    pub viewport: (u32, u32),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            marker_count: DEFAULT_MARKER_COUNT,
            scatter_radius: DEFAULT_SCATTER_RADIUS,
            seed: 0,
            arrow: ArrowMeshParameters::default(),
            octree: OctreeConfig::default(),
            viewport: (800, 600),
        }
    }
}

/// Summary of one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame: u64,
    pub delta_seconds: f32,
    pub events: usize,
    pub select_mode: bool,
    pub mode: TransformMode,
    pub selected: Option<SelectionUnit>,
}

pub struct MarkerApp<G: Gizmo = HeadlessGizmo> {
    scene: Scene,
    picker: SpatialPicker<G>,
    camera: Camera,
    queue: InputQueue,
    select_mode: bool,
    viewport: (u32, u32),
    pointer: Option<Vec2>,
    clock: FrameClock,
    markers: Vec<GroupId>,
}

impl<G: Gizmo> MarkerApp<G> {
    /// Scatter markers with a seeded RNG and index them for picking
    pub fn new(config: &AppConfig, gizmo: G) -> Self {
        let mut scene = Scene::new();
        let highlight = scene.add_material(Material::from_hex("selected", HIGHLIGHT_COLOR));
        let assets = MarkerAssets::with_arrow(&mut scene, config.arrow);
        let mut rng = StdRng::seed_from_u64(config.seed);
        let markers = marker::scatter_markers(
            &mut scene,
            &assets,
            config.marker_count,
            config.scatter_radius,
            &mut rng,
        );

        let picker = SpatialPicker::with_config(gizmo, highlight, config.octree);
        let (w, h) = config.viewport;
        let mut camera = Camera::framing(config.scatter_radius, 1.0);
        camera.set_aspect(w, h);

        let mut app = Self::from_parts(scene, picker, camera, config.viewport);
        app.markers = markers;
        app
    }

    /// Wrap an existing scene; every entity in it becomes pickable
    pub fn from_parts(scene: Scene, mut picker: SpatialPicker<G>, camera: Camera, viewport: (u32, u32)) -> Self {
        picker.insert_all(&scene);
        Self {
            scene,
            picker,
            camera,
            queue: InputQueue::new(),
            select_mode: true,
            viewport,
            pointer: None,
            clock: FrameClock::new(),
            markers: Vec::new(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn picker(&self) -> &SpatialPicker<G> {
        &self.picker
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn select_mode(&self) -> bool {
        self.select_mode
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Last pointer position in NDC
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    pub fn markers(&self) -> &[GroupId] {
        &self.markers
    }

    pub fn queue_mut(&mut self) -> &mut InputQueue {
        &mut self.queue
    }

    pub fn push_event(&mut self, event: InputEvent) {
        self.queue.push(event);
    }

    /// Pixel position of a world point in the current viewport
    pub fn world_to_pixel(&self, point: Vec3) -> Option<Vec2> {
        let (w, h) = self.viewport;
        self.camera.project(point).map(|ndc| Camera::ndc_to_pixel(ndc, w, h))
    }

    /// Catch the spatial index up, then apply queued input in arrival order
    pub fn tick(&mut self) -> FrameReport {
        let delta_seconds = self.clock.tick();
        self.picker.refresh(&mut self.scene);

        let events: Vec<_> = self.queue.drain().collect();
        let count = events.len();
        for event in events {
            self.handle_event(event);
        }

        FrameReport {
            frame: self.clock.frame(),
            delta_seconds,
            events: count,
            select_mode: self.select_mode,
            mode: self.picker.transform_mode(),
            selected: self.picker.selected(),
        }
    }

    fn handle_event(&mut self, event: InputEvent) {
        let (w, h) = self.viewport;
        match event {
            InputEvent::PointerMoved { x, y } => {
                self.pointer = Some(Camera::pixel_to_ndc(x, y, w, h));
            }
            InputEvent::Click { x, y } => {
                let ndc = Camera::pixel_to_ndc(x, y, w, h);
                self.pointer = Some(ndc);
                if self.select_mode {
                    let ray = self.camera.ray_from_ndc(ndc);
                    self.picker.click(&mut self.scene, &ray);
                }
            }
            InputEvent::ToggleSelectMode => {
                self.select_mode = !self.select_mode;
                log::info!("select mode {}", if self.select_mode { "on" } else { "off" });
                if !self.select_mode {
                    self.picker.unselect(&mut self.scene);
                }
            }
            InputEvent::SetTransformMode { mode } => {
                self.picker.set_transform_mode(mode);
            }
            InputEvent::Resize { width, height } => {
                self.viewport = (width, height);
                self.camera.set_aspect(width, height);
            }
            InputEvent::DragSelected { delta } => match self.picker.selected() {
                Some(unit) => {
                    apply_drag(&mut self.scene, unit, self.picker.transform_mode(), Vec3::from_array(delta));
                }
                None => log::debug!("drag ignored: nothing selected"),
            },
        }
    }
}
