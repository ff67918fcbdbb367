use std::sync::Arc;

use glam::Vec3;
use arrow_markers::camera::Camera;
use arrow_markers::core::gizmo::{Gizmo, HeadlessGizmo, TransformMode};
use arrow_markers::core::input::InputEvent;
use arrow_markers::core::picker::{SelectionUnit, SpatialPicker, HIGHLIGHT_COLOR};
use arrow_markers::mesh::cuboid;
use arrow_markers::scene::{EntityId, Material, Scene, Transform};
use arrow_markers::{AppConfig, MarkerApp};

const VIEWPORT: (u32, u32) = (100, 100);

/// One cube of edge 2 at the origin, seen from z = 20
fn cube_app() -> (MarkerApp, EntityId) {
    let mut scene = Scene::new();
    let highlight = scene.add_material(Material::from_hex("selected", HIGHLIGHT_COLOR));
    let grey = scene.add_material(Material::from_hex("grey", 0x888888));
    let cube = scene.add_entity(Arc::new(cuboid::cube(2.0)), Transform::IDENTITY, grey);

    let picker = SpatialPicker::new(HeadlessGizmo::new(), highlight);
    let camera = Camera::new(Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO, 1.0);
    (MarkerApp::from_parts(scene, picker, camera, VIEWPORT), cube)
}

fn click_at(app: &MarkerApp, point: Vec3) -> InputEvent {
    let px = app.world_to_pixel(point).expect("point should be in front of the camera");
    InputEvent::Click { x: px.x, y: px.y }
}

#[cfg(test)]
mod frame_loop_tests {
    use super::*;

    #[test]
    fn test_clicks_ignored_outside_select_mode() {
        let (mut app, _) = cube_app();
        app.push_event(InputEvent::ToggleSelectMode);
        app.push_event(InputEvent::Click { x: 53.0, y: 48.0 });

        let report = app.tick();

        assert_eq!(report.selected, None);
        assert!(!report.select_mode);
        assert!(app.pointer().is_some(), "Pointer still tracks the click position");
    }

    #[test]
    fn test_first_click_selects() {
        let (mut app, cube) = cube_app();
        assert!(app.select_mode(), "Apps start in select mode");
        app.push_event(InputEvent::Click { x: 53.0, y: 48.0 });

        let report = app.tick();

        assert_eq!(report.events, 1);
        assert!(report.select_mode);
        assert_eq!(report.selected, Some(SelectionUnit::Entity(cube)));
        assert_eq!(app.scene().material_of(cube), Some(app.picker().highlight()));
    }

    #[test]
    fn test_leaving_select_mode_clears_selection() {
        let (mut app, cube) = cube_app();
        app.push_event(InputEvent::Click { x: 53.0, y: 48.0 });
        app.tick();

        app.push_event(InputEvent::ToggleSelectMode);
        let report = app.tick();

        assert_eq!(report.selected, None);
        assert_ne!(app.scene().material_of(cube), Some(app.picker().highlight()));
        assert_eq!(app.picker().gizmo().attached(), None);
    }

    #[test]
    fn test_drag_then_click_picks_at_new_location() {
        let (mut app, cube) = cube_app();
        app.push_event(InputEvent::Click { x: 53.0, y: 48.0 });
        app.push_event(InputEvent::DragSelected { delta: [10.0, 0.0, 0.0] });
        app.tick();

        assert_eq!(
            app.scene().entity_transform(cube).unwrap().translation,
            Vec3::new(10.0, 0.0, 0.0)
        );

        // Old location is empty now
        app.push_event(InputEvent::Click { x: 53.0, y: 48.0 });
        assert_eq!(app.tick().selected, None);

        let click = click_at(&app, Vec3::new(10.3, 0.2, 0.0));
        app.push_event(click);
        assert_eq!(app.tick().selected, Some(SelectionUnit::Entity(cube)));
    }

    #[test]
    fn test_rotate_mode_drag_rotates() {
        let (mut app, cube) = cube_app();
        app.push_event(InputEvent::Click { x: 53.0, y: 48.0 });
        app.push_event(InputEvent::SetTransformMode { mode: TransformMode::Rotate });
        app.push_event(InputEvent::DragSelected { delta: [0.0, 0.5, 0.0] });
        let report = app.tick();

        assert_eq!(report.mode, TransformMode::Rotate);
        assert_eq!(app.picker().gizmo().mode(), TransformMode::Rotate);
        let t = app.scene().entity_transform(cube).unwrap();
        assert_eq!(t.translation, Vec3::ZERO);
        assert!((t.rotation.to_axis_angle().1 - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_drag_without_selection_is_ignored() {
        let (mut app, cube) = cube_app();
        app.push_event(InputEvent::DragSelected { delta: [1.0, 0.0, 0.0] });
        app.tick();

        assert_eq!(app.scene().entity_transform(cube).unwrap().translation, Vec3::ZERO);
    }

    #[test]
    fn test_frames_are_counted() {
        let (mut app, _) = cube_app();
        app.tick();
        app.tick();

        assert_eq!(app.tick().frame, 3);
    }
}

#[cfg(test)]
mod marker_app_tests {
    use super::*;

    #[test]
    fn test_same_seed_same_scene() {
        let config = AppConfig {
            marker_count: 10,
            seed: 1234,
            ..AppConfig::default()
        };
        let a = MarkerApp::new(&config, HeadlessGizmo::new());
        let b = MarkerApp::new(&config, HeadlessGizmo::new());

        for (ga, gb) in a.markers().iter().zip(b.markers()) {
            assert_eq!(a.scene().group_transform(*ga), b.scene().group_transform(*gb));
        }
    }

    #[test]
    fn test_clicking_marker_center_selects_a_marker() {
        let config = AppConfig {
            marker_count: 8,
            seed: 5,
            ..AppConfig::default()
        };
        let mut app = MarkerApp::new(&config, HeadlessGizmo::new());
        let target = app.markers()[0];
        let center = app.scene().group_transform(target).unwrap().translation;

        let click = click_at(&app, center);
        app.push_event(click);
        let report = app.tick();

        // The ray passes through the target's cube, though a marker in front may win
        assert!(matches!(report.selected, Some(SelectionUnit::Group(_))));
        let selected = report.selected.unwrap();
        assert_eq!(app.scene().members(selected).len(), 4);
    }
}
