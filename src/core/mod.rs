pub mod clock;
pub mod controller;
pub mod gizmo;
pub mod input;
pub mod input_adapter;
pub mod octree;
pub mod picker;
pub mod triangle_intersection;
