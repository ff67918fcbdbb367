mod aabb;
mod ray;

pub use aabb::AABB;
pub use ray::{intersect_aabb, ray_hits_aabb, Ray};
