use common::shapes::Rect;
use nalgebra::Vector3;

/// 70 pixels is roughly a quarter of a meter.
pub const PIXELS_PER_METER: f32 = 70.0 / 0.25;
pub const METERS_PER_PIXEL: f32 = 1.0 / PIXELS_PER_METER;

/// Tallest ledge, in pixels, a body walks up instead of being stopped by.
pub const STEP_LIMIT: f32 = 10.0;

/// Gap, in pixels, left between a body and a wall that stopped it.
pub const PADDING: f32 = 3.0;

pub const DEFAULT_MAX_VELOCITY: f32 = 1000.0;
pub const DEFAULT_MASS: f32 = 10.0;

/// Where a rigid body gets the colliders it resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NarrowPhase {
    /// Every registered collider, in registration order.
    #[default]
    AllColliders,
    /// Registration order as well, but colliders held by the quadtree are
    /// only considered when a broad phase query around the body's move
    /// reports them. Only the amount of work changes.
    QuadTreeFiltered,
}

#[derive(Debug, Clone)]
pub struct WorldConfig {
    /// Meters per second squared.
    pub gravity: Vector3<f32>,
    /// Hard world edges in pixels.
    pub bounds: Rect,
    pub quad_tree: quadtree::Config,
    pub narrow_phase: NarrowPhase,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            gravity: Vector3::new(0.0, -9.8, 0.0),
            bounds: Rect::new(0.0, 10000.0, 2000.0, 2000.0),
            quad_tree: quadtree::Config {
                size: 10000.0,
                max_depth: 5,
            },
            narrow_phase: NarrowPhase::AllColliders,
        }
    }
}
