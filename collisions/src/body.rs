use crate::config::{
    NarrowPhase, DEFAULT_MASS, DEFAULT_MAX_VELOCITY, METERS_PER_PIXEL, PADDING,
    PIXELS_PER_METER, STEP_LIMIT,
};
use common::shapes::Rect;
use nalgebra::Vector3;
use quadtree::collider::trigger_collision;
use quadtree::{Collider, ColliderRef, CollisionResults, EntityTag, QuadTree};

use std::cell::RefCell;
use std::rc::Rc;

pub type BodyRef = Rc<RefCell<RigidBody>>;

/// What a body reads from the world while it steps.
pub struct StepContext<'a> {
    pub gravity: Vector3<f32>,
    pub bounds: Rect,
    /// Every collider in the world, in registration order.
    pub colliders: &'a [ColliderRef],
    pub quad_tree: &'a QuadTree,
    pub narrow_phase: NarrowPhase,
}

/// A collider that moves under velocity, acceleration and gravity.
///
/// Positions are in meters and derived from the collider's pixel bounds, so
/// the two never disagree. The z component is carried but never integrated
/// against anything.
pub struct RigidBody {
    collider: ColliderRef,
    pub velocity: Vector3<f32>,
    pub acceleration: Vector3<f32>,
    /// Velocity applied for a single step on top of the integrated one, such
    /// as player input. Not accumulated.
    pub instance_velocity: Vector3<f32>,
    pub force: Vector3<f32>,
    pub mass: f32,
    /// Replaces world gravity for this body when set.
    pub custom_gravity: Option<Vector3<f32>>,
    pub max_velocity: Vector3<f32>,
    pub min_velocity: Vector3<f32>,
    /// Colliders touched during the last step.
    collision_results: Vec<ColliderRef>,
}

impl RigidBody {
    pub fn new(id: impl Into<String>, tag: Option<EntityTag>, bounds: Option<Rect>) -> Self {
        Self::from_collider(Collider::new(id, tag, bounds).into_ref())
    }

    pub fn from_collider(collider: ColliderRef) -> Self {
        RigidBody {
            collider,
            velocity: Vector3::zeros(),
            acceleration: Vector3::zeros(),
            instance_velocity: Vector3::zeros(),
            force: Vector3::zeros(),
            mass: DEFAULT_MASS,
            custom_gravity: None,
            max_velocity: Vector3::repeat(DEFAULT_MAX_VELOCITY),
            min_velocity: Vector3::repeat(-DEFAULT_MAX_VELOCITY),
            collision_results: Vec::new(),
        }
    }

    pub fn into_ref(self) -> BodyRef {
        Rc::new(RefCell::new(self))
    }

    pub fn collider(&self) -> &ColliderRef {
        &self.collider
    }

    pub fn id(&self) -> String {
        self.collider.borrow().id().to_owned()
    }

    pub fn bounds(&self) -> Rect {
        *self.collider.borrow().bounds()
    }

    /// Top left corner of the bounds, in meters.
    pub fn position(&self) -> Vector3<f32> {
        let collider = self.collider.borrow();
        Vector3::new(
            collider.left() * METERS_PER_PIXEL,
            collider.top() * METERS_PER_PIXEL,
            0.0,
        )
    }

    /// Moves the collider, in pixels. The position callback fires.
    pub fn set_pos(&mut self, left: f32, top: f32) {
        self.collider.borrow_mut().set_pos(left, top);
    }

    pub fn collision_results(&self) -> &[ColliderRef] {
        &self.collision_results
    }

    /// Zeroes motion and restores the default velocity limits.
    pub fn reset(&mut self) {
        self.velocity = Vector3::zeros();
        self.acceleration = Vector3::zeros();
        self.instance_velocity = Vector3::zeros();
        self.force = Vector3::zeros();
        self.max_velocity = Vector3::repeat(DEFAULT_MAX_VELOCITY);
        self.min_velocity = Vector3::repeat(-DEFAULT_MAX_VELOCITY);
        self.collision_results.clear();
    }

    /// Advances the body by `dt_ms` milliseconds.
    ///
    /// Inactive bodies don't move and fire nothing. Active bodies always
    /// fire their own collision callback, with an empty slice when nothing
    /// was touched, and every touched collider is notified with this body's
    /// collider. Callbacks must not borrow the `BodyRef` being stepped.
    pub fn update(&mut self, dt_ms: f32, ctx: &StepContext) {
        self.collision_results.clear();
        if !self.collider.borrow().active {
            return;
        }

        let t = dt_ms * 0.001;
        let current = self.bounds();

        let gravity = self.custom_gravity.unwrap_or(ctx.gravity);
        let mut next_velocity = self.velocity + (self.acceleration + gravity) * t;
        next_velocity = next_velocity
            .sup(&self.min_velocity)
            .inf(&self.max_velocity);

        let next_position =
            self.position() + next_velocity * t + self.instance_velocity * t;
        let mut next = current;
        next.set_position(
            next_position.x * PIXELS_PER_METER,
            next_position.y * PIXELS_PER_METER,
        );

        self.correct_collision(&current, &mut next, &mut next_velocity, ctx);

        self.velocity = next_velocity;
        self.set_pos(next.left(), next.top());
        tracing::trace!(
            body = %self.collider.borrow().id(),
            bounds = %next,
            contacts = self.collision_results.len(),
            "body stepped"
        );
        self.on_hit();
    }

    /// Resolves the move from `current` to `next` against the world's
    /// colliders, then clamps it to the world bounds. Snaps `next` and zeroes
    /// the blocked components of every velocity, recording each collider that
    /// was touched.
    pub fn correct_collision(
        &mut self,
        current: &Rect,
        next: &mut Rect,
        next_velocity: &mut Vector3<f32>,
        ctx: &StepContext,
    ) {
        let collide_mask = self.collider.borrow().collide_mask;

        // Anything this step can touch lies within one body extent plus a
        // step and a gap of the swept area.
        let reach = next.width().max(next.height()) + STEP_LIMIT + PADDING;
        let mut nearby = match ctx.narrow_phase {
            NarrowPhase::AllColliders => None,
            NarrowPhase::QuadTreeFiltered => {
                let query = current.union(next).inflate(reach);
                let mut hits = CollisionResults::new();
                ctx.quad_tree.check_for_collision_rect(&query, &mut hits, None);
                Some((query, hits))
            }
        };

        for handle in ctx.colliders {
            if Rc::ptr_eq(handle, &self.collider) {
                continue;
            }
            let other = handle.borrow();
            if !other.active || other.collision_type & collide_mask == 0 {
                continue;
            }
            if let Some((query, hits)) = nearby.as_mut() {
                // Snaps move `next`, so the queried area grows to follow it.
                let needed = current.union(next).inflate(reach);
                if !query.encapsulates(&needed) {
                    *query = query.union(&needed);
                    ctx.quad_tree.check_for_collision_rect(query, hits, None);
                }
                if ctx.quad_tree.contains(other.id()) && !hits.contains(handle) {
                    continue;
                }
            }
            let bounds = *other.bounds();
            drop(other);

            if next.edge_overlap_y(&bounds, true) {
                let step_height = bounds.top() - next.bottom();

                if current.right() <= bounds.left() && next.right() >= bounds.left() {
                    if step_height <= STEP_LIMIT {
                        next.set_top(bounds.top() + next.height());
                    } else {
                        self.stop_x(next_velocity);
                        next.set_left(bounds.left() - next.width() - PADDING);
                    }
                    self.collision_results.push(Rc::clone(handle));
                    continue;
                }

                if current.left() >= bounds.right() && next.left() <= bounds.right() {
                    if step_height <= STEP_LIMIT {
                        next.set_top(bounds.top() + next.height());
                    } else {
                        self.stop_x(next_velocity);
                        next.set_left(bounds.right() + PADDING);
                    }
                    self.collision_results.push(Rc::clone(handle));
                    continue;
                }
            }

            if next.edge_overlap_x(&bounds, true) {
                if current.top() >= bounds.top() && next.bottom() <= bounds.top() {
                    self.stop_y(next_velocity);
                    next.set_top(bounds.top() + next.height());
                    self.collision_results.push(Rc::clone(handle));
                } else if current.top() <= bounds.bottom() && next.top() >= bounds.bottom() {
                    self.stop_y(next_velocity);
                    next.set_top(bounds.bottom());
                    self.collision_results.push(Rc::clone(handle));
                }
            }
        }

        let world = ctx.bounds;
        if next.bottom() <= world.bottom() {
            self.stop_y(next_velocity);
            next.set_top(world.bottom() + next.height());
        } else if next.top() >= world.top() {
            self.stop_y(next_velocity);
            next.set_top(world.top());
        }

        if next.right() >= world.right() {
            self.stop_x(next_velocity);
            next.set_left(world.right() - next.width());
        } else if next.left() <= world.left() {
            self.stop_x(next_velocity);
            next.set_left(world.left());
        }
    }

    /// Notifies this body of everything it touched last step, and each
    /// touched collider of this body.
    pub fn on_hit(&self) {
        trigger_collision(&self.collider, &self.collision_results);

        let this = std::slice::from_ref(&self.collider);
        for other in &self.collision_results {
            trigger_collision(other, this);
        }
    }

    fn stop_x(&mut self, next_velocity: &mut Vector3<f32>) {
        next_velocity.x = 0.0;
        self.instance_velocity.x = 0.0;
        self.acceleration.x = 0.0;
    }

    fn stop_y(&mut self, next_velocity: &mut Vector3<f32>) {
        next_velocity.y = 0.0;
        self.instance_velocity.y = 0.0;
        self.acceleration.y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context<'a>(colliders: &'a [ColliderRef], tree: &'a QuadTree) -> StepContext<'a> {
        StepContext {
            gravity: Vector3::zeros(),
            bounds: Rect::new(0.0, 10000.0, 2000.0, 2000.0),
            colliders,
            quad_tree: tree,
            narrow_phase: NarrowPhase::AllColliders,
        }
    }

    #[test]
    fn position_follows_bounds() {
        let body = RigidBody::new("body", None, Some(Rect::new(280.0, 10.0, 560.0, 10.0)));
        let position = body.position();
        assert!((position.x - 1.0).abs() < 1e-5);
        assert!((position.y - 2.0).abs() < 1e-5);
        assert_eq!(position.z, 0.0);
    }

    #[test]
    fn velocity_is_clamped_per_component() {
        let tree = QuadTree::default();
        let mut body = RigidBody::new("body", None, Some(Rect::new(500.0, 10.0, 1000.0, 10.0)));
        body.max_velocity = Vector3::new(2.0, 2.0, 2.0);
        body.min_velocity = Vector3::new(-2.0, -2.0, -2.0);
        body.acceleration = Vector3::new(10_000.0, -10_000.0, 0.0);

        body.update(16.0, &context(&[], &tree));
        assert_eq!(body.velocity, Vector3::new(2.0, -2.0, 0.0));
    }

    #[test]
    fn custom_gravity_replaces_world_gravity() {
        let tree = QuadTree::default();
        let mut body = RigidBody::new("body", None, Some(Rect::new(500.0, 10.0, 1000.0, 10.0)));
        body.custom_gravity = Some(Vector3::new(0.0, 5.0, 0.0));

        let mut ctx = context(&[], &tree);
        ctx.gravity = Vector3::new(0.0, -9.8, 0.0);
        body.update(100.0, &ctx);
        assert!((body.velocity.y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn reset_restores_limits() {
        let mut body = RigidBody::new("body", None, None);
        body.velocity = Vector3::new(1.0, 2.0, 3.0);
        body.max_velocity = Vector3::zeros();
        body.reset();
        assert_eq!(body.velocity, Vector3::zeros());
        assert_eq!(body.max_velocity, Vector3::repeat(DEFAULT_MAX_VELOCITY));
        assert_eq!(body.min_velocity, Vector3::repeat(-DEFAULT_MAX_VELOCITY));
    }
}
