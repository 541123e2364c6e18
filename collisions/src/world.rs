use crate::body::{BodyRef, StepContext};
use crate::config::{NarrowPhase, WorldConfig};
use crate::error::{PhysicsError, PhysicsResult};
use common::shapes::Rect;
use nalgebra::Vector3;
use quadtree::{Collider, ColliderRef, CollisionResults, QuadTree, QuadTreeAnalytics};

use std::rc::Rc;

/// Owns world gravity and bounds, the static colliders, the rigid bodies and
/// the quadtree used for broad phase queries.
///
/// Static colliders go in both the flat list and the quadtree. Bodies only
/// join the flat list, so the tree never goes stale as they move.
pub struct PhysicsWorld {
    pub gravity: Vector3<f32>,
    /// Stored for gameplay code, bodies don't integrate it.
    pub wind: Vector3<f32>,
    bounds: Rect,
    quad_tree: QuadTree,
    narrow_phase: NarrowPhase,
    colliders: Vec<ColliderRef>,
    bodies: Vec<BodyRef>,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        let config = WorldConfig::default();
        PhysicsWorld {
            gravity: config.gravity,
            wind: Vector3::zeros(),
            bounds: config.bounds,
            quad_tree: QuadTree::new(config.quad_tree.size, config.quad_tree.max_depth),
            narrow_phase: config.narrow_phase,
            colliders: Vec::new(),
            bodies: Vec::new(),
        }
    }

    pub fn with_config(config: WorldConfig) -> PhysicsResult<Self> {
        validate_size(config.bounds.width(), config.bounds.height())?;
        Ok(PhysicsWorld {
            gravity: config.gravity,
            wind: Vector3::zeros(),
            bounds: config.bounds,
            quad_tree: QuadTree::with_config(config.quad_tree)?,
            narrow_phase: config.narrow_phase,
            colliders: Vec::new(),
            bodies: Vec::new(),
        })
    }

    /// Resizes the world to `width` by `height` pixels anchored at the
    /// origin, and rebuilds the quadtree to cover it with `max_depth` levels.
    /// Colliders held by the old tree are inserted into the new one.
    pub fn initialize_bounds(
        &mut self,
        width: f32,
        height: f32,
        max_depth: usize,
    ) -> PhysicsResult<()> {
        validate_size(width, height)?;
        let mut quad_tree = QuadTree::with_config(quadtree::Config {
            size: width.max(height),
            max_depth,
        })?;

        for collider in &self.colliders {
            let registered = self.quad_tree.contains(collider.borrow().id());
            if registered {
                quad_tree.add_collision(collider);
            }
        }

        self.bounds = Rect::new(0.0, width, height, height);
        self.quad_tree = quad_tree;
        tracing::debug!(width, height, max_depth, "world bounds initialized");
        Ok(())
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn quad_tree(&self) -> &QuadTree {
        &self.quad_tree
    }

    pub fn narrow_phase(&self) -> NarrowPhase {
        self.narrow_phase
    }

    pub fn set_narrow_phase(&mut self, narrow_phase: NarrowPhase) {
        self.narrow_phase = narrow_phase;
    }

    pub fn colliders(&self) -> &[ColliderRef] {
        &self.colliders
    }

    pub fn bodies(&self) -> &[BodyRef] {
        &self.bodies
    }

    /// Registers a static collider. Registering the same handle again only
    /// refreshes its place in the quadtree, for instance after it was moved.
    pub fn set_collision(&mut self, collider: &ColliderRef) {
        if !self.colliders.iter().any(|c| Rc::ptr_eq(c, collider)) {
            self.colliders.push(Rc::clone(collider));
        }
        self.quad_tree.add_collision(collider);
        tracing::debug!(collider = %collider.borrow().id(), "collider registered");
    }

    /// Drops every collider registered under `id`. Returns whether any was.
    pub fn remove_collision(&mut self, id: &str) -> bool {
        let before = self.colliders.len();
        self.colliders.retain(|c| c.borrow().id() != id);
        self.quad_tree.remove_collision(id);
        let removed = self.colliders.len() != before;
        if removed {
            tracing::debug!(collider = %id, "collider removed");
        }
        removed
    }

    /// Registers a body and puts its collider in the flat list, so other
    /// bodies resolve against it.
    pub fn add_body(&mut self, body: &BodyRef) {
        if self.bodies.iter().any(|b| Rc::ptr_eq(b, body)) {
            return;
        }
        let collider = Rc::clone(body.borrow().collider());
        tracing::debug!(body = %collider.borrow().id(), "body added");
        if !self.colliders.iter().any(|c| Rc::ptr_eq(c, &collider)) {
            self.colliders.push(collider);
        }
        self.bodies.push(Rc::clone(body));
    }

    /// Drops the body registered under `id` along with its collider.
    pub fn remove_body(&mut self, id: &str) -> bool {
        let Some(index) = self.bodies.iter().position(|b| b.borrow().id() == id) else {
            return false;
        };
        let body = self.bodies.remove(index);
        let collider = Rc::clone(body.borrow().collider());
        self.colliders.retain(|c| !Rc::ptr_eq(c, &collider));
        tracing::debug!(body = %id, "body removed");
        true
    }

    /// Steps every body in registration order by `dt_ms` milliseconds.
    /// Bodies later in the order see the moves of earlier ones.
    pub fn update(&mut self, dt_ms: f32) {
        let ctx = StepContext {
            gravity: self.gravity,
            bounds: self.bounds,
            colliders: &self.colliders,
            quad_tree: &self.quad_tree,
            narrow_phase: self.narrow_phase,
        };
        for body in &self.bodies {
            body.borrow_mut().update(dt_ms, &ctx);
        }
    }

    /// Broad phase query against the static colliders in the quadtree.
    pub fn check_for_collision(
        &self,
        query: &Collider,
        results: &mut CollisionResults,
        analytics: Option<&mut QuadTreeAnalytics>,
    ) {
        self.quad_tree
            .check_for_collision_with(query, results, analytics);
    }

    /// Forgets every collider and body and restores the default settings.
    pub fn reset(&mut self) {
        *self = PhysicsWorld::new();
        tracing::debug!("world reset");
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_size(width: f32, height: f32) -> PhysicsResult<()> {
    let valid = |v: f32| v.is_finite() && v > 0.0;
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(PhysicsError::InvalidWorldSize { width, height })
    }
}
