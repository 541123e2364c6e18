use common::shapes::Rect;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared handle to a collider. The quadtree, the physics world's flat list and
/// query results all hold clones of the same handle; identity is `Rc::ptr_eq`.
pub type ColliderRef = Rc<RefCell<Collider>>;

/// Called with the new left and top after every position change.
pub type PositionCallback = Rc<dyn Fn(f32, f32, &Collider)>;

/// Called with the colliders this one touched during a simulation tick.
pub type CollisionCallback = Rc<dyn Fn(&[ColliderRef])>;

pub const DEFAULT_COLLISION_TYPE: u32 = 0x000001;
pub const DEFAULT_COLLIDE_MASK: u32 = 0xffffff;

/// Opaque back reference to whatever game object owns a collider. The
/// collision code never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityTag(pub u32);

/// A named rectangle that takes part in collision tests.
///
/// Ids must be unique among registered colliders; nothing here checks it.
pub struct Collider {
    id: String,
    tag: Option<EntityTag>,
    bounds: Rect,
    /// Inactive colliders are skipped by rigid body resolution.
    pub active: bool,
    /// What this collider is.
    pub collision_type: u32,
    /// Which collision types this collider reacts to.
    pub collide_mask: u32,
    on_position: Option<PositionCallback>,
    on_collision: Option<CollisionCallback>,
}

impl Collider {
    pub fn new(id: impl Into<String>, tag: Option<EntityTag>, bounds: Option<Rect>) -> Self {
        Self {
            id: id.into(),
            tag,
            bounds: bounds.unwrap_or_default(),
            active: true,
            collision_type: DEFAULT_COLLISION_TYPE,
            collide_mask: DEFAULT_COLLIDE_MASK,
            on_position: None,
            on_collision: None,
        }
    }

    pub fn into_ref(self) -> ColliderRef {
        Rc::new(RefCell::new(self))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn tag(&self) -> Option<EntityTag> {
        self.tag
    }

    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    pub fn left(&self) -> f32 {
        self.bounds.left()
    }

    pub fn top(&self) -> f32 {
        self.bounds.top()
    }

    pub fn right(&self) -> f32 {
        self.bounds.right()
    }

    pub fn bottom(&self) -> f32 {
        self.bounds.bottom()
    }

    pub fn width(&self) -> f32 {
        self.bounds.width()
    }

    pub fn height(&self) -> f32 {
        self.bounds.height()
    }

    /// Resizes without moving and without firing the position callback.
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.bounds.set_width(width);
        self.bounds.set_height(height);
    }

    pub fn set(&mut self, left: f32, width: f32, top: f32, height: f32) {
        self.set_size(width, height);
        self.set_pos(left, top);
    }

    pub fn set_pos(&mut self, left: f32, top: f32) {
        self.bounds.set_position(left, top);

        if let Some(callback) = self.on_position.clone() {
            callback(self.bounds.left(), self.bounds.top(), self);
        }
    }

    pub fn set_bounds(&mut self, bounds: &Rect) {
        self.set(bounds.left(), bounds.width(), bounds.top(), bounds.height());
    }

    pub fn is_colliding_rect(&self, other: &Rect) -> bool {
        self.bounds.intersects(other)
    }

    pub fn is_colliding(&self, other: &Collider) -> bool {
        self.bounds.intersects(&other.bounds)
    }

    /// One directional filter: only `self.collide_mask` is consulted, never
    /// `other.collide_mask`. A body decides what affects it independently of
    /// what it affects.
    pub fn can_collide_with(&self, other: &Collider) -> bool {
        other.collision_type & self.collide_mask != 0
    }

    /// The callback receives the collider itself, so it must not borrow this
    /// collider's `ColliderRef`.
    pub fn set_on_position<F>(&mut self, callback: F)
    where
        F: Fn(f32, f32, &Collider) + 'static,
    {
        self.on_position = Some(Rc::new(callback));
    }

    pub fn clear_on_position(&mut self) {
        self.on_position = None;
    }

    pub fn set_on_collision<F>(&mut self, callback: F)
    where
        F: Fn(&[ColliderRef]) + 'static,
    {
        self.on_collision = Some(Rc::new(callback));
    }

    pub fn clear_on_collision(&mut self) {
        self.on_collision = None;
    }

    pub fn on_collision(&self) -> Option<CollisionCallback> {
        self.on_collision.clone()
    }

    /// Hands `others` to the collision callback, if one is set.
    pub fn collision_triggered(&self, others: &[ColliderRef]) {
        if let Some(callback) = &self.on_collision {
            callback(others);
        }
    }
}

/// Like `Collider::collision_triggered`, but releases the borrow before the
/// callback runs so the callback is free to borrow `collider` again.
pub fn trigger_collision(collider: &ColliderRef, others: &[ColliderRef]) {
    let callback = collider.borrow().on_collision();
    if let Some(callback) = callback {
        callback(others);
    }
}

impl fmt::Debug for Collider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collider")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("bounds", &self.bounds)
            .field("active", &self.active)
            .field("collision_type", &self.collision_type)
            .field("collide_mask", &self.collide_mask)
            .field("on_position", &self.on_position.is_some())
            .field("on_collision", &self.on_collision.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn set_pos_fires_position_callback() {
        let seen = Rc::new(Cell::new((0.0, 0.0)));
        let mut collider = Collider::new("box", None, Some(Rect::new(0.0, 5.0, 5.0, 5.0)));
        let seen_in_callback = Rc::clone(&seen);
        collider.set_on_position(move |left, top, _| seen_in_callback.set((left, top)));

        collider.set_pos(12.0, 30.0);
        assert_eq!(seen.get(), (12.0, 30.0));
        assert_eq!(collider.width(), 5.0);

        collider.set(1.0, 2.0, 3.0, 4.0);
        assert_eq!(seen.get(), (1.0, 3.0));
        assert_eq!(collider.height(), 4.0);
    }

    #[test]
    fn set_size_does_not_fire_callback() {
        let calls = Rc::new(Cell::new(0));
        let mut collider = Collider::new("box", None, None);
        let calls_in_callback = Rc::clone(&calls);
        collider.set_on_position(move |_, _, _| calls_in_callback.set(calls_in_callback.get() + 1));

        collider.set_size(10.0, -1.0);
        assert_eq!(calls.get(), 0);
        assert_eq!(collider.height(), 0.0);
    }

    #[test]
    fn missing_callbacks_are_skipped() {
        let mut collider = Collider::new("plain", Some(EntityTag(4)), None);
        collider.set_pos(1.0, 1.0);
        collider.collision_triggered(&[]);
        assert_eq!(collider.tag(), Some(EntityTag(4)));
    }

    #[test]
    fn mask_test_is_one_directional() {
        let mut player = Collider::new("player", None, None);
        player.collision_type = 0b10;
        player.collide_mask = 0b01;

        let mut wall = Collider::new("wall", None, None);
        wall.collision_type = 0b01;
        wall.collide_mask = 0b100;

        assert!(player.can_collide_with(&wall));
        assert!(!wall.can_collide_with(&player));
    }

    #[test]
    fn trigger_collision_allows_reentrant_borrow() {
        let collider = Collider::new("bullet", None, None).into_ref();
        let handle = Rc::clone(&collider);
        collider
            .borrow_mut()
            .set_on_collision(move |_| handle.borrow_mut().active = false);

        trigger_collision(&collider, &[]);
        assert!(!collider.borrow().active);
    }
}
