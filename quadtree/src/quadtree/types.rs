use crate::collider::{Collider, ColliderRef};
use common::shapes::Rect;
use fxhash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use std::cell::RefCell;
use std::rc::Rc;

pub(crate) const ROOT: u32 = 0;

pub(crate) const TOP_LEFT: usize = 0;
pub(crate) const TOP_RIGHT: usize = 1;
pub(crate) const BOTTOM_LEFT: usize = 2;
pub(crate) const BOTTOM_RIGHT: usize = 3;

/// Nodes currently holding one collider.
pub(crate) type NodeList = SmallVec<[u32; 4]>;

pub(crate) type NodeStack = SmallVec<[u32; 64]>;

pub(crate) struct QuadTreeNode {
    pub(crate) bounds: Rect,
    pub(crate) depth: usize,
    /// Colliders stored here plus everything stored below, duplicates included.
    pub(crate) child_count: usize,
    pub(crate) parent: Option<u32>,
    /// Indexed by TOP_LEFT, TOP_RIGHT, BOTTOM_LEFT, BOTTOM_RIGHT.
    pub(crate) children: Option<[u32; 4]>,
    pub(crate) collisions: FxHashMap<String, ColliderRef>,
}

impl QuadTreeNode {
    /// `left` and `top` are the top left corner of the square.
    pub(crate) fn new(left: f32, top: f32, size: f32, depth: usize, parent: Option<u32>) -> Self {
        Self {
            bounds: Rect::new(left, size, top, size),
            depth,
            child_count: 0,
            parent,
            children: None,
            collisions: FxHashMap::default(),
        }
    }

    pub(crate) fn size(&self) -> f32 {
        self.bounds.width()
    }
}

/// Counters filled in by a query when the caller asks for them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuadTreeAnalytics {
    /// Stored colliders tested against the query.
    pub intersection_tests: u32,
    /// Nodes whose bounds overlapped the query.
    pub nodes_tested: u32,
}

/// Colliders hit by a query. A collider straddling several leaves is only
/// reported once: entries are deduplicated by handle identity, not by id.
#[derive(Debug, Default, Clone)]
pub struct CollisionResults {
    collisions: Vec<ColliderRef>,
    seen: FxHashSet<*const RefCell<Collider>>,
}

impl CollisionResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `collider` unless this exact handle is already present.
    pub fn push(&mut self, collider: &ColliderRef) -> bool {
        if !self.seen.insert(Rc::as_ptr(collider)) {
            return false;
        }
        self.collisions.push(Rc::clone(collider));
        true
    }

    pub fn contains(&self, collider: &ColliderRef) -> bool {
        self.seen.contains(&Rc::as_ptr(collider))
    }

    pub fn collisions(&self) -> &[ColliderRef] {
        &self.collisions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColliderRef> {
        self.collisions.iter()
    }

    pub fn len(&self) -> usize {
        self.collisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collisions.is_empty()
    }

    pub fn clear(&mut self) {
        self.collisions.clear();
        self.seen.clear();
    }

    pub fn into_vec(self) -> Vec<ColliderRef> {
        self.collisions
    }
}
