use super::types::{CollisionResults, NodeStack, QuadTreeAnalytics, ROOT};
use super::QuadTree;
use crate::collider::Collider;
use common::shapes::Rect;

impl QuadTree {
    /// Every stored collider whose bounds intersect `query`'s bounds.
    pub fn check_for_collision(&self, query: &Collider) -> CollisionResults {
        let mut results = CollisionResults::new();
        self.check_for_collision_with(query, &mut results, None);
        results
    }

    /// Appends hits to `results`, skipping handles already present, and
    /// fills in `analytics` when given.
    pub fn check_for_collision_with(
        &self,
        query: &Collider,
        results: &mut CollisionResults,
        analytics: Option<&mut QuadTreeAnalytics>,
    ) {
        self.check_for_collision_rect(query.bounds(), results, analytics);
    }

    /// Same as `check_for_collision_with` for a bare rectangle.
    ///
    /// Stored colliders must not be mutably borrowed while this runs.
    pub fn check_for_collision_rect(
        &self,
        query: &Rect,
        results: &mut CollisionResults,
        mut analytics: Option<&mut QuadTreeAnalytics>,
    ) {
        let mut stack = NodeStack::new();
        stack.push(ROOT);
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx as usize];
            let overlaps = query.intersects(&node.bounds);
            // The root's own colliders are out of bounds fallbacks and are
            // tested whatever the query covers.
            if !overlaps && idx != ROOT {
                continue;
            }
            if overlaps {
                if let Some(analytics) = analytics.as_deref_mut() {
                    analytics.nodes_tested += 1;
                }
            }

            for collider in node.collisions.values() {
                if let Some(analytics) = analytics.as_deref_mut() {
                    analytics.intersection_tests += 1;
                }
                if collider.borrow().is_colliding_rect(query) {
                    results.push(collider);
                }
            }

            if !overlaps {
                continue;
            }
            if let Some(children) = node.children {
                stack.extend(children);
            }
        }
    }
}
