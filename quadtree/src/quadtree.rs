//! Depth bounded quadtree used as the broad phase for collider queries.
//!
//! Every node is subdivided down to `max_depth - 1` and only those deepest
//! nodes store colliders. A collider that straddles a boundary is stored in
//! every leaf it overlaps, so queries deduplicate by handle identity. The
//! tree keeps a reverse index from collider id to the nodes holding it, which
//! keeps removal proportional to the number of those nodes.

mod collisions;
mod config;
mod storage;
mod types;

pub use config::{Config, MAX_SUPPORTED_DEPTH};
pub use types::{CollisionResults, QuadTreeAnalytics};

use crate::error::QuadtreeResult;
use common::shapes::Rect;
use fxhash::FxHashMap;
use types::{NodeList, QuadTreeNode, ROOT};

pub struct QuadTree {
    size: f32,
    max_depth: usize,
    /// Arena of nodes, the root is always at index 0.
    nodes: Vec<QuadTreeNode>,
    /// Collider id to the nodes that currently hold it.
    collisions: FxHashMap<String, NodeList>,
}

impl QuadTree {
    pub fn with_config(config: Config) -> QuadtreeResult<Self> {
        config.validate()?;
        Ok(Self::build(config.size, config.max_depth))
    }

    /// Infallible constructor. Depth is clamped to `1..=MAX_SUPPORTED_DEPTH`
    /// and an unusable size falls back to the default one.
    pub fn new(size: f32, max_depth: usize) -> Self {
        let size = if size.is_finite() && size > 0.0 {
            size
        } else {
            Config::default().size
        };
        Self::build(size, max_depth.clamp(1, MAX_SUPPORTED_DEPTH))
    }

    fn build(size: f32, max_depth: usize) -> Self {
        Self {
            size,
            max_depth,
            nodes: vec![QuadTreeNode::new(0.0, size, size, 0, None)],
            collisions: FxHashMap::default(),
        }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Extent covered by the root node.
    pub fn bounds(&self) -> Rect {
        self.nodes[ROOT as usize].bounds
    }

    pub fn contains(&self, id: &str) -> bool {
        self.collisions.contains_key(id)
    }

    /// Number of distinct colliders in the tree.
    pub fn len(&self) -> usize {
        self.collisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collisions.is_empty()
    }

    /// Stored references across the whole tree, counting a collider once per
    /// node that holds it.
    pub fn child_count(&self) -> usize {
        self.nodes[ROOT as usize].child_count
    }

    /// Depth and bounds of every node holding the collider `id`.
    pub fn nodes_holding(&self, id: &str) -> Vec<(usize, Rect)> {
        self.collisions
            .get(id)
            .map(|nodes| {
                nodes
                    .iter()
                    .map(|&idx| {
                        let node = &self.nodes[idx as usize];
                        (node.depth, node.bounds)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn all_node_bounding_boxes(&self, bounding_boxes: &mut Vec<Rect>) {
        bounding_boxes.extend(self.nodes.iter().map(|node| node.bounds));
    }
}

impl Default for QuadTree {
    fn default() -> Self {
        let config = Config::default();
        Self::build(config.size, config.max_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::Collider;

    fn boxed(id: &str, left: f32, width: f32, top: f32, height: f32) -> crate::ColliderRef {
        Collider::new(id, None, Some(Rect::new(left, width, top, height))).into_ref()
    }

    #[test]
    fn only_deepest_nodes_store_colliders() {
        let mut tree = QuadTree::new(1000.0, 4);
        tree.add_collision(&boxed("a", 10.0, 10.0, 990.0, 10.0));
        tree.add_collision(&boxed("b", 490.0, 40.0, 510.0, 40.0));
        tree.add_collision(&boxed("c", 0.0, 1000.0, 1000.0, 1000.0));

        for node in &tree.nodes {
            if !node.collisions.is_empty() {
                assert_eq!(node.depth, 3);
            }
        }
    }

    #[test]
    fn straddling_collider_is_stored_in_every_overlapped_leaf() {
        let mut tree = QuadTree::new(100.0, 2);
        // covers the centre of the root, so it touches all four quadrants
        tree.add_collision(&boxed("centre", 40.0, 20.0, 60.0, 20.0));

        assert_eq!(tree.nodes_holding("centre").len(), 4);
        assert_eq!(tree.child_count(), 4);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn child_counts_follow_removal() {
        let mut tree = QuadTree::new(100.0, 3);
        tree.add_collision(&boxed("a", 1.0, 2.0, 99.0, 2.0));
        tree.add_collision(&boxed("b", 40.0, 20.0, 60.0, 20.0));
        let before = tree.child_count();
        assert!(before >= 5);

        tree.remove_collision("b");
        assert_eq!(tree.child_count(), 1);
        for node in &tree.nodes {
            let below: usize = node
                .children
                .map(|children| {
                    children
                        .iter()
                        .map(|&child| tree.nodes[child as usize].child_count)
                        .sum()
                })
                .unwrap_or(0);
            assert_eq!(node.child_count, node.collisions.len() + below);
        }
    }

    #[test]
    fn reverse_index_matches_node_contents() {
        let mut tree = QuadTree::new(64.0, 4);
        for i in 0..8 {
            let offset = i as f32 * 7.0;
            tree.add_collision(&boxed(&format!("c{}", i), offset, 9.0, 60.0 - offset, 9.0));
        }
        tree.remove_collision("c3");

        for (id, nodes) in &tree.collisions {
            for &idx in nodes {
                assert!(tree.nodes[idx as usize].collisions.contains_key(id));
            }
        }
        for (idx, node) in tree.nodes.iter().enumerate() {
            for id in node.collisions.keys() {
                assert!(tree.collisions[id].contains(&(idx as u32)));
            }
        }
        assert!(!tree.contains("c3"));
    }

    #[test]
    fn depth_is_per_tree() {
        let shallow = QuadTree::new(100.0, 1);
        let deep = QuadTree::new(100.0, 6);
        assert_eq!(shallow.max_depth(), 1);
        assert_eq!(deep.max_depth(), 6);
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(QuadTree::with_config(Config {
            size: -1.0,
            max_depth: 3
        })
        .is_err());
        assert!(QuadTree::with_config(Config {
            size: 10.0,
            max_depth: 0
        })
        .is_err());
        assert!(QuadTree::with_config(Config::default()).is_ok());
    }
}
