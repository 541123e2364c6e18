use super::types::{
    NodeList, NodeStack, QuadTreeNode, BOTTOM_LEFT, BOTTOM_RIGHT, ROOT, TOP_LEFT, TOP_RIGHT,
};
use super::QuadTree;
use crate::collider::ColliderRef;

use std::rc::Rc;

impl QuadTree {
    /// Inserts `collider`, first dropping any membership it already has, so
    /// calling this again after a move relocates it.
    ///
    /// A collider entirely outside the tree is kept at the root and a warning
    /// is logged. Queries still find it, without any spatial pruning.
    pub fn add_collision(&mut self, collider: &ColliderRef) {
        let (id, bounds) = {
            let collider = collider.borrow();
            (collider.id().to_owned(), *collider.bounds())
        };
        self.remove_collision(&id);

        let mut nodes_found = NodeList::new();
        let mut stack = NodeStack::new();
        stack.push(ROOT);
        while let Some(idx) = stack.pop() {
            let (intersects, depth) = {
                let node = &self.nodes[idx as usize];
                (node.bounds.intersects(&bounds), node.depth)
            };
            if !intersects {
                continue;
            }

            if depth + 1 >= self.max_depth {
                self.store(idx, &id, collider, &mut nodes_found);
                continue;
            }

            stack.extend(self.ensure_children(idx));
        }

        if nodes_found.is_empty() {
            tracing::warn!(collider = %id, bounds = %bounds, "collision is outside bounds of the tree");
            self.store(ROOT, &id, collider, &mut nodes_found);
        }

        self.collisions.insert(id, nodes_found);
    }

    /// Removes `id` from every node recorded for it. Unknown ids are ignored.
    pub fn remove_collision(&mut self, id: &str) {
        let Some(nodes) = self.collisions.remove(id) else {
            return;
        };
        for idx in nodes {
            if self.nodes[idx as usize].collisions.remove(id).is_some() {
                self.adjust_counts(idx, false);
            }
        }
    }

    /// Drops every collider and every node below the root.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        let root = &mut self.nodes[ROOT as usize];
        root.children = None;
        root.child_count = 0;
        root.collisions.clear();
        self.collisions.clear();
    }

    fn store(&mut self, idx: u32, id: &str, collider: &ColliderRef, nodes_found: &mut NodeList) {
        let previous = self.nodes[idx as usize]
            .collisions
            .insert(id.to_owned(), Rc::clone(collider));
        if previous.is_none() {
            self.adjust_counts(idx, true);
        }
        nodes_found.push(idx);
    }

    /// Walks from `idx` up to the root keeping `child_count` in step.
    fn adjust_counts(&mut self, idx: u32, added: bool) {
        let mut current = Some(idx);
        while let Some(node_idx) = current {
            let node = &mut self.nodes[node_idx as usize];
            if added {
                node.child_count += 1;
            } else {
                node.child_count = node.child_count.saturating_sub(1);
            }
            current = node.parent;
        }
    }

    /// Creates the four quadrants of `idx` on first use and returns them.
    fn ensure_children(&mut self, idx: u32) -> [u32; 4] {
        if let Some(children) = self.nodes[idx as usize].children {
            return children;
        }

        let (bounds, half_size, depth) = {
            let node = &self.nodes[idx as usize];
            (node.bounds, node.size() * 0.5, node.depth + 1)
        };
        let x = bounds.left();
        let y = bounds.top();
        let mid_x = x + half_size;
        let mid_y = y - half_size;

        let mut children = [0u32; 4];
        let corners = [
            (TOP_LEFT, x, y),
            (TOP_RIGHT, mid_x, y),
            (BOTTOM_LEFT, x, mid_y),
            (BOTTOM_RIGHT, mid_x, mid_y),
        ];
        for (slot, left, top) in corners {
            children[slot] = self.nodes.len() as u32;
            self.nodes
                .push(QuadTreeNode::new(left, top, half_size, depth, Some(idx)));
        }
        self.nodes[idx as usize].children = Some(children);
        children
    }
}
