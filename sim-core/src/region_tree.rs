//! Quadrant-subdividing spatial index over 2-D points.
//!
//! Nodes live in a flat arena and refer to their children by [`NodeId`].
//! [`RegionTree::clear`] only resets the root and rewinds the arena cursor,
//! so node slots (and their point buffers) are recycled by the next rebuild
//! instead of being freed and allocated again every tick.

use crate::geometry::{Quadrant, Rectangle, Shape};
use crate::types::NodeId;
use glam::DVec2;

const ROOT: NodeId = 0;

/// Deepest level a node is subdivided at. Points routed below it (piles of
/// coincident positions) stay in the node even past capacity.
pub const MAX_DEPTH: usize = 64;

/// A position stored in the tree together with an optional payload.
///
/// The simulation uses a [`crate::types::ParticleId`] payload. A point without
/// a payload is legal; consumers skip it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point<T> {
    pub pos: DVec2,
    pub payload: Option<T>,
}

impl<T> Point<T> {
    pub fn new(pos: DVec2, payload: T) -> Self {
        Self {
            pos,
            payload: Some(payload),
        }
    }

    pub fn bare(pos: DVec2) -> Self {
        Self { pos, payload: None }
    }
}

#[derive(Debug)]
pub struct RegionNode<T> {
    pub boundary: Rectangle,
    pub points: Vec<Point<T>>,
    /// Children in [`Quadrant::ALL`] order once subdivided.
    pub children: Option<[NodeId; 4]>,
}

impl<T> RegionNode<T> {
    fn new(boundary: Rectangle, capacity: usize) -> Self {
        Self {
            boundary,
            points: Vec::with_capacity(capacity),
            children: None,
        }
    }

    fn reset(&mut self, boundary: Rectangle) {
        self.boundary = boundary;
        self.points.clear();
        self.children = None;
    }

    pub fn is_subdivided(&self) -> bool {
        self.children.is_some()
    }
}

#[derive(Debug)]
pub struct RegionTree<T> {
    nodes: Vec<RegionNode<T>>,
    /// Number of arena slots in use since the last clear. Slots past this
    /// cursor are stale and only kept for reuse.
    live: usize,
    capacity: usize,
}

impl<T: Copy + PartialEq> RegionTree<T> {
    /// Creates an empty tree covering `boundary`.
    ///
    /// ### Panics
    /// Panics if `capacity` is zero, since a node could then never hold a point.
    pub fn new(boundary: Rectangle, capacity: usize) -> Self {
        assert!(capacity > 0, "region tree capacity must be at least 1");
        Self {
            nodes: vec![RegionNode::new(boundary, capacity)],
            live: 1,
            capacity,
        }
    }

    pub fn boundary(&self) -> Rectangle {
        self.nodes[ROOT].boundary
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn root(&self) -> &RegionNode<T> {
        &self.nodes[ROOT]
    }

    /// Returns a live node, or `None` for ids not allocated since the last clear.
    pub fn node(&self, id: NodeId) -> Option<&RegionNode<T>> {
        self.nodes[..self.live].get(id)
    }

    /// Number of nodes reachable from the root.
    pub fn node_count(&self) -> usize {
        self.live
    }

    /// Inserts a point, subdividing full nodes on the way down.
    ///
    /// A node that can no longer be split (at [`MAX_DEPTH`], or with extents
    /// too small to halve) keeps the point even when full, so every point
    /// inside the root boundary is accepted.
    ///
    /// Returns `false` if the point lies outside the root boundary (this
    /// includes non-finite coordinates).
    pub fn insert(&mut self, point: Point<T>) -> bool {
        if !self.nodes[ROOT].boundary.contains_point(point.pos) {
            return false;
        }

        let mut id = ROOT;
        let mut depth = 1;
        loop {
            let node = &mut self.nodes[id];
            let splittable = depth < MAX_DEPTH && node.boundary.is_divisible();
            if node.points.len() < self.capacity || (node.children.is_none() && !splittable) {
                node.points.push(point);
                return true;
            }

            let children = match node.children {
                Some(children) => children,
                None => self.subdivide(id),
            };

            // First child (in NE, NW, SE, SW order) whose boundary accepts the point.
            match children
                .into_iter()
                .find(|&c| self.nodes[c].boundary.contains_point(point.pos))
            {
                Some(child) => {
                    id = child;
                    depth += 1;
                }
                // Rounding left a sliver no child covers; the node itself does.
                None => {
                    self.nodes[id].points.push(point);
                    return true;
                }
            }
        }
    }

    /// Shorthand for inserting a position with a payload.
    pub fn insert_pos(&mut self, pos: DVec2, payload: T) -> bool {
        self.insert(Point::new(pos, payload))
    }

    /// Collects every stored point inside `range` into a fresh vector.
    pub fn query(&self, range: &Shape) -> Vec<Point<T>> {
        let mut found = Vec::new();
        self.query_into(range, &mut found);
        found
    }

    /// Like [`RegionTree::query`], appending to a caller-owned buffer.
    ///
    /// Subtrees whose boundary does not intersect `range` are skipped.
    pub fn query_into(&self, range: &Shape, found: &mut Vec<Point<T>>) {
        self.query_node(ROOT, range, found);
    }

    fn query_node(&self, id: NodeId, range: &Shape, found: &mut Vec<Point<T>>) {
        let node = &self.nodes[id];
        if !range.intersects_rect(&node.boundary) {
            return;
        }

        found.extend(
            node.points
                .iter()
                .filter(|p| range.contains_point(p.pos))
                .copied(),
        );

        if let Some(children) = node.children {
            for child in children {
                self.query_node(child, range, found);
            }
        }
    }

    /// Drops all points and children. Arena slots are kept for reuse.
    pub fn clear(&mut self) {
        let boundary = self.nodes[ROOT].boundary;
        self.nodes[ROOT].reset(boundary);
        self.live = 1;
    }

    /// Removes one stored point equal to `point` (same position and payload).
    ///
    /// Nodes are never merged back; a node that drops below capacity simply
    /// accepts the next insertion routed through it.
    pub fn remove(&mut self, point: &Point<T>) -> bool {
        self.remove_at(ROOT, point)
    }

    fn remove_at(&mut self, id: NodeId, point: &Point<T>) -> bool {
        let node = &mut self.nodes[id];
        if !node.boundary.contains_point(point.pos) {
            return false;
        }

        if let Some(i) = node.points.iter().position(|p| p == point) {
            node.points.remove(i);
            return true;
        }

        match node.children {
            Some(children) => children.into_iter().any(|c| self.remove_at(c, point)),
            None => false,
        }
    }

    /// Number of points stored in the whole tree.
    pub fn total_count(&self) -> usize {
        // Every live slot was attached to its parent when allocated, so the
        // live prefix of the arena is exactly the reachable tree.
        self.nodes[..self.live].iter().map(|n| n.points.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }

    /// Number of levels, counting the root alone as depth 1.
    pub fn depth(&self) -> usize {
        self.depth_of(ROOT)
    }

    fn depth_of(&self, id: NodeId) -> usize {
        match self.nodes[id].children {
            Some(children) => 1 + children.into_iter().map(|c| self.depth_of(c)).max().unwrap_or(0),
            None => 1,
        }
    }

    fn subdivide(&mut self, id: NodeId) -> [NodeId; 4] {
        let boundary = self.nodes[id].boundary;
        let children = Quadrant::ALL.map(|q| self.alloc(boundary.quadrant(q)));
        self.nodes[id].children = Some(children);
        children
    }

    fn alloc(&mut self, boundary: Rectangle) -> NodeId {
        let id = self.live;
        if let Some(slot) = self.nodes.get_mut(id) {
            slot.reset(boundary);
        } else {
            self.nodes.push(RegionNode::new(boundary, self.capacity));
        }
        self.live += 1;
        id
    }
}
