use crate::geometry::{Rectangle, Shape};
use murmuration_data::Vector2;
use serde::{Deserialize, Serialize};

const ROOT: NodeId = 0;

type NodeId = usize;

/// Closed box stored as corners so that siblings share an exact split line.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Aabb {
    min: Vector2,
    max: Vector2,
}

impl Aabb {
    fn from_rect(rect: &Rectangle) -> Self {
        Self {
            min: Vector2::new(rect.left(), rect.top()),
            max: Vector2::new(rect.right(), rect.bottom()),
        }
    }

    fn to_rect(self) -> Rectangle {
        Rectangle::from_corners(self.min, self.max)
    }

    #[inline]
    fn mid(&self) -> Vector2 {
        Vector2::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    #[inline]
    fn contains(&self, p: Vector2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    fn intersects(&self, shape: &Shape) -> bool {
        match shape {
            Shape::Rectangle(rect) => {
                !(self.min.x > rect.right()
                    || self.max.x < rect.left()
                    || self.min.y > rect.bottom()
                    || self.max.y < rect.top())
            }
            Shape::Circle(circle) => {
                let cx = circle.x.clamp(self.min.x, self.max.x);
                let cy = circle.y.clamp(self.min.y, self.max.y);
                let dx = circle.x - cx;
                let dy = circle.y - cy;
                dx * dx + dy * dy <= circle.radius * circle.radius
            }
        }
    }

    /// Owning quarter of a contained point: NW=0, NE=1, SW=2, SE=3.
    ///
    /// Points on a split line go east / south, so the owner is unique and
    /// its closed box always contains the point.
    #[inline]
    fn quadrant_of(&self, p: Vector2) -> usize {
        let mid = self.mid();
        usize::from(p.y >= mid.y) * 2 + usize::from(p.x >= mid.x)
    }

    fn quarters(&self) -> [Aabb; 4] {
        let mid = self.mid();
        [
            // NW
            Aabb {
                min: self.min,
                max: mid,
            },
            // NE
            Aabb {
                min: Vector2::new(mid.x, self.min.y),
                max: Vector2::new(self.max.x, mid.y),
            },
            // SW
            Aabb {
                min: Vector2::new(self.min.x, mid.y),
                max: Vector2::new(mid.x, self.max.y),
            },
            // SE
            Aabb {
                min: mid,
                max: self.max,
            },
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Entry {
    index: usize,
    position: Vector2,
}

#[derive(Debug, Clone)]
struct Node {
    bounds: Aabb,
    depth: u32,
    points: Vec<Entry>,
    children: Option<[NodeId; 4]>,
}

impl Node {
    fn new(bounds: Aabb, depth: u32, capacity: usize) -> Self {
        Self {
            bounds,
            depth,
            points: Vec::with_capacity(capacity),
            children: None,
        }
    }
}

/// One node of the current partition, for debug overlays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartitionCell {
    pub boundary: Rectangle,
    pub depth: u32,
    /// Agents stored directly in this node (zero once subdivided).
    pub occupancy: usize,
    pub is_leaf: bool,
}

/// Region quadtree over agent indices, rebuilt from scratch every tick.
///
/// Nodes live in a flat arena and store `(agent index, position)` pairs, so
/// the tree never borrows or owns agents. Clearing keeps the arena's
/// allocations for the next rebuild.
///
/// # Invariants
/// - A leaf holds at most `capacity` agents unless it sits at `max_depth`
///   (coincident points would otherwise subdivide forever).
/// - A subdivided node holds no agents; its four children quarter it exactly.
/// - Each inserted agent is stored in exactly one node.
///
/// # Examples
/// ```
/// use murmuration_core::geometry::{Circle, Rectangle, Shape};
/// use murmuration_core::quadtree::QuadTree;
/// use murmuration_data::Vector2;
///
/// let mut tree = QuadTree::new(Rectangle::from_extent(100.0, 100.0), 4, 12);
/// tree.insert(0, Vector2::new(10.0, 10.0));
/// tree.insert(1, Vector2::new(90.0, 90.0));
///
/// let near = tree.query(&Shape::from(Circle::new(12.0, 12.0, 5.0)));
/// assert_eq!(near, vec![0]);
/// ```
#[derive(Debug, Clone)]
pub struct QuadTree {
    nodes: Vec<Node>,
    live: usize,
    capacity: usize,
    max_depth: u32,
    len: usize,
}

impl QuadTree {
    pub fn new(boundary: Rectangle, capacity: usize, max_depth: u32) -> Self {
        let capacity = capacity.max(1);
        Self {
            nodes: vec![Node::new(Aabb::from_rect(&boundary), 0, capacity)],
            live: 1,
            capacity,
            max_depth,
            len: 0,
        }
    }

    pub fn boundary(&self) -> Rectangle {
        self.nodes[ROOT].bounds.to_rect()
    }

    /// Whether `insert` would accept `position`. Same closed test as the root.
    #[inline]
    pub fn covers(&self, position: Vector2) -> bool {
        self.nodes[ROOT].bounds.contains(position)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of agents currently stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn node_count(&self) -> usize {
        self.live
    }

    pub fn is_divided(&self) -> bool {
        self.nodes[ROOT].children.is_some()
    }

    /// Deepest node level in use; 0 for an undivided tree.
    pub fn depth(&self) -> u32 {
        self.nodes[..self.live]
            .iter()
            .map(|n| n.depth)
            .max()
            .unwrap_or(0)
    }

    /// Drops every agent and child, leaving an empty root leaf.
    pub fn clear(&mut self) {
        let root = &mut self.nodes[ROOT];
        root.points.clear();
        root.children = None;
        self.live = 1;
        self.len = 0;
    }

    /// Clears the tree and moves its root to a new boundary.
    pub fn reset(&mut self, boundary: Rectangle) {
        self.clear();
        self.nodes[ROOT].bounds = Aabb::from_rect(&boundary);
    }

    /// Clears and reinserts every position, using slice order as the index.
    ///
    /// Returns how many positions fell outside the boundary.
    pub fn rebuild<I>(&mut self, positions: I) -> usize
    where
        I: IntoIterator<Item = Vector2>,
    {
        self.clear();
        positions
            .into_iter()
            .enumerate()
            .filter(|&(index, position)| !self.insert(index, position))
            .count()
    }

    /// Inserts agent `index` at `position`.
    ///
    /// Returns `false`, leaving the tree untouched, when the position lies
    /// outside the root boundary (or is not finite).
    pub fn insert(&mut self, index: usize, position: Vector2) -> bool {
        if !self.covers(position) {
            return false;
        }
        self.place(ROOT, Entry { index, position });
        self.len += 1;
        true
    }

    fn place(&mut self, start: NodeId, entry: Entry) {
        let mut id = start;
        loop {
            let node = &self.nodes[id];
            if let Some(children) = node.children {
                id = children[node.bounds.quadrant_of(entry.position)];
                continue;
            }
            if node.points.len() < self.capacity || node.depth >= self.max_depth {
                self.nodes[id].points.push(entry);
                return;
            }
            self.subdivide(id);
        }
    }

    fn subdivide(&mut self, id: NodeId) {
        debug_assert!(self.nodes[id].children.is_none());
        let bounds = self.nodes[id].bounds;
        let depth = self.nodes[id].depth + 1;
        let quarters = bounds.quarters();
        let children = [
            self.alloc(quarters[0], depth),
            self.alloc(quarters[1], depth),
            self.alloc(quarters[2], depth),
            self.alloc(quarters[3], depth),
        ];
        self.nodes[id].children = Some(children);

        let mut moved = std::mem::take(&mut self.nodes[id].points);
        for entry in moved.drain(..) {
            self.place(id, entry);
        }
        self.nodes[id].points = moved;
    }

    fn alloc(&mut self, bounds: Aabb, depth: u32) -> NodeId {
        let id = self.live;
        self.live += 1;
        if let Some(node) = self.nodes.get_mut(id) {
            node.bounds = bounds;
            node.depth = depth;
            node.points.clear();
            node.children = None;
        } else {
            self.nodes.push(Node::new(bounds, depth, self.capacity));
        }
        id
    }

    /// Indices of all agents whose position lies inside `shape`.
    pub fn query(&self, shape: &Shape) -> Vec<usize> {
        let mut found = Vec::new();
        self.query_into(shape, &mut found);
        found
    }

    pub fn query_into(&self, shape: &Shape, out: &mut Vec<usize>) {
        self.query_filtered(shape, |_| true, out);
    }

    /// Like [`QuadTree::query_into`] but keeps only indices accepted by
    /// `filter`. The filter runs on in-shape points only and never affects
    /// which subtrees are pruned.
    pub fn query_filtered<F>(&self, shape: &Shape, filter: F, out: &mut Vec<usize>)
    where
        F: Fn(usize) -> bool,
    {
        self.collect(ROOT, shape, &filter, out);
    }

    fn collect<F>(&self, id: NodeId, shape: &Shape, filter: &F, out: &mut Vec<usize>)
    where
        F: Fn(usize) -> bool,
    {
        let node = &self.nodes[id];
        if !node.bounds.intersects(shape) {
            return;
        }
        if let Some(children) = node.children {
            for child in children {
                self.collect(child, shape, filter, out);
            }
            return;
        }
        out.extend(
            node.points
                .iter()
                .filter(|e| shape.contains(e.position) && filter(e.index))
                .map(|e| e.index),
        );
    }

    /// Every live node, parents before children.
    pub fn partition(&self) -> Vec<PartitionCell> {
        let mut cells = Vec::with_capacity(self.live);
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            cells.push(PartitionCell {
                boundary: node.bounds.to_rect(),
                depth: node.depth,
                occupancy: node.points.len(),
                is_leaf: node.children.is_none(),
            });
            if let Some(children) = node.children {
                stack.extend(children.iter().rev());
            }
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Circle;
    use std::collections::HashSet;

    fn world() -> Rectangle {
        Rectangle::from_extent(100.0, 100.0)
    }

    fn check_invariants(tree: &QuadTree) {
        let mut stored = 0;
        for node in &tree.nodes[..tree.live] {
            match node.children {
                Some(children) => {
                    assert!(node.points.is_empty(), "divided node holds points");
                    let quarters = node.bounds.quarters();
                    for (child, quarter) in children.iter().zip(quarters.iter()) {
                        assert_eq!(tree.nodes[*child].bounds, *quarter);
                    }
                }
                None => {
                    if node.depth < tree.max_depth {
                        assert!(node.points.len() <= tree.capacity);
                    }
                    for entry in &node.points {
                        assert!(node.bounds.contains(entry.position));
                    }
                    stored += node.points.len();
                }
            }
        }
        assert_eq!(stored, tree.len());
    }

    #[test]
    fn test_insert_outside_is_rejected() {
        let mut tree = QuadTree::new(world(), 4, 8);
        assert!(!tree.insert(0, Vector2::new(-1.0, 50.0)));
        assert!(!tree.insert(1, Vector2::new(f64::NAN, 50.0)));
        assert!(tree.is_empty());
        assert!(tree.insert(2, Vector2::new(100.0, 100.0)));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_subdivides_past_capacity() {
        let mut tree = QuadTree::new(world(), 2, 8);
        tree.insert(0, Vector2::new(10.0, 10.0));
        tree.insert(1, Vector2::new(90.0, 10.0));
        assert!(!tree.is_divided());
        tree.insert(2, Vector2::new(10.0, 90.0));
        assert!(tree.is_divided());
        assert_eq!(tree.node_count(), 5);
        check_invariants(&tree);
    }

    #[test]
    fn test_center_point_lands_in_south_east() {
        let mut tree = QuadTree::new(world(), 1, 8);
        tree.insert(0, Vector2::new(10.0, 10.0));
        tree.insert(1, Vector2::new(50.0, 50.0));
        let children = tree.nodes[ROOT].children.unwrap();
        let se = &tree.nodes[children[3]];
        assert_eq!(se.points.len(), 1);
        assert_eq!(se.points[0].index, 1);
        for &other in &children[..3] {
            assert!(tree.nodes[other].points.iter().all(|e| e.index != 1));
        }
        check_invariants(&tree);
    }

    #[test]
    fn test_coincident_points_stop_at_max_depth() {
        let mut tree = QuadTree::new(world(), 1, 5);
        for i in 0..20 {
            assert!(tree.insert(i, Vector2::new(33.0, 33.0)));
        }
        assert_eq!(tree.depth(), 5);
        let found = tree.query(&Shape::from(Circle::new(33.0, 33.0, 0.0)));
        assert_eq!(found.len(), 20);
        check_invariants(&tree);
    }

    #[test]
    fn test_query_full_bounds_returns_everything_once() {
        let mut tree = QuadTree::new(world(), 4, 10);
        for i in 0..50 {
            let x = (i * 37 % 100) as f64;
            let y = (i * 53 % 100) as f64;
            assert!(tree.insert(i, Vector2::new(x, y)));
        }
        let found = tree.query(&Shape::from(world()));
        assert_eq!(found.len(), 50);
        let unique: HashSet<_> = found.into_iter().collect();
        assert_eq!(unique.len(), 50);
        check_invariants(&tree);
    }

    #[test]
    fn test_query_filter_does_not_prune() {
        let mut tree = QuadTree::new(world(), 1, 8);
        for i in 0..8 {
            tree.insert(i, Vector2::new(5.0 + i as f64 * 10.0, 50.0));
        }
        let mut out = Vec::new();
        tree.query_filtered(&Shape::from(world()), |i| i % 2 == 0, &mut out);
        out.sort_unstable();
        assert_eq!(out, vec![0, 2, 4, 6]);
    }

    #[test]
    fn test_clear_resets_to_empty_leaf() {
        let mut tree = QuadTree::new(world(), 1, 8);
        for i in 0..10 {
            tree.insert(i, Vector2::new(i as f64 * 9.0, i as f64 * 9.0));
        }
        assert!(tree.node_count() > 1);
        tree.clear();
        assert_eq!(tree.node_count(), 1);
        assert!(!tree.is_divided());
        assert!(tree.query(&Shape::from(world())).is_empty());

        // Arena slots are reused without leaking stale points.
        tree.insert(0, Vector2::new(1.0, 1.0));
        tree.insert(1, Vector2::new(2.0, 2.0));
        assert_eq!(tree.query(&Shape::from(world())).len(), 2);
        check_invariants(&tree);
    }

    #[test]
    fn test_rebuild_counts_outside_points() {
        let mut tree = QuadTree::new(world(), 4, 8);
        let outside = tree.rebuild(vec![
            Vector2::new(1.0, 1.0),
            Vector2::new(200.0, 1.0),
            Vector2::new(99.0, 99.0),
        ]);
        assert_eq!(outside, 1);
        let mut found = tree.query(&Shape::from(world()));
        found.sort_unstable();
        assert_eq!(found, vec![0, 2]);
    }

    #[test]
    fn test_partition_lists_every_node() {
        let mut tree = QuadTree::new(world(), 1, 8);
        tree.insert(0, Vector2::new(10.0, 10.0));
        tree.insert(1, Vector2::new(90.0, 90.0));
        let cells = tree.partition();
        assert_eq!(cells.len(), 5);
        assert_eq!(cells[0].depth, 0);
        assert!(!cells[0].is_leaf);
        assert_eq!(cells.iter().map(|c| c.occupancy).sum::<usize>(), 2);
    }
}
