//! Photon map storage: an unbalanced 3-d tree.
//!
//! Photons are inserted in arrival order and never removed. The split axis
//! cycles x, y, z with depth; a photon whose coordinate on the split axis is
//! strictly less than the node's goes left, everything else (ties included)
//! goes right.
//!
//! A query walks to the nearest stored photon and also returns every photon
//! it touched on the way. Those visited photons are the candidate set the
//! radiance estimator filters by distance; photons near the query point that
//! the nearest-neighbour walk prunes are deliberately not part of it.

use std::fmt;
use std::iter::FromIterator;

use lux_math::{axis_component, Vec3};

use crate::photon::Photon;

/// One stored photon and its two subtrees.
///
/// Nodes carry no recursive `Clone`, `PartialEq` or `Drop`; a tree built from
/// sorted input is a chain as long as the photon count, so whole-tree
/// operations live on [`KdTree`] and walk it with an explicit stack.
pub struct KdNode {
    pub photon: Photon,
    pub left: Option<Box<KdNode>>,
    pub right: Option<Box<KdNode>>,
}

impl KdNode {
    fn leaf(photon: Photon) -> Self {
        Self {
            photon,
            left: None,
            right: None,
        }
    }

    /// Coordinate this node splits on at `depth`.
    #[inline]
    pub fn split(&self, depth: usize) -> f32 {
        axis_component(self.photon.position, depth)
    }
}

impl fmt::Debug for KdNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KdNode")
            .field("photon", &self.photon)
            .field("left", &self.left.is_some())
            .field("right", &self.right.is_some())
            .finish()
    }
}

/// Result of a [`KdTree::query`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Neighbourhood<'a> {
    /// Closest stored photon, `None` only for an empty tree
    pub nearest: Option<&'a Photon>,

    /// Every photon examined during the search, in visiting order
    pub visited: Vec<&'a Photon>,
}

impl<'a> Neighbourhood<'a> {
    /// Visited photons within `radius` of `point` (inclusive), with their distances.
    pub fn within(&self, point: Vec3, radius: f32) -> impl Iterator<Item = (&'a Photon, f32)> + '_ {
        self.visited
            .iter()
            .map(move |photon| (*photon, photon.position.distance(point)))
            .filter(move |(_, distance)| *distance <= radius)
    }
}

/// A pending step of the nearest-neighbour walk.
enum Pending<'a> {
    /// Subtree on the query point's side of a split: always searched
    Near(&'a KdNode, usize),
    /// Subtree across a split, searched only if the split plane is closer
    /// than the best photon found once its turn comes
    Far(&'a KdNode, usize, f32),
}

/// Point k-d tree of photons.
#[derive(Default)]
pub struct KdTree {
    root: Option<Box<KdNode>>,
    len: usize,
}

impl KdTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a photon at `position` with `intensity`.
    pub fn insert(&mut self, position: Vec3, intensity: f32) {
        self.insert_photon(Photon::new(position, intensity));
    }

    /// Insert a photon, descending from the root until an empty slot.
    pub fn insert_photon(&mut self, photon: Photon) {
        let mut slot = &mut self.root;
        let mut depth = 0;

        while let Some(node) = slot {
            slot = if axis_component(photon.position, depth) < node.split(depth) {
                &mut node.left
            } else {
                &mut node.right
            };
            depth += 1;
        }

        *slot = Some(Box::new(KdNode::leaf(photon)));
        self.len += 1;
    }

    /// Find the nearest photon to `point`, along with every photon visited
    /// while looking for it.
    ///
    /// The walk descends the near side of each split first and only crosses
    /// to the far side when the split plane is strictly closer than the best
    /// photon found so far.
    pub fn query(&self, point: Vec3) -> Neighbourhood<'_> {
        let mut result = Neighbourhood::default();
        let mut min_distance = f32::INFINITY;

        let mut stack = Vec::new();
        if let Some(root) = self.root.as_deref() {
            stack.push(Pending::Near(root, 0));
        }

        while let Some(pending) = stack.pop() {
            let (node, depth) = match pending {
                Pending::Near(node, depth) => (node, depth),
                Pending::Far(node, depth, plane_distance) => {
                    if plane_distance >= min_distance {
                        continue;
                    }
                    (node, depth)
                }
            };

            result.visited.push(&node.photon);
            let distance = node.photon.position.distance(point);
            if result.nearest.is_none() || distance < min_distance {
                result.nearest = Some(&node.photon);
                min_distance = distance;
            }

            let split = node.split(depth);
            let coordinate = axis_component(point, depth);
            let (near, far) = if coordinate < split {
                (&node.left, &node.right)
            } else {
                (&node.right, &node.left)
            };

            // Far goes under near so it is decided after the whole near subtree
            if let Some(far) = far.as_deref() {
                stack.push(Pending::Far(far, depth + 1, (coordinate - split).abs()));
            }
            if let Some(near) = near.as_deref() {
                stack.push(Pending::Near(near, depth + 1));
            }
        }

        result
    }

    /// Nearest stored photon to `point`.
    pub fn nearest(&self, point: Vec3) -> Option<&Photon> {
        self.query(point).nearest
    }

    pub fn root(&self) -> Option<&KdNode> {
        self.root.as_deref()
    }

    /// Number of stored photons.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels (0 for an empty tree).
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(&KdNode, usize)> = self.root().map(|n| (n, 1)).into_iter().collect();
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            for child in [&node.left, &node.right].into_iter().flatten() {
                stack.push((&**child, level + 1));
            }
        }
        deepest
    }

    /// All stored photons in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &Photon> + '_ {
        let mut stack: Vec<&KdNode> = self.root().into_iter().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            if let Some(right) = node.right.as_deref() {
                stack.push(right);
            }
            if let Some(left) = node.left.as_deref() {
                stack.push(left);
            }
            Some(&node.photon)
        })
    }
}

/// Post-order step of [`KdTree::clone`].
enum CloneStep<'a> {
    Enter(&'a KdNode),
    Exit(&'a KdNode),
}

impl Clone for KdTree {
    fn clone(&self) -> Self {
        let mut work: Vec<CloneStep<'_>> = self.root().map(CloneStep::Enter).into_iter().collect();
        // Finished copies of subtrees, left pushed before right
        let mut built: Vec<Box<KdNode>> = Vec::new();

        while let Some(step) = work.pop() {
            match step {
                CloneStep::Enter(node) => {
                    work.push(CloneStep::Exit(node));
                    if let Some(right) = node.right.as_deref() {
                        work.push(CloneStep::Enter(right));
                    }
                    if let Some(left) = node.left.as_deref() {
                        work.push(CloneStep::Enter(left));
                    }
                }
                CloneStep::Exit(node) => {
                    let right = node.right.as_ref().and_then(|_| built.pop());
                    let left = node.left.as_ref().and_then(|_| built.pop());
                    built.push(Box::new(KdNode {
                        photon: node.photon,
                        left,
                        right,
                    }));
                }
            }
        }

        Self {
            root: built.pop(),
            len: self.len,
        }
    }
}

impl PartialEq for KdTree {
    /// Same shape with the same photon in every position.
    fn eq(&self, other: &Self) -> bool {
        if self.len != other.len {
            return false;
        }

        let mut stack = vec![(self.root(), other.root())];
        while let Some(pair) = stack.pop() {
            match pair {
                (None, None) => {}
                (Some(a), Some(b)) => {
                    if a.photon != b.photon {
                        return false;
                    }
                    stack.push((a.left.as_deref(), b.left.as_deref()));
                    stack.push((a.right.as_deref(), b.right.as_deref()));
                }
                _ => return false,
            }
        }
        true
    }
}

impl fmt::Debug for KdTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KdTree")
            .field("len", &self.len)
            .field("depth", &self.depth())
            .field("root", &self.root())
            .finish()
    }
}

impl Drop for KdTree {
    fn drop(&mut self) {
        let mut stack: Vec<Box<KdNode>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

impl Extend<Photon> for KdTree {
    fn extend<I: IntoIterator<Item = Photon>>(&mut self, iter: I) {
        for photon in iter {
            self.insert_photon(photon);
        }
    }
}

impl FromIterator<Photon> for KdTree {
    fn from_iter<I: IntoIterator<Item = Photon>>(iter: I) -> Self {
        let mut tree = KdTree::new();
        tree.extend(iter);
        tree
    }
}
