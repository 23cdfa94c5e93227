// Copyright (c) 2016-2022 Frank Fischer <frank-fischer@shadow-soft.de>
//
// This program is free software: you can redistribute it and/or
// modify it under the terms of the GNU General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see  <http://www.gnu.org/licenses/>
//

//! Shortest path algorithms.
//!
//! All algorithms compute a [`ShortestPathTree`] rooted at some origin node:
//! the distance label, the predecessor node and the predecessor arc of every
//! node. Unreachable nodes have label `+∞` and no predecessor.

mod frontier;

pub mod labelcorrecting;
pub use self::labelcorrecting::label_correcting;

pub mod moorebellmanford;

use crate::network::{ArcId, Network, NodeId};
use num_traits::Float;

use std::collections::BTreeSet;

/// Result of a single-source shortest path computation.
#[derive(Clone, Debug)]
pub struct ShortestPathTree<D> {
    origin: NodeId,
    labels: Vec<D>,
    pred_nodes: Vec<Option<NodeId>>,
    pred_arcs: Vec<Option<ArcId>>,
}

impl<D> ShortestPathTree<D>
where
    D: Float,
{
    /// Create the initial tree: only the origin has a finite label.
    fn new(n: usize, origin: NodeId) -> Self {
        let mut labels = vec![D::infinity(); n];
        labels[origin.index()] = D::zero();
        ShortestPathTree {
            origin,
            labels,
            pred_nodes: vec![None; n],
            pred_arcs: vec![None; n],
        }
    }

    /// Set the label and predecessor of the head of `a`.
    fn update(&mut self, net: &Network, a: ArcId, label: D) {
        let v = net.head(a).index();
        self.labels[v] = label;
        self.pred_nodes[v] = Some(net.tail(a));
        self.pred_arcs[v] = Some(a);
    }

    pub fn origin(&self) -> NodeId {
        self.origin
    }

    /// The distance label of `u`, `+∞` if `u` is unreachable.
    pub fn dist(&self, u: NodeId) -> D {
        self.labels[u.index()]
    }

    pub fn labels(&self) -> &[D] {
        &self.labels
    }

    pub fn pred_node(&self, u: NodeId) -> Option<NodeId> {
        self.pred_nodes[u.index()]
    }

    pub fn pred_arc(&self, u: NodeId) -> Option<ArcId> {
        self.pred_arcs[u.index()]
    }

    pub fn is_reachable(&self, u: NodeId) -> bool {
        self.labels[u.index()].is_finite()
    }

    /// Iterate over the arcs of the tree path from `u` back to the origin.
    ///
    /// The first arc returned is the arc entering `u`. The iterator is empty
    /// if `u` is the origin or unreachable.
    pub fn walk_back(&self, u: NodeId) -> WalkBack<'_, D> {
        WalkBack { tree: self, cur: u }
    }

    /// Return the arcs of the path from the origin to `u` in path order.
    ///
    /// Returns `None` if `u` is unreachable.
    pub fn path_to(&self, u: NodeId) -> Option<Vec<ArcId>> {
        if !self.is_reachable(u) {
            return None;
        }
        let mut path: Vec<ArcId> = self.walk_back(u).collect();
        path.reverse();
        Some(path)
    }
}

/// Iterator over the predecessor arcs of a [`ShortestPathTree`].
pub struct WalkBack<'a, D> {
    tree: &'a ShortestPathTree<D>,
    cur: NodeId,
}

impl<'a, D> Iterator for WalkBack<'a, D> {
    type Item = ArcId;

    fn next(&mut self) -> Option<ArcId> {
        let a = self.tree.pred_arcs[self.cur.index()]?;
        self.cur = self.tree.pred_nodes[self.cur.index()]?;
        Some(a)
    }
}

/// Nodes and arcs to be ignored by a shortest path search.
///
/// An excluded node is disconnected from the network, i.e. no arc entering
/// or leaving it is used.
#[derive(Clone, Debug, Default)]
pub struct Exclusions {
    nodes: BTreeSet<NodeId>,
    arcs: BTreeSet<ArcId>,
}

impl Exclusions {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.arcs.is_empty()
    }

    /// Exclude node `u`, return `true` if it was not excluded before.
    pub fn exclude_node(&mut self, u: NodeId) -> bool {
        self.nodes.insert(u)
    }

    /// Exclude arc `a`, return `true` if it was not excluded before.
    pub fn exclude_arc(&mut self, a: ArcId) -> bool {
        self.arcs.insert(a)
    }

    pub fn contains_node(&self, u: NodeId) -> bool {
        self.nodes.contains(&u)
    }

    pub fn contains_arc(&self, a: ArcId) -> bool {
        self.arcs.contains(&a)
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    pub fn arcs(&self) -> impl Iterator<Item = ArcId> + '_ {
        self.arcs.iter().copied()
    }

    /// Add all nodes and arcs of `other`.
    pub fn extend(&mut self, other: &Exclusions) {
        self.nodes.extend(other.nodes.iter().copied());
        self.arcs.extend(other.arcs.iter().copied());
    }

    fn node_mask(&self, n: usize) -> Vec<bool> {
        let mut mask = vec![false; n];
        for u in &self.nodes {
            mask[u.index()] = true;
        }
        mask
    }

    fn arc_mask(&self, m: usize) -> Vec<bool> {
        let mut mask = vec![false; m];
        for a in &self.arcs {
            mask[a.index()] = true;
        }
        mask
    }
}
