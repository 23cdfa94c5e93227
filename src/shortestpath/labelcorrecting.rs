/*
 * Copyright (c) 2017, 2018, 2021, 2022 Frank Fischer <frank-fischer@shadow-soft.de>
 *
 * This program is free software: you can redistribute it and/or
 * modify it under the terms of the GNU General Public License as
 * published by the Free Software Foundation, either version 3 of the
 * License, or (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful, but
 * WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
 * General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see  <http://www.gnu.org/licenses/>
 */

//! A label-correcting shortest path search with node and arc exclusions.
//!
//! The search maintains a frontier of nodes whose label might still improve.
//! In each step the frontier node with the smallest label is removed and its
//! outgoing arcs are relaxed; a node is (re-)added to the frontier whenever
//! its label improves. For non-negative weights every node leaves the
//! frontier at most once and the search is Dijkstra's algorithm.
//!
//! Ties are broken deterministically: among nodes with equal labels the node
//! with the smallest index is extracted first, and a label is only replaced
//! by a strictly smaller one.
//!
//! # Example
//!
//! ```
//! use rs_colgen::Network;
//! use rs_colgen::shortestpath::{label_correcting, Exclusions};
//!
//! let net = Network::new_with(|b| {
//!     let a = b.add_node("A", 0);
//!     let m = b.add_node("B", 0);
//!     let c = b.add_node("C", 0);
//!     b.add_arc(a, m, 1.0, 10.0);
//!     b.add_arc(m, c, 1.0, 10.0);
//!     b.add_arc(a, c, 5.0, 10.0);
//! })
//! .unwrap();
//!
//! let a = net.node_by_name("A").unwrap();
//! let m = net.node_by_name("B").unwrap();
//! let c = net.node_by_name("C").unwrap();
//!
//! let tree = label_correcting(&net, a, |e| net.arc(e).cost, &Exclusions::new());
//! assert_eq!(tree.dist(c), 2.0);
//! assert_eq!(tree.pred_node(c), Some(m));
//!
//! let mut excluded = Exclusions::new();
//! excluded.exclude_node(m);
//! let tree = label_correcting(&net, a, |e| net.arc(e).cost, &excluded);
//! assert_eq!(tree.dist(c), 5.0);
//! assert_eq!(tree.pred_node(c), Some(a));
//! ```

use super::frontier::Frontier;
use super::{Exclusions, ShortestPathTree};
use crate::network::{ArcId, Network, NodeId};

use num_traits::Float;

/// Compute shortest paths from `src` to all nodes.
///
/// # Parameters
///
/// - `net`: the network
/// - `src`: the origin of all paths
/// - `weights`: the (non-negative) weight of each arc
/// - `excluded`: nodes and arcs that must not be used
///
/// Excluded nodes are disconnected, i.e. neither their incoming nor their
/// outgoing arcs are used. If `src` itself is excluded, only `src` is
/// reachable.
pub fn label_correcting<D, W>(net: &Network, src: NodeId, weights: W, excluded: &Exclusions) -> ShortestPathTree<D>
where
    D: Float,
    W: Fn(ArcId) -> D,
{
    let n = net.num_nodes();
    let mut tree: ShortestPathTree<D> = ShortestPathTree::new(n, src);
    let blocked_nodes = excluded.node_mask(n);
    let blocked_arcs = excluded.arc_mask(net.num_arcs());

    if blocked_nodes[src.index()] {
        return tree;
    }

    let mut frontier = Frontier::new(n);
    frontier.push_or_decrease(src.index(), &tree.labels);

    while let Some(uid) = frontier.pop_min(&tree.labels) {
        let du = tree.labels[uid];
        for &a in net.out_arcs(NodeId::new(uid)) {
            if blocked_arcs[a.index()] {
                continue;
            }
            let vid = net.head(a).index();
            if blocked_nodes[vid] {
                continue;
            }
            let dv = du + weights(a);
            if dv < tree.labels[vid] {
                tree.update(net, a, dv);
                frontier.push_or_decrease(vid, &tree.labels);
            }
        }
    }

    tree
}

#[cfg(test)]
mod tests {
    use super::label_correcting;
    use crate::network::{ArcId, Network, NodeId};
    use crate::shortestpath::Exclusions;

    /// A 2x3 grid with two equally short paths from 0 to 5.
    fn grid() -> Network {
        Network::new_with(|b| {
            let v: Vec<_> = (0..6).map(|i| b.add_node(format!("{}", i), 0)).collect();
            for &(u, w) in &[(0, 1), (1, 2), (0, 3), (3, 4), (4, 5), (2, 5), (1, 4)] {
                b.add_arc(v[u], v[w], 1.0, 1.0);
            }
        })
        .unwrap()
    }

    #[test]
    fn test_ties_prefer_small_node_ids() {
        let net = grid();
        let tree = label_correcting(&net, NodeId::new(0), |a| net.arc(a).cost, &Exclusions::new());
        assert_eq!(tree.dist(NodeId::new(5)), 3.0);
        // 2 and 4 both reach 5 with label 3, node 2 is extracted first
        assert_eq!(tree.pred_node(NodeId::new(5)), Some(NodeId::new(2)));
        assert_eq!(
            tree.path_to(NodeId::new(5)).unwrap(),
            vec![ArcId::new(0), ArcId::new(1), ArcId::new(5)]
        );

        // and the result is reproducible
        let again = label_correcting(&net, NodeId::new(0), |a| net.arc(a).cost, &Exclusions::new());
        assert_eq!(tree.labels(), again.labels());
        for u in net.nodes() {
            assert_eq!(tree.pred_arc(u), again.pred_arc(u));
        }
    }

    #[test]
    fn test_excluded_arc() {
        let net = grid();
        let mut excluded = Exclusions::new();
        excluded.exclude_arc(ArcId::new(5));
        let tree = label_correcting(&net, NodeId::new(0), |a| net.arc(a).cost, &excluded);
        assert_eq!(tree.dist(NodeId::new(5)), 3.0);
        assert_eq!(tree.pred_node(NodeId::new(5)), Some(NodeId::new(4)));
        assert_eq!(tree.dist(NodeId::new(2)), 2.0);
    }

    #[test]
    fn test_unreachable() {
        let net = grid();
        let mut excluded = Exclusions::new();
        excluded.exclude_node(NodeId::new(2));
        excluded.exclude_node(NodeId::new(4));
        let tree = label_correcting(&net, NodeId::new(0), |a| net.arc(a).cost, &excluded);
        assert!(!tree.is_reachable(NodeId::new(5)));
        assert_eq!(tree.dist(NodeId::new(5)), std::f64::INFINITY);
        assert_eq!(tree.pred_node(NodeId::new(5)), None);
        assert!(tree.path_to(NodeId::new(5)).is_none());
        assert_eq!(tree.walk_back(NodeId::new(5)).count(), 0);
        assert_eq!(tree.path_to(NodeId::new(0)), Some(vec![]));
    }

    #[test]
    fn test_excluded_origin() {
        let net = grid();
        let mut excluded = Exclusions::new();
        excluded.exclude_node(NodeId::new(0));
        let tree = label_correcting(&net, NodeId::new(0), |a| net.arc(a).cost, &excluded);
        assert_eq!(tree.dist(NodeId::new(0)), 0.0);
        assert!(net.nodes().skip(1).all(|u| !tree.is_reachable(u)));
    }
}
