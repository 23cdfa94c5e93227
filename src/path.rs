/*
 * Copyright (c) 2022 Frank Fischer <frank-fischer@shadow-soft.de>
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

//! Paths and the column set of the master problem.
//!
//! A path is stored as its ordered list of arcs together with its total
//! (original) cost. The node and arc incidence of a path for a commodity with
//! demand $d$ is $d$ for every node (except the origin) and arc on the path
//! and $0$ otherwise; it is derived from the arc list when needed.

use crate::network::{ArcId, CommodityId, Network, NodeId};
use crate::shortestpath::ShortestPathTree;

use num_traits::Float;

#[cfg(feature = "serialize")]
use serde_derive::{Deserialize, Serialize};

/// A path in a network.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Path {
    arcs: Vec<ArcId>,
    cost: f64,
}

impl Path {
    /// Create a path from its arcs in path order.
    pub fn new(net: &Network, arcs: Vec<ArcId>) -> Path {
        let cost = arcs.iter().map(|&a| net.arc(a).cost).sum();
        Path { arcs, cost }
    }

    /// Extract the path from the origin of `tree` to `dest`.
    ///
    /// The cost of the path is the original arc cost in `net`, not the
    /// label of the tree. Returns `None` if `dest` is unreachable.
    pub fn from_tree<D: Float>(net: &Network, tree: &ShortestPathTree<D>, dest: NodeId) -> Option<Path> {
        tree.path_to(dest).map(|arcs| Path::new(net, arcs))
    }

    pub fn arcs(&self) -> &[ArcId] {
        &self.arcs
    }

    /// The total cost of one unit of flow along this path.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Number of arcs on the path.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// The nodes visited by the path, excluding its first node.
    pub fn nodes<'a>(&'a self, net: &'a Network) -> impl Iterator<Item = NodeId> + 'a {
        self.arcs.iter().map(move |&a| net.head(a))
    }

    pub fn uses_arc(&self, a: ArcId) -> bool {
        self.arcs.contains(&a)
    }

    pub fn visits_node(&self, net: &Network, u: NodeId) -> bool {
        self.nodes(net).any(|v| v == u)
    }

    /// The flow this path contributes to node `u` when carrying `demand`.
    pub fn node_incidence(&self, net: &Network, u: NodeId, demand: f64) -> f64 {
        if self.visits_node(net, u) {
            demand
        } else {
            0.0
        }
    }

    /// The flow this path contributes to arc `a` when carrying `demand`.
    pub fn arc_incidence(&self, a: ArcId, demand: f64) -> f64 {
        if self.uses_arc(a) {
            demand
        } else {
            0.0
        }
    }
}

/// The paths offered to the master problem, grouped by commodity.
///
/// Paths are only ever appended. The position of a path in the set is the
/// index of its variable in the master problem: all columns of the first
/// commodity come first, then those of the second commodity and so on.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ColumnSet {
    columns: Vec<Vec<Path>>,
}

impl ColumnSet {
    /// Create an empty column set for `ncommodities` commodities.
    pub fn new(ncommodities: usize) -> Self {
        ColumnSet {
            columns: vec![vec![]; ncommodities],
        }
    }

    pub fn num_commodities(&self) -> usize {
        self.columns.len()
    }

    /// The total number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    /// Append a column for commodity `k` and return its index among the
    /// columns of `k`.
    pub fn push(&mut self, k: CommodityId, path: Path) -> usize {
        let cols = &mut self.columns[k.index()];
        cols.push(path);
        cols.len() - 1
    }

    pub fn columns(&self, k: CommodityId) -> &[Path] {
        &self.columns[k.index()]
    }

    pub fn contains(&self, k: CommodityId, path: &Path) -> bool {
        self.columns[k.index()].iter().any(|p| p.arcs == path.arcs)
    }

    /// Iterate over all columns in master variable order.
    ///
    /// Each item is the commodity, the index of the column among the columns
    /// of that commodity and the path.
    pub fn iter(&self) -> impl Iterator<Item = (CommodityId, usize, &Path)> + '_ {
        self.columns
            .iter()
            .enumerate()
            .flat_map(|(k, cols)| cols.iter().enumerate().map(move |(j, p)| (CommodityId::new(k), j, p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortestpath::{label_correcting, Exclusions};

    #[test]
    fn test_incidence() {
        let net = Network::new_with(|b| {
            let a = b.add_node("A", 0);
            let m = b.add_node("B", 0);
            let c = b.add_node("C", 0);
            b.add_arc(a, m, 1.0, 10.0);
            b.add_arc(m, c, 2.0, 10.0);
            b.add_arc(a, c, 5.0, 10.0);
        })
        .unwrap();

        let tree = label_correcting(&net, NodeId::new(0), |a| net.arc(a).cost, &Exclusions::new());
        let path = Path::from_tree(&net, &tree, NodeId::new(2)).unwrap();
        assert_eq!(path.arcs(), &[ArcId::new(0), ArcId::new(1)]);
        assert_eq!(path.cost(), 3.0);
        assert_eq!(path.nodes(&net).collect::<Vec<_>>(), vec![NodeId::new(1), NodeId::new(2)]);

        // the origin carries no incidence
        assert_eq!(path.node_incidence(&net, NodeId::new(0), 5.0), 0.0);
        assert_eq!(path.node_incidence(&net, NodeId::new(1), 5.0), 5.0);
        assert_eq!(path.arc_incidence(ArcId::new(2), 5.0), 0.0);
        assert_eq!(path.arc_incidence(ArcId::new(1), 5.0), 5.0);
    }

    #[test]
    fn test_column_order() {
        let net = Network::new_with(|b| {
            let a = b.add_node("A", 0);
            let c = b.add_node("C", 0);
            b.add_arc(a, c, 1.0, 1.0);
            b.add_arc(a, c, 2.0, 1.0);
        })
        .unwrap();

        let mut cols = ColumnSet::new(2);
        let p0 = Path::new(&net, vec![ArcId::new(0)]);
        let p1 = Path::new(&net, vec![ArcId::new(1)]);
        assert_eq!(cols.push(CommodityId::new(1), p0.clone()), 0);
        assert_eq!(cols.push(CommodityId::new(0), p1.clone()), 0);
        assert_eq!(cols.push(CommodityId::new(1), p1.clone()), 1);

        let order: Vec<_> = cols.iter().map(|(k, j, p)| (k.index(), j, p.cost())).collect();
        assert_eq!(order, vec![(0, 0, 2.0), (1, 0, 1.0), (1, 1, 2.0)]);
        assert_eq!(cols.num_columns(), 3);
        assert!(cols.contains(CommodityId::new(1), &p0));
        assert!(!cols.contains(CommodityId::new(0), &p0));
    }
}
