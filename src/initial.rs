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

//! Greedy construction of a capacity-feasible initial column set.
//!
//! The heuristic routes each commodity completely along a single path. It
//! works in passes:
//!
//! 1. The first pass computes the shortest path of every commodity in the
//!    uncapacitated network and sorts the commodities by the total outdegree
//!    of the nodes on that path (the destination does not count). Commodities
//!    on paths through sparsely connected nodes are routed first.
//! 2. Each further pass starts with the full capacities and routes the
//!    commodities in the current order. If the path of a commodity would
//!    overload some nodes or arcs, these are excluded and the path is
//!    recomputed until a path fits. A commodity without any fitting path is
//!    moved to the front of the order.
//!
//! The heuristic succeeds as soon as a pass routes every commodity.

use crate::error::{Error, Result};
use crate::network::{CommodityId, Network, NodeId};
use crate::path::{ColumnSet, Path};
use crate::shortestpath::{label_correcting, Exclusions, ShortestPathTree};

use std::collections::HashMap;
use tracing::{debug, warn};

/// The greedy initial solution heuristic.
pub struct InitialSolutionBuilder<'a> {
    net: &'a Network,
    /// Maximal number of passes, including the first, uncapacitated pass.
    pub max_passes: usize,
}

/// Remaining capacities during one pass.
struct Residuals {
    nodes: Vec<f64>,
    arcs: Vec<f64>,
}

impl Residuals {
    fn new(net: &Network) -> Self {
        Residuals {
            nodes: net.nodes().map(|u| net.node(u).capacity).collect(),
            arcs: net.arcs().map(|a| net.arc(a).capacity).collect(),
        }
    }

    /// The nodes and arcs on the tree path to `dest` that cannot carry
    /// `demand` anymore.
    fn violations(&self, net: &Network, tree: &ShortestPathTree<f64>, dest: NodeId, demand: f64) -> Exclusions {
        let mut violated = Exclusions::new();
        for a in tree.walk_back(dest) {
            let v = net.head(a);
            if self.nodes[v.index()] - demand < 0.0 {
                violated.exclude_node(v);
            }
            if self.arcs[a.index()] - demand < 0.0 {
                violated.exclude_arc(a);
            }
        }
        violated
    }

    fn consume(&mut self, net: &Network, path: &Path, demand: f64) {
        for &a in path.arcs() {
            self.arcs[a.index()] -= demand;
            self.nodes[net.head(a).index()] -= demand;
        }
    }
}

impl<'a> InitialSolutionBuilder<'a> {
    pub fn new(net: &'a Network) -> Self {
        InitialSolutionBuilder { net, max_passes: 5 }
    }

    /// Compute one capacity-feasible path for every commodity.
    ///
    /// Returns [`Error::InfeasibleInstance`] if no pass within
    /// `max_passes` routes all commodities.
    pub fn build(&self) -> Result<ColumnSet> {
        let net = self.net;
        let cost = |a| net.arc(a).cost;
        let no_exclusions = Exclusions::new();

        // uncapacitated shortest path trees, one per origin
        let mut trees = HashMap::new();
        for k in net.commodities() {
            let origin = net.commodity(k).origin;
            trees
                .entry(origin)
                .or_insert_with(|| label_correcting(net, origin, cost, &no_exclusions));
        }

        let mut order = self.initial_order(&trees);
        let mut infeasible: Vec<CommodityId> = vec![];

        for pass in 1..self.max_passes {
            let mut residuals = Residuals::new(net);
            let mut paths: Vec<Option<Path>> = vec![None; net.num_commodities()];
            infeasible.clear();

            for &k in &order {
                let commodity = net.commodity(k);
                let (origin, dest, demand) = (commodity.origin, commodity.destination, commodity.demand);
                let mut excluded = Exclusions::new();
                let mut retry: Option<ShortestPathTree<f64>> = None;

                loop {
                    let tree = match retry.as_ref() {
                        Some(tree) => tree,
                        None => &trees[&origin],
                    };
                    if !tree.is_reachable(dest) {
                        warn!("Pass {}: no feasible path for commodity {}", pass, k);
                        infeasible.push(k);
                        break;
                    }

                    let violated = residuals.violations(net, tree, dest, demand);
                    if violated.is_empty() {
                        if let Some(path) = Path::from_tree(net, tree, dest) {
                            residuals.consume(net, &path, demand);
                            paths[k.index()] = Some(path);
                        }
                        break;
                    }

                    debug!(
                        "Pass {}: commodity {} blocked at nodes {:?} and arcs {:?}",
                        pass,
                        k,
                        violated.nodes().collect::<Vec<_>>(),
                        violated.arcs().collect::<Vec<_>>()
                    );
                    excluded.extend(&violated);
                    retry = Some(label_correcting(net, origin, cost, &excluded));
                }
            }

            // move infeasible commodities to the front, the last one first
            for &k in &infeasible {
                if let Some(pos) = order.iter().position(|&l| l == k) {
                    order.remove(pos);
                    order.insert(0, k);
                }
            }

            if infeasible.is_empty() {
                debug!("Pass {}: all {} commodities routed", pass, net.num_commodities());
                let mut columns = ColumnSet::new(net.num_commodities());
                for (k, path) in net.commodities().zip(paths) {
                    if let Some(path) = path {
                        columns.push(k, path);
                    }
                }
                return Ok(columns);
            }

            warn!("Pass {}: {} commodities could not be routed", pass, infeasible.len());
        }

        if self.max_passes <= 1 {
            infeasible = net.commodities().collect();
        }

        Err(Error::InfeasibleInstance {
            passes: self.max_passes,
            commodities: infeasible,
        })
    }

    /// Sort the commodities by the outdegree score of their uncapacitated
    /// shortest paths.
    ///
    /// The sort is stable. Unreachable commodities have score 0.
    fn initial_order(&self, trees: &HashMap<NodeId, ShortestPathTree<f64>>) -> Vec<CommodityId> {
        let net = self.net;
        let score = |k: CommodityId| -> usize {
            let commodity = net.commodity(k);
            trees[&commodity.origin]
                .walk_back(commodity.destination)
                .map(|a| net.node(net.tail(a)).outdegree)
                .sum()
        };

        let mut order: Vec<CommodityId> = net.commodities().collect();
        order.sort_by_key(|&k| score(k));
        debug!("Commodity order: {:?}", order.iter().map(|k| k.index()).collect::<Vec<_>>());
        order
    }
}
