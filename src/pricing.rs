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

//! The pricing problem.
//!
//! Given the dual values of the restricted master problem, the reduced cost
//! of a path $p$ for commodity $k$ is
//!
//! $$ d_k \sum_{a \in p} \bigl(c_a + \mu_{\text{head}(a)} + \lambda_a\bigr) - \pi_k, $$
//!
//! where $\mu$ and $\lambda$ are the node and arc capacity prices and
//! $\pi_k$ is the dual value of the convexity row of $k$. The path with
//! minimal reduced cost is a shortest path w.r.t. the reduced arc costs
//! $c_a + \mu_{\text{head}(a)} + \lambda_a$.

use crate::error::Result;
use crate::master::DualValues;
use crate::network::{CommodityId, Network, NodeId};
use crate::path::Path;
use crate::shortestpath::{label_correcting, moorebellmanford, Exclusions, ShortestPathTree};

use std::collections::HashMap;
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Result of one pricing round.
#[derive(Clone, Debug)]
pub struct PricingResult {
    /// The improving columns, at most one per commodity.
    pub columns: Vec<(CommodityId, Path)>,
    /// The minimal reduced cost over all commodities with a path.
    ///
    /// This is `+∞` if no commodity has a path.
    pub min_reduced_cost: f64,
}

/// Pricing of new columns by shortest path computations.
pub struct Pricing<'a> {
    net: &'a Network,
    /// A column is returned if its reduced cost is below
    /// `-tolerance * max(1, |π_k|)`.
    pub tolerance: f64,
}

impl<'a> Pricing<'a> {
    pub fn new(net: &'a Network) -> Self {
        Pricing { net, tolerance: 1e-6 }
    }

    /// The reduced cost of every arc.
    pub fn reduced_arc_costs(&self, duals: &DualValues) -> Vec<f64> {
        let net = self.net;
        net.arcs()
            .map(|a| net.arc(a).cost + duals.node(net.head(a)) + duals.arc(a))
            .collect()
    }

    /// Compute an improving column for every commodity that has one.
    ///
    /// Commodities whose destination is unreachable are skipped. The returned
    /// paths carry their original cost.
    pub fn price(&self, duals: &DualValues) -> Result<PricingResult> {
        let net = self.net;
        let weights = self.reduced_arc_costs(duals);
        let negative = weights.iter().any(|&w| w < 0.0);
        if negative {
            debug!("Negative reduced arc costs, use Moore-Bellman-Ford");
        }

        let mut origins: Vec<NodeId> = net.commodities().map(|k| net.commodity(k).origin).collect();
        origins.sort();
        origins.dedup();

        #[cfg(feature = "parallel")]
        let trees = origins
            .par_iter()
            .map(|&s| self.search(s, &weights, negative))
            .collect::<Result<Vec<_>>>()?;
        #[cfg(not(feature = "parallel"))]
        let trees = origins
            .iter()
            .map(|&s| self.search(s, &weights, negative))
            .collect::<Result<Vec<_>>>()?;

        let trees: HashMap<NodeId, ShortestPathTree<f64>> = origins.into_iter().zip(trees).collect();

        let mut columns = vec![];
        let mut min_reduced_cost = f64::INFINITY;
        for k in net.commodities() {
            let commodity = net.commodity(k);
            let tree = &trees[&commodity.origin];
            if !tree.is_reachable(commodity.destination) {
                warn!("Commodity {} has no path, skip it", k);
                continue;
            }

            let pi = duals.commodity(k);
            let rc = commodity.demand * tree.dist(commodity.destination) - pi;
            min_reduced_cost = min_reduced_cost.min(rc);
            if rc < -self.tolerance * pi.abs().max(1.0) {
                if let Some(path) = Path::from_tree(net, tree, commodity.destination) {
                    columns.push((k, path));
                }
            }
        }

        Ok(PricingResult {
            columns,
            min_reduced_cost,
        })
    }

    fn search(&self, src: NodeId, weights: &[f64], negative: bool) -> Result<ShortestPathTree<f64>> {
        if negative {
            moorebellmanford::directed(self.net, src, |a| weights[a.index()])
        } else {
            Ok(label_correcting(self.net, src, |a| weights[a.index()], &Exclusions::new()))
        }
    }
}
