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

//! The restricted master problem.
//!
//! Given a [`ColumnSet`] the restricted master problem is the linear program
//!
//! $$ \begin{aligned}
//!   \min\ & \sum_{k} \sum_{p \in P_k} d_k c_p x_p \\\\
//!   \text{s.t.}\ & \sum_{p \in P_k} x_p = 1 && \forall k \\\\
//!   & \sum_k \sum_{p \in P_k \colon v \in p} d_k x_p \le u_v && \forall v \\\\
//!   & \sum_k \sum_{p \in P_k \colon a \in p} d_k x_p \le u_a && \forall a \\\\
//!   & x_p \ge 0
//! \end{aligned} $$
//!
//! where $d_k$ is the demand of commodity $k$ and $c_p$ the cost of path
//! $p$. The bound $x_p \le 1$ is implied by the convexity rows and is not
//! passed to the solver. Node and arc rows with infinite capacity or without
//! any coefficient are omitted.

use crate::error::{Error, Result};
use crate::lp::{mps, ConstraintSense, LpModel, LpSolver, SolutionState, SolverError};
use crate::network::{ArcId, CommodityId, Network, NodeId};
use crate::path::ColumnSet;

use std::path::PathBuf;
use tracing::debug;

#[cfg(feature = "serialize")]
use serde_derive::{Deserialize, Serialize};

/// Dual values of the master problem.
///
/// `commodities` contains the dual value of the convexity row of each
/// commodity. `nodes` and `arcs` contain the price of one unit of node or
/// arc capacity; these are non-negative and positive only for binding
/// capacity rows.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct DualValues {
    pub commodities: Vec<f64>,
    pub nodes: Vec<f64>,
    pub arcs: Vec<f64>,
}

impl DualValues {
    /// All dual values zero.
    pub fn zeros(net: &Network) -> Self {
        DualValues {
            commodities: vec![0.0; net.num_commodities()],
            nodes: vec![0.0; net.num_nodes()],
            arcs: vec![0.0; net.num_arcs()],
        }
    }

    pub fn commodity(&self, k: CommodityId) -> f64 {
        self.commodities[k.index()]
    }

    pub fn node(&self, u: NodeId) -> f64 {
        self.nodes[u.index()]
    }

    pub fn arc(&self, a: ArcId) -> f64 {
        self.arcs[a.index()]
    }
}

/// Solution of a restricted master problem.
#[derive(Clone, Debug)]
pub struct MasterSolution {
    pub objective: f64,
    /// The flow fraction of each column, indexed like the column set.
    pub flows: Vec<Vec<f64>>,
    pub duals: DualValues,
}

#[derive(Clone, Copy, Debug)]
enum Row {
    Convexity(CommodityId),
    Node(NodeId),
    Arc(ArcId),
}

/// The restricted master problem over a network.
pub struct MasterProblem<'a> {
    net: &'a Network,
    /// Directory to which each model is written before it is solved.
    pub dump_dir: Option<PathBuf>,
    num_solves: usize,
}

impl<'a> MasterProblem<'a> {
    pub fn new(net: &'a Network) -> Self {
        MasterProblem {
            net,
            dump_dir: None,
            num_solves: 0,
        }
    }

    /// Number of calls to `solve` so far.
    pub fn num_solves(&self) -> usize {
        self.num_solves
    }

    /// Build the LP of the restricted master problem over `columns`.
    pub fn model(&self, columns: &ColumnSet) -> LpModel {
        self.build(columns).0
    }

    fn build(&self, columns: &ColumnSet) -> (LpModel, Vec<Row>) {
        let net = self.net;
        let mut lp = LpModel::new(format!("master{}", self.num_solves));

        let mut convexity = vec![vec![]; net.num_commodities()];
        let mut node_terms = vec![vec![]; net.num_nodes()];
        let mut arc_terms = vec![vec![]; net.num_arcs()];

        for (k, j, path) in columns.iter() {
            let demand = net.commodity(k).demand;
            // x <= 1 follows from the convexity row
            let x = lp.add_variable(format!("x{}_{}", k.index(), j), demand * path.cost(), 0.0, None);
            convexity[k.index()].push((x, 1.0));
            if demand == 0.0 {
                continue;
            }
            for u in path.nodes(net) {
                node_terms[u.index()].push((x, demand));
            }
            for &a in path.arcs() {
                arc_terms[a.index()].push((x, demand));
            }
        }

        let mut rows = vec![];
        for (k, terms) in net.commodities().zip(convexity) {
            lp.add_constraint(k.to_string(), terms, ConstraintSense::Eq, 1.0);
            rows.push(Row::Convexity(k));
        }
        for (u, terms) in net.nodes().zip(node_terms) {
            let cap = net.node(u).capacity;
            if cap.is_finite() && !terms.is_empty() {
                lp.add_constraint(u.to_string(), terms, ConstraintSense::Le, cap);
                rows.push(Row::Node(u));
            }
        }
        for (a, terms) in net.arcs().zip(arc_terms) {
            let cap = net.arc(a).capacity;
            if cap.is_finite() && !terms.is_empty() {
                lp.add_constraint(a.to_string(), terms, ConstraintSense::Le, cap);
                rows.push(Row::Arc(a));
            }
        }

        (lp, rows)
    }

    /// Solve the restricted master problem over `columns`.
    ///
    /// Returns the objective value, the flow fraction of every column and the
    /// dual values, all from the same solve. Any outcome of the solver other
    /// than an optimal solution is returned as [`Error::Solver`].
    pub fn solve<S>(&mut self, solver: &mut S, columns: &ColumnSet) -> Result<MasterSolution>
    where
        S: LpSolver + ?Sized,
    {
        let (lp, rows) = self.build(columns);
        self.num_solves += 1;

        if let Some(dir) = self.dump_dir.as_ref() {
            let filename = dir.join(format!("{}.mps", lp.name));
            debug!("Write master problem to {}", filename.display());
            mps::write_to_file(&lp, &filename)?;
        }

        if lp.num_variables() == 0 {
            return Ok(MasterSolution {
                objective: 0.0,
                flows: vec![vec![]; columns.num_commodities()],
                duals: DualValues::zeros(self.net),
            });
        }

        let sol = solver.solve(&lp)?;
        if sol.state != SolutionState::Optimal {
            return Err(SolverError::new(sol.state, "master problem has not been solved to optimality").into());
        }
        if sol.primal.len() != lp.num_variables() || sol.duals.len() != lp.num_constraints() {
            return Err(Error::Solver(SolverError::new(
                SolutionState::Failed,
                format!(
                    "solver returned {} primal and {} dual values for {} variables and {} rows",
                    sol.primal.len(),
                    sol.duals.len(),
                    lp.num_variables(),
                    lp.num_constraints()
                ),
            )));
        }

        let mut primal = sol.primal.iter().map(|x| x.max(0.0));
        let flows = (0..columns.num_commodities())
            .map(|k| {
                columns
                    .columns(CommodityId::new(k))
                    .iter()
                    .map(|_| primal.next().unwrap_or(0.0))
                    .collect()
            })
            .collect();

        let mut duals = DualValues::zeros(self.net);
        for (row, &y) in rows.iter().zip(&sol.duals) {
            match *row {
                Row::Convexity(k) => duals.commodities[k.index()] = y,
                Row::Node(u) => duals.nodes[u.index()] = (-y).max(0.0),
                Row::Arc(a) => duals.arcs[a.index()] = (-y).max(0.0),
            }
        }

        Ok(MasterSolution {
            objective: sol.objective,
            flows,
            duals,
        })
    }
}
