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

//! Column generation for the capacitated multi-commodity flow problem.
//!
//! The algorithm starts with the column set computed by the
//! [`InitialSolutionBuilder`]. In each iteration the restricted master
//! problem over the current columns is solved and the pricing problem is
//! solved with its dual values. Improving columns are added to the column
//! set. The algorithm stops when no improving column exists anymore or when
//! the maximal number of iterations is reached.
//!
//! # Example
//!
//! ```
//! use rs_colgen::{ColumnGeneration, GoodLp, Network, Termination};
//!
//! let net = Network::new_with(|b| {
//!     let a = b.add_node("A", 0);
//!     let m = b.add_node("B", 0);
//!     let c = b.add_node("C", 0);
//!     b.add_arc(a, m, 1.0, 10.0);
//!     b.add_arc(m, c, 1.0, 3.0);
//!     b.add_arc(a, c, 5.0, 10.0);
//!     b.add_commodity(a, c, 5.0);
//! })
//! .unwrap();
//!
//! let mut colgen = ColumnGeneration::new(&net, GoodLp::new());
//! let sol = colgen.run().unwrap();
//! assert_eq!(sol.termination, Termination::Converged);
//! assert!((sol.objective - 16.0).abs() < 1e-5);
//! ```

use crate::config::Config;
use crate::error::Result;
use crate::initial::InitialSolutionBuilder;
use crate::lp::LpSolver;
use crate::master::{DualValues, MasterProblem};
use crate::network::{CommodityId, Network};
use crate::path::{ColumnSet, Path};
use crate::pricing::Pricing;

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// State of the column generation algorithm.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    /// The initial column set is being computed.
    Initializing,
    /// The restricted master problem is being solved.
    MasterSolve,
    /// New columns are being priced.
    Pricing,
    /// No improving column exists.
    Converged,
    /// The iteration limit has been reached.
    Stopped,
    /// No initial column set has been found.
    Infeasible,
}

/// Reason for the termination of a successful run.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Termination {
    /// No improving column exists, the solution is optimal.
    Converged,
    /// The maximal number of iterations has been reached.
    IterationLimit,
}

/// Information about a single iteration.
#[derive(Clone, Copy, Debug)]
pub struct IterationInfo {
    /// Objective value of the restricted master problem.
    pub objective: f64,
    /// Minimal reduced cost found by the pricing problem.
    pub min_reduced_cost: f64,
    /// Number of columns added after this iteration.
    pub columns_added: usize,
    /// Number of improving columns dropped because they were already known.
    pub columns_discarded: usize,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Timings {
    /// Time to compute the initial column set.
    pub initial: Duration,
    /// Time spent in the column generation iterations.
    pub optimization: Duration,
}

/// The result of column generation.
#[derive(Clone, Debug)]
pub struct Solution {
    pub termination: Termination,
    /// Objective value of the last restricted master problem.
    pub objective: f64,
    pub columns: ColumnSet,
    /// The flow fraction of each column, indexed like `columns`.
    pub flows: Vec<Vec<f64>>,
    /// Dual values of the last restricted master problem.
    pub duals: DualValues,
    pub history: Vec<IterationInfo>,
    pub timings: Timings,
    /// Flow fractions above this value count as nonzero.
    pub flow_threshold: f64,
}

impl Solution {
    /// Number of master problems solved.
    pub fn num_iterations(&self) -> usize {
        self.history.len()
    }

    /// The columns of commodity `k` with nonzero flow and their flow
    /// fractions.
    pub fn used_paths(&self, k: CommodityId) -> impl Iterator<Item = (&Path, f64)> + '_ {
        let threshold = self.flow_threshold;
        self.columns
            .columns(k)
            .iter()
            .zip(self.flows[k.index()].iter().copied())
            .filter(move |&(_, x)| x > threshold)
    }

    /// Total flow through each node.
    pub fn node_loads(&self, net: &Network) -> Vec<f64> {
        let mut loads = vec![0.0; net.num_nodes()];
        for (k, j, path) in self.columns.iter() {
            let flow = self.flows[k.index()][j] * net.commodity(k).demand;
            for u in path.nodes(net) {
                loads[u.index()] += flow;
            }
        }
        loads
    }

    /// Total flow on each arc.
    pub fn arc_loads(&self, net: &Network) -> Vec<f64> {
        let mut loads = vec![0.0; net.num_arcs()];
        for (k, j, path) in self.columns.iter() {
            let flow = self.flows[k.index()][j] * net.commodity(k).demand;
            for &a in path.arcs() {
                loads[a.index()] += flow;
            }
        }
        loads
    }

    /// Remaining capacity of each node.
    pub fn residual_node_capacities(&self, net: &Network) -> Vec<f64> {
        net.nodes()
            .zip(self.node_loads(net))
            .map(|(u, load)| net.node(u).capacity - load)
            .collect()
    }

    /// Remaining capacity of each arc.
    pub fn residual_arc_capacities(&self, net: &Network) -> Vec<f64> {
        net.arcs()
            .zip(self.arc_loads(net))
            .map(|(a, load)| net.arc(a).capacity - load)
            .collect()
    }
}

/// The column generation algorithm.
pub struct ColumnGeneration<'a, S> {
    net: &'a Network,
    solver: S,
    /// Parameters of the algorithm.
    pub config: Config,
    phase: Phase,
}

impl<'a, S> ColumnGeneration<'a, S>
where
    S: LpSolver,
{
    /// Create a new instance with the default configuration.
    pub fn new(net: &'a Network, solver: S) -> Self {
        Self::with_config(net, solver, Config::default())
    }

    pub fn with_config(net: &'a Network, solver: S, config: Config) -> Self {
        ColumnGeneration {
            net,
            solver,
            config,
            phase: Phase::Initializing,
        }
    }

    /// The current (or final) state of the algorithm.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run column generation.
    ///
    /// Returns [`Error::InfeasibleInstance`](crate::Error::InfeasibleInstance)
    /// if no initial column set has been found and
    /// [`Error::Solver`](crate::Error::Solver) if the LP solver fails. Reaching the
    /// iteration limit is not an error; the solution of the last master
    /// problem is returned with [`Termination::IterationLimit`].
    pub fn run(&mut self) -> Result<Solution> {
        let net = self.net;
        self.phase = Phase::Initializing;

        let start = Instant::now();
        let mut builder = InitialSolutionBuilder::new(net);
        builder.max_passes = self.config.max_passes;
        let mut columns = match builder.build() {
            Ok(columns) => columns,
            Err(err) => {
                self.phase = Phase::Infeasible;
                return Err(err);
            }
        };
        let initial = start.elapsed();
        info!("Initial column set with {} columns in {:?}", columns.num_columns(), initial);

        let start = Instant::now();
        let mut master = MasterProblem::new(net);
        master.dump_dir = self.config.dump_dir.clone();
        let mut pricing = Pricing::new(net);
        pricing.tolerance = self.config.tolerance;
        let mut history = vec![];

        loop {
            self.phase = Phase::MasterSolve;
            let sol = master.solve(&mut self.solver, &columns)?;

            self.phase = Phase::Pricing;
            let priced = pricing.price(&sol.duals)?;
            let num_priced = priced.columns.len();
            let new_columns: Vec<_> = priced
                .columns
                .into_iter()
                .filter(|(k, path)| {
                    let known = columns.contains(*k, path);
                    if known {
                        debug!("Column for commodity {} already known", k);
                    }
                    !known
                })
                .collect();

            info!(
                "Iteration {}: objective {} min reduced cost {} new columns {}",
                master.num_solves(),
                sol.objective,
                priced.min_reduced_cost,
                new_columns.len()
            );

            let columns_discarded = num_priced - new_columns.len();
            let termination = if new_columns.is_empty() {
                if priced.min_reduced_cost < -self.config.tolerance {
                    warn!(
                        "Converged with min reduced cost {}, all {} improving columns are already known",
                        priced.min_reduced_cost, columns_discarded
                    );
                }
                Some(Termination::Converged)
            } else if master.num_solves() >= self.config.max_iterations {
                Some(Termination::IterationLimit)
            } else {
                None
            };

            history.push(IterationInfo {
                objective: sol.objective,
                min_reduced_cost: priced.min_reduced_cost,
                columns_added: if termination.is_none() { new_columns.len() } else { 0 },
                columns_discarded,
            });

            if let Some(termination) = termination {
                self.phase = match termination {
                    Termination::Converged => Phase::Converged,
                    Termination::IterationLimit => Phase::Stopped,
                };
                let optimization = start.elapsed();
                info!(
                    "{:?} after {} iterations with objective {} in {:?}",
                    termination,
                    history.len(),
                    sol.objective,
                    optimization
                );
                return Ok(Solution {
                    termination,
                    objective: sol.objective,
                    columns,
                    flows: sol.flows,
                    duals: sol.duals,
                    history,
                    timings: Timings { initial, optimization },
                    flow_threshold: self.config.flow_threshold,
                });
            }

            for (k, path) in new_columns {
                columns.push(k, path);
            }
        }
    }
}

/// Run column generation on `net` with the given solver and configuration.
pub fn solve<S: LpSolver>(net: &Network, solver: S, config: Config) -> Result<Solution> {
    ColumnGeneration::with_config(net, solver, config).run()
}
