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

//! Errors of the column generation algorithm.

use crate::lp::SolverError;
use crate::network::{CommodityId, NodeId};

use std::io;
use thiserror::Error;

/// Error of the column generation algorithm.
#[derive(Debug, Error)]
pub enum Error {
    /// The initial heuristic did not find a capacity-feasible path for every
    /// commodity within the allowed number of passes.
    ///
    /// `commodities` contains the commodities that could not be routed in
    /// the last pass.
    #[error("infeasible instance: {} commodities could not be routed within {passes} passes", .commodities.len())]
    InfeasibleInstance { passes: usize, commodities: Vec<CommodityId> },

    /// The LP solver failed on the restricted master problem.
    #[error("master problem: {0}")]
    Solver(#[from] SolverError),

    /// The reduced costs contain a negative cycle through `node`.
    #[error("negative cycle of reduced costs through node {node}")]
    NegativeCycle { node: NodeId },

    /// Invalid network data.
    #[error("invalid network data: {msg}")]
    Data { msg: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
