// Copyright (c) 2015-2022 Frank Fischer <frank-fischer@shadow-soft.de>
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

#![forbid(unsafe_code)]

//! Column generation for capacitated multi-commodity flow problems.
//!
//! Each commodity must route its demand from its origin to its destination.
//! Paths are restricted by the capacities of the nodes and arcs they visit
//! and the total routing cost is to be minimised. The problem is solved by
//! column generation over path variables: a restricted master problem over a
//! set of candidate paths is solved by an LP solver and new paths are found
//! by shortest path computations with reduced arc costs.
//!
//! The main entry point is [`ColumnGeneration`].

// # Data structures
pub mod network;
pub use self::network::{ArcId, CommodityId, Network, NetworkBuilder, NodeId};

pub mod path;
pub use self::path::{ColumnSet, Path};

pub mod config;
pub use self::config::Config;

pub mod error;
pub use self::error::{Error, Result};

// # Algorithms
pub mod shortestpath;

pub mod initial;
pub use self::initial::InitialSolutionBuilder;

pub mod lp;
pub use self::lp::{GoodLp, LpSolver};

pub mod master;
pub use self::master::{DualValues, MasterProblem};

pub mod pricing;
pub use self::pricing::Pricing;

pub mod colgen;
pub use self::colgen::{ColumnGeneration, Solution, Termination};

// # Input and output
pub mod report;
pub use self::report::Report;

#[cfg(feature = "dimacs")]
pub mod dimacs;
