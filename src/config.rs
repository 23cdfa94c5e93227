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

//! Parameters of the column generation algorithm.

use std::path::PathBuf;

#[cfg(feature = "serialize")]
use serde_derive::{Deserialize, Serialize};

/// Parameters of the column generation algorithm.
///
/// All fields are public and may be changed before the algorithm is run.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct Config {
    /// Maximal number of passes of the initial heuristic (including the
    /// first, capacity-free pass).
    pub max_passes: usize,
    /// Maximal number of master problem solves.
    pub max_iterations: usize,
    /// A column is improving if its reduced cost is below `-tolerance`.
    ///
    /// The algorithm stops when no reduced cost is below `-tolerance`.
    pub tolerance: f64,
    /// Flow fractions above this value count as nonzero.
    pub flow_threshold: f64,
    /// If set, each restricted master problem is written to this directory
    /// in MPS format.
    pub dump_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_passes: 5,
            max_iterations: 1000,
            tolerance: 1e-6,
            flow_threshold: 1e-6,
            dump_dir: None,
        }
    }
}
