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

//! Human readable output of a column generation solution.

use crate::colgen::Solution;
use crate::network::Network;
use crate::path::Path;

use std::fmt;
use std::time::Duration;

/// A printable summary of a [`Solution`].
///
/// For every commodity the used paths are listed with their node names,
/// the routed flow volume and the path cost, followed by the total cost
/// and the running times.
pub struct Report<'a> {
    net: &'a Network,
    sol: &'a Solution,
    /// Time to load the instance, if known.
    pub load_time: Option<Duration>,
}

impl<'a> Report<'a> {
    pub fn new(net: &'a Network, sol: &'a Solution) -> Self {
        Report {
            net,
            sol,
            load_time: None,
        }
    }

    pub fn with_load_time(mut self, load_time: Duration) -> Self {
        self.load_time = Some(load_time);
        self
    }

    /// The node names of `path`, starting at `origin`.
    fn path_names(&self, origin: &str, path: &Path) -> String {
        let mut names = origin.to_string();
        for u in path.nodes(self.net) {
            names.push_str(" - ");
            names.push_str(&self.net.node(u).name);
        }
        names
    }
}

impl<'a> fmt::Display for Report<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let net = self.net;
        let sol = self.sol;

        for k in net.commodities() {
            let commodity = net.commodity(k);
            let origin = &net.node(commodity.origin).name;
            writeln!(
                f,
                "Commodity {} ({} -> {}, demand {})",
                k.index() + 1,
                origin,
                net.node(commodity.destination).name,
                commodity.demand
            )?;
            for (path, x) in sol.used_paths(k) {
                writeln!(
                    f,
                    "  {}  flow: {:.4}  arcs: {}  cost: {}",
                    self.path_names(origin, path),
                    x * commodity.demand,
                    path.len(),
                    path.cost()
                )?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Total cost: {:.4}", sol.objective)?;
        writeln!(
            f,
            "Termination: {:?} after {} iterations, {} columns",
            sol.termination,
            sol.num_iterations(),
            sol.columns.num_columns()
        )?;
        if let Some(load) = self.load_time {
            writeln!(f, "Time (load): {:.3}s", load.as_secs_f64())?;
        }
        writeln!(f, "Time (initial set): {:.3}s", sol.timings.initial.as_secs_f64())?;
        writeln!(f, "Time (optimization): {:.3}s", sol.timings.optimization.as_secs_f64())?;

        Ok(())
    }
}
