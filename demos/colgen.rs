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

use rs_colgen::dimacs;
use rs_colgen::{ColumnGeneration, Config, GoodLp, Report};
use std::error::Error;
use std::path::PathBuf;
use std::result::Result;
use std::time::Duration;

use rustop::opts;
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    let (args, _) = opts! {
        synopsis "Solve a capacitated multi-commodity flow problem by column generation.";
        param file:String, desc:"Instance file name";
        opt max_passes:usize=5, desc:"Passes of the initial heuristic";
        opt max_iterations:usize=1000, desc:"Maximal number of master problem solves";
        opt tolerance:f64=1e-6, desc:"Relative reduced cost tolerance";
        opt dump_dir:Option<String>, desc:"Write each master problem as MPS file to this directory";
    }
    .parse_or_exit();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let tstart = OffsetDateTime::now_utc();
    let net = dimacs::read_from_file(&args.file)?;
    let tend = OffsetDateTime::now_utc();
    let load_time = Duration::from_secs_f64((tend - tstart).as_seconds_f64().max(0.0));

    println!("Instance            : {}", args.file);
    println!("Number of nodes     : {}", net.num_nodes());
    println!("Number of arcs      : {}", net.num_arcs());
    println!("Number of demands   : {}", net.num_commodities());
    println!();

    let config = Config {
        max_passes: args.max_passes,
        max_iterations: args.max_iterations,
        tolerance: args.tolerance,
        dump_dir: args.dump_dir.map(PathBuf::from),
        ..Config::default()
    };

    let sol = ColumnGeneration::with_config(&net, GoodLp::new(), config).run()?;
    print!("{}", Report::new(&net, &sol).with_load_time(load_time));

    Ok(())
}
