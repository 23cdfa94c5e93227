// Copyright (c) 2022 Frank Fischer <frank-fischer@shadow-soft.de>
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

use std::collections::HashMap;
use std::error::Error;
use std::fs::{read_dir, read_to_string};
use std::path::Path;

use rs_colgen::dimacs;
use rs_colgen::{ColumnGeneration, GoodLp, Report, Termination};

/// Read the optimal value from the `s <value>` line of a solution file.
fn read_solution(path: &Path) -> Result<f64, Box<dyn Error>> {
    for line in read_to_string(path)?.lines() {
        let mut toks = line.split_whitespace();
        if toks.next() == Some("s") {
            if let Some(value) = toks.next() {
                return Ok(value.parse()?);
            }
        }
    }
    Err(format!("no solution line in {}", path.display()).into())
}

#[test]
fn test_instances() -> Result<(), Box<dyn Error>> {
    let mut values = HashMap::new();

    for entry in read_dir(Path::new("tests/data"))? {
        let entry = entry?;
        if entry.path().extension().map(|ext| ext == "sol").unwrap_or(false) {
            let value = read_solution(&entry.path())?;
            if let Some(file_stem) = entry.path().file_stem().map(|s| s.to_string_lossy().to_string()) {
                values.insert(file_stem, value);
            }
        }
    }

    let mut count = 0;
    for entry in read_dir(Path::new("tests/data"))? {
        let entry = entry?;
        if entry.path().extension().map(|ext| ext == "mcmf").unwrap_or(false) {
            let net = dimacs::read_from_file(entry.path())?;
            let sol = ColumnGeneration::new(&net, GoodLp::new()).run()?;
            assert_eq!(sol.termination, Termination::Converged);

            if let Some(value) = entry
                .path()
                .file_stem()
                .and_then(|s| values.get(s.to_string_lossy().as_ref()))
            {
                assert!(
                    (*value - sol.objective).abs() < 1e-5,
                    "{:?}: expected {}, got {}",
                    entry.path(),
                    value,
                    sol.objective
                );
            } else {
                panic!("Can't find solution file for {:?}", entry.path());
            }

            // every commodity appears in the report
            let text = Report::new(&net, &sol).to_string();
            for k in net.commodities() {
                assert!(text.contains(&format!("Commodity {} (", k.index() + 1)));
            }
            count += 1;
        }
    }
    assert!(count > 0);

    Ok(())
}

#[test]
fn test_write_read() -> Result<(), Box<dyn Error>> {
    let net = dimacs::read_from_file("tests/data/hub.mcmf")?;
    let mut buf = vec![];
    dimacs::write(&mut buf, &net)?;
    let again = dimacs::read(&buf[..])?;

    assert_eq!(again.num_nodes(), net.num_nodes());
    assert_eq!(again.num_arcs(), net.num_arcs());
    assert_eq!(again.num_commodities(), net.num_commodities());
    for u in net.nodes() {
        assert_eq!(again.node(u).name, net.node(u).name);
        assert_eq!(again.node(u).capacity, net.node(u).capacity);
    }

    let a = ColumnGeneration::new(&net, GoodLp::new()).run()?;
    let b = ColumnGeneration::new(&again, GoodLp::new()).run()?;
    assert!((a.objective - b.objective).abs() < 1e-6);
    Ok(())
}
