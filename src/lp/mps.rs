/*
 * Copyright (c) 2021, 2022 Frank Fischer <frank-fischer@shadow-soft.de>
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

//! Write linear programs in MPS format.
//!
//! The fields are placed at the fixed MPS columns 2, 5, 15 and 25. Names
//! longer than eight characters shift the following fields, so such files
//! can only be read as free MPS.
//!
//! Rows with an infinite right-hand side are omitted.

use super::{ConstraintSense, LpModel, Sense};

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

const OBJ: &str = "obj";
const RHS: &str = "rhs";
const BND: &str = "bnd";

/// Write `model` in MPS format to `w`.
pub fn write<W: Write>(model: &LpModel, mut w: W) -> io::Result<()> {
    let rows: Vec<usize> = (0..model.num_constraints())
        .filter(|&i| model.constraints[i].rhs.is_finite())
        .collect();

    // column-wise coefficients
    let mut cols = vec![vec![]; model.num_variables()];
    for &i in &rows {
        for &(j, a) in &model.constraints[i].terms {
            if a != 0.0 {
                cols[j].push((i, a));
            }
        }
    }

    writeln!(w, "{:<14}{}", "NAME", model.name)?;
    if model.sense == Sense::Maximize {
        writeln!(w, "OBJSENSE")?;
        writeln!(w, "    MAX")?;
    }

    writeln!(w, "ROWS")?;
    writeln!(w, " N  {}", OBJ)?;
    for &i in &rows {
        let con = &model.constraints[i];
        let typ = match con.sense {
            ConstraintSense::Le => "L",
            ConstraintSense::Eq => "E",
            ConstraintSense::Ge => "G",
        };
        writeln!(w, " {:<2} {}", typ, con.name)?;
    }

    writeln!(w, "COLUMNS")?;
    for (var, col) in model.variables.iter().zip(&cols) {
        if var.cost != 0.0 || col.is_empty() {
            field_line(&mut w, "", &var.name, OBJ, var.cost)?;
        }
        for &(i, a) in col {
            field_line(&mut w, "", &var.name, &model.constraints[i].name, a)?;
        }
    }

    writeln!(w, "RHS")?;
    for &i in &rows {
        let con = &model.constraints[i];
        if con.rhs != 0.0 {
            field_line(&mut w, "", RHS, &con.name, con.rhs)?;
        }
    }

    let bounded = model
        .variables
        .iter()
        .any(|v| v.lower != 0.0 || v.upper.map_or(false, f64::is_finite));
    if bounded {
        writeln!(w, "BOUNDS")?;
        for var in &model.variables {
            if var.lower == f64::NEG_INFINITY {
                writeln!(w, " {:<2} {:<8}  {}", "MI", BND, var.name)?;
            } else if var.lower != 0.0 {
                field_line(&mut w, "LO", BND, &var.name, var.lower)?;
            }
            if let Some(ub) = var.upper.filter(|ub| ub.is_finite()) {
                field_line(&mut w, "UP", BND, &var.name, ub)?;
            }
        }
    }

    writeln!(w, "ENDATA")?;
    Ok(())
}

/// Write `model` in MPS format to the file `path`.
pub fn write_to_file<P: AsRef<Path>>(model: &LpModel, path: P) -> io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    write(model, &mut w)?;
    w.flush()
}

fn field_line<W: Write>(w: &mut W, typ: &str, name1: &str, name2: &str, value: f64) -> io::Result<()> {
    writeln!(w, " {:<2} {:<8}  {:<8}  {:>12}", typ, name1, name2, format_value(value))
}

/// Format a number to fit into the 12 characters of a value field.
fn format_value(value: f64) -> String {
    let s = value.to_string();
    if s.len() <= 12 {
        s
    } else {
        format!("{:.6e}", value)
    }
}
