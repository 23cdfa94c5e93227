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

//! An [`LpSolver`] backed by `good_lp` and the `clarabel` solver.

use super::{ConstraintSense, LpConstraint, LpModel, LpSolution, LpSolver, Sense, SolutionState, SolverError};

use good_lp::constraint;
use good_lp::solvers::clarabel::clarabel;
use good_lp::solvers::{DualValues, SolutionWithDual};
use good_lp::{variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable};
use tracing::trace;

/// LP solver using the interior point method `clarabel` through `good_lp`.
///
/// Rows without coefficients and rows with an infinite right-hand side are
/// not passed to the solver; their dual value is zero.
///
/// The sign convention of the dual values returned by the underlying solver
/// is normalised to shadow prices by checking stationarity
/// $c_j = \sum_i a_{ij} y_i$ on the variables strictly between their bounds.
#[derive(Clone, Debug)]
pub struct GoodLp {
    /// Primal values above this threshold count as strictly positive.
    pub tolerance: f64,
}

impl Default for GoodLp {
    fn default() -> Self {
        GoodLp { tolerance: 1e-7 }
    }
}

impl GoodLp {
    pub fn new() -> Self {
        Default::default()
    }
}

impl LpSolver for GoodLp {
    fn solve(&mut self, model: &LpModel) -> Result<LpSolution, SolverError> {
        let mut vars = ProblemVariables::new();
        let xs: Vec<Variable> = model
            .variables
            .iter()
            .map(|v| {
                let mut def = variable();
                if v.lower.is_finite() {
                    def = def.min(v.lower);
                }
                if let Some(ub) = v.upper.filter(|ub| ub.is_finite()) {
                    def = def.max(ub);
                }
                vars.add(def)
            })
            .collect();

        let objective: Expression = model.variables.iter().zip(&xs).map(|(v, &x)| v.cost * x).sum();
        let unsolved = match model.sense {
            Sense::Minimize => vars.minimise(objective),
            Sense::Maximize => vars.maximise(objective),
        };
        let mut problem = unsolved.using(clarabel);

        let mut refs = Vec::with_capacity(model.num_constraints());
        for con in &model.constraints {
            if con.terms.is_empty() || !con.rhs.is_finite() {
                check_trivial_row(con)?;
                refs.push(None);
                continue;
            }
            let lhs: Expression = con.terms.iter().map(|&(j, a)| a * xs[j]).sum();
            let c = match con.sense {
                ConstraintSense::Le => constraint::leq(lhs, con.rhs),
                ConstraintSense::Eq => constraint::eq(lhs, con.rhs),
                ConstraintSense::Ge => constraint::geq(lhs, con.rhs),
            };
            refs.push(Some(problem.add_constraint(c)));
        }

        trace!(
            "Solve LP {} with {} variables and {} rows",
            model.name,
            model.num_variables(),
            refs.iter().filter(|r| r.is_some()).count()
        );

        let mut solution = problem.solve().map_err(resolution_error)?;
        let primal: Vec<f64> = xs.iter().map(|&x| solution.value(x)).collect();

        let raw: Vec<f64> = {
            let duals = solution.compute_dual();
            refs.iter()
                .zip(&model.constraints)
                .map(|(r, con)| match r {
                    // `geq` rows are passed to the solver negated
                    Some(r) if con.sense == ConstraintSense::Ge => -duals.dual(r.clone()),
                    Some(r) => duals.dual(r.clone()),
                    None => 0.0,
                })
                .collect()
        };

        let duals = self.orient_duals(model, &primal, raw);
        let objective = model.objective_value(&primal);

        Ok(LpSolution {
            state: SolutionState::Optimal,
            objective,
            primal,
            duals,
        })
    }
}

impl GoodLp {
    /// Choose the sign of `raw` that satisfies stationarity best.
    fn orient_duals(&self, model: &LpModel, primal: &[f64], raw: Vec<f64>) -> Vec<f64> {
        let tol = self.tolerance;
        let free: Vec<bool> = model
            .variables
            .iter()
            .zip(primal)
            .map(|(v, &x)| x > v.lower + tol && v.upper.map_or(true, |ub| x < ub - tol))
            .collect();

        let violation = |y: &[f64]| -> f64 {
            model
                .reduced_costs(y)
                .iter()
                .zip(&free)
                .filter(|&(_, &f)| f)
                .map(|(rc, _)| rc.abs())
                .sum()
        };

        let negated: Vec<f64> = raw.iter().map(|&y| -y).collect();
        if violation(&negated) < violation(&raw) {
            negated
        } else {
            raw
        }
    }
}

/// Check a row that is not passed to the solver.
fn check_trivial_row(con: &LpConstraint) -> Result<(), SolverError> {
    let ok = match con.sense {
        ConstraintSense::Le => con.rhs == f64::INFINITY || (con.terms.is_empty() && 0.0 <= con.rhs),
        ConstraintSense::Ge => con.rhs == f64::NEG_INFINITY || (con.terms.is_empty() && 0.0 >= con.rhs),
        ConstraintSense::Eq => con.terms.is_empty() && con.rhs == 0.0,
    };
    if ok {
        Ok(())
    } else {
        Err(SolverError::new(
            SolutionState::Infeasible,
            format!("row {} cannot be satisfied", con.name),
        ))
    }
}

fn resolution_error(err: ResolutionError) -> SolverError {
    match err {
        ResolutionError::Infeasible => SolverError::new(SolutionState::Infeasible, "problem is infeasible"),
        ResolutionError::Unbounded => SolverError::new(SolutionState::Unbounded, "problem is unbounded"),
        err => SolverError::new(SolutionState::Failed, err.to_string()),
    }
}
