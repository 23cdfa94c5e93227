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

//! Linear programs and the interface to LP solvers.
//!
//! An [`LpModel`] is a plain description of a linear program
//!
//! $$ \min / \max \{ c^\top x \colon A x \, (\le, =, \ge) \, b,\ l \le x \le u \}. $$
//!
//! It is passed to some [`LpSolver`] which returns an [`LpSolution`]
//! containing the primal values and one dual value per constraint. The dual
//! values follow the *shadow price* convention: the dual of a constraint is
//! the rate of change of the optimal objective value when its right-hand
//! side increases. For a minimisation problem the dual of a binding `≤`
//! constraint is therefore non-positive.

pub mod goodlp;
pub mod mps;

pub use self::goodlp::GoodLp;

use thiserror::Error;

#[cfg(feature = "serialize")]
use serde_derive::{Deserialize, Serialize};

/// The objective sense.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Sense {
    Minimize,
    Maximize,
}

/// The sense of a constraint.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum ConstraintSense {
    /// $a^\top x \le b$
    Le,
    /// $a^\top x = b$
    Eq,
    /// $a^\top x \ge b$
    Ge,
}

/// A variable of a linear program.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct LpVariable {
    pub name: String,
    /// The objective coefficient.
    pub cost: f64,
    pub lower: f64,
    /// The upper bound, `None` if the variable is unbounded from above.
    pub upper: Option<f64>,
}

/// A linear constraint.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct LpConstraint {
    pub name: String,
    /// Pairs of variable index and coefficient.
    pub terms: Vec<(usize, f64)>,
    pub sense: ConstraintSense,
    pub rhs: f64,
}

/// A linear program.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct LpModel {
    pub name: String,
    pub sense: Sense,
    pub variables: Vec<LpVariable>,
    pub constraints: Vec<LpConstraint>,
}

impl LpModel {
    /// Create an empty minimisation problem.
    pub fn new<S: Into<String>>(name: S) -> Self {
        LpModel {
            name: name.into(),
            sense: Sense::Minimize,
            variables: vec![],
            constraints: vec![],
        }
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Add a new variable and return its index.
    pub fn add_variable<S: Into<String>>(&mut self, name: S, cost: f64, lower: f64, upper: Option<f64>) -> usize {
        self.variables.push(LpVariable {
            name: name.into(),
            cost,
            lower,
            upper,
        });
        self.variables.len() - 1
    }

    /// Add a new constraint and return its index.
    pub fn add_constraint<S: Into<String>>(
        &mut self,
        name: S,
        terms: Vec<(usize, f64)>,
        sense: ConstraintSense,
        rhs: f64,
    ) -> usize {
        self.constraints.push(LpConstraint {
            name: name.into(),
            terms,
            sense,
            rhs,
        });
        self.constraints.len() - 1
    }

    /// The objective value of the primal point `x`.
    pub fn objective_value(&self, x: &[f64]) -> f64 {
        self.variables.iter().zip(x).map(|(v, &xj)| v.cost * xj).sum()
    }

    /// The activity $a^\top x$ of constraint `i` at `x`.
    pub fn activity(&self, i: usize, x: &[f64]) -> f64 {
        self.constraints[i].terms.iter().map(|&(j, a)| a * x[j]).sum()
    }

    /// The reduced cost $c_j - \sum_i a_{ij} y_i$ of every variable.
    pub fn reduced_costs(&self, duals: &[f64]) -> Vec<f64> {
        let mut rc: Vec<f64> = self.variables.iter().map(|v| v.cost).collect();
        for (con, &y) in self.constraints.iter().zip(duals) {
            for &(j, a) in &con.terms {
                rc[j] -= a * y;
            }
        }
        rc
    }
}

/// State of an LP solution.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum SolutionState {
    /// Unknown state, the problem has not been solved, yet
    Unknown,
    /// The problem has been solved to optimality
    Optimal,
    /// The problem is infeasible
    Infeasible,
    /// The problem is unbounded
    Unbounded,
    /// The solver stopped without a definite answer
    Failed,
}

/// A solution of an [`LpModel`].
#[derive(Clone, Debug)]
pub struct LpSolution {
    pub state: SolutionState,
    pub objective: f64,
    /// One value per variable.
    pub primal: Vec<f64>,
    /// One shadow price per constraint.
    pub duals: Vec<f64>,
}

/// Failure of an LP solver.
#[derive(Clone, Debug, Error)]
#[error("LP solver failed ({state:?}): {diagnostics}")]
pub struct SolverError {
    pub state: SolutionState,
    pub diagnostics: String,
}

impl SolverError {
    pub fn new<S: Into<String>>(state: SolutionState, diagnostics: S) -> Self {
        SolverError {
            state,
            diagnostics: diagnostics.into(),
        }
    }
}

/// A solver for linear programs.
///
/// Implementations must either return an optimal solution with primal and
/// dual values or an error. Returning any other state is treated as a
/// failure by the caller.
pub trait LpSolver {
    fn solve(&mut self, model: &LpModel) -> Result<LpSolution, SolverError>;
}

impl<S> LpSolver for &mut S
where
    S: LpSolver + ?Sized,
{
    fn solve(&mut self, model: &LpModel) -> Result<LpSolution, SolverError> {
        (**self).solve(model)
    }
}

impl<S> LpSolver for Box<S>
where
    S: LpSolver + ?Sized,
{
    fn solve(&mut self, model: &LpModel) -> Result<LpSolution, SolverError> {
        (**self).solve(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_costs() {
        let mut lp = LpModel::new("test");
        let x = lp.add_variable("x", 3.0, 0.0, None);
        let y = lp.add_variable("y", 5.0, 0.0, None);
        lp.add_constraint("c0", vec![(x, 1.0), (y, 1.0)], ConstraintSense::Eq, 1.0);
        lp.add_constraint("c1", vec![(y, 2.0)], ConstraintSense::Le, 4.0);

        assert_eq!(lp.objective_value(&[0.5, 0.5]), 4.0);
        assert_eq!(lp.activity(1, &[0.5, 0.5]), 1.0);
        assert_eq!(lp.reduced_costs(&[3.0, -1.0]), vec![0.0, 4.0]);
    }
}
