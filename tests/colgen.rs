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

use proptest::prelude::*;

use rs_colgen::colgen::Phase;
use rs_colgen::lp::{ConstraintSense, LpModel, LpSolution, SolutionState, SolverError};
use rs_colgen::{
    ArcId, ColumnGeneration, CommodityId, Config, Error, GoodLp, InitialSolutionBuilder, LpSolver, Network, NodeId,
    Termination,
};

const EPS: f64 = 1e-5;

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < EPS, "{} != {}", a, b);
}

/// A -> B -> C with cost 1 each, A -> C with cost 5, 5 units from A to C.
fn triangle(bc_cap: f64) -> Network {
    Network::new_with(|b| {
        let a = b.add_node("A", 0);
        let m = b.add_node("B", 0);
        let c = b.add_node("C", 0);
        b.add_arc(a, m, 1.0, 10.0);
        b.add_arc(m, c, 1.0, bc_cap);
        b.add_arc(a, c, 5.0, 10.0);
        b.add_commodity(a, c, 5.0);
    })
    .unwrap()
}

/// Two commodities competing for a hub with capacity 6.
fn hub() -> Network {
    Network::new_with(|b| {
        b.set_class_capacity(1, 6.0);
        let s1 = b.add_node("s1", 0);
        let s2 = b.add_node("s2", 0);
        let h = b.add_node("h", 1);
        let t = b.add_node("t", 0);
        b.add_arc(s1, h, 1.0, f64::INFINITY);
        b.add_arc(s2, h, 1.0, f64::INFINITY);
        b.add_arc(h, t, 1.0, f64::INFINITY);
        b.add_arc(s1, t, 4.0, f64::INFINITY);
        b.add_arc(s2, t, 6.0, f64::INFINITY);
        b.add_commodity(s1, t, 4.0);
        b.add_commodity(s2, t, 4.0);
    })
    .unwrap()
}

/// Solver that records every model and its solution.
#[derive(Default)]
struct Recorder {
    inner: GoodLp,
    solves: Vec<(LpModel, LpSolution)>,
}

impl LpSolver for Recorder {
    fn solve(&mut self, model: &LpModel) -> Result<LpSolution, SolverError> {
        let sol = self.inner.solve(model)?;
        self.solves.push((model.clone(), sol.clone()));
        Ok(sol)
    }
}

/// Solver that always fails.
struct Failing(SolutionState);

impl LpSolver for Failing {
    fn solve(&mut self, model: &LpModel) -> Result<LpSolution, SolverError> {
        if self.0 == SolutionState::Optimal {
            // claims success without any values
            return Ok(LpSolution {
                state: SolutionState::Optimal,
                objective: 0.0,
                primal: vec![],
                duals: vec![],
            });
        }
        if self.0 == SolutionState::Unknown {
            return Ok(LpSolution {
                state: SolutionState::Unknown,
                objective: 0.0,
                primal: vec![0.0; model.num_variables()],
                duals: vec![0.0; model.num_constraints()],
            });
        }
        Err(SolverError::new(self.0, "mock failure"))
    }
}

/// Solver that reports the optimal primal of a single column per commodity
/// with a fixed price on every convexity row.
struct FixedPrices(f64);

impl LpSolver for FixedPrices {
    fn solve(&mut self, model: &LpModel) -> Result<LpSolution, SolverError> {
        let primal = vec![1.0; model.num_variables()];
        let duals = model
            .constraints
            .iter()
            .map(|con| if con.sense == ConstraintSense::Eq { self.0 } else { 0.0 })
            .collect();
        Ok(LpSolution {
            state: SolutionState::Optimal,
            objective: model.objective_value(&primal),
            primal,
            duals,
        })
    }
}

#[test]
fn test_uncongested() {
    let net = triangle(10.0);
    let mut colgen = ColumnGeneration::new(&net, GoodLp::new());
    let sol = colgen.run().unwrap();

    assert_eq!(sol.termination, Termination::Converged);
    assert_eq!(colgen.phase(), Phase::Converged);
    assert_close(sol.objective, 10.0);
    // the initial solution is already optimal
    assert_close(sol.history[0].objective, 10.0);

    let used: Vec<_> = sol.used_paths(CommodityId::new(0)).collect();
    assert_eq!(used.len(), 1);
    assert_eq!(used[0].0.arcs(), &[ArcId::new(0), ArcId::new(1)]);
    assert_close(used[0].1, 1.0);
    assert_close(sol.arc_loads(&net)[2], 0.0);
}

#[test]
fn test_congested_arc() {
    let net = triangle(3.0);
    let mut colgen = ColumnGeneration::new(&net, GoodLp::new());
    let sol = colgen.run().unwrap();

    assert_eq!(sol.termination, Termination::Converged);
    assert_close(sol.history[0].objective, 25.0);
    assert_close(sol.objective, 16.0);

    let demand = net.commodity(CommodityId::new(0)).demand;
    let mut used: Vec<_> = sol
        .used_paths(CommodityId::new(0))
        .map(|(p, x)| (p.arcs().to_vec(), x * demand))
        .collect();
    used.sort_by(|a, b| a.0.len().cmp(&b.0.len()));
    assert_eq!(used.len(), 2);
    assert_eq!(used[0].0, vec![ArcId::new(2)]);
    assert_close(used[0].1, 2.0);
    assert_eq!(used[1].0, vec![ArcId::new(0), ArcId::new(1)]);
    assert_close(used[1].1, 3.0);

    // the binding arc B -> C has a positive price
    assert!(sol.duals.arc(ArcId::new(1)) > EPS);
    assert_close(sol.duals.arc(ArcId::new(1)), 3.0);
}

#[test]
fn test_hub() {
    let net = hub();
    let mut solver = Recorder::default();
    let sol = ColumnGeneration::new(&net, &mut solver).run().unwrap();

    assert_eq!(sol.termination, Termination::Converged);
    assert_close(sol.objective, 20.0);
    assert_close(sol.node_loads(&net)[2], 6.0);

    // objective is non-increasing
    for w in sol.history.windows(2) {
        assert!(w[1].objective <= w[0].objective + EPS);
    }

    // every master solution respects all capacities
    assert_eq!(solver.solves.len(), sol.num_iterations());
    for (model, lpsol) in &solver.solves {
        for (i, con) in model.constraints.iter().enumerate() {
            let act = model.activity(i, &lpsol.primal);
            match con.sense {
                ConstraintSense::Le => assert!(act <= con.rhs + EPS, "{} > {}", act, con.rhs),
                ConstraintSense::Eq => assert_close(act, con.rhs),
                ConstraintSense::Ge => assert!(act >= con.rhs - EPS),
            }
        }
    }

    // capacity accounting of the final solution
    assert!(sol.residual_node_capacities(&net).iter().all(|&r| r >= -EPS));
    assert!(sol.residual_arc_capacities(&net).iter().all(|&r| r >= -EPS));
    for k in net.commodities() {
        let total: f64 = sol.used_paths(k).map(|(_, x)| x).sum();
        assert_close(total, 1.0);
    }
}

#[test]
fn test_iteration_limit() {
    let net = hub();
    let config = Config {
        max_iterations: 1,
        ..Config::default()
    };
    let mut colgen = ColumnGeneration::with_config(&net, GoodLp::new(), config);
    let sol = colgen.run().unwrap();

    assert_eq!(sol.termination, Termination::IterationLimit);
    assert_eq!(colgen.phase(), Phase::Stopped);
    assert_eq!(sol.num_iterations(), 1);
    assert_close(sol.objective, 32.0);
    // the solution belongs to the columns of the last master problem
    assert_eq!(sol.columns.num_columns(), 2);
    assert!(sol.history[0].min_reduced_cost < 0.0);
}

#[test]
fn test_solver_failure() {
    let net = triangle(3.0);
    for &state in &[SolutionState::Failed, SolutionState::Infeasible, SolutionState::Optimal, SolutionState::Unknown] {
        let mut colgen = ColumnGeneration::new(&net, Failing(state));
        match colgen.run() {
            Err(Error::Solver(err)) => {
                if state != SolutionState::Optimal {
                    assert_eq!(err.state, state);
                }
            }
            Err(err) => panic!("unexpected error: {}", err),
            Ok(_) => panic!("solver failure not reported"),
        }
        assert_eq!(colgen.phase(), Phase::MasterSolve);
    }
}

#[test]
fn test_known_columns_converge() {
    // the only improving path is the initial column A -> B -> C
    let net = triangle(10.0);
    let mut colgen = ColumnGeneration::new(&net, FixedPrices(100.0));
    let sol = colgen.run().unwrap();

    assert_eq!(sol.termination, Termination::Converged);
    assert_eq!(sol.num_iterations(), 1);
    assert_eq!(sol.columns.num_columns(), 1);
    assert_close(sol.history[0].min_reduced_cost, -90.0);
    assert_eq!(sol.history[0].columns_added, 0);
    assert_eq!(sol.history[0].columns_discarded, 1);
}

#[test]
fn test_infeasible_instance() {
    let net = Network::new_with(|b| {
        let s = b.add_node("s", 0);
        let t = b.add_node("t", 0);
        b.add_arc(s, t, 1.0, 5.0);
        b.add_commodity(s, t, 3.0);
        b.add_commodity(s, t, 3.0);
    })
    .unwrap();

    let mut colgen = ColumnGeneration::new(&net, GoodLp::new());
    match colgen.run() {
        Err(Error::InfeasibleInstance { passes, commodities }) => {
            assert_eq!(passes, 5);
            assert_eq!(commodities.len(), 1);
        }
        _ => panic!("expected an infeasible instance"),
    }
    assert_eq!(colgen.phase(), Phase::Infeasible);
}

#[test]
fn test_dump_dir() {
    let dir = std::env::temp_dir().join(format!("rs-colgen-dump-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let net = triangle(3.0);
    let config = Config {
        dump_dir: Some(dir.clone()),
        ..Config::default()
    };
    let sol = ColumnGeneration::with_config(&net, GoodLp::new(), config).run().unwrap();
    for i in 0..sol.num_iterations() {
        let text = std::fs::read_to_string(dir.join(format!("master{}.mps", i))).unwrap();
        assert!(text.starts_with("NAME"));
        assert!(text.trim_end().ends_with("ENDATA"));
    }

    std::fs::remove_dir_all(&dir).unwrap();
}

fn random_network(n: usize, arcs: &[(usize, usize, u8, u8)], commodities: &[(usize, usize, u8)], node_cap: u8) -> Network {
    Network::new_with(|b| {
        b.set_class_capacity(1, f64::from(node_cap));
        let nodes: Vec<NodeId> = (0..n).map(|i| b.add_node(i.to_string(), i % 2)).collect();
        for &(u, v, c, cap) in arcs {
            b.add_arc(nodes[u], nodes[v], f64::from(c), f64::from(cap));
        }
        for &(s, t, d) in commodities {
            b.add_commodity(nodes[s], nodes[t], f64::from(d));
        }
    })
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn initial_paths_respect_capacities(
        arcs in prop::collection::vec((0usize..6, 0usize..6, 0u8..10, 1u8..12), 1..24),
        commodities in prop::collection::vec((0usize..6, 0usize..6, 1u8..6), 1..5),
        node_cap in 1u8..15,
    ) {
        let net = random_network(6, &arcs, &commodities, node_cap);
        if let Ok(columns) = InitialSolutionBuilder::new(&net).build() {
            let mut node_load = vec![0.0; net.num_nodes()];
            let mut arc_load = vec![0.0; net.num_arcs()];
            for k in net.commodities() {
                let commodity = net.commodity(k);
                let paths = columns.columns(k);
                prop_assert_eq!(paths.len(), 1);

                // a connected path from origin to destination
                let mut cur = commodity.origin;
                for &a in paths[0].arcs() {
                    prop_assert_eq!(net.tail(a), cur);
                    cur = net.head(a);
                    node_load[cur.index()] += commodity.demand;
                    arc_load[a.index()] += commodity.demand;
                }
                prop_assert_eq!(cur, commodity.destination);
            }
            for u in net.nodes() {
                prop_assert!(node_load[u.index()] <= net.node(u).capacity);
            }
            for a in net.arcs() {
                prop_assert!(arc_load[a.index()] <= net.arc(a).capacity);
            }
        }
    }
}
