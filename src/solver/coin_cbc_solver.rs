// COIN-OR CBC Solver Adapter (requires the `cbc` feature and a system CBC install)

use std::time::{Duration, Instant};

use good_lp::solvers::coin_cbc::{coin_cbc, CoinCbcSolution};
use good_lp::{SolverModel, WithTimeLimit};

use crate::domain::{
    models::{OptimizationProblem, SolverResult},
    solver_service::{Result, SolverService},
    value_objects::OptimizationType,
};
use crate::solver::good_lp_model::{into_result, translate, GoodLpModel};
use crate::solver::presolve::presolve;

const NAME: &str = "COIN-OR CBC";

pub struct CoinCbcSolver {
    verbose: bool,
}

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Let CBC print its own log to stdout.
    pub fn with_output(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CoinCbcSolver {
    fn solve(&self, problem: &OptimizationProblem, time_limit: Duration) -> Result<SolverResult> {
        // Validate first
        self.validate(problem)?;

        let mut statistics = problem.statistics();
        if let Some(result) = presolve(problem) {
            return Ok(result.with_statistics(statistics));
        }

        let start_time = Instant::now();
        let GoodLpModel {
            vars,
            columns,
            objective,
            rows,
        } = translate(problem);

        let unsolved = match problem.objective.optimization_type {
            OptimizationType::Minimize => vars.minimise(objective),
            OptimizationType::Maximize => vars.maximise(objective),
        };

        let mut lp_model = unsolved
            .using(coin_cbc)
            .with_time_limit(time_limit.as_secs_f64());
        lp_model.set_parameter("log", if self.verbose { "1" } else { "0" });

        for row in rows {
            lp_model = lp_model.with(row);
        }

        // Solve the problem
        let outcome = lp_model.solve();
        statistics.solve_time_ms = start_time.elapsed().as_secs_f64() * 1000.0;

        // A time- or gap-limited incumbent comes back as Ok with a non-optimal status
        let result = into_result(outcome, &columns, problem, NAME, |sol: CoinCbcSolution| {
            sol.model().obj_value()
        });

        Ok(result.with_statistics(statistics))
    }

    fn name(&self) -> &str {
        NAME
    }

    fn supports_mip(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Constraint, ConstraintType, ObjectiveFunction, SolutionStatus, Variable};

    #[test]
    fn reports_its_own_objective_for_a_knapsack() {
        let problem = OptimizationProblem::new(ObjectiveFunction::maximize(vec![
            150.0, 90.0, 120.0, 100.0, 80.0,
        ]))
        .with_variables((0..5).map(|i| Variable::binary(format!("item{}", i))).collect())
        .add_constraint(Constraint::new(
            ConstraintType::LessThanOrEqual,
            vec![7.0, 3.0, 4.0, 5.0, 2.0],
            15.0,
        ));

        let result = CoinCbcSolver::new()
            .solve(&problem, Duration::from_secs(30))
            .unwrap();
        assert_eq!(result.status, SolutionStatus::Optimal);
        assert_eq!(result.objective_value.map(f64::round), Some(390.0));
    }
}
