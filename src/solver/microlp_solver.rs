// microlp Solver Adapter
// Pure-Rust branch and bound through good_lp; always available.
// The time limit is handed to microlp, which stops at the deadline and returns
// its incumbent, if any.

use std::time::{Duration, Instant};

use good_lp::solvers::microlp::{microlp, MicroLpSolution};
use good_lp::{SolverModel, WithTimeLimit};

use crate::domain::{
    models::{OptimizationProblem, SolverResult},
    solver_service::{Result, SolverService},
    value_objects::OptimizationType,
};
use crate::solver::good_lp_model::{into_result, translate, GoodLpModel};
use crate::solver::presolve::presolve;

const NAME: &str = "microlp";

pub struct MicroLpSolver;

impl MicroLpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MicroLpSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for MicroLpSolver {
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
            .using(microlp)
            .with_time_limit(time_limit.as_secs_f64());
        for row in rows {
            lp_model = lp_model.with(row);
        }

        let outcome = lp_model.solve();
        statistics.solve_time_ms = start_time.elapsed().as_secs_f64() * 1000.0;

        let result = into_result(outcome, &columns, problem, NAME, |sol: MicroLpSolution| {
            sol.into_inner().objective()
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

    const LIMIT: Duration = Duration::from_secs(30);

    /// 0/1 knapsack: capacity 15, values 150/90/120/100/80, weights 7/3/4/5/2.
    fn knapsack() -> OptimizationProblem {
        let names = ["tent", "stove", "food", "water", "camera"];
        OptimizationProblem::new(ObjectiveFunction::maximize(vec![
            150.0, 90.0, 120.0, 100.0, 80.0,
        ]))
        .with_name("knapsack")
        .with_variables(names.iter().map(|n| Variable::binary(*n)).collect())
        .add_constraint(
            Constraint::new(
                ConstraintType::LessThanOrEqual,
                vec![7.0, 3.0, 4.0, 5.0, 2.0],
                15.0,
            )
            .with_name("capacity"),
        )
    }

    #[test]
    fn solves_binary_knapsack() {
        let result = MicroLpSolver::new().solve(&knapsack(), LIMIT).unwrap();

        assert_eq!(result.status, SolutionStatus::Optimal);
        // stove + food + water + camera = 390 (weight 14)
        assert_eq!(result.objective_value.map(f64::round), Some(390.0));
        let rounded: Vec<f64> = result.variable_values.iter().map(|v| v.round()).collect();
        assert_eq!(rounded, vec![0.0, 1.0, 1.0, 1.0, 1.0]);
        assert_eq!(result.statistics.num_binary_vars, 5);
    }

    #[test]
    fn reports_infeasible_problem() {
        let problem = OptimizationProblem::new(ObjectiveFunction::minimize(vec![1.0, 1.0]))
            .with_variables(vec![Variable::binary("x"), Variable::binary("y")])
            .add_constraint(Constraint::new(ConstraintType::GreaterThanOrEqual, vec![1.0, 1.0], 3.0));

        let result = MicroLpSolver::new().solve(&problem, LIMIT).unwrap();
        assert_eq!(result.status, SolutionStatus::Infeasible);
    }

    #[test]
    fn continuous_variables_are_supported() {
        let problem = OptimizationProblem::new(ObjectiveFunction::minimize(vec![2.0]))
            .with_variables(vec![Variable::continuous("x")])
            .add_constraint(Constraint::new(ConstraintType::GreaterThanOrEqual, vec![1.0], 2.5));

        let result = MicroLpSolver::new().solve(&problem, LIMIT).unwrap();
        assert_eq!(result.status, SolutionStatus::Optimal);
        let value = result.variable_values[0];
        assert!((value - 2.5).abs() < 1e-6, "x = {}", value);
    }

    #[test]
    fn invalid_problem_is_rejected_before_solving() {
        let problem = OptimizationProblem::new(ObjectiveFunction::minimize(vec![1.0]))
            .with_variables(vec![Variable::binary("x")])
            .add_constraint(Constraint::new(ConstraintType::Equal, vec![1.0, 1.0], 1.0));
        assert!(MicroLpSolver::new().solve(&problem, LIMIT).is_err());
    }

    #[test]
    fn reports_the_backend_objective() {
        let result = MicroLpSolver::new().solve(&knapsack(), LIMIT).unwrap();
        let objective = result.objective_value.unwrap();
        let evaluated: f64 = knapsack()
            .objective
            .coefficients
            .iter()
            .zip(&result.variable_values)
            .map(|(c, x)| c * x)
            .sum();
        assert!((objective - evaluated).abs() < 1e-6, "{} vs {}", objective, evaluated);
    }

    /// Σ 2·x_i = 31 over binaries has no solution, and branch and bound has to
    /// enumerate before it can prove that.
    fn odd_parity(n: usize) -> OptimizationProblem {
        OptimizationProblem::new(ObjectiveFunction::minimize(vec![1.0; n]))
            .with_name("odd-parity")
            .with_variables((0..n).map(|i| Variable::binary(format!("x{}", i))).collect())
            .add_constraint(Constraint::new(
                ConstraintType::Equal,
                vec![2.0; n],
                n as f64 + 1.0,
            ))
    }

    #[test]
    fn time_limit_returns_promptly_without_a_solution() {
        let limit = Duration::from_millis(200);
        let started = Instant::now();
        let result = MicroLpSolver::new().solve(&odd_parity(30), limit).unwrap();
        let elapsed = started.elapsed();

        // Either the deadline hit first or the relaxation already proved infeasibility
        assert!(
            matches!(
                result.status,
                SolutionStatus::TimeLimit | SolutionStatus::Infeasible
            ),
            "status {:?}",
            result.status
        );
        assert!(!result.status.has_solution());
        assert!(elapsed < Duration::from_secs(5), "took {:?}", elapsed);
    }
}
