// HiGHS Solver Adapter (requires the `highs` feature)
// This is an adapter pattern - translates our domain models to HiGHS API

use std::time::{Duration, Instant};

use highs::{HighsModelStatus, RowProblem, Sense};

use crate::domain::{
    models::{OptimizationProblem, SolverResult},
    solver_service::{Result, SolverService},
    value_objects::{ConstraintType, OptimizationType, SolutionStatus, VariableType},
};
use crate::solver::presolve::presolve;

const NAME: &str = "HiGHS";

pub struct HighsSolver {
    verbose: bool,
}

impl HighsSolver {
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Let HiGHS print its own log to stdout.
    pub fn with_output(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve(&self, problem: &OptimizationProblem, time_limit: Duration) -> Result<SolverResult> {
        // Validate first
        self.validate(problem)?;

        let mut statistics = problem.statistics();
        if let Some(result) = presolve(problem) {
            return Ok(result.with_statistics(statistics));
        }

        let start_time = Instant::now();

        // Use HiGHS RowProblem (add variables first, then constraints)
        let mut pb = RowProblem::default();
        let mut cols = Vec::with_capacity(problem.variables.len());

        for (var_def, &obj_coeff) in problem
            .variables
            .iter()
            .zip(&problem.objective.coefficients)
        {
            let lower = var_def.lower_bound;
            let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);

            let col = match var_def.variable_type {
                VariableType::Integer | VariableType::Binary => {
                    pb.add_integer_column(obj_coeff, lower..=upper)
                }
                VariableType::Continuous => pb.add_column(obj_coeff, lower..=upper),
            };
            cols.push(col);
        }

        for constraint in problem.active_constraints() {
            let terms: Vec<_> = constraint
                .coefficients
                .iter()
                .zip(&cols)
                .filter(|&(&coeff, _)| coeff != 0.0)
                .map(|(&coeff, &col)| (col, coeff))
                .collect();

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    pb.add_row(..=constraint.bound, &terms);
                }
                ConstraintType::Equal => {
                    pb.add_row(constraint.bound..=constraint.bound, &terms);
                }
                ConstraintType::GreaterThanOrEqual => {
                    pb.add_row(constraint.bound.., &terms);
                }
            }
        }

        let sense = match problem.objective.optimization_type {
            OptimizationType::Maximize => Sense::Maximise,
            OptimizationType::Minimize => Sense::Minimise,
        };

        // The model owns the native HiGHS handle; it is freed when `model`/`solved` drop
        let mut model = pb.optimise(sense);
        model.set_option("time_limit", time_limit.as_secs_f64());
        model.set_option("output_flag", self.verbose);

        let solved = model.try_solve();
        statistics.solve_time_ms = start_time.elapsed().as_secs_f64() * 1000.0;

        let solved = match solved {
            Ok(solved) => solved,
            Err(status) => {
                return Ok(SolverResult::error(format!("HiGHS failed to run: {:?}", status))
                    .with_statistics(statistics))
            }
        };

        // Process result
        let result = match solved.status() {
            HighsModelStatus::Optimal => {
                let variable_values = solved.get_solution().columns().to_vec();
                SolverResult::optimal(solved.objective_value(), variable_values)
                    .with_message(format!("Optimal solution found for '{}'", problem.name))
            }
            HighsModelStatus::Infeasible => SolverResult::new(
                SolutionStatus::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            ),
            // MIP presolve cannot always tell the two apart; with bounded variables it means infeasible
            HighsModelStatus::UnboundedOrInfeasible => SolverResult::new(
                SolutionStatus::Infeasible,
                "HiGHS reports the problem as infeasible or unbounded",
            ),
            // The incumbent, if HiGHS found one before the deadline, is still usable
            HighsModelStatus::ReachedTimeLimit => SolverResult::interrupted(
                problem,
                solved.objective_value(),
                solved.get_solution().columns().to_vec(),
                NAME,
            ),
            status => SolverResult::error(format!("HiGHS solver returned status: {:?}", status)),
        };

        Ok(result.with_statistics(statistics))
    }

    fn name(&self) -> &str {
        NAME
    }

    fn supports_mip(&self) -> bool {
        true
    }
}
