// Domain service interface for solving optimization problems
// Defines the contract that any solver backend must follow (Dependency Inversion Principle)

use std::time::Duration;

use super::models::{OptimizationProblem, SolverResult};

/// Error types for the solver service
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Domain service interface for optimization solvers
///
/// Implementations translate an [`OptimizationProblem`] to a backend, block until
/// it answers or `time_limit` elapses, and translate the answer back. Backend
/// failures are reported as a [`SolverResult`] with `SolutionStatus::Error` and
/// the diagnostic in its message; `Err` is reserved for problems rejected
/// before the backend runs.
pub trait SolverService: Send + Sync {
    /// Solve an optimization problem
    fn solve(&self, problem: &OptimizationProblem, time_limit: Duration) -> Result<SolverResult>;

    /// Validate a problem without solving it
    fn validate(&self, problem: &OptimizationProblem) -> Result<()> {
        let mut errors = Vec::new();
        let num_vars = problem.num_variables();

        // Check variables match objective
        if problem.variables.len() != num_vars {
            errors.push(format!(
                "Number of variables ({}) doesn't match objective coefficients ({})",
                problem.variables.len(),
                num_vars
            ));
        }

        if problem.objective.coefficients.iter().any(|c| !c.is_finite()) {
            errors.push("Objective has a non-finite coefficient".to_string());
        }

        // Check constraints
        for (i, constraint) in problem.constraints.iter().enumerate() {
            if constraint.num_variables() != num_vars {
                errors.push(format!(
                    "Constraint {} '{}' has {} coefficients but problem has {} variables",
                    i,
                    constraint.name,
                    constraint.num_variables(),
                    num_vars
                ));
            }
            if !constraint.bound.is_finite() || constraint.coefficients.iter().any(|c| !c.is_finite()) {
                errors.push(format!(
                    "Constraint {} '{}' has a non-finite coefficient or bound",
                    i, constraint.name
                ));
            }
        }

        // Check variable bounds
        for (i, var) in problem.variables.iter().enumerate() {
            if let Some(upper) = var.upper_bound {
                if var.lower_bound > upper {
                    errors.push(format!(
                        "Variable {} '{}' has lower bound ({}) > upper bound ({})",
                        i, var.name, var.lower_bound, upper
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidProblem(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;

    /// Check if this solver supports mixed-integer programming
    fn supports_mip(&self) -> bool;
}
