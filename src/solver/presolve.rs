// Answers problems that need no backend: constant rows only, or no variables at all

use crate::domain::{OptimizationProblem, SolutionStatus, SolverResult};

/// Settle the problem without a backend when possible.
///
/// An unsatisfiable constant row (`0 == 1`, typically a vertex with no edges
/// that must emit flow) is infeasible regardless of the variables. A problem
/// without variables is either that, or trivially optimal at zero.
pub(crate) fn presolve(problem: &OptimizationProblem) -> Option<SolverResult> {
    if let Some(row) = problem.violated_constant_row() {
        return Some(SolverResult::new(
            SolutionStatus::Infeasible,
            format!(
                "Problem is infeasible: constraint '{}' reduces to 0 {} {}",
                row.name,
                row.constraint_type.symbol(),
                row.bound
            ),
        ));
    }

    if problem.num_variables() == 0 {
        return Some(
            SolverResult::optimal(0.0, Vec::new())
                .with_message(format!("'{}' has no variables", problem.name)),
        );
    }

    None
}
