// Shared translation between domain problems and good_lp models
// Used by every good_lp-backed adapter (microlp, COIN-OR CBC)

use good_lp::{
    variable, variables, Constraint as GoodLpConstraint, Expression, ProblemVariables,
    ResolutionError, Solution as GoodLpSolutionTrait, SolutionStatus as GoodLpStatus,
    Variable as GoodLpVariable,
};

use crate::domain::{
    ConstraintType, OptimizationProblem, SolutionStatus, SolverResult, VariableType,
};

/// good_lp pieces of a domain problem, ready to be handed to a backend
pub(crate) struct GoodLpModel {
    pub vars: ProblemVariables,
    pub columns: Vec<GoodLpVariable>,
    pub objective: Expression,
    pub rows: Vec<GoodLpConstraint>,
}

pub(crate) fn translate(problem: &OptimizationProblem) -> GoodLpModel {
    // Build variables using good_lp
    let mut vars = variables!();
    let mut columns: Vec<GoodLpVariable> = Vec::with_capacity(problem.variables.len());

    for var_def in &problem.variables {
        let lower = var_def.lower_bound;
        let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);

        let var = match var_def.variable_type {
            VariableType::Binary => vars.add(variable().binary()),
            VariableType::Integer => vars.add(variable().integer().min(lower).max(upper)),
            VariableType::Continuous => vars.add(variable().min(lower).max(upper)),
        };
        columns.push(var);
    }

    let objective = linear_expression(&problem.objective.coefficients, &columns);

    // Constant rows were settled before translation
    let rows = problem
        .active_constraints()
        .map(|constraint| {
            let lhs = linear_expression(&constraint.coefficients, &columns);
            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => lhs.leq(constraint.bound),
                ConstraintType::Equal => lhs.eq(constraint.bound),
                ConstraintType::GreaterThanOrEqual => lhs.geq(constraint.bound),
            }
        })
        .collect();

    GoodLpModel {
        vars,
        columns,
        objective,
        rows,
    }
}

fn linear_expression(coefficients: &[f64], columns: &[GoodLpVariable]) -> Expression {
    let mut expr: Expression = 0.into();
    for (&coeff, &var) in coefficients.iter().zip(columns) {
        if coeff != 0.0 {
            expr += coeff * var;
        }
    }
    expr
}

/// Raised by good_lp's microlp adapter when the deadline passes without an incumbent.
const NO_INCUMBENT_AT_DEADLINE: &str = "Time limit reached before finding a feasible solution";

/// Map a good_lp outcome onto a domain result. `reported_objective` reads the
/// backend's own objective value from the solution. Backend failures become
/// `SolutionStatus::Error` with the diagnostic attached.
pub(crate) fn into_result<S: GoodLpSolutionTrait>(
    outcome: Result<S, ResolutionError>,
    columns: &[GoodLpVariable],
    problem: &OptimizationProblem,
    backend: &str,
    reported_objective: impl FnOnce(S) -> f64,
) -> SolverResult {
    match outcome {
        Ok(sol) => {
            let variable_values: Vec<f64> = columns.iter().map(|&var| sol.value(var)).collect();
            let status = sol.status();
            let objective = reported_objective(sol);

            match status {
                GoodLpStatus::Optimal => SolverResult::optimal(objective, variable_values)
                    .with_message(format!("Optimal solution found for '{}'", problem.name)),
                GoodLpStatus::TimeLimit | GoodLpStatus::GapLimit => {
                    SolverResult::interrupted(problem, objective, variable_values, backend)
                }
            }
        }
        Err(ResolutionError::Infeasible) => SolverResult::new(
            SolutionStatus::Infeasible,
            "Problem is infeasible: no solution satisfies all constraints",
        ),
        Err(ResolutionError::Unbounded) => SolverResult::error(format!(
            "{} reports the problem as unbounded",
            backend
        )),
        Err(ResolutionError::Other(reason))
            if reason == NO_INCUMBENT_AT_DEADLINE || reason == "Stopped" =>
        {
            SolverResult::new(
                SolutionStatus::TimeLimit,
                format!("{} stopped before finding a solution: {}", backend, reason),
            )
        }
        Err(e) => SolverResult::error(format!("{} failed: {:?}", backend, e)),
    }
}
