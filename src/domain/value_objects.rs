// Domain value objects shared by the model builder, the solver adapters and reporting

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of decision variable in the optimization problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableType {
    /// Continuous real number (x ∈ ℝ)
    Continuous,
    /// Integer number (x ∈ ℤ)
    Integer,
    /// Binary variable (x ∈ {0, 1})
    Binary,
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableType::Continuous => write!(f, "continuous"),
            VariableType::Integer => write!(f, "integer"),
            VariableType::Binary => write!(f, "binary"),
        }
    }
}

/// Type of constraint comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintType {
    /// Less than or equal (≤)
    LessThanOrEqual,
    /// Equal (=)
    Equal,
    /// Greater than or equal (≥)
    GreaterThanOrEqual,
}

impl ConstraintType {
    /// Whether `lhs` satisfies the comparison against `bound` within `tolerance`.
    pub fn holds(self, lhs: f64, bound: f64, tolerance: f64) -> bool {
        match self {
            ConstraintType::LessThanOrEqual => lhs <= bound + tolerance,
            ConstraintType::Equal => (lhs - bound).abs() <= tolerance,
            ConstraintType::GreaterThanOrEqual => lhs >= bound - tolerance,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ConstraintType::LessThanOrEqual => "<=",
            ConstraintType::Equal => "==",
            ConstraintType::GreaterThanOrEqual => ">=",
        }
    }
}

/// Direction of optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationType {
    /// Minimize the objective function
    Minimize,
    /// Maximize the objective function
    Maximize,
}

impl fmt::Display for OptimizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizationType::Minimize => write!(f, "minimize"),
            OptimizationType::Maximize => write!(f, "maximize"),
        }
    }
}

/// Status reported by a solver backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolutionStatus {
    /// Found optimal solution
    Optimal,
    /// Found feasible solution (may not be optimal)
    Feasible,
    /// Problem has no feasible solution
    Infeasible,
    /// Time limit reached before any solution was proven
    TimeLimit,
    /// Backend failed; the result message carries the diagnostic
    Error,
}

impl SolutionStatus {
    /// Whether the status carries a usable variable assignment.
    pub fn has_solution(self) -> bool {
        matches!(self, SolutionStatus::Optimal | SolutionStatus::Feasible)
    }
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionStatus::Optimal => write!(f, "Optimal"),
            SolutionStatus::Feasible => write!(f, "Feasible"),
            SolutionStatus::Infeasible => write!(f, "Infeasible"),
            SolutionStatus::TimeLimit => write!(f, "Time Limit Reached"),
            SolutionStatus::Error => write!(f, "Error"),
        }
    }
}

/// Solver backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum SolverBackend {
    /// Automatically select the best compiled-in solver
    #[default]
    Auto,
    /// Pure-Rust branch and bound (microlp)
    MicroLp,
    /// COIN-OR CBC solver
    CoinCbc,
    /// HiGHS solver
    Highs,
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverBackend::Auto => write!(f, "Auto"),
            SolverBackend::MicroLp => write!(f, "microlp"),
            SolverBackend::CoinCbc => write!(f, "COIN-OR CBC"),
            SolverBackend::Highs => write!(f, "HiGHS"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_optimal_and_feasible_carry_solutions() {
        assert!(SolutionStatus::Optimal.has_solution());
        assert!(SolutionStatus::Feasible.has_solution());
        assert!(!SolutionStatus::Infeasible.has_solution());
        assert!(!SolutionStatus::TimeLimit.has_solution());
        assert!(!SolutionStatus::Error.has_solution());
    }

    #[test]
    fn constraint_comparison_respects_tolerance() {
        assert!(ConstraintType::Equal.holds(1.0 + 1e-9, 1.0, 1e-6));
        assert!(!ConstraintType::Equal.holds(1.1, 1.0, 1e-6));
        assert!(ConstraintType::LessThanOrEqual.holds(2.0, 2.0, 0.0));
        assert!(!ConstraintType::GreaterThanOrEqual.holds(-1.0, 0.0, 1e-6));
    }

    #[test]
    fn backend_names_deserialize_in_snake_case() {
        let backend: SolverBackend = serde_json::from_str("\"micro_lp\"").unwrap();
        assert_eq!(backend, SolverBackend::MicroLp);
        let backend: SolverBackend = serde_json::from_str("\"coin_cbc\"").unwrap();
        assert_eq!(backend, SolverBackend::CoinCbc);
    }
}
