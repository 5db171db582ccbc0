use std::time::Duration;

use serde::Serialize;

use super::value_objects::{ConstraintType, OptimizationType, SolutionStatus, SolverBackend, VariableType};

/// Tolerance used when checking constant rows and assignments against bounds.
pub const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// Default wall-clock budget handed to a backend.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(300);

/// Default number of cycle-elimination rounds before a degenerate solution is reported.
pub const DEFAULT_MAX_CYCLE_CUTS: usize = 32;

/// Decision variable in an optimization problem
#[derive(Debug, Clone)]
pub struct Variable {
    pub variable_type: VariableType,
    pub lower_bound: f64,
    pub upper_bound: Option<f64>,
    pub name: String,
}

impl Variable {
    pub fn continuous(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Continuous,
            lower_bound: 0.0,
            upper_bound: None,
            name: name.into(),
        }
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Binary,
            lower_bound: 0.0,
            upper_bound: Some(1.0),
            name: name.into(),
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self.variable_type,
            VariableType::Integer | VariableType::Binary
        )
    }

    /// Whether `value` lies within the bounds and, for integer kinds, is integral.
    pub fn admits(&self, value: f64) -> bool {
        let tol = FEASIBILITY_TOLERANCE;
        value.is_finite()
            && value >= self.lower_bound - tol
            && self.upper_bound.map_or(true, |upper| value <= upper + tol)
            && (!self.is_integer() || (value - value.round()).abs() <= tol)
    }
}

/// Objective function to minimize or maximize
#[derive(Debug, Clone)]
pub struct ObjectiveFunction {
    pub optimization_type: OptimizationType,
    pub coefficients: Vec<f64>,
}

impl ObjectiveFunction {
    pub fn minimize(coefficients: Vec<f64>) -> Self {
        Self {
            optimization_type: OptimizationType::Minimize,
            coefficients,
        }
    }

    pub fn maximize(coefficients: Vec<f64>) -> Self {
        Self {
            optimization_type: OptimizationType::Maximize,
            coefficients,
        }
    }

    pub fn num_variables(&self) -> usize {
        self.coefficients.len()
    }
}

/// Linear constraint on variables
#[derive(Debug, Clone)]
pub struct Constraint {
    pub constraint_type: ConstraintType,
    pub coefficients: Vec<f64>,
    pub bound: f64,
    pub name: String,
}

impl Constraint {
    pub fn new(constraint_type: ConstraintType, coefficients: Vec<f64>, bound: f64) -> Self {
        Self {
            constraint_type,
            coefficients,
            bound,
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn num_variables(&self) -> usize {
        self.coefficients.len()
    }

    /// A row whose coefficients are all zero reduces to `0 <op> bound`.
    pub fn is_constant(&self) -> bool {
        self.coefficients.iter().all(|&c| c == 0.0)
    }

    pub fn is_satisfied_by(&self, values: &[f64]) -> bool {
        let lhs: f64 = self
            .coefficients
            .iter()
            .zip(values)
            .map(|(coeff, value)| coeff * value)
            .sum();
        self.constraint_type
            .holds(lhs, self.bound, FEASIBILITY_TOLERANCE)
    }
}

/// Configuration for the solver and the path pipeline
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    pub time_limit: Duration,
    pub verbose: bool,
    /// Cycle-elimination rounds allowed before stray cycles are reported; 0 is strict.
    pub max_cycle_cuts: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverBackend::Auto,
            time_limit: DEFAULT_TIME_LIMIT,
            verbose: false,
            max_cycle_cuts: DEFAULT_MAX_CYCLE_CUTS,
        }
    }
}

/// Complete optimization problem
#[derive(Debug, Clone)]
pub struct OptimizationProblem {
    pub name: String,
    pub objective: ObjectiveFunction,
    pub constraints: Vec<Constraint>,
    pub variables: Vec<Variable>,
}

impl OptimizationProblem {
    pub fn new(objective: ObjectiveFunction) -> Self {
        Self {
            name: String::new(),
            objective,
            constraints: Vec::new(),
            variables: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn add_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn with_variables(mut self, variables: Vec<Variable>) -> Self {
        self.variables = variables;
        self
    }

    pub fn num_variables(&self) -> usize {
        self.objective.num_variables()
    }

    pub fn num_integer_variables(&self) -> usize {
        self.variables.iter().filter(|v| v.is_integer()).count()
    }

    pub fn num_binary_variables(&self) -> usize {
        self.variables
            .iter()
            .filter(|v| v.variable_type == VariableType::Binary)
            .count()
    }

    /// First constant row that no assignment can satisfy, if any.
    pub fn violated_constant_row(&self) -> Option<&Constraint> {
        self.constraints.iter().find(|c| {
            c.is_constant()
                && !c
                    .constraint_type
                    .holds(0.0, c.bound, FEASIBILITY_TOLERANCE)
        })
    }

    /// Whether `values` is a full assignment meeting every bound and every row.
    pub fn is_satisfied_by(&self, values: &[f64]) -> bool {
        values.len() == self.num_variables()
            && self
                .variables
                .iter()
                .zip(values)
                .all(|(variable, &value)| variable.admits(value))
            && self.constraints.iter().all(|c| c.is_satisfied_by(values))
    }

    /// Rows that actually reference a variable.
    pub fn active_constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter().filter(|c| !c.is_constant())
    }

    pub fn statistics(&self) -> SolverStatistics {
        SolverStatistics {
            solve_time_ms: 0.0,
            num_variables: self.num_variables() as u32,
            num_constraints: self.constraints.len() as u32,
            num_integer_vars: self.num_integer_variables() as u32,
            num_binary_vars: self.num_binary_variables() as u32,
        }
    }
}

/// Statistics about the solve process
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SolverStatistics {
    pub solve_time_ms: f64,
    pub num_variables: u32,
    pub num_constraints: u32,
    pub num_integer_vars: u32,
    pub num_binary_vars: u32,
}

/// Raw outcome of one backend call
#[derive(Debug, Clone)]
pub struct SolverResult {
    pub status: SolutionStatus,
    pub objective_value: Option<f64>,
    pub variable_values: Vec<f64>,
    pub message: String,
    pub statistics: SolverStatistics,
}

impl SolverResult {
    pub fn new(status: SolutionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            objective_value: None,
            variable_values: Vec::new(),
            message: message.into(),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn optimal(value: f64, variable_values: Vec<f64>) -> Self {
        Self {
            status: SolutionStatus::Optimal,
            objective_value: Some(value),
            variable_values,
            message: "Optimal solution found".to_string(),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn feasible(value: f64, variable_values: Vec<f64>) -> Self {
        Self {
            status: SolutionStatus::Feasible,
            objective_value: Some(value),
            variable_values,
            message: "Feasible solution found".to_string(),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(SolutionStatus::Error, message)
    }

    /// Outcome of a search cut short by a time or gap limit. The incumbent is
    /// kept as `Feasible` only if it satisfies `problem`; otherwise the limit
    /// was hit before any solution existed.
    pub fn interrupted(
        problem: &OptimizationProblem,
        objective: f64,
        variable_values: Vec<f64>,
        backend: &str,
    ) -> Self {
        if problem.is_satisfied_by(&variable_values) {
            Self::feasible(objective, variable_values).with_message(format!(
                "{} stopped early; best solution for '{}' is not proven optimal",
                backend, problem.name
            ))
        } else {
            Self::new(
                SolutionStatus::TimeLimit,
                format!("{} reached its limit before finding a solution", backend),
            )
        }
    }

    pub fn with_statistics(mut self, statistics: SolverStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Whether the result carries an assignment worth decoding.
    pub fn is_feasible(&self) -> bool {
        self.status.has_solution()
    }
}
