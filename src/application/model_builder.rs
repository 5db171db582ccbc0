// Model builder: translates a validated graph into a binary flow-conservation ILP
//
// One binary variable per edge; one equality row per vertex requiring
// out(v) - in(v) = excess(v); objective minimises the selected weight.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::application::extractor::SolutionExtractor;
use crate::domain::{
    Constraint, ConstraintType, GraphSpec, ModelState, ObjectiveFunction, OptimizationProblem,
    PathError, PathResult, PathSolution, SolutionStatus, SolverError, SolverResult, SolverService,
    Variable, Vertex,
};

pub const MODEL_NAME: &str = "shortest-path";

/// Builds a [`PathModel`] from a graph plus optional cycle-elimination cuts
pub struct ModelBuilder<'g> {
    graph: &'g GraphSpec,
    cycle_cuts: Vec<Vec<usize>>,
}

impl<'g> ModelBuilder<'g> {
    pub fn new(graph: &'g GraphSpec) -> Self {
        Self {
            graph,
            cycle_cuts: Vec::new(),
        }
    }

    /// Forbid each given directed cycle (edge indices) from being fully selected.
    pub fn with_cycle_cuts(mut self, cuts: &[Vec<usize>]) -> Self {
        self.cycle_cuts.extend(cuts.iter().cloned());
        self
    }

    pub fn build(self) -> PathModel<'g> {
        let graph = self.graph;

        let variables: Vec<Variable> = graph
            .edges()
            .iter()
            .map(|edge| Variable::binary(format!("include_edge[{},{}]", edge.from, edge.to)))
            .collect();

        let mut problem = OptimizationProblem::new(objective(graph))
            .with_name(MODEL_NAME)
            .with_variables(variables);

        for vertex in graph.vertices() {
            problem = problem.add_constraint(flow_balance_row(graph, vertex));
        }
        for (k, cycle) in self.cycle_cuts.iter().enumerate() {
            problem = problem.add_constraint(cycle_cut_row(graph, k, cycle));
        }

        debug!(
            variables = problem.num_variables(),
            constraints = problem.constraints.len(),
            cycle_cuts = self.cycle_cuts.len(),
            "built path model"
        );

        PathModel {
            graph,
            problem,
            state: ModelState::Built,
            result: None,
        }
    }
}

/// `Σ weight(e) · x(e)`, minimised.
fn objective(graph: &GraphSpec) -> ObjectiveFunction {
    ObjectiveFunction::minimize(graph.weights().to_vec())
}

/// `Σ x(out-edges) − Σ x(in-edges) = excess(vertex)`.
pub fn flow_balance_row(graph: &GraphSpec, vertex: &Vertex) -> Constraint {
    let mut coefficients = vec![0.0; graph.num_edges()];
    for i in graph.outgoing(vertex) {
        coefficients[i] += 1.0;
    }
    for i in graph.incoming(vertex) {
        coefficients[i] -= 1.0;
    }

    Constraint::new(
        ConstraintType::Equal,
        coefficients,
        f64::from(graph.required_excess(vertex)),
    )
    .with_name(format!("flow_balance[{}]", vertex))
}

/// `Σ_{e∈cycle} x(e) ≤ |cycle| − 1`.
pub fn cycle_cut_row(graph: &GraphSpec, k: usize, cycle: &[usize]) -> Constraint {
    let mut coefficients = vec![0.0; graph.num_edges()];
    for &i in cycle {
        coefficients[i] = 1.0;
    }

    Constraint::new(
        ConstraintType::LessThanOrEqual,
        coefficients,
        cycle.len() as f64 - 1.0,
    )
    .with_name(format!("no_cycle[{}]", k))
}

/// One built model instance; solved at most once and extracted at most once
pub struct PathModel<'g> {
    graph: &'g GraphSpec,
    problem: OptimizationProblem,
    state: ModelState,
    result: Option<SolverResult>,
}

impl<'g> PathModel<'g> {
    pub fn graph(&self) -> &'g GraphSpec {
        self.graph
    }

    pub fn problem(&self) -> &OptimizationProblem {
        &self.problem
    }

    pub fn state(&self) -> ModelState {
        self.state
    }

    /// Hand the problem to `solver`. Moves `Built → Solved`, or to `Failed` when
    /// the backend rejects the problem or reports an error status.
    pub fn solve(
        &mut self,
        solver: &dyn SolverService,
        time_limit: Duration,
    ) -> PathResult<&SolverResult> {
        self.expect_state(ModelState::Built, "solve")?;

        info!(
            model = %self.problem.name,
            backend = solver.name(),
            time_limit_secs = time_limit.as_secs_f64(),
            "solving"
        );
        let started = Instant::now();

        let result = match solver.solve(&self.problem, time_limit) {
            Ok(result) => result,
            Err(err) => {
                self.state = ModelState::Failed;
                return Err(err.into());
            }
        };

        info!(
            status = %result.status,
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "solver finished"
        );

        if result.status == SolutionStatus::Error {
            self.state = ModelState::Failed;
            return Err(SolverError::ExecutionFailed(format!(
                "{} reported an error: {}",
                solver.name(),
                result.message
            ))
            .into());
        }

        self.state = ModelState::Solved;
        let stored = self.result.insert(result);
        Ok(&*stored)
    }

    /// Decode the solver result into a path. Moves `Solved → Extracted`, or to
    /// `Failed` on any extraction error.
    pub fn extract(&mut self) -> PathResult<PathSolution> {
        self.expect_state(ModelState::Solved, "extract")?;

        let outcome = match &self.result {
            Some(result) => SolutionExtractor::new(self.graph).extract(result),
            None => Err(PathError::InvalidState {
                operation: "extract",
                state: self.state,
            }),
        };

        self.state = match outcome {
            Ok(_) => ModelState::Extracted,
            Err(_) => ModelState::Failed,
        };
        outcome
    }

    fn expect_state(&self, expected: ModelState, operation: &'static str) -> PathResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(PathError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }
}
