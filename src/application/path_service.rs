// Path service: build -> solve -> extract, with iterative cycle elimination
// Single Responsibility: orchestrate one shortest-path request over fresh model instances

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::application::model_builder::ModelBuilder;
use crate::domain::{
    GraphSpec, PathError, PathResult, PathSolution, ReconstructionFailure, SolutionStatus,
    SolverConfig, SolverService,
};

/// Solve for the minimum-weight path from `graph.start()` to `graph.end()`.
///
/// Every round builds a fresh model. When the solver returns the path plus
/// zero-weight cycles off the path, each cycle is cut off and the model is
/// rebuilt, up to `config.max_cycle_cuts` rounds. All rounds share one
/// `config.time_limit` budget.
pub fn solve_shortest_path(
    graph: &GraphSpec,
    solver: &dyn SolverService,
    config: &SolverConfig,
) -> PathResult<PathSolution> {
    info!(
        vertices = graph.num_vertices(),
        edges = graph.num_edges(),
        start = %graph.start(),
        end = %graph.end(),
        "shortest path request"
    );

    let started = Instant::now();
    let mut cuts: Vec<Vec<usize>> = Vec::new();
    let mut round = 0;

    loop {
        let remaining = config.time_limit.saturating_sub(started.elapsed());
        if round > 0 && remaining.is_zero() {
            return Err(PathError::NoSolutionFound {
                status: SolutionStatus::TimeLimit,
                message: format!(
                    "time limit of {:?} spent after {} cycle cut round(s)",
                    config.time_limit, round
                ),
            });
        }

        let mut model = ModelBuilder::new(graph).with_cycle_cuts(&cuts).build();
        model.solve(solver, remaining)?;

        match model.extract() {
            Ok(mut solution) => {
                solution.cycle_cut_rounds = round;
                info!(
                    total_weight = solution.total_weight,
                    path_edges = solution.num_edges(),
                    "path extracted"
                );
                return Ok(solution);
            }
            Err(PathError::PathReconstruction(ReconstructionFailure::StrayCycles { cycles }))
                if round < config.max_cycle_cuts =>
            {
                round += 1;
                warn!(
                    round,
                    cycles = cycles.len(),
                    "solution contains cycles off the path, adding cuts"
                );
                cuts.extend(cycles);
            }
            Err(err) => return Err(err),
        }
    }
}

/// Holds a solver backend and configuration for repeated requests
pub struct ShortestPathService {
    solver: Arc<dyn SolverService>,
    config: SolverConfig,
}

impl ShortestPathService {
    pub fn new(solver: Arc<dyn SolverService>, config: SolverConfig) -> Self {
        Self { solver, config }
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn solve(&self, graph: &GraphSpec) -> PathResult<PathSolution> {
        solve_shortest_path(graph, self.solver.as_ref(), &self.config)
    }
}
