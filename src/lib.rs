// Domain layer: graph input, optimization models, solver contract
pub mod domain;

// Application layer: model building, extraction and orchestration
pub mod application;

// Infrastructure layer: graph documents on disk
pub mod infrastructure;

// Solver adapters: Concrete implementations of SolverService
pub mod solver;

// Re-export commonly used types
pub use domain::{
    Constraint, ConstraintType, Edge, GraphError, GraphSpec, ModelState, ObjectiveFunction,
    OptimizationProblem, PathError, PathSolution, SolutionStatus, SolverBackend, SolverConfig,
    SolverError, SolverResult, SolverService, Variable, VariableType, Vertex,
};

pub use application::{
    render_model, render_solution, solve_shortest_path, ModelBuilder, PathModel,
    ShortestPathService, SolutionExtractor,
};

pub use infrastructure::{load_document, load_graph, sample_document, GraphDocument, LoadError};

pub use solver::{MicroLpSolver, SolverFactory};

#[cfg(feature = "cbc")]
pub use solver::CoinCbcSolver;

#[cfg(feature = "highs")]
pub use solver::HighsSolver;
