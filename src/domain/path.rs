// Path-level results and the errors the pipeline can surface

use std::fmt;

use serde::Serialize;

use super::graph::{Edge, GraphError, Vertex};
use super::models::SolverStatistics;
use super::solver_service::SolverError;
use super::value_objects::SolutionStatus;

/// Inclusion flag for one graph edge in the reported solution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeInclusion {
    pub edge: Edge,
    pub weight: f64,
    pub included: bool,
}

/// Minimum-weight path extracted from a solved model
#[derive(Debug, Clone, Serialize)]
pub struct PathSolution {
    pub status: SolutionStatus,
    /// Vertices in walk order, starting at the start vertex.
    pub vertices: Vec<Vertex>,
    /// Path edges in walk order.
    pub edges: Vec<Edge>,
    pub total_weight: f64,
    /// One entry per graph edge, in graph order.
    pub inclusion: Vec<EdgeInclusion>,
    pub statistics: SolverStatistics,
    /// Cycle-elimination rounds needed before the path came out clean.
    pub cycle_cut_rounds: usize,
}

impl PathSolution {
    pub fn is_included(&self, edge: &Edge) -> bool {
        self.inclusion
            .iter()
            .any(|entry| entry.included && &entry.edge == edge)
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }
}

/// Lifecycle of a [`PathModel`](crate::application::PathModel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelState {
    Built,
    Solved,
    Extracted,
    Failed,
}

impl fmt::Display for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelState::Built => write!(f, "built"),
            ModelState::Solved => write!(f, "solved"),
            ModelState::Extracted => write!(f, "extracted"),
            ModelState::Failed => write!(f, "failed"),
        }
    }
}

/// Why the selected edges could not be turned into a clean start-to-end path
#[derive(Debug, Clone, PartialEq)]
pub enum ReconstructionFailure {
    /// Selected outdegree minus indegree differs from the required excess.
    Unbalanced {
        vertex: Vertex,
        expected: i32,
        actual: i32,
    },
    /// The end vertex cannot be reached from the start over selected edges.
    Unreachable { visited: usize },
    /// Selected edges off the path; each inner list is one directed cycle of edge indices.
    StrayCycles { cycles: Vec<Vec<usize>> },
    /// Selected edges off the path that do not close into cycles.
    DanglingEdges { edges: Vec<Edge> },
}

impl fmt::Display for ReconstructionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconstructionFailure::Unbalanced {
                vertex,
                expected,
                actual,
            } => write!(
                f,
                "vertex '{}' has selected out-minus-in degree {} (expected {})",
                vertex, actual, expected
            ),
            ReconstructionFailure::Unreachable { visited } => write!(
                f,
                "end vertex not reachable from start over selected edges ({} vertices visited)",
                visited
            ),
            ReconstructionFailure::StrayCycles { cycles } => {
                let edges: usize = cycles.iter().map(Vec::len).sum();
                write!(
                    f,
                    "{} selected cycle(s) ({} edges) off the path",
                    cycles.len(),
                    edges
                )
            }
            ReconstructionFailure::DanglingEdges { edges } => {
                let names: Vec<String> = edges.iter().map(Edge::to_string).collect();
                write!(f, "selected edges off the path: {}", names.join(", "))
            }
        }
    }
}

/// Errors surfaced by the path pipeline
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathError {
    #[error("invalid graph: {0}")]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    /// The backend finished without a usable assignment.
    #[error("no solution found ({status}): {message}")]
    NoSolutionFound {
        status: SolutionStatus,
        message: String,
    },

    #[error("path reconstruction failed: {0}")]
    PathReconstruction(ReconstructionFailure),

    #[error("selected edge weights sum to {computed} but the solver reported objective {reported:?}")]
    ObjectiveMismatch {
        computed: f64,
        reported: Option<f64>,
    },

    #[error("assignment for edge {edge} is {value}, which is not binary")]
    NonIntegralAssignment { edge: Edge, value: f64 },

    #[error("solver returned {actual} values for {expected} edge variables")]
    AssignmentLength { expected: usize, actual: usize },

    #[error("cannot {operation} a model in state '{state}'")]
    InvalidState {
        operation: &'static str,
        state: ModelState,
    },
}

pub type PathResult<T> = std::result::Result<T, PathError>;
