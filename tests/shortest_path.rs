//! End-to-end shortest-path solves through the pure-Rust microlp backend.

use std::path::PathBuf;
use std::time::Duration;

use pathopt::infrastructure::loader::WeightEntry;
use pathopt::{
    load_document, load_graph, render_solution, sample_document, solve_shortest_path, Edge,
    GraphDocument, GraphError, GraphSpec, MicroLpSolver, ModelBuilder, ModelState, PathError,
    PathSolution, SolutionStatus, SolverConfig, Vertex,
};

fn config() -> SolverConfig {
    SolverConfig {
        time_limit: Duration::from_secs(60),
        ..SolverConfig::default()
    }
}

fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

fn solve(graph: &GraphSpec) -> Result<PathSolution, PathError> {
    solve_shortest_path(graph, &MicroLpSolver::new(), &config())
}

fn labels(solution: &PathSolution) -> Vec<&str> {
    solution.vertices.iter().map(Vertex::as_str).collect()
}

/// Selected out-minus-in degree must be +1 at start, -1 at end, 0 elsewhere.
fn assert_degree_balance(graph: &GraphSpec, solution: &PathSolution) {
    for vertex in graph.vertices() {
        let out = solution
            .inclusion
            .iter()
            .filter(|e| e.included && &e.edge.from == vertex)
            .count() as i32;
        let inn = solution
            .inclusion
            .iter()
            .filter(|e| e.included && &e.edge.to == vertex)
            .count() as i32;
        assert_eq!(out - inn, graph.required_excess(vertex), "vertex {}", vertex);
    }
}

#[test]
fn sample_graph_selects_only_a_to_b() {
    let graph = sample_document().into_graph().unwrap();
    let solution = solve(&graph).unwrap();

    assert_eq!(solution.status, SolutionStatus::Optimal);
    assert_eq!(solution.total_weight, 1.0);
    for entry in &solution.inclusion {
        assert_eq!(
            entry.included,
            entry.edge == Edge::new("A", "B"),
            "edge {}",
            entry.edge
        );
    }
    assert_degree_balance(&graph, &solution);

    let report = render_solution(&graph, &solution);
    assert!(report.contains("Total weight: 1\n"));
    assert!(report.contains("(A, B): true"));
}

#[test]
fn sample_graph_to_j_takes_the_shortcut_through_g() {
    let mut doc = sample_document();
    doc.end = "J".into();
    let graph = doc.into_graph().unwrap();
    let solution = solve(&graph).unwrap();

    assert_eq!(solution.total_weight, 3.0);
    assert_eq!(labels(&solution), vec!["A", "G", "I", "J"]);
    assert_degree_balance(&graph, &solution);
}

#[test]
fn cheaper_long_path_beats_expensive_direct_edge() {
    let doc: GraphDocument = serde_yaml::from_str(
        r#"
vertices: [S, M1, M2, T]
edges: [[S, T], [S, M1], [M1, M2], [M2, T]]
weights:
  - { from: S, to: T, weight: 10 }
  - { from: S, to: M1, weight: 1 }
  - { from: M1, to: M2, weight: 2 }
  - { from: M2, to: T, weight: 3 }
start: S
end: T
"#,
    )
    .unwrap();
    let graph = doc.into_graph().unwrap();
    let solution = solve(&graph).unwrap();

    assert_eq!(solution.total_weight, 6.0);
    assert_eq!(labels(&solution), vec!["S", "M1", "M2", "T"]);
    assert!(!solution.is_included(&Edge::new("S", "T")));
}

#[test]
fn disconnected_endpoints_report_no_solution() {
    // B only reaches H, I and J; A is upstream of everything
    let mut doc = sample_document();
    doc.start = "B".into();
    doc.end = "A".into();
    let graph = doc.into_graph().unwrap();

    let err = solve(&graph).unwrap_err();
    assert!(
        matches!(
            err,
            PathError::NoSolutionFound {
                status: SolutionStatus::Infeasible,
                ..
            }
        ),
        "got {:?}",
        err
    );
}

#[test]
fn isolated_end_vertex_is_infeasible_without_a_backend_call() {
    let doc: GraphDocument = serde_json::from_str(
        r#"{"vertices": ["A", "B", "Z"], "edges": [["A", "B"]],
            "weights": [{"from": "A", "to": "B", "weight": 1}],
            "start": "A", "end": "Z"}"#,
    )
    .unwrap();
    let graph = doc.into_graph().unwrap();

    let err = solve(&graph).unwrap_err();
    let PathError::NoSolutionFound { status, message } = err else {
        panic!("expected NoSolutionFound, got {:?}", err);
    };
    assert_eq!(status, SolutionStatus::Infeasible);
    assert!(message.contains("flow_balance[Z]"), "{}", message);
}

#[test]
fn missing_weight_fails_before_any_model_exists() {
    let mut doc = sample_document();
    let dropped: WeightEntry = doc.weights.remove(4);
    assert_eq!((dropped.from.as_str(), dropped.to.as_str()), ("A", "C"));

    let err = doc.into_graph().unwrap_err();
    assert_eq!(
        err,
        GraphError::MissingWeight {
            edge: Edge::new("A", "C")
        }
    );
}

#[test]
fn zero_weight_loop_is_never_reported_as_part_of_the_path() {
    let graph = load_graph(&data_path("zero_weight_loop.json")).unwrap();
    let solution = solve(&graph).unwrap();

    assert_eq!(solution.total_weight, 4.0);
    assert_eq!(labels(&solution), vec!["S", "B", "T"]);
    assert!(!solution.is_included(&Edge::new("X", "Y")));
    assert!(!solution.is_included(&Edge::new("Y", "X")));
    assert_degree_balance(&graph, &solution);
}

#[test]
fn start_equal_to_end_is_an_empty_path() {
    let mut doc = sample_document();
    doc.end = doc.start.clone();
    let graph = doc.into_graph().unwrap();
    let solution = solve(&graph).unwrap();

    assert_eq!(solution.total_weight, 0.0);
    assert!(solution.edges.is_empty());
    assert_eq!(labels(&solution), vec!["A"]);
    assert!(solution.inclusion.iter().all(|e| !e.included));
}

#[test]
fn graph_without_edges_and_same_endpoints_solves_trivially() {
    let doc = GraphDocument {
        vertices: vec!["only".into()],
        edges: Vec::new(),
        weights: Vec::new(),
        start: "only".into(),
        end: "only".into(),
        solver: None,
    };
    let graph = doc.into_graph().unwrap();
    let solution = solve(&graph).unwrap();
    assert_eq!(solution.total_weight, 0.0);
    assert_eq!(labels(&solution), vec!["only"]);
}

#[test]
fn model_walks_through_every_state() {
    let graph = sample_document().into_graph().unwrap();
    let mut model = ModelBuilder::new(&graph).build();
    assert_eq!(model.state(), ModelState::Built);

    let result = model
        .solve(&MicroLpSolver::new(), Duration::from_secs(60))
        .unwrap();
    assert_eq!(result.status, SolutionStatus::Optimal);
    assert_eq!(model.state(), ModelState::Solved);

    let solution = model.extract().unwrap();
    assert_eq!(model.state(), ModelState::Extracted);
    assert_eq!(solution.edges, vec![Edge::new("A", "B")]);
}

#[test]
fn bundled_sample_file_matches_builtin_sample() {
    let doc = load_document(&data_path("sample.yaml")).unwrap();
    let config = doc.solver_config(SolverConfig::default()).unwrap();
    assert_eq!(config.time_limit, Duration::from_secs(300));

    let from_file = doc.into_graph().unwrap();
    let builtin = sample_document().into_graph().unwrap();
    assert_eq!(from_file.edges(), builtin.edges());
    assert_eq!(from_file.weights(), builtin.weights());
    assert_eq!(solve(&from_file).unwrap().total_weight, 1.0);
}
