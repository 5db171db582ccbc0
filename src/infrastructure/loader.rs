// Infrastructure: graph documents on disk (JSON / YAML) and the built-in sample

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{Edge, GraphError, GraphSpec, SolverBackend, SolverConfig, Vertex};

/// Errors raised while reading a graph document
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON graph document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML graph document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported graph file extension for {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),

    #[error("invalid solver section: {0}")]
    InvalidSolverSection(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// One weight entry of a graph document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub from: String,
    pub to: String,
    pub weight: f64,
}

/// Optional solver overrides carried by a graph document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverSection {
    #[serde(default)]
    pub backend: Option<SolverBackend>,
    #[serde(default)]
    pub time_limit_secs: Option<f64>,
    #[serde(default)]
    pub max_cycle_cuts: Option<usize>,
}

/// Serialized form of a graph and its endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphDocument {
    pub vertices: Vec<String>,
    pub edges: Vec<(String, String)>,
    #[serde(default)]
    pub weights: Vec<WeightEntry>,
    pub start: String,
    pub end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver: Option<SolverSection>,
}

impl GraphDocument {
    /// Validate the document into a [`GraphSpec`].
    pub fn into_graph(self) -> Result<GraphSpec, GraphError> {
        let mut weights: HashMap<Edge, f64> = HashMap::with_capacity(self.weights.len());
        for entry in self.weights {
            let edge = Edge::new(entry.from, entry.to);
            match weights.entry(edge) {
                Entry::Occupied(slot) => {
                    return Err(GraphError::DuplicateWeight {
                        edge: slot.key().clone(),
                    })
                }
                Entry::Vacant(slot) => {
                    slot.insert(entry.weight);
                }
            }
        }

        GraphSpec::new(
            self.vertices.into_iter().map(Vertex::from).collect(),
            self.edges
                .into_iter()
                .map(|(from, to)| Edge::new(from, to))
                .collect(),
            weights,
            Vertex::from(self.start),
            Vertex::from(self.end),
        )
    }

    /// Layer the document's solver section over `base`.
    pub fn solver_config(&self, base: SolverConfig) -> Result<SolverConfig, LoadError> {
        let Some(section) = &self.solver else {
            return Ok(base);
        };

        let mut config = base;
        if let Some(backend) = section.backend {
            config.backend = backend;
        }
        if let Some(secs) = section.time_limit_secs {
            config.time_limit = Duration::try_from_secs_f64(secs).map_err(|e| {
                LoadError::InvalidSolverSection(format!("time_limit_secs {}: {}", secs, e))
            })?;
        }
        if let Some(cuts) = section.max_cycle_cuts {
            config.max_cycle_cuts = cuts;
        }
        Ok(config)
    }
}

/// Read a graph document, choosing the format from the file extension.
pub fn load_document(path: &Path) -> Result<GraphDocument, LoadError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match extension.as_deref() {
        Some("json") => Ok(serde_json::from_str(&content)?),
        Some("yaml" | "yml") => Ok(serde_yaml::from_str(&content)?),
        _ => Err(LoadError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Read and validate a graph file in one step.
pub fn load_graph(path: &Path) -> Result<GraphSpec, LoadError> {
    Ok(load_document(path)?.into_graph()?)
}

/// Ten-vertex sample: every edge has weight 1, start A, end B.
pub fn sample_document() -> GraphDocument {
    let edges = [
        ("A", "B"),
        ("B", "H"),
        ("H", "I"),
        ("I", "J"),
        ("A", "C"),
        ("A", "D"),
        ("D", "E"),
        ("A", "G"),
        ("G", "I"),
        ("A", "F"),
        ("F", "D"),
    ];

    GraphDocument {
        vertices: ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"]
            .iter()
            .map(|v| v.to_string())
            .collect(),
        edges: edges
            .iter()
            .map(|&(u, v)| (u.to_string(), v.to_string()))
            .collect(),
        weights: edges
            .iter()
            .map(|&(u, v)| WeightEntry {
                from: u.to_string(),
                to: v.to_string(),
                weight: 1.0,
            })
            .collect(),
        start: "A".to_string(),
        end: "B".to_string(),
        solver: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
vertices: [S, M, T]
edges:
  - [S, M]
  - [M, T]
weights:
  - { from: S, to: M, weight: 1.5 }
  - { from: M, to: T, weight: 2 }
start: S
end: T
solver:
  backend: micro_lp
  time_limit_secs: 12.5
"#;

    #[test]
    fn parses_yaml_document_with_solver_section() {
        let doc: GraphDocument = serde_yaml::from_str(YAML).unwrap();
        let config = doc.solver_config(SolverConfig::default()).unwrap();
        assert_eq!(config.backend, SolverBackend::MicroLp);
        assert_eq!(config.time_limit, Duration::from_millis(12_500));
        assert_eq!(config.max_cycle_cuts, SolverConfig::default().max_cycle_cuts);

        let graph = doc.into_graph().unwrap();
        assert_eq!(graph.num_edges(), 2);
        assert_eq!(graph.weight(0), 1.5);
    }

    #[test]
    fn parses_json_document() {
        let json = r#"{
            "vertices": ["A", "B"],
            "edges": [["A", "B"]],
            "weights": [{"from": "A", "to": "B", "weight": 4}],
            "start": "A",
            "end": "B"
        }"#;
        let doc: GraphDocument = serde_json::from_str(json).unwrap();
        assert!(doc.solver.is_none());
        assert_eq!(doc.into_graph().unwrap().weight(0), 4.0);
    }

    #[test]
    fn duplicate_weight_entries_are_rejected() {
        let mut doc = sample_document();
        doc.weights.push(WeightEntry {
            from: "A".into(),
            to: "B".into(),
            weight: 7.0,
        });
        assert_eq!(
            doc.into_graph().unwrap_err(),
            GraphError::DuplicateWeight {
                edge: Edge::new("A", "B")
            }
        );
    }

    #[test]
    fn negative_time_limit_is_rejected() {
        let mut doc = sample_document();
        doc.solver = Some(SolverSection {
            time_limit_secs: Some(-1.0),
            ..SolverSection::default()
        });
        assert!(matches!(
            doc.solver_config(SolverConfig::default()),
            Err(LoadError::InvalidSolverSection(_))
        ));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let path = std::env::temp_dir().join("pathopt-loader-test.txt");
        fs::write(&path, "vertices: []").unwrap();
        let err = load_document(&path).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(matches!(err, LoadError::UnsupportedFormat(_)));
    }

    #[test]
    fn sample_matches_reference_data() {
        let graph = sample_document().into_graph().unwrap();
        assert_eq!(graph.num_vertices(), 10);
        assert_eq!(graph.num_edges(), 11);
        assert!(graph.weights().iter().all(|&w| w == 1.0));
        assert_eq!(graph.start().as_str(), "A");
        assert_eq!(graph.end().as_str(), "B");
    }
}
