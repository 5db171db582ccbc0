//! Immutable weighted directed graph with designated endpoints.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque vertex label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vertex(String);

impl Vertex {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Vertex {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Vertex {
    fn from(label: String) -> Self {
        Self(label)
    }
}

/// Directed edge `from -> to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub from: Vertex,
    pub to: Vertex,
}

impl Edge {
    pub fn new(from: impl Into<Vertex>, to: impl Into<Vertex>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.from, self.to)
    }
}

/// Graph construction errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// An endpoint or an edge references a label outside the vertex set.
    #[error("invalid vertex '{vertex}': {context} is not in the vertex set")]
    InvalidVertex { vertex: Vertex, context: String },

    #[error("edge {edge} has no weight")]
    MissingWeight { edge: Edge },

    #[error("edge {edge} has invalid weight {weight} (weights must be finite and non-negative)")]
    InvalidWeight { edge: Edge, weight: f64 },

    #[error("weight given for {edge}, which is not in the edge set")]
    UnknownWeightedEdge { edge: Edge },

    #[error("edge {edge} has more than one weight entry")]
    DuplicateWeight { edge: Edge },

    #[error("vertex '{vertex}' is listed more than once")]
    DuplicateVertex { vertex: Vertex },

    #[error("edge {edge} is listed more than once")]
    DuplicateEdge { edge: Edge },

    #[error("edge {edge} is a self-loop")]
    SelfLoop { edge: Edge },
}

pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// Validated input to the path model.
///
/// Vertex and edge order is the insertion order; the position of an edge in
/// [`GraphSpec::edges`] is the index of its decision variable.
#[derive(Debug, Clone)]
pub struct GraphSpec {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    weights: Vec<f64>,
    edge_index: HashMap<Edge, usize>,
    start: Vertex,
    end: Vertex,
}

impl GraphSpec {
    /// Validate and freeze a graph.
    ///
    /// Endpoint and edge references are checked first (`InvalidVertex`), then
    /// edge shape, then weight completeness (`MissingWeight`).
    pub fn new(
        vertices: Vec<Vertex>,
        edges: Vec<Edge>,
        mut weights: HashMap<Edge, f64>,
        start: Vertex,
        end: Vertex,
    ) -> GraphResult<Self> {
        let mut vertex_set = HashSet::with_capacity(vertices.len());
        for vertex in &vertices {
            if !vertex_set.insert(vertex) {
                return Err(GraphError::DuplicateVertex {
                    vertex: vertex.clone(),
                });
            }
        }

        for (endpoint, context) in [(&start, "start vertex"), (&end, "end vertex")] {
            if !vertex_set.contains(endpoint) {
                return Err(GraphError::InvalidVertex {
                    vertex: endpoint.clone(),
                    context: context.to_string(),
                });
            }
        }

        let mut edge_index = HashMap::with_capacity(edges.len());
        for (i, edge) in edges.iter().enumerate() {
            for endpoint in [&edge.from, &edge.to] {
                if !vertex_set.contains(endpoint) {
                    return Err(GraphError::InvalidVertex {
                        vertex: endpoint.clone(),
                        context: format!("endpoint of edge {}", edge),
                    });
                }
            }
            if edge.from == edge.to {
                return Err(GraphError::SelfLoop { edge: edge.clone() });
            }
            if edge_index.insert(edge.clone(), i).is_some() {
                return Err(GraphError::DuplicateEdge { edge: edge.clone() });
            }
        }

        let mut edge_weights = Vec::with_capacity(edges.len());
        for edge in &edges {
            let weight = weights
                .remove(edge)
                .ok_or_else(|| GraphError::MissingWeight { edge: edge.clone() })?;
            if !weight.is_finite() || weight < 0.0 {
                return Err(GraphError::InvalidWeight {
                    edge: edge.clone(),
                    weight,
                });
            }
            edge_weights.push(weight);
        }

        // Anything left over names an edge outside the edge set
        if let Some(edge) = weights.into_keys().min() {
            return Err(GraphError::UnknownWeightedEdge { edge });
        }

        Ok(Self {
            vertices,
            edges,
            weights: edge_weights,
            edge_index,
            start,
            end,
        })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn weight(&self, index: usize) -> f64 {
        self.weights[index]
    }

    pub fn edge_index(&self, edge: &Edge) -> Option<usize> {
        self.edge_index.get(edge).copied()
    }

    pub fn start(&self) -> &Vertex {
        &self.start
    }

    pub fn end(&self) -> &Vertex {
        &self.end
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Indices of edges leaving `vertex`.
    pub fn outgoing<'a>(&'a self, vertex: &'a Vertex) -> impl Iterator<Item = usize> + 'a {
        self.edges
            .iter()
            .enumerate()
            .filter(move |(_, e)| &e.from == vertex)
            .map(|(i, _)| i)
    }

    /// Indices of edges entering `vertex`.
    pub fn incoming<'a>(&'a self, vertex: &'a Vertex) -> impl Iterator<Item = usize> + 'a {
        self.edges
            .iter()
            .enumerate()
            .filter(move |(_, e)| &e.to == vertex)
            .map(|(i, _)| i)
    }

    /// Required outdegree minus indegree of `vertex` on the selected path.
    pub fn required_excess(&self, vertex: &Vertex) -> i32 {
        if self.start == self.end {
            0
        } else if vertex == &self.start {
            1
        } else if vertex == &self.end {
            -1
        } else {
            0
        }
    }

    /// True when every weight is a whole number, so totals can be reported as integers.
    pub fn has_integral_weights(&self) -> bool {
        self.weights.iter().all(|w| w.fract() == 0.0)
    }
}
