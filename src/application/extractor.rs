// Solution extractor: validates a solver result against the graph and decodes the path

use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::domain::{
    Edge, EdgeInclusion, GraphSpec, PathError, PathResult, PathSolution, ReconstructionFailure,
    SolverResult, Vertex, FEASIBILITY_TOLERANCE,
};

/// Decodes [`SolverResult`]s produced for one graph
pub struct SolutionExtractor<'g> {
    graph: &'g GraphSpec,
}

impl<'g> SolutionExtractor<'g> {
    pub fn new(graph: &'g GraphSpec) -> Self {
        Self { graph }
    }

    /// Check status, assignment shape, objective consistency, degree balance and
    /// reachability, then return the ordered path.
    pub fn extract(&self, result: &SolverResult) -> PathResult<PathSolution> {
        if !result.is_feasible() {
            return Err(PathError::NoSolutionFound {
                status: result.status,
                message: result.message.clone(),
            });
        }

        let selected = self.selected_edges(&result.variable_values)?;
        let total_weight = self.check_objective(&selected, result.objective_value)?;
        self.check_degree_balance(&selected)?;

        let path = self.walk(&selected)?;
        let on_path: BTreeSet<usize> = path.iter().copied().collect();
        let stray: BTreeSet<usize> = selected.difference(&on_path).copied().collect();
        if !stray.is_empty() {
            return Err(PathError::PathReconstruction(self.classify_stray(stray)));
        }

        let edges = self.graph.edges();
        let mut vertices = vec![self.graph.start().clone()];
        vertices.extend(path.iter().map(|&i| edges[i].to.clone()));

        let inclusion = edges
            .iter()
            .enumerate()
            .map(|(i, edge)| EdgeInclusion {
                edge: edge.clone(),
                weight: self.graph.weight(i),
                included: selected.contains(&i),
            })
            .collect();

        Ok(PathSolution {
            status: result.status,
            vertices,
            edges: path.iter().map(|&i| edges[i].clone()).collect(),
            total_weight,
            inclusion,
            statistics: result.statistics.clone(),
            cycle_cut_rounds: 0,
        })
    }

    /// Indices of edges whose variable is 1; anything not within tolerance of 0 or 1 is rejected.
    fn selected_edges(&self, values: &[f64]) -> PathResult<BTreeSet<usize>> {
        if values.len() != self.graph.num_edges() {
            return Err(PathError::AssignmentLength {
                expected: self.graph.num_edges(),
                actual: values.len(),
            });
        }

        let mut selected = BTreeSet::new();
        for (i, &value) in values.iter().enumerate() {
            if (value - 1.0).abs() <= FEASIBILITY_TOLERANCE {
                selected.insert(i);
            } else if value.abs() > FEASIBILITY_TOLERANCE {
                return Err(PathError::NonIntegralAssignment {
                    edge: self.graph.edges()[i].clone(),
                    value,
                });
            }
        }
        Ok(selected)
    }

    fn check_objective(
        &self,
        selected: &BTreeSet<usize>,
        reported: Option<f64>,
    ) -> PathResult<f64> {
        let computed: f64 = selected.iter().map(|&i| self.graph.weight(i)).sum();
        match reported {
            Some(objective)
                if (computed - objective).abs()
                    <= FEASIBILITY_TOLERANCE * objective.abs().max(1.0) =>
            {
                Ok(computed)
            }
            _ => Err(PathError::ObjectiveMismatch { computed, reported }),
        }
    }

    fn check_degree_balance(&self, selected: &BTreeSet<usize>) -> PathResult<()> {
        let mut excess: HashMap<&Vertex, i32> = HashMap::new();
        for &i in selected {
            let edge = &self.graph.edges()[i];
            *excess.entry(&edge.from).or_default() += 1;
            *excess.entry(&edge.to).or_default() -= 1;
        }

        for vertex in self.graph.vertices() {
            let expected = self.graph.required_excess(vertex);
            let actual = excess.get(vertex).copied().unwrap_or(0);
            if actual != expected {
                return Err(PathError::PathReconstruction(
                    ReconstructionFailure::Unbalanced {
                        vertex: vertex.clone(),
                        expected,
                        actual,
                    },
                ));
            }
        }
        Ok(())
    }

    /// Breadth-first walk over selected edges from start; the returned edge
    /// sequence is a simple path, so it never exceeds `|vertices| - 1` steps.
    fn walk(&self, selected: &BTreeSet<usize>) -> PathResult<Vec<usize>> {
        let edges = self.graph.edges();
        let start = self.graph.start();
        let end = self.graph.end();
        if start == end {
            return Ok(Vec::new());
        }

        let mut successors: HashMap<&Vertex, Vec<usize>> = HashMap::new();
        for &i in selected {
            successors.entry(&edges[i].from).or_default().push(i);
        }

        // vertex -> edge used to reach it
        let mut reached_by: HashMap<&Vertex, Option<usize>> = HashMap::new();
        reached_by.insert(start, None);
        let mut queue = VecDeque::from([start]);

        while let Some(vertex) = queue.pop_front() {
            if vertex == end {
                break;
            }
            for &i in successors.get(vertex).map(Vec::as_slice).unwrap_or_default() {
                let next = &edges[i].to;
                if !reached_by.contains_key(next) {
                    reached_by.insert(next, Some(i));
                    queue.push_back(next);
                }
            }
        }

        if !reached_by.contains_key(end) {
            return Err(PathError::PathReconstruction(
                ReconstructionFailure::Unreachable {
                    visited: reached_by.len(),
                },
            ));
        }

        let mut path = Vec::new();
        let mut cursor = end;
        while let Some(&Some(i)) = reached_by.get(cursor) {
            path.push(i);
            cursor = &edges[i].from;
        }
        path.reverse();
        Ok(path)
    }

    fn classify_stray(&self, stray: BTreeSet<usize>) -> ReconstructionFailure {
        let (cycles, dangling) = decompose_cycles(self.graph.edges(), stray);
        if dangling.is_empty() {
            ReconstructionFailure::StrayCycles { cycles }
        } else {
            ReconstructionFailure::DanglingEdges {
                edges: dangling
                    .into_iter()
                    .map(|i| self.graph.edges()[i].clone())
                    .collect(),
            }
        }
    }
}

/// Split a set of edges into directed cycles. Edges that cannot be closed into
/// a cycle are returned separately.
pub fn decompose_cycles(
    edges: &[Edge],
    mut remaining: BTreeSet<usize>,
) -> (Vec<Vec<usize>>, Vec<usize>) {
    let mut cycles = Vec::new();
    let mut dangling = Vec::new();

    while let Some(first) = remaining.first().copied() {
        let mut trail = vec![first];
        // vertex -> position in `trail` of the edge leaving it
        let mut departed: HashMap<&Vertex, usize> = HashMap::from([(&edges[first].from, 0)]);
        let mut current = &edges[first].to;

        loop {
            if let Some(&pos) = departed.get(current) {
                let cycle: Vec<usize> = trail.drain(pos..).collect();
                for i in &cycle {
                    remaining.remove(i);
                }
                cycles.push(cycle);
                break;
            }

            let next = remaining
                .iter()
                .copied()
                .find(|&i| &edges[i].from == current);
            match next {
                Some(i) => {
                    departed.insert(current, trail.len());
                    trail.push(i);
                    current = &edges[i].to;
                }
                None => {
                    remaining.remove(&first);
                    dangling.push(first);
                    break;
                }
            }
        }
    }

    (cycles, dangling)
}
