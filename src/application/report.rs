// Report rendering: human-readable solution and debug dump of a built model

use std::fmt::Write;

use crate::application::model_builder::PathModel;
use crate::domain::{GraphSpec, OptimizationProblem, PathSolution};

/// Render a weight as an integer when the graph's weights are all integral.
pub fn format_weight(weight: f64, integral: bool) -> String {
    if integral {
        format!("{:.0}", weight)
    } else {
        format!("{}", weight)
    }
}

/// Solution report: status, total weight, the path, and every edge's inclusion flag.
pub fn render_solution(graph: &GraphSpec, solution: &PathSolution) -> String {
    let integral = graph.has_integral_weights();
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "SOLUTION");
    let _ = writeln!(out, "Status: {}", solution.status);
    let _ = writeln!(
        out,
        "Total weight: {}",
        format_weight(solution.total_weight, integral)
    );
    let labels: Vec<&str> = solution.vertices.iter().map(|v| v.as_str()).collect();
    let _ = writeln!(out, "Path: {}", labels.join(" -> "));
    if solution.cycle_cut_rounds > 0 {
        let _ = writeln!(out, "Cycle cut rounds: {}", solution.cycle_cut_rounds);
    }
    let _ = writeln!(out, "Path edges:");
    for entry in &solution.inclusion {
        let _ = writeln!(out, "  {}: {}", entry.edge, entry.included);
    }
    out
}

/// Full textual dump of a built model: variables, constraint rows and objective.
pub fn render_model(model: &PathModel<'_>) -> String {
    let graph = model.graph();
    let problem = model.problem();
    let mut out = String::new();

    let _ = writeln!(out, "Model '{}'", problem.name);
    let _ = writeln!(
        out,
        "  start: {}  end: {}  state: {}",
        graph.start(),
        graph.end(),
        model.state()
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "{} Variables", problem.variables.len());
    for (variable, weight) in problem.variables.iter().zip(graph.weights()) {
        let upper = variable
            .upper_bound
            .map_or_else(|| "inf".to_string(), |u| u.to_string());
        let _ = writeln!(
            out,
            "  {} : {} in [{}, {}]  (weight {})",
            variable.name, variable.variable_type, variable.lower_bound, upper, weight
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "{} Constraints", problem.constraints.len());
    for constraint in &problem.constraints {
        let lhs = linear_terms(problem, &constraint.coefficients);
        let _ = writeln!(
            out,
            "  {} : {} {} {}",
            constraint.name,
            lhs,
            constraint.constraint_type.symbol(),
            constraint.bound
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "Objective : {} {}",
        problem.objective.optimization_type,
        linear_terms(problem, &problem.objective.coefficients)
    );
    out
}

fn linear_terms(problem: &OptimizationProblem, coefficients: &[f64]) -> String {
    let terms: Vec<String> = coefficients
        .iter()
        .zip(&problem.variables)
        .filter(|&(&c, _)| c != 0.0)
        .map(|(&c, v)| match c {
            c if c == 1.0 => format!("+ {}", v.name),
            c if c == -1.0 => format!("- {}", v.name),
            c if c < 0.0 => format!("- {}*{}", -c, v.name),
            c => format!("+ {}*{}", c, v.name),
        })
        .collect();

    if terms.is_empty() {
        "0".to_string()
    } else {
        terms.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::model_builder::ModelBuilder;
    use crate::domain::{Edge, SolverResult};
    use crate::application::extractor::SolutionExtractor;
    use crate::infrastructure::loader::sample_document;

    #[test]
    fn report_lists_weight_and_every_edge() {
        let graph = sample_document().into_graph().unwrap();
        let mut values = vec![0.0; graph.num_edges()];
        values[graph.edge_index(&Edge::new("A", "B")).unwrap()] = 1.0;
        let solution = SolutionExtractor::new(&graph)
            .extract(&SolverResult::optimal(1.0, values))
            .unwrap();

        let report = render_solution(&graph, &solution);
        assert!(report.contains("Total weight: 1\n"));
        assert!(report.contains("Path: A -> B\n"));
        assert!(report.contains("  (A, B): true\n"));
        assert!(report.contains("  (F, D): false\n"));
        assert_eq!(report.matches(": false").count(), 10);
    }

    #[test]
    fn fractional_weights_keep_their_decimals() {
        assert_eq!(format_weight(2.5, false), "2.5");
        assert_eq!(format_weight(3.0, true), "3");
    }

    #[test]
    fn model_dump_shows_rows_and_objective() {
        let graph = sample_document().into_graph().unwrap();
        let model = ModelBuilder::new(&graph).build();
        let dump = render_model(&model);

        assert!(dump.starts_with("Model 'shortest-path'"));
        assert!(dump.contains("11 Variables"));
        assert!(dump.contains("include_edge[A,B] : binary in [0, 1]"));
        assert!(dump.contains("10 Constraints"));
        assert!(dump.contains(
            "flow_balance[B] : - include_edge[A,B] + include_edge[B,H] == -1"
        ));
        assert!(dump.contains("Objective : minimize + include_edge[A,B]"));
    }
}
