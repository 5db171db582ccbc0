// Application layer: model building, solution extraction and orchestration

pub mod extractor;
pub mod model_builder;
pub mod path_service;
pub mod report;

pub use extractor::SolutionExtractor;
pub use model_builder::{ModelBuilder, PathModel};
pub use path_service::{solve_shortest_path, ShortestPathService};
pub use report::{render_model, render_solution};
