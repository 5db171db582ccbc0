// Domain module: graph input, optimization models and the solver contract

pub mod graph;
pub mod models;
pub mod path;
pub mod solver_service;
pub mod value_objects;

pub use graph::*;
pub use models::*;
pub use path::*;
pub use solver_service::*;
pub use value_objects::*;
