// Infrastructure: external concerns (graph files on disk)

pub mod loader;

pub use loader::{load_document, load_graph, sample_document, GraphDocument, LoadError};
