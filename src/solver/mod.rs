// Solver adapters module

#[cfg(feature = "cbc")]
pub mod coin_cbc_solver;
pub mod factory;
mod good_lp_model;
#[cfg(feature = "highs")]
pub mod highs_solver;
pub mod microlp_solver;
mod presolve;

#[cfg(feature = "cbc")]
pub use coin_cbc_solver::CoinCbcSolver;
pub use factory::SolverFactory;
#[cfg(feature = "highs")]
pub use highs_solver::HighsSolver;
pub use microlp_solver::MicroLpSolver;
