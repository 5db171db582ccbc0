use std::sync::Arc;

use crate::domain::{
    models::SolverConfig,
    solver_service::{Result, SolverService},
    value_objects::SolverBackend,
};
use crate::solver::MicroLpSolver;

/// Factory for creating solver instances based on configuration
pub struct SolverFactory;

impl SolverFactory {
    /// Create a solver based on the configuration
    pub fn create(config: &SolverConfig) -> Result<Arc<dyn SolverService>> {
        Self::create_from_backend(config.backend, config.verbose)
    }

    /// Create a solver for a specific backend
    pub fn create_from_backend(
        backend: SolverBackend,
        verbose: bool,
    ) -> Result<Arc<dyn SolverService>> {
        match backend {
            SolverBackend::Auto => Ok(Self::default_solver(verbose)),
            SolverBackend::MicroLp => Ok(Arc::new(MicroLpSolver::new())),
            SolverBackend::CoinCbc => Self::coin_cbc(verbose),
            SolverBackend::Highs => Self::highs(verbose),
        }
    }

    /// Get the default solver: HiGHS, then CBC, then microlp, whichever is compiled in first
    pub fn default_solver(verbose: bool) -> Arc<dyn SolverService> {
        Self::highs(verbose)
            .or_else(|_| Self::coin_cbc(verbose))
            .unwrap_or_else(|_| Arc::new(MicroLpSolver::new()))
    }

    /// Backends compiled into this build
    pub fn available_backends() -> Vec<SolverBackend> {
        [SolverBackend::Highs, SolverBackend::CoinCbc]
            .into_iter()
            .filter(|&backend| Self::create_from_backend(backend, false).is_ok())
            .chain(std::iter::once(SolverBackend::MicroLp))
            .collect()
    }

    #[cfg(feature = "highs")]
    fn highs(verbose: bool) -> Result<Arc<dyn SolverService>> {
        Ok(Arc::new(crate::solver::HighsSolver::new().with_output(verbose)))
    }

    #[cfg(not(feature = "highs"))]
    fn highs(_verbose: bool) -> Result<Arc<dyn SolverService>> {
        Err(crate::domain::SolverError::SolverNotAvailable(
            "HiGHS support was not compiled in (enable the `highs` feature)".to_string(),
        ))
    }

    #[cfg(feature = "cbc")]
    fn coin_cbc(verbose: bool) -> Result<Arc<dyn SolverService>> {
        Ok(Arc::new(crate::solver::CoinCbcSolver::new().with_output(verbose)))
    }

    #[cfg(not(feature = "cbc"))]
    fn coin_cbc(_verbose: bool) -> Result<Arc<dyn SolverService>> {
        Err(crate::domain::SolverError::SolverNotAvailable(
            "COIN-OR CBC support was not compiled in (enable the `cbc` feature)".to_string(),
        ))
    }
}
