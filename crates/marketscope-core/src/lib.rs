//! Marketscope Core Library
//!
//! Data model, request validation and the deterministic simulation generator
//! behind every market analysis.

pub mod analysis;
pub mod error;
pub mod simulation;

pub use analysis::model::{
    AnalysisOverview, MarketAnalysisResult, ProductAnalysis, ProductMetrics, SwotCategory,
};
pub use analysis::stats::{Leader, MarketStats};
pub use analysis::AnalysisRequest;
pub use error::{MarketError, MarketResult, PoolError, SchemaError, ValidationError};
pub use simulation::pools::{RecommendationPool, SwotPools};
pub use simulation::SimulationGenerator;
