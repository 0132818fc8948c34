//! Orchestration services around the strategy pipeline

use schemascope_core::{
    Result, SchemaAnalysis, SchemaOptimization, SchemaScopeError, SchemaSource,
};
use std::sync::Arc;

use crate::{AnalysisStrategy, OptimizationStrategy};

/// Orchestrates schema reading and analysis.
///
/// Every failure along the way - connection, metadata query, strategy
/// execution - is re-wrapped into a single `Analysis` error carrying the
/// original message, so the presentation layer handles one error shape.
/// No partial results: either the full per-table analysis succeeds or the
/// caller gets an error.
pub struct SchemaAnalyzerService {
    source: Arc<dyn SchemaSource>,
    strategy: Arc<dyn AnalysisStrategy>,
}

impl SchemaAnalyzerService {
    pub fn new(source: Arc<dyn SchemaSource>, strategy: Arc<dyn AnalysisStrategy>) -> Self {
        Self { source, strategy }
    }

    pub async fn analyze(&self) -> Result<SchemaAnalysis> {
        match self.run().await {
            Ok(analysis) => {
                tracing::info!(
                    strategy = self.strategy.name(),
                    tables = analysis.len(),
                    "schema analysis completed"
                );
                Ok(analysis)
            }
            Err(error) => {
                tracing::error!(
                    strategy = self.strategy.name(),
                    error = %error,
                    "schema analysis failed"
                );
                Err(SchemaScopeError::Analysis(error.to_string()))
            }
        }
    }

    async fn run(&self) -> Result<SchemaAnalysis> {
        let schema = self.source.read_schema().await?;
        self.strategy.analyze(&schema).await
    }
}

/// Derives optimization suggestions from an existing analysis.
///
/// A stateless pass-through today; the seam exists so pre- or
/// post-processing can be added without touching callers. Failures are
/// wrapped the same way the analyzer wraps its own.
pub struct SchemaOptimizerService {
    strategy: Arc<dyn OptimizationStrategy>,
}

impl SchemaOptimizerService {
    pub fn new(strategy: Arc<dyn OptimizationStrategy>) -> Self {
        Self { strategy }
    }

    pub fn optimize(&self, analysis: &SchemaAnalysis) -> Result<SchemaOptimization> {
        self.strategy
            .optimize(analysis)
            .map_err(|error| SchemaScopeError::Optimization(error.to_string()))
    }
}
