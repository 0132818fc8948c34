//! Strategy contracts and the strategy registry

use async_trait::async_trait;
use schemascope_core::{
    Result, Schema, SchemaAnalysis, SchemaOptimization, SchemaScopeError, StatisticsSource,
};
use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    AdvancedAnalysisStrategy, AdvancedOptimizationStrategy, BasicAnalysisStrategy,
    BasicOptimizationStrategy,
};

/// A swappable schema analysis algorithm
#[async_trait]
pub trait AnalysisStrategy: Send + Sync {
    /// Strategy name as used in configuration (e.g., "basic")
    fn name(&self) -> &'static str;

    /// Produce the per-table analysis for a schema
    async fn analyze(&self, schema: &Schema) -> Result<SchemaAnalysis>;
}

/// A swappable algorithm deriving suggestions from an analysis
pub trait OptimizationStrategy: Send + Sync {
    /// Strategy name as used in configuration (e.g., "basic")
    fn name(&self) -> &'static str;

    /// Derive grouped suggestions from an analysis
    fn optimize(&self, analysis: &SchemaAnalysis) -> Result<SchemaOptimization>;
}

/// A matched pair of analysis and optimization strategies
pub struct StrategyPair {
    pub analysis: Arc<dyn AnalysisStrategy>,
    pub optimization: Arc<dyn OptimizationStrategy>,
}

/// Constructor for a strategy pair.
///
/// Receives the statistics source so data-driven strategies can query the
/// target database; strategies that don't need it ignore the argument.
pub type StrategyFactory = fn(Arc<dyn StatisticsSource>) -> StrategyPair;

/// Registry of available strategy pairs, keyed by configuration name.
///
/// Resolution happens once per invocation; unknown names are rejected
/// before any database work starts.
pub struct StrategyRegistry {
    factories: HashMap<String, StrategyFactory>,
}

impl StrategyRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create a registry with the built-in strategies registered
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("basic", |_| StrategyPair {
            analysis: Arc::new(BasicAnalysisStrategy),
            optimization: Arc::new(BasicOptimizationStrategy),
        });
        registry.register("advanced", |statistics| StrategyPair {
            analysis: Arc::new(AdvancedAnalysisStrategy::new(statistics)),
            optimization: Arc::new(AdvancedOptimizationStrategy),
        });
        registry
    }

    /// Register a strategy pair under a name
    pub fn register(&mut self, name: &str, factory: StrategyFactory) {
        tracing::info!(strategy = %name, "registering strategy");
        self.factories.insert(name.to_string(), factory);
    }

    /// Resolve a strategy name to its constructor, rejecting unknown names
    pub fn resolve(&self, name: &str) -> Result<StrategyFactory> {
        self.factories.get(name).copied().ok_or_else(|| {
            let mut known = self.list();
            known.sort_unstable();
            SchemaScopeError::Configuration(format!(
                "unknown strategy '{}' (known strategies: {})",
                name,
                known.join(", ")
            ))
        })
    }

    /// List all registered strategy names
    pub fn list(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }

    /// Check if a strategy is registered
    pub fn has(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests;
