//! Tests for strategy resolution

use super::*;
use pretty_assertions::assert_eq;
use schemascope_core::{NumericStats, SlowQuery, ValueCount};

/// Statistics source that returns nothing; registry tests never query it
struct NoStatistics;

#[async_trait]
impl StatisticsSource for NoStatistics {
    async fn slow_queries(&self, _table: &str) -> Result<Vec<SlowQuery>> {
        Ok(Vec::new())
    }

    async fn numeric_distribution(&self, _table: &str, _column: &str) -> Result<NumericStats> {
        Ok(NumericStats::default())
    }

    async fn value_counts(&self, _table: &str, _column: &str) -> Result<Vec<ValueCount>> {
        Ok(Vec::new())
    }
}

#[test]
fn test_defaults_register_basic_and_advanced() {
    let registry = StrategyRegistry::with_defaults();
    assert!(registry.has("basic"));
    assert!(registry.has("advanced"));
}

#[test]
fn test_resolve_builds_matching_pair() {
    let registry = StrategyRegistry::with_defaults();

    let factory = registry.resolve("advanced").unwrap();
    let pair = factory(Arc::new(NoStatistics));
    assert_eq!(pair.analysis.name(), "advanced");
    assert_eq!(pair.optimization.name(), "advanced");

    let factory = registry.resolve("basic").unwrap();
    let pair = factory(Arc::new(NoStatistics));
    assert_eq!(pair.analysis.name(), "basic");
    assert_eq!(pair.optimization.name(), "basic");
}

#[test]
fn test_unknown_strategy_rejected_with_known_names() {
    let registry = StrategyRegistry::with_defaults();
    let err = registry.resolve("aggressive").unwrap_err();
    assert!(matches!(err, SchemaScopeError::Configuration(_)));
    let message = err.to_string();
    assert!(message.contains("aggressive"));
    assert!(message.contains("advanced, basic"));
}

#[test]
fn test_custom_strategy_can_be_registered() {
    let mut registry = StrategyRegistry::new();
    assert!(!registry.has("basic"));

    registry.register("basic", |_| StrategyPair {
        analysis: Arc::new(crate::BasicAnalysisStrategy),
        optimization: Arc::new(crate::BasicOptimizationStrategy),
    });
    assert_eq!(registry.list(), vec!["basic"]);
}
