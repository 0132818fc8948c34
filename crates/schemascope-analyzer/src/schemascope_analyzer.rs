//! Schema analysis and optimization strategies
//!
//! This crate turns a normalized `Schema` into per-table findings and,
//! optionally, optimization suggestions. Two strategy pairs ship by
//! default: `basic` (structural heuristics only) and `advanced`
//! (slow-query correlation and data-distribution profiling on top of a
//! simplified rule set). Strategies are resolved by name through
//! `StrategyRegistry`, and the orchestration services wrap the pipeline
//! behind a single error shape.

mod advanced;
mod basic;
mod service;
mod strategy;

pub use advanced::{
    AdvancedAnalysisStrategy, AdvancedOptimizationStrategy, DATA_TYPE_SUGGESTIONS,
    DENORMALIZATION_SUGGESTIONS, INDEX_SUGGESTIONS, PARTITIONING_SUGGESTIONS,
};
pub use basic::{BasicAnalysisStrategy, BasicOptimizationStrategy, GENERAL_SUGGESTIONS};
pub use service::{SchemaAnalyzerService, SchemaOptimizerService};
pub use strategy::{
    AnalysisStrategy, OptimizationStrategy, StrategyFactory, StrategyPair, StrategyRegistry,
};
