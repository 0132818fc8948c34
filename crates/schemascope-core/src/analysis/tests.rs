//! Tests for the analysis result shapes

use super::*;
use pretty_assertions::assert_eq;

mod query_performance_tests {
    use super::*;

    #[test]
    fn test_average_of_no_slow_queries_is_zero() {
        let perf = QueryPerformance::from_slow_queries(Vec::new());
        assert_eq!(perf.average_execution_time, 0.0);
        assert!(perf.slow_queries.is_empty());
    }

    #[test]
    fn test_average_is_arithmetic_mean() {
        let perf = QueryPerformance::from_slow_queries(vec![
            SlowQuery {
                query: "SELECT * FROM users WHERE email = 'a'".to_string(),
                execution_time: 2.0,
            },
            SlowQuery {
                query: "SELECT * FROM users".to_string(),
                execution_time: 4.0,
            },
        ]);
        assert_eq!(perf.average_execution_time, 3.0);
    }
}

mod distribution_tests {
    use super::*;

    #[test]
    fn test_numeric_distribution_serializes_as_stats_object() {
        let dist = ColumnDistribution::Numeric(NumericStats {
            min: Some(0.0),
            max: Some(200.0),
            avg: Some(80.5),
        });
        let json = serde_json::to_value(&dist).unwrap();
        assert_eq!(json["min"], 0.0);
        assert_eq!(json["max"], 200.0);
    }

    #[test]
    fn test_categorical_distribution_serializes_as_count_list() {
        let dist = ColumnDistribution::Categorical(vec![
            ValueCount {
                value: "active".to_string(),
                count: 10,
            },
            ValueCount {
                value: "banned".to_string(),
                count: 2,
            },
        ]);
        let json = serde_json::to_value(&dist).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["count"], 10);
    }
}
