use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// The fixed set of per-run metrics projected out of an analysis artifact.
///
/// Declaration order is the canonical order used for JSON maps and reports.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MetricName {
    StatementCoverage,
    BranchCoverage,
    MutationScore,
    MutantsKilled,
    MutantsSurvived,
    TotalMutants,
    CompilationSuccess,
    TestsPassed,
    TestsFailed,
    TestSuccessRate,
    TotalTestMethods,
    TotalAssertions,
    AvgAssertionsPerTest,
    TestsWithErrorHandling,
    AverageTestLength,
    AssertionQualityScore,
    ExceptionQualityScore,
    IndependenceScore,
    NamingQualityScore,
    SmellScore,
    OverallQualityScore,
    ResponseTime,
    MethodCoverageRate,
    MethodsTestedCount,
}

/// Report section a metric is rendered under
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum MetricGroup {
    #[strum(to_string = "Coverage")]
    Coverage,
    #[strum(to_string = "Mutation Testing")]
    MutationTesting,
    #[strum(to_string = "Test Quality")]
    TestQuality,
    #[strum(to_string = "Performance")]
    Performance,
}

impl MetricName {
    /// Field name inside the artifact's `summary` object
    pub fn source_field(&self) -> &'static str {
        match self {
            MetricName::CompilationSuccess => "compilation_success_rate",
            MetricName::StatementCoverage => "statement_coverage",
            MetricName::BranchCoverage => "branch_coverage",
            MetricName::MutationScore => "mutation_score",
            MetricName::MutantsKilled => "mutants_killed",
            MetricName::MutantsSurvived => "mutants_survived",
            MetricName::TotalMutants => "total_mutants",
            MetricName::TestsPassed => "tests_passed",
            MetricName::TestsFailed => "tests_failed",
            MetricName::TestSuccessRate => "test_success_rate",
            MetricName::TotalTestMethods => "total_test_methods",
            MetricName::TotalAssertions => "total_assertions",
            MetricName::AvgAssertionsPerTest => "avg_assertions_per_test",
            MetricName::TestsWithErrorHandling => "tests_with_error_handling",
            MetricName::AverageTestLength => "average_test_length",
            MetricName::AssertionQualityScore => "assertion_quality_score",
            MetricName::ExceptionQualityScore => "exception_quality_score",
            MetricName::IndependenceScore => "independence_score",
            MetricName::NamingQualityScore => "naming_quality_score",
            MetricName::SmellScore => "smell_score",
            MetricName::OverallQualityScore => "overall_quality_score",
            MetricName::ResponseTime => "response_time",
            MetricName::MethodCoverageRate => "method_coverage_rate",
            MetricName::MethodsTestedCount => "methods_tested_count",
        }
    }

    /// Value substituted when the artifact omits this metric.
    /// Scores where a missing value would read as a regression default to 100.
    pub fn default_value(&self) -> f64 {
        match self {
            MetricName::IndependenceScore | MetricName::SmellScore => 100.0,
            _ => 0.0,
        }
    }

    pub fn group(&self) -> MetricGroup {
        match self {
            MetricName::StatementCoverage
            | MetricName::BranchCoverage
            | MetricName::MethodCoverageRate
            | MetricName::MethodsTestedCount => MetricGroup::Coverage,
            MetricName::MutationScore
            | MetricName::MutantsKilled
            | MetricName::MutantsSurvived
            | MetricName::TotalMutants => MetricGroup::MutationTesting,
            MetricName::ResponseTime => MetricGroup::Performance,
            _ => MetricGroup::TestQuality,
        }
    }

    /// Human readable label, e.g. "Statement coverage"
    pub fn label(&self) -> String {
        let name = self.as_ref().replace('_', " ");
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => name,
        }
    }
}

impl MetricGroup {
    pub fn metrics(&self) -> Vec<MetricName> {
        MetricName::iter().filter(|m| m.group() == *self).collect()
    }
}

/// One run's metric values. Every metric is always present.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSnapshot {
    values: BTreeMap<MetricName, f64>,
    defaulted: BTreeSet<MetricName>,
}

impl MetricSnapshot {
    /// Snapshot with every metric at its declared default
    pub fn defaults() -> Self {
        Self {
            values: MetricName::iter().map(|m| (m, m.default_value())).collect(),
            defaulted: MetricName::iter().collect(),
        }
    }

    /// Build a snapshot from whatever values were found; the rest are defaulted
    pub fn from_found(found: impl IntoIterator<Item = (MetricName, f64)>) -> Self {
        let mut snapshot = Self::defaults();
        for (metric, value) in found {
            snapshot.values.insert(metric, value);
            snapshot.defaulted.remove(&metric);
        }
        snapshot
    }

    pub fn get(&self, metric: MetricName) -> Option<f64> {
        self.values.get(&metric).copied()
    }

    pub fn values(&self) -> &BTreeMap<MetricName, f64> {
        &self.values
    }

    /// Metrics whose value came from the default table rather than the artifact
    pub fn defaulted(&self) -> &BTreeSet<MetricName> {
        &self.defaulted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn every_metric_has_a_group_and_unique_source_field() {
        let mut seen = BTreeSet::new();
        for metric in MetricName::iter() {
            assert!(
                seen.insert(metric.source_field()),
                "duplicate source field for {metric}"
            );
        }
        let grouped: usize = MetricGroup::iter().map(|g| g.metrics().len()).sum();
        assert_eq!(grouped, MetricName::iter().count());
        assert_eq!(MetricName::iter().count(), 24);
    }

    #[test]
    fn defaults_are_optimistic_for_independence_and_smell() {
        let snapshot = MetricSnapshot::defaults();
        assert_eq!(snapshot.get(MetricName::IndependenceScore), Some(100.0));
        assert_eq!(snapshot.get(MetricName::SmellScore), Some(100.0));
        assert_eq!(snapshot.get(MetricName::MutationScore), Some(0.0));
        assert_eq!(snapshot.defaulted().len(), 24);
    }

    #[test]
    fn found_values_clear_defaulted_marker() {
        let snapshot = MetricSnapshot::from_found([(MetricName::MutationScore, 0.0)]);
        assert_eq!(snapshot.get(MetricName::MutationScore), Some(0.0));
        assert!(!snapshot.defaulted().contains(&MetricName::MutationScore));
        assert!(snapshot.defaulted().contains(&MetricName::BranchCoverage));
    }

    #[test]
    fn names_parse_and_display_in_snake_case() {
        assert_eq!(
            MetricName::from_str("avg_assertions_per_test").unwrap(),
            MetricName::AvgAssertionsPerTest
        );
        assert_eq!(MetricName::TestSuccessRate.to_string(), "test_success_rate");
        assert_eq!(MetricName::StatementCoverage.label(), "Statement coverage");
    }
}
