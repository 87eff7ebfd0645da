//! Benchmark results, competitor comparison and related report payloads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Percentage;

/// Preferred column order for the well-known benchmark suites.
pub const KNOWN_BENCHMARKS: [&str; 4] = ["humaneval", "mbpp", "codecontests", "gsm8k"];

/// Human-readable label for a benchmark key.
pub fn benchmark_label(key: &str) -> String {
    match key {
        "humaneval" => "HumanEval".to_string(),
        "mbpp" => "MBPP".to_string(),
        "codecontests" => "CodeContests".to_string(),
        "gsm8k" => "GSM8K".to_string(),
        other => other.to_string(),
    }
}

/// Scores for the presented model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BenchmarkResults {
    /// Date the benchmarks were last run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// Whether the results were independently verified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    /// Benchmark key -> score.
    #[serde(flatten)]
    pub scores: BTreeMap<String, Percentage>,
}

/// One model's scores in the comparison table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub model: String,
    #[serde(flatten)]
    pub scores: BTreeMap<String, Percentage>,
}

/// Benchmark run metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BenchmarkMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub test_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}

/// Benchmark payload: own results plus competitor comparison.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BenchmarkSnapshot {
    pub results: BenchmarkResults,
    /// Comparison rows in source-declared order.
    #[serde(default)]
    pub comparison: Vec<ComparisonRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<BenchmarkMeta>,
}

/// A comparison row prepared for display.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    pub model: String,
    pub scores: BTreeMap<String, Percentage>,
    /// Set only on the presented model's row.
    pub highlighted: bool,
}

impl BenchmarkSnapshot {
    /// Benchmark keys to show as columns: known suites first, then the rest
    /// alphabetically.
    pub fn metric_names(&self) -> Vec<String> {
        let mut all: Vec<&String> = self
            .results
            .scores
            .keys()
            .chain(self.comparison.iter().flat_map(|row| row.scores.keys()))
            .collect();
        all.sort();
        all.dedup();

        let mut names: Vec<String> = KNOWN_BENCHMARKS
            .iter()
            .filter(|known| all.iter().any(|name| name.as_str() == **known))
            .map(|known| known.to_string())
            .collect();
        names.extend(
            all.into_iter()
                .filter(|name| !KNOWN_BENCHMARKS.contains(&name.as_str()))
                .cloned(),
        );
        names
    }

    /// Rows in display order: the presented model first and highlighted,
    /// then every other row in source order.
    ///
    /// If the comparison list has no row for `self_model`, one is built
    /// from `results` so the presented model is always shown.
    pub fn display_rows(&self, self_model: &str) -> Vec<DisplayRow> {
        let self_index = self
            .comparison
            .iter()
            .position(|row| row.model.eq_ignore_ascii_case(self_model));

        let self_row = match self_index {
            Some(index) => DisplayRow {
                model: self.comparison[index].model.clone(),
                scores: self.comparison[index].scores.clone(),
                highlighted: true,
            },
            None => DisplayRow {
                model: self_model.to_string(),
                scores: self.results.scores.clone(),
                highlighted: true,
            },
        };

        let mut rows = Vec::with_capacity(self.comparison.len() + 1);
        rows.push(self_row);
        rows.extend(
            self.comparison
                .iter()
                .enumerate()
                .filter(|(index, _)| Some(*index) != self_index)
                .map(|(_, row)| DisplayRow {
                    model: row.model.clone(),
                    scores: row.scores.clone(),
                    highlighted: false,
                }),
        );
        rows
    }
}

/// A scored capability category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCategory {
    pub name: String,
    pub score: Percentage,
    #[serde(default)]
    pub description: String,
}

/// Relative performance claims and how they were verified.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    /// Named deltas such as `"Speed" -> "+348%"`.
    #[serde(default)]
    pub performance_stats: BTreeMap<String, String>,
    #[serde(default)]
    pub test_categories: Vec<TestCategory>,
    #[serde(default)]
    pub verification_methods: Vec<String>,
}

impl PerformanceReport {
    /// Deltas parsed to numbers; unparseable entries are skipped.
    pub fn deltas(&self) -> Vec<(String, Percentage)> {
        self.performance_stats
            .iter()
            .filter_map(|(name, raw)| Percentage::parse(raw).map(|pct| (name.clone(), pct)))
            .collect()
    }
}

/// One dated point of the self-vs-competitor trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyComparison {
    pub date: String,
    /// Series name -> score for that day.
    #[serde(flatten)]
    pub series: BTreeMap<String, Percentage>,
}

/// Benchmark trend over time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkTrend {
    #[serde(default)]
    pub daily_comparisons: Vec<DailyComparison>,
    #[serde(default)]
    pub improvement_trend: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(model: &str, humaneval: f64) -> ComparisonRow {
        ComparisonRow {
            model: model.to_string(),
            scores: BTreeMap::from([("humaneval".to_string(), Percentage(humaneval))]),
        }
    }

    #[test]
    fn self_row_first_then_competitors_in_source_order() {
        let snapshot = BenchmarkSnapshot {
            comparison: vec![
                row("GPT-4o", 89.2),
                row("Claude 3 Opus", 87.5),
                row("june13525", 98.7),
                row("Gemini 1.5 Pro", 86.1),
                row("CodeLlama", 67.8),
            ],
            ..Default::default()
        };

        let rows = snapshot.display_rows("june13525");
        let names: Vec<&str> = rows.iter().map(|r| r.model.as_str()).collect();
        assert_eq!(
            names,
            vec!["june13525", "GPT-4o", "Claude 3 Opus", "Gemini 1.5 Pro", "CodeLlama"]
        );
        assert!(rows[0].highlighted);
        assert!(rows[1..].iter().all(|r| !r.highlighted));
    }

    #[test]
    fn missing_self_row_is_synthesized_from_results() {
        let snapshot = BenchmarkSnapshot {
            results: BenchmarkResults {
                scores: BTreeMap::from([("mbpp".to_string(), Percentage(99.2))]),
                ..Default::default()
            },
            comparison: vec![row("GPT-4o", 89.2)],
            meta: None,
        };

        let rows = snapshot.display_rows("june13525");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].model, "june13525");
        assert_eq!(rows[0].scores.get("mbpp"), Some(&Percentage(99.2)));
        assert_eq!(rows[1].model, "GPT-4o");
    }

    #[test]
    fn decodes_string_and_numeric_scores() {
        let json = r#"{
            "results": {"humaneval": "98.7%", "mbpp": 99.2, "last_updated": "2025-05-01", "verified": true},
            "comparison": [{"model": "GPT-4o", "humaneval": "89.3%", "mbpp": 87.2}],
            "meta": {"test_count": 7832, "hardware": "NVIDIA A100 80GB GPUs"}
        }"#;
        let snapshot: BenchmarkSnapshot = serde_json::from_str(json).unwrap();

        assert_eq!(snapshot.results.last_updated.as_deref(), Some("2025-05-01"));
        assert_eq!(snapshot.results.scores.len(), 2);
        assert_eq!(snapshot.comparison[0].scores["humaneval"], Percentage(89.3));
        assert_eq!(snapshot.meta.unwrap().test_count, 7832);
    }

    #[test]
    fn metric_names_put_known_suites_first() {
        let snapshot = BenchmarkSnapshot {
            results: BenchmarkResults {
                scores: BTreeMap::from([
                    ("arc".to_string(), Percentage(80.0)),
                    ("gsm8k".to_string(), Percentage(97.8)),
                    ("humaneval".to_string(), Percentage(98.7)),
                ]),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(snapshot.metric_names(), vec!["humaneval", "gsm8k", "arc"]);
    }

    #[test]
    fn performance_deltas_parse_signed_percentages() {
        let report = PerformanceReport {
            performance_stats: BTreeMap::from([
                ("Speed".to_string(), "+348%".to_string()),
                ("Vibes".to_string(), "immaculate".to_string()),
            ]),
            ..Default::default()
        };
        assert_eq!(report.deltas(), vec![("Speed".to_string(), Percentage(348.0))]);
    }
}
