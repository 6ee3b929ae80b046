//! Per-job label and issue statistics.
//!
//! Jobs are keyed by a pseudo-job name derived from project, dataset,
//! and geometry kind, so every checked image is attributed even when no
//! labeling job tracks it.

use std::collections::BTreeMap;

use label_model::GeometryKind;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct JobStats {
    pub geometry_type: String,
    pub number_labels: usize,
    pub number_issues: usize,
}

pub fn pseudo_job_name(project: &str, dataset: &str, kind: GeometryKind) -> String {
    format!("{project} - {dataset} - {kind}")
}

/// Accumulated statistics across a whole run, keyed by job name.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct JobStatistics(pub BTreeMap<String, JobStats>);

impl JobStatistics {
    pub fn record(&mut self, job_name: &str, kind: GeometryKind, labels: usize, issues: usize) {
        let entry = self
            .0
            .entry(job_name.to_string())
            .or_insert_with(|| JobStats {
                geometry_type: kind.to_string(),
                number_labels: 0,
                number_issues: 0,
            });
        entry.number_labels += labels;
        entry.number_issues += issues;
    }

    pub fn merge(&mut self, other: JobStatistics) {
        for (name, stats) in other.0 {
            let entry = self.0.entry(name).or_insert_with(|| JobStats {
                geometry_type: stats.geometry_type.clone(),
                number_labels: 0,
                number_issues: 0,
            });
            entry.number_labels += stats.number_labels;
            entry.number_issues += stats.number_issues;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total_labels(&self) -> usize {
        self.0.values().map(|j| j.number_labels).sum()
    }

    pub fn total_issues(&self) -> usize {
        self.0.values().map(|j| j.number_issues).sum()
    }

    /// Aligned summary table with a totals row.
    pub fn render_table(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }
        let name_width = self.0.keys().map(|n| n.len()).max().unwrap_or(0);
        let total_labels = self.total_labels().to_string();
        let total_issues = self.total_issues().to_string();
        let labels_width = total_labels.len();
        let issues_width = total_issues.len();

        let mut rows = String::new();
        let mut line_width = 0;
        for (name, stats) in &self.0 {
            let row = format!(
                "{:<name_width$} | labels = {:>labels_width$} | issues = {:>issues_width$}\n",
                name, stats.number_labels, stats.number_issues,
            );
            line_width = line_width.max(row.len() - 1);
            rows.push_str(&row);
        }
        let rule = "-".repeat(line_width);
        format!(
            "{rule}\n{rows}{rule}\n{:<name_width$} | labels = {total_labels} | issues = {total_issues}\n{rule}",
            "",
        )
    }
}
