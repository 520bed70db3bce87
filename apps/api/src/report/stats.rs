//! Report helpers — cluster selection per category, cover statistics, week info.
//!
//! No layout decisions happen here; these shape the upstream data before the
//! layout engine sees it and compute the figures printed on the cover page.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::models::report::{Category, Cluster};

/// How many clusters per category and items per cluster the report keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionOptions {
    pub clusters_per_category: usize,
    pub max_items_per_cluster: Option<usize>,
}

/// Top `limit` clusters of `category` by score (null as zero), highest first.
///
/// The sort is stable, so equal scores keep upstream order. When `max_items` is
/// set each cluster's items are truncated to that many.
pub fn select_top_clusters(
    clusters: &[Cluster],
    category: Category,
    limit: usize,
    max_items: Option<usize>,
) -> Vec<Cluster> {
    let mut selected: Vec<&Cluster> = clusters
        .iter()
        .filter(|c| c.category_id == i64::from(category.id()))
        .collect();

    selected.sort_by(|a, b| {
        b.sort_score()
            .partial_cmp(&a.sort_score())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    selected
        .into_iter()
        .take(limit)
        .map(|c| {
            let mut cluster = c.clone();
            if let Some(max) = max_items {
                cluster.items.truncate(max);
            }
            cluster
        })
        .collect()
}

/// Selected clusters for every category, keyed in report order.
///
/// Clusters with an unknown category id are ignored.
pub fn group_by_category(
    clusters: &[Cluster],
    options: SelectionOptions,
) -> BTreeMap<Category, Vec<Cluster>> {
    Category::ALL
        .into_iter()
        .map(|category| {
            let selected = select_top_clusters(
                clusters,
                category,
                options.clusters_per_category,
                options.max_items_per_cluster,
            );
            (category, selected)
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Cover statistics
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportStats {
    pub total_news: usize,
    pub total_issues: usize,
}

pub fn aggregate_report_stats(clusters: &[Cluster]) -> ReportStats {
    ReportStats {
        total_news: clusters.iter().map(|c| c.items.len()).sum(),
        total_issues: clusters.len(),
    }
}

/// Representative titles of the `top_n` largest clusters by `size`.
pub fn extract_top_keywords(clusters: &[Cluster], top_n: usize) -> Vec<String> {
    let mut by_size: Vec<&Cluster> = clusters.iter().collect();
    by_size.sort_by(|a, b| b.size.cmp(&a.size));
    by_size
        .into_iter()
        .take(top_n)
        .map(|c| c.representative_title.clone())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryIssueCount {
    pub category: Category,
    pub label: String,
    pub issue_count: usize,
}

/// Issue count per category plus the largest count (at least 1) for bar normalization.
pub fn category_issue_counts(clusters: &[Cluster]) -> (Vec<CategoryIssueCount>, usize) {
    let counts: Vec<CategoryIssueCount> = Category::ALL
        .into_iter()
        .map(|category| CategoryIssueCount {
            category,
            label: category.label().to_string(),
            issue_count: clusters
                .iter()
                .filter(|c| c.category_id == i64::from(category.id()))
                .count(),
        })
        .collect();
    let max = counts.iter().map(|c| c.issue_count).max().unwrap_or(0).max(1);
    (counts, max)
}

// ────────────────────────────────────────────────────────────────────────────
// Week info
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekInfo {
    pub week_number: u32,
    /// `YYYY.MM.DD - MM.DD`
    pub date_range: String,
}

/// The report published on `date` covers the seven days before it.
/// The week number is the ISO week of the first covered day.
pub fn week_info(date: NaiveDate) -> WeekInfo {
    let start = date - Duration::days(7);
    let end = date - Duration::days(1);
    WeekInfo {
        week_number: start.iso_week().week(),
        date_range: format!("{} - {}", start.format("%Y.%m.%d"), end.format("%m.%d")),
    }
}

/// Parses a `YYYY-MM-DD` report date.
pub fn parse_report_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
