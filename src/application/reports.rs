//! Aggregated system overview for the admin dashboard and exported reports.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};

use crate::application::repos::{CategoryCount, ComplaintsRepo, RepoError, UsersRepo};
use crate::domain::types::ComplaintStatus;

const DEFAULT_WINDOW_DAYS: i64 = 30;
const TOP_CATEGORY_SLICES: usize = 6;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("report rendering failed: {0}")]
    Render(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportTotals {
    pub complaints: u64,
    pub pending: u64,
    pub resolved: u64,
    pub users: u64,
}

/// One point on the submissions-per-day trend. Labels use UTC calendar
/// days formatted as `dd MMM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSlice {
    pub status: ComplaintStatus,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemOverview {
    pub window_days: i64,
    pub totals: ReportTotals,
    pub trend: Vec<TrendPoint>,
    /// Full distribution, descending; `top_categories` is its first slice.
    pub categories: Vec<CategoryCount>,
    pub top_categories: Vec<CategoryCount>,
    pub statuses: Vec<StatusSlice>,
}

/// Rendered export handed back to the HTTP layer as-is.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub content_type: &'static str,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Document rendering seam. The overview data is the contract; layout and
/// format belong to the implementation.
pub trait ReportRenderer: Send + Sync {
    fn render(&self, overview: &SystemOverview) -> Result<RenderedReport, ReportError>;
}

#[derive(Clone)]
pub struct ReportService {
    complaints: Arc<dyn ComplaintsRepo>,
    users: Arc<dyn UsersRepo>,
    renderer: Arc<dyn ReportRenderer>,
}

impl ReportService {
    pub fn new(
        complaints: Arc<dyn ComplaintsRepo>,
        users: Arc<dyn UsersRepo>,
        renderer: Arc<dyn ReportRenderer>,
    ) -> Self {
        Self {
            complaints,
            users,
            renderer,
        }
    }

    /// Build the overview for the trailing `days` window (today inclusive).
    /// Non-positive windows fall back to the default thirty days.
    pub async fn overview(&self, days: i64) -> Result<SystemOverview, ReportError> {
        let days = if days <= 0 { DEFAULT_WINDOW_DAYS } else { days };
        let today = OffsetDateTime::now_utc().date();
        let from = today - Duration::days(days - 1);

        let totals = ReportTotals {
            complaints: self.complaints.count_complaints().await?,
            pending: self
                .complaints
                .count_complaints_with_status(ComplaintStatus::Pending)
                .await?,
            resolved: self
                .complaints
                .count_complaints_with_status(ComplaintStatus::Resolved)
                .await?,
            users: self.users.count_users().await?,
        };

        let per_day: HashMap<Date, u64> = self
            .complaints
            .complaints_created_per_day(from)
            .await?
            .into_iter()
            .collect();
        let trend = zero_filled_trend(from, today, &per_day);

        let categories = sorted_categories(self.complaints.complaint_category_counts().await?);
        let top_categories: Vec<CategoryCount> = categories
            .iter()
            .take(TOP_CATEGORY_SLICES)
            .cloned()
            .collect();

        let statuses = vec![
            StatusSlice {
                status: ComplaintStatus::Pending,
                count: totals.pending,
            },
            StatusSlice {
                status: ComplaintStatus::Resolved,
                count: totals.resolved,
            },
        ];

        Ok(SystemOverview {
            window_days: days,
            totals,
            trend,
            categories,
            top_categories,
            statuses,
        })
    }

    pub async fn export(&self, days: i64) -> Result<RenderedReport, ReportError> {
        let overview = self.overview(days).await?;
        self.renderer.render(&overview)
    }
}

/// Every day in `[from, to]` appears exactly once, zeroed when absent.
fn zero_filled_trend(from: Date, to: Date, per_day: &HashMap<Date, u64>) -> Vec<TrendPoint> {
    let format = format_description!("[day] [month repr:short]");
    let mut points = Vec::new();
    let mut day = from;
    while day <= to {
        let label = day.format(format).unwrap_or_else(|_| day.to_string());
        points.push(TrendPoint {
            label,
            count: per_day.get(&day).copied().unwrap_or(0),
        });
        match day.next_day() {
            Some(next) => day = next,
            None => break,
        }
    }
    points
}

/// Descending by count, category name as the tie-breaker. The full
/// distribution is kept; the chart-sized top slice is derived from it.
fn sorted_categories(mut counts: Vec<CategoryCount>) -> Vec<CategoryCount> {
    counts.sort_by(|a, b| b.count.cmp(&a.count).then(a.category.cmp(&b.category)));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn trend_zero_fills_missing_days() {
        let mut per_day = HashMap::new();
        per_day.insert(date!(2025 - 03 - 02), 4);

        let points = zero_filled_trend(date!(2025 - 03 - 01), date!(2025 - 03 - 03), &per_day);

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].label, "01 Mar");
        assert_eq!(points[0].count, 0);
        assert_eq!(points[1].count, 4);
        assert_eq!(points[2].count, 0);
    }

    #[test]
    fn categories_sort_descending_with_name_tiebreak() {
        let counts = vec![
            CategoryCount {
                category: "Water Supply".to_string(),
                count: 2,
            },
            CategoryCount {
                category: "Street Lighting".to_string(),
                count: 5,
            },
            CategoryCount {
                category: "Garbage Collection".to_string(),
                count: 2,
            },
        ];

        let sorted = sorted_categories(counts);
        let order: Vec<_> = sorted.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(
            order,
            vec!["Street Lighting", "Garbage Collection", "Water Supply"]
        );
    }

    #[test]
    fn sorting_never_drops_a_category() {
        let counts: Vec<CategoryCount> = (0..8)
            .map(|i| CategoryCount {
                category: format!("Category {i}"),
                count: 10 - i as u64,
            })
            .collect();

        let sorted = sorted_categories(counts.clone());
        assert_eq!(sorted.len(), counts.len());
    }
}
