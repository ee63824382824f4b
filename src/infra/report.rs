//! Plain-text rendering of the system overview report.

use std::fmt::Write as FmtWrite;

use time::OffsetDateTime;
use time::macros::format_description;

use crate::application::reports::{RenderedReport, ReportError, ReportRenderer, SystemOverview};

/// Tabular plain-text export. The overview data is the contract; swapping in
/// a richer document format only means another implementation of the trait.
#[derive(Debug, Default, Clone)]
pub struct TextReportRenderer;

impl ReportRenderer for TextReportRenderer {
    fn render(&self, overview: &SystemOverview) -> Result<RenderedReport, ReportError> {
        let mut out = String::new();
        let now = OffsetDateTime::now_utc();
        let stamp_format = format_description!("[year]-[month]-[day] [hour]:[minute] UTC");
        let stamp = now
            .format(stamp_format)
            .map_err(|err| ReportError::Render(err.to_string()))?;

        render_into(&mut out, overview, &stamp).map_err(|err| ReportError::Render(err.to_string()))?;

        let file_stamp_format = format_description!("[year][month][day]");
        let file_stamp = now
            .format(file_stamp_format)
            .map_err(|err| ReportError::Render(err.to_string()))?;

        Ok(RenderedReport {
            content_type: "text/plain; charset=utf-8",
            file_name: format!("system-report-{file_stamp}.txt"),
            bytes: out.into_bytes(),
        })
    }
}

fn render_into(
    out: &mut String,
    overview: &SystemOverview,
    stamp: &str,
) -> Result<(), std::fmt::Error> {
    writeln!(out, "System Analytics Report")?;
    writeln!(out, "Generated: {stamp}")?;
    writeln!(out, "Window: last {} days", overview.window_days)?;
    writeln!(out)?;

    writeln!(out, "Totals")?;
    writeln!(out, "  Complaints: {}", overview.totals.complaints)?;
    writeln!(out, "  Pending:    {}", overview.totals.pending)?;
    writeln!(out, "  Resolved:   {}", overview.totals.resolved)?;
    writeln!(out, "  Users:      {}", overview.totals.users)?;
    writeln!(out)?;

    writeln!(out, "Complaints per day")?;
    for point in &overview.trend {
        writeln!(out, "  {:<8} {}", point.label, point.count)?;
    }
    writeln!(out)?;

    writeln!(out, "Category distribution")?;
    for slice in &overview.categories {
        writeln!(out, "  {:<24} {}", slice.category, slice.count)?;
    }
    writeln!(out)?;

    writeln!(out, "Status breakdown")?;
    for slice in &overview.statuses {
        writeln!(out, "  {:<12} {}", slice.status.as_str(), slice.count)?;
    }

    Ok(())
}
