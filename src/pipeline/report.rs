// src/pipeline/report.rs

//! Freshness evaluation and runtime report persistence.

use std::path::Path;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

use crate::error::Result;
use crate::models::report::{CHECK_FRESHNESS, RuntimeReport, Status};
use crate::utils::collapse_whitespace;

/// Layouts the source prints draw times in, after normalization.
const DATETIME_FORMATS: [&str; 8] = [
    "%a, %d %b %Y, %I:%M%p",
    "%a, %d %b %Y,%I:%M%p",
    "%d %b %Y, %I:%M%p",
    "%d %b %Y,%I:%M%p",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

static DAY_MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,2}\s+[A-Za-z]{3}\s+\d{4}").expect("date pattern is valid")
});

/// Interpret a draw date/time as printed by the source.
///
/// Full timestamps are read in the source's UTC offset. A bare date falls
/// back to midnight UTC. Returns `None` when nothing date-like is found.
pub fn parse_draw_datetime(text: &str, utc_offset_hours: i32) -> Option<DateTime<Utc>> {
    let compact = collapse_whitespace(text).replace(" ,", ",").replace('.', ":");
    if compact.is_empty() {
        return None;
    }

    let offset = FixedOffset::east_opt(utc_offset_hours.checked_mul(3600)?)?;
    for format in DATETIME_FORMATS {
        if let Ok(local) = NaiveDateTime::parse_from_str(&compact, format) {
            return local
                .and_local_timezone(offset)
                .single()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }

    let date = NaiveDate::parse_from_str(&compact, "%Y-%m-%d").ok().or_else(|| {
        let m = DAY_MONTH_YEAR.find(&compact)?;
        NaiveDate::parse_from_str(m.as_str(), "%d %b %Y").ok()
    })?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

/// Record how old the published draw time is relative to `now`.
pub fn evaluate_freshness(
    report: &mut RuntimeReport,
    draw_text: &str,
    utc_offset_hours: i32,
    max_lag_secs: u64,
    now: DateTime<Utc>,
) {
    let Some(draw_utc) = parse_draw_datetime(draw_text, utc_offset_hours) else {
        report.freshness.max_date = None;
        report.freshness.lag_seconds = None;
        report.set_check(
            CHECK_FRESHNESS,
            Status::Warn,
            "Unable to parse source draw date/time for freshness validation.",
        );
        report.warn("Freshness check skipped because draw date parsing failed.");
        return;
    };

    let lag = (now - draw_utc).num_seconds().max(0);
    report.freshness.max_date = Some(draw_utc);
    report.freshness.lag_seconds = Some(lag);

    if lag.unsigned_abs() <= max_lag_secs {
        report.set_check(
            CHECK_FRESHNESS,
            Status::Ok,
            format!("Freshness lag {lag}s is within threshold {max_lag_secs}s."),
        );
    } else {
        report.set_check(
            CHECK_FRESHNESS,
            Status::Warn,
            format!("Freshness lag {lag}s exceeds threshold {max_lag_secs}s."),
        );
        report.warn("Source data appears stale; investigate upstream freshness.");
    }
}

/// Write the report as pretty JSON, creating parent directories.
pub async fn write_report(path: &Path, report: &RuntimeReport) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    tokio::fs::write(path, json).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_parse_source_layouts() {
        // 6:30pm in Singapore is 10:30 UTC
        let expected = utc(2024, 7, 8, 10, 30);
        assert_eq!(parse_draw_datetime("Mon, 08 Jul 2024, 6:30pm", 8), Some(expected));
        assert_eq!(parse_draw_datetime("Mon, 08 Jul 2024 , 6.30pm", 8), Some(expected));
        assert_eq!(parse_draw_datetime("08 Jul 2024, 6:30PM", 8), Some(expected));
    }

    #[test]
    fn test_parse_iso_and_bare_dates() {
        assert_eq!(
            parse_draw_datetime("2025-07-01 18:30", 8),
            Some(utc(2025, 7, 1, 10, 30))
        );
        assert_eq!(parse_draw_datetime("2025-07-01", 8), Some(utc(2025, 7, 1, 0, 0)));
        assert_eq!(parse_draw_datetime("Draw on 16 Feb 2026", 8), Some(utc(2026, 2, 16, 0, 0)));
    }

    #[test]
    fn test_out_of_range_offset() {
        assert_eq!(parse_draw_datetime("2025-07-01 18:30", i32::MAX), None);
        assert_eq!(parse_draw_datetime("2025-07-01 18:30", 30), None);
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_draw_datetime("soon", 8), None);
        assert_eq!(parse_draw_datetime("", 8), None);
    }

    #[test]
    fn test_upcoming_draw_is_fresh() {
        let mut report = RuntimeReport::start(Utc::now());
        let now = utc(2024, 7, 6, 0, 0);
        evaluate_freshness(&mut report, "Mon, 08 Jul 2024, 6:30pm", 8, 3600, now);

        assert_eq!(report.freshness.lag_seconds, Some(0));
        assert_eq!(report.check(CHECK_FRESHNESS).unwrap().status, Status::Ok);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_old_draw_is_stale() {
        let mut report = RuntimeReport::start(Utc::now());
        let now = utc(2024, 7, 12, 10, 30);
        evaluate_freshness(&mut report, "Mon, 08 Jul 2024, 6:30pm", 8, 3 * 86_400, now);

        assert_eq!(report.freshness.lag_seconds, Some(4 * 86_400));
        assert_eq!(report.check(CHECK_FRESHNESS).unwrap().status, Status::Warn);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_unparseable_draw_warns() {
        let mut report = RuntimeReport::start(Utc::now());
        evaluate_freshness(&mut report, "TBC", 8, 60, Utc::now());
        assert!(report.freshness.max_date.is_none());
        assert_eq!(report.check(CHECK_FRESHNESS).unwrap().status, Status::Warn);
    }

    #[tokio::test]
    async fn test_write_report() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".state/runtime_report.json");
        let report = RuntimeReport::start(Utc::now());

        write_report(&path, &report).await.unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["status"], "FAIL");
        assert_eq!(written["key_checks"].as_array().unwrap().len(), 6);
    }
}
