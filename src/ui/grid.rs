use chrono::{DateTime, Datelike, Local, NaiveDate};

use crate::calendar::format_day_label;
use crate::filter::{FilteredBucket, FilteredBucketSet, FilteredVisit};

use super::highlight::highlight_matches;

const TITLE_WIDTH: usize = 70;

/// Day view: a flat list of the single bucket's visits
pub fn render_day(set: &FilteredBucketSet, color_enabled: bool) -> String {
    match set.buckets().first() {
        Some(bucket) if !bucket.visits.is_empty() => render_visit_list(bucket, color_enabled),
        _ => "  (no history)\n".to_string(),
    }
}

/// Week view: seven labeled day sections
pub fn render_week(set: &FilteredBucketSet, color_enabled: bool) -> String {
    let mut out = String::new();
    for bucket in set.buckets() {
        out.push_str(&format!("{}\n", format_day_label(bucket.day)));
        if bucket.visits.is_empty() {
            out.push_str("  (no history)\n");
        } else {
            out.push_str(&render_visit_list(bucket, color_enabled));
        }
        out.push('\n');
    }
    out
}

/// Month view: a 5x7 grid of day cells with visit counts. Days outside the
/// anchor month are wrapped in parentheses.
pub fn render_month(set: &FilteredBucketSet, anchor: NaiveDate) -> String {
    let mut out = String::new();

    for weekday in ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"] {
        out.push_str(&format!("{:>10}", weekday));
    }
    out.push('\n');

    for week in set.buckets().chunks(7) {
        for bucket in week {
            let count = bucket.visits.len();
            let cell = if bucket.day.month() == anchor.month() {
                format!("{:>2}: {:<4}", bucket.day.day(), count)
            } else {
                format!("({:>2}: {})", bucket.day.day(), count)
            };
            out.push_str(&format!("{:>10}", cell));
        }
        out.push('\n');
    }

    out
}

fn render_visit_list(bucket: &FilteredBucket, color_enabled: bool) -> String {
    let mut out = String::new();
    for visit in &bucket.visits {
        out.push_str(&format!(
            "  {}  {}\n",
            format_time(visit.record.last_visit_time),
            visit_line(visit, color_enabled)
        ));
    }
    out
}

fn visit_line(visit: &FilteredVisit, color_enabled: bool) -> String {
    let title = visit
        .record
        .title
        .as_deref()
        .unwrap_or(visit.record.url.as_str());
    let line = if title == visit.record.url {
        truncate(title, TITLE_WIDTH)
    } else {
        format!(
            "{} ({})",
            truncate(title, TITLE_WIDTH),
            truncate(&visit.record.url, TITLE_WIDTH)
        )
    };
    highlight_matches(&line, &visit.matches.matched, color_enabled)
}

fn format_time(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|utc| utc.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{day_start_ms, BucketSet, VisitRecord};
    use crate::filter::filter;

    fn sample_set(day: NaiveDate) -> FilteredBucketSet {
        let mut set = BucketSet::empty(day, 1);
        set.assign(VisitRecord {
            url: "https://example.com/".to_string(),
            title: Some("Example".to_string()),
            last_visit_time: day_start_ms(day) + 3_600_000,
            id: "1".to_string(),
        });
        set.finalize();
        filter(&set, &[])
    }

    #[test]
    fn day_view_lists_visits() {
        let day = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let rendered = render_day(&sample_set(day), false);
        assert!(rendered.contains("Example"));
        assert!(rendered.contains("https://example.com/"));
    }

    #[test]
    fn day_view_reports_empty_bucket() {
        let day = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let set = filter(&BucketSet::empty(day, 1), &[]);
        assert!(render_day(&set, false).contains("no history"));
    }

    #[test]
    fn month_view_marks_days_outside_anchor_month() {
        let anchor = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let first = NaiveDate::from_ymd_opt(2026, 7, 26).unwrap();
        let set = filter(&BucketSet::empty(first, 35), &[]);
        let rendered = render_month(&set, anchor);
        // July days are parenthesized, August days are not
        assert!(rendered.contains("(26: 0)"));
        assert!(rendered.contains(" 5: 0"));
    }

    #[test]
    fn truncate_appends_ellipsis() {
        assert_eq!(truncate("short", 10), "short");
        let long = "x".repeat(20);
        let cut = truncate(&long, 10);
        assert!(cut.ends_with('…'));
        assert!(cut.chars().count() <= 10);
    }
}
