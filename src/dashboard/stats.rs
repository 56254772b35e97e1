//! Aggregates over the result listing for the dashboard view.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;

/// Days covered by the per-day series, today included.
pub const DAILY_WINDOW_DAYS: i64 = 7;

/// Number of listing entries echoed as "recent".
pub const RECENT_LIMIT: usize = 5;

/// Interview flavour recorded in a session summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionType {
    Academic,
    Job,
}

impl SessionType {
    /// Anything other than `"academic"` counts as a job interview.
    fn of(item: &Value) -> Self {
        match summary_field(item, "type").and_then(Value::as_str) {
            Some("academic") => SessionType::Academic,
            _ => SessionType::Job,
        }
    }
}

/// Session counts for one UTC day.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DayCount {
    /// `YYYY-MM-DD`
    pub date: String,
    pub academic: usize,
    pub job: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardSummary {
    pub total_sessions: usize,
    /// Mean score rounded to one decimal; `None` when no entry has a score.
    pub average_score: Option<f64>,
    pub academic: usize,
    pub job: usize,
    /// Oldest day first.
    pub daily: Vec<DayCount>,
    /// First entries of the listing, as returned by the backend.
    pub recent: Vec<Value>,
}

/// Compute dashboard aggregates from `/api/results` entries.
///
/// `now` anchors both the daily window and entries without a timestamp.
pub fn summarize(items: &[Value], now: DateTime<Utc>) -> DashboardSummary {
    let scores: Vec<f64> = items.iter().filter_map(score).collect();
    let average_score = if scores.is_empty() {
        None
    } else {
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        Some((mean * 10.0).round() / 10.0)
    };

    let academic = items
        .iter()
        .filter(|item| SessionType::of(item) == SessionType::Academic)
        .count();

    let today = now.date_naive();
    let mut daily: Vec<(NaiveDate, DayCount)> = (0..DAILY_WINDOW_DAYS)
        .rev()
        .map(|offset| {
            let day = today - Duration::days(offset);
            let count = DayCount {
                date: day.format("%Y-%m-%d").to_string(),
                academic: 0,
                job: 0,
            };
            (day, count)
        })
        .collect();

    for item in items {
        let Some(day) = modified_day(item, now) else {
            continue;
        };
        if let Some((_, count)) = daily.iter_mut().find(|(d, _)| *d == day) {
            match SessionType::of(item) {
                SessionType::Academic => count.academic += 1,
                SessionType::Job => count.job += 1,
            }
        }
    }

    DashboardSummary {
        total_sessions: items.len(),
        average_score,
        academic,
        job: items.len() - academic,
        daily: daily.into_iter().map(|(_, count)| count).collect(),
        recent: items.iter().take(RECENT_LIMIT).cloned().collect(),
    }
}

fn summary_field<'a>(item: &'a Value, key: &str) -> Option<&'a Value> {
    item.get("summary")?.get(key).filter(|v| !v.is_null())
}

/// `average_overall_score`, falling back to `overall_score` only when the
/// former is absent. A non-numeric value yields no score.
fn score(item: &Value) -> Option<f64> {
    summary_field(item, "average_overall_score")
        .or_else(|| summary_field(item, "overall_score"))
        .and_then(Value::as_f64)
}

/// UTC day of `modified`: unix seconds or an RFC 3339 string.
/// Missing, zero or empty timestamps count as `now`; unreadable ones are skipped.
fn modified_day(item: &Value, now: DateTime<Utc>) -> Option<NaiveDate> {
    let at = match item.get("modified") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => now,
        Some(Value::Number(n)) => match n.as_f64() {
            Some(secs) if secs == 0.0 => now,
            Some(secs) => DateTime::from_timestamp_millis((secs * 1000.0) as i64)?,
            None => return None,
        },
        Some(Value::String(s)) if s.is_empty() => now,
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s).ok()?.with_timezone(&Utc),
        Some(_) => return None,
    };
    Some(at.date_naive())
}
