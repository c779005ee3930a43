// src/tools/reports.rs
// Aggregated reports: arbitrary ranges and today's summary

use chrono::{NaiveDate, Utc};
use serde_json::{Map, Value, json};
use tracing::debug;

use super::Operation;
use super::time_entries::{TimeRange, entry_seconds};
use crate::api::models::{TimeEntry, TimeEntryList, Tracking, decode, or_unknown};
use crate::api::{ApiClient, RequestSpec};
use crate::duration::{
    DurationTotals, aggregate_by_label, elapsed_since, end_of_day, format_seconds, parse_timestamp,
    start_of_day,
};
use crate::error::ApiError;
use crate::mcp::requests::ReportRequest;

fn totals_of(entries: &[TimeEntry]) -> DurationTotals {
    aggregate_by_label(entries, TimeEntry::activity_label, entry_seconds)
}

fn report_body(p: &ReportRequest) -> Value {
    let mut body = Map::new();
    body.insert(
        "date".to_string(),
        json!({"start": p.start_date, "end": p.end_date}),
    );
    body.insert("fileType".to_string(), json!("json"));

    let filters = [
        ("activities", &p.activity_ids),
        ("folders", &p.folder_ids),
        ("users", &p.user_ids),
    ];
    for (key, ids) in filters {
        if let Some(ids) = ids.as_ref().filter(|ids| !ids.is_empty()) {
            body.insert(key.to_string(), json!({ "ids": ids }));
        }
    }
    Value::Object(body)
}

fn render_report(p: &ReportRequest, entries: &[TimeEntry]) -> String {
    if entries.is_empty() {
        return format!(
            "No entries in report for {} to {}.",
            p.start_date, p.end_date
        );
    }

    let totals = totals_of(entries);
    let mut lines = vec![
        format!("## Report: {} to {}", p.start_date, p.end_date),
        String::new(),
    ];
    for (label, secs) in totals.sorted() {
        lines.push(format!(
            "- **{}**: {} ({:.1}%)",
            label,
            format_seconds(secs),
            totals.percentage(secs)
        ));
    }
    lines.push(format!(
        "\n**Total: {}** ({} entries)",
        format_seconds(totals.total),
        entries.len()
    ));
    lines.join("\n")
}

const GENERATE_REPORT: Operation<ReportRequest> = Operation {
    name: "generate_report",
    request: |p| RequestSpec::post("/report", report_body(p)),
    render: |p, value| {
        let report: TimeEntryList = decode(value)?;
        Ok(render_report(p, &report.time_entries))
    },
    not_found: None,
};

/// Per-activity totals with percentages for a date range
pub async fn generate_report(api: &ApiClient, req: ReportRequest) -> Result<String, String> {
    GENERATE_REPORT.run(api, &req).await
}

// ============================================================================
// Today's summary
// ============================================================================

fn render_summary(day: NaiveDate, entries: &[TimeEntry], tracking: Option<&Tracking>) -> String {
    let mut lines = vec![
        format!("## Today's Summary ({})", day.format("%Y-%m-%d")),
        String::new(),
    ];

    if let Some(tracking) = tracking {
        let name = tracking
            .activity
            .as_ref()
            .map(|a| or_unknown(&a.name))
            .unwrap_or("?");
        match tracking.started_at.as_deref() {
            Some(started) if parse_timestamp(started).is_ok() => lines.push(
                format!("🔴 **Currently tracking:** {} ({})", name, elapsed_since(started)),
            ),
            _ => lines.push(format!("🔴 **Currently tracking:** {}", name)),
        }
        lines.push(String::new());
    }

    let totals = totals_of(entries);
    if totals.is_empty() {
        lines.push("No completed time entries today.".to_string());
    } else {
        lines.push("### Completed".to_string());
        for (label, secs) in totals.sorted() {
            lines.push(format!("- {}: {}", label, format_seconds(secs)));
        }
        lines.push(format!(
            "\n**Total completed: {}**",
            format_seconds(totals.total)
        ));
    }

    lines.join("\n")
}

async fn current_tracking(api: &ApiClient) -> Result<Option<Tracking>, ApiError> {
    match api.execute(RequestSpec::get("/tracking")).await {
        Ok(response) => Tracking::from_response(response.into_value()),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

async fn summarize_day(api: &ApiClient, day: NaiveDate) -> Result<String, ApiError> {
    let range = TimeRange {
        start: start_of_day(day),
        end: end_of_day(day),
    };
    let list: TimeEntryList = decode(api.execute(range.request()).await?.into_value())?;
    let tracking = current_tracking(api).await?;
    debug!(
        entries = list.time_entries.len(),
        tracking = tracking.is_some(),
        "Building daily summary"
    );
    Ok(render_summary(day, &list.time_entries, tracking.as_ref()))
}

/// Completed time for the current UTC day plus any running tracking
pub async fn today_summary(api: &ApiClient) -> Result<String, String> {
    summarize_day(api, Utc::now().date_naive())
        .await
        .map_err(|e| e.to_report())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{self, MockTransport};
    use crate::tools::test_support::*;
    use reqwest::Method;

    fn entry(name: &str, start: &str, stop: &str) -> Value {
        json!({
            "id": "e",
            "activity": {"id": "a", "name": name},
            "duration": {"startedAt": start, "stoppedAt": stop}
        })
    }

    fn request(activity_ids: Option<Vec<String>>) -> ReportRequest {
        ReportRequest {
            start_date: "2024-01-01".into(),
            end_date: "2024-01-31".into(),
            activity_ids,
            folder_ids: None,
            user_ids: Some(vec![]),
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    // ============================================================================
    // generate_report
    // ============================================================================

    #[tokio::test]
    async fn test_report_orders_by_total() {
        let transport = MockTransport::with_sign_in(|_| {
            mock::json(
                200,
                json!({"timeEntries": [
                    entry("Email", "2024-01-02T09:00:00.000", "2024-01-02T10:00:00.000"),
                    entry("Coding", "2024-01-02T10:00:00.000", "2024-01-02T13:00:00.000"),
                    entry("Broken", "garbage", "2024-01-02T13:00:00.000"),
                ]}),
            )
        });
        let api = client(&transport);

        let out = generate_report(&api, request(Some(vec!["a1".into()])))
            .await
            .unwrap();
        assert_eq!(
            out,
            "## Report: 2024-01-01 to 2024-01-31\n\n\
             - **Coding**: 3h 0m (75.0%)\n\
             - **Email**: 1h 0m (25.0%)\n\
             \n**Total: 4h 0m** (3 entries)"
        );

        let requests = transport.api_requests();
        let sent = &requests[0];
        assert_eq!(sent.method, Method::POST);
        assert_eq!(path_of(&transport, 0), "/report");
        assert_eq!(
            sent.body,
            Some(json!({
                "date": {"start": "2024-01-01", "end": "2024-01-31"},
                "fileType": "json",
                "activities": {"ids": ["a1"]}
            }))
        );
    }

    #[tokio::test]
    async fn test_report_empty() {
        let transport = MockTransport::with_sign_in(|_| mock::json(200, json!({"timeEntries": []})));
        let api = client(&transport);

        assert_eq!(
            generate_report(&api, request(None)).await.unwrap(),
            "No entries in report for 2024-01-01 to 2024-01-31."
        );
    }

    #[test]
    fn test_report_zero_total_percentage() {
        let entries: Vec<TimeEntry> = vec![
            serde_json::from_value(entry(
                "Idle",
                "2024-01-02T09:00:00.000",
                "2024-01-02T09:00:00.000",
            ))
            .unwrap(),
        ];
        let out = render_report(&request(None), &entries);
        assert!(out.contains("- **Idle**: 0h 0m (0.0%)"));
    }

    // ============================================================================
    // today_summary
    // ============================================================================

    #[test]
    fn test_summary_with_entries() {
        let entries: Vec<TimeEntry> = serde_json::from_value(json!([
            entry("Coding", "2024-03-04T09:00:00.000", "2024-03-04T10:30:00.000"),
            entry("Email", "2024-03-04T11:00:00.000", "2024-03-04T11:15:00.000"),
        ]))
        .unwrap();

        assert_eq!(
            render_summary(day(), &entries, None),
            "## Today's Summary (2024-03-04)\n\n\
             ### Completed\n\
             - Coding: 1h 30m\n\
             - Email: 0h 15m\n\
             \n**Total completed: 1h 45m**"
        );
    }

    #[test]
    fn test_summary_tracking_without_start() {
        let tracking: Tracking = serde_json::from_value(json!({
            "activity": {"id": "a1", "name": "Coding"}
        }))
        .unwrap();

        assert_eq!(
            render_summary(day(), &[], Some(&tracking)),
            "## Today's Summary (2024-03-04)\n\n\
             🔴 **Currently tracking:** Coding\n\n\
             No completed time entries today."
        );
    }

    #[tokio::test]
    async fn test_today_summary_tolerates_missing_tracking() {
        let transport = MockTransport::with_sign_in(|req| {
            if req.url.ends_with("/tracking") {
                mock::raw(404, "")
            } else {
                mock::json(200, json!({"timeEntries": []}))
            }
        });
        let api = client(&transport);

        let out = today_summary(&api).await.unwrap();
        assert!(out.starts_with("## Today's Summary ("));
        assert!(out.ends_with("No completed time entries today."));
        assert!(!out.contains("Currently tracking"));

        let first = path_of(&transport, 0);
        assert!(first.starts_with("/time-entries/"));
        assert!(first.contains("T00:00:00.000/"));
        assert!(first.ends_with("T23:59:59.999"));
        assert_eq!(path_of(&transport, 1), "/tracking");
    }

    #[tokio::test]
    async fn test_today_summary_shows_running_tracking() {
        let transport = MockTransport::with_sign_in(|req| {
            if req.url.ends_with("/tracking") {
                mock::json(
                    200,
                    json!({"currentTracking": {
                        "id": "t1",
                        "activity": {"id": "a1", "name": "Coding"},
                        "startedAt": "2020-01-01T00:00:00.000"
                    }}),
                )
            } else {
                mock::json(200, json!({"timeEntries": []}))
            }
        });
        let api = client(&transport);

        let out = today_summary(&api).await.unwrap();
        assert!(out.contains("🔴 **Currently tracking:** Coding ("));
    }

    #[tokio::test]
    async fn test_today_summary_propagates_other_errors() {
        let transport = MockTransport::with_sign_in(|req| {
            if req.url.ends_with("/tracking") {
                mock::json(500, json!({"message": "boom"}))
            } else {
                mock::json(200, json!({"timeEntries": []}))
            }
        });
        let api = client(&transport);

        assert_eq!(today_summary(&api).await.unwrap_err(), "Error 500: boom");
    }
}
