// src/tools/time_entries.rs
// Time entry listing and CRUD

use chrono::{Duration, Utc};
use serde_json::{Map, Value, json};

use super::{Operation, put_non_empty};
use crate::api::models::{Note, Resource, TimeEntry, TimeEntryList, UNKNOWN, decode, or_unknown};
use crate::api::{ApiClient, RequestSpec, segment};
use crate::duration::{
    aggregate_by_label, end_of_day, format_duration, format_seconds, range_end, range_start,
    span_seconds, start_of_day,
};
use crate::mcp::requests::{
    CreateTimeEntryRequest, EditTimeEntryRequest, TimeEntryIdRequest, TimeRangeRequest,
};

/// Notes longer than this are cut in listings
const NOTE_PREVIEW_CHARS: usize = 100;

/// Days covered by a listing when no start is given
const DEFAULT_LOOKBACK_DAYS: i64 = 7;

/// Characters `from..to` of `s`, clamped to its length
fn chars_between(s: &str, from: usize, to: usize) -> String {
    s.chars().skip(from).take(to.saturating_sub(from)).collect()
}

/// Resolved listing window, both ends in API layout
pub(crate) struct TimeRange {
    pub start: String,
    pub end: String,
}

impl TimeRange {
    pub fn resolve(req: &TimeRangeRequest) -> Self {
        let today = Utc::now().date_naive();
        Self {
            start: req.start.as_deref().map(range_start).unwrap_or_else(|| {
                start_of_day(today - Duration::days(DEFAULT_LOOKBACK_DAYS))
            }),
            end: req
                .end
                .as_deref()
                .map(range_end)
                .unwrap_or_else(|| end_of_day(today)),
        }
    }

    /// Range endpoint; timestamps go into the path verbatim
    pub fn request(&self) -> RequestSpec {
        RequestSpec::get(format!("/time-entries/{}/{}", self.start, self.end))
    }
}

/// Duration of one entry in whole seconds
pub(crate) fn entry_seconds(entry: &TimeEntry) -> Result<i64, crate::duration::TimestampError> {
    span_seconds(entry.duration.started(), entry.duration.stopped())
}

fn render_entries(range: &TimeRange, entries: &[TimeEntry]) -> String {
    if entries.is_empty() {
        return format!(
            "No time entries found between {} and {}.",
            range.start, range.end
        );
    }

    let mut lines = vec![
        format!(
            "## Time Entries ({} to {})",
            chars_between(&range.start, 0, 10),
            chars_between(&range.end, 0, 10)
        ),
        String::new(),
    ];

    for entry in entries {
        let started = entry.duration.started();
        let stopped = entry.duration.stopped();
        lines.push(format!(
            "**{}** - {}",
            or_unknown(&entry.activity.name),
            format_duration(started, stopped)
        ));
        lines.push(format!(
            "  {} → {} (ID: {})",
            chars_between(started, 0, 16),
            chars_between(stopped, 11, 16),
            or_unknown(&entry.id)
        ));
        if let Some(note) = Note::text_of(&entry.note) {
            lines.push(format!("  Note: {}", chars_between(note, 0, NOTE_PREVIEW_CHARS)));
        }
        lines.push(String::new());
    }

    let totals = aggregate_by_label(entries, TimeEntry::activity_label, entry_seconds);
    lines.push(format!("**Total: {}**", format_seconds(totals.total)));
    lines.join("\n")
}

const LIST_TIME_ENTRIES: Operation<TimeRange> = Operation {
    name: "list_time_entries",
    request: TimeRange::request,
    render: |range, value| {
        let list: TimeEntryList = decode(value)?;
        Ok(render_entries(range, &list.time_entries))
    },
    not_found: None,
};

const GET_TIME_ENTRY: Operation<TimeEntryIdRequest> = Operation {
    name: "get_time_entry",
    request: |p| RequestSpec::get(format!("/time-entries/{}", segment(&p.time_entry_id))),
    render: |p, value| {
        let entry: TimeEntry = decode(value)?;
        let span = &entry.duration;
        let mut lines = vec![
            format!(
                "## Time Entry {}",
                entry.id.as_deref().unwrap_or(&p.time_entry_id)
            ),
            format!(
                "**Activity:** {} (ID: {})",
                or_unknown(&entry.activity.name),
                or_unknown(&entry.activity.id)
            ),
            format!("**Started:** {}", span.started_at.as_deref().unwrap_or(UNKNOWN)),
            format!("**Stopped:** {}", span.stopped_at.as_deref().unwrap_or(UNKNOWN)),
            format!(
                "**Duration:** {}",
                format_duration(span.started(), span.stopped())
            ),
        ];
        if let Some(note) = Note::text_of(&entry.note) {
            lines.push(format!("**Note:** {}", note));
        }
        Ok(lines.join("\n"))
    },
    not_found: None,
};

const CREATE_TIME_ENTRY: Operation<CreateTimeEntryRequest> = Operation {
    name: "create_time_entry",
    request: |p| {
        let mut body = json!({
            "activityId": p.activity_id,
            "startedAt": p.started_at,
            "stoppedAt": p.stopped_at,
        });
        if let Some(note) = p.note.as_deref().filter(|n| !n.is_empty()) {
            body["note"] = json!({"text": note});
        }
        RequestSpec::post("/time-entries", body)
    },
    render: |p, value| {
        let created: Resource = decode(value)?;
        Ok(format!(
            "Created time entry. ID: {}, Duration: {}",
            or_unknown(&created.id),
            format_duration(&p.started_at, &p.stopped_at)
        ))
    },
    not_found: None,
};

const EDIT_TIME_ENTRY: Operation<EditTimeEntryRequest> = Operation {
    name: "edit_time_entry",
    request: |p| {
        let mut body = Map::new();
        put_non_empty(&mut body, "activityId", &p.activity_id);
        put_non_empty(&mut body, "startedAt", &p.started_at);
        put_non_empty(&mut body, "stoppedAt", &p.stopped_at);
        match p.note.as_deref() {
            Some("") => {
                body.insert("note".to_string(), Value::Null);
            }
            Some(text) => {
                body.insert("note".to_string(), json!({"text": text}));
            }
            None => {}
        }
        RequestSpec::patch(
            format!("/time-entries/{}", segment(&p.time_entry_id)),
            Value::Object(body),
        )
    },
    render: |p, _| Ok(format!("Updated time entry {}.", p.time_entry_id)),
    not_found: None,
};

const DELETE_TIME_ENTRY: Operation<TimeEntryIdRequest> = Operation {
    name: "delete_time_entry",
    request: |p| RequestSpec::delete(format!("/time-entries/{}", segment(&p.time_entry_id))),
    render: |p, _| Ok(format!("Deleted time entry {}.", p.time_entry_id)),
    not_found: None,
};

/// Entries in a window; bare dates widen to whole days, the default window
/// is the last seven days through the end of today (UTC)
pub async fn list_time_entries(api: &ApiClient, req: TimeRangeRequest) -> Result<String, String> {
    LIST_TIME_ENTRIES.run(api, &TimeRange::resolve(&req)).await
}

pub async fn get_time_entry(api: &ApiClient, req: TimeEntryIdRequest) -> Result<String, String> {
    GET_TIME_ENTRY.run(api, &req).await
}

pub async fn create_time_entry(
    api: &ApiClient,
    req: CreateTimeEntryRequest,
) -> Result<String, String> {
    CREATE_TIME_ENTRY.run(api, &req).await
}

/// Patch an entry. An empty note string removes the note.
pub async fn edit_time_entry(api: &ApiClient, req: EditTimeEntryRequest) -> Result<String, String> {
    EDIT_TIME_ENTRY.run(api, &req).await
}

pub async fn delete_time_entry(api: &ApiClient, req: TimeEntryIdRequest) -> Result<String, String> {
    DELETE_TIME_ENTRY.run(api, &req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{self, MockTransport};
    use crate::tools::test_support::*;
    use reqwest::Method;

    fn entry(id: &str, name: &str, start: &str, stop: &str, note: Option<&str>) -> Value {
        json!({
            "id": id,
            "activity": {"id": "a", "name": name},
            "duration": {"startedAt": start, "stoppedAt": stop},
            "note": note.map(|text| json!({"text": text}))
        })
    }

    // ============================================================================
    // list_time_entries
    // ============================================================================

    #[test]
    fn test_range_resolution() {
        let explicit = TimeRange::resolve(&TimeRangeRequest {
            start: Some("2024-03-01".into()),
            end: Some("2024-03-02T12:00:00.000".into()),
        });
        assert_eq!(explicit.start, "2024-03-01T00:00:00.000");
        assert_eq!(explicit.end, "2024-03-02T12:00:00.000");
        assert_eq!(
            explicit.request().path,
            "/time-entries/2024-03-01T00:00:00.000/2024-03-02T12:00:00.000"
        );

        let defaulted = TimeRange::resolve(&TimeRangeRequest::default());
        let today = Utc::now().date_naive();
        assert_eq!(defaulted.start, start_of_day(today - Duration::days(7)));
        assert_eq!(defaulted.end, end_of_day(today));
    }

    #[tokio::test]
    async fn test_list_time_entries_renders_total() {
        let long_note = "x".repeat(150);
        let body = json!({"timeEntries": [
            entry("e1", "Coding", "2024-03-01T09:00:00.000", "2024-03-01T10:30:00.000", None),
            entry("e2", "Email", "2024-03-01T11:00:00.000", "2024-03-01T11:20:00.000", Some(&long_note)),
            entry("e3", "Broken", "garbage", "2024-03-01T12:00:00.000", None)
        ]});
        let transport = MockTransport::with_sign_in(move |_| mock::json(200, body.clone()));
        let api = client(&transport);

        let out = list_time_entries(
            &api,
            TimeRangeRequest {
                start: Some("2024-03-01".into()),
                end: Some("2024-03-01".into()),
            },
        )
        .await
        .unwrap();

        assert_eq!(
            path_of(&transport, 0),
            "/time-entries/2024-03-01T00:00:00.000/2024-03-01T23:59:59.999"
        );
        assert!(out.starts_with("## Time Entries (2024-03-01 to 2024-03-01)\n\n"));
        assert!(out.contains("**Coding** - 1h 30m\n  2024-03-01T09:00 → 10:30 (ID: e1)"));
        assert!(out.contains(&format!("  Note: {}\n", "x".repeat(100))));
        assert!(!out.contains(&"x".repeat(101)));
        assert!(out.contains("**Broken** - ?"));
        assert!(out.ends_with("**Total: 1h 50m**"));
    }

    #[tokio::test]
    async fn test_list_time_entries_empty() {
        let transport = MockTransport::with_sign_in(|_| mock::json(200, json!({"timeEntries": []})));
        let api = client(&transport);

        let out = list_time_entries(
            &api,
            TimeRangeRequest {
                start: Some("2024-03-01".into()),
                end: Some("2024-03-02".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(
            out,
            "No time entries found between 2024-03-01T00:00:00.000 and 2024-03-02T23:59:59.999."
        );
    }

    // ============================================================================
    // Single entries
    // ============================================================================

    #[tokio::test]
    async fn test_get_time_entry() {
        let transport = MockTransport::with_sign_in(|_| {
            mock::json(
                200,
                entry("e1", "Coding", "2024-03-01T09:00:00.000", "2024-03-01T09:45:00.000", Some("standup")),
            )
        });
        let api = client(&transport);

        let out = get_time_entry(&api, TimeEntryIdRequest { time_entry_id: "e1".into() })
            .await
            .unwrap();
        assert_eq!(
            out,
            "## Time Entry e1\n\
             **Activity:** Coding (ID: a)\n\
             **Started:** 2024-03-01T09:00:00.000\n\
             **Stopped:** 2024-03-01T09:45:00.000\n\
             **Duration:** 0h 45m\n\
             **Note:** standup"
        );
    }

    #[tokio::test]
    async fn test_get_time_entry_not_found_is_error() {
        let transport =
            MockTransport::with_sign_in(|_| mock::json(404, json!({"message": "Time entry not found"})));
        let api = client(&transport);

        let err = get_time_entry(&api, TimeEntryIdRequest { time_entry_id: "nope".into() })
            .await
            .unwrap_err();
        assert_eq!(err, "Error 404: Time entry not found");
    }

    #[tokio::test]
    async fn test_create_time_entry() {
        let transport = MockTransport::with_sign_in(|_| mock::json(201, json!({"id": "e9"})));
        let api = client(&transport);

        let out = create_time_entry(
            &api,
            CreateTimeEntryRequest {
                activity_id: "a1".into(),
                started_at: "2024-03-01T09:00:00.000".into(),
                stopped_at: "2024-03-01T10:00:00.000".into(),
                note: Some("pairing".into()),
            },
        )
        .await
        .unwrap();

        assert_eq!(out, "Created time entry. ID: e9, Duration: 1h 0m");
        assert_eq!(
            transport.api_requests()[0].body,
            Some(json!({
                "activityId": "a1",
                "startedAt": "2024-03-01T09:00:00.000",
                "stoppedAt": "2024-03-01T10:00:00.000",
                "note": {"text": "pairing"}
            }))
        );
    }

    #[tokio::test]
    async fn test_create_time_entry_minute_precision_input() {
        let transport = MockTransport::with_sign_in(|_| mock::json(201, json!({"id": "e10"})));
        let api = client(&transport);

        let out = create_time_entry(
            &api,
            CreateTimeEntryRequest {
                activity_id: "a1".into(),
                started_at: "2024-01-01T10:00".into(),
                stopped_at: "2024-01-01 11:30:00".into(),
                note: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(out, "Created time entry. ID: e10, Duration: 1h 30m");
    }

    #[tokio::test]
    async fn test_edit_time_entry_clears_note() {
        let transport = MockTransport::with_sign_in(|_| mock::json(200, json!({"id": "e1"})));
        let api = client(&transport);

        let out = edit_time_entry(
            &api,
            EditTimeEntryRequest {
                time_entry_id: "e1".into(),
                activity_id: None,
                started_at: None,
                stopped_at: Some("2024-03-01T11:00:00.000".into()),
                note: Some(String::new()),
            },
        )
        .await
        .unwrap();

        assert_eq!(out, "Updated time entry e1.");
        let requests = transport.api_requests();
        let req = &requests[0];
        assert_eq!(req.method, Method::PATCH);
        assert_eq!(
            req.body,
            Some(json!({"stoppedAt": "2024-03-01T11:00:00.000", "note": null}))
        );
    }

    #[tokio::test]
    async fn test_delete_time_entry() {
        let transport = MockTransport::with_sign_in(|_| mock::raw(204, ""));
        let api = client(&transport);

        let out = delete_time_entry(&api, TimeEntryIdRequest { time_entry_id: "e1".into() })
            .await
            .unwrap();
        assert_eq!(out, "Deleted time entry e1.");
        assert_eq!(transport.api_requests()[0].method, Method::DELETE);
    }
}
