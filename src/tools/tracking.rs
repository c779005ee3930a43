// src/tools/tracking.rs
// The running timer: inspect, start, stop, edit, cancel

use serde_json::{Map, Value, json};

use super::{Operation, put_non_empty};
use crate::api::models::{Note, Resource, TimeEntry, Tracking, UNKNOWN, decode, or_unknown};
use crate::api::{ApiClient, RequestSpec, segment};
use crate::duration::{api_now, elapsed_since, format_duration};
use crate::mcp::requests::{EditTrackingRequest, StartTrackingRequest, StopTrackingRequest};

pub const NO_ACTIVE_TRACKING: &str = "No active tracking.";

fn render_tracking(tracking: &Tracking) -> String {
    let activity = tracking.activity.clone().unwrap_or_default();
    let started = tracking.started_at.as_deref().unwrap_or(UNKNOWN);

    let mut lines = vec![
        "## Currently Tracking".to_string(),
        format!(
            "**Activity:** {} (ID: {})",
            or_unknown(&activity.name),
            or_unknown(&activity.id)
        ),
        format!("**Started:** {}", started),
        format!("**Elapsed:** {}", elapsed_since(started)),
    ];
    if let Some(note) = Note::text_of(&tracking.note) {
        lines.push(format!("**Note:** {}", note));
    }
    lines.join("\n")
}

const GET_TRACKING: Operation<()> = Operation {
    name: "get_tracking",
    request: |_| RequestSpec::get("/tracking"),
    render: |_, value| {
        Ok(match Tracking::from_response(value)? {
            Some(tracking) => render_tracking(&tracking),
            None => NO_ACTIVE_TRACKING.to_string(),
        })
    },
    not_found: Some(|_| NO_ACTIVE_TRACKING.to_string()),
};

/// Parameters after defaults are filled in, so the request and the rendered
/// confirmation agree on the timestamp
struct StartAt {
    activity_id: String,
    started_at: String,
}

const START_TRACKING: Operation<StartAt> = Operation {
    name: "start_tracking",
    request: |p| {
        RequestSpec::post(
            format!("/tracking/{}/start", segment(&p.activity_id)),
            json!({"startedAt": p.started_at}),
        )
    },
    render: |p, value| {
        let started: Resource = decode(value)?;
        let name = started
            .activity
            .and_then(|a| a.name)
            .unwrap_or_else(|| p.activity_id.clone());
        Ok(format!("Started tracking: {} at {}", name, p.started_at))
    },
    not_found: None,
};

const STOP_TRACKING: Operation<String> = Operation {
    name: "stop_tracking",
    request: |stopped_at| RequestSpec::post("/tracking/stop", json!({"stoppedAt": stopped_at})),
    render: |_, value| {
        let entry: TimeEntry = decode(value)?;
        Ok(format!(
            "Stopped tracking: {}\nDuration: {}\nTime Entry ID: {}",
            or_unknown(&entry.activity.name),
            format_duration(entry.duration.started(), entry.duration.stopped()),
            or_unknown(&entry.id)
        ))
    },
    not_found: None,
};

const EDIT_TRACKING: Operation<EditTrackingRequest> = Operation {
    name: "edit_tracking",
    request: |p| {
        let mut body = Map::new();
        if let Some(note) = &p.note {
            body.insert("note".to_string(), json!({"text": note}));
        }
        put_non_empty(&mut body, "activityId", &p.activity_id);
        put_non_empty(&mut body, "startedAt", &p.started_at);
        RequestSpec::patch("/tracking", Value::Object(body))
    },
    render: |_, value| {
        let updated: Resource = decode(value)?;
        let name = updated.activity.and_then(|a| a.name);
        Ok(format!("Updated tracking. Activity: {}", or_unknown(&name)))
    },
    not_found: None,
};

const CANCEL_TRACKING: Operation<()> = Operation {
    name: "cancel_tracking",
    request: |_| RequestSpec::delete("/tracking"),
    render: |_, _| Ok("Tracking cancelled. No time entry created.".to_string()),
    not_found: None,
};

/// Running timer with elapsed time, or a note that nothing is tracked
pub async fn get_tracking(api: &ApiClient) -> Result<String, String> {
    GET_TRACKING.run(api, &()).await
}

pub async fn start_tracking(api: &ApiClient, req: StartTrackingRequest) -> Result<String, String> {
    let params = StartAt {
        activity_id: req.activity_id,
        started_at: req.started_at.unwrap_or_else(api_now),
    };
    START_TRACKING.run(api, &params).await
}

/// Stop the timer, turning it into a time entry
pub async fn stop_tracking(api: &ApiClient, req: StopTrackingRequest) -> Result<String, String> {
    let stopped_at = req.stopped_at.unwrap_or_else(api_now);
    STOP_TRACKING.run(api, &stopped_at).await
}

pub async fn edit_tracking(api: &ApiClient, req: EditTrackingRequest) -> Result<String, String> {
    EDIT_TRACKING.run(api, &req).await
}

pub async fn cancel_tracking(api: &ApiClient) -> Result<String, String> {
    CANCEL_TRACKING.run(api, &()).await
}
