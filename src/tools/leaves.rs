// src/tools/leaves.rs
// Leave requests. Acting on other users' leaves needs an Admin or Owner role.

use serde_json::{Value, json};

use super::Operation;
use crate::api::models::{Resource, decode, or_unknown};
use crate::api::{ApiClient, RequestSpec, segment};
use crate::mcp::requests::{CreateLeaveForUserRequest, CreateLeaveRequest, LeaveIdRequest};

fn leave_body(type_id: &str, start_date: &str, end_date: &str, note: &Option<String>) -> Value {
    let mut body = json!({"typeId": type_id, "startDate": start_date, "endDate": end_date});
    if let Some(note) = note.as_deref().filter(|n| !n.is_empty()) {
        body["note"] = json!(note);
    }
    body
}

fn leave_path(leave_id: &str) -> String {
    format!("/leaves/{}", segment(leave_id))
}

const CREATE_LEAVE: Operation<CreateLeaveRequest> = Operation {
    name: "create_leave",
    request: |p| {
        RequestSpec::post(
            "/leaves",
            leave_body(&p.type_id, &p.start_date, &p.end_date, &p.note),
        )
    },
    render: |_, value| {
        let leave: Resource = decode(value)?;
        Ok(format!(
            "Created leave request (ID: {}) - Status: {}",
            or_unknown(&leave.id),
            or_unknown(&leave.status)
        ))
    },
    not_found: None,
};

const CREATE_LEAVE_FOR_USER: Operation<CreateLeaveForUserRequest> = Operation {
    name: "create_leave_for_user",
    request: |p| {
        RequestSpec::post(
            format!("/users/{}/leaves", segment(&p.user_id)),
            leave_body(&p.type_id, &p.start_date, &p.end_date, &p.note),
        )
    },
    render: |p, value| {
        let leave: Resource = decode(value)?;
        Ok(format!(
            "Created leave for user {} (ID: {})",
            p.user_id,
            or_unknown(&leave.id)
        ))
    },
    not_found: None,
};

const APPROVE_LEAVE: Operation<LeaveIdRequest> = Operation {
    name: "approve_leave",
    request: |p| RequestSpec::post_empty(format!("{}/approve", leave_path(&p.leave_id))),
    render: |p, _| Ok(format!("Approved leave {}.", p.leave_id)),
    not_found: None,
};

const DENY_LEAVE: Operation<LeaveIdRequest> = Operation {
    name: "deny_leave",
    request: |p| RequestSpec::post_empty(format!("{}/deny", leave_path(&p.leave_id))),
    render: |p, _| Ok(format!("Denied leave {}.", p.leave_id)),
    not_found: None,
};

const DELETE_LEAVE: Operation<LeaveIdRequest> = Operation {
    name: "delete_leave",
    request: |p| RequestSpec::delete(leave_path(&p.leave_id)),
    render: |p, _| Ok(format!("Deleted leave {}.", p.leave_id)),
    not_found: None,
};

/// Request leave for the authenticated user
pub async fn create_leave(api: &ApiClient, req: CreateLeaveRequest) -> Result<String, String> {
    CREATE_LEAVE.run(api, &req).await
}

/// Record an already-approved leave for a team member
pub async fn create_leave_for_user(
    api: &ApiClient,
    req: CreateLeaveForUserRequest,
) -> Result<String, String> {
    CREATE_LEAVE_FOR_USER.run(api, &req).await
}

pub async fn approve_leave(api: &ApiClient, req: LeaveIdRequest) -> Result<String, String> {
    APPROVE_LEAVE.run(api, &req).await
}

pub async fn deny_leave(api: &ApiClient, req: LeaveIdRequest) -> Result<String, String> {
    DENY_LEAVE.run(api, &req).await
}

pub async fn delete_leave(api: &ApiClient, req: LeaveIdRequest) -> Result<String, String> {
    DELETE_LEAVE.run(api, &req).await
}
