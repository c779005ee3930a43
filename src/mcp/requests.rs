// src/mcp/requests.rs
// MCP tool request types

use rmcp::schemars;
use serde::Deserialize;
use std::fmt;

fn default_activity_color() -> String {
    "#3498db".to_string()
}

fn default_true() -> bool {
    true
}

fn default_scope() -> String {
    "timeular".to_string()
}

// ============================================================================
// Enums - typed alternatives to free-form string parameters
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// Sees every member's time entries in the folder
    Full,
    /// Sees only their own time entries
    #[default]
    Personal,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Personal => "personal",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Activities
// ============================================================================

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ActivityIdRequest {
    #[schemars(description = "Activity ID")]
    pub activity_id: String,
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateActivityRequest {
    #[schemars(description = "Activity name")]
    pub name: String,
    #[schemars(description = "Hex color (e.g. #3498db)")]
    #[serde(default = "default_activity_color")]
    pub color: String,
    #[schemars(description = "Folder ID to create activity in")]
    pub folder_id: String,
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EditActivityRequest {
    #[schemars(description = "Activity ID to edit")]
    pub activity_id: String,
    #[schemars(description = "New name")]
    pub name: Option<String>,
    #[schemars(description = "New hex color")]
    pub color: Option<String>,
}

// ============================================================================
// Tracking
// ============================================================================

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct StartTrackingRequest {
    #[schemars(description = "Activity ID to track")]
    pub activity_id: String,
    #[schemars(description = "Start time (ISO 8601). Defaults to now.")]
    pub started_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct StopTrackingRequest {
    #[schemars(description = "Stop time (ISO 8601). Defaults to now.")]
    pub stopped_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EditTrackingRequest {
    #[schemars(
        description = "Note text (use <{{|t|ID|}}> for tags, <{{|m|ID|}}> for mentions)"
    )]
    pub note: Option<String>,
    #[schemars(description = "Change activity")]
    pub activity_id: Option<String>,
    #[schemars(description = "Change start time (ISO 8601)")]
    pub started_at: Option<String>,
}

// ============================================================================
// Time entries
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TimeRangeRequest {
    #[schemars(description = "Start date (ISO 8601 or YYYY-MM-DD). Defaults to 7 days ago.")]
    pub start: Option<String>,
    #[schemars(description = "End date (ISO 8601 or YYYY-MM-DD). Defaults to end of today.")]
    pub end: Option<String>,
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TimeEntryIdRequest {
    #[schemars(description = "Time entry ID")]
    pub time_entry_id: String,
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateTimeEntryRequest {
    #[schemars(description = "Activity ID")]
    pub activity_id: String,
    #[schemars(description = "Start time (ISO 8601)")]
    pub started_at: String,
    #[schemars(description = "Stop time (ISO 8601)")]
    pub stopped_at: String,
    #[schemars(description = "Note text")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EditTimeEntryRequest {
    #[schemars(description = "Time entry ID to edit")]
    pub time_entry_id: String,
    #[schemars(description = "New activity ID")]
    pub activity_id: Option<String>,
    #[schemars(description = "New start time (ISO 8601)")]
    pub started_at: Option<String>,
    #[schemars(description = "New stop time (ISO 8601)")]
    pub stopped_at: Option<String>,
    #[schemars(description = "New note text (empty string removes the note)")]
    pub note: Option<String>,
}

// ============================================================================
// Folders
// ============================================================================

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FolderIdRequest {
    #[schemars(description = "Folder ID")]
    pub folder_id: String,
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateFolderRequest {
    #[schemars(description = "Folder name")]
    pub name: String,
    #[schemars(description = "Whether this is a workspace folder (default: true)")]
    #[serde(default = "default_true")]
    pub is_workspace_folder: bool,
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EditFolderRequest {
    #[schemars(description = "Folder ID to edit")]
    pub folder_id: String,
    #[schemars(description = "New folder name")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FolderMemberRequest {
    #[schemars(description = "Folder ID")]
    pub folder_id: String,
    #[schemars(description = "User ID")]
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AddFolderMemberRequest {
    #[schemars(description = "Folder ID")]
    pub folder_id: String,
    #[schemars(description = "Member email address")]
    pub email: String,
    #[schemars(description = "Access level: full or personal (default: personal)")]
    #[serde(default)]
    pub access_level: AccessLevel,
}

// ============================================================================
// Tags & mentions
// ============================================================================

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateTagRequest {
    #[schemars(description = "Tag label (displayed name)")]
    pub label: String,
    #[schemars(description = "Folder ID")]
    pub folder_id: String,
    #[schemars(description = "Unique key (auto-generated if not provided)")]
    pub key: Option<String>,
    #[schemars(description = "Scope (default: timeular)")]
    #[serde(default = "default_scope")]
    pub scope: String,
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateTagRequest {
    #[schemars(description = "Tag ID to update")]
    pub tag_id: i64,
    #[schemars(description = "New label")]
    pub label: String,
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TagIdRequest {
    #[schemars(description = "Tag ID")]
    pub tag_id: i64,
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateMentionRequest {
    #[schemars(description = "Mention label (displayed name)")]
    pub label: String,
    #[schemars(description = "Folder ID")]
    pub folder_id: String,
    #[schemars(description = "Unique key (auto-generated if not provided)")]
    pub key: Option<String>,
    #[schemars(description = "Scope (default: timeular)")]
    #[serde(default = "default_scope")]
    pub scope: String,
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateMentionRequest {
    #[schemars(description = "Mention ID to update")]
    pub mention_id: i64,
    #[schemars(description = "New label")]
    pub label: String,
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct MentionIdRequest {
    #[schemars(description = "Mention ID")]
    pub mention_id: i64,
}

// ============================================================================
// Leaves
// ============================================================================

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateLeaveRequest {
    #[schemars(description = "Leave type ID")]
    pub type_id: String,
    #[schemars(description = "Start date (ISO 8601)")]
    pub start_date: String,
    #[schemars(description = "End date (ISO 8601)")]
    pub end_date: String,
    #[schemars(description = "Optional note")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateLeaveForUserRequest {
    #[schemars(description = "User ID")]
    pub user_id: String,
    #[schemars(description = "Leave type ID")]
    pub type_id: String,
    #[schemars(description = "Start date (ISO 8601)")]
    pub start_date: String,
    #[schemars(description = "End date (ISO 8601)")]
    pub end_date: String,
    #[schemars(description = "Optional note")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LeaveIdRequest {
    #[schemars(description = "Leave ID")]
    pub leave_id: String,
}

// ============================================================================
// Webhooks
// ============================================================================

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct WebhookSubscribeRequest {
    #[schemars(description = "Event to subscribe to (see early_list_webhook_events)")]
    pub event: String,
    #[schemars(description = "HTTPS URL to receive webhook")]
    pub target_url: String,
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct WebhookIdRequest {
    #[schemars(description = "Webhook subscription ID")]
    pub subscription_id: String,
}

// ============================================================================
// Reports
// ============================================================================

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ReportRequest {
    #[schemars(description = "Start date (YYYY-MM-DD)")]
    pub start_date: String,
    #[schemars(description = "End date (YYYY-MM-DD)")]
    pub end_date: String,
    #[schemars(description = "Filter by activity IDs")]
    pub activity_ids: Option<Vec<String>>,
    #[schemars(description = "Filter by folder IDs")]
    pub folder_ids: Option<Vec<String>>,
    #[schemars(description = "Filter by user IDs")]
    pub user_ids: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_applied() {
        let req: CreateActivityRequest =
            serde_json::from_value(json!({"name": "Deep work", "folder_id": "f1"})).unwrap();
        assert_eq!(req.color, "#3498db");

        let req: CreateFolderRequest = serde_json::from_value(json!({"name": "Clients"})).unwrap();
        assert!(req.is_workspace_folder);

        let req: AddFolderMemberRequest =
            serde_json::from_value(json!({"folder_id": "f1", "email": "a@b.test"})).unwrap();
        assert_eq!(req.access_level, AccessLevel::Personal);

        let req: CreateTagRequest =
            serde_json::from_value(json!({"label": "billable", "folder_id": "f1"})).unwrap();
        assert_eq!(req.scope, "timeular");
        assert!(req.key.is_none());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<ActivityIdRequest, _> =
            serde_json::from_value(json!({"activity_id": "a1", "extra": true}));
        assert!(result.is_err());
    }

    #[test]
    fn test_required_fields_enforced() {
        let result: Result<StartTrackingRequest, _> = serde_json::from_value(json!({}));
        assert!(result.is_err());
    }

    #[test]
    fn test_access_level_parsing() {
        let req: AddFolderMemberRequest = serde_json::from_value(
            json!({"folder_id": "f1", "email": "a@b.test", "access_level": "full"}),
        )
        .unwrap();
        assert_eq!(req.access_level.to_string(), "full");

        let bad: Result<AddFolderMemberRequest, _> = serde_json::from_value(
            json!({"folder_id": "f1", "email": "a@b.test", "access_level": "admin"}),
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_tag_ids_are_integers() {
        let req: TagIdRequest = serde_json::from_value(json!({"tag_id": 42})).unwrap();
        assert_eq!(req.tag_id, 42);
        assert!(serde_json::from_value::<TagIdRequest>(json!({"tag_id": "x"})).is_err());
    }
}
