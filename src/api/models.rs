// src/api/models.rs
// Typed views of Early API payloads. Every field is optional or defaulted:
// renderers print a placeholder rather than failing on a sparse response.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;

/// Placeholder shown when the API omits a field
pub const UNKNOWN: &str = "?";

/// Decode a response payload. `NoContent` arrives as `Null` and yields the
/// type's default; a payload of the wrong shape is an `InvalidResponse`.
pub fn decode<T: DeserializeOwned + Default>(value: Value) -> Result<T, ApiError> {
    if value.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(value)
        .map_err(|e| ApiError::invalid_response(format!("unexpected response shape: {}", e)))
}

/// Borrow an optional string field, falling back to `?`
pub fn or_unknown(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or(UNKNOWN)
}

/// Early uses string ids for most resources and integers for tags and
/// mentions; both are normalized to strings.
fn flexible_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    }))
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    #[serde(deserialize_with = "flexible_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserList {
    pub users: Vec<User>,
}

// ============================================================================
// Activities
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Activity {
    #[serde(deserialize_with = "flexible_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub color: Option<String>,
    #[serde(deserialize_with = "flexible_id")]
    pub folder_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityList {
    pub activities: Vec<Activity>,
    pub inactive_activities: Vec<Activity>,
    pub archived_activities: Vec<Activity>,
}

// ============================================================================
// Time entries and tracking
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Note {
    pub text: Option<String>,
}

impl Note {
    /// Note text, `None` when absent or blank
    pub fn text_of(note: &Option<Note>) -> Option<&str> {
        note.as_ref()
            .and_then(|n| n.text.as_deref())
            .filter(|t| !t.is_empty())
    }
}

/// Start/stop pair as sent by the API (`duration` object on time entries)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Span {
    pub started_at: Option<String>,
    pub stopped_at: Option<String>,
}

impl Span {
    pub fn started(&self) -> &str {
        self.started_at.as_deref().unwrap_or_default()
    }

    pub fn stopped(&self) -> &str {
        self.stopped_at.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeEntry {
    #[serde(deserialize_with = "flexible_id")]
    pub id: Option<String>,
    pub activity: Activity,
    pub duration: Span,
    pub note: Option<Note>,
}

impl TimeEntry {
    /// Activity name used as the aggregation label
    pub fn activity_label(&self) -> String {
        self.activity
            .name
            .clone()
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeEntryList {
    pub time_entries: Vec<TimeEntry>,
}

/// The running timer
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tracking {
    #[serde(deserialize_with = "flexible_id")]
    pub id: Option<String>,
    pub activity: Option<Activity>,
    pub started_at: Option<String>,
    pub note: Option<Note>,
}

impl Tracking {
    /// Interpret a `GET /tracking` payload. The API either wraps the timer
    /// as `{"currentTracking": ...}` or returns it bare; a null wrapper, an
    /// empty body, or an object without an activity all mean "not tracking".
    pub fn from_response(value: Value) -> Result<Option<Tracking>, ApiError> {
        let inner = match value {
            Value::Object(mut map) if map.contains_key("currentTracking") => {
                map.remove("currentTracking").unwrap_or(Value::Null)
            }
            other => other,
        };

        let tracking: Tracking = decode(inner)?;
        Ok(tracking.activity.is_some().then_some(tracking))
    }
}

// ============================================================================
// Folders and members
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Member {
    #[serde(deserialize_with = "flexible_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub access_level: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Folder {
    #[serde(deserialize_with = "flexible_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub members: Vec<Member>,
    pub retired_members: Vec<Member>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FolderList {
    pub folders: Vec<Folder>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemberList {
    pub members: Vec<Member>,
    pub retired_members: Vec<Member>,
}

// ============================================================================
// Tags and mentions
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tag {
    #[serde(deserialize_with = "flexible_id")]
    pub id: Option<String>,
    pub key: Option<String>,
    pub label: Option<String>,
    pub scope: Option<String>,
    #[serde(deserialize_with = "flexible_id")]
    pub folder_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TagsAndMentions {
    pub tags: Vec<Tag>,
    pub mentions: Vec<Tag>,
}

// ============================================================================
// Generic results
// ============================================================================

/// Any created/updated object where only identity and a few display fields
/// matter (activities, folders, leaves, tags, subscriptions)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Resource {
    #[serde(deserialize_with = "flexible_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub label: Option<String>,
    pub status: Option<String>,
    pub activity: Option<Activity>,
}

/// Deletion result listing time entries that referenced the removed item
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Affected {
    pub time_entry_ids: Vec<Value>,
}

// ============================================================================
// Webhooks
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WebhookEvents {
    pub events: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WebhookSubscription {
    #[serde(deserialize_with = "flexible_id")]
    pub id: Option<String>,
    pub event: Option<String>,
    #[serde(alias = "targetUrl")]
    pub target_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WebhookSubscriptions {
    pub subscriptions: Vec<WebhookSubscription>,
}
