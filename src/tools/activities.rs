// src/tools/activities.rs
// Activity management

use serde_json::{Map, Value, json};

use super::{Operation, put_non_empty};
use crate::api::models::{Activity, ActivityList, Resource, decode, or_unknown};
use crate::api::{ApiClient, RequestSpec, segment};
use crate::mcp::requests::{ActivityIdRequest, CreateActivityRequest, EditActivityRequest};

fn render_activity_list(list: ActivityList) -> String {
    let mut lines = vec!["## Active Activities".to_string()];
    if list.activities.is_empty() {
        lines.push("(none)".to_string());
    }
    for a in &list.activities {
        lines.push(format!(
            "- **{}** (ID: {}, Folder: {})",
            or_unknown(&a.name),
            or_unknown(&a.id),
            or_unknown(&a.folder_id)
        ));
    }

    let sections: [(&str, &Vec<Activity>); 2] = [
        ("Inactive Activities", &list.inactive_activities),
        ("Archived Activities", &list.archived_activities),
    ];
    for (title, activities) in sections {
        if activities.is_empty() {
            continue;
        }
        lines.push(format!("\n## {}", title));
        for a in activities {
            lines.push(format!("- {} (ID: {})", or_unknown(&a.name), or_unknown(&a.id)));
        }
    }

    lines.join("\n")
}

const LIST_ACTIVITIES: Operation<()> = Operation {
    name: "list_activities",
    request: |_| RequestSpec::get("/activities"),
    render: |_, value| Ok(render_activity_list(decode(value)?)),
    not_found: None,
};

const CREATE_ACTIVITY: Operation<CreateActivityRequest> = Operation {
    name: "create_activity",
    request: |p| {
        RequestSpec::post(
            "/activities",
            json!({"name": p.name, "color": p.color, "folderId": p.folder_id}),
        )
    },
    render: |p, value| {
        let created: Resource = decode(value)?;
        Ok(format!("Created activity: {} (ID: {})", p.name, or_unknown(&created.id)))
    },
    not_found: None,
};

const EDIT_ACTIVITY: Operation<EditActivityRequest> = Operation {
    name: "edit_activity",
    request: |p| {
        let mut body = Map::new();
        put_non_empty(&mut body, "name", &p.name);
        put_non_empty(&mut body, "color", &p.color);
        RequestSpec::patch(
            format!("/activities/{}", segment(&p.activity_id)),
            Value::Object(body),
        )
    },
    render: |p, value| {
        let updated: Resource = decode(value)?;
        Ok(format!(
            "Updated activity {}: {}",
            p.activity_id,
            or_unknown(&updated.name)
        ))
    },
    not_found: None,
};

const ARCHIVE_ACTIVITY: Operation<ActivityIdRequest> = Operation {
    name: "archive_activity",
    request: |p| RequestSpec::delete(format!("/activities/{}", segment(&p.activity_id))),
    render: |p, _| Ok(format!("Archived activity {}.", p.activity_id)),
    not_found: None,
};

const UNARCHIVE_ACTIVITY: Operation<ActivityIdRequest> = Operation {
    name: "unarchive_activity",
    request: |p| {
        RequestSpec::post_empty(format!("/activities/{}/unarchive", segment(&p.activity_id)))
    },
    render: |p, value| {
        let restored: Resource = decode(value)?;
        Ok(format!(
            "Unarchived activity: {}",
            restored.name.as_deref().unwrap_or(&p.activity_id)
        ))
    },
    not_found: None,
};

/// Active, inactive and archived activities
pub async fn list_activities(api: &ApiClient) -> Result<String, String> {
    LIST_ACTIVITIES.run(api, &()).await
}

pub async fn create_activity(api: &ApiClient, req: CreateActivityRequest) -> Result<String, String> {
    CREATE_ACTIVITY.run(api, &req).await
}

/// Rename and/or recolor; blank fields are left unchanged
pub async fn edit_activity(api: &ApiClient, req: EditActivityRequest) -> Result<String, String> {
    EDIT_ACTIVITY.run(api, &req).await
}

pub async fn archive_activity(api: &ApiClient, req: ActivityIdRequest) -> Result<String, String> {
    ARCHIVE_ACTIVITY.run(api, &req).await
}

pub async fn unarchive_activity(api: &ApiClient, req: ActivityIdRequest) -> Result<String, String> {
    UNARCHIVE_ACTIVITY.run(api, &req).await
}
