// src/tools/tags.rs
// Tags (#label) and mentions (@label) used inside time entry notes

use serde_json::json;
use uuid::Uuid;

use super::Operation;
use crate::api::models::{Affected, Resource, Tag, TagsAndMentions, decode, or_unknown};
use crate::api::{ApiClient, RequestSpec};
use crate::mcp::requests::{
    CreateMentionRequest, CreateTagRequest, MentionIdRequest, TagIdRequest, UpdateMentionRequest,
    UpdateTagRequest,
};

fn label_line(sigil: char, item: &Tag) -> String {
    format!(
        "- {}{} (ID: {}, Folder: {})",
        sigil,
        or_unknown(&item.label),
        or_unknown(&item.id),
        or_unknown(&item.folder_id)
    )
}

fn render_tags(data: TagsAndMentions) -> String {
    if data.tags.is_empty() && data.mentions.is_empty() {
        return "No tags or mentions found.".to_string();
    }

    let mut lines = vec!["## Tags".to_string()];
    lines.extend(data.tags.iter().map(|t| label_line('#', t)));
    if !data.mentions.is_empty() {
        lines.push("\n## Mentions".to_string());
        lines.extend(data.mentions.iter().map(|m| label_line('@', m)));
    }
    lines.join("\n")
}

/// Body shared by tag and mention creation; the key is a fresh UUID unless given
fn create_body(label: &str, folder_id: &str, key: &Option<String>, scope: &str) -> serde_json::Value {
    let key = key
        .clone()
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    json!({"key": key, "label": label, "scope": scope, "folderId": folder_id})
}

/// "Deleted tag 3." plus the number of time entries that referenced it
fn deletion_message(kind: &str, id: i64, affected: Affected) -> String {
    let mut msg = format!("Deleted {} {}.", kind, id);
    if !affected.time_entry_ids.is_empty() {
        msg.push_str(&format!(
            " Affected {} time entries.",
            affected.time_entry_ids.len()
        ));
    }
    msg
}

const LIST_TAGS: Operation<()> = Operation {
    name: "list_tags",
    request: |_| RequestSpec::get("/tags-and-mentions"),
    render: |_, value| Ok(render_tags(decode(value)?)),
    not_found: None,
};

const CREATE_TAG: Operation<CreateTagRequest> = Operation {
    name: "create_tag",
    request: |p| RequestSpec::post("/tags", create_body(&p.label, &p.folder_id, &p.key, &p.scope)),
    render: |p, value| {
        let created: Resource = decode(value)?;
        Ok(format!("Created tag: #{} (ID: {})", p.label, or_unknown(&created.id)))
    },
    not_found: None,
};

const UPDATE_TAG: Operation<UpdateTagRequest> = Operation {
    name: "update_tag",
    request: |p| RequestSpec::patch(format!("/tags/{}", p.tag_id), json!({"label": p.label})),
    render: |p, value| {
        let updated: Resource = decode(value)?;
        Ok(format!("Updated tag {}: #{}", p.tag_id, or_unknown(&updated.label)))
    },
    not_found: None,
};

const DELETE_TAG: Operation<TagIdRequest> = Operation {
    name: "delete_tag",
    request: |p| RequestSpec::delete(format!("/tags/{}", p.tag_id)),
    render: |p, value| Ok(deletion_message("tag", p.tag_id, decode(value)?)),
    not_found: None,
};

const CREATE_MENTION: Operation<CreateMentionRequest> = Operation {
    name: "create_mention",
    request: |p| {
        RequestSpec::post("/mentions", create_body(&p.label, &p.folder_id, &p.key, &p.scope))
    },
    render: |p, value| {
        let created: Resource = decode(value)?;
        Ok(format!("Created mention: @{} (ID: {})", p.label, or_unknown(&created.id)))
    },
    not_found: None,
};

const UPDATE_MENTION: Operation<UpdateMentionRequest> = Operation {
    name: "update_mention",
    request: |p| {
        RequestSpec::patch(format!("/mentions/{}", p.mention_id), json!({"label": p.label}))
    },
    render: |p, value| {
        let updated: Resource = decode(value)?;
        Ok(format!(
            "Updated mention {}: @{}",
            p.mention_id,
            or_unknown(&updated.label)
        ))
    },
    not_found: None,
};

const DELETE_MENTION: Operation<MentionIdRequest> = Operation {
    name: "delete_mention",
    request: |p| RequestSpec::delete(format!("/mentions/{}", p.mention_id)),
    render: |p, value| Ok(deletion_message("mention", p.mention_id, decode(value)?)),
    not_found: None,
};

/// Tags and mentions across all folders
pub async fn list_tags(api: &ApiClient) -> Result<String, String> {
    LIST_TAGS.run(api, &()).await
}

pub async fn create_tag(api: &ApiClient, req: CreateTagRequest) -> Result<String, String> {
    CREATE_TAG.run(api, &req).await
}

pub async fn update_tag(api: &ApiClient, req: UpdateTagRequest) -> Result<String, String> {
    UPDATE_TAG.run(api, &req).await
}

pub async fn delete_tag(api: &ApiClient, req: TagIdRequest) -> Result<String, String> {
    DELETE_TAG.run(api, &req).await
}

pub async fn create_mention(api: &ApiClient, req: CreateMentionRequest) -> Result<String, String> {
    CREATE_MENTION.run(api, &req).await
}

pub async fn update_mention(api: &ApiClient, req: UpdateMentionRequest) -> Result<String, String> {
    UPDATE_MENTION.run(api, &req).await
}

pub async fn delete_mention(api: &ApiClient, req: MentionIdRequest) -> Result<String, String> {
    DELETE_MENTION.run(api, &req).await
}
