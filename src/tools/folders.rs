// src/tools/folders.rs
// Folders and folder membership

use serde_json::json;

use super::Operation;
use crate::api::models::{Folder, FolderList, Member, MemberList, Resource, decode, or_unknown};
use crate::api::{ApiClient, RequestSpec, segment};
use crate::mcp::requests::{
    AddFolderMemberRequest, CreateFolderRequest, EditFolderRequest, FolderIdRequest,
    FolderMemberRequest,
};

/// Placeholder id the API returns for an invitation that hasn't been accepted
const PENDING_MEMBER_ID: &str = "pending";

fn folder_path(folder_id: &str) -> String {
    format!("/folders/{}", segment(folder_id))
}

fn member_line(m: &Member) -> String {
    format!(
        "- **{}** ({}) - {} (ID: {})",
        or_unknown(&m.name),
        or_unknown(&m.email),
        or_unknown(&m.access_level),
        or_unknown(&m.id)
    )
}

fn render_folder_list(list: FolderList) -> String {
    if list.folders.is_empty() {
        return "No folders found.".to_string();
    }

    let mut lines = vec!["## Folders".to_string()];
    for f in &list.folders {
        lines.push(format!(
            "- **{}** (ID: {}, Status: {})",
            or_unknown(&f.name),
            or_unknown(&f.id),
            or_unknown(&f.status)
        ));
        let members: Vec<&str> = f.members.iter().map(|m| or_unknown(&m.name)).collect();
        if !members.is_empty() {
            lines.push(format!("  Members: {}", members.join(", ")));
        }
    }
    lines.join("\n")
}

fn render_folder(folder: Folder) -> String {
    let mut lines = vec![
        format!("## Folder: {}", or_unknown(&folder.name)),
        format!("**ID:** {}", or_unknown(&folder.id)),
        format!("**Status:** {}", or_unknown(&folder.status)),
        String::new(),
        "### Members".to_string(),
    ];
    for m in &folder.members {
        lines.push(format!(
            "- {} ({}) - {}",
            or_unknown(&m.name),
            or_unknown(&m.email),
            or_unknown(&m.access_level)
        ));
    }
    if !folder.retired_members.is_empty() {
        lines.push("\n### Retired Members".to_string());
        for m in &folder.retired_members {
            lines.push(format!("- {}", or_unknown(&m.name)));
        }
    }
    lines.join("\n")
}

fn render_member_list(list: MemberList) -> String {
    if list.members.is_empty() && list.retired_members.is_empty() {
        return "No members found.".to_string();
    }

    let mut lines = vec!["## Folder Members".to_string()];
    lines.extend(list.members.iter().map(member_line));
    if !list.retired_members.is_empty() {
        lines.push("\n## Retired Members".to_string());
        for m in &list.retired_members {
            lines.push(format!("- {} (ID: {})", or_unknown(&m.name), or_unknown(&m.id)));
        }
    }
    lines.join("\n")
}

const LIST_FOLDERS: Operation<()> = Operation {
    name: "list_folders",
    request: |_| RequestSpec::get("/folders"),
    render: |_, value| Ok(render_folder_list(decode(value)?)),
    not_found: None,
};

const GET_FOLDER: Operation<FolderIdRequest> = Operation {
    name: "get_folder",
    request: |p| RequestSpec::get(folder_path(&p.folder_id)),
    render: |_, value| Ok(render_folder(decode(value)?)),
    not_found: None,
};

const CREATE_FOLDER: Operation<CreateFolderRequest> = Operation {
    name: "create_folder",
    request: |p| {
        let mut body = json!({"name": p.name});
        // Workspace folders are the API default; only the opt-out is sent
        if !p.is_workspace_folder {
            body["isWorkspaceFolder"] = json!(false);
        }
        RequestSpec::post("/folders", body)
    },
    render: |p, value| {
        let created: Resource = decode(value)?;
        Ok(format!("Created folder: {} (ID: {})", p.name, or_unknown(&created.id)))
    },
    not_found: None,
};

const EDIT_FOLDER: Operation<EditFolderRequest> = Operation {
    name: "edit_folder",
    request: |p| RequestSpec::patch(folder_path(&p.folder_id), json!({"name": p.name})),
    render: |p, value| {
        let updated: Resource = decode(value)?;
        Ok(format!(
            "Updated folder {}: {}",
            p.folder_id,
            or_unknown(&updated.name)
        ))
    },
    not_found: None,
};

const ARCHIVE_FOLDER: Operation<FolderIdRequest> = Operation {
    name: "archive_folder",
    request: |p| RequestSpec::post_empty(format!("{}/archive", folder_path(&p.folder_id))),
    render: |p, value| {
        let folder: Resource = decode(value)?;
        Ok(format!(
            "Archived folder: {}",
            folder.name.as_deref().unwrap_or(&p.folder_id)
        ))
    },
    not_found: None,
};

const UNARCHIVE_FOLDER: Operation<FolderIdRequest> = Operation {
    name: "unarchive_folder",
    request: |p| RequestSpec::post_empty(format!("{}/unarchive", folder_path(&p.folder_id))),
    render: |p, value| {
        let folder: Resource = decode(value)?;
        Ok(format!(
            "Unarchived folder: {}",
            folder.name.as_deref().unwrap_or(&p.folder_id)
        ))
    },
    not_found: None,
};

const LIST_FOLDER_MEMBERS: Operation<FolderIdRequest> = Operation {
    name: "list_folder_members",
    request: |p| RequestSpec::get(format!("{}/members", folder_path(&p.folder_id))),
    render: |_, value| Ok(render_member_list(decode(value)?)),
    not_found: None,
};

const GET_FOLDER_MEMBER: Operation<FolderMemberRequest> = Operation {
    name: "get_folder_member",
    request: |p| {
        RequestSpec::get(format!(
            "{}/members/{}",
            folder_path(&p.folder_id),
            segment(&p.user_id)
        ))
    },
    render: |_, value| {
        let m: Member = decode(value)?;
        Ok(format!(
            "**{}** ({})\nAccess Level: {}\nID: {}",
            or_unknown(&m.name),
            or_unknown(&m.email),
            or_unknown(&m.access_level),
            or_unknown(&m.id)
        ))
    },
    not_found: None,
};

const ADD_FOLDER_MEMBER: Operation<AddFolderMemberRequest> = Operation {
    name: "add_folder_member",
    request: |p| {
        RequestSpec::post(
            format!("{}/members", folder_path(&p.folder_id)),
            json!({"email": p.email, "accessLevel": p.access_level.as_str()}),
        )
    },
    render: |p, value| {
        let member: Resource = decode(value)?;
        let outcome = if member.id.as_deref() == Some(PENDING_MEMBER_ID) {
            "invited"
        } else {
            "added"
        };
        Ok(format!(
            "Member {}: {} with {} access",
            outcome, p.email, p.access_level
        ))
    },
    not_found: None,
};

const REMOVE_FOLDER_MEMBER: Operation<FolderMemberRequest> = Operation {
    name: "remove_folder_member",
    request: |p| {
        RequestSpec::delete(format!(
            "{}/members/{}",
            folder_path(&p.folder_id),
            segment(&p.user_id)
        ))
    },
    render: |p, _| {
        Ok(format!(
            "Removed user {} from folder {}.",
            p.user_id, p.folder_id
        ))
    },
    not_found: None,
};

pub async fn list_folders(api: &ApiClient) -> Result<String, String> {
    LIST_FOLDERS.run(api, &()).await
}

pub async fn get_folder(api: &ApiClient, req: FolderIdRequest) -> Result<String, String> {
    GET_FOLDER.run(api, &req).await
}

pub async fn create_folder(api: &ApiClient, req: CreateFolderRequest) -> Result<String, String> {
    CREATE_FOLDER.run(api, &req).await
}

pub async fn edit_folder(api: &ApiClient, req: EditFolderRequest) -> Result<String, String> {
    EDIT_FOLDER.run(api, &req).await
}

/// Archiving a folder also archives its activities, tags and mentions
pub async fn archive_folder(api: &ApiClient, req: FolderIdRequest) -> Result<String, String> {
    ARCHIVE_FOLDER.run(api, &req).await
}

pub async fn unarchive_folder(api: &ApiClient, req: FolderIdRequest) -> Result<String, String> {
    UNARCHIVE_FOLDER.run(api, &req).await
}

pub async fn list_folder_members(api: &ApiClient, req: FolderIdRequest) -> Result<String, String> {
    LIST_FOLDER_MEMBERS.run(api, &req).await
}

pub async fn get_folder_member(api: &ApiClient, req: FolderMemberRequest) -> Result<String, String> {
    GET_FOLDER_MEMBER.run(api, &req).await
}

/// Add by email; unknown addresses receive an invitation instead
pub async fn add_folder_member(
    api: &ApiClient,
    req: AddFolderMemberRequest,
) -> Result<String, String> {
    ADD_FOLDER_MEMBER.run(api, &req).await
}

pub async fn remove_folder_member(
    api: &ApiClient,
    req: FolderMemberRequest,
) -> Result<String, String> {
    REMOVE_FOLDER_MEMBER.run(api, &req).await
}
