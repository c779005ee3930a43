// src/cli/tool.rs
// Direct tool execution from the command line

use anyhow::Result;
use serde::de::DeserializeOwned;

use super::serve::{build_client, load_checked_config};
use crate::api::ApiClient;
use crate::error::EarlyError;
use crate::mcp::requests::{
    ActivityIdRequest, AddFolderMemberRequest, CreateActivityRequest, CreateFolderRequest,
    CreateLeaveForUserRequest, CreateLeaveRequest, CreateMentionRequest, CreateTagRequest,
    CreateTimeEntryRequest, EditActivityRequest, EditFolderRequest, EditTimeEntryRequest,
    EditTrackingRequest, FolderIdRequest, FolderMemberRequest, LeaveIdRequest, MentionIdRequest,
    ReportRequest, StartTrackingRequest, StopTrackingRequest, TagIdRequest, TimeEntryIdRequest,
    TimeRangeRequest, UpdateMentionRequest, UpdateTagRequest, WebhookIdRequest,
    WebhookSubscribeRequest,
};
use crate::tools;

fn parse<T: DeserializeOwned>(args: &str) -> crate::error::Result<T> {
    Ok(serde_json::from_str(args)?)
}

/// Tools without parameters accept `{}` or nothing at all
fn no_args(args: &str) -> crate::error::Result<()> {
    let value: serde_json::Value = parse(args)?;
    match value {
        serde_json::Value::Null => Ok(()),
        serde_json::Value::Object(map) if map.is_empty() => Ok(()),
        other => Err(EarlyError::InvalidInput(format!(
            "this tool takes no arguments, got {}",
            other
        ))),
    }
}

/// Route one tool call by its MCP name.
///
/// The outer error covers the invocation itself (unknown tool, bad JSON);
/// the inner result is the tool's own outcome.
pub async fn dispatch(
    api: &ApiClient,
    name: &str,
    args: &str,
) -> crate::error::Result<std::result::Result<String, String>> {
    let res = match name {
        "early_get_me" => {
            no_args(args)?;
            tools::get_me(api).await
        }
        "early_list_users" => {
            no_args(args)?;
            tools::list_users(api).await
        }
        "early_list_activities" => {
            no_args(args)?;
            tools::list_activities(api).await
        }
        "early_create_activity" => {
            let req: CreateActivityRequest = parse(args)?;
            tools::create_activity(api, req).await
        }
        "early_edit_activity" => {
            let req: EditActivityRequest = parse(args)?;
            tools::edit_activity(api, req).await
        }
        "early_archive_activity" => {
            let req: ActivityIdRequest = parse(args)?;
            tools::archive_activity(api, req).await
        }
        "early_unarchive_activity" => {
            let req: ActivityIdRequest = parse(args)?;
            tools::unarchive_activity(api, req).await
        }
        "early_get_tracking" => {
            no_args(args)?;
            tools::get_tracking(api).await
        }
        "early_start_tracking" => {
            let req: StartTrackingRequest = parse(args)?;
            tools::start_tracking(api, req).await
        }
        "early_stop_tracking" => {
            let req: StopTrackingRequest = parse(args)?;
            tools::stop_tracking(api, req).await
        }
        "early_edit_tracking" => {
            let req: EditTrackingRequest = parse(args)?;
            tools::edit_tracking(api, req).await
        }
        "early_cancel_tracking" => {
            no_args(args)?;
            tools::cancel_tracking(api).await
        }
        "early_list_time_entries" => {
            let req: TimeRangeRequest = parse(args)?;
            tools::list_time_entries(api, req).await
        }
        "early_get_time_entry" => {
            let req: TimeEntryIdRequest = parse(args)?;
            tools::get_time_entry(api, req).await
        }
        "early_create_time_entry" => {
            let req: CreateTimeEntryRequest = parse(args)?;
            tools::create_time_entry(api, req).await
        }
        "early_edit_time_entry" => {
            let req: EditTimeEntryRequest = parse(args)?;
            tools::edit_time_entry(api, req).await
        }
        "early_delete_time_entry" => {
            let req: TimeEntryIdRequest = parse(args)?;
            tools::delete_time_entry(api, req).await
        }
        "early_list_folders" => {
            no_args(args)?;
            tools::list_folders(api).await
        }
        "early_get_folder" => {
            let req: FolderIdRequest = parse(args)?;
            tools::get_folder(api, req).await
        }
        "early_create_folder" => {
            let req: CreateFolderRequest = parse(args)?;
            tools::create_folder(api, req).await
        }
        "early_edit_folder" => {
            let req: EditFolderRequest = parse(args)?;
            tools::edit_folder(api, req).await
        }
        "early_archive_folder" => {
            let req: FolderIdRequest = parse(args)?;
            tools::archive_folder(api, req).await
        }
        "early_unarchive_folder" => {
            let req: FolderIdRequest = parse(args)?;
            tools::unarchive_folder(api, req).await
        }
        "early_list_folder_members" => {
            let req: FolderIdRequest = parse(args)?;
            tools::list_folder_members(api, req).await
        }
        "early_get_folder_member" => {
            let req: FolderMemberRequest = parse(args)?;
            tools::get_folder_member(api, req).await
        }
        "early_add_folder_member" => {
            let req: AddFolderMemberRequest = parse(args)?;
            tools::add_folder_member(api, req).await
        }
        "early_remove_folder_member" => {
            let req: FolderMemberRequest = parse(args)?;
            tools::remove_folder_member(api, req).await
        }
        "early_list_tags" => {
            no_args(args)?;
            tools::list_tags(api).await
        }
        "early_create_tag" => {
            let req: CreateTagRequest = parse(args)?;
            tools::create_tag(api, req).await
        }
        "early_update_tag" => {
            let req: UpdateTagRequest = parse(args)?;
            tools::update_tag(api, req).await
        }
        "early_delete_tag" => {
            let req: TagIdRequest = parse(args)?;
            tools::delete_tag(api, req).await
        }
        "early_create_mention" => {
            let req: CreateMentionRequest = parse(args)?;
            tools::create_mention(api, req).await
        }
        "early_update_mention" => {
            let req: UpdateMentionRequest = parse(args)?;
            tools::update_mention(api, req).await
        }
        "early_delete_mention" => {
            let req: MentionIdRequest = parse(args)?;
            tools::delete_mention(api, req).await
        }
        "early_create_leave" => {
            let req: CreateLeaveRequest = parse(args)?;
            tools::create_leave(api, req).await
        }
        "early_create_leave_for_user" => {
            let req: CreateLeaveForUserRequest = parse(args)?;
            tools::create_leave_for_user(api, req).await
        }
        "early_approve_leave" => {
            let req: LeaveIdRequest = parse(args)?;
            tools::approve_leave(api, req).await
        }
        "early_deny_leave" => {
            let req: LeaveIdRequest = parse(args)?;
            tools::deny_leave(api, req).await
        }
        "early_delete_leave" => {
            let req: LeaveIdRequest = parse(args)?;
            tools::delete_leave(api, req).await
        }
        "early_list_webhook_events" => {
            no_args(args)?;
            tools::list_webhook_events(api).await
        }
        "early_list_webhook_subscriptions" => {
            no_args(args)?;
            tools::list_webhook_subscriptions(api).await
        }
        "early_subscribe_webhook" => {
            let req: WebhookSubscribeRequest = parse(args)?;
            tools::subscribe_webhook(api, req).await
        }
        "early_unsubscribe_webhook" => {
            let req: WebhookIdRequest = parse(args)?;
            tools::unsubscribe_webhook(api, req).await
        }
        "early_unsubscribe_all_webhooks" => {
            no_args(args)?;
            tools::unsubscribe_all_webhooks(api).await
        }
        "early_generate_report" => {
            let req: ReportRequest = parse(args)?;
            tools::generate_report(api, req).await
        }
        "early_today_summary" => {
            no_args(args)?;
            tools::today_summary(api).await
        }
        _ => return Err(EarlyError::UnknownTool(name.to_string())),
    };
    Ok(res)
}

/// Execute a tool directly from the command line
pub async fn run_tool(name: String, args: String) -> Result<()> {
    let config = load_checked_config()?;
    let api = build_client(&config);

    match dispatch(&api, &name, &args).await? {
        Ok(output) => println!("{}", output),
        Err(e) => eprintln!("{}", e),
    }
    Ok(())
}

/// Tool names the CLI dispatcher accepts
fn list_cli_tool_names() -> Vec<&'static str> {
    vec![
        "early_get_me",
        "early_list_users",
        "early_list_activities",
        "early_create_activity",
        "early_edit_activity",
        "early_archive_activity",
        "early_unarchive_activity",
        "early_get_tracking",
        "early_start_tracking",
        "early_stop_tracking",
        "early_edit_tracking",
        "early_cancel_tracking",
        "early_list_time_entries",
        "early_get_time_entry",
        "early_create_time_entry",
        "early_edit_time_entry",
        "early_delete_time_entry",
        "early_list_folders",
        "early_get_folder",
        "early_create_folder",
        "early_edit_folder",
        "early_archive_folder",
        "early_unarchive_folder",
        "early_list_folder_members",
        "early_get_folder_member",
        "early_add_folder_member",
        "early_remove_folder_member",
        "early_list_tags",
        "early_create_tag",
        "early_update_tag",
        "early_delete_tag",
        "early_create_mention",
        "early_update_mention",
        "early_delete_mention",
        "early_create_leave",
        "early_create_leave_for_user",
        "early_approve_leave",
        "early_deny_leave",
        "early_delete_leave",
        "early_list_webhook_events",
        "early_list_webhook_subscriptions",
        "early_subscribe_webhook",
        "early_unsubscribe_webhook",
        "early_unsubscribe_all_webhooks",
        "early_generate_report",
        "early_today_summary",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{self, MockTransport};
    use crate::mcp::TOOL_NAMES;
    use crate::tools::test_support::{client, path_of};
    use serde_json::json;
    use std::collections::HashSet;

    /// Catches drift between the CLI dispatcher and the MCP router
    #[test]
    fn test_cli_tools_match_mcp_tools() {
        let cli: HashSet<&str> = list_cli_tool_names().into_iter().collect();
        let mcp: HashSet<&str> = TOOL_NAMES.into_iter().collect();
        assert_eq!(cli, mcp);
    }

    #[tokio::test]
    async fn test_every_listed_tool_dispatches() {
        let transport = MockTransport::with_sign_in(|_| mock::raw(204, ""));
        let api = client(&transport);

        for name in list_cli_tool_names() {
            let outcome = dispatch(&api, name, "not json").await;
            assert!(
                !matches!(outcome, Err(EarlyError::UnknownTool(_))),
                "{} is listed but not routed",
                name
            );
        }
    }

    #[tokio::test]
    async fn test_dispatch_with_arguments() {
        let transport = MockTransport::with_sign_in(|_| {
            mock::json(200, json!({"id": "e1", "activity": {"name": "Coding"}}))
        });
        let api = client(&transport);

        let out = dispatch(&api, "early_get_time_entry", r#"{"time_entry_id": "e1"}"#)
            .await
            .unwrap();
        assert!(out.unwrap().starts_with("## Time Entry e1"));
        assert_eq!(path_of(&transport, 0), "/time-entries/e1");
    }

    #[tokio::test]
    async fn test_dispatch_rejects_bad_input() {
        let transport = MockTransport::with_sign_in(|_| mock::raw(204, ""));
        let api = client(&transport);

        let unknown = dispatch(&api, "early_nope", "{}").await;
        assert!(matches!(unknown, Err(EarlyError::UnknownTool(ref n)) if n == "early_nope"));

        let missing_field = dispatch(&api, "early_get_time_entry", "{}").await;
        assert!(matches!(missing_field, Err(EarlyError::Json(_))));

        let unexpected = dispatch(&api, "early_get_me", r#"{"x": 1}"#).await;
        assert!(matches!(unexpected, Err(EarlyError::InvalidInput(_))));

        assert_eq!(transport.calls(), 0);
    }
}
