// src/mcp/mod.rs
// MCP server exposing the Early API as tools

pub mod requests;

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::tools;
use requests::{
    ActivityIdRequest, AddFolderMemberRequest, CreateActivityRequest, CreateFolderRequest,
    CreateLeaveForUserRequest, CreateLeaveRequest, CreateMentionRequest, CreateTagRequest,
    CreateTimeEntryRequest, EditActivityRequest, EditFolderRequest, EditTimeEntryRequest,
    EditTrackingRequest, FolderIdRequest, FolderMemberRequest, LeaveIdRequest, MentionIdRequest,
    ReportRequest, StartTrackingRequest, StopTrackingRequest, TagIdRequest, TimeEntryIdRequest,
    TimeRangeRequest, UpdateMentionRequest, UpdateTagRequest, WebhookIdRequest,
    WebhookSubscribeRequest,
};

/// Every tool name the server registers, in registration order
pub const TOOL_NAMES: [&str; 46] = [
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
];

/// MCP server state
#[derive(Clone)]
pub struct EarlyServer {
    api: Arc<ApiClient>,
    tool_router: ToolRouter<Self>,
}

impl EarlyServer {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            tool_router: Self::tool_router(),
        }
    }

    /// Run a tool body, logging its outcome and latency
    async fn traced<F>(&self, tool_name: &'static str, call: F) -> Result<String, String>
    where
        F: Future<Output = Result<String, String>>,
    {
        let start = Instant::now();
        let result = call.await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => debug!(tool = tool_name, duration_ms, "Tool succeeded"),
            Err(e) => warn!(tool = tool_name, duration_ms, error = %e, "Tool failed"),
        }
        result
    }
}

#[tool_router]
impl EarlyServer {
    // ========================================================================
    // Users
    // ========================================================================

    #[tool(
        name = "early_get_me",
        description = "Get current authenticated user info.",
        annotations(read_only_hint = true, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_get_me(&self) -> Result<String, String> {
        self.traced("early_get_me", tools::get_me(&self.api)).await
    }

    #[tool(
        name = "early_list_users",
        description = "List all team users.",
        annotations(read_only_hint = true, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_list_users(&self) -> Result<String, String> {
        self.traced("early_list_users", tools::list_users(&self.api)).await
    }

    // ========================================================================
    // Activities
    // ========================================================================

    #[tool(
        name = "early_list_activities",
        description = "List all activities (active, inactive, archived).",
        annotations(read_only_hint = true, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_list_activities(&self) -> Result<String, String> {
        self.traced("early_list_activities", tools::list_activities(&self.api)).await
    }

    #[tool(
        name = "early_create_activity",
        description = "Create a new activity.",
        annotations(read_only_hint = false, destructive_hint = false, idempotent_hint = false)
    )]
    async fn early_create_activity(
        &self,
        Parameters(req): Parameters<CreateActivityRequest>,
    ) -> Result<String, String> {
        self.traced("early_create_activity", tools::create_activity(&self.api, req)).await
    }

    #[tool(
        name = "early_edit_activity",
        description = "Edit an existing activity.",
        annotations(read_only_hint = false, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_edit_activity(
        &self,
        Parameters(req): Parameters<EditActivityRequest>,
    ) -> Result<String, String> {
        self.traced("early_edit_activity", tools::edit_activity(&self.api, req)).await
    }

    #[tool(
        name = "early_archive_activity",
        description = "Archive an activity.",
        annotations(read_only_hint = false, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_archive_activity(
        &self,
        Parameters(req): Parameters<ActivityIdRequest>,
    ) -> Result<String, String> {
        self.traced("early_archive_activity", tools::archive_activity(&self.api, req)).await
    }

    #[tool(
        name = "early_unarchive_activity",
        description = "Unarchive an activity.",
        annotations(read_only_hint = false, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_unarchive_activity(
        &self,
        Parameters(req): Parameters<ActivityIdRequest>,
    ) -> Result<String, String> {
        self.traced("early_unarchive_activity", tools::unarchive_activity(&self.api, req)).await
    }

    // ========================================================================
    // Tracking
    // ========================================================================

    #[tool(
        name = "early_get_tracking",
        description = "Get current active tracking (running timer).",
        annotations(read_only_hint = true, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_get_tracking(&self) -> Result<String, String> {
        self.traced("early_get_tracking", tools::get_tracking(&self.api)).await
    }

    #[tool(
        name = "early_start_tracking",
        description = "Start tracking time for an activity.",
        annotations(read_only_hint = false, destructive_hint = false, idempotent_hint = false)
    )]
    async fn early_start_tracking(
        &self,
        Parameters(req): Parameters<StartTrackingRequest>,
    ) -> Result<String, String> {
        self.traced("early_start_tracking", tools::start_tracking(&self.api, req)).await
    }

    #[tool(
        name = "early_stop_tracking",
        description = "Stop current tracking and create a time entry. Requires minimum 1 minute duration.",
        annotations(read_only_hint = false, destructive_hint = false, idempotent_hint = false)
    )]
    async fn early_stop_tracking(
        &self,
        Parameters(req): Parameters<StopTrackingRequest>,
    ) -> Result<String, String> {
        self.traced("early_stop_tracking", tools::stop_tracking(&self.api, req)).await
    }

    #[tool(
        name = "early_edit_tracking",
        description = "Edit the current tracking (note, activity, start time).",
        annotations(read_only_hint = false, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_edit_tracking(
        &self,
        Parameters(req): Parameters<EditTrackingRequest>,
    ) -> Result<String, String> {
        self.traced("early_edit_tracking", tools::edit_tracking(&self.api, req)).await
    }

    #[tool(
        name = "early_cancel_tracking",
        description = "Cancel current tracking without creating a time entry.",
        annotations(read_only_hint = false, destructive_hint = true, idempotent_hint = true)
    )]
    async fn early_cancel_tracking(&self) -> Result<String, String> {
        self.traced("early_cancel_tracking", tools::cancel_tracking(&self.api)).await
    }

    // ========================================================================
    // Time entries
    // ========================================================================

    #[tool(
        name = "early_list_time_entries",
        description = "List time entries in a date range. Defaults to the last 7 days.",
        annotations(read_only_hint = true, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_list_time_entries(
        &self,
        Parameters(req): Parameters<TimeRangeRequest>,
    ) -> Result<String, String> {
        self.traced("early_list_time_entries", tools::list_time_entries(&self.api, req)).await
    }

    #[tool(
        name = "early_get_time_entry",
        description = "Get a specific time entry by ID.",
        annotations(read_only_hint = true, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_get_time_entry(
        &self,
        Parameters(req): Parameters<TimeEntryIdRequest>,
    ) -> Result<String, String> {
        self.traced("early_get_time_entry", tools::get_time_entry(&self.api, req)).await
    }

    #[tool(
        name = "early_create_time_entry",
        description = "Create a new time entry. Minimum duration: 1 minute.",
        annotations(read_only_hint = false, destructive_hint = false, idempotent_hint = false)
    )]
    async fn early_create_time_entry(
        &self,
        Parameters(req): Parameters<CreateTimeEntryRequest>,
    ) -> Result<String, String> {
        self.traced("early_create_time_entry", tools::create_time_entry(&self.api, req)).await
    }

    #[tool(
        name = "early_edit_time_entry",
        description = "Edit an existing time entry.",
        annotations(read_only_hint = false, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_edit_time_entry(
        &self,
        Parameters(req): Parameters<EditTimeEntryRequest>,
    ) -> Result<String, String> {
        self.traced("early_edit_time_entry", tools::edit_time_entry(&self.api, req)).await
    }

    #[tool(
        name = "early_delete_time_entry",
        description = "Delete a time entry.",
        annotations(read_only_hint = false, destructive_hint = true, idempotent_hint = true)
    )]
    async fn early_delete_time_entry(
        &self,
        Parameters(req): Parameters<TimeEntryIdRequest>,
    ) -> Result<String, String> {
        self.traced("early_delete_time_entry", tools::delete_time_entry(&self.api, req)).await
    }

    // ========================================================================
    // Folders
    // ========================================================================

    #[tool(
        name = "early_list_folders",
        description = "List all folders.",
        annotations(read_only_hint = true, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_list_folders(&self) -> Result<String, String> {
        self.traced("early_list_folders", tools::list_folders(&self.api)).await
    }

    #[tool(
        name = "early_get_folder",
        description = "Get a specific folder by ID.",
        annotations(read_only_hint = true, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_get_folder(
        &self,
        Parameters(req): Parameters<FolderIdRequest>,
    ) -> Result<String, String> {
        self.traced("early_get_folder", tools::get_folder(&self.api, req)).await
    }

    #[tool(
        name = "early_create_folder",
        description = "Create a new folder.",
        annotations(read_only_hint = false, destructive_hint = false, idempotent_hint = false)
    )]
    async fn early_create_folder(
        &self,
        Parameters(req): Parameters<CreateFolderRequest>,
    ) -> Result<String, String> {
        self.traced("early_create_folder", tools::create_folder(&self.api, req)).await
    }

    #[tool(
        name = "early_edit_folder",
        description = "Edit a folder name.",
        annotations(read_only_hint = false, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_edit_folder(
        &self,
        Parameters(req): Parameters<EditFolderRequest>,
    ) -> Result<String, String> {
        self.traced("early_edit_folder", tools::edit_folder(&self.api, req)).await
    }

    #[tool(
        name = "early_archive_folder",
        description = "Archive a folder. All activities, tags, and mentions will be archived.",
        annotations(read_only_hint = false, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_archive_folder(
        &self,
        Parameters(req): Parameters<FolderIdRequest>,
    ) -> Result<String, String> {
        self.traced("early_archive_folder", tools::archive_folder(&self.api, req)).await
    }

    #[tool(
        name = "early_unarchive_folder",
        description = "Unarchive a folder. All activities, tags, and mentions will be unarchived.",
        annotations(read_only_hint = false, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_unarchive_folder(
        &self,
        Parameters(req): Parameters<FolderIdRequest>,
    ) -> Result<String, String> {
        self.traced("early_unarchive_folder", tools::unarchive_folder(&self.api, req)).await
    }

    #[tool(
        name = "early_list_folder_members",
        description = "List all members of a folder.",
        annotations(read_only_hint = true, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_list_folder_members(
        &self,
        Parameters(req): Parameters<FolderIdRequest>,
    ) -> Result<String, String> {
        self.traced("early_list_folder_members", tools::list_folder_members(&self.api, req)).await
    }

    #[tool(
        name = "early_get_folder_member",
        description = "Get a specific folder member.",
        annotations(read_only_hint = true, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_get_folder_member(
        &self,
        Parameters(req): Parameters<FolderMemberRequest>,
    ) -> Result<String, String> {
        self.traced("early_get_folder_member", tools::get_folder_member(&self.api, req)).await
    }

    #[tool(
        name = "early_add_folder_member",
        description = "Add a member to a folder by email.",
        annotations(read_only_hint = false, destructive_hint = false, idempotent_hint = false)
    )]
    async fn early_add_folder_member(
        &self,
        Parameters(req): Parameters<AddFolderMemberRequest>,
    ) -> Result<String, String> {
        self.traced("early_add_folder_member", tools::add_folder_member(&self.api, req)).await
    }

    #[tool(
        name = "early_remove_folder_member",
        description = "Remove a member from a folder.",
        annotations(read_only_hint = false, destructive_hint = true, idempotent_hint = true)
    )]
    async fn early_remove_folder_member(
        &self,
        Parameters(req): Parameters<FolderMemberRequest>,
    ) -> Result<String, String> {
        self.traced("early_remove_folder_member", tools::remove_folder_member(&self.api, req)).await
    }

    // ========================================================================
    // Tags and mentions
    // ========================================================================

    #[tool(
        name = "early_list_tags",
        description = "List all tags and mentions.",
        annotations(read_only_hint = true, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_list_tags(&self) -> Result<String, String> {
        self.traced("early_list_tags", tools::list_tags(&self.api)).await
    }

    #[tool(
        name = "early_create_tag",
        description = "Create a new tag.",
        annotations(read_only_hint = false, destructive_hint = false, idempotent_hint = false)
    )]
    async fn early_create_tag(
        &self,
        Parameters(req): Parameters<CreateTagRequest>,
    ) -> Result<String, String> {
        self.traced("early_create_tag", tools::create_tag(&self.api, req)).await
    }

    #[tool(
        name = "early_update_tag",
        description = "Update a tag's label.",
        annotations(read_only_hint = false, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_update_tag(
        &self,
        Parameters(req): Parameters<UpdateTagRequest>,
    ) -> Result<String, String> {
        self.traced("early_update_tag", tools::update_tag(&self.api, req)).await
    }

    #[tool(
        name = "early_delete_tag",
        description = "Delete a tag. Returns affected time entries.",
        annotations(read_only_hint = false, destructive_hint = true, idempotent_hint = true)
    )]
    async fn early_delete_tag(
        &self,
        Parameters(req): Parameters<TagIdRequest>,
    ) -> Result<String, String> {
        self.traced("early_delete_tag", tools::delete_tag(&self.api, req)).await
    }

    #[tool(
        name = "early_create_mention",
        description = "Create a new mention.",
        annotations(read_only_hint = false, destructive_hint = false, idempotent_hint = false)
    )]
    async fn early_create_mention(
        &self,
        Parameters(req): Parameters<CreateMentionRequest>,
    ) -> Result<String, String> {
        self.traced("early_create_mention", tools::create_mention(&self.api, req)).await
    }

    #[tool(
        name = "early_update_mention",
        description = "Update a mention's label.",
        annotations(read_only_hint = false, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_update_mention(
        &self,
        Parameters(req): Parameters<UpdateMentionRequest>,
    ) -> Result<String, String> {
        self.traced("early_update_mention", tools::update_mention(&self.api, req)).await
    }

    #[tool(
        name = "early_delete_mention",
        description = "Delete a mention. Returns affected time entries.",
        annotations(read_only_hint = false, destructive_hint = true, idempotent_hint = true)
    )]
    async fn early_delete_mention(
        &self,
        Parameters(req): Parameters<MentionIdRequest>,
    ) -> Result<String, String> {
        self.traced("early_delete_mention", tools::delete_mention(&self.api, req)).await
    }

    // ========================================================================
    // Leaves
    // ========================================================================

    #[tool(
        name = "early_create_leave",
        description = "Create a leave request for yourself.",
        annotations(read_only_hint = false, destructive_hint = false, idempotent_hint = false)
    )]
    async fn early_create_leave(
        &self,
        Parameters(req): Parameters<CreateLeaveRequest>,
    ) -> Result<String, String> {
        self.traced("early_create_leave", tools::create_leave(&self.api, req)).await
    }

    #[tool(
        name = "early_create_leave_for_user",
        description = "Create an approved leave for a team member. Requires Admin/Owner role.",
        annotations(read_only_hint = false, destructive_hint = false, idempotent_hint = false)
    )]
    async fn early_create_leave_for_user(
        &self,
        Parameters(req): Parameters<CreateLeaveForUserRequest>,
    ) -> Result<String, String> {
        self.traced("early_create_leave_for_user", tools::create_leave_for_user(&self.api, req)).await
    }

    #[tool(
        name = "early_approve_leave",
        description = "Approve a leave request. Requires Admin/Owner role.",
        annotations(read_only_hint = false, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_approve_leave(
        &self,
        Parameters(req): Parameters<LeaveIdRequest>,
    ) -> Result<String, String> {
        self.traced("early_approve_leave", tools::approve_leave(&self.api, req)).await
    }

    #[tool(
        name = "early_deny_leave",
        description = "Deny a leave request. Requires Admin/Owner role.",
        annotations(read_only_hint = false, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_deny_leave(
        &self,
        Parameters(req): Parameters<LeaveIdRequest>,
    ) -> Result<String, String> {
        self.traced("early_deny_leave", tools::deny_leave(&self.api, req)).await
    }

    #[tool(
        name = "early_delete_leave",
        description = "Delete a leave. Irreversible. Requires Admin/Owner for other users' leaves.",
        annotations(read_only_hint = false, destructive_hint = true, idempotent_hint = true)
    )]
    async fn early_delete_leave(
        &self,
        Parameters(req): Parameters<LeaveIdRequest>,
    ) -> Result<String, String> {
        self.traced("early_delete_leave", tools::delete_leave(&self.api, req)).await
    }

    // ========================================================================
    // Webhooks
    // ========================================================================

    #[tool(
        name = "early_list_webhook_events",
        description = "List available webhook events.",
        annotations(read_only_hint = true, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_list_webhook_events(&self) -> Result<String, String> {
        self.traced("early_list_webhook_events", tools::list_webhook_events(&self.api)).await
    }

    #[tool(
        name = "early_list_webhook_subscriptions",
        description = "List all webhook subscriptions.",
        annotations(read_only_hint = true, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_list_webhook_subscriptions(&self) -> Result<String, String> {
        self.traced("early_list_webhook_subscriptions", tools::list_webhook_subscriptions(&self.api)).await
    }

    #[tool(
        name = "early_subscribe_webhook",
        description = "Subscribe to a webhook event. URL must be HTTPS and publicly reachable.",
        annotations(read_only_hint = false, destructive_hint = false, idempotent_hint = false)
    )]
    async fn early_subscribe_webhook(
        &self,
        Parameters(req): Parameters<WebhookSubscribeRequest>,
    ) -> Result<String, String> {
        self.traced("early_subscribe_webhook", tools::subscribe_webhook(&self.api, req)).await
    }

    #[tool(
        name = "early_unsubscribe_webhook",
        description = "Unsubscribe from a webhook.",
        annotations(read_only_hint = false, destructive_hint = true, idempotent_hint = true)
    )]
    async fn early_unsubscribe_webhook(
        &self,
        Parameters(req): Parameters<WebhookIdRequest>,
    ) -> Result<String, String> {
        self.traced("early_unsubscribe_webhook", tools::unsubscribe_webhook(&self.api, req)).await
    }

    #[tool(
        name = "early_unsubscribe_all_webhooks",
        description = "Unsubscribe from all webhooks.",
        annotations(read_only_hint = false, destructive_hint = true, idempotent_hint = true)
    )]
    async fn early_unsubscribe_all_webhooks(&self) -> Result<String, String> {
        self.traced("early_unsubscribe_all_webhooks", tools::unsubscribe_all_webhooks(&self.api)).await
    }

    // ========================================================================
    // Reports
    // ========================================================================

    #[tool(
        name = "early_generate_report",
        description = "Generate a time tracking report with aggregated data.",
        annotations(read_only_hint = true, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_generate_report(
        &self,
        Parameters(req): Parameters<ReportRequest>,
    ) -> Result<String, String> {
        self.traced("early_generate_report", tools::generate_report(&self.api, req)).await
    }

    #[tool(
        name = "early_today_summary",
        description = "Get a summary of today's tracked time.",
        annotations(read_only_hint = true, destructive_hint = false, idempotent_hint = true)
    )]
    async fn early_today_summary(&self) -> Result<String, String> {
        self.traced("early_today_summary", tools::today_summary(&self.api)).await
    }
}

#[tool_handler]
impl ServerHandler for EarlyServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "early-mcp".into(),
                title: Some("Early - time tracking tools".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Tools for the Early time tracker: activities, live tracking, time entries, \
                 folders, tags, leaves, webhooks and reports. Timestamps use \
                 YYYY-MM-DDTHH:MM:SS.sss in UTC; date ranges accept plain YYYY-MM-DD."
                    .into(),
            ),
        }
    }
}
