//! Tool implementations for the Early MCP server.
//!
//! Most tools are a declarative [`Operation`]: a request builder plus a
//! response renderer, run through the shared dispatcher. A few composite
//! tools (the daily summary) issue several calls by hand. Every tool
//! returns `Result<String, String>`; the `Err` side is the rendered error
//! line shown to the caller.

pub mod activities;
pub mod folders;
pub mod leaves;
pub mod reports;
pub mod tags;
pub mod time_entries;
pub mod tracking;
pub mod users;
pub mod webhooks;

use serde_json::Value;
use tracing::debug;

use crate::api::{ApiClient, RequestSpec};
use crate::error::ApiError;

pub use activities::{
    archive_activity, create_activity, edit_activity, list_activities, unarchive_activity,
};
pub use folders::{
    add_folder_member, archive_folder, create_folder, edit_folder, get_folder, get_folder_member,
    list_folder_members, list_folders, remove_folder_member, unarchive_folder,
};
pub use leaves::{approve_leave, create_leave, create_leave_for_user, delete_leave, deny_leave};
pub use reports::{generate_report, today_summary};
pub use tags::{
    create_mention, create_tag, delete_mention, delete_tag, list_tags, update_mention, update_tag,
};
pub use time_entries::{
    create_time_entry, delete_time_entry, edit_time_entry, get_time_entry, list_time_entries,
};
pub use tracking::{cancel_tracking, edit_tracking, get_tracking, start_tracking, stop_tracking};
pub use users::{get_me, list_users};
pub use webhooks::{
    list_webhook_events, list_webhook_subscriptions, subscribe_webhook, unsubscribe_all_webhooks,
    unsubscribe_webhook,
};

/// One remote operation: how to build the call and how to render its result
pub struct Operation<P> {
    pub name: &'static str,
    pub request: fn(&P) -> RequestSpec,
    pub render: fn(&P, Value) -> Result<String, ApiError>,
    /// Text returned instead of an error when the API answers 404
    pub not_found: Option<fn(&P) -> String>,
}

impl<P> Operation<P> {
    pub async fn run(&self, api: &ApiClient, params: &P) -> Result<String, String> {
        let spec = (self.request)(params);
        debug!(operation = self.name, method = %spec.method, path = %spec.path, "Running operation");

        match api.execute(spec).await {
            Ok(response) => (self.render)(params, response.into_value()).map_err(|e| e.to_report()),
            Err(e) if e.is_not_found() => match self.not_found {
                Some(render_missing) => Ok(render_missing(params)),
                None => Err(e.to_report()),
            },
            Err(e) => Err(e.to_report()),
        }
    }
}

/// Insert `key: value` when the value is present and non-empty
pub(crate) fn put_non_empty(
    body: &mut serde_json::Map<String, Value>,
    key: &str,
    value: &Option<String>,
) {
    if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
        body.insert(key.to_string(), Value::String(v.to_string()));
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::api::mock::{self, MockTransport};
    use serde_json::json;

    const ECHO: Operation<String> = Operation {
        name: "echo",
        request: |id| RequestSpec::get(format!("/things/{}", id)),
        render: |id, value| Ok(format!("{}={}", id, value["v"])),
        not_found: None,
    };

    const MAYBE: Operation<()> = Operation {
        name: "maybe",
        request: |_| RequestSpec::get("/maybe"),
        render: |_, _| Ok("present".to_string()),
        not_found: Some(|_| "absent".to_string()),
    };

    #[tokio::test]
    async fn test_run_renders_json() {
        let transport = MockTransport::with_sign_in(|_| mock::json(200, json!({"v": 1})));
        let api = client(&transport);

        let out = ECHO.run(&api, &"x1".to_string()).await.unwrap();
        assert_eq!(out, "x1=1");
        assert_eq!(path_of(&transport, 0), "/things/x1");
    }

    #[tokio::test]
    async fn test_run_reports_errors() {
        let transport =
            MockTransport::with_sign_in(|_| mock::json(422, json!({"message": "Invalid color"})));
        let api = client(&transport);

        let err = ECHO.run(&api, &"x1".to_string()).await.unwrap_err();
        assert_eq!(err, "Error 422: Invalid color");
    }

    #[tokio::test]
    async fn test_not_found_renderer() {
        let transport = MockTransport::with_sign_in(|_| mock::raw(404, ""));
        let api = client(&transport);

        assert_eq!(MAYBE.run(&api, &()).await.unwrap(), "absent");
        assert_eq!(
            ECHO.run(&api, &"x1".to_string()).await.unwrap_err(),
            "Error 404: Not Found (HTTP 404)"
        );
    }

    #[test]
    fn test_put_non_empty() {
        let mut body = serde_json::Map::new();
        put_non_empty(&mut body, "b", &None);
        put_non_empty(&mut body, "c", &Some(String::new()));
        put_non_empty(&mut body, "d", &Some("x".into()));
        assert_eq!(Value::Object(body), json!({"d": "x"}));
    }
}
