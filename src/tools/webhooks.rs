// src/tools/webhooks.rs
// Webhook event catalogue and subscriptions

use serde_json::json;

use super::Operation;
use crate::api::models::{Resource, WebhookEvents, WebhookSubscriptions, decode, or_unknown};
use crate::api::{ApiClient, RequestSpec, segment};
use crate::mcp::requests::{WebhookIdRequest, WebhookSubscribeRequest};

const SUBSCRIPTIONS_PATH: &str = "/webhooks/subscription";

const LIST_WEBHOOK_EVENTS: Operation<()> = Operation {
    name: "list_webhook_events",
    request: |_| RequestSpec::get("/webhooks/event"),
    render: |_, value| {
        let catalogue: WebhookEvents = decode(value)?;
        let mut lines = vec!["## Available Webhook Events".to_string()];
        lines.extend(catalogue.events.iter().map(|e| format!("- {}", e)));
        Ok(lines.join("\n"))
    },
    not_found: None,
};

const LIST_WEBHOOK_SUBSCRIPTIONS: Operation<()> = Operation {
    name: "list_webhook_subscriptions",
    request: |_| RequestSpec::get(SUBSCRIPTIONS_PATH),
    render: |_, value| {
        let subs: WebhookSubscriptions = decode(value)?;
        if subs.subscriptions.is_empty() {
            return Ok("No webhook subscriptions.".to_string());
        }

        let mut lines = vec!["## Webhook Subscriptions".to_string()];
        for s in &subs.subscriptions {
            lines.push(format!(
                "- **{}** → {} (ID: {})",
                or_unknown(&s.event),
                or_unknown(&s.target_url),
                or_unknown(&s.id)
            ));
        }
        Ok(lines.join("\n"))
    },
    not_found: None,
};

const SUBSCRIBE_WEBHOOK: Operation<WebhookSubscribeRequest> = Operation {
    name: "subscribe_webhook",
    // The API expects snake_case here, unlike the rest of v4
    request: |p| {
        RequestSpec::post(
            SUBSCRIPTIONS_PATH,
            json!({"event": p.event, "target_url": p.target_url}),
        )
    },
    render: |p, value| {
        let sub: Resource = decode(value)?;
        Ok(format!(
            "Subscribed to {}. Subscription ID: {}",
            p.event,
            or_unknown(&sub.id)
        ))
    },
    not_found: None,
};

const UNSUBSCRIBE_WEBHOOK: Operation<WebhookIdRequest> = Operation {
    name: "unsubscribe_webhook",
    request: |p| {
        RequestSpec::delete(format!("{}/{}", SUBSCRIPTIONS_PATH, segment(&p.subscription_id)))
    },
    render: |p, _| Ok(format!("Unsubscribed webhook {}.", p.subscription_id)),
    not_found: None,
};

const UNSUBSCRIBE_ALL_WEBHOOKS: Operation<()> = Operation {
    name: "unsubscribe_all_webhooks",
    request: |_| RequestSpec::delete(SUBSCRIPTIONS_PATH),
    render: |_, _| Ok("Unsubscribed from all webhooks.".to_string()),
    not_found: None,
};

pub async fn list_webhook_events(api: &ApiClient) -> Result<String, String> {
    LIST_WEBHOOK_EVENTS.run(api, &()).await
}

pub async fn list_webhook_subscriptions(api: &ApiClient) -> Result<String, String> {
    LIST_WEBHOOK_SUBSCRIPTIONS.run(api, &()).await
}

/// Target URL must be HTTPS and publicly reachable; the API enforces it
pub async fn subscribe_webhook(
    api: &ApiClient,
    req: WebhookSubscribeRequest,
) -> Result<String, String> {
    SUBSCRIBE_WEBHOOK.run(api, &req).await
}

pub async fn unsubscribe_webhook(api: &ApiClient, req: WebhookIdRequest) -> Result<String, String> {
    UNSUBSCRIBE_WEBHOOK.run(api, &req).await
}

pub async fn unsubscribe_all_webhooks(api: &ApiClient) -> Result<String, String> {
    UNSUBSCRIBE_ALL_WEBHOOKS.run(api, &()).await
}
