// src/tools/users.rs
// Account and team lookups

use super::Operation;
use crate::api::models::{User, UserList, decode, or_unknown};
use crate::api::{ApiClient, RequestSpec};

const GET_ME: Operation<()> = Operation {
    name: "get_me",
    request: |_| RequestSpec::get("/me"),
    render: |_, value| {
        let user: User = decode(value)?;
        Ok(format!(
            "User: {} ({})\nID: {}",
            or_unknown(&user.name),
            or_unknown(&user.email),
            or_unknown(&user.id)
        ))
    },
    not_found: None,
};

const LIST_USERS: Operation<()> = Operation {
    name: "list_users",
    request: |_| RequestSpec::get("/users"),
    render: |_, value| {
        let list: UserList = decode(value)?;
        if list.users.is_empty() {
            return Ok("No users found.".to_string());
        }

        let mut lines = vec!["## Team Users".to_string()];
        for u in &list.users {
            lines.push(format!(
                "- **{}** ({}) - ID: {}",
                or_unknown(&u.name),
                or_unknown(&u.email),
                or_unknown(&u.id)
            ));
        }
        Ok(lines.join("\n"))
    },
    not_found: None,
};

/// Current authenticated user
pub async fn get_me(api: &ApiClient) -> Result<String, String> {
    GET_ME.run(api, &()).await
}

/// All users in the team
pub async fn list_users(api: &ApiClient) -> Result<String, String> {
    LIST_USERS.run(api, &()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{self, MockTransport};
    use crate::tools::test_support::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_me() {
        let transport = MockTransport::with_sign_in(|_| {
            mock::json(200, json!({"id": "u1", "name": "Ada", "email": "ada@early.test"}))
        });
        let api = client(&transport);

        let out = get_me(&api).await.unwrap();
        assert_eq!(out, "User: Ada (ada@early.test)\nID: u1");
        assert_eq!(path_of(&transport, 0), "/me");
    }

    #[tokio::test]
    async fn test_list_users() {
        let transport = MockTransport::with_sign_in(|_| {
            mock::json(
                200,
                json!({"users": [
                    {"id": "u1", "name": "Ada", "email": "ada@early.test"},
                    {"id": 2, "name": "Grace", "email": "grace@early.test"}
                ]}),
            )
        });
        let api = client(&transport);

        let out = list_users(&api).await.unwrap();
        assert_eq!(
            out,
            "## Team Users\n\
             - **Ada** (ada@early.test) - ID: u1\n\
             - **Grace** (grace@early.test) - ID: 2"
        );
    }

    #[tokio::test]
    async fn test_list_users_empty() {
        let transport = MockTransport::with_sign_in(|_| mock::json(200, json!({"users": []})));
        let api = client(&transport);
        assert_eq!(list_users(&api).await.unwrap(), "No users found.");
    }
}
