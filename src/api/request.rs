// src/api/request.rs
// Request and response values exchanged with the dispatcher

use reqwest::Method;
use serde_json::Value;

/// One authenticated call against the Early API, built per tool invocation
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    /// Path relative to the API base URL, starting with `/`
    pub path: String,
    pub body: Option<Value>,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method,
            path: path.into(),
            body,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path, None)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path, None)
    }

    /// POST without a body (archive/approve style endpoints)
    pub fn post_empty(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path, None)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path, Some(body))
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PATCH, path, Some(body))
    }
}

/// Successful dispatcher outcome
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// 204 or an empty 2xx body
    NoContent,
    Json(Value),
}

impl ApiResponse {
    /// The JSON payload, `Value::Null` for `NoContent`
    pub fn into_value(self) -> Value {
        match self {
            Self::NoContent => Value::Null,
            Self::Json(value) => value,
        }
    }

    #[cfg(test)]
    fn is_no_content(&self) -> bool {
        matches!(self, Self::NoContent)
    }
}

/// Percent-encode a user-supplied identifier for use as a path segment
pub fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}
