// src/api/mock.rs
// Scripted in-process transport for unit tests

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::auth::SIGN_IN_PATH;
use super::transport::{HttpRequest, HttpResponse, Transport};
use crate::error::ApiError;

type Handler = Box<dyn Fn(&HttpRequest) -> Result<HttpResponse, ApiError> + Send + Sync>;

/// Records every request and answers through a closure
pub struct MockTransport {
    handler: Handler,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new<F>(handler: F) -> Arc<Self>
    where
        F: Fn(&HttpRequest) -> Result<HttpResponse, ApiError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Sign-in hands out `tok-1`, `tok-2`, ...; every other request goes to `api`
    pub fn with_sign_in<F>(api: F) -> Arc<Self>
    where
        F: Fn(&HttpRequest) -> Result<HttpResponse, ApiError> + Send + Sync + 'static,
    {
        let issued = AtomicUsize::new(0);
        Self::new(move |req| {
            if req.url.ends_with(SIGN_IN_PATH) {
                let n = issued.fetch_add(1, Ordering::SeqCst) + 1;
                json(200, serde_json::json!({ "token": format!("tok-{}", n) }))
            } else {
                api(req)
            }
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn sign_ins(&self) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.ends_with(SIGN_IN_PATH))
            .count()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests other than sign-in
    pub fn api_requests(&self) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| !r.url.ends_with(SIGN_IN_PATH))
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let result = (self.handler)(&request);
        self.requests.lock().unwrap().push(request);
        result
    }
}

pub fn json(status: u16, body: Value) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse {
        status,
        body: body.to_string(),
    })
}

pub fn raw(status: u16, body: &str) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse {
        status,
        body: body.to_string(),
    })
}
