//! Integration tests for Vadaf Joyería.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vadaf-integration-tests
//! ```
//!
//! The tests drive the real storefront router in-process with
//! `tower::ServiceExt::oneshot` over an in-memory store; no server or data
//! file is needed. [`TestApp`] carries the session cookie between requests
//! the way a browser would.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{
        HeaderMap, Method, Request, StatusCode,
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
    },
};
use tower::ServiceExt;

use vadaf_core::MemoryStore;
use vadaf_storefront::config::StorefrontConfig;
use vadaf_storefront::routes;
use vadaf_storefront::state::{AppState, SharedStore};

/// Credentials accepted by the admin login.
pub const ADMIN_LOGIN_FORM: &str = "username=VadafJoyeria&password=DaniVadafj";

const SESSION_COOKIE: &str = "vadaf_session";

/// A storefront instance plus one visitor's cookie jar.
pub struct TestApp {
    router: Router,
    store: SharedStore,
    cookie: Option<String>,
}

/// A fully buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// The redirect target, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }

    /// Parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("response body is JSON")
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// A storefront over a fresh in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// A storefront over `store`.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration fails to load.
    #[must_use]
    pub fn with_store(store: SharedStore) -> Self {
        let config = StorefrontConfig::from_lookup(|_| None).expect("default config is valid");
        Self::with_config(config, store)
    }

    /// A storefront over a fresh store that rejects product forms larger
    /// than `bytes`.
    ///
    /// # Panics
    ///
    /// Panics if the configuration fails to load.
    #[must_use]
    pub fn with_upload_limit(bytes: usize) -> Self {
        let limit = bytes.to_string();
        let config = StorefrontConfig::from_lookup(|name| {
            (name == "VADAF_MAX_UPLOAD_BYTES").then(|| limit.clone())
        })
        .expect("upload limit is valid");
        Self::with_config(config, Arc::new(MemoryStore::new()))
    }

    fn with_config(config: StorefrontConfig, store: SharedStore) -> Self {
        let state = AppState::new(config, Arc::clone(&store));
        Self {
            router: routes::app(state),
            store,
            cookie: None,
        }
    }

    /// The store shared by every visitor of this app.
    #[must_use]
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// A second visitor of the same storefront, without this one's cookie.
    #[must_use]
    pub fn new_visitor(&self) -> Self {
        Self {
            router: self.router.clone(),
            store: Arc::clone(&self.store),
            cookie: None,
        }
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.send(Method::GET, path, None, Body::empty()).await
    }

    pub async fn post_form(&mut self, path: &str, body: &str) -> TestResponse {
        self.send(
            Method::POST,
            path,
            Some("application/x-www-form-urlencoded".to_string()),
            Body::from(body.to_string()),
        )
        .await
    }

    pub async fn post_multipart(&mut self, path: &str, form: MultipartForm) -> TestResponse {
        let (content_type, body) = form.finish();
        self.send(Method::POST, path, Some(content_type), Body::from(body))
            .await
    }

    /// Log in with the admin credentials.
    pub async fn login(&mut self) -> TestResponse {
        self.post_form("/admin/login", ADMIN_LOGIN_FORM).await
    }

    /// Send a request, remembering any session cookie the response sets.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn send(
        &mut self,
        method: Method,
        path: &str,
        content_type: Option<String>,
        body: Body,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        if let Some(cookie) = &self.cookie {
            builder = builder.header(COOKIE, cookie);
        }
        let request = builder.body(body).expect("request is valid");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        for value in response.headers().get_all(SET_COOKIE) {
            let Ok(value) = value.to_str() else { continue };
            let pair = value.split(';').next().unwrap_or_default().trim();
            if pair.starts_with(SESSION_COOKIE) {
                self.cookie = Some(pair.to_string());
            }
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body is readable");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

/// A hand-built `multipart/form-data` body.
pub struct MultipartForm {
    boundary: &'static str,
    body: Vec<u8>,
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartForm {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            boundary: "vadaf-test-boundary",
            body: Vec::new(),
        }
    }

    /// Add a text field.
    #[must_use]
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self
    }

    /// Add a file field.
    #[must_use]
    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// The `Content-Type` header value and the encoded body.
    #[must_use]
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body,
        )
    }
}

/// Ids of the listings linked from an admin list, in page order.
#[must_use]
pub fn listed_product_ids(html: &str) -> Vec<i64> {
    html.split("/admin/products/")
        .skip(1)
        .filter_map(|rest| {
            let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
            digits.parse().ok()
        })
        .collect()
}
