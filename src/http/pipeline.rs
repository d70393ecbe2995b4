//! Request execution pipeline
//!
//! Every component performs network I/O exclusively through
//! [`RequestPipeline`]. The pipeline owns the reqwest client (with the cookie
//! provider attached) and an immutable base header set; each call supplies a
//! fresh [`RequestOptions`] value carrying its own overrides, so no header
//! state is ever shared between in-flight calls.

use std::fmt;
use std::sync::Arc;

use reqwest::header::{
    ACCEPT_LANGUAGE, CONNECTION, HOST, HeaderMap, HeaderValue, ORIGIN, REFERER, USER_AGENT,
};
use reqwest::redirect::Policy;
use reqwest_cookie_store::CookieStoreMutex;
use url::Url;

use crate::config::Settings;
use crate::error::{Error, Result};

/// Anti-forgery header required on authenticated calls
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// AJAX marker header carrying the session's current rollout value
pub const AJAX_HEADER: &str = "X-Instagram-AJAX";

const REQUESTED_WITH_HEADER: &str = "X-Requested-With";

/// Per-call request configuration.
///
/// Built fresh for every call from explicit values; the pipeline never reuses
/// or mutates a shared options object.
pub struct RequestOptions {
    method: reqwest::Method,
    path: String,
    query: Vec<(String, String)>,
    form: Option<Vec<(String, String)>>,
    multipart: Option<reqwest::multipart::Form>,
    csrf_token: Option<String>,
    rollout_value: u64,
    ignore_redirect: bool,
}

impl RequestOptions {
    fn new(method: reqwest::Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            form: None,
            multipart: None,
            csrf_token: None,
            rollout_value: 1,
            ignore_redirect: false,
        }
    }

    /// GET request for the given path
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(reqwest::Method::GET, path)
    }

    /// POST request for the given path
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(reqwest::Method::POST, path)
    }

    /// Append a query-string pair
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set an urlencoded form body
    pub fn form(mut self, pairs: Vec<(String, String)>) -> Self {
        self.form = Some(pairs);
        self
    }

    /// Set a multipart body
    pub fn multipart(mut self, form: reqwest::multipart::Form) -> Self {
        self.multipart = Some(form);
        self
    }

    /// Attach the CSRF token header
    pub fn csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    /// Set the AJAX marker value for this call
    pub fn rollout(mut self, value: u64) -> Self {
        self.rollout_value = value;
        self
    }

    /// Tolerate non-200 statuses (servers commonly redirect on logout)
    pub fn ignore_redirect(mut self, ignore: bool) -> Self {
        self.ignore_redirect = ignore;
        self
    }
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("has_form", &self.form.is_some())
            .field("has_multipart", &self.multipart.is_some())
            .field("has_csrf_token", &self.csrf_token.is_some())
            .field("rollout_value", &self.rollout_value)
            .field("ignore_redirect", &self.ignore_redirect)
            .finish()
    }
}

/// The sole network boundary of the crate
#[derive(Debug)]
pub struct RequestPipeline {
    /// Underlying HTTP client with the cookie provider attached
    client: reqwest::Client,
    /// Base URL all paths are joined against
    base_url: Url,
}

impl RequestPipeline {
    /// Build the pipeline from settings and the shared cookie store.
    ///
    /// Redirects are never followed automatically: a redirect status is
    /// surfaced as-is and classified by the `ignore_redirect` flag per call.
    pub fn new(settings: &Settings, cookie_provider: Arc<CookieStoreMutex>) -> Result<Self> {
        let base_url = Url::parse(&settings.http.base_url)
            .map_err(|e| Error::config(format!("Invalid base URL: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, header_value(&settings.http.locale)?);
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(HOST, header_value(base_url.authority())?);
        headers.insert(ORIGIN, header_value(base_url.origin().ascii_serialization())?);
        headers.insert(REFERER, header_value(base_url.origin().ascii_serialization())?);
        headers.insert(USER_AGENT, header_value(&settings.http.user_agent)?);
        headers.insert(
            REQUESTED_WITH_HEADER,
            HeaderValue::from_static("XMLHttpRequest"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_provider(cookie_provider)
            .redirect(Policy::none())
            .timeout(settings.http.timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Base URL the pipeline was configured with
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Execute one request and return the raw body.
    ///
    /// A 200 status yields the body. Any other status is
    /// [`Error::HttpStatus`] unless the call tolerates redirects, in which
    /// case the body is returned regardless. Transport failures surface as
    /// [`Error::Network`].
    pub async fn execute(&self, options: RequestOptions) -> Result<String> {
        let url = self
            .base_url
            .join(&options.path)
            .map_err(|e| Error::config(format!("Invalid request path: {}", e)))?;

        let mut request = self.client.request(options.method, url);

        if !options.query.is_empty() {
            request = request.query(&options.query);
        }

        request = request.header(AJAX_HEADER, options.rollout_value);
        if let Some(token) = &options.csrf_token {
            request = request.header(CSRF_HEADER, token);
        }

        if let Some(form) = &options.form {
            request = request.form(form);
        }
        if let Some(multipart) = options.multipart {
            request = request.multipart(multipart);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();

        if status != 200 && !options.ignore_redirect {
            tracing::debug!(status, "Request failed with unexpected status");
            return Err(Error::HttpStatus(status));
        }

        Ok(response.text().await?)
    }

    /// Execute one request and parse the body as JSON
    pub async fn execute_json(&self, options: RequestOptions) -> Result<serde_json::Value> {
        let body = self.execute(options).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn header_value(value: impl AsRef<str>) -> Result<HeaderValue> {
    HeaderValue::from_str(value.as_ref())
        .map_err(|e| Error::config(format!("Invalid header value: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::PersistentCookieStore;
    use tempfile::TempDir;

    fn pipeline_for(server_url: &str, dir: &TempDir) -> (RequestPipeline, PersistentCookieStore) {
        let mut settings = Settings::with_credentials("somebody", "hunter2");
        settings.http.base_url = server_url.to_string();
        let cookies = PersistentCookieStore::load(dir.path().join("cookies.json")).unwrap();
        let pipeline = RequestPipeline::new(&settings, cookies.provider()).unwrap();
        (pipeline, cookies)
    }

    #[tokio::test]
    async fn test_execute_returns_body_on_200() {
        let mut server = mockito::Server::new_async().await;
        let dir = TempDir::new().unwrap();
        let (pipeline, _cookies) = pipeline_for(&server.url(), &dir);

        let mock = server
            .mock("GET", "/")
            .match_header("x-requested-with", "XMLHttpRequest")
            .match_header("x-instagram-ajax", "1")
            .with_body("hello")
            .create_async()
            .await;

        let body = pipeline.execute(RequestOptions::get("/")).await.unwrap();
        assert_eq!(body, "hello");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_execute_classifies_unexpected_status() {
        let mut server = mockito::Server::new_async().await;
        let dir = TempDir::new().unwrap();
        let (pipeline, _cookies) = pipeline_for(&server.url(), &dir);

        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let err = pipeline
            .execute(RequestOptions::get("/missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::HttpStatus(404)));
    }

    #[tokio::test]
    async fn test_ignore_redirect_tolerates_302() {
        let mut server = mockito::Server::new_async().await;
        let dir = TempDir::new().unwrap();
        let (pipeline, _cookies) = pipeline_for(&server.url(), &dir);

        let _mock = server
            .mock("POST", "/accounts/logout/")
            .with_status(302)
            .with_header("location", "/")
            .create_async()
            .await;

        let result = pipeline
            .execute(RequestOptions::post("/accounts/logout/").ignore_redirect(true))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_csrf_and_rollout_headers_applied() {
        let mut server = mockito::Server::new_async().await;
        let dir = TempDir::new().unwrap();
        let (pipeline, _cookies) = pipeline_for(&server.url(), &dir);

        let mock = server
            .mock("POST", "/web/likes/1/like/")
            .match_header("x-csrftoken", "tok")
            .match_header("x-instagram-ajax", "31337")
            .create_async()
            .await;

        pipeline
            .execute(
                RequestOptions::post("/web/likes/1/like/")
                    .csrf_token("tok")
                    .rollout(31337),
            )
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_set_cookie_lands_in_store() {
        let mut server = mockito::Server::new_async().await;
        let dir = TempDir::new().unwrap();
        let (pipeline, cookies) = pipeline_for(&server.url(), &dir);

        let _mock = server
            .mock("GET", "/")
            .with_header("set-cookie", "csrftoken=abc; Path=/")
            .with_body("ok")
            .create_async()
            .await;

        pipeline.execute(RequestOptions::get("/")).await.unwrap();

        let store = cookies.provider();
        let guard = store.lock().unwrap();
        assert!(guard.iter_any().any(|c| c.name() == "csrftoken"));
    }
}
