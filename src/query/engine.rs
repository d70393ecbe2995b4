//! Resource query engine
//!
//! Executes descriptor-driven requests against the single query endpoint and
//! unwraps the validated payload. Pagination is stateless: the caller feeds
//! the returned cursor back in, and replaying an old cursor is safe. The
//! engine reads the session's token at call time and never mutates it.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::http::{RequestOptions, RequestPipeline};
use crate::query::{QueryDescriptor, validator};
use crate::session::SharedData;
use crate::types::{PageRequest, PageResult, Session};

/// Path of the generic query endpoint
pub const QUERY_ENDPOINT: &str = "/graphql/query/";

/// Descriptor-driven query executor
#[derive(Debug)]
pub struct ResourceQueryEngine {
    pipeline: Arc<RequestPipeline>,
}

impl ResourceQueryEngine {
    /// Create an engine on top of the shared pipeline
    pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self { pipeline }
    }

    /// Fetch one page of a paginated resource.
    ///
    /// Merges the descriptor's required variables with the caller's, inserts
    /// the clamped count and (when present) the cursor, and requests the
    /// query endpoint with the serialized variables. The validated payload
    /// and the pagination info found at the descriptor's page-info path make
    /// up the returned [`PageResult`].
    pub async fn fetch_page(
        &self,
        session: &Session,
        descriptor: &QueryDescriptor,
        variables: Map<String, Value>,
        page: &PageRequest,
    ) -> Result<PageResult> {
        let count = descriptor.effective_count(page.count);

        let mut merged = descriptor.required_variables.clone();
        for (key, value) in variables {
            merged.insert(key, value);
        }
        merged.insert(descriptor.count_variable.clone(), count.into());
        if let Some(cursor) = &page.cursor {
            merged.insert(
                descriptor.cursor_variable.clone(),
                Value::String(cursor.clone()),
            );
        }

        let variables_json = serde_json::to_string(&Value::Object(merged))?;

        let mut options = RequestOptions::get(QUERY_ENDPOINT)
            .query("query_hash", &descriptor.id)
            .query("variables", variables_json)
            .rollout(session.rollout_value);
        if let Some(token) = session.csrf_token() {
            options = options.csrf_token(token);
        }

        let reply = self.pipeline.execute_json(options).await?;
        let payload = validator::validate(&reply, descriptor)?;
        let (has_next, next_cursor) = page_info(&payload, descriptor);

        Ok(PageResult {
            payload,
            next_cursor,
            has_next,
        })
    }

    /// Fetch a resource from its dedicated JSON endpoint (`?__a=1` variant)
    pub async fn fetch_direct_json(
        &self,
        session: &Session,
        path: &str,
        descriptor: &QueryDescriptor,
    ) -> Result<Value> {
        let mut options = RequestOptions::get(path)
            .query("__a", "1")
            .rollout(session.rollout_value);
        if let Some(token) = session.csrf_token() {
            options = options.csrf_token(token);
        }

        let reply = self.pipeline.execute_json(options).await?;
        validator::validate(&reply, descriptor)
    }

    /// Fetch a resource from an HTML page's embedded config
    pub async fn fetch_direct_html(
        &self,
        session: &Session,
        path: &str,
        descriptor: &QueryDescriptor,
    ) -> Result<Value> {
        let mut options = RequestOptions::get(path).rollout(session.rollout_value);
        if let Some(token) = session.csrf_token() {
            options = options.csrf_token(token);
        }

        let body = self.pipeline.execute(options).await?;
        let shared = SharedData::extract(&body).ok_or(Error::NotFound)?;
        validator::validate(shared.value(), descriptor)
    }
}

/// Read `has_next_page`/`end_cursor` from the conventional pagination object,
/// when the payload carries one
fn page_info(payload: &Value, descriptor: &QueryDescriptor) -> (bool, Option<String>) {
    match validator::descend(payload, &descriptor.page_info_path) {
        Some(info) => {
            let has_next = info
                .get("has_next_page")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            let next_cursor = info
                .get("end_cursor")
                .and_then(Value::as_str)
                .map(ToString::to_string);
            (has_next, next_cursor)
        }
        None => (false, None),
    }
}
