//! Embedded shared-data extraction
//!
//! The web surface embeds its session config as a JSON assignment inside the
//! page body. Extraction is regex-based against the known assignment marker
//! and is deliberately isolated here: input is a body string, output is
//! structured data or `None`, never an error. Tests can feed synthetic bodies
//! without real HTML fixtures.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static SHARED_DATA_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"window\._sharedData = (\{[^\n]*\});").expect("valid marker regex"));

static ADDITIONAL_DATA_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"window\.__additionalDataLoaded\('feed',(\{[^\n]*\})\);")
        .expect("valid additional data regex")
});

/// Parsed shared-data blob with typed accessors over the known config paths
#[derive(Debug, Clone, PartialEq)]
pub struct SharedData {
    raw: Value,
}

impl SharedData {
    /// Extract and parse the shared-data assignment from a page body.
    ///
    /// Returns `None` when the marker is absent or the embedded JSON does not
    /// parse.
    pub fn extract(body: &str) -> Option<Self> {
        let captures = SHARED_DATA_MARKER.captures(body)?;
        let raw = serde_json::from_str(captures.get(1)?.as_str()).ok()?;
        Some(Self { raw })
    }

    /// Extract the secondary "additional data" blob, when present
    pub fn extract_additional(body: &str) -> Option<Value> {
        let captures = ADDITIONAL_DATA_MARKER.captures(body)?;
        serde_json::from_str(captures.get(1)?.as_str()).ok()
    }

    /// CSRF token at `config.csrf_token`
    pub fn csrf_token(&self) -> Option<&str> {
        self.raw.get("config")?.get("csrf_token")?.as_str()
    }

    /// Viewer id at `config.viewerId`; numeric ids are stringified
    pub fn viewer_id(&self) -> Option<String> {
        let viewer = self.raw.get("config")?.get("viewerId")?;
        match viewer {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Rollout value at the top-level `rollout_hash`, accepting either a
    /// number or a numeric string
    pub fn rollout_hash(&self) -> Option<u64> {
        match self.raw.get("rollout_hash")? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// The full parsed blob, for result-path descent on profile pages
    pub fn value(&self) -> &Value {
        &self.raw
    }
}
