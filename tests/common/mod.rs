//! Common test utilities and helpers
//!
//! Shared helpers for the integration tests: client construction against a
//! mock server and synthetic homepage bodies carrying the embedded config.

/// Test helper functions
pub mod helpers {
    use fusia::{Fusia, Settings};
    use tempfile::TempDir;

    pub const USERNAME: &str = "somebody";
    pub const PASSWORD: &str = "hunter2";

    /// Settings pointing at a mock server, with cookies in a temp dir
    pub fn test_settings(server_url: &str, dir: &TempDir) -> Settings {
        let mut settings = Settings::with_credentials(USERNAME, PASSWORD);
        settings.http.base_url = server_url.to_string();
        settings.cookies.path = dir.path().join("cookies.json");
        settings
    }

    /// Client pointing at a mock server
    pub fn test_client(server_url: &str, dir: &TempDir) -> Fusia {
        init_tracing();
        Fusia::new(test_settings(server_url, dir)).expect("client construction")
    }

    /// Install a test subscriber honoring `RUST_LOG`; repeated calls are a
    /// no-op.
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    /// Synthetic homepage body with the embedded shared-data config.
    ///
    /// When `logged_in_as` is set the body also carries that username, which
    /// is how an existing cookie-backed session is detected.
    pub fn homepage_body(logged_in_as: Option<&str>, csrf_token: &str, rollout: u64) -> String {
        let user_marker = logged_in_as
            .map(|u| format!("<a href=\"/{u}/\">{u}</a>"))
            .unwrap_or_default();
        format!(
            "<html><body>{user_marker}<script type=\"text/javascript\">\
             window._sharedData = {{\"config\":{{\"csrf_token\":\"{csrf_token}\",\
             \"viewerId\":\"4242\"}},\"rollout_hash\":\"{rollout}\"}};\
             </script></body></html>"
        )
    }
}
