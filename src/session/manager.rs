//! Session manager
//!
//! Owns the [`Session`] value and drives the authentication state machine:
//!
//! ```text
//! Anonymous -> Authenticating -> Authenticated
//!                    |
//!                    v
//!                 Failed        (fatal bootstrap errors; absorbing)
//! ```
//!
//! `logout` transitions `Authenticated -> Anonymous`. Concurrent `login` /
//! `logout` calls, or a `login` interleaved with business calls on the same
//! session, are not supported: the manager takes `&mut self` for mutations
//! and callers must serialize access themselves.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::http::{PersistentCookieStore, RequestOptions, RequestPipeline};
use crate::session::SharedData;
use crate::types::{Session, SessionState};

/// Drives login/logout and owns the session state
#[derive(Debug)]
pub struct SessionManager {
    settings: Arc<Settings>,
    pipeline: Arc<RequestPipeline>,
    cookies: Arc<PersistentCookieStore>,
    session: Session,
}

impl SessionManager {
    /// Create a manager with an empty anonymous session
    pub fn new(
        settings: Arc<Settings>,
        pipeline: Arc<RequestPipeline>,
        cookies: Arc<PersistentCookieStore>,
    ) -> Self {
        Self {
            settings,
            pipeline,
            cookies,
            session: Session::new(),
        }
    }

    /// Read-only view of the session for the query engine
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Whether a CSRF token is currently established
    pub fn is_logged_in(&self) -> bool {
        self.session.authenticated()
    }

    /// Fetch the homepage with whatever token and cookies already exist
    pub async fn fetch_homepage(&self) -> Result<String> {
        let mut options = RequestOptions::get("/").rollout(self.session.rollout_value);
        if let Some(token) = self.session.csrf_token() {
            options = options.csrf_token(token);
        }
        self.pipeline.execute(options).await
    }

    /// Establish an authenticated session and return the final CSRF token.
    ///
    /// When the homepage already reflects a cookie-backed session for the
    /// configured username, the config found there is adopted directly and no
    /// credentials are submitted. Otherwise exactly one credential POST is
    /// issued, followed by one homepage re-fetch to pick up the post-login
    /// token (the pre-login token must not be trusted afterwards).
    ///
    /// A session that failed fatally stays failed; callers must build a new
    /// client to try again.
    pub async fn login(&mut self) -> Result<String> {
        if self.session.state == SessionState::Failed {
            return Err(Error::session(
                "session failed fatally; construct a new client to retry",
            ));
        }
        self.session.state = SessionState::Authenticating;

        match self.login_flow().await {
            Ok(token) => {
                self.session.state = SessionState::Authenticated;
                // Session cookies are the only state that outlives the
                // process; write them out while they are fresh.
                self.cookies.save()?;
                debug!("Session authenticated");
                Ok(token)
            }
            Err(err @ Error::ConfigParse(_)) => {
                // Without the embedded config no token can ever be
                // established; the session is unusable.
                self.session.state = SessionState::Failed;
                Err(err)
            }
            Err(err) => {
                self.session.state = if self.session.authenticated() {
                    SessionState::Authenticated
                } else {
                    SessionState::Anonymous
                };
                Err(err)
            }
        }
    }

    async fn login_flow(&mut self) -> Result<String> {
        debug!("Fetching homepage");
        let homepage = self.fetch_homepage().await?;
        let shared = SharedData::extract(&homepage)
            .ok_or_else(|| Error::config_parse("shared data marker not found on homepage"))?;

        if homepage.contains(&self.settings.credentials.username) {
            // The cookie-backed session is still valid; the homepage config
            // already carries the live token.
            debug!("Existing session detected, adopting homepage config");
            return self.adopt_config(&shared);
        }

        debug!("No existing session, submitting credentials");
        if let Some(rollout) = shared.rollout_hash() {
            self.session.rollout_value = rollout;
        }
        let login_token = shared
            .csrf_token()
            .ok_or_else(|| Error::config_parse("csrf token missing from shared data"))?
            .to_string();
        self.session.csrf_token = Some(login_token.clone());

        let reply = self
            .pipeline
            .execute_json(
                RequestOptions::post("/accounts/login/ajax/")
                    .csrf_token(&login_token)
                    .rollout(self.session.rollout_value)
                    .form(vec![
                        (
                            "username".to_string(),
                            self.settings.credentials.username.clone(),
                        ),
                        (
                            "password".to_string(),
                            self.settings.credentials.password.clone(),
                        ),
                    ]),
            )
            .await
            .inspect_err(|_| {
                // The pre-login token must not outlive a failed submission.
                self.session.csrf_token = None;
            })?;

        if !is_truthy(reply.get("authenticated")) {
            self.session.csrf_token = None;
            return Err(Error::AuthRejected { payload: reply });
        }

        if let Some(user_id) = reply.get("userId") {
            self.session.user_id = json_id(user_id);
        }

        // The token issued before login is pre-login only; re-fetch the
        // homepage for the final one.
        debug!("Credentials accepted, re-fetching homepage for final token");
        let homepage = self.fetch_homepage().await?;
        let shared = SharedData::extract(&homepage)
            .ok_or_else(|| Error::config_parse("shared data missing after login"))?;
        self.adopt_config(&shared)
    }

    /// Adopt token, viewer id and rollout value from a parsed config
    fn adopt_config(&mut self, shared: &SharedData) -> Result<String> {
        let token = shared
            .csrf_token()
            .ok_or_else(|| Error::config_parse("csrf token missing from shared data"))?
            .to_string();

        self.session.csrf_token = Some(token.clone());
        if let Some(viewer_id) = shared.viewer_id() {
            self.session.user_id = Some(viewer_id);
        }
        if let Some(rollout) = shared.rollout_hash() {
            self.session.rollout_value = rollout;
        }

        Ok(token)
    }

    /// End the authenticated session.
    ///
    /// The logout endpoint commonly answers with a redirect; any completed
    /// round-trip counts as success. Cookies are cleared only after the
    /// round-trip completes: a transport failure surfaces the error and
    /// leaves the session authenticated.
    pub async fn logout(&mut self) -> Result<()> {
        if self.session.state != SessionState::Authenticated {
            return Err(Error::session("logout requires an authenticated session"));
        }
        let token = self
            .session
            .csrf_token
            .clone()
            .ok_or_else(|| Error::session("no csrf token on authenticated session"))?;

        self.pipeline
            .execute(
                RequestOptions::post("/accounts/logout/")
                    .csrf_token(&token)
                    .rollout(self.session.rollout_value)
                    .form(vec![("csrfmiddlewaretoken".to_string(), token.clone())])
                    .ignore_redirect(true),
            )
            .await?;

        self.cookies.clear()?;
        self.session.reset();
        debug!("Session cleared");
        Ok(())
    }
}

/// The login endpoint has answered `authenticated` with a bool, a 0/1 number
/// and a string across surface revisions; only an absent, false, zero, null
/// or empty value counts as rejection.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Server-side ids arrive as strings or numbers depending on the endpoint
fn json_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
