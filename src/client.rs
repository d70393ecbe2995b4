//! High-level client
//!
//! [`Fusia`] wires the pipeline, cookie store, session manager and query
//! engine together and exposes one method per concrete resource. Resource
//! methods are thin: they pick a descriptor from the catalog, add the
//! caller's variables and delegate.
//!
//! Login, logout and business calls share the one session value; interleaving
//! them concurrently is not supported and must be serialized by the caller.

use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::http::{PersistentCookieStore, RequestOptions, RequestPipeline};
use crate::query::{ResourceQueryEngine, descriptors};
use crate::session::SessionManager;
use crate::types::{PageRequest, PageResult, Session};
use crate::validate::{sanitize_media_id, validate_comment};

/// Profile fields submitted by [`Fusia::edit_profile`].
///
/// Unset fields are sent empty, matching the form the web surface submits.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub email: String,
    pub username: String,
    pub phone_number: String,
    /// 1 male, 2 female; sent empty when unset
    pub gender: Option<u8>,
    pub biography: String,
    pub external_url: String,
}

impl ProfileUpdate {
    fn into_form(self) -> Vec<(String, String)> {
        vec![
            ("first_name".to_string(), self.first_name),
            ("email".to_string(), self.email),
            ("username".to_string(), self.username),
            ("phone_number".to_string(), self.phone_number),
            (
                "gender".to_string(),
                self.gender.map(|g| g.to_string()).unwrap_or_default(),
            ),
            ("biography".to_string(), self.biography),
            ("external_url".to_string(), self.external_url),
            ("chaining_enabled".to_string(), "on".to_string()),
        ]
    }
}

/// Client for the unofficial web API
#[derive(Debug)]
pub struct Fusia {
    pipeline: Arc<RequestPipeline>,
    manager: SessionManager,
    engine: ResourceQueryEngine,
}

impl Fusia {
    /// Build a client: load the cookie store, construct the pipeline on top
    /// of it and start with an anonymous session.
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;
        let settings = Arc::new(settings);

        let cookies = Arc::new(PersistentCookieStore::load(&settings.cookies.path)?);
        let pipeline = Arc::new(RequestPipeline::new(&settings, cookies.provider())?);
        let manager = SessionManager::new(
            Arc::clone(&settings),
            Arc::clone(&pipeline),
            Arc::clone(&cookies),
        );
        let engine = ResourceQueryEngine::new(Arc::clone(&pipeline));

        Ok(Self {
            pipeline,
            manager,
            engine,
        })
    }

    // --- session lifecycle ---

    /// Establish an authenticated session; returns the final CSRF token
    pub async fn login(&mut self) -> Result<String> {
        self.manager.login().await
    }

    /// End the session and clear persisted cookies
    pub async fn logout(&mut self) -> Result<()> {
        self.manager.logout().await
    }

    /// Whether a CSRF token is currently established
    pub fn is_logged_in(&self) -> bool {
        self.manager.is_logged_in()
    }

    /// Read-only view of the current session
    pub fn session(&self) -> &Session {
        self.manager.session()
    }

    fn require_login(&self) -> Result<&Session> {
        let session = self.manager.session();
        if !session.authenticated() {
            return Err(Error::session("login required"));
        }
        Ok(session)
    }

    // --- paginated resources ---

    /// Logged-in user's timeline feed
    pub async fn timeline_feed(&self, page: &PageRequest) -> Result<PageResult> {
        let session = self.require_login()?;
        self.engine
            .fetch_page(session, &descriptors::timeline_feed(), Map::new(), page)
            .await
    }

    /// Media feed of the given user
    pub async fn user_feed(&self, user_id: &str, page: &PageRequest) -> Result<PageResult> {
        let session = self.require_login()?;
        self.engine
            .fetch_page(session, &descriptors::user_feed(), id_variables(user_id), page)
            .await
    }

    /// Feed of media the given user is tagged in
    pub async fn tagged_user_feed(&self, user_id: &str, page: &PageRequest) -> Result<PageResult> {
        let session = self.require_login()?;
        self.engine
            .fetch_page(
                session,
                &descriptors::tagged_user_feed(),
                id_variables(user_id),
                page,
            )
            .await
    }

    /// Comments on the given media
    pub async fn media_comments(&self, short_code: &str, page: &PageRequest) -> Result<PageResult> {
        let session = self.require_login()?;
        self.engine
            .fetch_page(
                session,
                &descriptors::media_comments(),
                shortcode_variables(short_code),
                page,
            )
            .await
    }

    /// Accounts that liked the given media
    pub async fn media_likers(&self, short_code: &str, page: &PageRequest) -> Result<PageResult> {
        let session = self.require_login()?;
        self.engine
            .fetch_page(
                session,
                &descriptors::media_likers(),
                shortcode_variables(short_code),
                page,
            )
            .await
    }

    /// Followers of the given user
    pub async fn user_followers(&self, user_id: &str, page: &PageRequest) -> Result<PageResult> {
        let session = self.require_login()?;
        self.engine
            .fetch_page(
                session,
                &descriptors::user_followers(),
                id_variables(user_id),
                page,
            )
            .await
    }

    /// Accounts the given user follows
    pub async fn user_followings(&self, user_id: &str, page: &PageRequest) -> Result<PageResult> {
        let session = self.require_login()?;
        self.engine
            .fetch_page(
                session,
                &descriptors::user_followings(),
                id_variables(user_id),
                page,
            )
            .await
    }

    /// Media tagged with the given hashtag
    pub async fn tag_feed(&self, tag: &str, page: &PageRequest) -> Result<PageResult> {
        let session = self.require_login()?;
        let mut variables = Map::new();
        variables.insert(
            "tag_name".to_string(),
            Value::String(tag.to_lowercase()),
        );
        self.engine
            .fetch_page(session, &descriptors::tag_feed(), variables, page)
            .await
    }

    /// Media posted at the given location
    pub async fn location_feed(&self, location_id: &str, page: &PageRequest) -> Result<PageResult> {
        let session = self.require_login()?;
        self.engine
            .fetch_page(
                session,
                &descriptors::location_feed(),
                id_variables(location_id),
                page,
            )
            .await
    }

    // --- direct fetches ---

    /// Fetch a user profile.
    ///
    /// With `raw` the dedicated JSON endpoint is used; otherwise the HTML
    /// page is fetched and the profile is read from its embedded config.
    pub async fn fetch_user(&self, username: &str, raw: bool) -> Result<Value> {
        let session = self.session();
        let path = format!("/{}/", username);
        if raw {
            self.engine
                .fetch_direct_json(session, &path, &descriptors::user_profile())
                .await
        } else {
            self.engine
                .fetch_direct_html(session, &path, &descriptors::user_profile_page())
                .await
        }
    }

    /// Media details for the given short code
    pub async fn media_info(&self, short_code: &str) -> Result<Value> {
        let session = self.require_login()?;
        let path = format!("/p/{}/", short_code);
        self.engine
            .fetch_direct_json(session, &path, &descriptors::media_info())
            .await
    }

    /// General search across users, tags and places
    pub async fn search(&self, text: &str) -> Result<Value> {
        let session = self.session();
        let mut options = RequestOptions::get("/web/search/topsearch/")
            .query("query", text)
            .rollout(session.rollout_value);
        if let Some(token) = session.csrf_token() {
            options = options.csrf_token(token);
        }
        self.pipeline.execute_json(options).await
    }

    // --- one-shot writes ---

    async fn post_authenticated(
        &self,
        path: String,
        form: Option<Vec<(String, String)>>,
    ) -> Result<Value> {
        let session = self.require_login()?;
        let mut options = RequestOptions::post(path)
            .rollout(session.rollout_value)
            .csrf_token(session.csrf_token().unwrap_or_default());
        if let Some(form) = form {
            options = options.form(form);
        }
        self.pipeline.execute_json(options).await
    }

    /// Follow the given user
    pub async fn follow(&self, user_id: &str) -> Result<Value> {
        self.post_authenticated(format!("/web/friendships/{}/follow/", user_id), None)
            .await
    }

    /// Unfollow the given user
    pub async fn unfollow(&self, user_id: &str) -> Result<Value> {
        self.post_authenticated(format!("/web/friendships/{}/unfollow/", user_id), None)
            .await
    }

    /// Like the given media
    pub async fn like(&self, media_id: &str) -> Result<Value> {
        let media_id = sanitize_media_id(media_id);
        self.post_authenticated(format!("/web/likes/{}/like/", media_id), None)
            .await
    }

    /// Remove a like from the given media
    pub async fn unlike(&self, media_id: &str) -> Result<Value> {
        let media_id = sanitize_media_id(media_id);
        self.post_authenticated(format!("/web/likes/{}/unlike/", media_id), None)
            .await
    }

    /// Post a comment on the given media.
    ///
    /// The text is validated client-side first; a violated rule never
    /// reaches the network.
    pub async fn post_comment(&self, media_id: &str, text: &str) -> Result<Value> {
        validate_comment(text)?;
        let media_id = sanitize_media_id(media_id);
        self.post_authenticated(
            format!("/web/comments/{}/add/", media_id),
            Some(vec![("comment_text".to_string(), text.to_string())]),
        )
        .await
    }

    /// Delete a comment from the given media
    pub async fn delete_comment(&self, media_id: &str, comment_id: &str) -> Result<Value> {
        let media_id = sanitize_media_id(media_id);
        self.post_authenticated(
            format!("/web/comments/{}/delete/{}/", media_id, comment_id),
            None,
        )
        .await
    }

    /// Submit profile changes
    pub async fn edit_profile(&self, profile: ProfileUpdate) -> Result<Value> {
        self.post_authenticated("/accounts/edit/".to_string(), Some(profile.into_form()))
            .await
    }

    /// Replace the profile picture with the image at the given path
    pub async fn update_profile_picture(&self, image: &Path) -> Result<Value> {
        let session = self.require_login()?;
        let form = reqwest::multipart::Form::new().part(
            "profile_pic",
            reqwest::multipart::Part::bytes(std::fs::read(image)?)
                .file_name(file_name(image)),
        );

        let options = RequestOptions::post("/accounts/web_change_profile_picture/")
            .rollout(session.rollout_value)
            .csrf_token(session.csrf_token().unwrap_or_default())
            .multipart(form);
        self.pipeline.execute_json(options).await
    }

    /// Upload a photo and publish it with the given caption.
    ///
    /// Two-step flow: the multipart upload yields an `upload_id`, which the
    /// configure call then publishes.
    pub async fn upload_photo(&self, image: &Path, caption: &str) -> Result<Value> {
        let session = self.require_login()?;
        let upload_id = chrono::Utc::now().timestamp_millis().to_string();

        let form = reqwest::multipart::Form::new()
            .text("upload_id", upload_id.clone())
            .text("media_type", "1")
            .part(
                "photo",
                reqwest::multipart::Part::bytes(std::fs::read(image)?)
                    .file_name(file_name(image)),
            );

        let upload_reply = self
            .pipeline
            .execute_json(
                RequestOptions::post("/create/upload/photo/")
                    .rollout(session.rollout_value)
                    .csrf_token(session.csrf_token().unwrap_or_default())
                    .multipart(form),
            )
            .await?;

        let upload_id = upload_reply
            .get("upload_id")
            .and_then(Value::as_str)
            .unwrap_or(&upload_id)
            .to_string();

        self.post_authenticated(
            "/create/configure/".to_string(),
            Some(vec![
                ("upload_id".to_string(), upload_id),
                ("caption".to_string(), caption.to_string()),
            ]),
        )
        .await
    }
}

fn id_variables(id: &str) -> Map<String, Value> {
    let mut variables = Map::new();
    variables.insert("id".to_string(), Value::String(id.to_string()));
    variables
}

fn shortcode_variables(short_code: &str) -> Map<String, Value> {
    let mut variables = Map::new();
    variables.insert(
        "shortcode".to_string(),
        Value::String(short_code.to_string()),
    );
    variables
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo.jpg".to_string())
}
