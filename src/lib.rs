//! Fusia - unofficial web API client
//!
//! A cookie-session client for the web surface of a photo-sharing service.
//! It speaks the same requests the browser front end issues: it bootstraps
//! from the config embedded in the HTML homepage, authenticates with the
//! AJAX login endpoint and queries resources through the generic
//! hash-identified query endpoint.
//!
//! # Architecture
//!
//! - **Session lifecycle**: [`session::SessionManager`] drives the
//!   Anonymous/Authenticating/Authenticated state machine and owns the CSRF
//!   token.
//! - **Query engine**: [`query::ResourceQueryEngine`] executes
//!   descriptor-driven paginated and direct fetches; concrete resources are
//!   data entries in [`query::descriptors`].
//! - **Transport**: [`http::RequestPipeline`] is the single network boundary,
//!   with a persistent cookie store attached.
//!
//! # Examples
//!
//! ```rust,no_run
//! use fusia::{Fusia, PageRequest, Settings};
//!
//! # async fn example() -> fusia::Result<()> {
//! let settings = Settings::with_credentials("somebody", "hunter2");
//! let mut client = Fusia::new(settings)?;
//! client.login().await?;
//!
//! let page = client.timeline_feed(&PageRequest::first(12)).await?;
//! if let Some(cursor) = page.next_cursor {
//!     let _next = client.timeline_feed(&PageRequest::after(12, cursor)).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod query;
pub mod session;
pub mod types;
pub mod validate;

pub use client::{Fusia, ProfileUpdate};
pub use config::{ConfigLoader, Settings};
pub use error::{Error, Result};
pub use query::{QueryDescriptor, descriptors};
pub use types::{PageRequest, PageResult, Session, SessionState};
