//! HTTP transport layer
//!
//! Hosts the single network boundary of the crate: the [`RequestPipeline`]
//! every other component calls through, and the durable cookie store plugged
//! into it.

pub mod cookies;
pub mod pipeline;

pub use cookies::PersistentCookieStore;
pub use pipeline::{RequestOptions, RequestPipeline};
