//! Generic resource query engine
//!
//! Descriptor-driven pagination against the single GraphQL-style query
//! endpoint, plus direct (non-enveloped) resource fetches. Concrete resources
//! are pure data: a [`QueryDescriptor`] naming a query hash, a result path and
//! page defaults. The catalog of descriptors for the known resources lives in
//! [`descriptors`].

pub mod descriptor;
pub mod descriptors;
pub mod engine;
pub mod validator;

pub use descriptor::{QueryDescriptor, ResponseShape};
pub use engine::ResourceQueryEngine;
