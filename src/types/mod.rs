//! Type definitions for the fusia client
//!
//! This module contains the session value and the pagination request/response
//! structures shared by the query engine and the session manager.

pub mod page;
pub mod session;

pub use page::{PageRequest, PageResult};
pub use session::{Session, SessionState};
