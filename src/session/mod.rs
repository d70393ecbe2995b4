//! Session lifecycle management
//!
//! This module owns the authentication state machine (login, logout, token
//! refresh) and the extraction of the embedded shared-data config that
//! bootstraps it.

pub mod manager;
pub mod shared_data;

pub use manager::SessionManager;
pub use shared_data::SharedData;
