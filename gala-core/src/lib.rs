//! GALA SDK - Core library for event check-in and donation tracking
//!
//! This library provides a roster-centric API for running a fundraising
//! event: syncing participants from the remote registration service,
//! recording check-ins and donations, and caching everything locally so
//! staff devices keep working between syncs.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod scan;
pub mod sheet;
pub mod storage;
pub mod types;

pub use api::ApiClient;
pub use app::App;
pub use config::AppConfig;
pub use error::{GalaError, Result};
pub use types::{Participant, Role, RosterStats};
