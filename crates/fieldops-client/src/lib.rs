//! HTTP implementations of the field, drone, mission and planner
//! collaborators.

pub mod client;
pub mod config;

pub use client::HttpBackend;
pub use config::Config;
