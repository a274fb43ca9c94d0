//! Agricultural chatbot actions and historical weather utilities.
//!
//! - [`actions`]: per-intent handlers for the dialogue manager
//! - [`history`]: NASA POWER daily downloads
//! - [`indices`]: GDD, AGDD and accumulated precipitation, written to `.xlsx`
//! - [`service`]: MCP server exposing the actions as tools

pub mod actions;
pub mod config;
pub mod constants;
pub mod crops;
pub mod error;
pub mod formatters;
pub mod history;
pub mod http;
pub mod indices;
pub mod models;
pub mod resilience;
pub mod service;
pub mod storage;

pub use error::{Error, Result};
