//! shortlink - a URL shortener with custom slugs, lazy expiry and per-client
//! rate limiting.

pub mod admin;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware_impls;
pub mod models;
pub mod rate_limit;
pub mod routes;
pub mod server;
pub mod services;
pub mod state;
pub mod store;
pub mod telemetry;
