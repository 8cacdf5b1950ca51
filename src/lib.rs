//! Credential-lookup authentication: resolve a login identifier (email) into
//! an authentication principal through a user record provider.
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
