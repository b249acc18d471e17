//! # Catalogue Agent Library
//!
//! Client for the catalogue API: signs in with an API key and client id,
//! caches the bearer token, and proxies catalogue listing, SKU pulls and
//! customer-log queries, always answering with a uniform envelope.
//!
//! Modules:
//! - `cache` — token cache contract and in-memory store
//! - `auth` — sign-in and cache-aside token provider
//! - `dispatch` — outbound requests, retries, envelope decoding
//! - `catalogue` — the business operations
//! - `server` — HTTP proxy surface over the client

pub mod auth;
pub mod cache;
pub mod catalogue;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod helpers;
pub mod models;
pub mod observability;
pub mod resilience;
pub mod server;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::catalogue::CatalogueClient;
pub use crate::config::settings::ServiceConfig;
pub use crate::errors::CatalogueError;
pub use crate::models::ApiResponse;
