//! Twitter/X API v2 integration: post creation with OAuth 1.0a user context.
pub mod client;
pub mod types;

pub use client::TwitterApi;
