//! HTTP layer for the messages endpoint
//!
//! Owns the pooled connection resource and turns raw HTTP outcomes into
//! crate errors. Non-success statuses keep their full body. Every request
//! carries an `X-Request-ID` so log lines can be matched to it.

pub mod client;
pub mod error;

pub use client::HttpClient;
