//! HTTP client for fetching release archives.

mod client;

pub use client::{BodyStream, HttpClient, USER_AGENT};
