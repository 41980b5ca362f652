//! Outbound call infrastructure

mod client;

pub use client::{CallApiConfig, HttpDialer};
