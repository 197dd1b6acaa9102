//! Client library for the remote service configuration API.
//!
//! The engine in `cdnsync` is written against the [`ConfigApi`] trait;
//! [`HttpApi`] is the implementation that talks to the real service.

pub mod client;
pub mod error;
pub mod http;
pub mod schema;

pub use client::ConfigApi;
pub use error::{ApiError, Result};
pub use http::HttpApi;
