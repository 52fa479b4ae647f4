//! Transport client for the member query endpoint.
//!
//! This module provides the `Transport` trait, its reqwest-backed
//! implementation `ApiClient`, and the `FetchError` taxonomy every fetch
//! failure is normalized into. Requests take a cancellation token; no
//! request is ever retried at this layer.

pub mod client;
pub mod error;

pub use client::{ApiClient, Transport};
pub use error::{FetchError, GENERIC_ERROR_MESSAGE, NETWORK_ERROR_MESSAGE, NOT_FOUND_MESSAGE};
