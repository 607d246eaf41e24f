//! Synchronous API client core for the items service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `ItemsClient` is stateless; it holds only `base_url`.
//! - Each endpoint is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit.
//! - Error responses are decoded from the server's envelope into `ApiError`.
//! - `RetryPolicy` decides when a failed call is attempted again; the host
//!   supplies the executor and the sleeper.

pub mod client;
pub mod error;
pub mod http;
pub mod retry;
pub mod types;

pub use client::ItemsClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use retry::RetryPolicy;
pub use types::{CreateItem, Envelope, Item, ItemList, ServiceInfo, TestData};
