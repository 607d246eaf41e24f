//! Wire types for the items API.
//!
//! # Design
//! These mirror the server's JSON but are defined independently so the client
//! never depends on axum. The integration test against the live server
//! catches any schema drift between the two crates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: u64,
    pub name: String,
    pub completed: bool,
}

/// Request payload for creating an item. The server assigns `id` and always
/// starts the item as not completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItem {
    pub name: String,
}

/// The uniform wrapper around every `/api` response, successful or not.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub count: Option<usize>,
    pub error: Option<String>,
}

/// Result of `GET /api/items`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemList {
    pub items: Vec<Item>,
    pub count: usize,
}

/// Payload of a successful `GET /api/test`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestData {
    /// Server clock, milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// The draw that produced the success, in `(0.3, 1)`.
    pub random: f64,
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceInfo {
    pub message: String,
    pub endpoints: BTreeMap<String, String>,
}
