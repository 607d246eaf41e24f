//! Stateless HTTP request builder and response parser for the items API.
//!
//! # Design
//! `ItemsClient` holds only a `base_url`. Each endpoint is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`, so the I/O boundary stays with the caller.
//! Error responses are decoded from the server's envelope when it is present.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;

use crate::error::{default_message, ApiError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateItem, Envelope, Item, ItemList, ServiceInfo, TestData};

/// Synchronous, stateless client for the items API.
#[derive(Debug, Clone)]
pub struct ItemsClient {
    base_url: String,
}

impl ItemsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_service_info(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/")
    }

    pub fn build_list_items(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/api/items")
    }

    pub fn build_create_item(&self, input: &CreateItem) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let mut request = self.request(HttpMethod::Post, "/api/items");
        request
            .headers
            .push(("content-type".to_string(), "application/json".to_string()));
        request.body = Some(body);
        Ok(request)
    }

    pub fn build_delete_item(&self, id: u64) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/api/items/{id}"))
    }

    pub fn build_test(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/api/test")
    }

    pub fn parse_service_info(&self, response: HttpResponse) -> Result<ServiceInfo, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn parse_list_items(&self, response: HttpResponse) -> Result<ItemList, ApiError> {
        let envelope: Envelope<Vec<Item>> = parse_envelope(&response, 200)?;
        let items = envelope
            .data
            .ok_or_else(|| ApiError::Deserialization("missing data".to_string()))?;
        let count = envelope.count.unwrap_or(items.len());
        Ok(ItemList { items, count })
    }

    pub fn parse_create_item(&self, response: HttpResponse) -> Result<Item, ApiError> {
        parse_data(&response, 201)
    }

    pub fn parse_delete_item(&self, response: HttpResponse) -> Result<Item, ApiError> {
        parse_data(&response, 200)
    }

    pub fn parse_test(&self, response: HttpResponse) -> Result<TestData, ApiError> {
        parse_data(&response, 200)
    }
}

fn parse_envelope<T: DeserializeOwned>(
    response: &HttpResponse,
    expected: u16,
) -> Result<Envelope<T>, ApiError> {
    check_status(response, expected)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

fn parse_data<T: DeserializeOwned>(response: &HttpResponse, expected: u16) -> Result<T, ApiError> {
    parse_envelope(response, expected)?
        .data
        .ok_or_else(|| ApiError::Deserialization("missing data".to_string()))
}

/// Map a non-expected status to the matching `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    Err(error_from_response(response))
}

fn error_from_response(response: &HttpResponse) -> ApiError {
    let status = response.status;
    let envelope: Option<Envelope<serde_json::Value>> = serde_json::from_str(&response.body).ok();
    let message = envelope
        .as_ref()
        .and_then(|e| e.message.clone())
        .unwrap_or_else(|| default_message(status).to_string());

    match status {
        400 => {
            let fields: BTreeMap<String, String> = envelope
                .and_then(|e| e.data)
                .and_then(|data| serde_json::from_value(data).ok())
                .unwrap_or_default();
            ApiError::Validation { message, fields }
        }
        404 => ApiError::NotFound { message },
        408 => ApiError::Timeout { message },
        _ => ApiError::Http {
            status,
            message,
            detail: envelope.and_then(|e| e.error),
        },
    }
}
