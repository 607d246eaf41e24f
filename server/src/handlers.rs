//! HTTP handlers for the items API.

use std::collections::BTreeMap;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::simulate::{pause, whole_millis, Outcome};
use crate::state::AppState;
use crate::store::Item;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceInfo {
    pub message: String,
    pub endpoints: BTreeMap<String, String>,
}

/// Body of `POST /api/items`. `name` is optional here so that a missing field
/// reaches `validate` and is reported per field instead of as a parse error.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItemRequest {
    #[serde(default)]
    pub name: Option<String>,
}

impl CreateItemRequest {
    /// Returns the item name, or the field errors that stop it reaching the store.
    pub fn validate(self) -> Result<String, ApiError> {
        match self.name {
            Some(name) if !name.trim().is_empty() => Ok(name),
            _ => Err(ApiError::invalid_field("name", "Name is required")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestData {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub random: f64,
}

pub async fn root() -> Json<ServiceInfo> {
    let endpoints = [
        ("GET /api/items", "Get all items"),
        ("GET /api/test", "Random success/error for testing"),
        ("POST /api/items", "Create new item"),
        ("DELETE /api/items/:id", "Delete item"),
    ]
    .into_iter()
    .map(|(route, description)| (route.to_string(), description.to_string()))
    .collect();

    Json(ServiceInfo {
        message: "API Server is running!".to_string(),
        endpoints,
    })
}

pub async fn list_items(State(state): State<AppState>) -> Json<Envelope<Vec<Item>>> {
    let latency = state.delays.sample_latency(state.random.as_ref());
    debug!(latency_ms = whole_millis(latency), "delaying item listing");
    pause(latency).await;

    Json(Envelope::listing(state.store.list_all().await))
}

pub async fn test_outcome(
    State(state): State<AppState>,
) -> Result<Json<Envelope<TestData>>, ApiError> {
    let draw = state.random.next_f64();
    match Outcome::from_draw(draw) {
        Outcome::Success => Ok(Json(Envelope::success(
            TestData {
                timestamp: chrono::Utc::now().timestamp_millis(),
                random: draw,
            },
            "Request successful!",
        ))),
        Outcome::ServerError => Err(ApiError::SimulatedServerError),
        Outcome::Timeout => {
            debug!(delay_ms = whole_millis(state.delays.timeout), "simulating timeout");
            pause(state.delays.timeout).await;
            Err(ApiError::SimulatedTimeout)
        }
    }
}

pub async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<CreateItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Item>>), ApiError> {
    let Json(request) = payload?;
    let name = request.validate()?;

    let item = state.store.create(name).await;
    info!(id = item.id, name = %item.name, "item created");
    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(item, "Item created successfully")),
    ))
}

pub async fn delete_item(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Envelope<Item>>, ApiError> {
    let Path(id) = id?;
    // ids are issued from 1 upwards, so a negative id simply matches nothing
    let id = u64::try_from(id).map_err(|_| ApiError::ItemNotFound)?;

    let item = state.store.delete(id).await.ok_or(ApiError::ItemNotFound)?;
    info!(id = item.id, "item deleted");
    Ok(Json(Envelope::success(item, "Item deleted successfully")))
}

pub async fn endpoint_not_found() -> ApiError {
    ApiError::EndpointNotFound
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> CreateItemRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn validate_accepts_a_name() {
        assert_eq!(request(r#"{"name":"Task 4"}"#).validate().unwrap(), "Task 4");
    }

    #[test]
    fn validate_rejects_missing_name() {
        let err = request("{}").validate().unwrap_err();
        match err {
            ApiError::Validation(fields) => assert_eq!(fields["name"], "Name is required"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_blank_names() {
        assert!(request(r#"{"name":""}"#).validate().is_err());
        assert!(request(r#"{"name":"   "}"#).validate().is_err());
        assert!(request(r#"{"name":null}"#).validate().is_err());
    }

    #[test]
    fn test_data_serializes_timestamp_and_draw() {
        let value = serde_json::to_value(TestData {
            timestamp: 1_700_000_000_000,
            random: 0.5,
        })
        .unwrap();
        assert_eq!(value["timestamp"], 1_700_000_000_000_i64);
        assert_eq!(value["random"], 0.5);
    }
}
