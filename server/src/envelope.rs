//! The uniform JSON wrapper every `/api` response is sent in.
//!
//! Fields a response does not use are left out of the JSON entirely.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// `{success: true, data, message}`
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            count: None,
            error: None,
        }
    }

    /// `{success: false, message}`
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            count: None,
            error: None,
        }
    }

    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

impl<T> Envelope<Vec<T>> {
    /// `{success: true, data, count}` with `count` taken from the list itself.
    pub fn listing(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: Some(data.len()),
            data: Some(data),
            message: None,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn listing_counts_its_data() {
        let value = serde_json::to_value(Envelope::listing(vec![1, 2, 3])).unwrap();
        assert_eq!(value, json!({"success": true, "data": [1, 2, 3], "count": 3}));
    }

    #[test]
    fn failure_omits_unused_fields() {
        let value = serde_json::to_value(Envelope::<()>::failure("Item not found")).unwrap();
        assert_eq!(value, json!({"success": false, "message": "Item not found"}));
    }

    #[test]
    fn failure_with_error_detail() {
        let envelope = Envelope::<()>::failure("Internal server error")
            .with_error("Database connection failed");
        let value = serde_json::to_value(envelope).unwrap();
        assert_eq!(value["error"], "Database connection failed");
        assert!(value.get("data").is_none());
        assert!(value.get("count").is_none());
    }
}
