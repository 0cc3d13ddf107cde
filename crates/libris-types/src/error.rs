use serde::Serialize;

/// Rejection of a single input value.
///
/// `field` is `None` when the problem concerns the payload as a whole
/// (e.g. an update with nothing to change).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("Invalid {}: {reason}", .field.as_deref().unwrap_or("payload"))]
pub struct ValidationError {
    pub field: Option<String>,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &str, reason: impl Into<String>) -> Self {
        ValidationError {
            field: Some(field.to_string()),
            reason: reason.into(),
        }
    }

    pub fn payload(reason: impl Into<String>) -> Self {
        ValidationError {
            field: None,
            reason: reason.into(),
        }
    }

    pub fn required(field: &str) -> Self {
        Self::new(field, "field is required")
    }

    pub fn is_for(&self, field: &str) -> bool {
        self.field.as_deref() == Some(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = ValidationError::new("isbn", "must be 13 digits");
        assert_eq!(e.to_string(), "Invalid isbn: must be 13 digits");
        let e = ValidationError::payload("at least one field required");
        assert_eq!(e.to_string(), "Invalid payload: at least one field required");
    }

    #[test]
    fn test_response_body() {
        let body = serde_json::to_value(ValidationError::required("title")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"field": "title", "reason": "field is required"})
        );
        let body = serde_json::to_value(ValidationError::payload("empty")).unwrap();
        assert_eq!(body, serde_json::json!({"field": null, "reason": "empty"}));
    }
}
