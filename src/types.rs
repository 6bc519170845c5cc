//! Shared API types
//!
//! Response envelopes and the user model exchanged between the users API and
//! the web frontend. Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::validation::schemas::{CreateUserRequest, PaginationParams, UpdateUserRequest};
use crate::validation::{FieldError, ValidationResult};

pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";

/// Error body carried by a failed `ApiResponse`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Field errors become `details`, one entry per error.
    pub fn validation(errors: &[FieldError]) -> Self {
        Self {
            code: VALIDATION_FAILED.into(),
            message: format!("{} field(s) failed validation", errors.len()),
            details: serde_json::to_value(errors).ok(),
        }
    }
}

/// Uniform response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<AppError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn failure(error: AppError) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(error.message.clone()),
            error: Some(error),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl From<ValidationResult> for ApiResponse<Map<String, Value>> {
    fn from(result: ValidationResult) -> Self {
        match result {
            ValidationResult::Success(data) => ApiResponse::ok(data),
            ValidationResult::Failure(errors) => ApiResponse::failure(AppError::validation(&errors)),
        }
    }
}

/// One page of a list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, params: &PaginationParams) -> Self {
        let total_pages = if params.limit == 0 {
            0
        } else {
            total.div_ceil(params.limit)
        };
        Self {
            items,
            total,
            page: params.page,
            limit: params.limit,
            total_pages,
        }
    }
}

/// Public user record. The password never leaves the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn from_request(request: &CreateUserRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: request.email.clone(),
            name: request.name.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the present fields; an empty update leaves `updated_at` alone.
    pub fn apply_update(&mut self, update: UpdateUserRequest) {
        if update.is_empty() {
            return;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validation_failure_envelope() {
        let result = ValidationResult::Failure(vec![FieldError::missing("email")]);
        let response: ApiResponse<Map<String, Value>> = result.into();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], VALIDATION_FAILED);
        assert_eq!(json["error"]["details"][0]["path"], "email");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_success_envelope() {
        let response = ApiResponse::ok(json!({"id": 1})).with_message("created");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["id"], 1);
        assert_eq!(json["message"], "created");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_total_pages() {
        let params = PaginationParams { page: 2, limit: 10 };
        let page = PaginatedResponse::new(vec![1, 2, 3], 21, &params);
        assert_eq!(page.total_pages, 3);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["totalPages"], 3);

        let empty: PaginatedResponse<u8> = PaginatedResponse::new(vec![], 0, &params);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_user_update() {
        let mut user = User::from_request(&CreateUserRequest {
            email: "test@example.com".into(),
            name: "John Doe".into(),
            password: "Password123".into(),
        });
        let created = user.updated_at;

        user.apply_update(UpdateUserRequest::default());
        assert_eq!(user.updated_at, created);

        user.apply_update(UpdateUserRequest {
            name: Some("Jane Doe".into()),
            ..Default::default()
        });
        assert_eq!(user.name, "Jane Doe");
        assert_eq!(user.email, "test@example.com");
        assert!(user.updated_at >= created);

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("password").is_none());
    }
}
