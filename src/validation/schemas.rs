//! Built-in schemas
//!
//! | Schema        | Fields                                   | Required |
//! |---------------|------------------------------------------|----------|
//! | `create_user` | email, name, password                    | all      |
//! | `update_user` | email, name                              | none     |
//! | `login`       | email, password                          | both     |
//! | `pagination`  | page, limit                              | neither  |
//! | `search`      | query, filters                           | query    |
//! | `file_upload` | file, maxSize, allowedTypes              | none     |
//! | `environment` | NODE_ENV, DATABASE_URL, JWT_SECRET, API_BASE_URL | all |
//!
//! `update_user` is derived from `create_user`, never declared by hand.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::SchemaResult;
use super::rules::Rule;
use super::types::{FieldDef, Schema};

pub const MAX_NAME_LENGTH: usize = 50;
pub const MAX_QUERY_LENGTH: usize = 100;
pub const MAX_FILE_NAME_LENGTH: usize = 255;
pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;
/// 5 MiB
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 5 * 1024 * 1024;
pub const DEFAULT_ALLOWED_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/gif"];
pub const MIN_JWT_SECRET_LENGTH: usize = 32;
pub const NODE_ENVS: [&str; 3] = ["development", "production", "test"];

pub fn create_user() -> SchemaResult<Schema> {
    Ok(Schema::new(
        "create_user",
        vec![
            FieldDef::required("email", Rule::email()),
            FieldDef::required("name", Rule::text(1, MAX_NAME_LENGTH)),
            FieldDef::required("password", Rule::password()),
        ],
    )?
    .describe("User registration payload"))
}

/// `create_user` restricted to email and name, every field optional.
pub fn update_user() -> SchemaResult<Schema> {
    Ok(create_user()?
        .pick("update_user", &["email", "name"])?
        .make_all_optional()
        .describe("Partial user update payload"))
}

/// Login checks password presence only, never strength.
pub fn login() -> SchemaResult<Schema> {
    Ok(Schema::new(
        "login",
        vec![
            FieldDef::required("email", Rule::email()),
            FieldDef::required("password", Rule::non_empty()),
        ],
    )?
    .describe("Login credentials"))
}

pub fn pagination() -> SchemaResult<Schema> {
    Ok(Schema::new(
        "pagination",
        vec![
            FieldDef::with_default("page", Rule::positive_int(), DEFAULT_PAGE),
            FieldDef::with_default("limit", Rule::positive_int_max(MAX_LIMIT), DEFAULT_LIMIT),
        ],
    )?
    .describe("Page selection for list endpoints"))
}

/// `filters` is an open key-value map passed through unvalidated.
pub fn search() -> SchemaResult<Schema> {
    Ok(Schema::new(
        "search",
        vec![
            FieldDef::required("query", Rule::text(1, MAX_QUERY_LENGTH)),
            FieldDef::optional("filters", Rule::record()),
        ],
    )?
    .describe("Free-text search with optional filters"))
}

/// Metadata of an uploaded file, as reported by the client.
pub fn file_descriptor() -> SchemaResult<Schema> {
    Schema::new(
        "file",
        vec![
            FieldDef::required("name", Rule::text(1, MAX_FILE_NAME_LENGTH)),
            FieldDef::required("size", Rule::positive_int()),
            FieldDef::required("contentType", Rule::non_empty()),
        ],
    )
}

pub fn file_upload() -> SchemaResult<Schema> {
    Ok(Schema::new(
        "file_upload",
        vec![
            FieldDef::optional("file", Rule::object(file_descriptor()?)),
            FieldDef::with_default("maxSize", Rule::positive_number(), DEFAULT_MAX_UPLOAD_SIZE),
            FieldDef::with_default(
                "allowedTypes",
                Rule::string_list(),
                DEFAULT_ALLOWED_TYPES.to_vec(),
            ),
        ],
    )?
    .describe("File upload constraints"))
}

/// Required process configuration keys.
pub fn environment() -> SchemaResult<Schema> {
    Ok(Schema::new(
        "environment",
        vec![
            FieldDef::required("NODE_ENV", Rule::one_of(&NODE_ENVS)),
            FieldDef::required("DATABASE_URL", Rule::url()),
            FieldDef::required("JWT_SECRET", Rule::min_length(MIN_JWT_SECRET_LENGTH)),
            FieldDef::required("API_BASE_URL", Rule::url()),
        ],
    )?
    .describe("Process environment"))
}

/// Every built-in schema.
pub fn builtins() -> SchemaResult<Vec<Schema>> {
    Ok(vec![
        create_user()?,
        update_user()?,
        login()?,
        pagination()?,
        search()?,
        file_upload()?,
        environment()?,
    ])
}

/// Decoded `create_user` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Decoded `update_user` payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UpdateUserRequest {
    /// True when the update would change nothing
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none()
    }
}

/// Decoded `login` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Decoded `pagination` parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    pub page: u64,
    pub limit: u64,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE as u64,
            limit: DEFAULT_LIMIT as u64,
        }
    }
}

impl PaginationParams {
    /// Number of rows to skip
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// Decoded `search` parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub name: String,
    pub size: u64,
    pub content_type: String,
}

/// Decoded `file_upload` parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileDescriptor>,
    pub max_size: f64,
    pub allowed_types: Vec<String>,
}

impl FileUploadParams {
    /// Whether the described file fits the size and type limits
    pub fn accepts(&self, file: &FileDescriptor) -> bool {
        (file.size as f64) <= self.max_size
            && self.allowed_types.iter().any(|t| t == &file.content_type)
    }
}
