use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    pub title: String,
    pub image_url: String,
    pub download_url: String,
    pub category: String,
    pub developer: Option<String>,
    pub description: Option<String>,
    pub youtube_url: Option<String>,
    pub order: Option<i32>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGameRequest {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub download_url: Option<String>,
    pub category: Option<String>,
    pub developer: Option<String>,
    pub description: Option<String>,
    pub youtube_url: Option<String>,
    pub order: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderEntry {
    pub id: i32,
    pub order: i32,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub orders: Vec<ReorderEntry>,
}

#[derive(Debug, Deserialize)]
pub struct GameListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PromoteAdminRequest {
    pub email: String,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveAdminRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateAdminRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AdminCreatedResponse {
    pub id: String,
    pub email: String,
}
