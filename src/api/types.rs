use axum::{
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::models::PhotoRecord;

use super::ApiError;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }
}

/// Photo as sent to the browser, with the image URL resolved server-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PhotoDto {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub secret: String,
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub farm: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub is_public: i32,
    #[serde(default)]
    pub is_friend: i32,
    #[serde(default)]
    pub is_family: i32,
    #[serde(default)]
    pub image_url: String,
}

impl From<PhotoRecord> for PhotoDto {
    fn from(photo: PhotoRecord) -> Self {
        let image_url = photo.image_url();
        Self {
            id: photo.id,
            owner: photo.owner,
            secret: photo.secret,
            server: photo.server,
            farm: photo.farm,
            title: photo.title,
            is_public: photo.is_public,
            is_friend: photo.is_friend,
            is_family: photo.is_family,
            image_url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: String,
}

/// JSON response with an explicit UTF-8 charset.
///
/// The whole body is serialized before any byte is sent, so a serialization
/// failure becomes an error response instead of a truncated 200.
pub struct Utf8Json(pub Vec<u8>);

impl Utf8Json {
    pub fn from_value<T: Serialize>(value: &T) -> Result<Self, ApiError> {
        serde_json::to_vec(value)
            .map(Self)
            .map_err(|e| ApiError::internal(format!("Failed to serialize response: {e}")))
    }
}

impl IntoResponse for Utf8Json {
    fn into_response(self) -> Response {
        (
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json; charset=utf-8"),
            )],
            self.0,
        )
            .into_response()
    }
}
