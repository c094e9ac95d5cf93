//! Response and request wrappers used by every collection endpoint.

use serde::{Deserialize, Serialize};

/// Pagination block of a collection response.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub page_count: u32,
    pub total: u64,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub pagination: Option<PaginationMeta>,
}

/// `{ data: [...], meta: { pagination } }`
#[derive(Clone, Debug, Deserialize)]
pub struct CollectionEnvelope<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Meta,
}

/// `{ data: {...} }`; `data` is `null` for a missing document.
#[derive(Clone, Debug, Deserialize)]
pub struct SingleEnvelope<T> {
    pub data: Option<T>,
}

/// Request body wrapper, `{ data: payload }`.
#[derive(Clone, Debug, Serialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ApiErrorDetail {
    pub status: Option<u16>,
    pub name: Option<String>,
    pub message: Option<String>,
}

/// Error body returned with non-success statuses.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    pub error: Option<ApiErrorDetail>,
}

impl ApiErrorBody {
    /// Extracts `error.message` from a raw body, if the body carries one.
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .and_then(|e| e.message)
            .filter(|m| !m.trim().is_empty())
    }
}

/// Joins a relative media path onto the media host. Absolute URLs pass through.
pub fn absolute_media_url(media_base_url: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }
    let base = media_base_url.trim_end_matches('/');
    if url.starts_with('/') {
        format!("{base}{url}")
    } else {
        format!("{base}/{url}")
    }
}

/// Uploaded file reference.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct MediaRecord {
    pub url: String,
}
