use axum::response::Json as ResponseJson;
use serde::Serialize;

use crate::validation::PageRequest;

/// Success body shared by every JSON endpoint. Failures are rendered by
/// [`crate::errors::ApiError`] as `{"success": false, "error": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> ResponseJson<Self> {
        ResponseJson(Self {
            success: true,
            message: None,
            data,
        })
    }

    pub fn with_message(data: T, message: impl Into<String>) -> ResponseJson<Self> {
        ResponseJson(Self {
            success: true,
            message: Some(message.into()),
            data,
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(request: &PageRequest, total: u64) -> Self {
        let pages = total.div_ceil(u64::from(request.per_page));
        Self {
            page: request.page,
            per_page: request.per_page,
            total,
            pages,
            has_next: u64::from(request.page) < pages,
            has_prev: request.page > 1,
        }
    }
}
