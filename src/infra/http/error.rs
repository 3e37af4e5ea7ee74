use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const NOT_FOUND: &str = "not_found";
    pub const INVALID_SORT_FIELD: &str = "invalid_sort_field";
    pub const SEARCH_UNAVAILABLE: &str = "search_unavailable";
    pub const CACHE: &str = "cache_error";
    pub const INTERNAL: &str = "internal_error";
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hint: Option<String>,
}
