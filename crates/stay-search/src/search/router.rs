use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use tracing::{error, warn};

use super::domain::SearchRequest;
use super::service::{SearchError, SearchService};

pub const SEARCH_PATH: &str = "/api/v1/property-search";

/// Router exposing the property search contract with CORS headers on every reply.
pub fn search_router(service: Arc<SearchService>) -> Router {
    Router::new()
        .route(SEARCH_PATH, post(search_handler).options(preflight_handler))
        .layer(middleware::map_response(with_cors_headers))
        .with_state(service)
}

pub(crate) async fn search_handler(
    State(service): State<Arc<SearchService>>,
    body: Bytes,
) -> Response {
    let request: SearchRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => return SearchError::MalformedRequest(err.to_string()).into_response(),
    };

    match service.search(&request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}

async fn with_cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    response
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = match &self {
            SearchError::MissingDestination => {
                warn!("search rejected: destination missing");
                StatusCode::BAD_REQUEST
            }
            SearchError::MalformedRequest(detail) => {
                error!(%detail, "search request could not be read");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
