//! Response post-processing for axum services.
//!
//! ```rust,ignore
//! use axum::{middleware, Router};
//!
//! let app = Router::new()
//!     .route("/events", get(list_events))
//!     .layer(middleware::from_fn(dynamap::strip_metadata_layer));
//! ```

use axum::body::{to_bytes, Body};
use axum::extract::Request;
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use dynamap_core::strip::{contains_metadata, strip_metadata};

/// Removes entity metadata from JSON response bodies.
///
/// Responses without a JSON content type, and bodies that fail to parse as
/// JSON, are passed through unchanged.
pub async fn strip_metadata_layer(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if !is_json(response.headers()) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(error = %err, "Failed to buffer response body");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let stripped = serde_json::from_slice::<Value>(&bytes)
        .ok()
        .filter(contains_metadata)
        .and_then(|value| serde_json::to_vec(&strip_metadata(&value)).ok());

    match stripped {
        Some(body) => {
            parts.headers.remove(header::CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(body))
        }
        None => Response::from_parts(parts, Body::from(bytes)),
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim();
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        })
        .unwrap_or(false)
}
