//! Request extractors whose failures render as [`ApiError`].

use axum::extract::FromRequest;

use crate::error::ApiError;

/// A JSON request body. A missing content type or a body that does not
/// decode answers `400` with the usual `{ "error", "status" }` body
/// instead of Axum's plain-text rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
