//! Request extractors whose rejections use the same generic Dari message as handler errors.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use api_shared::messages;

/// A request that could not be decoded. Answers `400` with [`messages::INVALID_INPUT`].
#[derive(Debug)]
pub(crate) struct BadRequest;

impl IntoResponse for BadRequest {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, messages::INVALID_INPUT).into_response()
    }
}

impl From<JsonRejection> for BadRequest {
    fn from(rejection: JsonRejection) -> Self {
        tracing::error!("rejected request body: {rejection}");
        Self
    }
}

impl From<QueryRejection> for BadRequest {
    fn from(rejection: QueryRejection) -> Self {
        tracing::error!("rejected query string: {rejection}");
        Self
    }
}

impl From<PathRejection> for BadRequest {
    fn from(rejection: PathRejection) -> Self {
        tracing::error!("rejected path parameter: {rejection}");
        Self
    }
}

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(BadRequest))]
pub(crate) struct JsonBody<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(BadRequest))]
pub(crate) struct QueryParams<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(BadRequest))]
pub(crate) struct PathParam<T>(pub T);
