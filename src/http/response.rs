//! Canned response shapes.
//!
//! # Design Decisions
//! - Payloads are plain serializable structs so handlers can return them
//!   directly or embed them in larger bodies
//! - The HTTP status is taken from the payload's `code`

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Conventional error payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErrorReply {
    pub error: &'static str,
    pub code: u16,
    pub expose: bool,
}

/// Conventional success payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusReply {
    pub status: &'static str,
    pub code: u16,
}

pub const INVALID_REQUEST: ErrorReply = ErrorReply {
    error: "Invalid request",
    code: 400,
    expose: true,
};

pub const FORBIDDEN: ErrorReply = ErrorReply {
    error: "Forbidden to unauthorised users",
    code: 403,
    expose: true,
};

pub const PAYLOAD_TOO_LARGE: ErrorReply = ErrorReply {
    error: "Payload too large",
    code: 413,
    expose: true,
};

pub const SUCCESS: StatusReply = StatusReply {
    status: "Success",
    code: 200,
};

const NOT_FOUND: ErrorReply = ErrorReply {
    error: "Not found",
    code: 404,
    expose: true,
};

fn status_of(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for ErrorReply {
    fn into_response(self) -> Response {
        (status_of(self.code), Json(self)).into_response()
    }
}

impl IntoResponse for StatusReply {
    fn into_response(self) -> Response {
        (status_of(self.code), Json(self)).into_response()
    }
}

/// Answer for a request no binding responded to.
pub fn not_found() -> Response {
    NOT_FOUND.into_response()
}
