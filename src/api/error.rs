//! Plain-text error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use crate::errors::Error;

impl Error {
    /// HTTP status reported to callers for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidDate { .. } | Self::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            Self::NoStatusRecorded => StatusCode::NOT_FOUND,
            Self::OverQuota => StatusCode::SERVICE_UNAVAILABLE,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if matches!(self, Self::OverQuota) {
            warn!("Storage over quota");
        } else if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, self.to_string()).into_response()
    }
}
