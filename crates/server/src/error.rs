use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use poolsafe_coordinator::CoordinatorError;
use serde::Serialize;

/// Error envelope returned to HTTP callers. `code` is the stable
/// machine-readable condition clients branch on.
#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
}

#[derive(Debug)]
pub(crate) struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn not_found(tx_hash: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ErrorBody {
                code: "not-found",
                message: format!("transaction {tx_hash} not found"),
                retryable: false,
            },
        }
    }
}

impl From<CoordinatorError> for ApiError {
    fn from(err: CoordinatorError) -> Self {
        let status = match err.code() {
            "invalid-hash" | "invalid-address" | "invalid-call" => StatusCode::BAD_REQUEST,
            "not-found" => StatusCode::NOT_FOUND,
            "not-an-owner" => StatusCode::FORBIDDEN,
            "already-signed" | "not-pending" | "already-executed" | "not-ready" | "expired"
            | "insufficient-signatures" => StatusCode::CONFLICT,
            "invalid-signature" | "wallet-misconfigured" => StatusCode::UNPROCESSABLE_ENTITY,
            "provider-error" | "execution-failed" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self {
            status,
            body: ErrorBody {
                code: err.code(),
                message: err.to_string(),
                retryable: err.is_retryable(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(code = self.body.code, "server error: {}", self.body.message);
        } else {
            tracing::warn!(code = self.body.code, "client error: {}", self.body.message);
        }

        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poolsafe_store::StateError;

    #[test]
    fn state_conflicts_map_to_conflict_status() {
        let err = ApiError::from(CoordinatorError::State(StateError::AlreadyExecuted));
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.body.code, "already-executed");
        assert!(!err.body.retryable);
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let err = ApiError::from(CoordinatorError::InvalidHash("0x12".to_string()));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
