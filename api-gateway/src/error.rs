//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use flightsure_common::LedgerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Ledger(e) => match e {
                LedgerError::Unauthorized { .. } | LedgerError::NotOwner { .. } => {
                    StatusCode::FORBIDDEN
                }
                LedgerError::NotOperational => StatusCode::SERVICE_UNAVAILABLE,
                LedgerError::InsufficientCredits { .. }
                | LedgerError::InsufficientReserve { .. } => StatusCode::CONFLICT,
                LedgerError::UnknownAirline { .. } => StatusCode::NOT_FOUND,
                LedgerError::ArithmeticOverflow => StatusCode::UNPROCESSABLE_ENTITY,
                LedgerError::TransferFailed(_) => StatusCode::BAD_GATEWAY,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flightsure_common::AccountId;

    #[test]
    fn test_status_mapping() {
        let id = AccountId::from_label("x");
        let cases = [
            (LedgerError::Unauthorized { caller: id }, StatusCode::FORBIDDEN),
            (LedgerError::NotOwner { caller: id }, StatusCode::FORBIDDEN),
            (LedgerError::NotOperational, StatusCode::SERVICE_UNAVAILABLE),
            (LedgerError::InsufficientCredits { insuree: id }, StatusCode::CONFLICT),
            (LedgerError::ArithmeticOverflow, StatusCode::UNPROCESSABLE_ENTITY),
            (LedgerError::UnknownAirline { airline: id }, StatusCode::NOT_FOUND),
            (LedgerError::TransferFailed("down".into()), StatusCode::BAD_GATEWAY),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }
}
