use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sales_forecast::SalesError;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WebError>;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Loading the historical data failed; shared by every later request
    #[error("Historical data unavailable: {0}")]
    DataUnavailable(Arc<SalesError>),

    #[error("Forecast failed: {0}")]
    Forecast(#[from] SalesError),

    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl WebError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            WebError::DataUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            WebError::Forecast(SalesError::InvalidParameter(_)) => StatusCode::BAD_REQUEST,
            WebError::Forecast(e) if e.is_data_error() => StatusCode::UNPROCESSABLE_ENTITY,
            WebError::Forecast(SalesError::ForecastingError(_) | SalesError::MathError(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            // Misaligned series or entries are produced by the pipeline itself
            WebError::Forecast(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WebError::Render(_) | WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for WebError {
    fn from(err: serde_json::Error) -> Self {
        WebError::Render(err.to_string())
    }
}

impl From<tokio::task::JoinError> for WebError {
    fn from(err: tokio::task::JoinError) -> Self {
        WebError::Internal(err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            WebError::InvalidQuery("weeks".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebError::DataUnavailable(Arc::new(SalesError::EmptyInput("no rows".into())))
                .status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            WebError::from(SalesError::ForecastingError("too short".into())).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            WebError::from(SalesError::ParseError("week out of range".into())).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            WebError::from(SalesError::InvalidParameter("alpha".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_pipeline_invariant_errors_are_internal() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        let err = WebError::from(SalesError::DisjointSeries {
            forecast_start: date,
            history_end: date,
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = WebError::from(SalesError::InvalidEntry {
            date,
            reason: "missing prediction".into(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
