use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::config::ForecastConfig;
use crate::context::{AppContext, HistoricalData};
use crate::error::{Result, WebError};
use crate::formatter::{HtmlFormatter, JsonFormatter, ReportFormatter, StatusView};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<AppContext>,
    /// Renders `/` and `/forecast`
    pub pages: Arc<dyn ReportFormatter>,
    /// Renders the `/api` views
    pub api: Arc<dyn ReportFormatter>,
}

impl AppState {
    pub fn new(context: Arc<AppContext>) -> Self {
        Self::with_formatters(context, Arc::new(HtmlFormatter), Arc::new(JsonFormatter))
    }

    pub fn with_formatters(
        context: Arc<AppContext>,
        pages: Arc<dyn ReportFormatter>,
        api: Arc<dyn ReportFormatter>,
    ) -> Self {
        Self { context, pages, api }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ForecastQuery {
    pub weeks: Option<String>,
}

/// Requested horizon, or the configured default when absent
pub fn parse_weeks(raw: Option<&str>, config: &ForecastConfig) -> Result<usize> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(config.horizon_weeks),
        Some(raw) => raw,
    };

    let weeks: usize = raw
        .parse()
        .map_err(|_| WebError::InvalidQuery(format!("weeks must be a whole number, got '{}'", raw)))?;

    if weeks == 0 || weeks > config.max_horizon_weeks {
        return Err(WebError::InvalidQuery(format!(
            "weeks must be between 1 and {}, got {}",
            config.max_horizon_weeks, weeks
        )));
    }

    Ok(weeks)
}

/// Run pipeline work on the blocking pool
async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await?
}

fn render(formatter: &dyn ReportFormatter, status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, formatter.content_type())], body).into_response()
}

fn render_error(formatter: &dyn ReportFormatter, err: WebError) -> Response {
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!(error = %err, "page failed");
    } else {
        tracing::warn!(error = %err, "page request rejected");
    }
    render(formatter, status, formatter.error_page(&err.to_string()))
}

async fn status_view(context: Arc<AppContext>) -> Result<StatusView> {
    run_blocking(move || context.history().map(|data| StatusView::from_history(&data))).await
}

async fn render_forecast(
    state: &AppState,
    formatter: &dyn ReportFormatter,
    weeks: Option<&str>,
) -> Result<String> {
    let weeks = parse_weeks(weeks, &state.context.config().forecast)?;
    let context = Arc::clone(&state.context);
    let report = run_blocking(move || context.forecast(weeks)).await?;
    formatter.forecast_page(&report)
}

/// GET /
/// Data status page; load failures are shown on the page itself
pub async fn index(State(state): State<AppState>) -> Response {
    let view = status_view(Arc::clone(&state.context)).await;

    let message;
    let status = match &view {
        Ok(view) => Ok(view),
        Err(err) => {
            message = err.to_string();
            Err(message.as_str())
        }
    };

    match state.pages.status_page(status) {
        Ok(body) => render(state.pages.as_ref(), StatusCode::OK, body),
        Err(err) => render_error(state.pages.as_ref(), err),
    }
}

/// GET /forecast?weeks=N
pub async fn forecast_page(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Response {
    match render_forecast(&state, state.pages.as_ref(), query.weeks.as_deref()).await {
        Ok(body) => render(state.pages.as_ref(), StatusCode::OK, body),
        Err(err) => render_error(state.pages.as_ref(), err),
    }
}

/// GET /api/status
pub async fn api_status(State(state): State<AppState>) -> Result<Response> {
    let view = status_view(Arc::clone(&state.context)).await?;
    let body = state.api.status_page(Ok(&view))?;
    Ok(render(state.api.as_ref(), StatusCode::OK, body))
}

/// GET /api/history
/// Returns the summary and the full weekly series
pub async fn api_history(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let context = Arc::clone(&state.context);
    let data = run_blocking(move || context.history()).await?;
    Ok(Json(HistoricalData::clone(&data)))
}

/// GET /api/forecast?weeks=N
pub async fn api_forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Result<Response> {
    let body = render_forecast(&state, state.api.as_ref(), query.weeks.as_deref()).await?;
    Ok(render(state.api.as_ref(), StatusCode::OK, body))
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "history_initialized": state.context.is_initialized(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weeks() {
        let config = ForecastConfig::default();

        assert_eq!(parse_weeks(None, &config).unwrap(), config.horizon_weeks);
        assert_eq!(parse_weeks(Some(""), &config).unwrap(), config.horizon_weeks);
        assert_eq!(parse_weeks(Some(" 8 "), &config).unwrap(), 8);
        assert_eq!(
            parse_weeks(Some("104"), &config).unwrap(),
            config.max_horizon_weeks
        );

        for bad in ["0", "105", "-1", "ten", "1.5"] {
            assert!(
                matches!(parse_weeks(Some(bad), &config), Err(WebError::InvalidQuery(_))),
                "{} should be rejected",
                bad
            );
        }
    }
}
