use crate::metrics;
use crate::model::{HistoryResponse, Snapshot, WeatherView};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tokio::sync::watch;
use tracing::error;

#[derive(Debug, Clone)]
struct AppState {
    snapshots: watch::Receiver<Snapshot>,
}

pub fn create_router(snapshots: watch::Receiver<Snapshot>) -> Router {
    let state = AppState { snapshots };

    Router::new()
        .route("/api/v1/dashboard", get(get_dashboard))
        .route("/api/v1/history", get(get_history))
        .route("/api/v1/weather", get(get_weather))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

async fn get_dashboard(State(state): State<AppState>) -> Json<Snapshot> {
    Json(state.snapshots.borrow().clone())
}

async fn get_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    Json(state.snapshots.borrow().history.clone())
}

/// A report fetched earlier is still served after a failed refresh.
async fn get_weather(State(state): State<AppState>) -> Result<Json<WeatherView>, AppError> {
    let (weather, weather_error) = {
        let snapshot = state.snapshots.borrow();
        (snapshot.weather.clone(), snapshot.weather_error.clone())
    };

    match (weather, weather_error) {
        (Some(weather), _) => Ok(Json(weather)),
        (None, Some(message)) => Err(ApiError::WeatherUnavailable(message).into()),
        (None, None) => Err(ApiError::NoWeather.into()),
    }
}

async fn metrics_handler() -> Result<String, AppError> {
    Ok(metrics::gather_metrics()?)
}

/// Failures with a status of their own. Anything else is a 500.
#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error("No weather data yet")]
    NoWeather,
    #[error("Error loading weather: {0}")]
    WeatherUnavailable(String),
}

struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<ApiError>() {
            Some(ApiError::NoWeather) => StatusCode::NOT_FOUND,
            Some(ApiError::WeatherUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            None => {
                error!("API error: {:#}", self.0);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Internal server error: {}", self.0),
                )
                    .into_response();
            }
        };
        (status, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
