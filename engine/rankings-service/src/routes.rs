//! HTTP API
//!
//! - `GET /` banner
//! - `GET /health`
//! - `GET /power-rankings[?year=YYYY]` stored ranking of a season
//! - `POST /refresh` recompute the current season
//! - `GET /callback?code=...` echo of the OAuth authorization code

use rankings_store::RankingStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{error, info, warn};
use warp::http::StatusCode;
use warp::Filter;
use yahoo_fetcher::FetcherError;

use crate::error::{ApiRejection, ServiceError};
use crate::query::load_power_rankings;
use crate::refresh::RefreshService;

/// Query parameters of `GET /power-rankings`
#[derive(Debug, Deserialize)]
pub struct PowerRankingsParams {
    pub year: Option<i32>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    pub timestamp: String,
}

/// Error detail
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail { code: code.to_string(), message: message.into(), details: None },
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.error.details = Some(details);
        self
    }
}

fn reject(err: ServiceError) -> warp::Rejection {
    warp::reject::custom(ApiRejection::from(err))
}

/// Get the stored power ranking of a season
pub async fn get_power_rankings(
    params: PowerRankingsParams,
    store: Arc<dyn RankingStore>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let response = load_power_rankings(store.as_ref(), params.year).await.map_err(reject)?;
    Ok(warp::reply::json(&response))
}

/// Recompute and store the current season's ranking
pub async fn post_refresh(
    refresher: Arc<RefreshService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let summary = refresher.refresh().await.map_err(reject)?;

    Ok(warp::reply::json(&serde_json::json!({
        "message": "Power rankings refreshed",
        "season": summary.season,
        "teams": summary.teams,
        "weeks": summary.weeks,
    })))
}

/// Landing page of the provider's OAuth redirect
pub async fn oauth_callback(
    params: HashMap<String, String>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let code = params
        .get("code")
        .filter(|code| !code.is_empty())
        .ok_or_else(|| warp::reject::custom(ApiRejection::MissingCode))?;

    info!("Received OAuth authorization code");
    Ok(warp::reply::json(&serde_json::json!({ "authorization_code": code })))
}

/// Turn rejections into JSON error bodies
pub async fn handle_rejection(err: warp::Rejection) -> Result<impl warp::Reply, Infallible> {
    let (status, body) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, ErrorResponse::new("NOT_FOUND", "Route not found"))
    } else if let Some(rejection) = err.find::<ApiRejection>() {
        match rejection {
            ApiRejection::MissingCode => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("MISSING_CODE", "Missing authorization code"),
            ),
            ApiRejection::Service(service_err) => {
                let status = match service_err {
                    ServiceError::SeasonNotFound(_) | ServiceError::NoStats(_) => {
                        StatusCode::NOT_FOUND
                    }
                    ServiceError::Fetcher(_) => StatusCode::BAD_GATEWAY,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };

                if status == StatusCode::BAD_GATEWAY {
                    warn!("Upstream request failed: {}", service_err);
                } else if status.is_server_error() {
                    error!("Request failed: {}", service_err);
                }

                let mut body = ErrorResponse::new(service_err.code(), service_err.to_string());
                if let ServiceError::Fetcher(FetcherError::Status { status: upstream, .. }) = service_err {
                    body = body.with_details(serde_json::json!({ "upstream_status": upstream }));
                }

                (status, body)
            }
        }
    } else if let Some(invalid) = err.find::<warp::reject::InvalidQuery>() {
        (StatusCode::BAD_REQUEST, ErrorResponse::new("INVALID_QUERY", invalid.to_string()))
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, ErrorResponse::new("METHOD_NOT_ALLOWED", "Method not allowed"))
    } else {
        error!("Unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new("INTERNAL_ERROR", "Internal server error"))
    };

    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}

/// Create the API routes
pub fn create_routes(
    refresher: Arc<RefreshService>,
    store: Arc<dyn RankingStore>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let store_filter = warp::any().map(move || store.clone());
    let refresher_filter = warp::any().map(move || refresher.clone());

    let root = warp::path::end().and(warp::get()).map(|| {
        warp::reply::json(&serde_json::json!({
            "message": "Fantasy Power Rankings API is live!"
        }))
    });

    let health = warp::path("health").and(warp::path::end()).and(warp::get()).map(|| {
        warp::reply::json(&serde_json::json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    });

    let power_rankings = warp::path("power-rankings")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<PowerRankingsParams>())
        .and(store_filter)
        .and_then(get_power_rankings);

    let refresh = warp::path("refresh")
        .and(warp::path::end())
        .and(warp::post())
        .and(refresher_filter)
        .and_then(post_refresh);

    let callback = warp::path("callback")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .and_then(oauth_callback);

    root.or(health)
        .or(power_rankings)
        .or(refresh)
        .or(callback)
        .recover(handle_rejection)
        .with(
            warp::cors()
                .allow_any_origin()
                .allow_headers(vec!["content-type"])
                .allow_methods(vec!["GET", "POST", "OPTIONS"]),
        )
}
