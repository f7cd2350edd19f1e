//! Dashboard route handlers.

use axum::extract::{Query, State};
use axum::response::{Html, Response};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::domain::UserId;
use crate::port::CheckRequest;

use super::response::{success, success_with, ApiError};
use super::AppState;

const DASHBOARD_HTML: &str = include_str!("dashboard.html");

type ApiResult = Result<Response, ApiError>;

/// Body of `POST` and `DELETE /api/products`.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    #[serde(default)]
    url: Option<String>,
    #[serde(default, alias = "userId")]
    user_id: Option<String>,
}

impl ProductRequest {
    fn url(&self) -> Result<&str, ApiError> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ApiError::bad_request("URL is required"))
    }

    /// A blank `user_id` counts as absent.
    fn user(&self) -> Result<Option<UserId>, ApiError> {
        match self.user_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(id) => UserId::try_new(id)
                .map(Some)
                .map_err(|e| ApiError::bad_request(e.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    url: Option<String>,
}

pub async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

pub async fn health(State(state): State<AppState>) -> Response {
    success(json!({
        "status": "ok",
        "timestamp": Utc::now().timestamp_millis(),
        "uptime_secs": state.started.elapsed().as_secs(),
    }))
}

pub async fn list_products(State(state): State<AppState>) -> ApiResult {
    let products = state.tracking.summaries().await?;
    Ok(success(json!({
        "count": products.len(),
        "products": products,
    })))
}

pub async fn add_product(
    State(state): State<AppState>,
    Json(request): Json<ProductRequest>,
) -> ApiResult {
    let url = request.url()?;
    let user = request.user()?;
    let product = state.tracking.add_product(url, user.as_ref()).await?;
    Ok(success(json!({
        "message": "Product added successfully",
        "product": product,
    })))
}

pub async fn remove_product(
    State(state): State<AppState>,
    Json(request): Json<ProductRequest>,
) -> ApiResult {
    let url = request.url()?;
    let user = request.user()?;
    let removed = state.tracking.remove_product(url, user.as_ref()).await?;
    Ok(success(json!({
        "message": "Product removed successfully",
        "removed": removed,
    })))
}

pub async fn status(State(state): State<AppState>, Query(query): Query<StatusQuery>) -> ApiResult {
    let url = query
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::bad_request("URL query parameter is required"))?;
    let (url, observation) = state.tracking.status(url).await?;
    Ok(success(json!({
        "url": url,
        "status": observation.status,
        "name": observation.name,
        "image_url": observation.image_url,
    })))
}

pub async fn stats(State(state): State<AppState>) -> ApiResult {
    let stats = state.tracking.stats().await?;
    Ok(success_with(&stats))
}

pub async fn force_check(State(state): State<AppState>) -> Response {
    let request = state.checker.force_check();
    success(json!({
        "started": request == CheckRequest::Started,
        "message": request.message(),
    }))
}
