use crate::relay::Relay;
use crate::{AppState, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use std::sync::Arc;

const PRODUCT_PAGE_SIZE: &str = "20";

pub async fn list_products(State(state): State<Arc<AppState>>) -> Result<Response> {
    let upstream = state
        .upstream
        .get(&["products"], &[("count", PRODUCT_PAGE_SIZE)])
        .await?;
    Ok(Relay::forward(StatusCode::OK).respond(upstream))
}

pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response> {
    let upstream = state.upstream.get(&["products", id.as_str()], &[]).await?;
    Ok(Relay::forward(StatusCode::OK).respond(upstream))
}

pub async fn product_styles(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response> {
    let upstream = state
        .upstream
        .get(&["products", id.as_str(), "styles"], &[])
        .await?;
    Ok(Relay::forward(StatusCode::OK).respond(upstream))
}

pub async fn related_products(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response> {
    let upstream = state
        .upstream
        .get(&["products", id.as_str(), "related"], &[])
        .await?;
    Ok(Relay::forward(StatusCode::OK).respond(upstream))
}
