use crate::extract::Payload;
use crate::models::{AddReviewRequest, ReviewListRequest};
use crate::relay::Relay;
use crate::{AppState, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use std::sync::Arc;

/// Review listing is a POST inbound so the client can pass `count` in the body.
pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
    Payload(request): Payload<ReviewListRequest>,
) -> Result<Response> {
    let count = request.count();
    let upstream = state
        .upstream
        .get(
            &["reviews"],
            &[("product_id", product_id.as_str()), ("count", count.as_str())],
        )
        .await?;
    Ok(Relay::forward(StatusCode::OK).respond(upstream))
}

pub async fn review_meta(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> Result<Response> {
    let upstream = state
        .upstream
        .get(&["reviews", "meta"], &[("product_id", product_id.as_str())])
        .await?;
    Ok(Relay::forward(StatusCode::OK).respond(upstream))
}

pub async fn mark_review_helpful(
    State(state): State<Arc<AppState>>,
    Path(review_id): Path<String>,
) -> Result<Response> {
    let upstream = state
        .upstream
        .put(&["reviews", review_id.as_str(), "helpful"])
        .await?;
    Ok(Relay::fixed(StatusCode::OK, "updated helpful").respond(upstream))
}

pub async fn report_review(
    State(state): State<Arc<AppState>>,
    Path(review_id): Path<String>,
) -> Result<Response> {
    let upstream = state
        .upstream
        .put(&["reviews", review_id.as_str(), "report"])
        .await?;
    Ok(Relay::no_content().respond(upstream))
}

/// Characteristic ratings arrive as form strings and are sent upstream as integers.
pub async fn add_review(
    State(state): State<Arc<AppState>>,
    Payload(request): Payload<AddReviewRequest>,
) -> Result<Response> {
    let mut review = request.review;
    if let Some(review) = review.as_mut() {
        review.coerce_characteristics();
    }

    if review.is_none() {
        tracing::warn!("addReview called without a review, forwarding an empty request");
    }

    let upstream = state.upstream.post(&["reviews"], review.as_ref()).await?;
    Ok(Relay::fixed(StatusCode::CREATED, "added!").respond(upstream))
}
