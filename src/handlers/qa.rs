//! Questions & answers relays.

use crate::models::{NewAnswer, NewQuestion};
use crate::extract::Payload;
use crate::relay::Relay;
use crate::{AppState, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use std::sync::Arc;

const QA_PAGE_SIZE: &str = "50";

/// The path parameter is the product whose questions are listed.
pub async fn list_questions(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> Result<Response> {
    let upstream = state
        .upstream
        .get(
            &["qa", "questions"],
            &[("product_id", product_id.as_str()), ("count", QA_PAGE_SIZE)],
        )
        .await?;
    Ok(Relay::forward(StatusCode::OK).respond(upstream))
}

pub async fn list_answers(
    State(state): State<Arc<AppState>>,
    Path(question_id): Path<String>,
) -> Result<Response> {
    let upstream = state
        .upstream
        .get(
            &["qa", "questions", question_id.as_str(), "answers"],
            &[("count", QA_PAGE_SIZE)],
        )
        .await?;
    Ok(Relay::forward(StatusCode::OK).respond(upstream))
}

pub async fn add_question(
    State(state): State<Arc<AppState>>,
    Payload(question): Payload<NewQuestion>,
) -> Result<Response> {
    let upstream = state
        .upstream
        .post(&["qa", "questions"], Some(&question))
        .await?;
    Ok(Relay::forward(StatusCode::CREATED).respond(upstream))
}

pub async fn add_answer(
    State(state): State<Arc<AppState>>,
    Path(question_id): Path<String>,
    Payload(answer): Payload<NewAnswer>,
) -> Result<Response> {
    let upstream = state
        .upstream
        .post(&["qa", "questions", question_id.as_str(), "answers"], Some(&answer))
        .await?;
    Ok(Relay::forward(StatusCode::CREATED).respond(upstream))
}

pub async fn mark_question_helpful(
    State(state): State<Arc<AppState>>,
    Path(question_id): Path<String>,
) -> Result<Response> {
    let upstream = state
        .upstream
        .put(&["qa", "questions", question_id.as_str(), "helpful"])
        .await?;
    Ok(Relay::no_content().respond(upstream))
}

pub async fn mark_answer_helpful(
    State(state): State<Arc<AppState>>,
    Path(answer_id): Path<String>,
) -> Result<Response> {
    let upstream = state
        .upstream
        .put(&["qa", "answers", answer_id.as_str(), "helpful"])
        .await?;
    Ok(Relay::no_content().respond(upstream))
}

pub async fn report_answer(
    State(state): State<Arc<AppState>>,
    Path(answer_id): Path<String>,
) -> Result<Response> {
    let upstream = state
        .upstream
        .put(&["qa", "answers", answer_id.as_str(), "report"])
        .await?;
    Ok(Relay::no_content().respond(upstream))
}
