use crate::{AppError, AppState, Result};
use axum::{extract::State, response::Html};
use std::path::Path;
use std::sync::Arc;

/// SPA catch-all: any unmatched GET gets the bundle's `index.html`.
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<Vec<u8>>> {
    let path = Path::new(&state.config.static_dir).join("index.html");
    let html = tokio::fs::read(&path)
        .await
        .map_err(AppError::StaticAsset)?;
    Ok(Html(html))
}
