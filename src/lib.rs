pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod media;
pub mod models;
pub mod relay;
pub mod upstream;

use axum::{
    extract::DefaultBodyLimit,
    handler::Handler,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::{AppError, Result};

use handlers::{frontend, products, qa, reviews, upload};
use media::MediaUploader;
use upstream::UpstreamClient;

pub struct AppState {
    pub config: Config,
    pub upstream: UpstreamClient,
    pub media: Arc<dyn MediaUploader>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let media = media::build_uploader(&config)?;
        Self::with_media(config, media)
    }

    pub fn with_media(config: Config, media: Arc<dyn MediaUploader>) -> anyhow::Result<Self> {
        let upstream = UpstreamClient::new(&config)?;
        Ok(Self {
            config,
            upstream,
            media,
        })
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    // Files from the bundle first, then index.html for client-side routes
    let bundle = ServeDir::new(&state.config.static_dir)
        .fallback(frontend::index.with_state(state.clone()));

    Router::new()
        // Health check
        .route("/healthz", get(handlers::health_check))
        // Products
        .route("/products", get(products::list_products))
        .route("/products/:id", get(products::get_product))
        .route("/products/:id/styles", get(products::product_styles))
        .route("/products/:id/related", get(products::related_products))
        // Questions & answers. POST/PUT-only paths answer a browser GET with the page
        .route("/qa/questions", post(qa::add_question).get(frontend::index))
        .route("/qa/questions/:id", get(qa::list_questions))
        .route(
            "/qa/questions/:id/answers",
            get(qa::list_answers).post(qa::add_answer),
        )
        .route(
            "/qa/questions/:id/helpful",
            put(qa::mark_question_helpful).get(frontend::index),
        )
        .route(
            "/qa/answers/:id/helpful",
            put(qa::mark_answer_helpful).get(frontend::index),
        )
        .route(
            "/qa/answers/:id/report",
            put(qa::report_answer).get(frontend::index),
        )
        // Reviews
        .route("/reviews/meta/:id", get(reviews::review_meta))
        .route("/reviews/:id", post(reviews::list_reviews).get(frontend::index))
        .route(
            "/reviews/:id/helpful",
            put(reviews::mark_review_helpful).get(frontend::index),
        )
        .route(
            "/reviews/:id/report",
            put(reviews::report_review).get(frontend::index),
        )
        .route("/addReview", post(reviews::add_review).get(frontend::index))
        // Image uploads
        .route("/upload", post(upload::upload_images).get(frontend::index))
        .fallback_service(bundle)
        .layer(DefaultBodyLimit::max(state.config.max_request_body_bytes()))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
