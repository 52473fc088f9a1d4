pub mod frontend;
pub mod products;
pub mod qa;
pub mod reviews;
pub mod upload;

pub async fn health_check() -> &'static str {
    "ok"
}
