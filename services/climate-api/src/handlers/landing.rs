//! GET / - landing page.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../templates/index.html");

/// GET /
pub async fn landing_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}
