use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod customers;
pub mod error;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod state;
pub mod summary;
pub mod worker;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .merge(products::routes())
        .merge(customers::routes())
        .merge(orders::routes())
        .merge(summary::routes())
        .merge(notifications::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
