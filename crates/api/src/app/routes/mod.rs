use axum::Router;

pub mod catalog;
pub mod items;
pub mod mutations;
pub mod system;

/// Router for the ledger and catalog endpoints.
pub fn router() -> Router {
    Router::new()
        .merge(mutations::router())
        .merge(items::router())
        .merge(catalog::router())
}
