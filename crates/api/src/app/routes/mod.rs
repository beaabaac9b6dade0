use axum::Router;

pub mod customers;
pub mod orders;
pub mod products;
pub mod reports;
pub mod stock;
pub mod suppliers;
pub mod system;

/// Router for every resource endpoint.
pub fn router() -> Router {
    Router::new()
        .nest("/products", products::router())
        .nest("/stock", stock::router())
        .nest("/orders", orders::router())
        .nest("/reports", reports::router())
        .nest("/suppliers", suppliers::router())
        .nest("/customers", customers::router())
}
