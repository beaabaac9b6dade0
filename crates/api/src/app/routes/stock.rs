use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use stockledger_core::ProductId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Stock records are addressed by the product they belong to.
pub fn router() -> Router {
    Router::new()
        .route("/", get(list_stock))
        .route(
            "/:product_id",
            get(get_stock).post(create_stock).put(update_stock),
        )
}

pub async fn list_stock(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.ledger.list_stock() {
        Ok(stock) => {
            let items = stock.iter().map(dto::stock_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn get_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(product_id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match errors::parse_id(&product_id, "product") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.ledger.get_stock(product_id) {
        Ok(stock) => (StatusCode::OK, Json(dto::stock_to_json(&stock))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn create_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(product_id): Path<String>,
    Json(body): Json<dto::CreateStockRequest>,
) -> axum::response::Response {
    let product_id: ProductId = match errors::parse_id(&product_id, "product") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services
        .ledger
        .create_stock(product_id, body.quantity, body.reorder_level)
    {
        Ok(stock) => (StatusCode::CREATED, Json(dto::stock_to_json(&stock))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn update_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(product_id): Path<String>,
    Json(body): Json<dto::UpdateStockRequest>,
) -> axum::response::Response {
    let product_id: ProductId = match errors::parse_id(&product_id, "product") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services
        .ledger
        .update_stock(product_id, body.quantity, body.reorder_level)
    {
        Ok(stock) => (StatusCode::OK, Json(dto::stock_to_json(&stock))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
