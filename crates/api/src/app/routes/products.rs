use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use stockledger_core::ProductId;
use stockledger_products::ProductDetails;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(register_product).get(list_products))
        .route("/:id", get(get_product).put(update_product).delete(delete_product))
        .route("/:id/adjust", post(adjust_quantity))
}

/// Register a product with opening stock (additive when the name exists).
pub async fn register_product(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterProductRequest>,
) -> axum::response::Response {
    match services
        .ledger
        .register_product(body.details(), body.quantity, body.reorder_level)
    {
        Ok(product) => (StatusCode::CREATED, Json(dto::product_to_json(&product))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.ledger.list_products() {
        Ok(products) => {
            let items = products.iter().map(dto::product_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match errors::parse_id(&id, "product") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.ledger.get_product(product_id) {
        Ok(product) => (StatusCode::OK, Json(dto::product_to_json(&product))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<ProductDetails>,
) -> axum::response::Response {
    let product_id: ProductId = match errors::parse_id(&id, "product") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.ledger.update_product_details(product_id, body) {
        Ok(product) => (StatusCode::OK, Json(dto::product_to_json(&product))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match errors::parse_id(&id, "product") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.ledger.delete_product(product_id) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn adjust_quantity(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::AdjustQuantityRequest>,
) -> axum::response::Response {
    let product_id: ProductId = match errors::parse_id(&id, "product") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.ledger.adjust_quantity(product_id, body.delta) {
        Ok(quantity) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "product_id": product_id.to_string(),
                "quantity": quantity,
            })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
