use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};

use stockledger_core::{CustomerId, OrderId};
use stockledger_sales::{OrderLine, OrderStatus};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(place_order).get(list_orders))
        .route("/:id", get(get_order).delete(delete_order))
        .route("/:id/status", put(update_order_status))
        .route("/:id/cancel", post(cancel_order))
}

/// Fulfill an order: all lines are taken out of stock, or none are.
pub async fn place_order(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::PlaceOrderRequest>,
) -> axum::response::Response {
    let customer_id: CustomerId = match errors::parse_id(&body.customer_id, "customer") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let mut lines = Vec::with_capacity(body.items.len());
    for item in &body.items {
        match errors::parse_id(&item.product_id, "product") {
            Ok(product_id) => lines.push(OrderLine::new(product_id, item.quantity)),
            Err(resp) => return resp,
        }
    }

    match services.ledger.fulfill_order(customer_id, &lines) {
        Ok(order) => (StatusCode::CREATED, Json(dto::order_to_json(&order))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.ledger.list_orders() {
        Ok(orders) => {
            let items = orders.iter().map(dto::order_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let order_id: OrderId = match errors::parse_id(&id, "order") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.ledger.get_order(order_id) {
        Ok(order) => (StatusCode::OK, Json(dto::order_to_json(&order))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn update_order_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateOrderStatusRequest>,
) -> axum::response::Response {
    let order_id: OrderId = match errors::parse_id(&id, "order") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let status: OrderStatus = match body.status.parse() {
        Ok(s) => s,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.ledger.update_order_status(order_id, status) {
        Ok(order) => (StatusCode::OK, Json(dto::order_to_json(&order))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn cancel_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let order_id: OrderId = match errors::parse_id(&id, "order") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.ledger.cancel_order(order_id) {
        Ok(order) => (StatusCode::OK, Json(dto::order_to_json(&order))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn delete_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let order_id: OrderId = match errors::parse_id(&id, "order") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.ledger.delete_order(order_id) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
