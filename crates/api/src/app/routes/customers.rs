use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use stockledger_core::CustomerId;
use stockledger_parties::CustomerDetails;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(add_customer).get(list_customers))
        .route("/:id", get(get_customer).put(update_customer).delete(delete_customer))
}

pub async fn add_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<CustomerDetails>,
) -> axum::response::Response {
    match services.directory.add_customer(body) {
        Ok(v) => (StatusCode::CREATED, Json(dto::customer_to_json(&v))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn list_customers(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.directory.list_customers() {
        Ok(all) => {
            let items = all.iter().map(dto::customer_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn get_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CustomerId = match errors::parse_id(&id, "customer") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.directory.get_customer(id) {
        Ok(v) => (StatusCode::OK, Json(dto::customer_to_json(&v))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn update_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<CustomerDetails>,
) -> axum::response::Response {
    let id: CustomerId = match errors::parse_id(&id, "customer") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.directory.update_customer(id, body) {
        Ok(v) => (StatusCode::OK, Json(dto::customer_to_json(&v))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn delete_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CustomerId = match errors::parse_id(&id, "customer") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.directory.delete_customer(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
