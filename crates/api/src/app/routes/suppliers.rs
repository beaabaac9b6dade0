use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use stockledger_core::SupplierId;
use stockledger_parties::SupplierDetails;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(add_supplier).get(list_suppliers))
        .route("/:id", get(get_supplier).put(update_supplier).delete(delete_supplier))
}

pub async fn add_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<SupplierDetails>,
) -> axum::response::Response {
    match services.directory.add_supplier(body) {
        Ok(v) => (StatusCode::CREATED, Json(dto::supplier_to_json(&v))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn list_suppliers(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.directory.list_suppliers() {
        Ok(all) => {
            let items = all.iter().map(dto::supplier_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn get_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: SupplierId = match errors::parse_id(&id, "supplier") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.directory.get_supplier(id) {
        Ok(v) => (StatusCode::OK, Json(dto::supplier_to_json(&v))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn update_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<SupplierDetails>,
) -> axum::response::Response {
    let id: SupplierId = match errors::parse_id(&id, "supplier") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.directory.update_supplier(id, body) {
        Ok(v) => (StatusCode::OK, Json(dto::supplier_to_json(&v))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn delete_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: SupplierId = match errors::parse_id(&id, "supplier") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.directory.delete_supplier(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
