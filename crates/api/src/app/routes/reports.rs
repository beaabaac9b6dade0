use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use stockledger_core::ReportId;
use stockledger_infra::{ReportPeriod, ReportRequest};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_reports))
        .route("/inventory", get(inventory_report).post(generate_inventory_report))
        .route("/orders", post(generate_order_report))
        .route("/suppliers", post(generate_supplier_report))
        .route("/:id", get(get_report))
}

/// Every product with its stock position and low-stock flag, computed live.
pub async fn inventory_report(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.ledger.inventory_report() {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn generate_inventory_report(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    generate(&services, ReportRequest::Inventory)
}

/// Orders placed between `start_date` and `end_date`.
pub async fn generate_order_report(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ReportPeriodQuery>,
) -> axum::response::Response {
    let period = match ReportPeriod::new(query.start_date, query.end_date) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };
    generate(&services, ReportRequest::Orders(period))
}

pub async fn generate_supplier_report(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    generate(&services, ReportRequest::Suppliers)
}

pub async fn list_reports(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.ledger.list_reports() {
        Ok(reports) => (StatusCode::OK, Json(serde_json::json!({ "items": reports }))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn get_report(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let report_id: ReportId = match errors::parse_id(&id, "report") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.ledger.get_report(report_id) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

fn generate(services: &AppServices, request: ReportRequest) -> axum::response::Response {
    match services.ledger.generate_report(request) {
        Ok(report) => (StatusCode::CREATED, Json(report)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
