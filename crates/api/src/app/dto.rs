use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use stockledger_inventory::Stock;
use stockledger_parties::{Customer, Supplier};
use stockledger_products::{Product, ProductDetails};
use stockledger_sales::Order;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: u64,
    #[serde(default)]
    pub quantity: i64,
    pub reorder_level: Option<i64>,
}

impl RegisterProductRequest {
    pub fn details(&self) -> ProductDetails {
        ProductDetails {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
        }
    }
}

/// `?start_date=YYYY-MM-DD&end_date=YYYY-MM-DD`, both inclusive.
#[derive(Debug, Deserialize)]
pub struct ReportPeriodQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct AdjustQuantityRequest {
    pub delta: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateStockRequest {
    pub quantity: i64,
    pub reorder_level: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStockRequest {
    pub quantity: Option<i64>,
    pub reorder_level: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct OrderLineRequest {
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub customer_id: String,
    pub items: Vec<OrderLineRequest>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn product_to_json(p: &Product) -> serde_json::Value {
    json!({
        "id": p.id_typed().to_string(),
        "name": p.name(),
        "description": p.description(),
        "price": p.price(),
        "stock_level": p.stock_level(),
    })
}

pub fn stock_to_json(s: &Stock) -> serde_json::Value {
    json!({
        "id": s.id_typed().to_string(),
        "product_id": s.product_id().to_string(),
        "quantity": s.quantity(),
        "reorder_level": s.reorder_level(),
        "low_stock": s.is_low(),
    })
}

pub fn order_to_json(o: &Order) -> serde_json::Value {
    json!({
        "id": o.id_typed().to_string(),
        "customer_id": o.customer_id().to_string(),
        "order_date": o.order_date().to_rfc3339(),
        "status": o.status().as_str(),
        "total_amount": o.total_amount(),
        "items": o.items().iter().map(|i| json!({
            "id": i.id().to_string(),
            "product_id": i.product_id().to_string(),
            "quantity": i.quantity(),
            "price_at_order": i.price_at_order(),
            "line_total": i.line_total(),
        })).collect::<Vec<_>>(),
    })
}

pub fn supplier_to_json(s: &Supplier) -> serde_json::Value {
    let d = s.details();
    json!({
        "id": s.id_typed().to_string(),
        "name": d.name,
        "contact_info": d.contact_info,
        "products_supplied": d.products_supplied,
    })
}

pub fn customer_to_json(c: &Customer) -> serde_json::Value {
    let d = c.details();
    json!({
        "id": c.id_typed().to_string(),
        "first_name": d.first_name,
        "last_name": d.last_name,
        "email": d.email,
        "phone": d.phone,
        "address": d.address,
    })
}
