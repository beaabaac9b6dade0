//! Report read models: inventory position, orders over a date range, and
//! the supplier list. Generated reports are kept as [`Report`] records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use stockledger_core::{
    CustomerId, DomainError, DomainResult, Entity, OrderId, ProductId, ReportId, SupplierId,
};
use stockledger_sales::OrderStatus;

use crate::store::Tables;

/// One product line of the inventory report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryReportRow {
    pub product_id: ProductId,
    pub name: String,
    pub price: u64,
    /// `None` when the product has no stock record yet.
    pub quantity: Option<i64>,
    pub reorder_level: Option<i64>,
    pub low_stock: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryReport {
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<InventoryReportRow>,
}

impl InventoryReport {
    /// Every product with its stock position, in product creation order.
    pub fn build(tables: &Tables, generated_at: DateTime<Utc>) -> Self {
        let rows = tables
            .products
            .find_all()
            .map(|product| {
                let stock = tables.stock_for_product(product.id_typed());
                InventoryReportRow {
                    product_id: product.id_typed(),
                    name: product.name().to_string(),
                    price: product.price(),
                    quantity: stock.map(|s| s.quantity()),
                    reorder_level: stock.map(|s| s.reorder_level()),
                    low_stock: stock.is_some_and(|s| s.is_low()),
                }
            })
            .collect();

        Self { generated_at, rows }
    }

    /// Rows at or below their reorder level.
    pub fn low_stock(&self) -> impl Iterator<Item = &InventoryReportRow> {
        self.rows.iter().filter(|row| row.low_stock)
    }
}

/// Inclusive range of calendar days (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> DomainResult<Self> {
        if start > end {
            return Err(DomainError::validation(format!(
                "report period starts after it ends ({start} > {end})"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let day = at.date_naive();
        self.start <= day && day <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderReportRow {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub items: usize,
    pub units: i64,
    pub total_amount: u64,
}

/// Orders placed within a period, with their totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderReport {
    pub generated_at: DateTime<Utc>,
    pub period: ReportPeriod,
    pub rows: Vec<OrderReportRow>,
    /// Sum of row totals. Cancelled orders are listed but not counted.
    pub total_amount: u64,
}

impl OrderReport {
    pub fn build(tables: &Tables, period: ReportPeriod, generated_at: DateTime<Utc>) -> Self {
        let rows: Vec<OrderReportRow> = tables
            .orders
            .find_all()
            .filter(|order| period.contains(order.order_date()))
            .map(|order| OrderReportRow {
                order_id: order.id_typed(),
                customer_id: order.customer_id(),
                order_date: order.order_date(),
                status: order.status(),
                items: order.items().len(),
                units: order.items().iter().map(|item| item.quantity()).sum(),
                total_amount: order.total_amount(),
            })
            .collect();
        let total_amount = rows
            .iter()
            .filter(|row| row.status != OrderStatus::Cancelled)
            .fold(0u64, |acc, row| acc.saturating_add(row.total_amount));

        Self {
            generated_at,
            period,
            rows,
            total_amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplierReportRow {
    pub supplier_id: SupplierId,
    pub name: String,
    pub contact_info: Option<String>,
    pub products_supplied: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplierReport {
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<SupplierReportRow>,
}

impl SupplierReport {
    pub fn build(tables: &Tables, generated_at: DateTime<Utc>) -> Self {
        let rows = tables
            .suppliers
            .find_all()
            .map(|supplier| SupplierReportRow {
                supplier_id: supplier.id_typed(),
                name: supplier.name().to_string(),
                contact_info: supplier.details().contact_info.clone(),
                products_supplied: supplier.details().products_supplied.clone(),
            })
            .collect();
        Self { generated_at, rows }
    }
}

/// Which report to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportRequest {
    Inventory,
    Orders(ReportPeriod),
    Suppliers,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ReportData {
    Inventory(InventoryReport),
    Orders(OrderReport),
    Suppliers(SupplierReport),
}

impl ReportData {
    pub fn build(tables: &Tables, request: ReportRequest, generated_at: DateTime<Utc>) -> Self {
        match request {
            ReportRequest::Inventory => Self::Inventory(InventoryReport::build(tables, generated_at)),
            ReportRequest::Orders(period) => {
                Self::Orders(OrderReport::build(tables, period, generated_at))
            }
            ReportRequest::Suppliers => Self::Suppliers(SupplierReport::build(tables, generated_at)),
        }
    }
}

/// A generated report, kept so it can be fetched again unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    id: ReportId,
    #[serde(flatten)]
    data: ReportData,
}

impl Report {
    pub fn new(id: ReportId, data: ReportData) -> Self {
        Self { id, data }
    }

    pub fn id_typed(&self) -> ReportId {
        self.id
    }

    pub fn kind(&self) -> &'static str {
        match self.data {
            ReportData::Inventory(_) => "inventory",
            ReportData::Orders(_) => "orders",
            ReportData::Suppliers(_) => "suppliers",
        }
    }

    pub fn data(&self) -> &ReportData {
        &self.data
    }
}

impl Entity for Report {
    type Id = ReportId;
    const KIND: &'static str = "report";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
