//! Infrastructure layer: record store, inventory ledger, directory, reports
//! and process configuration.
//!
//! Domain crates stay free of IO; everything that touches storage, the event
//! bus or the environment lives here.

pub mod config;
pub mod directory;
pub mod error;
pub mod ledger;
pub mod reports;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use directory::Directory;
pub use error::{LedgerError, LedgerResult};
pub use ledger::{InventoryLedger, LedgerConfig};
pub use reports::{
    InventoryReport, InventoryReportRow, OrderReport, OrderReportRow, Report, ReportData,
    ReportPeriod, ReportRequest, SupplierReport, SupplierReportRow,
};
pub use store::{InMemoryStore, Store, StoreError, Tables, Transaction};
