use chrono::Utc;
use serde_json::Value as JsonValue;

use stockledger_core::{DomainError, ReportId};
use stockledger_events::{EventBus, EventEnvelope};

use super::InventoryLedger;
use crate::error::LedgerResult;
use crate::reports::{Report, ReportData, ReportRequest};
use crate::store::{Store, Transaction};

impl<S, B> InventoryLedger<S, B>
where
    S: Store,
    B: EventBus<EventEnvelope<JsonValue>>,
{
    /// Build a report from committed data and keep it.
    ///
    /// The stored copy never changes: fetching it later returns the numbers as
    /// they were when it was generated.
    pub fn generate_report(&self, request: ReportRequest) -> LedgerResult<Report> {
        let generated_at = Utc::now();
        let mut tx = self.store.begin()?;

        let report = Report::new(ReportId::new(), ReportData::build(&tx, request, generated_at));
        tx.reports.save(report.clone());

        tx.commit()?;
        tracing::info!(report_id = %report.id_typed(), kind = report.kind(), "report generated");
        Ok(report)
    }

    pub fn list_reports(&self) -> LedgerResult<Vec<Report>> {
        Ok(self.store.read(|t| t.reports.to_vec())?)
    }

    pub fn get_report(&self, report_id: ReportId) -> LedgerResult<Report> {
        self.store
            .read(|t| t.reports.find_by_id(&report_id).cloned())?
            .ok_or_else(|| DomainError::not_found("report", report_id).into())
    }
}
