use std::sync::Arc;

use crate::clock::Clock;
use crate::error::Result;
use crate::export::{self, Document};
use crate::ids::fresh_id;
use crate::models::{NewReport, Report, ReportPatch};
use crate::storage::{keys, load_json, save_json, KeyValueStore};

/// Report directory and its derived views.
///
/// Like the user store, every mutation rewrites the whole list under
/// `reports`. Queries are full scans in store (insertion) order.
pub struct ReportStore {
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    reports: Vec<Report>,
    page_width: usize,
}

impl ReportStore {
    pub fn open(storage: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Result<Self> {
        let reports = load_json::<Vec<Report>>(storage.as_ref(), keys::REPORTS)?.unwrap_or_default();
        tracing::debug!(reports = reports.len(), "Report store opened");
        Ok(Self {
            storage,
            clock,
            reports,
            page_width: 80,
        })
    }

    pub fn with_page_width(mut self, page_width: usize) -> Self {
        self.page_width = page_width;
        self
    }

    /// Re-reads the persisted list, e.g. after a restore replaced it.
    pub fn reload(&mut self) -> Result<()> {
        self.reports = load_json::<Vec<Report>>(self.storage.as_ref(), keys::REPORTS)?.unwrap_or_default();
        tracing::debug!(reports = self.reports.len(), "Reports reloaded");
        Ok(())
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn add_report(&mut self, new_report: NewReport) -> Result<Report> {
        let id = fresh_id(|candidate| self.reports.iter().any(|r| r.id == candidate));
        let report = new_report.into_report(id, self.clock.now());
        self.reports.push(report.clone());
        self.persist()?;
        tracing::debug!(id = %report.id, division = %report.division, "Report added");
        Ok(report)
    }

    /// Merges `patch` and restamps `updated_at`. Absent ids are a no-op and
    /// yield `None`.
    pub fn update_report(&mut self, id: &str, patch: &ReportPatch) -> Result<Option<Report>> {
        let now = self.clock.now();
        let Some(slot) = self.reports.iter_mut().find(|r| r.id == id) else {
            tracing::debug!(id, "Report not found, update skipped");
            return Ok(None);
        };
        *slot = patch.apply(slot, now);
        let updated = slot.clone();
        self.persist()?;
        tracing::debug!(id, status = %updated.status, "Report updated");
        Ok(Some(updated))
    }

    /// Idempotent; returns whether a report was removed.
    pub fn delete_report(&mut self, id: &str) -> Result<bool> {
        let before = self.reports.len();
        self.reports.retain(|r| r.id != id);
        if self.reports.len() == before {
            return Ok(false);
        }
        self.persist()?;
        tracing::debug!(id, "Report deleted");
        Ok(true)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Report> {
        self.reports.iter().find(|r| r.id == id)
    }

    pub fn list_by_account(&self, account_id: &str) -> Vec<&Report> {
        self.reports.iter().filter(|r| r.created_by == account_id).collect()
    }

    /// Exact, case-sensitive match on the division frozen into each report.
    pub fn list_by_division(&self, division: &str) -> Vec<&Report> {
        self.reports.iter().filter(|r| r.division == division).collect()
    }

    /// Newest `created_at` first. The sort is stable, so reports created at
    /// the same instant keep their store order.
    pub fn list_all_sorted_newest_first(&self) -> Vec<&Report> {
        let mut sorted: Vec<&Report> = self.reports.iter().collect();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sorted
    }

    pub fn export_single_as_document(&self, report: &Report) -> Result<Document> {
        export::render_report(report, self.page_width)
    }

    /// Every report in store order, stamped with the current time.
    pub fn export_all_as_document(&self) -> Result<Document> {
        export::render_all(&self.reports, self.clock.now())
    }

    fn persist(&self) -> Result<()> {
        save_json(self.storage.as_ref(), keys::REPORTS, &self.reports).map_err(|e| {
            tracing::error!(error = %e, "Failed to persist reports");
            e
        })
    }
}
