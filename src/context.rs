use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{AlineaError, Result};
use crate::models::{Account, NewReport, Report, ReportDraft};
use crate::report_store::ReportStore;
use crate::storage::{open_store, KeyValueStore};
use crate::user_store::UserStore;
use crate::validation::validate_report_draft;

/// Both stores over one shared storage substrate, built once at start-up and
/// handed to whatever drives them.
pub struct Alinea {
    pub users: UserStore,
    pub reports: ReportStore,
}

impl Alinea {
    pub fn open(config: &Config) -> Result<Self> {
        let storage = open_store(&config.storage)?;
        let mut app = Self::with_storage(storage, Arc::new(SystemClock), config.seed_accounts.clone())?;
        app.reports = app.reports.with_page_width(config.export.page_width);
        Ok(app)
    }

    pub fn with_storage(storage: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, seed: Vec<Account>) -> Result<Self> {
        Ok(Self {
            users: UserStore::open(storage.clone(), seed)?,
            reports: ReportStore::open(storage, clock)?,
        })
    }

    /// The signed-in account, or `NotAuthenticated`.
    pub fn require_user(&self) -> Result<&Account> {
        self.users.current_user().ok_or(AlineaError::NotAuthenticated)
    }

    pub fn require_admin(&self) -> Result<&Account> {
        let account = self.require_user()?;
        if !account.is_admin() {
            return Err(AlineaError::Forbidden);
        }
        Ok(account)
    }

    /// Validates a draft and files it under the signed-in account.
    pub fn submit_report(&mut self, draft: ReportDraft) -> Result<Report> {
        let author = self.require_user()?.clone();
        validate_report_draft(&draft, author.role)?;
        self.reports.add_report(NewReport::authored_by(&author, draft))
    }

    /// Restores a backup and reloads the reports it carried.
    pub fn restore(&mut self, text: &str) -> Result<()> {
        self.users.restore(text)?;
        self.reports.reload()
    }
}
