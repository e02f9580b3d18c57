use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::error::{AlineaError, Result};
use crate::models::{Account, Report};

/// Whole-state snapshot: the account list plus the reports blob exactly as
/// it sits in storage (a JSON string, or null when nothing was stored).
/// Both keys must be present; `reports` may be null but not missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Backup {
    pub users: Vec<Account>,
    #[serde(deserialize_with = "Option::deserialize")]
    pub reports: Option<String>,
}

impl Backup {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses and shape-checks a backup, including the embedded reports
    /// blob. Any failure collapses to `CorruptBackup`; the detail is only
    /// logged.
    pub fn decode(text: &str) -> Result<Self> {
        let backup: Backup = serde_json::from_str(text).map_err(|e| {
            tracing::error!(error = %e, "Error restoring data");
            AlineaError::CorruptBackup
        })?;
        backup.reports().map_err(|e| {
            tracing::error!(error = %e, "Error restoring data: reports blob is not a report list");
            AlineaError::CorruptBackup
        })?;
        Ok(backup)
    }

    /// The reports carried by the blob; empty when there is none.
    pub fn reports(&self) -> Result<Vec<Report>, serde_json::Error> {
        match &self.reports {
            Some(raw) => serde_json::from_str(raw),
            None => Ok(Vec::new()),
        }
    }

    pub fn file_name(at: OffsetDateTime) -> String {
        let stamp = at
            .format(&Rfc3339)
            .unwrap_or_else(|_| at.unix_timestamp().to_string());
        format!("alinea-backup-{}.json", stamp)
    }
}
