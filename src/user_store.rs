use std::sync::Arc;

use crate::auth::{authenticate, CredentialVerifier, PlaintextVerifier};
use crate::backup::Backup;
use crate::error::{AlineaError, Result};
use crate::ids::fresh_id;
use crate::models::{Account, AccountPatch, NewAccount};
use crate::storage::{keys, load_json, save_json, KeyValueStore};

/// Account directory, the current session, and whole-state backup/restore.
///
/// Every mutation updates memory first and then rewrites the whole account
/// list under `users`.
pub struct UserStore {
    storage: Arc<dyn KeyValueStore>,
    verifier: Box<dyn CredentialVerifier>,
    accounts: Vec<Account>,
    session: Option<Account>,
}

impl UserStore {
    /// Rehydrates from storage. Without a stored `users` blob the directory
    /// starts from `seed`. A stored session is taken as-is; it is not checked
    /// against the account list. An unreadable session counts as signed out.
    pub fn open(storage: Arc<dyn KeyValueStore>, seed: Vec<Account>) -> Result<Self> {
        let accounts = load_json::<Vec<Account>>(storage.as_ref(), keys::USERS)?.unwrap_or(seed);
        let session = match load_json::<Account>(storage.as_ref(), keys::CURRENT_USER) {
            Ok(session) => session,
            Err(AlineaError::Serialization(e)) => {
                tracing::warn!(error = %e, "Stored session is unreadable, starting signed out");
                None
            }
            Err(e) => return Err(e),
        };
        tracing::debug!(
            accounts = accounts.len(),
            has_session = session.is_some(),
            "User store opened"
        );
        Ok(Self {
            storage,
            verifier: Box::new(PlaintextVerifier),
            accounts,
            session,
        })
    }

    pub fn with_verifier(mut self, verifier: Box<dyn CredentialVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<Account> {
        let account = match authenticate(&self.accounts, self.verifier.as_ref(), username, password) {
            Some(account) => account.clone(),
            None => {
                tracing::warn!("Invalid login attempt");
                return Err(AlineaError::InvalidCredentials);
            }
        };

        self.session = Some(account.clone());
        save_json(self.storage.as_ref(), keys::CURRENT_USER, &account)?;
        tracing::info!(user = %account.username, role = %account.role, "Logged in");
        Ok(account)
    }

    pub fn logout(&mut self) -> Result<()> {
        if let Some(account) = self.session.take() {
            tracing::info!(user = %account.username, "Logged out");
        }
        self.storage.remove(keys::CURRENT_USER)?;
        Ok(())
    }

    pub fn current_user(&self) -> Option<&Account> {
        self.session.as_ref()
    }

    pub fn is_admin(&self) -> bool {
        self.session.as_ref().is_some_and(Account::is_admin)
    }

    /// Division of the signed-in account, empty when anonymous.
    pub fn user_division(&self) -> &str {
        self.session.as_ref().map(|a| a.division.as_str()).unwrap_or("")
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn get(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    /// Appends a new account. Username collisions are not checked.
    pub fn add_account(&mut self, new_account: NewAccount) -> Result<Account> {
        let id = fresh_id(|candidate| self.accounts.iter().any(|a| a.id == candidate));
        let account = new_account.with_id(id);
        self.accounts.push(account.clone());
        self.persist()?;
        tracing::debug!(id = %account.id, user = %account.username, "Account added");
        Ok(account)
    }

    /// Merges `patch` into the matching account; absent ids are a no-op.
    /// Returns whether an account was updated.
    pub fn update_account(&mut self, id: &str, patch: &AccountPatch) -> Result<bool> {
        let Some(slot) = self.accounts.iter_mut().find(|a| a.id == id) else {
            tracing::debug!(id, "Account not found, update skipped");
            return Ok(false);
        };
        *slot = patch.apply(slot);
        self.persist()?;
        tracing::debug!(id, "Account updated");
        Ok(true)
    }

    /// Removes the matching account. Its reports stay, and a session held by
    /// it stays valid until logout.
    pub fn delete_account(&mut self, id: &str) -> Result<bool> {
        let before = self.accounts.len();
        self.accounts.retain(|a| a.id != id);
        if self.accounts.len() == before {
            return Ok(false);
        }
        self.persist()?;
        tracing::debug!(id, "Account deleted");
        Ok(true)
    }

    /// Snapshot of the account list and the raw persisted reports blob.
    pub fn backup(&self) -> Result<Backup> {
        Ok(Backup {
            users: self.accounts.clone(),
            reports: self.storage.get(keys::REPORTS)?,
        })
    }

    /// Replaces the account list and the stored reports wholesale. On a
    /// corrupt backup nothing changes. Callers go through `Alinea::restore`,
    /// which reloads the report store afterwards.
    pub(crate) fn restore(&mut self, text: &str) -> Result<()> {
        let backup = Backup::decode(text)?;

        let tx_id = self.storage.begin_transaction()?;
        if let Err(e) = self.write_backup(&backup) {
            tracing::error!(error = %e, "Error restoring data, rolling back");
            self.storage.rollback_transaction(tx_id)?;
            return Err(e);
        }
        self.storage.commit_transaction(tx_id)?;

        tracing::info!(accounts = backup.users.len(), "Backup restored");
        self.accounts = backup.users;
        Ok(())
    }

    fn write_backup(&self, backup: &Backup) -> Result<()> {
        save_json(self.storage.as_ref(), keys::USERS, &backup.users)?;
        match &backup.reports {
            Some(raw) => self.storage.set(keys::REPORTS, raw)?,
            None => self.storage.remove(keys::REPORTS)?,
        }
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        save_json(self.storage.as_ref(), keys::USERS, &self.accounts).map_err(|e| {
            tracing::error!(error = %e, "Failed to persist accounts");
            e
        })
    }
}
