use subtle::ConstantTimeEq;

use crate::models::Account;

/// Decides whether a presented password matches an account's stored
/// credential.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, account: &Account, presented: &str) -> bool;
}

/// Compares against the plaintext password kept on the account.
///
/// The comparison is constant-time, but the credential itself is stored in
/// the clear in the persisted `users` blob and in backups.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextVerifier;

impl CredentialVerifier for PlaintextVerifier {
    fn verify(&self, account: &Account, presented: &str) -> bool {
        account.password.as_bytes().ct_eq(presented.as_bytes()).into()
    }
}

/// Finds the first account whose username matches exactly (case-sensitive)
/// and whose credential verifies. Duplicate usernames are allowed, so every
/// candidate is tried.
pub fn authenticate<'a>(
    accounts: &'a [Account],
    verifier: &dyn CredentialVerifier,
    username: &str,
    password: &str,
) -> Option<&'a Account> {
    accounts
        .iter()
        .filter(|account| account.username == username)
        .find(|account| verifier.verify(account, password))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn account(id: &str, username: &str, password: &str) -> Account {
        Account {
            id: id.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            role: Role::It,
            display_name: "IT Team".to_string(),
            division: "IT".to_string(),
        }
    }

    #[test]
    fn test_exact_match_required() {
        let accounts = vec![account("2", "ITAlinea", "TimitAliena2025")];
        let verifier = PlaintextVerifier;

        assert!(authenticate(&accounts, &verifier, "ITAlinea", "TimitAliena2025").is_some());
        assert!(authenticate(&accounts, &verifier, "italinea", "TimitAliena2025").is_none());
        assert!(authenticate(&accounts, &verifier, "ITAlinea", "timitaliena2025").is_none());
        assert!(authenticate(&accounts, &verifier, "ITAlinea", "TimitAliena").is_none());
        assert!(authenticate(&accounts, &verifier, "ITAlinea", "").is_none());
    }

    #[test]
    fn test_duplicate_usernames_try_every_candidate() {
        let accounts = vec![account("a", "dup", "first"), account("b", "dup", "second")];
        let found = authenticate(&accounts, &PlaintextVerifier, "dup", "second").unwrap();
        assert_eq!(found.id, "b");
    }
}
