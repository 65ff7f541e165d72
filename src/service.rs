//! The boundary to the service that owns the accounts.

use std::sync::{
    Mutex,
    atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    Error,
    account::{Account, AccountId, AccountType, NewAccount},
};

/// The operations the front-end needs from the account service.
///
/// Implementations do not retry, a failed call is reported once.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Get every account.
    async fn all_accounts(&self) -> Result<Vec<Account>, Error>;

    /// Get the accounts of one type.
    async fn accounts_by_type(&self, account_type: AccountType) -> Result<Vec<Account>, Error>;

    /// Create an account, the service assigns the id and creation date.
    async fn create_account(&self, new_account: NewAccount) -> Result<Account, Error>;

    /// Delete the account with `id`.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingAccount] if the service does not know `id`.
    async fn delete_account(&self, id: &AccountId) -> Result<(), Error>;
}

/// An [AccountService] that keeps accounts in memory.
///
/// Used for the offline demo mode and in tests.
#[derive(Debug, Default)]
pub struct InMemoryAccountService {
    accounts: Mutex<Vec<Account>>,
    next_id: AtomicU64,
}

impl InMemoryAccountService {
    /// Create an empty service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service holding a few demo accounts.
    pub fn with_demo_accounts() -> Self {
        let service = Self::new();

        if let Ok(mut accounts) = service.accounts.lock() {
            for (balance, account_type) in [
                (1_250.0, AccountType::Current),
                (8_400.5, AccountType::Savings),
                (-75.25, AccountType::Current),
            ] {
                let account = service.build_account(NewAccount {
                    balance,
                    account_type,
                });
                accounts.push(account);
            }
        }

        service
    }

    fn build_account(&self, new_account: NewAccount) -> Account {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;

        Account {
            id: AccountId::new(id.to_string()),
            balance: new_account.balance,
            creation_date: OffsetDateTime::now_utc().date().to_string(),
            account_type: new_account.account_type,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Account>>, Error> {
        self.accounts
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire the accounts lock: {error}"))
            .map_err(|_| Error::LockError("in-memory accounts"))
    }
}

#[async_trait]
impl AccountService for InMemoryAccountService {
    async fn all_accounts(&self) -> Result<Vec<Account>, Error> {
        Ok(self.lock()?.clone())
    }

    async fn accounts_by_type(&self, account_type: AccountType) -> Result<Vec<Account>, Error> {
        Ok(self
            .lock()?
            .iter()
            .filter(|account| account.account_type == account_type)
            .cloned()
            .collect())
    }

    async fn create_account(&self, new_account: NewAccount) -> Result<Account, Error> {
        let account = self.build_account(new_account);
        self.lock()?.push(account.clone());

        Ok(account)
    }

    async fn delete_account(&self, id: &AccountId) -> Result<(), Error> {
        let mut accounts = self.lock()?;
        let count_before = accounts.len();
        accounts.retain(|account| &account.id != id);

        if accounts.len() == count_before {
            Err(Error::DeleteMissingAccount)
        } else {
            Ok(())
        }
    }
}
