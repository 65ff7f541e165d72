//! Holds the latest account lists and publishes them as observable state.
//!
//! The store has two independent channels: the unfiltered list and the list
//! filtered by account type. Every load command publishes
//! [ChannelState::Loading] when it is dispatched and its outcome when the
//! service answers. Commands are never cancelled, so when two loads on the same
//! channel overlap the one that completes last decides the final state.

use std::sync::{Arc, Mutex};

use tokio::{sync::watch, task::JoinHandle};

use crate::{
    Error,
    account::{Account, AccountId, AccountType, NewAccount, TypeFilter},
    service::AccountService,
};

/// One of the two observable account lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Every account.
    Unfiltered,
    /// The accounts of the most recently requested type.
    Filtered,
}

impl Channel {
    /// The channel that holds the accounts for `filter`.
    pub fn for_filter(filter: TypeFilter) -> Self {
        match filter {
            TypeFilter::All => Channel::Unfiltered,
            TypeFilter::Only(_) => Channel::Filtered,
        }
    }
}

/// The state of a channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelState {
    /// A request is in flight, or nothing has been loaded yet.
    Loading,
    /// The accounts from the most recently completed request.
    Success(Vec<Account>),
    /// The most recently completed request failed.
    Error(String),
}

/// A handle to a command running in the background.
///
/// Dropping the handle does not cancel the command.
#[derive(Debug)]
pub struct Command<T>(JoinHandle<Result<T, Error>>);

impl<T> Command<T> {
    /// Wait for the command to finish and return its outcome.
    ///
    /// # Errors
    /// Returns the error the command failed with, or [Error::CommandFailed] if
    /// the task running it panicked.
    pub async fn finished(self) -> Result<T, Error> {
        match self.0.await {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::error!("a store command did not finish: {error}");
                Err(Error::CommandFailed(error.to_string()))
            }
        }
    }
}

/// The account store, cheap to clone and shared between request handlers.
#[derive(Clone)]
pub struct AccountStore {
    service: Arc<dyn AccountService>,
    unfiltered: Arc<watch::Sender<ChannelState>>,
    filtered: Arc<watch::Sender<ChannelState>>,
    /// The filter of the most recent load, refreshed after create and delete.
    last_filter: Arc<Mutex<TypeFilter>>,
}

impl AccountStore {
    /// Create a store backed by `service`, both channels start out loading.
    pub fn new(service: Arc<dyn AccountService>) -> Self {
        let (unfiltered, _) = watch::channel(ChannelState::Loading);
        let (filtered, _) = watch::channel(ChannelState::Loading);

        Self {
            service,
            unfiltered: Arc::new(unfiltered),
            filtered: Arc::new(filtered),
            last_filter: Arc::new(Mutex::new(TypeFilter::All)),
        }
    }

    /// Get notified whenever `channel` is published to.
    ///
    /// Request handlers read channels through [AccountStore::current] instead,
    /// after awaiting the load they dispatched.
    pub fn subscribe(&self, channel: Channel) -> watch::Receiver<ChannelState> {
        self.sender(channel).subscribe()
    }

    /// A snapshot of the current state of `channel`.
    ///
    /// This is [ChannelState::Loading] if another load of `channel` was
    /// dispatched after the one the caller awaited.
    pub fn current(&self, channel: Channel) -> ChannelState {
        self.sender(channel).borrow().clone()
    }

    /// Request every account and publish the result on the unfiltered channel.
    pub fn load_all(&self) -> Command<()> {
        self.remember_filter(TypeFilter::All);
        self.unfiltered.send_replace(ChannelState::Loading);

        let store = self.clone();
        Command(tokio::spawn(async move { store.fetch_all().await }))
    }

    /// Request the accounts of `account_type` and publish the result on the
    /// filtered channel.
    pub fn load_by_type(&self, account_type: AccountType) -> Command<()> {
        self.remember_filter(TypeFilter::Only(account_type));
        self.filtered.send_replace(ChannelState::Loading);

        let store = self.clone();
        Command(tokio::spawn(
            async move { store.fetch_by_type(account_type).await },
        ))
    }

    /// Dispatch [load_all](Self::load_all) or [load_by_type](Self::load_by_type)
    /// depending on `filter`.
    pub fn load(&self, filter: TypeFilter) -> Command<()> {
        match filter {
            TypeFilter::All => self.load_all(),
            TypeFilter::Only(account_type) => self.load_by_type(account_type),
        }
    }

    /// Ask the service to create an account.
    ///
    /// On success the channel of the most recent load is fetched again before
    /// the command finishes.
    ///
    /// # Errors
    /// Returns [Error::InvalidBalance] without contacting the service if
    /// `balance` is NaN or infinite.
    pub fn create(
        &self,
        balance: f64,
        account_type: AccountType,
    ) -> Result<Command<Account>, Error> {
        if !balance.is_finite() {
            return Err(Error::InvalidBalance(balance.to_string()));
        }

        let new_account = NewAccount {
            balance,
            account_type,
        };
        let store = self.clone();

        Ok(Command(tokio::spawn(async move {
            let account = store
                .service
                .create_account(new_account)
                .await
                .inspect_err(|error| tracing::error!("could not create account: {error}"))?;
            tracing::info!("created account {}", account.id);

            store.refresh().await;

            Ok(account)
        })))
    }

    /// Ask the service to delete the account `id`.
    ///
    /// There is no confirmation step here, callers are expected to have asked
    /// already. On success the channel of the most recent load is fetched
    /// again before the command finishes.
    pub fn delete(&self, id: AccountId) -> Command<()> {
        let store = self.clone();

        Command(tokio::spawn(async move {
            store
                .service
                .delete_account(&id)
                .await
                .inspect_err(|error| tracing::error!("could not delete account {id}: {error}"))?;
            tracing::info!("deleted account {id}");

            store.refresh().await;

            Ok(())
        }))
    }

    fn sender(&self, channel: Channel) -> &watch::Sender<ChannelState> {
        match channel {
            Channel::Unfiltered => &self.unfiltered,
            Channel::Filtered => &self.filtered,
        }
    }

    fn remember_filter(&self, filter: TypeFilter) {
        match self.last_filter.lock() {
            Ok(mut last_filter) => *last_filter = filter,
            Err(error) => tracing::error!("could not record the last filter: {error}"),
        }
    }

    /// The filter of the most recent load command, [TypeFilter::All] if
    /// nothing has been loaded yet.
    pub fn last_filter(&self) -> TypeFilter {
        self.last_filter
            .lock()
            .map(|filter| *filter)
            .unwrap_or_default()
    }

    async fn refresh(&self) {
        let outcome = match self.last_filter() {
            TypeFilter::All => {
                self.unfiltered.send_replace(ChannelState::Loading);
                self.fetch_all().await
            }
            TypeFilter::Only(account_type) => {
                self.filtered.send_replace(ChannelState::Loading);
                self.fetch_by_type(account_type).await
            }
        };

        if let Err(error) = outcome {
            tracing::warn!("could not refresh accounts: {error}");
        }
    }

    async fn fetch_all(&self) -> Result<(), Error> {
        match self.service.all_accounts().await {
            Ok(accounts) => {
                tracing::debug!("loaded {} accounts", accounts.len());
                self.unfiltered.send_replace(ChannelState::Success(accounts));
                Ok(())
            }
            Err(error) => {
                tracing::error!("could not load accounts: {error}");
                self.unfiltered
                    .send_replace(ChannelState::Error(error.to_string()));
                Err(error)
            }
        }
    }

    async fn fetch_by_type(&self, account_type: AccountType) -> Result<(), Error> {
        match self.service.accounts_by_type(account_type).await {
            Ok(accounts) => {
                let count = accounts.len();
                let accounts: Vec<Account> = accounts
                    .into_iter()
                    .filter(|account| account.account_type == account_type)
                    .collect();

                if accounts.len() != count {
                    tracing::warn!(
                        "dropped {} accounts that are not {account_type} accounts",
                        count - accounts.len()
                    );
                }

                self.filtered.send_replace(ChannelState::Success(accounts));
                Ok(())
            }
            Err(error) => {
                tracing::error!("could not load {account_type} accounts: {error}");
                self.filtered
                    .send_replace(ChannelState::Error(error.to_string()));
                Err(error)
            }
        }
    }
}
