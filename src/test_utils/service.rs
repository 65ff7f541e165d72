use std::{
    collections::VecDeque,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::{
    Error,
    account::{Account, AccountId, AccountType, NewAccount},
    service::AccountService,
};

pub(crate) fn account(id: &str, balance: f64, account_type: AccountType) -> Account {
    Account {
        id: AccountId::new(id),
        balance,
        creation_date: "2024-11-20".to_owned(),
        account_type,
    }
}

type Reply<T> = oneshot::Receiver<Result<T, Error>>;

/// An [AccountService] that answers each call with the next queued reply.
///
/// Replies queued with the `*_later` methods are only delivered once the test
/// sends them, which lets a test decide the order in which calls complete.
/// A call with no queued reply fails with [Error::Transport].
#[derive(Default)]
pub(crate) struct ScriptedService {
    all: Mutex<VecDeque<Reply<Vec<Account>>>>,
    by_type: Mutex<VecDeque<Reply<Vec<Account>>>>,
    create: Mutex<VecDeque<Reply<Account>>>,
    delete: Mutex<VecDeque<Reply<()>>>,
}

fn queue_now<T>(queue: &Mutex<VecDeque<Reply<T>>>, reply: Result<T, Error>) {
    let (sender, receiver) = oneshot::channel();
    let _ = sender.send(reply);
    queue.lock().unwrap().push_back(receiver);
}

fn queue_later<T>(queue: &Mutex<VecDeque<Reply<T>>>) -> oneshot::Sender<Result<T, Error>> {
    let (sender, receiver) = oneshot::channel();
    queue.lock().unwrap().push_back(receiver);
    sender
}

async fn next_reply<T>(queue: &Mutex<VecDeque<Reply<T>>>, operation: &str) -> Result<T, Error> {
    let receiver = queue.lock().unwrap().pop_front();

    match receiver {
        Some(receiver) => receiver
            .await
            .unwrap_or_else(|_| Err(Error::Transport(format!("{operation} reply dropped")))),
        None => Err(Error::Transport(format!("no reply queued for {operation}"))),
    }
}

impl ScriptedService {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply_all(&self, reply: Result<Vec<Account>, Error>) {
        queue_now(&self.all, reply);
    }

    pub(crate) fn reply_all_later(&self) -> oneshot::Sender<Result<Vec<Account>, Error>> {
        queue_later(&self.all)
    }

    pub(crate) fn reply_by_type(&self, reply: Result<Vec<Account>, Error>) {
        queue_now(&self.by_type, reply);
    }

    pub(crate) fn reply_by_type_later(&self) -> oneshot::Sender<Result<Vec<Account>, Error>> {
        queue_later(&self.by_type)
    }

    pub(crate) fn reply_create(&self, reply: Result<Account, Error>) {
        queue_now(&self.create, reply);
    }

    pub(crate) fn reply_delete(&self, reply: Result<(), Error>) {
        queue_now(&self.delete, reply);
    }
}

#[async_trait]
impl AccountService for ScriptedService {
    async fn all_accounts(&self) -> Result<Vec<Account>, Error> {
        next_reply(&self.all, "all_accounts").await
    }

    async fn accounts_by_type(&self, _account_type: AccountType) -> Result<Vec<Account>, Error> {
        next_reply(&self.by_type, "accounts_by_type").await
    }

    async fn create_account(&self, _new_account: NewAccount) -> Result<Account, Error> {
        next_reply(&self.create, "create_account").await
    }

    async fn delete_account(&self, _id: &AccountId) -> Result<(), Error> {
        next_reply(&self.delete, "delete_account").await
    }
}

/// Wraps another [AccountService] and counts the calls made to it.
pub(crate) struct CountingService<S> {
    inner: S,
    create_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl<S: AccountService> CountingService<S> {
    pub(crate) fn new(inner: S) -> Self {
        Self {
            inner,
            create_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: AccountService> AccountService for CountingService<S> {
    async fn all_accounts(&self) -> Result<Vec<Account>, Error> {
        self.inner.all_accounts().await
    }

    async fn accounts_by_type(&self, account_type: AccountType) -> Result<Vec<Account>, Error> {
        self.inner.accounts_by_type(account_type).await
    }

    async fn create_account(&self, new_account: NewAccount) -> Result<Account, Error> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.create_account(new_account).await
    }

    async fn delete_account(&self, id: &AccountId) -> Result<(), Error> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_account(id).await
    }
}
