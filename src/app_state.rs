//! Implements a struct that holds the state of the web server.

use std::sync::{Arc, Mutex};

use crate::{
    dialog::DialogController, presenter::ListPresenter, service::AccountService,
    store::AccountStore,
};

/// The state of the web server.
///
/// The app has a single operator, so one presenter is shared by every request.
#[derive(Clone)]
pub struct AppState {
    /// The store that talks to the account service and holds the account lists.
    pub account_store: AccountStore,

    /// Which channel is on screen and the rows last seen on each channel.
    pub list_presenter: Arc<Mutex<ListPresenter>>,

    /// Turns submitted dialogs into store commands.
    pub dialog_controller: DialogController,
}

impl AppState {
    /// Create a new [AppState] that reads and writes accounts through `service`.
    pub fn new(service: Arc<dyn AccountService>) -> Self {
        let account_store = AccountStore::new(service);

        Self {
            dialog_controller: DialogController::new(account_store.clone()),
            list_presenter: Arc::new(Mutex::new(ListPresenter::new())),
            account_store,
        }
    }
}
