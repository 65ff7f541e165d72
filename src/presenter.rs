//! Projects the store's channels into the rows shown on the accounts page.

use std::sync::{Mutex, MutexGuard};

use crate::{
    Error,
    account::{Account, AccountId, TypeFilter},
    store::{Channel, ChannelState},
};

/// What the list should show right now.
#[derive(Debug, PartialEq)]
pub struct ListView<'a> {
    /// The channel the rows come from.
    pub channel: Channel,
    /// The rows from the last successful load of the channel.
    pub rows: &'a [Account],
    /// Whether a load of the channel is in flight.
    pub loading: bool,
    /// The message of the last failed load, if it failed after the last success.
    pub error: Option<&'a str>,
}

/// A request to delete the account in a rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteIntent {
    /// The account to delete.
    pub id: AccountId,
}

#[derive(Debug, Default)]
struct ChannelView {
    rows: Vec<Account>,
    loading: bool,
    error: Option<String>,
}

/// Keeps the last rows of both channels and which one is on screen.
///
/// An error never clears rows, the previous list stays visible next to the
/// message until a later success replaces it.
#[derive(Debug)]
pub struct ListPresenter {
    active: Channel,
    unfiltered: ChannelView,
    filtered: ChannelView,
}

impl Default for ListPresenter {
    fn default() -> Self {
        Self {
            active: Channel::Unfiltered,
            unfiltered: ChannelView::default(),
            filtered: ChannelView::default(),
        }
    }
}

impl ListPresenter {
    /// Create a presenter showing the unfiltered channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to the channel for `filter` and return it.
    pub fn select_filter(&mut self, filter: TypeFilter) -> Channel {
        self.active = Channel::for_filter(filter);
        self.active
    }

    /// The channel currently on screen.
    pub fn active_channel(&self) -> Channel {
        self.active
    }

    /// Take in a state published on `channel`.
    pub fn observe(&mut self, channel: Channel, state: &ChannelState) {
        let view = self.channel_view_mut(channel);

        match state {
            ChannelState::Loading => view.loading = true,
            ChannelState::Success(accounts) => {
                view.rows = accounts.clone();
                view.loading = false;
                view.error = None;
            }
            ChannelState::Error(message) => {
                view.loading = false;
                view.error = Some(message.clone());
            }
        }
    }

    /// The rows and status of the active channel.
    pub fn view(&self) -> ListView<'_> {
        let view = self.channel_view(self.active);

        ListView {
            channel: self.active,
            rows: &view.rows,
            loading: view.loading,
            error: view.error.as_deref(),
        }
    }

    /// Raise a delete intent for the row showing account `id`.
    ///
    /// Returns `None` if no rendered row shows that account.
    pub fn delete_intent(&self, id: &AccountId) -> Option<DeleteIntent> {
        self.view()
            .rows
            .iter()
            .find(|account| &account.id == id)
            .map(|account| DeleteIntent {
                id: account.id.clone(),
            })
    }

    fn channel_view(&self, channel: Channel) -> &ChannelView {
        match channel {
            Channel::Unfiltered => &self.unfiltered,
            Channel::Filtered => &self.filtered,
        }
    }

    fn channel_view_mut(&mut self, channel: Channel) -> &mut ChannelView {
        match channel {
            Channel::Unfiltered => &mut self.unfiltered,
            Channel::Filtered => &mut self.filtered,
        }
    }
}

/// Lock the presenter shared between request handlers.
pub(crate) fn lock_presenter(
    presenter: &Mutex<ListPresenter>,
) -> Result<MutexGuard<'_, ListPresenter>, Error> {
    presenter.lock().map_err(|error| {
        tracing::error!("could not acquire the list presenter lock: {error}");
        Error::LockError("list presenter")
    })
}

#[cfg(test)]
mod list_presenter_tests {
    use crate::{
        account::{AccountId, AccountType, TypeFilter},
        presenter::{DeleteIntent, ListPresenter},
        store::{Channel, ChannelState},
        test_utils::account,
    };

    #[test]
    fn shows_unfiltered_channel_by_default() {
        let mut presenter = ListPresenter::new();
        let accounts = vec![account("1", 1.0, AccountType::Current)];

        presenter.observe(Channel::Unfiltered, &ChannelState::Success(accounts.clone()));

        let view = presenter.view();
        assert_eq!(view.channel, Channel::Unfiltered);
        assert_eq!(view.rows, accounts.as_slice());
        assert!(!view.loading);
        assert_eq!(view.error, None);
    }

    #[test]
    fn selecting_all_after_savings_shows_unfiltered_channel() {
        let mut presenter = ListPresenter::new();
        let all = vec![
            account("1", 1.0, AccountType::Current),
            account("2", 2.0, AccountType::Savings),
        ];
        let savings = vec![account("2", 2.0, AccountType::Savings)];
        presenter.observe(Channel::Unfiltered, &ChannelState::Success(all.clone()));

        presenter.select_filter(TypeFilter::Only(AccountType::Savings));
        presenter.observe(Channel::Filtered, &ChannelState::Success(savings.clone()));
        assert_eq!(presenter.view().rows, savings.as_slice());

        let channel = presenter.select_filter(TypeFilter::All);

        assert_eq!(channel, Channel::Unfiltered);
        assert_eq!(presenter.view().channel, Channel::Unfiltered);
        assert_eq!(presenter.view().rows, all.as_slice());
    }

    #[test]
    fn error_keeps_previous_rows() {
        let mut presenter = ListPresenter::new();
        let accounts = vec![account("1", 1.0, AccountType::Current)];
        presenter.observe(Channel::Unfiltered, &ChannelState::Success(accounts.clone()));

        presenter.observe(Channel::Unfiltered, &ChannelState::Loading);
        assert!(presenter.view().loading);
        presenter.observe(
            Channel::Unfiltered,
            &ChannelState::Error("backend down".to_owned()),
        );

        let view = presenter.view();
        assert_eq!(view.rows, accounts.as_slice());
        assert_eq!(view.error, Some("backend down"));
        assert!(!view.loading);
    }

    #[test]
    fn success_clears_error() {
        let mut presenter = ListPresenter::new();
        presenter.observe(
            Channel::Unfiltered,
            &ChannelState::Error("backend down".to_owned()),
        );

        presenter.observe(Channel::Unfiltered, &ChannelState::Success(vec![]));

        assert_eq!(presenter.view().error, None);
    }

    #[test]
    fn states_on_inactive_channel_do_not_change_view() {
        let mut presenter = ListPresenter::new();
        presenter.observe(Channel::Unfiltered, &ChannelState::Success(vec![]));

        presenter.observe(
            Channel::Filtered,
            &ChannelState::Error("backend down".to_owned()),
        );

        let view = presenter.view();
        assert_eq!(view.error, None);
        assert!(view.rows.is_empty());
    }

    #[test]
    fn delete_intent_only_for_rendered_rows() {
        let mut presenter = ListPresenter::new();
        presenter.observe(
            Channel::Unfiltered,
            &ChannelState::Success(vec![account("1", 1.0, AccountType::Current)]),
        );

        assert_eq!(
            presenter.delete_intent(&AccountId::new("1")),
            Some(DeleteIntent {
                id: AccountId::new("1")
            })
        );
        assert_eq!(presenter.delete_intent(&AccountId::new("2")), None);
    }
}
