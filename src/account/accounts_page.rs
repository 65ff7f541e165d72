//! Displays the accounts with the type filter and the buttons that open the dialogs.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRequest;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    account::{Account, AccountType, TypeFilter},
    alert::Alert,
    endpoints::{self, format_endpoint},
    html::{
        ALERT_CONTAINER_ID, BUTTON_DELETE_STYLE, DIALOG_CONTAINER_ID, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::NavBar,
    presenter::{ListPresenter, ListView, lock_presenter},
    store::AccountStore,
};

/// The id of the element holding the filtered list, swapped on filter changes.
const ACCOUNT_LIST_ID: &str = "account-list";

/// The state needed for the [get_accounts_page](crate::account::get_accounts_page) route handler.
#[derive(Clone)]
pub struct AccountsPageState {
    pub account_store: AccountStore,
    pub list_presenter: Arc<Mutex<ListPresenter>>,
}

impl FromRef<AppState> for AccountsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            account_store: state.account_store.clone(),
            list_presenter: state.list_presenter.clone(),
        }
    }
}

/// The query parameters for the accounts page.
#[derive(Debug, Default, Deserialize)]
pub struct AccountsQuery {
    /// The filter selector position: `ALL`, `CURRENT` or `SAVINGS`.
    #[serde(rename = "type")]
    pub filter: Option<String>,
}

/// Renders the accounts page for the selected filter.
///
/// The matching load command is dispatched and awaited before rendering, a
/// failed load shows its message above the rows from the last success. The
/// channel is read once as a snapshot, so the loading notice only shows when
/// a newer load of the same channel is still in flight. HTMX requests only
/// get the list.
pub async fn get_accounts_page(
    State(state): State<AccountsPageState>,
    HxRequest(is_htmx_request): HxRequest,
    Query(query): Query<AccountsQuery>,
) -> Result<Response, Error> {
    let filter = query
        .filter
        .as_deref()
        .map(TypeFilter::from_selection)
        .unwrap_or_default();

    let channel = lock_presenter(&state.list_presenter)?.select_filter(filter);

    if let Err(error) = state.account_store.load(filter).finished().await {
        tracing::warn!("showing stale {} accounts: {error}", filter.label());
    }

    let snapshot = state.account_store.current(channel);
    let mut presenter = lock_presenter(&state.list_presenter)?;
    presenter.observe(channel, &snapshot);
    // Another request may have switched channels while this load was in flight.
    presenter.select_filter(filter);
    let list = accounts_list_view(filter, &presenter.view());

    if is_htmx_request {
        Ok(list.into_response())
    } else {
        Ok(accounts_page_view(filter, &list).into_response())
    }
}

fn accounts_page_view(filter: TypeFilter, list: &Markup) -> Markup {
    let nav_bar = NavBar::new(endpoints::ACCOUNTS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Accounts" }

                    button
                        type="button"
                        id="add-account"
                        class=(LINK_STYLE)
                        hx-get=(endpoints::NEW_ACCOUNT_DIALOG)
                        hx-target={ "#" (DIALOG_CONTAINER_ID) }
                        hx-target-error={ "#" (ALERT_CONTAINER_ID) }
                    {
                        "Add Account"
                    }
                }

                (filter_selector(filter))

                (list)
            }
        }
    );

    base("Accounts", &content)
}

fn filter_selector(active: TypeFilter) -> Markup {
    let positions = [
        TypeFilter::All,
        TypeFilter::Only(AccountType::Current),
        TypeFilter::Only(AccountType::Savings),
    ];

    html!(
        fieldset class=(FORM_RADIO_GROUP_STYLE)
        {
            legend class="sr-only" { "Account type" }

            @for position in positions {
                @let value = position.as_query_value();
                @let input_id = format!("filter-{}", value.to_lowercase());

                div class="flex-1"
                {
                    input
                        type="radio"
                        id=(input_id)
                        name="type"
                        value=(value)
                        class=(FORM_RADIO_INPUT_STYLE)
                        checked[position == active]
                        hx-get=(endpoints::ACCOUNTS_VIEW)
                        hx-target={ "#" (ACCOUNT_LIST_ID) }
                        hx-swap="outerHTML"
                        hx-push-url="true"
                        hx-target-error={ "#" (ALERT_CONTAINER_ID) };

                    label for=(input_id) class=(FORM_RADIO_LABEL_STYLE)
                    {
                        (position.label())
                    }
                }
            }
        }
    )
}

fn accounts_list_view(filter: TypeFilter, view: &ListView<'_>) -> Markup {
    html!(
        section
            id=(ACCOUNT_LIST_ID)
            class="w-full overflow-x-auto dark:bg-gray-800"
            data-filter=(filter.as_query_value())
        {
            @if let Some(error) = view.error {
                (load_error_alert(error))
            }

            @if view.loading {
                p class="px-6 py-2 text-sm text-gray-500 dark:text-gray-400" aria-busy="true"
                {
                    "Loading accounts…"
                }
            }

            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class="px-6 py-3 text-right" { "Balance" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Created" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for account in view.rows {
                        (account_row(account))
                    }

                    @if view.rows.is_empty() && view.error.is_none() {
                        tr
                        {
                            td
                                colspan="4"
                                class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                            {
                                @if filter == TypeFilter::All {
                                    "No accounts found."
                                } @else {
                                    "No accounts of this type found."
                                }
                            }
                        }
                    }
                }
            }
        }
    )
}

fn load_error_alert(error: &str) -> Markup {
    Alert::Error {
        message: "Could not load accounts".to_owned(),
        details: error.to_owned(),
    }
    .into_html()
}

fn account_row(account: &Account) -> Markup {
    let delete_url = format_endpoint(endpoints::DELETE_ACCOUNT_DIALOG, account.id.as_str());

    html!(
        tr class=(TABLE_ROW_STYLE) data-account-id=(account.id)
        {
            td class="px-6 py-4 text-right tabular-nums text-gray-900 dark:text-white"
            {
                (format_currency(account.balance))
            }

            td class=(TABLE_CELL_STYLE) { (account.account_type.label()) }

            td class=(TABLE_CELL_STYLE)
            {
                @match account.creation_day() {
                    Some(day) => {
                        time datetime=(day) { (account.creation_date) }
                    }
                    None => {
                        (account.creation_date)
                    }
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                button
                    type="button"
                    class=(BUTTON_DELETE_STYLE)
                    hx-get=(delete_url)
                    hx-target={ "#" (DIALOG_CONTAINER_ID) }
                    hx-target-error={ "#" (ALERT_CONTAINER_ID) }
                {
                    "Delete"
                }
            }
        }
    )
}
