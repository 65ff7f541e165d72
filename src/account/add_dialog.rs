//! The dialog for adding an account and the endpoint it is submitted to.

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState,
    account::AccountType,
    dialog::{AddAccountInput, AddOutcome, Choice, DialogController, account_type_from_selection},
    endpoints,
    html::{
        ALERT_CONTAINER_ID, BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, DIALOG_CONTAINER_ID,
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, dialog_view,
    },
    store::AccountStore,
};

/// The message shown in the dialog when the balance is not a number.
const INVALID_BALANCE_MESSAGE: &str = "Please enter a valid amount";

/// The state needed to submit the add dialog.
#[derive(Clone)]
pub struct AddAccountState {
    pub dialog_controller: DialogController,
    pub account_store: AccountStore,
}

impl FromRef<AppState> for AddAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            dialog_controller: state.dialog_controller.clone(),
            account_store: state.account_store.clone(),
        }
    }
}

/// The form data sent by the add dialog.
#[derive(Debug, Deserialize)]
pub struct AddAccountForm {
    /// The balance as typed.
    #[serde(default)]
    pub balance: String,
    /// The selected type, `COURANT` or `EPARGNE`.
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    /// The button the form was submitted with, confirm if missing.
    pub choice: Option<Choice>,
}

/// The value the type radio buttons submit for `account_type`.
fn type_field_value(account_type: AccountType) -> &'static str {
    match account_type {
        AccountType::Current => "COURANT",
        AccountType::Savings => "EPARGNE",
    }
}

fn add_account_dialog(balance: &str, account_type: AccountType, error: Option<&str>) -> Markup {
    let content = html!(
        form
            hx-post=(endpoints::ACCOUNTS_API)
            hx-target={ "#" (DIALOG_CONTAINER_ID) }
            hx-target-error={ "#" (ALERT_CONTAINER_ID) }
            class="space-y-4"
        {
            div
            {
                label for="balance" class=(FORM_LABEL_STYLE) { "Balance" }

                input
                    type="text"
                    inputmode="decimal"
                    id="balance"
                    name="balance"
                    placeholder="0.00"
                    value=(balance)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);

                @if let Some(error) = error {
                    p class="mt-2 text-sm text-red-600 dark:text-red-500" { (error) }
                }
            }

            fieldset
            {
                legend class=(FORM_LABEL_STYLE) { "Type" }

                div class=(FORM_RADIO_GROUP_STYLE)
                {
                    @for option in [AccountType::Current, AccountType::Savings] {
                        @let value = type_field_value(option);
                        @let input_id = format!("type-{}", value.to_lowercase());

                        div class="flex-1"
                        {
                            input
                                type="radio"
                                id=(input_id)
                                name="type"
                                value=(value)
                                class=(FORM_RADIO_INPUT_STYLE)
                                checked[option == account_type];

                            label for=(input_id) class=(FORM_RADIO_LABEL_STYLE)
                            {
                                (option.label())
                            }
                        }
                    }
                }
            }

            div class="flex gap-2"
            {
                button type="submit" name="choice" value="confirm" class=(BUTTON_PRIMARY_STYLE)
                {
                    "Add"
                }

                button
                    type="submit"
                    name="choice"
                    value="cancel"
                    formnovalidate
                    class=(BUTTON_SECONDARY_STYLE)
                {
                    "Cancel"
                }
            }
        }
    );

    dialog_view("Add Account", &content)
}

/// Renders the empty add dialog, a current account is selected by default.
pub async fn get_add_account_dialog() -> Response {
    add_account_dialog("", AccountType::Current, None).into_response()
}

/// A route handler for the add dialog.
///
/// Cancelling closes the dialog. An invalid balance re-renders the dialog with
/// an error message and nothing is sent to the account service. Otherwise the
/// account is created and the client is redirected to the accounts page.
pub async fn add_account_endpoint(
    State(state): State<AddAccountState>,
    Form(form): Form<AddAccountForm>,
) -> Response {
    let selected_type = account_type_from_selection(form.account_type.as_deref());
    let result = form
        .choice
        .unwrap_or(Choice::Confirm)
        .into_result(AddAccountInput {
            balance: form.balance.clone(),
            account_type: form.account_type,
        });

    let command = match state.dialog_controller.submit_add(result) {
        Ok(AddOutcome::Dispatched(command)) => command,
        // An empty body swapped into the dialog container closes the dialog.
        Ok(AddOutcome::Cancelled) => return Html("").into_response(),
        Err(error) if error.is_validation() => {
            tracing::debug!("rejected add dialog input: {error}");
            // Answer with 200 OK so that HTMX swaps the dialog back in.
            return add_account_dialog(&form.balance, selected_type, Some(INVALID_BALANCE_MESSAGE))
                .into_response();
        }
        Err(error) => return error.into_alert_response(),
    };

    match command.finished().await {
        Ok(_) => (
            HxRedirect(endpoints::accounts_view_with_filter(
                state.account_store.last_filter(),
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}


#[cfg(test)]
mod add_account_endpoint_tests {
    use std::sync::Arc;

    use axum::{Form, extract::State, http::StatusCode};
    use scraper::Selector;

    use crate::{
        Error,
        account::{
            AccountType,
            add_dialog::{AddAccountForm, AddAccountState, add_account_endpoint},
        },
        dialog::{Choice, DialogController},
        service::{AccountService, InMemoryAccountService},
        store::{AccountStore, Channel, ChannelState},
        test_utils::{
            CountingService, ScriptedService, account, assert_form_error_message,
            assert_hx_redirect, must_get_form, parse_html_fragment,
        },
    };

    fn state_with(service: Arc<dyn AccountService>) -> AddAccountState {
        let account_store = AccountStore::new(service);

        AddAccountState {
            dialog_controller: DialogController::new(account_store.clone()),
            account_store,
        }
    }

    fn form(balance: &str, account_type: &str, choice: Option<Choice>) -> Form<AddAccountForm> {
        Form(AddAccountForm {
            balance: balance.to_owned(),
            account_type: Some(account_type.to_owned()),
            choice,
        })
    }

    #[tokio::test]
    async fn creates_account_and_redirects() {
        let service = Arc::new(InMemoryAccountService::new());
        let state = state_with(service.clone());

        let response = add_account_endpoint(
            State(state),
            form("150.0", "COURANT", Some(Choice::Confirm)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/accounts?type=ALL");
        let accounts = service.all_accounts().await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].balance, 150.0);
        assert_eq!(accounts[0].account_type, AccountType::Current);
    }

    #[tokio::test]
    async fn missing_choice_means_confirm() {
        let service = Arc::new(InMemoryAccountService::new());
        let state = state_with(service.clone());

        let response = add_account_endpoint(State(state), form("20", "EPARGNE", None)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let accounts = service.all_accounts().await.unwrap();
        assert_eq!(accounts[0].account_type, AccountType::Savings);
    }

    #[tokio::test]
    async fn redirect_keeps_the_last_filter() {
        let service = Arc::new(InMemoryAccountService::new());
        let state = state_with(service);
        state
            .account_store
            .load_by_type(AccountType::Savings)
            .finished()
            .await
            .unwrap();

        let response = add_account_endpoint(
            State(state),
            form("5", "EPARGNE", Some(Choice::Confirm)),
        )
        .await;

        assert_hx_redirect(&response, "/accounts?type=SAVINGS");
    }

    #[tokio::test]
    async fn invalid_balance_rerenders_dialog() {
        let service = Arc::new(CountingService::new(InMemoryAccountService::new()));
        let state = state_with(service.clone());

        let response = add_account_endpoint(
            State(state),
            form("abc", "EPARGNE", Some(Choice::Confirm)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Please enter a valid amount");
        let balance = form
            .select(&Selector::parse("input[name='balance']").unwrap())
            .next()
            .unwrap();
        assert_eq!(balance.attr("value"), Some("abc"));
        let checked = form
            .select(&Selector::parse("input[name='type'][checked]").unwrap())
            .next()
            .unwrap();
        assert_eq!(checked.attr("value"), Some("EPARGNE"));
        assert_eq!(service.create_calls(), 0);
    }

    #[tokio::test]
    async fn cancel_closes_dialog_without_creating() {
        let service = Arc::new(CountingService::new(InMemoryAccountService::new()));
        let state = state_with(service.clone());

        let response = add_account_endpoint(
            State(state),
            form("150", "COURANT", Some(Choice::Cancel)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
        assert_eq!(service.create_calls(), 0);
    }

    #[tokio::test]
    async fn service_failure_shows_alert() {
        let service = Arc::new(ScriptedService::new());
        service.reply_create(Err(Error::GraphQl("balance too large".to_owned())));
        let state = state_with(service);

        let response = add_account_endpoint(
            State(state),
            form("1e12", "COURANT", Some(Choice::Confirm)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let html = parse_html_fragment(response).await;
        let alert: String = html
            .select(&Selector::parse("[role=alert]").unwrap())
            .next()
            .expect("want an error alert")
            .text()
            .collect();
        assert!(alert.contains("balance too large"));
    }

    #[tokio::test]
    async fn created_account_is_listed_after_redirect() {
        let service = Arc::new(ScriptedService::new());
        let created = account("a1", 150.0, AccountType::Current);
        service.reply_create(Ok(created.clone()));
        service.reply_all(Ok(vec![created.clone()]));
        let state = state_with(service);

        add_account_endpoint(
            State(state.clone()),
            form("150.0", "COURANT", Some(Choice::Confirm)),
        )
        .await;

        assert_eq!(
            state.account_store.current(Channel::Unfiltered),
            ChannelState::Success(vec![created])
        );
    }
}
