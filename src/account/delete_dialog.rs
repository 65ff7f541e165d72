//! The confirmation dialog for deleting an account and the endpoint it is submitted to.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    account::AccountId,
    dialog::{Choice, DialogController},
    endpoints::{self, format_endpoint},
    html::{
        ALERT_CONTAINER_ID, BUTTON_DANGER_STYLE, BUTTON_SECONDARY_STYLE, DIALOG_CONTAINER_ID,
        dialog_view,
    },
    presenter::{DeleteIntent, ListPresenter, lock_presenter},
    store::AccountStore,
};

/// The state needed to open and submit the delete dialog.
#[derive(Clone)]
pub struct DeleteAccountState {
    pub dialog_controller: DialogController,
    pub account_store: AccountStore,
    pub list_presenter: Arc<Mutex<ListPresenter>>,
}

impl FromRef<AppState> for DeleteAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            dialog_controller: state.dialog_controller.clone(),
            account_store: state.account_store.clone(),
            list_presenter: state.list_presenter.clone(),
        }
    }
}

/// The form data sent by the delete dialog.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteAccountForm {
    /// The button the form was submitted with, cancel if missing.
    pub choice: Option<Choice>,
}

fn delete_account_dialog(intent: &DeleteIntent) -> Markup {
    let content = html!(
        p class="text-sm text-gray-700 dark:text-gray-300"
        {
            "Are you sure you want to delete account "
            span class="font-semibold" { (intent.id) }
            "? This cannot be undone."
        }

        form
            hx-post=(format_endpoint(endpoints::DELETE_ACCOUNT_API, intent.id.as_str()))
            hx-target={ "#" (DIALOG_CONTAINER_ID) }
            hx-target-error={ "#" (ALERT_CONTAINER_ID) }
            class="flex gap-2"
        {
            button type="submit" name="choice" value="confirm" class=(BUTTON_DANGER_STYLE)
            {
                "Delete"
            }

            button type="submit" name="choice" value="cancel" class=(BUTTON_SECONDARY_STYLE)
            {
                "Cancel"
            }
        }
    );

    dialog_view("Delete Account", &content)
}

/// Renders the confirmation dialog for a row on the accounts page.
///
/// Responds with a 404 alert if no row on the page shows the account.
pub async fn get_delete_account_dialog(
    State(state): State<DeleteAccountState>,
    Path(account_id): Path<AccountId>,
) -> Response {
    let intent = match lock_presenter(&state.list_presenter) {
        Ok(presenter) => presenter.delete_intent(&account_id),
        Err(error) => return error.into_alert_response(),
    };

    match intent {
        Some(intent) => delete_account_dialog(&intent).into_response(),
        None => {
            tracing::debug!("no rendered row for account {account_id}");
            Error::NotFound.into_alert_response()
        }
    }
}

/// A route handler for the delete dialog.
///
/// Cancelling closes the dialog without contacting the account service.
/// Confirming deletes the account and redirects the client to the accounts page.
pub async fn delete_account_endpoint(
    State(state): State<DeleteAccountState>,
    Path(account_id): Path<AccountId>,
    Form(form): Form<DeleteAccountForm>,
) -> Response {
    let result = form
        .choice
        .unwrap_or(Choice::Cancel)
        .into_result(account_id);

    let Some(command) = state.dialog_controller.resolve_delete(result) else {
        // An empty body swapped into the dialog container closes the dialog.
        return Html("").into_response();
    };

    match command.finished().await {
        Ok(()) => (
            HxRedirect(endpoints::accounts_view_with_filter(
                state.account_store.last_filter(),
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}
