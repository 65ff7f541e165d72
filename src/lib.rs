//! Comptes is a web front-end for a GraphQL account ("compte") service.
//!
//! It lists, filters, creates and deletes accounts. Pages are rendered on the
//! server and dialogs are swapped in with HTMX. The accounts themselves live
//! in the account service, this crate only keeps the most recent results in
//! an [AccountStore].

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod account;
mod alert;
mod app_state;
mod dialog;
mod endpoints;
mod graphql;
mod html;
mod logging;
mod navigation;
mod not_found;
mod presenter;
mod routing;
mod service;
mod store;

#[cfg(test)]
mod test_utils;

pub use account::{Account, AccountId, AccountType, NewAccount, TypeFilter};
pub use app_state::AppState;
pub use dialog::{AddAccountInput, AddOutcome, DialogController, DialogResult};
pub use graphql::{GraphQlAccountService, GraphQlConfig};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use presenter::{DeleteIntent, ListPresenter, ListView};
pub use routing::build_router;
pub use service::{AccountService, InMemoryAccountService};
pub use store::{AccountStore, Channel, ChannelState, Command};

use crate::{alert::Alert, html::error_view, not_found::get_404_not_found_response};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("could not listen for ctrl+c: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("could not listen for the terminate signal: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
        },
    }

    handle.graceful_shutdown(Some(Duration::from_secs(1)));
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The balance entered for a new account is not a finite number.
    ///
    /// This is caught before anything is sent to the account service.
    #[error("\"{0}\" is not a valid amount")]
    InvalidBalance(String),

    /// The account service could not be reached, or it answered with an HTTP
    /// error and no GraphQL payload.
    #[error("could not reach the account service: {0}")]
    Transport(String),

    /// The account service answered with one or more GraphQL errors.
    ///
    /// The messages are joined with "; ".
    #[error("the account service reported an error: {0}")]
    GraphQl(String),

    /// The account service answered with a body that does not match the
    /// expected shape.
    #[error("the account service sent an unexpected response: {0}")]
    MalformedResponse(String),

    /// Tried to delete an account that the account service does not know.
    #[error("tried to delete an account that does not exist")]
    DeleteMissingAccount,

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A mutex guarding shared state was poisoned.
    #[error("could not acquire the {0} lock")]
    LockError(&'static str),

    /// A dispatched command panicked or was aborted before it finished.
    #[error("a command did not run to completion: {0}")]
    CommandFailed(String),
}

impl Error {
    /// Whether the error was raised by local input validation rather than by
    /// the account service.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidBalance(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            tracing::error!("could not decode the account service response: {error}");
            Error::MalformedResponse(error.to_string())
        } else {
            tracing::error!("request to the account service failed: {error}");
            Error::Transport(error.to_string())
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::Transport(_) | Error::GraphQl(_) | Error::MalformedResponse(_) => {
                tracing::error!("the account service failed: {self}");
                (
                    StatusCode::BAD_GATEWAY,
                    error_view(
                        "Account Service Unavailable",
                        "502",
                        "The account service did not answer properly.",
                        "Check that the GraphQL backend is running and try again.",
                    ),
                )
                    .into_response()
            }
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_view(
                        "Internal Server Error",
                        "500",
                        "Sorry, something went wrong.",
                        "Try again later or check the server logs",
                    ),
                )
                    .into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidBalance(input) => Alert::Error {
                message: "Invalid amount".to_owned(),
                details: format!("\"{input}\" is not a number. Please enter a valid amount."),
            }
            .into_response_with_status(StatusCode::UNPROCESSABLE_ENTITY),
            Error::DeleteMissingAccount => Alert::Error {
                message: "Account not found".to_owned(),
                details: "The account no longer exists. Refresh the page to see the current \
                    accounts."
                    .to_owned(),
            }
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::NotFound => Alert::ErrorSimple {
                message: "The account is not in the list. Refresh the page and try again."
                    .to_owned(),
            }
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::Transport(_) | Error::GraphQl(_) | Error::MalformedResponse(_) => {
                tracing::error!("the account service failed: {self}");
                Alert::Error {
                    message: "The account service failed".to_owned(),
                    details: self.to_string(),
                }
                .into_response_with_status(StatusCode::BAD_GATEWAY)
            }
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details: "Try again later or check the server logs".to_owned(),
                }
                .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}
