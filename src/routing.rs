//! Application router configuration.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};

use crate::{
    AppState,
    account::{
        add_account_endpoint, delete_account_endpoint, get_accounts_page, get_add_account_dialog,
        get_delete_account_dialog,
    },
    endpoints,
    html::error_view,
    logging::logging_middleware,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::ACCOUNTS_VIEW, get(get_accounts_page))
        .route(endpoints::NEW_ACCOUNT_DIALOG, get(get_add_account_dialog))
        .route(
            endpoints::DELETE_ACCOUNT_DIALOG,
            get(get_delete_account_dialog),
        )
        .route(endpoints::ACCOUNTS_API, post(add_account_endpoint))
        .route(endpoints::DELETE_ACCOUNT_API, post(delete_account_endpoint))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// The root path '/' redirects to the accounts page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::ACCOUNTS_VIEW)
}

async fn get_internal_server_error_page() -> Response {
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
