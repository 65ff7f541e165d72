//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/accounts/{account_id}/delete', use [format_endpoint].

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::account::TypeFilter;

/// Everything but the unreserved characters of RFC 3986.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// The root route which redirects to the accounts page.
pub const ROOT: &str = "/";
/// The page listing the accounts, takes an optional `type` query parameter.
pub const ACCOUNTS_VIEW: &str = "/accounts";
/// The dialog for adding an account.
pub const NEW_ACCOUNT_DIALOG: &str = "/accounts/new";
/// The dialog asking to confirm deleting an account.
pub const DELETE_ACCOUNT_DIALOG: &str = "/accounts/{account_id}/delete";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// The route the add dialog is submitted to.
pub const ACCOUNTS_API: &str = "/api/accounts";
/// The route the delete confirmation dialog is submitted to.
pub const DELETE_ACCOUNT_API: &str = "/api/accounts/{account_id}/delete";

/// The accounts page with the filter selector set to `filter`.
pub fn accounts_view_with_filter(filter: TypeFilter) -> String {
    format!("{ACCOUNTS_VIEW}?type={}", filter.as_query_value())
}

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/accounts/{account_id}', '{account_id}' is the parameter.
///
/// Account ids are opaque, so `id` is percent-encoded to keep the result a
/// valid path. This function assumes that an endpoint path contains a single
/// parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        utf8_percent_encode(id, PATH_SEGMENT),
        &endpoint_path[param_end..]
    )
}
