//! Turns the results of the add and delete dialogs into store commands.
//!
//! A dialog is modelled as a modal interaction that ends with a
//! [DialogResult], so the controller does not care whether the dialog was an
//! HTML fragment, a terminal prompt or a test.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    account::{Account, AccountId, AccountType},
    store::{AccountStore, Command},
};

/// How a dialog was closed.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogResult<T> {
    /// The user pressed the positive button, carrying the dialog's fields.
    Confirmed(T),
    /// The user dismissed the dialog.
    Cancelled,
}

/// The button a dialog form was submitted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Confirm,
    Cancel,
}

impl Choice {
    pub fn into_result<T>(self, fields: T) -> DialogResult<T> {
        match self {
            Choice::Confirm => DialogResult::Confirmed(fields),
            Choice::Cancel => DialogResult::Cancelled,
        }
    }
}

/// The raw fields of the add dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddAccountInput {
    /// The balance exactly as typed.
    pub balance: String,
    /// The selected type, `None` if the selection could not be read.
    pub account_type: Option<String>,
}

/// What happened after the add dialog closed.
#[derive(Debug)]
pub enum AddOutcome {
    /// The create command was dispatched to the store.
    Dispatched(Command<Account>),
    /// The dialog was cancelled, nothing was sent.
    Cancelled,
}

/// Parse the balance typed into the add dialog.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
/// Returns [Error::InvalidBalance] if `text` is not a finite number. "NaN" and
/// "inf" parse as floats but are rejected.
pub fn parse_balance(text: &str) -> Result<f64, Error> {
    let trimmed = text.trim();

    match trimmed.parse::<f64>() {
        Ok(balance) if balance.is_finite() => Ok(balance),
        _ => Err(Error::InvalidBalance(trimmed.to_owned())),
    }
}

/// Map the type selected in the add dialog to an [AccountType].
///
/// Anything that is not recognisably a savings account, including a missing
/// selection, is a current account.
pub fn account_type_from_selection(selection: Option<&str>) -> AccountType {
    let Some(selection) = selection else {
        return AccountType::Current;
    };

    match selection.trim().to_uppercase().as_str() {
        "EPARGNE" | "ÉPARGNE" | "SAVINGS" => AccountType::Savings,
        "COURANT" | "CURRENT" => AccountType::Current,
        other => {
            tracing::debug!("unknown account type selection {other:?}, using current");
            AccountType::Current
        }
    }
}

/// Forwards dialog results to an [AccountStore].
#[derive(Clone)]
pub struct DialogController {
    store: AccountStore,
}

impl DialogController {
    /// Create a controller that sends commands to `store`.
    pub fn new(store: AccountStore) -> Self {
        Self { store }
    }

    /// Handle the result of the add dialog.
    ///
    /// # Errors
    /// Returns [Error::InvalidBalance] if the balance is not a number. The
    /// store is not called in that case and the dialog should stay open.
    pub fn submit_add(&self, result: DialogResult<AddAccountInput>) -> Result<AddOutcome, Error> {
        let input = match result {
            DialogResult::Confirmed(input) => input,
            DialogResult::Cancelled => return Ok(AddOutcome::Cancelled),
        };

        let balance = parse_balance(&input.balance)?;
        let account_type = account_type_from_selection(input.account_type.as_deref());

        self.store
            .create(balance, account_type)
            .map(AddOutcome::Dispatched)
    }

    /// Handle the result of the delete confirmation for account `id`.
    ///
    /// Returns the dispatched delete command, or `None` if the dialog was
    /// cancelled.
    pub fn resolve_delete(&self, result: DialogResult<AccountId>) -> Option<Command<()>> {
        match result {
            DialogResult::Confirmed(id) => Some(self.store.delete(id)),
            DialogResult::Cancelled => None,
        }
    }
}
