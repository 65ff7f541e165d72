use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

/// The opaque identifier the account service assigns to an account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Wrap an id sent by the account service.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kind of an account.
///
/// The account service names these `COURANT` and `EPARGNE`, the English names
/// are accepted when decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    /// A current (checking) account.
    #[serde(rename = "COURANT", alias = "CURRENT")]
    Current,
    /// A savings account.
    #[serde(rename = "EPARGNE", alias = "SAVINGS")]
    Savings,
}

impl AccountType {
    /// The value used for this type in query strings and form fields.
    pub fn as_query_value(&self) -> &'static str {
        match self {
            AccountType::Current => "CURRENT",
            AccountType::Savings => "SAVINGS",
        }
    }

    /// The name shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            AccountType::Current => "Current",
            AccountType::Savings => "Savings",
        }
    }
}

impl Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// An account as returned by the account service.
///
/// Accounts are never modified in place, a fresh list replaces the old one
/// after every round trip to the service.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// The id assigned by the account service.
    pub id: AccountId,
    /// The balance, may be negative.
    pub balance: f64,
    /// When the account was created, as sent by the account service.
    pub creation_date: String,
    /// Whether this is a current or savings account.
    pub account_type: AccountType,
}

const ISO_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month repr:numerical padding:zero]-[day padding:zero]");

impl Account {
    /// The creation date as a calendar date, if the service sent an ISO date
    /// (optionally followed by a time).
    pub fn creation_day(&self) -> Option<Date> {
        let date_part = self.creation_date.get(..10)?;

        Date::parse(date_part, ISO_DATE_FORMAT).ok()
    }
}

/// The validated fields for a new account.
///
/// Only [AccountStore::create](crate::AccountStore::create) builds these, after
/// checking that the balance is a finite number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewAccount {
    /// The opening balance.
    pub balance: f64,
    /// Whether to open a current or savings account.
    pub account_type: AccountType,
}

/// The position of the type filter on the accounts page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    /// Every account, shown from the unfiltered channel.
    #[default]
    All,
    /// Only accounts of one type, shown from the filtered channel.
    Only(AccountType),
}

impl TypeFilter {
    /// Map a selector value to a filter, unknown values select all accounts.
    pub fn from_selection(selection: &str) -> Self {
        match selection.trim().to_uppercase().as_str() {
            "CURRENT" | "COURANT" => TypeFilter::Only(AccountType::Current),
            "SAVINGS" | "EPARGNE" => TypeFilter::Only(AccountType::Savings),
            _ => TypeFilter::All,
        }
    }

    pub fn as_query_value(&self) -> &'static str {
        match self {
            TypeFilter::All => "ALL",
            TypeFilter::Only(account_type) => account_type.as_query_value(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TypeFilter::All => "All",
            TypeFilter::Only(account_type) => account_type.label(),
        }
    }
}


#[cfg(test)]
mod type_filter_tests {
    use super::{AccountType, TypeFilter};

    #[test]
    fn parses_selector_positions() {
        assert_eq!(TypeFilter::from_selection("ALL"), TypeFilter::All);
        assert_eq!(
            TypeFilter::from_selection("CURRENT"),
            TypeFilter::Only(AccountType::Current)
        );
        assert_eq!(
            TypeFilter::from_selection("savings"),
            TypeFilter::Only(AccountType::Savings)
        );
        assert_eq!(
            TypeFilter::from_selection(" epargne "),
            TypeFilter::Only(AccountType::Savings)
        );
    }

    #[test]
    fn unknown_selection_selects_all() {
        assert_eq!(TypeFilter::from_selection(""), TypeFilter::All);
        assert_eq!(TypeFilter::from_selection("loans"), TypeFilter::All);
    }

    #[test]
    fn query_value_round_trips() {
        for filter in [
            TypeFilter::All,
            TypeFilter::Only(AccountType::Current),
            TypeFilter::Only(AccountType::Savings),
        ] {
            assert_eq!(TypeFilter::from_selection(filter.as_query_value()), filter);
        }
    }
}
