mod accounts_page;
mod add_dialog;
mod core;
mod delete_dialog;

pub use accounts_page::get_accounts_page;
pub use add_dialog::{add_account_endpoint, get_add_account_dialog};
pub use core::{Account, AccountId, AccountType, NewAccount, TypeFilter};
pub use delete_dialog::{delete_account_endpoint, get_delete_account_dialog};
