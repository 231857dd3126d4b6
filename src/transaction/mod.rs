//! Transactions: money spent or earned in one of a user's categories.
//!
//! This module contains:
//! - The `Transaction` model and the database functions that store it
//! - The route handlers that list, create, re-categorize and delete transactions,
//!   keeping budget alerts in step after each change

mod core;
mod endpoints;

pub use core::{
    NewTransaction, Transaction, TransactionId, create_transaction, create_transaction_table,
    delete_transaction, get_monthly_spend, get_transaction, get_transactions,
    update_transaction_category,
};
pub use endpoints::{
    create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
    get_transactions_endpoint, update_transaction_category_endpoint,
};
