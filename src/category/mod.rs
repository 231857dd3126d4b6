//! Income and expense categories that transactions and budgets belong to.

mod db;
mod domain;
mod endpoints;

pub use db::{
    create_category, create_category_table, delete_category, find_category_by_name,
    find_income_category, get_all_categories, get_category, seed_default_categories,
};
pub use domain::{Category, CategoryId, CategoryName, CategoryType};
pub use endpoints::{
    create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
    seed_default_categories_endpoint,
};
