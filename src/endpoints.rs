//! The API endpoints URIs.
//!
//! For endpoints that take parameters, e.g., '/api/users/{user_id}/alerts', use [format_endpoint].

/// The route for classifying a free-text transaction description.
pub const CATEGORIZE: &str = "/api/categorize";
/// The route to list and create a user's categories.
pub const CATEGORIES: &str = "/api/users/{user_id}/categories";
/// The route to give a user the default categories.
pub const DEFAULT_CATEGORIES: &str = "/api/users/{user_id}/categories/defaults";
/// The route to delete a single category.
pub const CATEGORY: &str = "/api/users/{user_id}/categories/{category_id}";
/// The route to set a budget for one of a user's categories.
pub const BUDGETS: &str = "/api/users/{user_id}/budgets";
/// The route to remove the budget for a category.
pub const BUDGET: &str = "/api/users/{user_id}/budgets/{category_id}";
/// The route to get how much of a category's budget has been used in a month.
pub const BUDGET_USAGE: &str = "/api/users/{user_id}/budgets/{category_id}/usage";
/// The route to reconcile the budget alert of a category for a month.
pub const CHECK_ALERTS: &str = "/api/users/{user_id}/budgets/{category_id}/check-alerts";
/// The route to list a user's budget alerts for a month.
pub const ALERTS: &str = "/api/users/{user_id}/alerts";
/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/users/{user_id}/transactions";
/// The route to get or delete a single transaction.
pub const TRANSACTION: &str = "/api/users/{user_id}/transactions/{transaction_id}";
/// The route to change the category of a transaction.
pub const TRANSACTION_CATEGORY: &str =
    "/api/users/{user_id}/transactions/{transaction_id}/category";

/// Replace the parameters in `endpoint_path` with `ids`, in order.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// Parameters without a matching ID are left in place, and extra IDs are ignored.
pub fn format_endpoint(endpoint_path: &str, ids: &[i64]) -> String {
    let mut formatted = String::with_capacity(endpoint_path.len());
    let mut remaining = endpoint_path;
    let mut ids = ids.iter();

    while let Some(param_start) = remaining.find('{') {
        let Some(param_len) = remaining[param_start..].find('}') else {
            break;
        };
        let Some(id) = ids.next() else {
            break;
        };

        formatted.push_str(&remaining[..param_start]);
        formatted.push_str(&id.to_string());
        remaining = &remaining[param_start + param_len + 1..];
    }

    formatted.push_str(remaining);
    formatted
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::CATEGORIZE);
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::CATEGORIES, &[1]));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::DEFAULT_CATEGORIES, &[1]));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::CATEGORY, &[1, 2]));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::BUDGETS, &[1]));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::BUDGET, &[1, 2]));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::BUDGET_USAGE, &[1, 2]));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::CHECK_ALERTS, &[1, 2]));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::ALERTS, &[1]));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::TRANSACTIONS, &[1]));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::TRANSACTION, &[1, 2]));
        assert_endpoint_is_valid_uri(&format_endpoint(
            endpoints::TRANSACTION_CATEGORY,
            &[1, 2],
        ));
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", &[1]);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn replaces_parameters_in_order() {
        let formatted_path = format_endpoint("/users/{user_id}/budgets/{category_id}/usage", &[3, 14]);

        assert_eq!(formatted_path, "/users/3/budgets/14/usage");
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", &[1]);

        assert_eq!(formatted_path, "/hello/world");
    }

    #[test]
    fn leaves_parameters_without_ids() {
        let formatted_path = format_endpoint("/hello/{world}/{moon}", &[1]);

        assert_eq!(formatted_path, "/hello/1/{moon}");
    }
}
