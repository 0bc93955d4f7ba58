//! The API endpoints URIs.

/// The landing page for logged in users.
pub const ROOT: &str = "/";
/// The route for getting the registration page and creating a user.
pub const REGISTER: &str = "/register";
/// The route for getting the log-in page and starting a session.
pub const LOG_IN: &str = "/login";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/logout";
/// The route for the expense form and for creating an expense.
pub const ADD_EXPENSE: &str = "/add_expense";
/// The page for displaying a user's expenses and their total.
pub const VIEW_EXPENSES: &str = "/view_expenses";
/// The page for displaying the category breakdown chart.
pub const EXPENSE_CHART: &str = "/expense_chart";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";
