//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_log_in_page, get_register_page, post_log_in, post_log_out,
        register_user,
    },
    chart::get_expense_chart_page,
    endpoints,
    expense::{create_expense_endpoint, get_add_expense_page, get_expenses_page},
    index::get_index_page,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(
            endpoints::LOG_IN,
            get(get_log_in_page).post(post_log_in),
        )
        .route(
            endpoints::REGISTER,
            get(get_register_page).post(register_user),
        )
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::ADD_EXPENSE, get(get_add_expense_page))
        .route(endpoints::VIEW_EXPENSES, get(get_expenses_page))
        .route(endpoints::EXPENSE_CHART, get(get_expense_chart_page))
        .route(endpoints::LOG_OUT, post(post_log_out))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // The expense form posts via HTMX, so its auth redirect needs to use the
    // HX-Redirect header to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::ADD_EXPENSE, post(create_expense_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}
