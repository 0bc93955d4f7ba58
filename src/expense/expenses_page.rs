//! Defines the route handler for the page that displays expenses as a table.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, UserID,
    alert::success_alert,
    endpoints,
    expense::core::{Expense, get_expenses_by_user, sum_expenses_by_user},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency, link,
    },
    navigation::NavBar,
};

/// The state needed for the expenses page.
#[derive(Debug, Clone)]
pub struct ExpensesViewState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpensesViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters accepted by the expenses page.
#[derive(Deserialize)]
pub struct ExpensesPageQuery {
    /// Set after an expense was recorded so the page can confirm it.
    ///
    /// This value comes from a redirect query flag, so any value should be
    /// interpreted as `true` and its absence as `false`.
    pub added: Option<String>,
}

/// Render an overview of the user's expenses with a running total.
pub async fn get_expenses_page(
    State(state): State<ExpensesViewState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ExpensesPageQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expenses = get_expenses_by_user(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get expenses: {error}"))?;
    let total = sum_expenses_by_user(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not sum expenses: {error}"))?;

    Ok(expenses_view(&expenses, total, query.added.is_some()).into_response())
}

fn expenses_view(expenses: &[Expense], total: f64, show_added_notice: bool) -> Markup {
    let nav_bar = NavBar::new(endpoints::VIEW_EXPENSES).into_html();
    let add_expense_link = link(endpoints::ADD_EXPENSE, "Add Expense");

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            @if show_added_notice {
                (success_alert("Expense added successfully!"))
            }

            section class="space-y-4 w-full lg:max-w-5xl lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Expenses" }

                    a href=(endpoints::ADD_EXPENSE) class=(LINK_STYLE)
                    {
                        "Add Expense"
                    }
                }

                @if expenses.is_empty() {
                    p
                    {
                        "Nothing here yet... your expenses will show up here once
                        you add some. " (add_expense_link)
                    }
                } @else {
                    section class="rounded bg-gray-50 dark:bg-gray-800 overflow-hidden"
                    {
                        table class="w-full my-2 text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                        {
                            thead class=(TABLE_HEADER_STYLE)
                            {
                                tr
                                {
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Expense" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Time" }
                                }
                            }

                            tbody
                            {
                                @for expense in expenses {
                                    tr class=(TABLE_ROW_STYLE)
                                    {
                                        td class=(TABLE_CELL_STYLE) { (expense.description) }
                                        td class=(TABLE_CELL_STYLE) { (expense.category) }
                                        td class=(TABLE_CELL_STYLE) { (format_currency(expense.amount)) }
                                        td class=(TABLE_CELL_STYLE) { (expense.date) }
                                        td class=(TABLE_CELL_STYLE) { (expense.time) }
                                    }
                                }
                            }

                            tfoot
                            {
                                tr class="font-semibold text-gray-900 dark:text-white"
                                {
                                    th scope="row" class=(TABLE_CELL_STYLE) { "Total" }
                                    td class=(TABLE_CELL_STYLE) {}
                                    td id="total" class=(TABLE_CELL_STYLE) { (format_currency(total)) }
                                    td class=(TABLE_CELL_STYLE) {}
                                    td class=(TABLE_CELL_STYLE) {}
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Expenses", &[], &content)
}
