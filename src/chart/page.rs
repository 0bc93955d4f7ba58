//! The route handler for the category breakdown chart page.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error, UserID,
    chart::pie::{category_pie_chart, chart_script, chart_view},
    endpoints,
    expense::get_category_totals,
    html::{HeadElement, PAGE_CONTAINER_STYLE, base, link},
    navigation::NavBar,
};

/// The state needed for the expense chart page.
#[derive(Debug, Clone)]
pub struct ExpenseChartState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpenseChartState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display a pie chart of the user's spending grouped by category.
///
/// The chart is built per request from the user's own expenses and embedded
/// in the response, so concurrent requests cannot interfere with each other.
pub async fn get_expense_chart_page(
    State(state): State<ExpenseChartState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let totals = get_category_totals(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get category totals: {error}"))?;

    let nav_bar = NavBar::new(endpoints::EXPENSE_CHART).into_html();

    if totals.is_empty() {
        let add_expense_link = link(endpoints::ADD_EXPENSE, "Add an expense");

        let content = html!(
            (nav_bar)

            main class=(PAGE_CONTAINER_STYLE)
            {
                h2 class="text-xl font-bold"
                {
                    "Nothing here yet..."
                }

                p
                {
                    "The chart will show up here once you add some expenses. "
                    (add_expense_link) " to get started."
                }
            }
        );

        return Ok(base("Expense Chart", &[], &content).into_response());
    }

    let options = category_pie_chart(&totals).to_string();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl lg:mx-auto"
            {
                h1 class="text-xl font-bold" { "Expense Chart" }

                (chart_view())
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        chart_script(&options),
    ];

    Ok(base("Expense Chart", &scripts, &content).into_response())
}

#[cfg(test)]
mod expense_chart_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, response::IntoResponse};

    use crate::{
        expense::test_utils::{get_test_connection, insert_test_expense, insert_test_user},
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
    };

    use super::{ExpenseChartState, get_expense_chart_page};

    #[tokio::test]
    async fn chart_page_embeds_category_data() {
        let conn = get_test_connection();
        let user_id = insert_test_user("alice", &conn);
        insert_test_expense(user_id, "Lunch", "Food", 12.5, &conn);
        insert_test_expense(user_id, "Dinner", "Food", 30.0, &conn);
        insert_test_expense(user_id, "Taxi", "Transport", 7.25, &conn);
        let state = ExpenseChartState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = get_expense_chart_page(State(state), Extension(user_id))
            .await
            .unwrap()
            .into_response();

        assert_status_ok(&response);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&body).to_string();

        // Grouped sums: Food = 12.5 + 30.0, Transport = 7.25.
        assert!(text.contains("Food"), "missing category in body");
        assert!(text.contains("42.5"), "missing grouped total in body");
        assert!(text.contains("Transport"), "missing category in body");
        assert!(text.contains("7.25"), "missing grouped total in body");
        assert!(
            text.contains("echarts.init"),
            "missing chart initialization script"
        );
    }

    #[tokio::test]
    async fn chart_page_omits_other_users_categories() {
        let conn = get_test_connection();
        let alice = insert_test_user("alice", &conn);
        let bob = insert_test_user("bob", &conn);
        insert_test_expense(alice, "Lunch", "Food", 12.5, &conn);
        insert_test_expense(bob, "Rent", "Housing", 800.0, &conn);
        let state = ExpenseChartState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = get_expense_chart_page(State(state), Extension(alice))
            .await
            .unwrap()
            .into_response();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&body).to_string();

        assert!(text.contains("Food"));
        assert!(
            !text.contains("Housing"),
            "another user's category leaked into the chart"
        );
    }

    #[tokio::test]
    async fn chart_page_shows_empty_state_without_expenses() {
        let conn = get_test_connection();
        let user_id = insert_test_user("alice", &conn);
        let state = ExpenseChartState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = get_expense_chart_page(State(state), Extension(user_id))
            .await
            .unwrap()
            .into_response();

        assert_status_ok(&response);

        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let heading_selector = scraper::Selector::parse("h2").unwrap();
        let heading = document
            .select(&heading_selector)
            .next()
            .expect("expected empty-state heading");
        let heading_text = heading.text().collect::<String>();
        assert!(heading_text.contains("Nothing here yet"));
    }
}
