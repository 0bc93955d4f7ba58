//! The landing page that greets the authenticated user.

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
    auth::get_user_by_id,
    endpoints,
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
};

/// The state needed for the landing page.
#[derive(Debug, Clone)]
pub struct IndexState {
    /// The database connection for looking up the user.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for IndexState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the landing page showing the authenticated user's name.
pub async fn get_index_page(
    State(state): State<IndexState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get user {user_id}: {error}"))?;

    let nav_bar = NavBar::new(endpoints::ROOT).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Welcome, " (user.username) "!" }

            p class="mb-4"
            {
                "Keep track of where your money goes: record expenses as they
                happen and review them whenever you like."
            }

            ul class="space-y-2 list-disc list-inside"
            {
                li
                {
                    a href=(endpoints::ADD_EXPENSE) class=(LINK_STYLE) { "Add an expense" }
                }
                li
                {
                    a href=(endpoints::VIEW_EXPENSES) class=(LINK_STYLE) { "View your expenses" }
                }
                li
                {
                    a href=(endpoints::EXPENSE_CHART) class=(LINK_STYLE) { "See your spending by category" }
                }
            }
        }
    };

    Ok(base("Home", &[], &content).into_response())
}
