//! Defines the endpoint for recording a new expense.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, UserID, endpoints,
    expense::{
        core::{NewExpense, create_expense},
        create_page::{ExpenseForm, ExpenseFormErrors, expense_form_view},
    },
};

/// The state needed to create an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

pub const MISSING_FIELD_ERROR_MSG: &str = "Please fill in this field.";
pub const INVALID_AMOUNT_ERROR_MSG: &str = "Amount should be a valid number.";
pub const NEGATIVE_AMOUNT_ERROR_MSG: &str = "Amount should not be negative.";

/// The add-expense form after validation, ready to insert.
#[derive(Debug)]
struct ValidatedExpense {
    description: String,
    category: String,
    amount: f64,
    date: String,
    time: String,
}

/// Check that every form field is non-empty and that the amount parses as a
/// non-negative number.
///
/// # Errors
///
/// Returns an error message for each field that failed validation. Fields
/// that passed have no message.
fn validate_expense_form(form: &ExpenseForm) -> Result<ValidatedExpense, ExpenseFormErrors> {
    let mut errors = ExpenseFormErrors::default();

    let description = form.description.trim();
    if description.is_empty() {
        errors.description = Some(MISSING_FIELD_ERROR_MSG);
    }

    let category = form.category.trim();
    if category.is_empty() {
        errors.category = Some(MISSING_FIELD_ERROR_MSG);
    }

    let date = form.date.trim();
    if date.is_empty() {
        errors.date = Some(MISSING_FIELD_ERROR_MSG);
    }

    let time = form.time.trim();
    if time.is_empty() {
        errors.time = Some(MISSING_FIELD_ERROR_MSG);
    }

    let raw_amount = form.amount.trim();
    let amount = if raw_amount.is_empty() {
        errors.amount = Some(MISSING_FIELD_ERROR_MSG);
        None
    } else {
        match raw_amount.parse::<f64>() {
            Ok(amount) if amount.is_finite() && amount >= 0.0 => Some(amount),
            Ok(_) => {
                errors.amount = Some(NEGATIVE_AMOUNT_ERROR_MSG);
                None
            }
            Err(_) => {
                errors.amount = Some(INVALID_AMOUNT_ERROR_MSG);
                None
            }
        }
    };

    if errors != ExpenseFormErrors::default() {
        return Err(errors);
    }

    Ok(ValidatedExpense {
        description: description.to_owned(),
        category: category.to_owned(),
        // The amount is only `None` when an error was recorded above.
        amount: amount.expect("amount must be set when validation passed"),
        date: date.to_owned(),
        time: time.to_owned(),
    })
}

/// A route handler for recording a new expense.
///
/// The expense is validated before anything touches the store: every field
/// must be non-empty and the amount must parse as a non-negative number.
/// On failure the form is re-rendered with the user's input and an error
/// message next to each offending field. On success the expense is inserted
/// for the authenticated user and the client is redirected to the expenses
/// page.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let validated = match validate_expense_form(&form) {
        Ok(validated) => validated,
        Err(errors) => return expense_form_view(&form, &errors).into_response(),
    };

    let connection = state
        .db_connection
        .lock()
        .expect("Could not acquire database lock");

    if let Err(error) = create_expense(
        NewExpense {
            user_id,
            description: validated.description,
            category: validated.category,
            amount: validated.amount,
            date: validated.date,
            time: validated.time,
        },
        &connection,
    ) {
        return error.into_response();
    }

    (
        HxRedirect(format!("{}?added=true", endpoints::VIEW_EXPENSES)),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod validate_expense_form_tests {
    use super::{
        INVALID_AMOUNT_ERROR_MSG, MISSING_FIELD_ERROR_MSG, NEGATIVE_AMOUNT_ERROR_MSG,
        validate_expense_form,
    };
    use crate::expense::create_page::ExpenseForm;

    fn valid_form() -> ExpenseForm {
        ExpenseForm {
            description: "Lunch".to_owned(),
            category: "Food".to_owned(),
            amount: "12.50".to_owned(),
            date: "2026-08-07".to_owned(),
            time: "12:30".to_owned(),
        }
    }

    #[test]
    fn accepts_valid_form() {
        let validated = validate_expense_form(&valid_form()).unwrap();

        assert_eq!(validated.amount, 12.5);
        assert_eq!(validated.description, "Lunch");
    }

    #[test]
    fn trims_whitespace() {
        let mut form = valid_form();
        form.description = "  Lunch  ".to_owned();

        let validated = validate_expense_form(&form).unwrap();

        assert_eq!(validated.description, "Lunch");
    }

    #[test]
    fn rejects_empty_fields() {
        let form = ExpenseForm::default();

        let errors = validate_expense_form(&form).unwrap_err();

        assert_eq!(errors.description, Some(MISSING_FIELD_ERROR_MSG));
        assert_eq!(errors.category, Some(MISSING_FIELD_ERROR_MSG));
        assert_eq!(errors.amount, Some(MISSING_FIELD_ERROR_MSG));
        assert_eq!(errors.date, Some(MISSING_FIELD_ERROR_MSG));
        assert_eq!(errors.time, Some(MISSING_FIELD_ERROR_MSG));
    }

    #[test]
    fn rejects_non_numeric_amount() {
        let mut form = valid_form();
        form.amount = "abc".to_owned();

        let errors = validate_expense_form(&form).unwrap_err();

        assert_eq!(errors.amount, Some(INVALID_AMOUNT_ERROR_MSG));
        assert_eq!(errors.description, None);
    }

    #[test]
    fn rejects_negative_amount() {
        let mut form = valid_form();
        form.amount = "-5".to_owned();

        let errors = validate_expense_form(&form).unwrap_err();

        assert_eq!(errors.amount, Some(NEGATIVE_AMOUNT_ERROR_MSG));
    }

    #[test]
    fn rejects_non_finite_amount() {
        let mut form = valid_form();
        form.amount = "NaN".to_owned();

        assert!(validate_expense_form(&form).is_err());
    }
}

#[cfg(test)]
mod create_expense_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, Form, extract::State};
    use axum_htmx::HX_REDIRECT;

    use crate::{
        endpoints,
        expense::core::{
            get_expenses_by_user,
            test_utils::{get_test_connection, insert_test_user},
        },
        expense::create_page::ExpenseForm,
        test_utils::{
            assert_form_input_with_value, assert_hx_redirect, must_get_form, parse_html_fragment,
        },
    };

    use super::{CreateExpenseState, INVALID_AMOUNT_ERROR_MSG, create_expense_endpoint};

    fn expense_form(amount: &str) -> ExpenseForm {
        ExpenseForm {
            description: "Lunch".to_owned(),
            category: "Food".to_owned(),
            amount: amount.to_owned(),
            date: "2026-08-07".to_owned(),
            time: "12:30".to_owned(),
        }
    }

    #[tokio::test]
    async fn can_create_expense() {
        let conn = get_test_connection();
        let user_id = insert_test_user("alice", &conn);
        let state = CreateExpenseState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = create_expense_endpoint(
            State(state.clone()),
            Extension(user_id),
            Form(expense_form("42.50")),
        )
        .await;

        assert_hx_redirect(
            &response,
            &format!("{}?added=true", endpoints::VIEW_EXPENSES),
        );

        let connection = state.db_connection.lock().unwrap();
        let expenses = get_expenses_by_user(user_id, &connection).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount, 42.50);
        assert_eq!(expenses[0].description, "Lunch");
    }

    #[tokio::test]
    async fn invalid_amount_inserts_nothing() {
        let conn = get_test_connection();
        let user_id = insert_test_user("alice", &conn);
        let state = CreateExpenseState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = create_expense_endpoint(
            State(state.clone()),
            Extension(user_id),
            Form(expense_form("abc")),
        )
        .await;

        assert!(response.headers().get(HX_REDIRECT).is_none());

        let fragment = parse_html_fragment(response).await;
        let error_selector = scraper::Selector::parse("p.text-red-500").unwrap();
        let error_text = fragment
            .select(&error_selector)
            .next()
            .expect("expected an amount error message")
            .text()
            .collect::<String>();
        assert_eq!(error_text.trim(), INVALID_AMOUNT_ERROR_MSG);

        let connection = state.db_connection.lock().unwrap();
        let expenses = get_expenses_by_user(user_id, &connection).unwrap();
        assert_eq!(expenses, vec![]);
    }

    #[tokio::test]
    async fn empty_fields_insert_nothing() {
        let conn = get_test_connection();
        let user_id = insert_test_user("alice", &conn);
        let state = CreateExpenseState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = create_expense_endpoint(
            State(state.clone()),
            Extension(user_id),
            Form(ExpenseForm::default()),
        )
        .await;

        assert!(response.headers().get(HX_REDIRECT).is_none());

        let connection = state.db_connection.lock().unwrap();
        let expenses = get_expenses_by_user(user_id, &connection).unwrap();
        assert_eq!(expenses, vec![]);
    }

    #[tokio::test]
    async fn failed_submission_preserves_input() {
        let conn = get_test_connection();
        let user_id = insert_test_user("alice", &conn);
        let state = CreateExpenseState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = create_expense_endpoint(
            State(state),
            Extension(user_id),
            Form(expense_form("abc")),
        )
        .await;

        let fragment = parse_html_fragment(response).await;
        let form = must_get_form(&fragment);
        assert_form_input_with_value(&form, "description", "text", "Lunch");
    }
}
