//! Defines the add-expense form and the route handler that displays it.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base,
        loading_spinner, text_input,
    },
    navigation::NavBar,
};

/// The raw data entered by the user in the add-expense form.
///
/// Every field is kept as a string so a failed submission can be re-rendered
/// with the user's input intact. The amount is only parsed as a number
/// during validation.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ExpenseForm {
    /// Text detailing the expense.
    pub description: String,
    /// The category of the expense, e.g. "Groceries", "Transport", "Rent".
    pub category: String,
    /// The value of the expense in dollars, as entered by the user.
    pub amount: String,
    /// The date when the expense occurred.
    pub date: String,
    /// The time when the expense occurred.
    pub time: String,
}

/// A validation error message for each field of the add-expense form.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct ExpenseFormErrors {
    pub(crate) description: Option<&'static str>,
    pub(crate) category: Option<&'static str>,
    pub(crate) amount: Option<&'static str>,
    pub(crate) date: Option<&'static str>,
    pub(crate) time: Option<&'static str>,
}

fn amount_input(amount: &str, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            input
                type="number"
                name="amount"
                id="amount"
                step="0.01"
                min="0"
                placeholder="0.00"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                value=(amount);

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }
    }
}

/// Renders the add-expense form with the user's input and any validation
/// error messages.
pub(crate) fn expense_form_view(form: &ExpenseForm, errors: &ExpenseFormErrors) -> Markup {
    html! {
        form
            hx-post=(endpoints::ADD_EXPENSE)
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6 w-full max-w-md"
        {
            (text_input("description", "Expense", "text", &form.description, errors.description))
            (text_input("category", "Category", "text", &form.category, errors.category))
            (amount_input(&form.amount, errors.amount))
            (text_input("date", "Date", "date", &form.date, errors.date))
            (text_input("time", "Time", "time", &form.time, errors.time))

            button
                type="submit" id="submit-button" tabindex="0"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Add Expense"
            }
        }
    }
}

/// Renders the page for recording a new expense.
pub async fn get_add_expense_page() -> Response {
    let nav_bar = NavBar::new(endpoints::ADD_EXPENSE).into_html();
    let form = expense_form_view(&ExpenseForm::default(), &ExpenseFormErrors::default());

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Add Expense" }

            (form)
        }
    };

    base("Add Expense", &[], &content).into_response()
}

#[cfg(test)]
mod add_expense_page_tests {
    use axum::http::{StatusCode, header::CONTENT_TYPE};

    use crate::{
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            must_get_form, parse_html_document,
        },
    };

    use super::get_add_expense_page;

    #[tokio::test]
    async fn add_expense_page_displays_form() {
        let response = get_add_expense_page().await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .headers()
                .get(CONTENT_TYPE)
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );

        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::ADD_EXPENSE, "hx-post");
        assert_form_input(&form, "description", "text");
        assert_form_input(&form, "category", "text");
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "date", "date");
        assert_form_input(&form, "time", "time");
        assert_form_submit_button(&form);
    }
}
