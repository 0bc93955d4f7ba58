//! One-time alert banners shown after a redirect, e.g. "Expense added".

use maud::{Markup, html};

/// A green banner for confirming that an action succeeded.
///
/// Shown at the top of the page after a redirect, standing in for the
/// transient flash messages of a session-based app.
pub fn success_alert(message: &str) -> Markup {
    html!(
        div
            class="w-full max-w-md p-4 mb-4 text-sm rounded-lg
                text-green-800 bg-green-50 dark:bg-gray-800 dark:text-green-400"
            role="alert"
        {
            (message)
        }
    )
}

#[cfg(test)]
mod alert_tests {
    use super::success_alert;

    #[test]
    fn success_alert_contains_message() {
        let markup = success_alert("Expense added successfully.");

        let html = markup.into_string();
        assert!(html.contains("Expense added successfully."));
        assert!(html.contains("role=\"alert\""));
    }
}
