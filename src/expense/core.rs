//! Defines the core data model and database queries for expenses.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, auth::UserID};

// ============================================================================
// MODELS
// ============================================================================

/// A single recorded expense, i.e. an event where money was spent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: i64,
    /// The ID of the user that recorded the expense.
    pub user_id: UserID,
    /// A text description of what the expense was for.
    pub description: String,
    /// The category of the expense, e.g. "Groceries", "Transport", "Rent".
    pub category: String,
    /// The amount of money spent.
    pub amount: f64,
    /// When the expense happened, as entered in the date field of the form.
    pub date: String,
    /// When the expense happened, as entered in the time field of the form.
    pub time: String,
}

/// The fields needed to record a new expense.
///
/// The caller is expected to have validated the fields: handlers only build
/// this type after the form input has passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// The ID of the user recording the expense.
    pub user_id: UserID,
    /// A text description of what the expense was for.
    pub description: String,
    /// The category of the expense.
    pub category: String,
    /// The amount of money spent.
    pub amount: f64,
    /// When the expense happened (date part).
    pub date: String,
    /// When the expense happened (time part).
    pub time: String,
}

/// The total amount spent on a single category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// The category label.
    pub category: String,
    /// The sum of the amounts of the category's expenses.
    pub total: f64,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                time TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        description: row.get(2)?,
        category: row.get(3)?,
        amount: row.get(4)?,
        date: row.get(5)?,
        time: row.get(6)?,
    })
}

/// Create a new expense in the database.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_expense(expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare(
            "INSERT INTO expense (user_id, description, category, amount, date, time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, user_id, description, category, amount, date, time",
        )?
        .query_row(
            (
                expense.user_id.as_i64(),
                expense.description,
                expense.category,
                expense.amount,
                expense.date,
                expense.time,
            ),
            map_expense_row,
        )?;

    Ok(expense)
}

/// Retrieve the expenses recorded by the user `user_id`, oldest first.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_expenses_by_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, description, category, amount, date, time
             FROM expense WHERE user_id = :user_id ORDER BY id",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_expense_row)?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// Get the sum of the amounts of the expenses recorded by the user `user_id`.
///
/// Returns zero when the user has no expenses.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn sum_expenses_by_user(user_id: UserID, connection: &Connection) -> Result<f64, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM expense WHERE user_id = :user_id",
            &[(":user_id", &user_id.as_i64())],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Get the per-category sums of the expenses recorded by the user `user_id`,
/// largest total first.
///
/// Categories without expenses do not appear in the result.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_category_totals(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<CategoryTotal>, Error> {
    connection
        .prepare(
            "SELECT category, SUM(amount) AS total
             FROM expense WHERE user_id = :user_id
             GROUP BY category ORDER BY total DESC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], |row| {
            Ok(CategoryTotal {
                category: row.get(0)?,
                total: row.get(1)?,
            })
        })?
        .map(|maybe_total| maybe_total.map_err(|error| error.into()))
        .collect()
}

#[cfg(test)]
pub(crate) mod test_utils {
    use rusqlite::Connection;

    use crate::{PasswordHash, auth::UserID, auth::create_user, db::initialize};

    use super::{Expense, NewExpense, create_expense};

    pub(crate) fn get_test_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        initialize(&conn).expect("Could not initialize database");

        conn
    }

    pub(crate) fn insert_test_user(username: &str, connection: &Connection) -> UserID {
        create_user(
            username,
            PasswordHash::new_unchecked("hunter2"),
            connection,
        )
        .expect("Could not create test user")
        .id
    }

    pub(crate) fn insert_test_expense(
        user_id: UserID,
        description: &str,
        category: &str,
        amount: f64,
        connection: &Connection,
    ) -> Expense {
        create_expense(
            NewExpense {
                user_id,
                description: description.to_owned(),
                category: category.to_owned(),
                amount,
                date: "2026-08-07".to_owned(),
                time: "12:30".to_owned(),
            },
            connection,
        )
        .expect("Could not create test expense")
    }
}
