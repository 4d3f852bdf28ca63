//! Customers of the restaurant.

use crate::{ModelError, Reservation};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

const SELECT_CUSTOMER: &str = "SELECT c.id, c.first_name, c.last_name, c.phone, c.notes
    FROM customers AS c";

/// A customer of the restaurant.
///
/// `id` stays `None` until the first successful [`Customer::save`] and is
/// never changed afterwards, so it is only readable from outside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

impl Customer {
    /// Builds a transient customer that has not been saved yet.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: Option<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone,
            notes,
        }
    }

    /// Database id, or `None` for a transient customer.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// First and last name joined by a single space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Lists every customer ordered by last name, then first name.
    pub fn all(conn: &Connection) -> Result<Vec<Self>, ModelError> {
        let mut stmt = conn.prepare(&format!(
            "{SELECT_CUSTOMER} ORDER BY c.last_name, c.first_name"
        ))?;
        let rows = stmt.query_map([], map_row_to_customer)?;
        let mut customers = Vec::new();
        for row in rows {
            customers.push(row?);
        }
        Ok(customers)
    }

    /// Fetches a single customer.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::CustomerNotFound`] (status 404) when no row has
    /// this id.
    pub fn get(conn: &Connection, id: i64) -> Result<Self, ModelError> {
        conn.query_row(
            &format!("{SELECT_CUSTOMER} WHERE c.id = ?1"),
            [id],
            map_row_to_customer,
        )
        .optional()?
        .ok_or(ModelError::CustomerNotFound(id))
    }

    /// Finds customers whose first or last name contains `term`, ignoring case.
    ///
    /// Case folding is Unicode-aware, so the connection must have
    /// `lunchly_db::register_functions` applied (pooled connections do).
    /// The term is wrapped as `%term%` and handed to `LIKE` unescaped, so `%`
    /// and `_` inside it act as wildcards. An empty term matches everyone. No
    /// match is an empty result.
    pub fn search(conn: &Connection, term: &str) -> Result<Vec<Self>, ModelError> {
        let pattern = format!("%{term}%");
        let mut stmt = conn.prepare(&format!(
            "{SELECT_CUSTOMER}
             WHERE unicode_lower(c.first_name) LIKE unicode_lower(?1)
                OR unicode_lower(c.last_name) LIKE unicode_lower(?1)
             ORDER BY c.last_name, c.first_name"
        ))?;
        let rows = stmt.query_map([pattern], map_row_to_customer)?;
        let mut customers = Vec::new();
        for row in rows {
            customers.push(row?);
        }
        Ok(customers)
    }

    /// Up to ten customers with the most reservations, busiest first.
    ///
    /// Customers without any reservation are not included.
    pub fn top_ten(conn: &Connection) -> Result<Vec<Self>, ModelError> {
        let mut stmt = conn.prepare(&format!(
            "{SELECT_CUSTOMER}
             JOIN reservations AS r ON c.id = r.customer_id
             GROUP BY c.id
             ORDER BY COUNT(r.id) DESC, c.last_name, c.first_name
             LIMIT 10"
        ))?;
        let rows = stmt.query_map([], map_row_to_customer)?;
        let mut customers = Vec::new();
        for row in rows {
            customers.push(row?);
        }
        Ok(customers)
    }

    /// Reservations made by this customer, earliest first.
    ///
    /// A transient customer cannot own reservations yet, so this returns an
    /// empty list without touching the database.
    pub fn reservations(&self, conn: &Connection) -> Result<Vec<Reservation>, ModelError> {
        match self.id {
            Some(id) => Reservation::for_customer(conn, id),
            None => Ok(Vec::new()),
        }
    }

    /// Inserts a transient customer or updates a persisted one.
    ///
    /// On insert the generated id is adopted. Updates overwrite every mutable
    /// column with no version check, so the last writer wins.
    ///
    /// # Errors
    ///
    /// Database failures are returned unchanged. Updating a customer whose row
    /// has disappeared returns [`ModelError::CustomerNotFound`].
    pub fn save(&mut self, conn: &Connection) -> Result<(), ModelError> {
        match self.id {
            None => {
                let id: i64 = conn.query_row(
                    "INSERT INTO customers (first_name, last_name, phone, notes)
                     VALUES (?1, ?2, ?3, ?4)
                     RETURNING id",
                    params![self.first_name, self.last_name, self.phone, self.notes],
                    |row| row.get(0),
                )?;
                tracing::debug!(customer_id = id, "inserted customer");
                self.id = Some(id);
            }
            Some(id) => {
                let count = conn.execute(
                    "UPDATE customers SET first_name = ?1, last_name = ?2, phone = ?3, notes = ?4
                     WHERE id = ?5",
                    params![self.first_name, self.last_name, self.phone, self.notes, id],
                )?;
                if count == 0 {
                    return Err(ModelError::CustomerNotFound(id));
                }
                tracing::debug!(customer_id = id, "updated customer");
            }
        }
        Ok(())
    }
}

fn map_row_to_customer(row: &Row) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: Some(row.get(0)?),
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        phone: row.get(3)?,
        notes: row.get(4)?,
    })
}
