//! Reservations made by customers.

use crate::ModelError;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

/// A table booking for one customer.
///
/// `start_at` is kept at whole-second precision; it is stored as RFC 3339
/// UTC text so that ordering by the column is chronological.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reservation {
    id: Option<i64>,
    pub customer_id: i64,
    pub start_at: DateTime<Utc>,
    pub num_guests: u32,
    pub notes: Option<String>,
}

impl Reservation {
    /// Builds a transient reservation that has not been saved yet.
    pub fn new(
        customer_id: i64,
        start_at: DateTime<Utc>,
        num_guests: u32,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: None,
            customer_id,
            start_at: start_at.trunc_subsecs(0),
            num_guests,
            notes,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// All reservations of a customer, earliest first.
    pub fn for_customer(conn: &Connection, customer_id: i64) -> Result<Vec<Self>, ModelError> {
        let mut stmt = conn.prepare(
            "SELECT id, customer_id, start_at, num_guests, notes
             FROM reservations
             WHERE customer_id = ?1
             ORDER BY start_at, id",
        )?;
        let rows = stmt.query_map([customer_id], map_row_to_reservation)?;
        let mut reservations = Vec::new();
        for row in rows {
            reservations.push(row?);
        }
        Ok(reservations)
    }

    /// Fetches a single reservation, or [`ModelError::ReservationNotFound`].
    pub fn get(conn: &Connection, id: i64) -> Result<Self, ModelError> {
        conn.query_row(
            "SELECT id, customer_id, start_at, num_guests, notes
             FROM reservations WHERE id = ?1",
            [id],
            map_row_to_reservation,
        )
        .optional()?
        .ok_or(ModelError::ReservationNotFound(id))
    }

    /// Inserts a transient reservation or updates a persisted one.
    ///
    /// An unknown customer or a guest count below one is rejected by the
    /// schema and surfaces as [`ModelError::Database`]. `start_at` is
    /// truncated to whole seconds before it is written, so the in-memory value
    /// matches what a later [`Reservation::get`] returns.
    pub fn save(&mut self, conn: &Connection) -> Result<(), ModelError> {
        self.start_at = self.start_at.trunc_subsecs(0);
        let start_at = format_timestamp(&self.start_at);
        match self.id {
            None => {
                let id: i64 = conn.query_row(
                    "INSERT INTO reservations (customer_id, start_at, num_guests, notes)
                     VALUES (?1, ?2, ?3, ?4)
                     RETURNING id",
                    params![self.customer_id, start_at, self.num_guests, self.notes],
                    |row| row.get(0),
                )?;
                tracing::debug!(
                    reservation_id = id,
                    customer_id = self.customer_id,
                    "inserted reservation"
                );
                self.id = Some(id);
            }
            Some(id) => {
                let count = conn.execute(
                    "UPDATE reservations
                     SET customer_id = ?1, start_at = ?2, num_guests = ?3, notes = ?4
                     WHERE id = ?5",
                    params![self.customer_id, start_at, self.num_guests, self.notes, id],
                )?;
                if count == 0 {
                    return Err(ModelError::ReservationNotFound(id));
                }
                tracing::debug!(reservation_id = id, "updated reservation");
            }
        }
        Ok(())
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn map_row_to_reservation(row: &Row) -> rusqlite::Result<Reservation> {
    let start_str: String = row.get(2)?;
    let start_at = DateTime::parse_from_rfc3339(&start_str)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?
        .with_timezone(&Utc);

    Ok(Reservation {
        id: Some(row.get(0)?),
        customer_id: row.get(1)?,
        start_at,
        num_guests: row.get(3)?,
        notes: row.get(4)?,
    })
}
