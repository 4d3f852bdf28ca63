//! Customer and reservation records for Lunchly.
//!
//! Both entities follow the same lifecycle: a value built from field data is
//! *transient* (no identifier) until its first successful `save`, which
//! inserts a row and adopts the database-assigned id. From then on the
//! entity is *persisted* and `save` updates the existing row in place.
//!
//! Every operation takes the connection explicitly; callers check one out of
//! the `lunchly_db::DbPool` for the duration of a request.

mod customer;
mod error;
mod reservation;

pub use customer::Customer;
pub use error::ModelError;
pub use reservation::Reservation;
