//! Pure domain logic for live-event timetables and crew staffing.
//!
//! Nothing in this crate performs I/O. The `db` crate loads snapshots of
//! events, bands, slots and staff; the functions here turn those snapshots
//! into new slots or assignments, which the caller persists.

pub mod band_order;
pub mod clock;
pub mod error;
pub mod staffing;
pub mod timetable;
pub mod types;
