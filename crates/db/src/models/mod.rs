//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Conversions into the plain types `gigboard_core` computes on

pub mod assignment;
pub mod band;
pub mod band_member;
pub mod event;
pub mod event_slot;
pub mod song;
pub mod staff;
