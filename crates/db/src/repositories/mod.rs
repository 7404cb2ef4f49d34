//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod band_member_repo;
pub mod band_repo;
pub mod event_repo;
pub mod event_slot_repo;
pub mod event_staff_repo;
pub mod slot_staff_assignment_repo;
pub mod song_repo;

pub use band_member_repo::BandMemberRepo;
pub use band_repo::BandRepo;
pub use event_repo::EventRepo;
pub use event_slot_repo::EventSlotRepo;
pub use event_staff_repo::EventStaffRepo;
pub use slot_staff_assignment_repo::SlotStaffAssignmentRepo;
pub use song_repo::SongRepo;
