//! Repository implementations for the portal schema
//!
//! Each repository follows these patterns:
//! - Result columns are cast in SQL (`::INT`, `::TEXT`, ...) so decoding
//!   does not depend on how the external schema declared them
//! - Multi-statement writes run in one transaction; dropping it rolls back
//! - Database errors are mapped through `PortalError::from`

pub mod citizens;
pub mod enrollments;
pub mod events;

pub use citizens::CitizenRepo;
pub use enrollments::EnrollmentRepo;
pub use events::EventRepo;
