//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod citizen;
pub mod event;
pub mod session;
pub mod validation;

pub use citizen::{BirthDate, CitizenForm, CitizenName, CitizenSummary, Cpf, Email, Gender, NewCitizen, Phone};
pub use event::{rank_by_enrollment, Enrollment, EnrollmentOutcome, EventEnrollmentCount, EventPopularity, UpcomingEvent};
pub use session::{SchemaName, TicketType, DEFAULT_TICKET};
pub use validation::ValidationError;
