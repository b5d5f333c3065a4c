//! Event rows as read back from the portal schema

use chrono::NaiveDateTime;
use serde::Serialize;

use super::TicketType;

/// Upcoming event with venue name and remaining seats
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct UpcomingEvent {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub starts_at: NaiveDateTime,
    pub kind: Option<String>,
    pub price: Option<f64>,
    pub capacity: Option<i64>,
    pub venue: String,
    /// As reported by `fn_verificar_vagas_evento`
    pub seats_left: Option<i64>,
}

impl UpcomingEvent {
    /// `DD/MM/YYYY HH:MM`, the format used in listings
    pub fn display_date(&self) -> String {
        self.starts_at.format("%d/%m/%Y %H:%M").to_string()
    }
}

/// Enrollment total for one event, in query order
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct EventEnrollmentCount {
    pub id: i32,
    pub name: String,
    pub total_enrolled: i64,
}

/// Ranked line of the popularity report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventPopularity {
    pub rank: usize,
    pub id: i32,
    pub name: String,
    pub total_enrolled: i64,
}

/// Number rows 1..n in the order the database returned them.
pub fn rank_by_enrollment(rows: Vec<EventEnrollmentCount>) -> Vec<EventPopularity> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| EventPopularity {
            rank: i + 1,
            id: row.id,
            name: row.name,
            total_enrolled: row.total_enrolled,
        })
        .collect()
}

/// Request to seat a citizen at an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    pub citizen_id: i32,
    pub event_id: i32,
    pub ticket: TicketType,
}

/// What the database said while processing an enrollment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrollmentOutcome {
    /// `RAISE NOTICE` messages, in arrival order
    pub notices: Vec<String>,
}
