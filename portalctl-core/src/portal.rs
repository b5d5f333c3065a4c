//! Portal facade - the operations the menu and subcommands call
//!
//! [`PortalApi`] is the seam between the console front-end and the database;
//! [`Portal`] implements it over a single-connection PgPool.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::config::PortalConfig;
use crate::db::{create_pool, NoticeBuffer};
use crate::error::Result;
use crate::models::{
    CitizenSummary, Enrollment, EnrollmentOutcome, EventPopularity, NewCitizen, SchemaName,
    TicketType, UpcomingEvent,
};
use crate::repos::{CitizenRepo, EnrollmentRepo, EventRepo};

/// Operations offered by the cultural portal
#[async_trait]
pub trait PortalApi: Send + Sync {
    /// Register a citizen, returning the new person id.
    async fn register_citizen(&self, citizen: &NewCitizen) -> Result<i32>;

    /// Future events with venue and remaining seats.
    async fn upcoming_events(&self) -> Result<Vec<UpcomingEvent>>;

    /// Registered citizens, by name.
    async fn citizens(&self) -> Result<Vec<CitizenSummary>>;

    /// Enroll a citizen through the database procedure.
    async fn enroll(&self, enrollment: &Enrollment) -> Result<EnrollmentOutcome>;

    /// Events ranked by enrollment count.
    async fn popular_events(&self, limit: Option<i64>) -> Result<Vec<EventPopularity>>;

    /// Ticket type used when the caller does not pick one.
    fn default_ticket(&self) -> TicketType;
}

/// PostgreSQL-backed portal
pub struct Portal {
    pool: PgPool,
    schema: SchemaName,
    ticket: TicketType,
    notices: NoticeBuffer,
}

impl Portal {
    /// Connect using `config`.
    ///
    /// `notices` must be the buffer wired into the tracing subscriber, or
    /// enrollments will come back without their database notices.
    pub async fn connect(config: &PortalConfig, notices: NoticeBuffer) -> Result<Self> {
        let schema = config.schema()?;
        let ticket = config.ticket()?;
        let options = config.connect_options()?;

        tracing::debug!(target_db = %config.describe_target(), schema = schema.as_str(), "connecting");
        let pool = create_pool(options).await?;
        tracing::info!(schema = schema.as_str(), "connected to PostgreSQL");

        Ok(Self {
            pool,
            schema,
            ticket,
            notices,
        })
    }

    /// Close the connection, waiting for it to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("connection closed");
    }
}

#[async_trait]
impl PortalApi for Portal {
    async fn register_citizen(&self, citizen: &NewCitizen) -> Result<i32> {
        CitizenRepo::new(&self.pool).create(citizen).await
    }

    async fn upcoming_events(&self) -> Result<Vec<UpcomingEvent>> {
        EventRepo::new(&self.pool).upcoming().await
    }

    async fn citizens(&self) -> Result<Vec<CitizenSummary>> {
        CitizenRepo::new(&self.pool).list().await
    }

    async fn enroll(&self, enrollment: &Enrollment) -> Result<EnrollmentOutcome> {
        EnrollmentRepo::new(&self.pool, &self.schema, &self.notices)
            .enroll(enrollment)
            .await
    }

    async fn popular_events(&self, limit: Option<i64>) -> Result<Vec<EventPopularity>> {
        EventRepo::new(&self.pool).popularity(limit).await
    }

    fn default_ticket(&self) -> TicketType {
        self.ticket.clone()
    }
}
