//! Enrollment repository
//!
//! Seat checks and duplicate detection live in
//! `sp_registrar_participante_evento`; this side only calls it and relays
//! whatever the procedure reports.

use sqlx::PgPool;

use crate::db::NoticeBuffer;
use crate::error::Result;
use crate::models::{Enrollment, EnrollmentOutcome, SchemaName};

/// Enrollment repository
pub struct EnrollmentRepo<'a> {
    pool: &'a PgPool,
    schema: &'a SchemaName,
    notices: &'a NoticeBuffer,
}

impl<'a> EnrollmentRepo<'a> {
    pub fn new(pool: &'a PgPool, schema: &'a SchemaName, notices: &'a NoticeBuffer) -> Self {
        Self {
            pool,
            schema,
            notices,
        }
    }

    /// Call the enrollment procedure and collect the notices it raised.
    ///
    /// Notices left over from earlier statements are discarded first, so the
    /// outcome only carries what this call produced.
    pub async fn enroll(&self, enrollment: &Enrollment) -> Result<EnrollmentOutcome> {
        self.notices.clear();

        let mut tx = self.pool.begin().await?;

        // SET does not take bind parameters; SchemaName is a checked identifier
        sqlx::query(&format!("SET LOCAL search_path TO {}", self.schema.as_str()))
            .execute(&mut *tx)
            .await?;

        sqlx::query("CALL sp_registrar_participante_evento($1::INT, $2::INT, $3::TEXT)")
            .bind(enrollment.citizen_id)
            .bind(enrollment.event_id)
            .bind(enrollment.ticket.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let notices = self.notices.drain();
        tracing::info!(
            citizen_id = enrollment.citizen_id,
            event_id = enrollment.event_id,
            notices = notices.len(),
            "enrollment procedure completed"
        );
        Ok(EnrollmentOutcome { notices })
    }
}
