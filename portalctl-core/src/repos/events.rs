//! Event repository - upcoming listing and popularity report

use sqlx::PgPool;

use crate::error::Result;
use crate::models::{rank_by_enrollment, EventEnrollmentCount, EventPopularity, UpcomingEvent};

/// Event repository
pub struct EventRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> EventRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Events starting after now, soonest first, with remaining seats.
    ///
    /// Seat availability comes from `fn_verificar_vagas_evento`.
    pub async fn upcoming(&self) -> Result<Vec<UpcomingEvent>> {
        let events = sqlx::query_as::<_, UpcomingEvent>(
            r#"
            SELECT
                e.id::INT AS id,
                e.nome::TEXT AS name,
                e.descricao::TEXT AS description,
                e.data::TIMESTAMP AS starts_at,
                e.tipo::TEXT AS kind,
                e.preco::FLOAT8 AS price,
                e.capacidade::BIGINT AS capacity,
                l.nome::TEXT AS venue,
                fn_verificar_vagas_evento(e.id)::BIGINT AS seats_left
            FROM evento e
            JOIN local l ON e.local_id = l.id
            WHERE e.data > NOW()
            ORDER BY e.data
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        tracing::debug!(count = events.len(), "listed upcoming events");
        Ok(events)
    }

    /// Events ranked by enrollment count, most popular first.
    ///
    /// Uses LEFT JOIN so events nobody joined still appear with zero.
    /// Ties fall back to event id; `limit = None` returns every event.
    pub async fn popularity(&self, limit: Option<i64>) -> Result<Vec<EventPopularity>> {
        let rows = sqlx::query_as::<_, EventEnrollmentCount>(
            r#"
            SELECT
                e.id::INT AS id,
                e.nome::TEXT AS name,
                COUNT(ep.cidadao_id) AS total_enrolled
            FROM evento e
            LEFT JOIN evento_participante ep ON ep.evento_id = e.id
            GROUP BY e.id
            ORDER BY total_enrolled DESC, e.id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rank_by_enrollment(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration tests - run with DATABASE_URL set
    // cargo test -p portalctl-core -- --ignored

    async fn pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        PgPool::connect(&url).await.expect("connect failed")
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn upcoming_events_are_sorted_by_date() {
        let pool = pool().await;
        let events = EventRepo::new(&pool).upcoming().await.expect("query failed");
        assert!(events.windows(2).all(|w| w[0].starts_at <= w[1].starts_at));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn popularity_is_descending_and_limited() {
        let pool = pool().await;
        let repo = EventRepo::new(&pool);

        let all = repo.popularity(None).await.expect("query failed");
        assert!(all
            .windows(2)
            .all(|w| w[0].total_enrolled >= w[1].total_enrolled));

        let top = repo.popularity(Some(1)).await.expect("query failed");
        assert!(top.len() <= 1);
        if let (Some(first), Some(top)) = (all.first(), top.first()) {
            assert_eq!(first.id, top.id);
            assert_eq!(top.rank, 1);
        }
    }
}
