//! Citizen repository
//!
//! A citizen is a `pessoa` row of type `CIDADAO` plus its `cidadao` details.

use sqlx::PgPool;

use crate::error::Result;
use crate::models::{CitizenSummary, NewCitizen};

/// Citizen repository
pub struct CitizenRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CitizenRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert the person and citizen rows, returning the new person id.
    ///
    /// Both inserts share a transaction: a failure on `cidadao` leaves no
    /// orphan `pessoa` behind.
    pub async fn create(&self, citizen: &NewCitizen) -> Result<i32> {
        let mut tx = self.pool.begin().await?;

        let person_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO pessoa (nome, telefone, email, cpf_cnpj, tipo)
            VALUES ($1, $2, $3, $4, 'CIDADAO')
            RETURNING id::INT
            "#,
        )
        .bind(citizen.name.as_str())
        .bind(citizen.phone.as_deref())
        .bind(citizen.email.as_str())
        .bind(citizen.cpf.as_str())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO cidadao (pessoa_id, data_nasc, genero)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(person_id)
        .bind(citizen.birth_date.date())
        .bind(citizen.gender.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(person_id, "citizen registered");
        Ok(person_id)
    }

    /// All citizens, alphabetically.
    pub async fn list(&self) -> Result<Vec<CitizenSummary>> {
        let citizens = sqlx::query_as::<_, CitizenSummary>(
            r#"
            SELECT id::INT AS id, nome::TEXT AS name
            FROM pessoa
            WHERE tipo = 'CIDADAO'
            ORDER BY nome
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        tracing::debug!(count = citizens.len(), "listed citizens");
        Ok(citizens)
    }
}
