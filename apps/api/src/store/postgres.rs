use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::metric::{MetricSample, NewMetricSample};
use crate::models::routine::{Routine, RoutineDraft, RoutineRow};
use crate::models::section::ReferenceSection;
use crate::models::user::{NewUser, User};
use crate::store::{CorpusStore, RoutineStore, StoreError, METRIC_HISTORY_LIMIT};

/// PostgreSQL-backed store. Referential integrity is left to the schema's
/// foreign keys.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a foreign-key violation on `user_id` to `UnknownUser`.
fn map_user_fk(user_id: Uuid) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |err| match &err {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            StoreError::UnknownUser(user_id)
        }
        _ => StoreError::Database(err),
    }
}

async fn insert_user<'e, E>(executor: E, user: &NewUser) -> Result<User, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users
            (id, name, age, weight, height, gender,
             improvement_areas, budget, equipment, current_health)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&user.name)
    .bind(user.age)
    .bind(user.weight)
    .bind(user.height)
    .bind(&user.gender)
    .bind(&user.improvement_areas)
    .bind(&user.budget)
    .bind(&user.equipment)
    .bind(&user.current_health)
    .fetch_one(executor)
    .await
}

async fn insert_routine<'e, E>(
    executor: E,
    user_id: Uuid,
    draft: &RoutineDraft,
) -> Result<Routine, StoreError>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, RoutineRow>(
        r#"
        INSERT INTO routines
            (id, user_id, supplements, diet, exercise, sleep_schedule,
             metrics, protocol_links, embedded_sections, focus_categories)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(Json(&draft.supplements))
    .bind(Json(&draft.diet))
    .bind(Json(&draft.exercise))
    .bind(Json(&draft.sleep_schedule))
    .bind(Json(&draft.metrics))
    .bind(Json(&draft.protocol_links))
    .bind(Json(&draft.embedded_sections))
    .bind(&draft.focus_categories)
    .fetch_one(executor)
    .await
    .map_err(map_user_fk(user_id))?;

    Ok(row.into())
}

#[async_trait]
impl RoutineStore for PgStore {
    async fn create_user(&self, user: &NewUser) -> Result<User, StoreError> {
        let created = insert_user(&self.pool, user).await?;
        info!("Created user {}", created.id);
        Ok(created)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn create_routine(
        &self,
        user_id: Uuid,
        draft: &RoutineDraft,
    ) -> Result<Routine, StoreError> {
        let routine = insert_routine(&self.pool, user_id, draft).await?;
        info!("Created routine {} for user {user_id}", routine.id);
        Ok(routine)
    }

    async fn create_submission(
        &self,
        user: &NewUser,
        draft: &RoutineDraft,
    ) -> Result<(User, Routine), StoreError> {
        // dropping the transaction on error rolls back the user row
        let mut tx = self.pool.begin().await?;
        let created = insert_user(&mut *tx, user).await?;
        let routine = insert_routine(&mut *tx, created.id, draft).await?;
        tx.commit().await?;

        info!("Created user {} with routine {}", created.id, routine.id);
        Ok((created, routine))
    }

    async fn get_routine(&self, id: Uuid) -> Result<Option<Routine>, StoreError> {
        let row = sqlx::query_as::<_, RoutineRow>("SELECT * FROM routines WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Routine::from))
    }

    async fn record_metric(
        &self,
        user_id: Uuid,
        sample: &NewMetricSample,
    ) -> Result<MetricSample, StoreError> {
        let stored = sqlx::query_as::<_, MetricSample>(
            r#"
            INSERT INTO metric_samples
                (id, user_id, date, weight, sleep_hours, steps, supplements)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(sample.date.unwrap_or_else(Utc::now))
        .bind(sample.weight)
        .bind(sample.sleep_hours)
        .bind(sample.steps)
        .bind(&sample.supplements)
        .fetch_one(&self.pool)
        .await
        .map_err(map_user_fk(user_id))?;

        debug!("Recorded metric sample {} for user {user_id}", stored.id);
        Ok(stored)
    }

    async fn list_metrics(&self, user_id: Uuid) -> Result<Vec<MetricSample>, StoreError> {
        Ok(sqlx::query_as::<_, MetricSample>(
            r#"
            SELECT * FROM metric_samples
            WHERE user_id = $1
            ORDER BY date DESC, created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(METRIC_HISTORY_LIMIT)
        .fetch_all(&self.pool)
        .await?)
    }
}

#[async_trait]
impl CorpusStore for PgStore {
    async fn list_sections(&self) -> Result<Vec<ReferenceSection>, StoreError> {
        Ok(sqlx::query_as::<_, ReferenceSection>(
            r#"
            SELECT section_id, title, content, categories, url, created_at
            FROM protocol_sections
            ORDER BY position ASC, section_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn insert_sections_if_absent(
        &self,
        sections: &[ReferenceSection],
    ) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for (position, section) in sections.iter().enumerate() {
            // ON CONFLICT keeps concurrent populators from duplicating rows
            let result = sqlx::query(
                r#"
                INSERT INTO protocol_sections
                    (section_id, title, content, categories, url, position)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (section_id) DO NOTHING
                "#,
            )
            .bind(&section.section_id)
            .bind(&section.title)
            .bind(&section.content)
            .bind(&section.categories)
            .bind(&section.url)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        info!(
            "Persisted {inserted} of {} protocol sections",
            sections.len()
        );
        Ok(inserted)
    }
}
