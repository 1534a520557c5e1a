//! In-memory store with the same semantics as `PgStore`, used by handler tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::metric::{MetricSample, NewMetricSample};
use crate::models::routine::{Routine, RoutineDraft};
use crate::models::section::ReferenceSection;
use crate::models::user::{NewUser, User};
use crate::store::{CorpusStore, RoutineStore, StoreError, METRIC_HISTORY_LIMIT};

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Tables>,
    /// When set, every write fails with a database error.
    fail_writes: bool,
    /// When set, only routine inserts fail.
    fail_routines: bool,
}

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    routines: HashMap<Uuid, Routine>,
    metrics: Vec<MetricSample>,
    sections: Vec<ReferenceSection>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn failing_routines() -> Self {
        Self {
            fail_routines: true,
            ..Self::default()
        }
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }
        Ok(())
    }

    fn check_routine_writable(&self) -> Result<(), StoreError> {
        self.check_writable()?;
        if self.fail_routines {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

fn new_user(user: &NewUser) -> User {
    User {
        id: Uuid::new_v4(),
        name: user.name.clone(),
        age: user.age,
        weight: user.weight,
        height: user.height,
        gender: user.gender.clone(),
        improvement_areas: user.improvement_areas.clone(),
        budget: user.budget.clone(),
        equipment: user.equipment.clone(),
        current_health: user.current_health.clone(),
        created_at: Utc::now(),
    }
}

fn new_routine(user_id: Uuid, draft: &RoutineDraft) -> Routine {
    Routine {
        id: Uuid::new_v4(),
        user_id,
        draft: draft.clone(),
        created_at: Utc::now(),
    }
}

#[async_trait]
impl RoutineStore for MemoryStore {
    async fn create_user(&self, user: &NewUser) -> Result<User, StoreError> {
        self.check_writable()?;
        let created = new_user(user);
        let mut tables = self.inner.lock().unwrap();
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.inner.lock().unwrap().users.get(&id).cloned())
    }

    async fn create_routine(
        &self,
        user_id: Uuid,
        draft: &RoutineDraft,
    ) -> Result<Routine, StoreError> {
        self.check_routine_writable()?;
        let mut tables = self.inner.lock().unwrap();
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::UnknownUser(user_id));
        }
        let routine = new_routine(user_id, draft);
        tables.routines.insert(routine.id, routine.clone());
        Ok(routine)
    }

    async fn create_submission(
        &self,
        user: &NewUser,
        draft: &RoutineDraft,
    ) -> Result<(User, Routine), StoreError> {
        self.check_writable()?;
        let created = new_user(user);
        self.check_routine_writable()?;
        let routine = new_routine(created.id, draft);

        let mut tables = self.inner.lock().unwrap();
        tables.users.insert(created.id, created.clone());
        tables.routines.insert(routine.id, routine.clone());
        Ok((created, routine))
    }

    async fn get_routine(&self, id: Uuid) -> Result<Option<Routine>, StoreError> {
        Ok(self.inner.lock().unwrap().routines.get(&id).cloned())
    }

    async fn record_metric(
        &self,
        user_id: Uuid,
        sample: &NewMetricSample,
    ) -> Result<MetricSample, StoreError> {
        self.check_writable()?;
        let mut tables = self.inner.lock().unwrap();
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::UnknownUser(user_id));
        }
        let now = Utc::now();
        let stored = MetricSample {
            id: Uuid::new_v4(),
            user_id,
            date: sample.date.unwrap_or(now),
            weight: sample.weight,
            sleep_hours: sample.sleep_hours,
            steps: sample.steps,
            supplements: sample.supplements.clone(),
            created_at: now,
        };
        tables.metrics.push(stored.clone());
        Ok(stored)
    }

    async fn list_metrics(&self, user_id: Uuid) -> Result<Vec<MetricSample>, StoreError> {
        let tables = self.inner.lock().unwrap();
        let mut samples: Vec<MetricSample> = tables
            .metrics
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        samples.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        samples.truncate(METRIC_HISTORY_LIMIT as usize);
        Ok(samples)
    }
}

#[async_trait]
impl CorpusStore for MemoryStore {
    async fn list_sections(&self) -> Result<Vec<ReferenceSection>, StoreError> {
        Ok(self.inner.lock().unwrap().sections.clone())
    }

    async fn insert_sections_if_absent(
        &self,
        sections: &[ReferenceSection],
    ) -> Result<u64, StoreError> {
        self.check_writable()?;
        let mut tables = self.inner.lock().unwrap();
        let mut inserted = 0;
        for section in sections {
            if tables
                .sections
                .iter()
                .any(|s| s.section_id == section.section_id)
            {
                continue;
            }
            tables.sections.push(ReferenceSection {
                created_at: Some(Utc::now()),
                ..section.clone()
            });
            inserted += 1;
        }
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(id: &str) -> ReferenceSection {
        ReferenceSection {
            section_id: id.to_string(),
            title: id.to_string(),
            content: String::new(),
            categories: vec![],
            url: format!("https://protocol.example.com#{id}"),
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_routine_for_unknown_user_rejected() {
        let store = MemoryStore::new();
        let draft = crate::routine::generator::tests::sample_draft();
        let err = store.create_routine(Uuid::new_v4(), &draft).await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownUser(_)));
    }

    fn answers() -> NewUser {
        NewUser {
            name: "Ada".to_string(),
            age: 36,
            weight: None,
            height: None,
            gender: "female".to_string(),
            improvement_areas: vec![],
            budget: "medium".to_string(),
            equipment: vec![],
            current_health: vec![],
        }
    }

    #[tokio::test]
    async fn test_submission_stores_user_and_routine() {
        let store = MemoryStore::new();
        let draft = crate::routine::generator::tests::sample_draft();
        let (user, routine) = store.create_submission(&answers(), &draft).await.unwrap();
        assert_eq!(routine.user_id, user.id);
        assert!(store.get_user(user.id).await.unwrap().is_some());
        assert_eq!(store.get_routine(routine.id).await.unwrap(), Some(routine));
    }

    #[tokio::test]
    async fn test_failed_submission_leaves_no_user() {
        let store = MemoryStore::failing_routines();
        let draft = crate::routine::generator::tests::sample_draft();
        let err = store.create_submission(&answers(), &draft).await.unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
        assert!(store.inner.lock().unwrap().users.is_empty());
    }

    #[tokio::test]
    async fn test_insert_sections_is_idempotent() {
        let store = MemoryStore::new();
        let first = store
            .insert_sections_if_absent(&[section("sleep"), section("diet")])
            .await
            .unwrap();
        let second = store
            .insert_sections_if_absent(&[section("diet"), section("exercise")])
            .await
            .unwrap();
        assert_eq!(first, 2);
        assert_eq!(second, 1);
        let ids: Vec<String> = store
            .list_sections()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.section_id)
            .collect();
        assert_eq!(ids, vec!["sleep", "diet", "exercise"]);
    }
}
