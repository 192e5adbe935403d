//! Workout repository

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;
use trainhub_domain::{Exercise, RequestParams, Workout};

use super::{decode_all, decode_item, segment, RepositoryError, RepositoryResult};
use crate::api::{RequestOrchestrator, SendOptions};
use crate::http::ApiTransport;

/// Workout CRUD plus the cached list of the user's workouts.
pub struct WorkoutRepository {
    api: Arc<RequestOrchestrator>,
    workouts: watch::Sender<Vec<Workout>>,
}

impl WorkoutRepository {
    /// Starts with an empty list until [`list`](Self::list) succeeds.
    pub fn new(api: Arc<RequestOrchestrator>) -> Self {
        let (workouts, _) = watch::channel(Vec::new());
        Self { api, workouts }
    }

    /// Last successfully fetched workout list, kept current by
    /// create/update/delete.
    pub fn workouts(&self) -> watch::Receiver<Vec<Workout>> {
        self.workouts.subscribe()
    }

    /// Fetch every workout and replace the cached list.
    ///
    /// # Errors
    /// `RepositoryError::Rejected` when the call fails, `RepositoryError::Domain`
    /// when an entry does not decode. The cached list is left as it was.
    pub async fn list(&self) -> RepositoryResult<Vec<Workout>> {
        let envelope = self
            .api
            .send(&|t: &ApiTransport| t.get("workouts"), SendOptions::default())
            .await
            .map_err(RepositoryError::Rejected)?;

        let workouts: Vec<Workout> = decode_all(&envelope)?;
        debug!(count = workouts.len(), "Workouts fetched");
        self.workouts.send_replace(workouts.clone());
        Ok(workouts)
    }

    /// Create a workout; the backend's copy is appended to the cached list.
    ///
    /// # Errors
    /// `RepositoryError::Domain` if the workout cannot be serialized or the
    /// reply does not decode, `RepositoryError::Rejected` if the call fails.
    pub async fn create(&self, workout: &Workout) -> RepositoryResult<Workout> {
        let mut params = RequestParams::new();
        params.insert_json("workout", workout)?;
        let envelope = self
            .api
            .send(&move |t: &ApiTransport| t.post("workouts", &params), SendOptions::default())
            .await
            .map_err(RepositoryError::Rejected)?;

        let created: Workout = decode_item(&envelope, 0)?;
        self.workouts.send_modify(|list| list.push(created.clone()));
        Ok(created)
    }

    /// Replace the cached entry with the same id, if present.
    ///
    /// # Errors
    /// Same as [`create`](Self::create).
    pub async fn update(&self, workout: &Workout) -> RepositoryResult<Workout> {
        let path = format!("workouts/{}", segment(&workout.id));
        let mut params = RequestParams::new();
        params.insert_json("workout", workout)?;
        let envelope = self
            .api
            .send(&move |t: &ApiTransport| t.put(&path, &params), SendOptions::default())
            .await
            .map_err(RepositoryError::Rejected)?;

        let updated: Workout = decode_item(&envelope, 0)?;
        self.workouts.send_modify(|list| {
            if let Some(slot) = list.iter_mut().find(|w| w.id == updated.id) {
                *slot = updated.clone();
            }
        });
        Ok(updated)
    }

    /// # Errors
    /// `RepositoryError::Rejected` if the call fails; the cached list keeps
    /// the workout.
    pub async fn delete(&self, id: &str) -> RepositoryResult<()> {
        let path = format!("workouts/{}", segment(id));
        self.api
            .send(&move |t: &ApiTransport| t.delete(&path), SendOptions::default())
            .await
            .map_err(RepositoryError::Rejected)?;

        self.workouts.send_modify(|list| list.retain(|w| w.id != id));
        Ok(())
    }

    /// Exercises of one workout. Not cached.
    ///
    /// # Errors
    /// `RepositoryError::Rejected` on failure, `RepositoryError::Domain` for a
    /// malformed entry.
    pub async fn exercises(&self, workout_id: &str) -> RepositoryResult<Vec<Exercise>> {
        let path = format!("workouts/{}/exercises", segment(workout_id));
        let envelope = self
            .api
            .send(&move |t: &ApiTransport| t.get(&path), SendOptions::default())
            .await
            .map_err(RepositoryError::Rejected)?;

        decode_all(&envelope)
    }
}
