// src/services/session_store.rs
use crate::errors::StudioError;
use crate::models::ImageValue;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub active_image: ImageValue,
    pub results: Vec<ImageValue>,
    pub gallery: Vec<ImageValue>,
    pub in_flight: bool,
    pub created_at: DateTime<Utc>,
    last_touched: Instant,
}

impl Session {
    pub fn result(&self, index: usize) -> Result<&ImageValue, StudioError> {
        self.results.get(index).ok_or_else(|| {
            StudioError::Validation(format!(
                "Result index {} out of range ({} result(s))",
                index,
                self.results.len()
            ))
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            active_image: self.active_image.name.clone(),
            results: self.results.clone(),
            gallery_size: self.gallery.len(),
            in_flight: self.in_flight,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub active_image: String,
    pub results: Vec<ImageValue>,
    pub gallery_size: usize,
    pub in_flight: bool,
    pub created_at: DateTime<Utc>,
}

/// Holds a session's in-flight flag. Dropping it unfinished clears the flag.
pub struct GenerationGuard {
    store: Arc<SessionStore>,
    id: Uuid,
    armed: bool,
}

impl GenerationGuard {
    /// Records the outcome and releases the session.
    pub async fn finish(mut self, results: Option<Vec<ImageValue>>) -> Result<(), StudioError> {
        self.store.finish_generation(self.id, results).await?;
        self.armed = false;
        Ok(())
    }
}

impl Drop for GenerationGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let store = self.store.clone();
        let id = self.id;
        warn!("Generation for session {} was abandoned, releasing it", id);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = store.finish_generation(id, None).await {
                        warn!("Failed to release session {}: {}", id, e);
                    }
                });
            }
            Err(_) => {
                if let Ok(mut sessions) = store.sessions.try_write() {
                    if let Some(session) = sessions.get_mut(&id) {
                        session.in_flight = false;
                    }
                }
            }
        }
    }
}

/// Process-local session state. Nothing survives a restart.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl,
        }
    }

    /// Creates a session, evicting idle ones first.
    pub async fn create(&self, image: ImageValue) -> Session {
        let session = Session {
            id: Uuid::new_v4(),
            active_image: image,
            results: Vec::new(),
            gallery: Vec::new(),
            in_flight: false,
            created_at: Utc::now(),
            last_touched: Instant::now(),
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        let idle_ttl = self.idle_ttl;
        sessions.retain(|_, existing| {
            existing.in_flight || existing.last_touched.elapsed() < idle_ttl
        });
        if sessions.len() < before {
            info!("Evicted {} idle session(s)", before - sessions.len());
        }
        sessions.insert(session.id, session.clone());
        session
    }

    pub async fn get(&self, id: Uuid) -> Result<Session, StudioError> {
        self.update(id, |session| Ok(session.clone())).await
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), StudioError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StudioError::SessionNotFound(id))
    }

    /// Like `begin_generation`, but the returned guard owns the in-flight flag.
    pub async fn start_generation(
        self: &Arc<Self>,
        id: Uuid,
    ) -> Result<(Session, GenerationGuard), StudioError> {
        let session = self.begin_generation(id).await?;
        let guard = GenerationGuard {
            store: self.clone(),
            id,
            armed: true,
        };
        Ok((session, guard))
    }

    /// Marks a generation as running and clears the previous results.
    pub async fn begin_generation(&self, id: Uuid) -> Result<Session, StudioError> {
        self.update(id, |session| {
            if session.in_flight {
                return Err(StudioError::Busy);
            }
            session.in_flight = true;
            session.results.clear();
            Ok(session.clone())
        })
        .await
    }

    /// Always clears the in-flight flag; `Some` results also land in the gallery.
    pub async fn finish_generation(
        &self,
        id: Uuid,
        results: Option<Vec<ImageValue>>,
    ) -> Result<(), StudioError> {
        self.update(id, |session| {
            session.in_flight = false;
            if let Some(results) = results {
                session.gallery.extend(results.iter().cloned());
                session.results = results;
            }
            Ok(())
        })
        .await
    }

    /// Swaps an edited image in for `old`, matched by payload.
    pub async fn replace_image(
        &self,
        id: Uuid,
        old: &ImageValue,
        new: ImageValue,
    ) -> Result<(), StudioError> {
        self.update(id, |session| {
            if let Some(slot) = session.results.iter_mut().find(|r| r.data == old.data) {
                *slot = new.clone();
            }
            match session.gallery.iter_mut().find(|g| g.data == old.data) {
                Some(slot) => *slot = new,
                None => session.gallery.insert(0, new),
            }
            Ok(())
        })
        .await
    }

    /// Puts an edit of the active image in front of the current results.
    pub async fn prepend_result(&self, id: Uuid, image: ImageValue) -> Result<(), StudioError> {
        self.update(id, |session| {
            session.results.insert(0, image.clone());
            session.gallery.insert(0, image);
            Ok(())
        })
        .await
    }

    pub async fn set_active(&self, id: Uuid, image: ImageValue) -> Result<(), StudioError> {
        self.update(id, |session| {
            session.active_image = image;
            session.results.clear();
            Ok(())
        })
        .await
    }

    pub async fn gallery(&self, id: Uuid) -> Result<Vec<ImageValue>, StudioError> {
        Ok(self.get(id).await?.gallery)
    }

    async fn update<T>(
        &self,
        id: Uuid,
        apply: impl FnOnce(&mut Session) -> Result<T, StudioError>,
    ) -> Result<T, StudioError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or(StudioError::SessionNotFound(id))?;
        session.last_touched = Instant::now();
        apply(session)
    }
}
