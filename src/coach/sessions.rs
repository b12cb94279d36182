//! In-memory registry of coach sessions for the HTTP surface.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::config::CoachConfig;

use super::checklist::Checklist;
use super::display::{DisplayEvent, Transcript};
use super::engine::CoachEngine;
use super::state::Ledger;
use super::summary::Summary;

/// Snapshot of one session for clients.
#[derive(Debug, Clone, Serialize)]
pub struct CoachStatus {
    pub id: Uuid,
    pub phase: &'static str,
    pub cursor: usize,
    pub total: usize,
    pub progress_percent: u8,
    pub ledger: Ledger,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl CoachStatus {
    fn of(id: Uuid, engine: &CoachEngine) -> Self {
        let session = engine.session();
        Self {
            id,
            phase: engine.phase().name(),
            cursor: session.cursor(),
            total: session.total(),
            progress_percent: session.progress_percent(),
            ledger: session.ledger().clone(),
            summary: engine.summary().cloned(),
            started_at: session.started_at(),
            completed_at: session.completed_at(),
        }
    }
}

/// One registered session and when a client last touched it.
struct SessionSlot {
    engine: Mutex<CoachEngine>,
    last_active: RwLock<DateTime<Utc>>,
}

impl SessionSlot {
    fn new(engine: CoachEngine) -> Self {
        Self {
            engine: Mutex::new(engine),
            last_active: RwLock::new(Utc::now()),
        }
    }

    async fn touch(&self) {
        *self.last_active.write().await = Utc::now();
    }
}

/// Coach sessions keyed by id. Each session is locked independently so
/// one slow client never blocks another.
pub struct CoachSessions {
    checklist: Arc<Checklist>,
    config: CoachConfig,
    sessions: RwLock<HashMap<Uuid, Arc<SessionSlot>>>,
}

impl CoachSessions {
    pub fn new(checklist: Arc<Checklist>, config: CoachConfig) -> Arc<Self> {
        Arc::new(Self {
            checklist,
            config,
            sessions: RwLock::new(HashMap::new()),
        })
    }

    pub fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    /// Create and start a session. Returns its id, the greeting events and status.
    pub async fn create(&self) -> (Uuid, Vec<DisplayEvent>, CoachStatus) {
        let id = Uuid::new_v4();
        let mut engine = CoachEngine::new(Arc::clone(&self.checklist), self.config.clone());
        let mut transcript = Transcript::new();
        engine.start(&mut transcript).await;
        let status = CoachStatus::of(id, &engine);

        self.sessions
            .write()
            .await
            .insert(id, Arc::new(SessionSlot::new(engine)));
        info!(session_id = %id, "Coach session created");

        (id, transcript.drain(), status)
    }

    /// Forward user text into a session. `None` if the session does not exist.
    pub async fn send(&self, id: Uuid, text: &str) -> Option<(Vec<DisplayEvent>, CoachStatus)> {
        let slot = self.sessions.read().await.get(&id).cloned()?;
        slot.touch().await;
        let mut engine = slot.engine.lock().await;
        let mut transcript = Transcript::new();
        engine.handle(text, &mut transcript).await;
        Some((transcript.drain(), CoachStatus::of(id, &engine)))
    }

    pub async fn status(&self, id: Uuid) -> Option<CoachStatus> {
        let slot = self.sessions.read().await.get(&id).cloned()?;
        slot.touch().await;
        let engine = slot.engine.lock().await;
        Some(CoachStatus::of(id, &engine))
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!(session_id = %id, "Coach session removed");
        }
        removed
    }

    /// Drop sessions no client has touched for longer than `max_idle`.
    /// Returns how many were dropped.
    pub async fn expire_idle(&self, max_idle: Duration) -> usize {
        let Some(cutoff) = chrono::Duration::from_std(max_idle)
            .ok()
            .and_then(|idle| Utc::now().checked_sub_signed(idle))
        else {
            return 0;
        };

        let mut sessions = self.sessions.write().await;
        let mut stale = Vec::new();
        for (id, slot) in sessions.iter() {
            if *slot.last_active.read().await < cutoff {
                stale.push(*id);
            }
        }
        for id in &stale {
            sessions.remove(id);
        }

        if !stale.is_empty() {
            info!(count = stale.len(), "Expired idle coach sessions");
        }
        stale.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Periodically drop idle sessions.
pub fn spawn_expiry_task(
    sessions: Arc<CoachSessions>,
    max_idle: Duration,
    every: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            sessions.expire_idle(max_idle).await;
        }
    })
}
