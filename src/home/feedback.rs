use std::{sync::Arc, time::Duration};

use serde::Serialize;
use tokio::{sync::Mutex, task::JoinHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Error,
    Success,
    Delete,
}

/// Banner message shown after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub message: String,
}

impl Feedback {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FeedbackKind::Error,
            message: message.into(),
        }
    }
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FeedbackKind::Success,
            message: message.into(),
        }
    }
    pub fn deleted(message: impl Into<String>) -> Self {
        Self {
            kind: FeedbackKind::Delete,
            message: message.into(),
        }
    }
}

#[derive(Default)]
struct Slot {
    generation: u64,
    current: Option<Feedback>,
}

/// Holds at most one feedback message and clears it after `ttl`.
///
/// Showing a new message aborts the pending clear of the previous one. The
/// generation check covers a timer that already woke up before the abort.
/// Dropping the slot aborts the timer.
pub struct FeedbackSlot {
    slot: Arc<Mutex<Slot>>,
    timer: Option<JoinHandle<()>>,
    ttl: Duration,
}

impl FeedbackSlot {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            timer: None,
            ttl,
        }
    }

    pub async fn show(&mut self, feedback: Feedback) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }

        let generation = {
            let mut slot = self.slot.lock().await;
            slot.generation += 1;
            slot.current = Some(feedback);
            slot.generation
        };

        let slot = Arc::clone(&self.slot);
        let ttl = self.ttl;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut slot = slot.lock().await;
            if slot.generation == generation {
                slot.current = None;
            }
        }));
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn current(&self) -> Option<Feedback> {
        self.slot.lock().await.current.clone()
    }

    pub async fn clear(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        let mut slot = self.slot.lock().await;
        slot.generation += 1;
        slot.current = None;
    }
}

impl Drop for FeedbackSlot {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
