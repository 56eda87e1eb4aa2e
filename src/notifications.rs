//! Pull-based notification queue
//!
//! The core pushes events here (achievement unlocks, power-up activations,
//! high score beats); the presentation layer drains and displays them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Info,
    Powerup,
    Achievement,
    HighScore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub text: String,
    pub kind: NotificationKind,
}

/// FIFO queue; unbounded in principle, drained every frame in practice
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    pending: Vec<Notification>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: impl Into<String>, kind: NotificationKind) {
        self.pending.push(Notification {
            text: text.into(),
            kind,
        });
    }

    /// Take everything queued since the last drain, in push order
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_returns_in_push_order() {
        let mut queue = NotificationQueue::new();
        queue.push("first", NotificationKind::Info);
        queue.push("second", NotificationKind::Powerup);

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].text, "first");
        assert_eq!(drained[1].kind, NotificationKind::Powerup);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_drain_empty() {
        let mut queue = NotificationQueue::new();
        assert!(queue.drain().is_empty());
    }
}
