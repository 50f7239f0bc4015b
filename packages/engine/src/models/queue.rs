use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::models::game_match::GameType;

/// A player waiting in a matchmaking queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEntry {
    pub player_id: String,
    pub joined_at: DateTime<Utc>,
}

impl QueueEntry {
    pub fn new(player_id: &str) -> Self {
        QueueEntry {
            player_id: player_id.to_string(),
            joined_at: Utc::now(),
        }
    }
}

/// Result of one matchmaking request against a queue.
#[derive(Debug)]
pub enum QueueOutcome {
    /// The requester was already waiting in this queue. No-op.
    AlreadyQueued,
    /// The queue was empty, the requester is now waiting.
    Enqueued,
    /// An opponent was waiting and has been removed from the queue.
    Paired(QueueEntry),
}

/// One FIFO of waiting players per game type, each behind its own lock so
/// requests for different time controls never contend with each other.
#[derive(Debug, Default)]
pub struct MatchQueues {
    blitz: Mutex<VecDeque<QueueEntry>>,
    rapid: Mutex<VecDeque<QueueEntry>>,
}

impl MatchQueues {
    pub fn new() -> Self {
        MatchQueues::default()
    }

    fn queue(&self, game_type: GameType) -> &Mutex<VecDeque<QueueEntry>> {
        match game_type {
            GameType::Blitz => &self.blitz,
            GameType::Rapid => &self.rapid,
        }
    }

    /// The single atomic matchmaking step: under one lock acquisition,
    /// either detect the requester is already waiting, pop the head of the
    /// queue as their opponent, or append the requester to the tail.
    pub async fn pair_or_enqueue(&self, game_type: GameType, player_id: &str) -> QueueOutcome {
        let mut queue = self.queue(game_type).lock().await;

        if queue.iter().any(|entry| entry.player_id == player_id) {
            return QueueOutcome::AlreadyQueued;
        }

        match queue.pop_front() {
            Some(opponent) => QueueOutcome::Paired(opponent),
            None => {
                queue.push_back(QueueEntry::new(player_id));
                QueueOutcome::Enqueued
            }
        }
    }

    /// Removes the player from the queue. Returns whether they were waiting.
    pub async fn remove(&self, game_type: GameType, player_id: &str) -> bool {
        let mut queue = self.queue(game_type).lock().await;
        let before = queue.len();
        queue.retain(|entry| entry.player_id != player_id);
        queue.len() != before
    }

    pub async fn waiting_count(&self, game_type: GameType) -> usize {
        self.queue(game_type).lock().await.len()
    }
}
